//! Error types for selroute.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`SelrouteError`] - Top-level error type for all selroute operations
//! - [`InterfaceError`] - Malformed interface descriptions
//! - [`BuildError`] - Dispatch table construction failures
//! - [`DispatchError`] - Runtime dispatch failures
//! - [`OrchestrationError`] - Deployment failures

use crate::{address::Address, forward::Revert, selector::Selector};
use thiserror::Error;

/// A boxed error type for collaborator failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all selroute operations.
#[derive(Error, Debug)]
pub enum SelrouteError {
    /// An interface description could not be read.
    #[error("interface error: {0}")]
    Interface(#[from] InterfaceError),

    /// The dispatch table could not be built.
    #[error("build error: {0}")]
    Build(#[from] BuildError),

    /// A call could not be dispatched.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// A deployment run aborted.
    #[error("orchestration error: {0}")]
    Orchestration(#[from] OrchestrationError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// An interface description cannot be turned into `(name, paramTypes)` records.
#[derive(Error, Debug)]
pub enum InterfaceError {
    /// The description is not a valid JSON ABI.
    #[error("invalid interface json")]
    Json(#[source] serde_json::Error),

    /// An operation entry has no name.
    #[error("operation entry #{index} has no name")]
    MissingName {
        /// Position of the entry in the description.
        index: usize,
    },

    /// An operation name is not an identifier.
    #[error("operation entry #{index} has invalid name `{name}`")]
    InvalidName {
        /// Position of the entry in the description.
        index: usize,
        /// The offending name.
        name: String,
    },

    /// A parameter type cannot be parsed.
    #[error("operation `{operation}` has unparseable parameter type `{ty}`: {reason}")]
    InvalidParamType {
        /// Name of the operation declaring the parameter.
        operation: String,
        /// The type as written.
        ty: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Errors that can occur while building a dispatch table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// Two distinct targets expose the same selector.
    #[error("selector {selector} is exposed by both {first} and {second}")]
    SelectorCollision {
        /// The contested selector.
        selector: Selector,
        /// Target that claimed it first.
        first: Address,
        /// Target that tried to claim it again.
        second: Address,
    },
}

/// Errors surfaced to the original caller of a router front.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No implementation unit serves this selector.
    #[error("unknown selector {0}")]
    UnknownSelector(Selector),

    /// The payload is too short to carry a selector.
    #[error("call payload of {len} bytes carries no selector")]
    PayloadTooShort {
        /// Payload length in bytes.
        len: usize,
    },

    /// The target failed; its failure data is relayed unmodified.
    #[error(transparent)]
    Reverted(#[from] Revert),
}

/// Fatal errors that abort a deployment run.
#[derive(Error, Debug)]
pub enum OrchestrationError {
    /// A unit's interface description is malformed.
    #[error("malformed interface for `{unit}`")]
    MalformedInterface {
        /// Unit name.
        unit: String,
        /// What was wrong.
        #[source]
        source: InterfaceError,
    },

    /// A unit declares initializer parameters.
    #[error("`{unit}` declares {params} initializer parameter(s); implementation units must take none")]
    InitializerArgumentsNotSupported {
        /// Unit name.
        unit: String,
        /// Declared parameter count.
        params: usize,
    },

    /// The publish step failed.
    #[error("publishing `{unit}` failed")]
    PublishFailed {
        /// Name of the unit or router being published.
        unit: String,
        /// Failure reported by the publisher.
        #[source]
        source: BoxError,
    },

    /// Two units expose the same selector.
    #[error(transparent)]
    SelectorCollision(#[from] BuildError),

    /// Two units share a name.
    #[error("unit name `{unit}` appears more than once")]
    DuplicateUnitName {
        /// The repeated name.
        unit: String,
    },
}

// Convenience conversions
impl From<BoxError> for SelrouteError {
    fn from(err: BoxError) -> Self {
        SelrouteError::Custom(err)
    }
}
