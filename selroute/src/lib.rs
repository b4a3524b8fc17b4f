//! # selroute - Selector-Based Call Router
//!
//! `selroute` puts several independently published implementation units
//! behind one stable router address. Every incoming call is forwarded, whole,
//! to the unit that exposes the call's 4-byte selector, and runs against the
//! router's storage with the original caller and value.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use selroute::prelude::*;
//! use selroute::testing::{Sandbox, SandboxArtifact, calldata};
//!
//! let sandbox = Sandbox::new();
//! let deployment = Orchestrator::new(&sandbox)
//!     .orchestrate(&[controller, view], &SandboxArtifact::router("proxy"))
//!     .await?;
//!
//! for entry in deployment.entries() {
//!     println!("{entry}");
//! }
//!
//! let router = deployment.router().address();
//! sandbox.call(router, caller, 0, &calldata("get_a()", &[]))?;
//! ```
//!
//! ## Features
//!
//! - `macros`: the `selector!` macro for compile-time selectors
//! - `tracing`: deployment and dispatch logging through `tracing`

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use selroute_core::{
    // Interface descriptions
    AbiEntry,
    AbiParam,
    // Addresses
    ADDRESS_LEN,
    Address,
    AddressParseError,
    // Publishing
    Artifact,
    // Error types
    BoxError,
    BuildError,
    // Forwarding
    CallContext,
    DispatchEntry,
    DispatchError,
    EntryKind,
    Forwarder,
    InterfaceDescription,
    InterfaceError,
    OrchestrationError,
    PublishArgs,
    Publisher,
    Revert,
    // Selectors
    SELECTOR_LEN,
    Selector,
    SelectorParseError,
    SelrouteError,
    Signature,
    SignatureParseError,
    UnitRoutes,
    canonical_signature,
    grammar,
};

pub use selroute_std::{
    orchestrator::{
        Deployment, ImplementationUnit, Orchestrator, OrchestratorConfig, orchestrate,
        unit_name_from_path,
    },
    router::RouterFront,
    table::{DispatchTable, DispatchTableBuilder},
};

/// Interface extraction.
pub mod interface {
    pub use selroute_std::interface::{
        INITIALIZER_NAME, canonical_type, extract, initializer_params, is_operation, selectors,
    };
}

/// Dispatch table construction.
pub mod table {
    pub use selroute_std::table::{DispatchTable, DispatchTableBuilder, build};
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use selroute_std::testing::*;
}

/// Run [`Orchestrator::orchestrate`] to completion on the current thread.
///
/// For callers without an async runtime, such as deployment scripts.
pub fn orchestrate_blocking<P: Publisher>(
    orchestrator: &Orchestrator<P>,
    units: &[P::Source],
    router: &P::Source,
) -> Result<Deployment, OrchestrationError> {
    futures::executor::block_on(orchestrator.orchestrate(units, router))
}

/// Prelude module - common imports for selroute.
///
/// # Usage
///
/// ```rust,ignore
/// use selroute::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Address, Artifact, CallContext, Deployment, DispatchError, DispatchTable, Forwarder,
        InterfaceDescription, OrchestrationError, Orchestrator, OrchestratorConfig, Publisher,
        RouterFront, Selector, SelrouteError, Signature,
    };
}

#[cfg(feature = "macros")]
pub use selroute_macros::selector;
