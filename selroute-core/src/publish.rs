//! # Publish Collaborator
//!
//! Publishing turns a source artifact into a live unit with a stable
//! [`Address`]. How that happens (compilation, transport, confirmation) is
//! the publisher's business; the orchestrator only sees success or failure.

use crate::{abi::InterfaceDescription, address::Address, error::BoxError, route::UnitRoutes};
use std::future::Future;

/// A source artifact that can be published.
pub trait Artifact: Send + Sync {
    /// Name the unit is reported under.
    fn name(&self) -> &str;

    /// The interface the published unit will expose.
    fn interface(&self) -> &InterfaceDescription;
}

impl<A: Artifact + ?Sized> Artifact for &A {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn interface(&self) -> &InterfaceDescription {
        (**self).interface()
    }
}

/// Initializer arguments handed to the publish step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PublishArgs {
    /// No arguments. Used for every implementation unit.
    #[default]
    None,
    /// The per-unit route list a router front embeds at publish time.
    Routes(Vec<UnitRoutes>),
}

impl PublishArgs {
    /// Returns true if no arguments are passed.
    pub fn is_none(&self) -> bool {
        matches!(self, PublishArgs::None)
    }
}

/// The external publish step.
///
/// Each call is treated as one atomic, blocking operation: it either yields
/// the published address or fails. Retry policy, if any, lives here and not
/// in the orchestrator.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot publish artifacts",
    label = "missing `Publisher` implementation",
    note = "Implement `Publisher` with an `Artifact` source type."
)]
pub trait Publisher: Send + Sync {
    /// The artifact type this publisher accepts.
    type Source: Artifact;

    /// Publish `source` with `args`, returning its stable address.
    fn publish(
        &self,
        source: &Self::Source,
        args: &PublishArgs,
    ) -> impl Future<Output = Result<Address, BoxError>> + Send;
}

impl<P: Publisher + ?Sized> Publisher for &P {
    type Source = P::Source;

    fn publish(
        &self,
        source: &Self::Source,
        args: &PublishArgs,
    ) -> impl Future<Output = Result<Address, BoxError>> + Send {
        (**self).publish(source, args)
    }
}

impl<P: Publisher + ?Sized> Publisher for std::sync::Arc<P> {
    type Source = P::Source;

    fn publish(
        &self,
        source: &Self::Source,
        args: &PublishArgs,
    ) -> impl Future<Output = Result<Address, BoxError>> + Send {
        (**self).publish(source, args)
    }
}
