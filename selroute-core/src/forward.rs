//! # Context-Preserving Forwarding
//!
//! The one platform capability a router front needs: run another unit's code
//! with the caller's identity, value and storage scope left untouched.
//!
//! Everything platform specific sits behind [`Forwarder`], so the router
//! itself stays a pure lookup over its table.

use crate::address::Address;
use thiserror::Error;

/// The execution context of an incoming call.
///
/// A router front passes this through unchanged: the target sees the
/// original caller and value, and reads and writes the router's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// Identity of the original caller.
    pub caller: Address,
    /// Value attached to the call.
    pub value: u128,
    /// Address whose storage the executing code operates on.
    pub storage: Address,
}

impl CallContext {
    /// A context for `caller` executing against `storage`, with no value.
    pub const fn new(caller: Address, storage: Address) -> Self {
        Self {
            caller,
            value: 0,
            storage,
        }
    }

    /// Attach a value.
    pub fn with_value(mut self, value: u128) -> Self {
        self.value = value;
        self
    }
}

/// Failure data returned by a target, relayed verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq, Default)]
#[error("call reverted with {} byte(s) of data", .data.len())]
pub struct Revert {
    /// Raw failure payload.
    pub data: Vec<u8>,
}

impl Revert {
    /// Create a revert carrying `data`.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }

    /// A revert with no data.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Executes a target's code in the caller's context.
///
/// # For Platform Integrations
///
/// Implement this over whatever primitive the execution environment offers
/// for delegated execution. The payload passed in is the complete original
/// call payload, selector included.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot forward calls",
    label = "missing `Forwarder` implementation",
    note = "Implement `Forwarder` over the platform's delegated-execution primitive."
)]
pub trait Forwarder: Send + Sync {
    /// Run `target`'s code against `ctx` with `payload` as input.
    fn forward(&self, target: Address, ctx: &CallContext, payload: &[u8]) -> Result<Vec<u8>, Revert>;
}

impl<F: Forwarder + ?Sized> Forwarder for &F {
    fn forward(&self, target: Address, ctx: &CallContext, payload: &[u8]) -> Result<Vec<u8>, Revert> {
        (**self).forward(target, ctx, payload)
    }
}

impl<F: Forwarder + ?Sized> Forwarder for std::sync::Arc<F> {
    fn forward(&self, target: Address, ctx: &CallContext, payload: &[u8]) -> Result<Vec<u8>, Revert> {
        (**self).forward(target, ctx, payload)
    }
}
