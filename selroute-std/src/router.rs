//! # Router Front
//!
//! The published entry point. A [`RouterFront`] owns one frozen
//! [`DispatchTable`] and, for every incoming call, forwards the whole payload
//! to the unit registered for the payload's selector.
//!
//! Forwarding goes through a [`Forwarder`], so the target runs with the
//! original caller, value and storage scope. Whatever the target returns,
//! success or revert, is handed back unmodified.
//!
//! There is no fallback: a selector missing from the table fails with
//! [`DispatchError::UnknownSelector`] and nothing is forwarded.

use crate::table::DispatchTable;
use selroute_core::{Address, CallContext, DispatchError, Forwarder, Selector};

/// A published router front and its dispatch table.
///
/// Stateless across calls: each dispatch is an independent lookup followed by
/// one forwarded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterFront {
    address: Address,
    table: DispatchTable,
}

impl RouterFront {
    /// Create a router front at `address` owning `table`.
    pub fn new(address: Address, table: DispatchTable) -> Self {
        Self { address, table }
    }

    /// The router's stable address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The frozen dispatch table.
    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    /// A call context for `caller` against this router's storage.
    pub fn context_for(&self, caller: Address) -> CallContext {
        CallContext::new(caller, self.address)
    }

    /// Resolve the target for a call payload without forwarding it.
    pub fn resolve(&self, payload: &[u8]) -> Result<(Selector, Address), DispatchError> {
        let selector = Selector::from_payload(payload)
            .ok_or(DispatchError::PayloadTooShort { len: payload.len() })?;

        match self.table.lookup(&selector) {
            Some(target) => Ok((selector, target)),
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!(router = %self.address, %selector, "no route for selector");
                Err(DispatchError::UnknownSelector(selector))
            }
        }
    }

    /// Dispatch one incoming call.
    ///
    /// `ctx` is forwarded as-is; its `storage` is normally this router's
    /// address (see [`RouterFront::context_for`]).
    pub fn dispatch<F>(
        &self,
        forwarder: &F,
        ctx: &CallContext,
        payload: &[u8],
    ) -> Result<Vec<u8>, DispatchError>
    where
        F: Forwarder + ?Sized,
    {
        let (_selector, target) = self.resolve(payload)?;

        #[cfg(feature = "tracing")]
        tracing::trace!(router = %self.address, selector = %_selector, %target, "forwarding call");

        forwarder
            .forward(target, ctx, payload)
            .map_err(DispatchError::Reverted)
    }
}
