//! Route records shared by the table builder, the orchestrator and publishers.

use crate::{address::Address, selector::Selector};
use std::fmt;

/// A single `(selector, target)` pair of a dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DispatchEntry {
    /// The call selector.
    pub selector: Selector,
    /// Address of the implementation unit serving it.
    pub target: Address,
}

impl DispatchEntry {
    /// Create a new entry.
    pub const fn new(selector: Selector, target: Address) -> Self {
        Self { selector, target }
    }
}

impl fmt::Display for DispatchEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.selector, self.target)
    }
}

/// The selectors one implementation unit contributes, in extraction order.
///
/// This is the per-unit form a router front receives at publish time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRoutes {
    /// Address of the implementation unit.
    pub address: Address,
    /// Selectors it serves.
    pub selectors: Vec<Selector>,
}

impl UnitRoutes {
    /// Create a new route group.
    pub fn new(address: Address, selectors: impl IntoIterator<Item = Selector>) -> Self {
        Self {
            address,
            selectors: selectors.into_iter().collect(),
        }
    }

    /// Flatten into `(selector, target)` pairs.
    pub fn entries(&self) -> impl Iterator<Item = DispatchEntry> + '_ {
        self.selectors
            .iter()
            .map(|s| DispatchEntry::new(*s, self.address))
    }
}
