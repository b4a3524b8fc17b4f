//! # Dispatch Table
//!
//! A flat, collision-checked mapping from [`Selector`] to the [`Address`] of
//! the implementation unit that serves it.
//!
//! Tables are built once, from an ordered list of [`UnitRoutes`], and are
//! frozen afterwards: there is no mutation API on [`DispatchTable`]. Rebuild
//! from a new unit set to change routing.
//!
//! # Collisions
//!
//! A selector claimed by two different targets is a construction-time error,
//! never resolved by "last write wins". Re-inserting a selector for the
//! target that already owns it is a no-op.

use indexmap::{IndexMap, IndexSet, map::Entry};
use selroute_core::{Address, BuildError, DispatchEntry, Selector, UnitRoutes};

/// The frozen selector → target mapping held by a router front.
///
/// Iteration follows insertion order (unit encounter order, then extraction
/// order within a unit). Order is kept for reporting only; lookup does not
/// depend on it.
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    routes: IndexMap<Selector, Address>,
}

impl DispatchTable {
    /// A table with no routes. Every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from per-unit route groups.
    ///
    /// This is the form a router front receives when it is published.
    pub fn from_routes(routes: &[UnitRoutes]) -> Result<Self, BuildError> {
        build(routes)
    }

    /// Look up the target serving `selector`.
    pub fn lookup(&self, selector: &Selector) -> Option<Address> {
        self.routes.get(selector).copied()
    }

    /// Check if `selector` is routed.
    pub fn contains(&self, selector: &Selector) -> bool {
        self.routes.contains_key(selector)
    }

    /// Get the number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterate over routes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = DispatchEntry> + '_ {
        self.routes
            .iter()
            .map(|(selector, target)| DispatchEntry::new(*selector, *target))
    }

    /// All routes as a flat list, in insertion order.
    pub fn entries(&self) -> Vec<DispatchEntry> {
        self.iter().collect()
    }

    /// Distinct targets, in the order they first appear.
    pub fn targets(&self) -> Vec<Address> {
        let seen: IndexSet<Address> = self.routes.values().copied().collect();
        seen.into_iter().collect()
    }
}

// Order-sensitive: two tables are equal only if they were built from the
// same routes in the same order.
impl PartialEq for DispatchTable {
    fn eq(&self, other: &Self) -> bool {
        self.routes.iter().eq(other.routes.iter())
    }
}

impl Eq for DispatchTable {}

/// Incremental builder for a [`DispatchTable`].
///
/// # Example
/// ```
/// use selroute_core::{Address, Selector};
/// use selroute_std::table::DispatchTableBuilder;
///
/// let a = Address::from_bytes([0xaa; 20]);
/// let b = Address::from_bytes([0xbb; 20]);
/// let get = Selector::of_signature("get()");
///
/// let mut builder = DispatchTableBuilder::new();
/// builder.insert(get, a).unwrap();
/// builder.insert(get, a).unwrap(); // same target: no-op
/// assert!(builder.insert(get, b).is_err());
/// ```
#[derive(Debug, Default)]
pub struct DispatchTableBuilder {
    routes: IndexMap<Selector, Address>,
}

impl DispatchTableBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `selector` to `target`.
    ///
    /// Returns `Ok(true)` if the route is new, `Ok(false)` if the same route
    /// was already present.
    ///
    /// # Errors
    ///
    /// [`BuildError::SelectorCollision`] if `selector` is already routed to a
    /// different target.
    pub fn insert(&mut self, selector: Selector, target: Address) -> Result<bool, BuildError> {
        match self.routes.entry(selector) {
            Entry::Occupied(existing) if *existing.get() == target => Ok(false),
            Entry::Occupied(existing) => Err(BuildError::SelectorCollision {
                selector,
                first: *existing.get(),
                second: target,
            }),
            Entry::Vacant(slot) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(%selector, %target, "route added");
                slot.insert(target);
                Ok(true)
            }
        }
    }

    /// Add every selector of one unit, in order.
    pub fn extend_unit(&mut self, unit: &UnitRoutes) -> Result<(), BuildError> {
        for selector in &unit.selectors {
            self.insert(*selector, unit.address)?;
        }
        Ok(())
    }

    /// Get the number of routes added so far.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check if no routes were added.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Freeze the routes into a table.
    pub fn build(self) -> DispatchTable {
        DispatchTable {
            routes: self.routes,
        }
    }
}

/// Build a table from per-unit route groups, in input order.
///
/// The result is a pure function of the ordered input. On error no table is
/// produced.
pub fn build(units: &[UnitRoutes]) -> Result<DispatchTable, BuildError> {
    let mut builder = DispatchTableBuilder::new();
    for unit in units {
        builder.extend_unit(unit)?;
    }
    Ok(builder.build())
}
