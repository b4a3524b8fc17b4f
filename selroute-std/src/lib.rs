//! # selroute-std
//!
//! Standard implementations for the selroute call router.
//!
//! This crate provides:
//! - **Interface extraction**: [`interface::extract`], [`interface::selectors`]
//! - **Dispatch tables**: [`table::DispatchTable`], [`table::DispatchTableBuilder`]
//! - **Router fronts**: [`router::RouterFront`]
//! - **Deployment**: [`orchestrator::Orchestrator`]
//! - **Testing**: an in-memory [`testing::Sandbox`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use selroute_core;

// Modules
pub mod interface;
pub mod orchestrator;
pub mod router;
pub mod table;
pub mod testing;
