//! # selroute-core
//!
//! Core types and collaborator traits for the selroute call router.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! platform integrations (publishers, forwarders) that don't need the full
//! `selroute-std` implementation.
//!
//! # The Dispatch Model
//!
//! A router front is a single stable address that forwards each incoming call
//! to one of several implementation units, chosen purely by the call's
//! selector:
//!
//! ## Selectors ([`Selector`])
//!
//! Four bytes of Keccak-256 over an operation's canonical signature
//! `name(type1,type2,...)`. Pure and deterministic.
//!
//! ## Interfaces ([`InterfaceDescription`])
//!
//! The JSON ABI a unit publishes. Function entries become [`Signature`]
//! records; initializers and non-callable entries are skipped.
//!
//! ## Routes ([`DispatchEntry`], [`UnitRoutes`])
//!
//! The flat `(selector, target)` mapping and its per-unit form.
//!
//! ## Collaborators ([`Publisher`], [`Forwarder`])
//!
//! The two platform seams: publishing an artifact to obtain its address, and
//! executing a target's code in the caller's context.
//!
//! # Error Types
//!
//! - [`SelrouteError`] - Top-level error type
//! - [`InterfaceError`] - Malformed interface descriptions
//! - [`BuildError`] - Selector collisions
//! - [`DispatchError`] - Runtime dispatch failures
//! - [`OrchestrationError`] - Deployment failures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod abi;
mod address;
mod error;
mod forward;
pub mod grammar;
mod publish;
mod route;
mod selector;

// Re-exports
pub use abi::{AbiEntry, AbiParam, EntryKind, InterfaceDescription};
pub use address::{ADDRESS_LEN, Address, AddressParseError};
pub use error::{
    BoxError, BuildError, DispatchError, InterfaceError, OrchestrationError, SelrouteError,
};
pub use forward::{CallContext, Forwarder, Revert};
pub use publish::{Artifact, PublishArgs, Publisher};
pub use route::{DispatchEntry, UnitRoutes};
pub use selector::{
    SELECTOR_LEN, Selector, SelectorParseError, Signature, SignatureParseError,
    canonical_signature,
};
