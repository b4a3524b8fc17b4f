//! Testing utilities for selroute.
//!
//! This module provides an in-memory execution environment so routers can be
//! deployed and called without a real platform behind them.
//!
//! # Features
//!
//! - [`Sandbox`]: implements both [`Publisher`] and [`Forwarder`]; published
//!   units are plain Rust [`Module`]s, published routers are live
//!   [`RouterFront`]s that forward back into the sandbox
//! - [`SandboxArtifact`]: the source type the sandbox publishes
//! - [`RecordingForwarder`]: a forwarder that records every call it receives
//! - [`calldata`], [`word`], [`word_to_u128`]: payload helpers

use crate::{router::RouterFront, table::DispatchTable};
use selroute_core::{
    AbiEntry, AbiParam, Address, Artifact, BoxError, CallContext, DispatchError, Forwarder,
    InterfaceDescription, PublishArgs, Publisher, Revert, Selector,
};
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

/// A 32-byte storage word.
pub type Word = [u8; 32];

/// Encode `value` as a big-endian word.
pub fn word(value: u128) -> Word {
    let mut out = [0u8; 32];
    out[16..].copy_from_slice(&value.to_be_bytes());
    out
}

/// Decode the low 16 bytes of a big-endian word.
pub fn word_to_u128(word: &Word) -> u128 {
    let mut low = [0u8; 16];
    low.copy_from_slice(&word[16..]);
    u128::from_be_bytes(low)
}

/// Build a call payload: the selector of `signature` followed by `args`.
pub fn calldata(signature: &str, args: &[Word]) -> Vec<u8> {
    let mut data = Selector::of_signature(signature).as_bytes().to_vec();
    for arg in args {
        data.extend_from_slice(arg);
    }
    data
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Storage and Modules
// ============================================================================

/// Word-addressed storage of one address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Storage {
    slots: HashMap<u64, Word>,
}

impl Storage {
    /// Read a slot; unset slots read as zero.
    pub fn load(&self, slot: u64) -> Word {
        self.slots.get(&slot).copied().unwrap_or([0u8; 32])
    }

    /// Write a slot.
    pub fn store(&mut self, slot: u64, value: Word) {
        self.slots.insert(slot, value);
    }
}

/// Executable code of a sandbox implementation unit.
///
/// `storage` belongs to `ctx.storage`, which under a router front is the
/// router's address, not the unit's.
pub trait Module: Send + Sync {
    /// Run the module against `payload`.
    fn execute(
        &self,
        ctx: &CallContext,
        storage: &mut Storage,
        payload: &[u8],
    ) -> Result<Vec<u8>, Revert>;
}

impl<F> Module for F
where
    F: Fn(&CallContext, &mut Storage, &[u8]) -> Result<Vec<u8>, Revert> + Send + Sync,
{
    fn execute(
        &self,
        ctx: &CallContext,
        storage: &mut Storage,
        payload: &[u8],
    ) -> Result<Vec<u8>, Revert> {
        self(ctx, storage, payload)
    }
}

// ============================================================================
// Artifacts
// ============================================================================

#[derive(Clone)]
enum ArtifactCode {
    Unit(Arc<dyn Module>),
    Router,
}

/// A source artifact the [`Sandbox`] can publish.
#[derive(Clone)]
pub struct SandboxArtifact {
    name: String,
    interface: InterfaceDescription,
    code: ArtifactCode,
}

impl SandboxArtifact {
    /// An implementation unit backed by `module`.
    pub fn unit(
        name: impl Into<String>,
        interface: InterfaceDescription,
        module: impl Module + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            interface,
            code: ArtifactCode::Unit(Arc::new(module)),
        }
    }

    /// A router front. Its initializer takes the `(address,bytes4[])[]` route list.
    pub fn router(name: impl Into<String>) -> Self {
        let routes = AbiParam::tuple(
            "[]",
            vec![
                AbiParam::named("target", "address"),
                AbiParam::named("selectors", "bytes4[]"),
            ],
        );
        Self {
            name: name.into(),
            interface: InterfaceDescription::new(vec![AbiEntry::constructor(vec![routes])]),
            code: ArtifactCode::Router,
        }
    }
}

impl std::fmt::Debug for SandboxArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.code {
            ArtifactCode::Unit(_) => "unit",
            ArtifactCode::Router => "router",
        };
        f.debug_struct("SandboxArtifact")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}

impl Artifact for SandboxArtifact {
    fn name(&self) -> &str {
        &self.name
    }

    fn interface(&self) -> &InterfaceDescription {
        &self.interface
    }
}

// ============================================================================
// Sandbox
// ============================================================================

#[derive(Clone)]
enum Deployed {
    Unit(Arc<dyn Module>),
    Router(Arc<RouterFront>),
}

#[derive(Default)]
struct State {
    nonce: u64,
    code: HashMap<Address, Deployed>,
    storage: HashMap<Address, Storage>,
    failing: HashSet<String>,
}

/// An in-memory platform: publishes artifacts and executes calls.
///
/// Addresses are assigned deterministically from a publish counter, so two
/// sandboxes fed the same artifacts in the same order hand out the same
/// addresses.
///
/// # Example
///
/// ```rust,ignore
/// let sandbox = Sandbox::new();
/// let deployment = Orchestrator::new(&sandbox)
///     .orchestrate(&[controller, view], &SandboxArtifact::router("proxy"))
///     .await?;
///
/// let router = deployment.router().address();
/// sandbox.call(router, caller, 0, &calldata("create_loan()", &[]))?;
/// ```
#[derive(Default)]
pub struct Sandbox {
    state: Mutex<State>,
}

impl Sandbox {
    /// Create an empty sandbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later publish of the artifact named `name` fail.
    pub fn fail_publish(&self, name: impl Into<String>) {
        lock(&self.state).failing.insert(name.into());
    }

    /// Number of successful publishes so far.
    pub fn published_count(&self) -> usize {
        lock(&self.state).code.len()
    }

    /// Check if anything is published at `address`.
    pub fn is_published(&self, address: Address) -> bool {
        lock(&self.state).code.contains_key(&address)
    }

    /// The router front published at `address`, if any.
    pub fn router_at(&self, address: Address) -> Option<Arc<RouterFront>> {
        match lock(&self.state).code.get(&address) {
            Some(Deployed::Router(front)) => Some(Arc::clone(front)),
            _ => None,
        }
    }

    /// Read a storage slot of `owner`.
    pub fn storage_at(&self, owner: Address, slot: u64) -> Word {
        lock(&self.state)
            .storage
            .get(&owner)
            .map_or([0u8; 32], |s| s.load(slot))
    }

    /// Call `to` as `caller`, attaching `value`.
    ///
    /// Router fronts dispatch the payload; units execute it against their
    /// own storage. Calling an empty address reverts with no data.
    pub fn call(
        &self,
        to: Address,
        caller: Address,
        value: u128,
        payload: &[u8],
    ) -> Result<Vec<u8>, DispatchError> {
        let deployed = lock(&self.state).code.get(&to).cloned();
        let ctx = CallContext::new(caller, to).with_value(value);

        match deployed {
            Some(Deployed::Router(front)) => front.dispatch(self, &ctx, payload),
            Some(Deployed::Unit(module)) => self
                .execute(&module, &ctx, payload)
                .map_err(DispatchError::Reverted),
            None => Err(DispatchError::Reverted(Revert::empty())),
        }
    }

    fn execute(
        &self,
        module: &Arc<dyn Module>,
        ctx: &CallContext,
        payload: &[u8],
    ) -> Result<Vec<u8>, Revert> {
        let mut state = lock(&self.state);
        let storage = state.storage.entry(ctx.storage).or_default();
        module.execute(ctx, storage, payload)
    }

    fn next_address(state: &mut State) -> Address {
        state.nonce += 1;
        let mut bytes = [0u8; 20];
        bytes[0] = 0xc0;
        bytes[12..].copy_from_slice(&state.nonce.to_be_bytes());
        Address::from_bytes(bytes)
    }
}

impl Publisher for Sandbox {
    type Source = SandboxArtifact;

    async fn publish(
        &self,
        source: &SandboxArtifact,
        args: &PublishArgs,
    ) -> Result<Address, BoxError> {
        let mut state = lock(&self.state);
        if state.failing.contains(&source.name) {
            return Err(format!("publish of `{}` rejected", source.name).into());
        }

        let deployed = match (&source.code, args) {
            (ArtifactCode::Unit(module), PublishArgs::None) => Deployed::Unit(Arc::clone(module)),
            (ArtifactCode::Unit(_), PublishArgs::Routes(_)) => {
                return Err("implementation units take no initializer arguments".into());
            }
            (ArtifactCode::Router, PublishArgs::Routes(routes)) => {
                let table = DispatchTable::from_routes(routes)?;
                let address = Self::next_address(&mut state);
                state
                    .code
                    .insert(address, Deployed::Router(Arc::new(RouterFront::new(address, table))));
                return Ok(address);
            }
            (ArtifactCode::Router, PublishArgs::None) => {
                return Err("router requires its route list".into());
            }
        };

        let address = Self::next_address(&mut state);
        state.code.insert(address, deployed);
        Ok(address)
    }
}

impl Forwarder for Sandbox {
    fn forward(
        &self,
        target: Address,
        ctx: &CallContext,
        payload: &[u8],
    ) -> Result<Vec<u8>, Revert> {
        let module = match lock(&self.state).code.get(&target) {
            Some(Deployed::Unit(module)) => Arc::clone(module),
            _ => return Err(Revert::empty()),
        };
        self.execute(&module, ctx, payload)
    }
}

// ============================================================================
// Recording Forwarder
// ============================================================================

/// One call seen by a [`RecordingForwarder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedCall {
    /// Target the call was forwarded to.
    pub target: Address,
    /// Context it was forwarded with.
    pub ctx: CallContext,
    /// Payload as forwarded.
    pub payload: Vec<u8>,
}

/// A forwarder that records every call and answers with a fixed result.
///
/// # Example
///
/// ```rust,ignore
/// let forwarder = RecordingForwarder::replying(b"ok".to_vec());
/// router.dispatch(&forwarder, &ctx, &payload)?;
/// assert_eq!(forwarder.calls()[0].target, expected);
/// ```
pub struct RecordingForwarder {
    calls: Mutex<Vec<ForwardedCall>>,
    reply: Result<Vec<u8>, Revert>,
}

impl RecordingForwarder {
    /// Answer every call with `data`.
    pub fn replying(data: Vec<u8>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Ok(data),
        }
    }

    /// Fail every call with `revert`.
    pub fn reverting(revert: Revert) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Err(revert),
        }
    }

    /// Get a clone of the recorded calls.
    pub fn calls(&self) -> Vec<ForwardedCall> {
        lock(&self.calls).clone()
    }

    /// Get the number of recorded calls.
    pub fn count(&self) -> usize {
        lock(&self.calls).len()
    }
}

impl Forwarder for RecordingForwarder {
    fn forward(
        &self,
        target: Address,
        ctx: &CallContext,
        payload: &[u8],
    ) -> Result<Vec<u8>, Revert> {
        lock(&self.calls).push(ForwardedCall {
            target,
            ctx: *ctx,
            payload: payload.to_vec(),
        });
        self.reply.clone()
    }
}

// ============================================================================
// Log Capture
// ============================================================================

#[cfg(all(test, feature = "tracing"))]
pub(crate) use log_capture::CapturedLogs;
