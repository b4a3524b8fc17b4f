#![allow(dead_code)]

use selroute::testing::{SandboxArtifact, Storage, Word, word, word_to_u128};
use selroute::{
    AbiEntry, AbiParam, Address, CallContext, InterfaceDescription, Revert, Selector,
    unit_name_from_path,
};

pub const BASE_PATH: &str = "contracts/router-proxy/";

/// Storage slot layout shared by the controller and the view.
pub const SLOT_A: u64 = 0;
pub const SLOT_LAST_CALLER: u64 = 1;
pub const SLOT_LAST_VALUE: u64 = 2;

pub fn addr(byte: u8) -> Address {
    Address::from_bytes([byte; 20])
}

pub fn read_word(out: &[u8]) -> u128 {
    let mut w: Word = [0u8; 32];
    w.copy_from_slice(out);
    word_to_u128(&w)
}

fn caller_word(caller: &Address) -> Word {
    let mut w = [0u8; 32];
    w[12..].copy_from_slice(caller.as_bytes());
    w
}

// ============================================================================
// Controller
// ============================================================================

/// Writes loan state. Reverts `fail()` with a fixed message.
pub fn controller() -> SandboxArtifact {
    let iface = InterfaceDescription::new(vec![
        AbiEntry::function("create_loan", vec![]),
        AbiEntry::function("set_a", vec![AbiParam::named("value", "uint256")]),
        AbiEntry::function("fail", vec![]),
        AbiEntry::event("LoanCreated", vec![AbiParam::named("a", "uint256")]),
    ]);

    let create_loan = Selector::of_signature("create_loan()");
    let set_a = Selector::of_signature("set_a(uint256)");

    SandboxArtifact::unit(
        unit_name_from_path(format!("{BASE_PATH}controller.vy")),
        iface,
        move |ctx: &CallContext, storage: &mut Storage, payload: &[u8]| -> Result<Vec<u8>, Revert> {
            let selector = Selector::from_payload(payload).ok_or_else(Revert::empty)?;
            if selector == create_loan {
                let a = word_to_u128(&storage.load(SLOT_A)) + 1;
                storage.store(SLOT_A, word(a));
                storage.store(SLOT_LAST_CALLER, caller_word(&ctx.caller));
                storage.store(SLOT_LAST_VALUE, word(ctx.value));
                Ok(Vec::new())
            } else if selector == set_a {
                let arg = payload.get(4..36).ok_or_else(Revert::empty)?;
                let mut value = [0u8; 32];
                value.copy_from_slice(arg);
                storage.store(SLOT_A, value);
                Ok(Vec::new())
            } else {
                Err(Revert::new(b"loan rejected".to_vec()))
            }
        },
    )
}

// ============================================================================
// View
// ============================================================================

/// Reads what the controller wrote.
pub fn view() -> SandboxArtifact {
    let iface = InterfaceDescription::new(vec![
        AbiEntry::function("get_a", vec![])
            .with_mutability("view")
            .with_outputs(vec![AbiParam::new("uint256")]),
        AbiEntry::function("last_caller", vec![])
            .with_mutability("view")
            .with_outputs(vec![AbiParam::new("address")]),
        AbiEntry::function("last_value", vec![])
            .with_mutability("view")
            .with_outputs(vec![AbiParam::new("uint256")]),
    ]);

    let get_a = Selector::of_signature("get_a()");
    let last_caller = Selector::of_signature("last_caller()");

    SandboxArtifact::unit(
        unit_name_from_path(format!("{BASE_PATH}view.vy")),
        iface,
        move |_: &CallContext, storage: &mut Storage, payload: &[u8]| -> Result<Vec<u8>, Revert> {
            let selector = Selector::from_payload(payload).ok_or_else(Revert::empty)?;
            let slot = if selector == get_a {
                SLOT_A
            } else if selector == last_caller {
                SLOT_LAST_CALLER
            } else {
                SLOT_LAST_VALUE
            };
            Ok(storage.load(slot).to_vec())
        },
    )
}

// ============================================================================
// Misc artifacts
// ============================================================================

/// A unit whose only operation is `operation()`.
pub fn single(unit: &str, operation: &str) -> SandboxArtifact {
    SandboxArtifact::unit(
        unit,
        InterfaceDescription::new(vec![AbiEntry::function(operation, vec![])]),
        |_: &CallContext, _: &mut Storage, _: &[u8]| -> Result<Vec<u8>, Revert> {
            Ok(Vec::new())
        },
    )
}

pub fn proxy() -> SandboxArtifact {
    SandboxArtifact::router(unit_name_from_path(format!("{BASE_PATH}proxy.vy")))
}
