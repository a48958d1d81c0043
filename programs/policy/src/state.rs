//! Policy store state - storage layout
//!
//! | slot | contents |
//! |------|----------|
//! | 0 | owner |
//! | 1 | `allowedTargets[target] -> bool` |
//! | 2 | `allowedMethods[target][selector] -> bool` |
//! | 3 | `predicates[target][selector] -> address` |

use relaygate_common::storage::{mapping_slot, slot};
use relaygate_common::{abi, Address, Selector, Word};
use relaygate_runtime::CallContext;

pub const OWNER_SLOT: u64 = 0;
pub const ALLOWED_TARGETS_SLOT: u64 = 1;
pub const ALLOWED_METHODS_SLOT: u64 = 2;
pub const PREDICATES_SLOT: u64 = 3;

pub fn allowed_target_slot(target: &Address) -> Word {
    mapping_slot(&slot(ALLOWED_TARGETS_SLOT), &target.to_word())
}

pub fn allowed_method_slot(target: &Address, selector: &Selector) -> Word {
    let inner = mapping_slot(&slot(ALLOWED_METHODS_SLOT), &target.to_word());
    mapping_slot(&inner, &selector.to_word())
}

pub fn predicate_slot(target: &Address, selector: &Selector) -> Word {
    let inner = mapping_slot(&slot(PREDICATES_SLOT), &target.to_word());
    mapping_slot(&inner, &selector.to_word())
}

pub fn allowed_target(ctx: &CallContext<'_>, target: &Address) -> bool {
    ctx.sload(&allowed_target_slot(target)) != [0u8; 32]
}

pub fn allowed_method(ctx: &CallContext<'_>, target: &Address, selector: &Selector) -> bool {
    ctx.sload(&allowed_method_slot(target, selector)) != [0u8; 32]
}

pub fn predicate(ctx: &CallContext<'_>, target: &Address, selector: &Selector) -> Address {
    Address::from_word(&ctx.sload(&predicate_slot(target, selector))).unwrap_or(Address::ZERO)
}

pub fn store_allowed_target(ctx: &mut CallContext<'_>, target: &Address, allowed: bool) {
    ctx.sstore(allowed_target_slot(target), abi::bool_word(allowed));
}

pub fn store_allowed_method(ctx: &mut CallContext<'_>, target: &Address, selector: &Selector, allowed: bool) {
    ctx.sstore(allowed_method_slot(target, selector), abi::bool_word(allowed));
}

pub fn store_predicate(ctx: &mut CallContext<'_>, target: &Address, selector: &Selector, predicate: &Address) {
    ctx.sstore(predicate_slot(target, selector), predicate.to_word());
}
