//! Gateway state - storage layout
//!
//! | slot | contents |
//! |------|----------|
//! | 0 | owner |
//! | 1 | destination |
//! | 2 | policy store |

use relaygate_common::storage::slot;
use relaygate_common::Address;
use relaygate_runtime::CallContext;

pub const OWNER_SLOT: u64 = 0;
pub const DESTINATION_SLOT: u64 = 1;
pub const POLICY_SLOT: u64 = 2;

fn load_address(ctx: &CallContext<'_>, index: u64) -> Address {
    Address::from_word(&ctx.sload(&slot(index))).unwrap_or(Address::ZERO)
}

pub fn destination(ctx: &CallContext<'_>) -> Address {
    load_address(ctx, DESTINATION_SLOT)
}

pub fn store_destination(ctx: &mut CallContext<'_>, destination: Address) {
    ctx.sstore(slot(DESTINATION_SLOT), destination.to_word());
}

pub fn policy(ctx: &CallContext<'_>) -> Address {
    load_address(ctx, POLICY_SLOT)
}

pub fn store_policy(ctx: &mut CallContext<'_>, policy: Address) {
    ctx.sstore(slot(POLICY_SLOT), policy.to_word());
}
