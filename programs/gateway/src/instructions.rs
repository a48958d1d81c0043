//! Gateway instructions - own methods

use crate::{state, GatewayError, TargetAuthority};
use relaygate_common::interfaces::gateway::TARGET_CHANGED;
use relaygate_common::Address;
use relaygate_policy::Ownable;
use relaygate_runtime::CallContext;
use tracing::info;

/// Replace the destination. The zero address unsets it; policy state is
/// left alone.
pub fn set_target(
    ctx: &mut CallContext<'_>,
    authority: TargetAuthority,
    ownable: &Ownable,
    new_target: Address,
) -> Result<(), GatewayError> {
    if authority == TargetAuthority::Owner {
        ownable.only_owner(ctx)?;
    }

    let previous = state::destination(ctx);
    state::store_destination(ctx, new_target);
    ctx.emit(
        TARGET_CHANGED,
        &[previous.to_word(), new_target.to_word()],
        Vec::new(),
    );

    info!(gateway = %ctx.address(), %previous, current = %new_target, "destination changed");
    Ok(())
}

pub fn get_target(ctx: &CallContext<'_>) -> Address {
    state::destination(ctx)
}

pub fn policy(ctx: &CallContext<'_>) -> Address {
    state::policy(ctx)
}
