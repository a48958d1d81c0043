//! Policy store instructions - owner-gated mutators and read accessors

use crate::{state, Ownable, PolicyError};
use relaygate_common::abi::{self, Token};
use relaygate_common::interfaces::policy::{METHOD_STATUS_CHANGED, PREDICATE_SET, TARGET_STATUS_CHANGED};
use relaygate_common::{Address, Selector};
use relaygate_runtime::CallContext;
use tracing::info;

/// Grant or revoke every method on `target`
pub fn set_target_status(
    ctx: &mut CallContext<'_>,
    ownable: &Ownable,
    target: Address,
    allowed: bool,
) -> Result<(), PolicyError> {
    ownable.only_owner(ctx)?;

    state::store_allowed_target(ctx, &target, allowed);
    ctx.emit(
        TARGET_STATUS_CHANGED,
        &[target.to_word()],
        abi::encode(&[Token::Bool(allowed)]),
    );

    info!(%target, allowed, "target status updated");
    Ok(())
}

/// Grant or revoke one method on `target`. The predicate binding for the
/// pair is left as it is.
pub fn set_method_status(
    ctx: &mut CallContext<'_>,
    ownable: &Ownable,
    target: Address,
    selector: Selector,
    allowed: bool,
) -> Result<(), PolicyError> {
    ownable.only_owner(ctx)?;

    state::store_allowed_method(ctx, &target, &selector, allowed);
    ctx.emit(
        METHOD_STATUS_CHANGED,
        &[target.to_word(), selector.to_word()],
        abi::encode(&[Token::Bool(allowed)]),
    );

    info!(%target, %selector, allowed, "method status updated");
    Ok(())
}

/// Bind (or clear, with the zero address) the predicate for a pair.
///
/// The predicate address is not inspected; a non-conforming predicate only
/// shows up when a dispatch consults it.
pub fn set_predicate(
    ctx: &mut CallContext<'_>,
    ownable: &Ownable,
    target: Address,
    selector: Selector,
    predicate: Address,
) -> Result<(), PolicyError> {
    ownable.only_owner(ctx)?;

    state::store_predicate(ctx, &target, &selector, &predicate);
    ctx.emit(
        PREDICATE_SET,
        &[target.to_word(), selector.to_word()],
        abi::encode(&[Token::Address(predicate)]),
    );

    info!(%target, %selector, %predicate, "predicate bound");
    Ok(())
}

pub fn is_authorized(ctx: &CallContext<'_>, target: &Address, selector: &Selector) -> bool {
    state::allowed_target(ctx, target) || state::allowed_method(ctx, target, selector)
}

pub fn predicate_for(ctx: &CallContext<'_>, target: &Address, selector: &Selector) -> Address {
    state::predicate(ctx, target, selector)
}
