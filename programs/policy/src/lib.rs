//! Policy Store - Authorization decisions for the gateway
//!
//! Keeps three pieces of owner-controlled state, all keyed by destination
//! address:
//! - target whitelist: every method on the destination is allowed
//! - method whitelist: one (destination, selector) pair is allowed
//! - predicate bindings: an argument validator for a pair
//!
//! `isAuthorized(t, s) == allowedTargets[t] || allowedMethods[t][s]`. The
//! store never calls predicates itself; it only remembers where they live.

use lazy_static::lazy_static;
use relaygate_common::abi::{self, Decoder, Token};
use relaygate_common::interfaces::policy as sig;
use relaygate_common::{Address, Selector};
use relaygate_runtime::{CallContext, Contract, Revert};
use std::collections::HashMap;

pub mod access;
pub mod error;
pub mod instructions;
pub mod state;

pub use access::*;
pub use error::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    SetTargetStatus,
    SetMethodStatus,
    SetPredicate,
    IsAuthorized,
    PredicateFor,
    AllowedTargets,
    AllowedMethods,
}

lazy_static! {
    static ref METHODS: HashMap<Selector, Method> = [
        (sig::SET_TARGET_STATUS, Method::SetTargetStatus),
        (sig::SET_METHOD_STATUS, Method::SetMethodStatus),
        (sig::SET_PREDICATE, Method::SetPredicate),
        (sig::IS_AUTHORIZED, Method::IsAuthorized),
        (sig::PREDICATE_FOR, Method::PredicateFor),
        // Public mapping getter form of predicateFor
        (sig::PREDICATES, Method::PredicateFor),
        (sig::ALLOWED_TARGETS, Method::AllowedTargets),
        (sig::ALLOWED_METHODS, Method::AllowedMethods),
    ]
    .into_iter()
    .map(|(signature, method)| (Selector::from_signature(signature), method))
    .collect();
}

/// The policy store contract.
#[derive(Debug, Clone)]
pub struct PolicyStore {
    initial_owner: Address,
}

impl PolicyStore {
    pub fn new(owner: Address) -> Self {
        Self {
            initial_owner: owner,
        }
    }

    pub fn ownable() -> Ownable {
        Ownable::at_slot(state::OWNER_SLOT)
    }
}

impl Contract for PolicyStore {
    fn construct(&self, ctx: &mut CallContext<'_>) -> Result<(), Revert> {
        Self::ownable().initialize(ctx, self.initial_owner)?;
        Ok(())
    }

    fn execute(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        let selector = Selector::from_calldata(input).ok_or(PolicyError::UnknownMethod)?;
        let args = &input[4..];

        let ownable = Self::ownable();
        if let Some(result) = ownable.dispatch(ctx, selector, args) {
            return result;
        }

        let method = METHODS.get(&selector).copied().ok_or(PolicyError::UnknownMethod)?;
        if ctx.value() != 0 {
            return Err(PolicyError::NonPayable.into());
        }
        Ok(process(ctx, &ownable, method, args)?)
    }
}

fn process(
    ctx: &mut CallContext<'_>,
    ownable: &Ownable,
    method: Method,
    args: &[u8],
) -> Result<Vec<u8>, PolicyError> {
    let mut decoder = Decoder::new(args);

    match method {
        Method::SetTargetStatus => {
            let target = decoder.address()?;
            let allowed = decoder.bool()?;
            instructions::set_target_status(ctx, ownable, target, allowed)?;
            Ok(Vec::new())
        }
        Method::SetMethodStatus => {
            let target = decoder.address()?;
            let selector = decoder.selector()?;
            let allowed = decoder.bool()?;
            instructions::set_method_status(ctx, ownable, target, selector, allowed)?;
            Ok(Vec::new())
        }
        Method::SetPredicate => {
            let target = decoder.address()?;
            let selector = decoder.selector()?;
            let predicate = decoder.address()?;
            instructions::set_predicate(ctx, ownable, target, selector, predicate)?;
            Ok(Vec::new())
        }
        Method::IsAuthorized => {
            let target = decoder.address()?;
            let selector = decoder.selector()?;
            let authorized = instructions::is_authorized(ctx, &target, &selector);
            Ok(abi::encode(&[Token::Bool(authorized)]))
        }
        Method::PredicateFor => {
            let target = decoder.address()?;
            let selector = decoder.selector()?;
            let predicate = instructions::predicate_for(ctx, &target, &selector);
            Ok(abi::encode(&[Token::Address(predicate)]))
        }
        Method::AllowedTargets => {
            let target = decoder.address()?;
            Ok(abi::encode(&[Token::Bool(state::allowed_target(ctx, &target))]))
        }
        Method::AllowedMethods => {
            let target = decoder.address()?;
            let selector = decoder.selector()?;
            Ok(abi::encode(&[Token::Bool(state::allowed_method(
                ctx, &target, &selector,
            ))]))
        }
    }
}
