//! Fallback dispatch
//!
//! Every input that is not one of the gateway's own methods lands here. The
//! dispatcher reads the destination and policy once, asks the policy store
//! whether the (destination, selector) pair may be called, runs the bound
//! predicate on the method path and finally relays the untouched input and
//! value to the destination.

use crate::{state, GatewayError};
use lazy_static::lazy_static;
use relaygate_common::abi::{self, Token};
use relaygate_common::interfaces::{policy as policy_sig, predicate as predicate_sig};
use relaygate_common::{Address, Selector, Value};
use relaygate_runtime::{CallContext, Relay, Revert};
use tracing::{debug, info};

lazy_static! {
    static ref ALLOWED_TARGETS: Selector = Selector::from_signature(policy_sig::ALLOWED_TARGETS);
    static ref ALLOWED_METHODS: Selector = Selector::from_signature(policy_sig::ALLOWED_METHODS);
    static ref PREDICATE_FOR: Selector = Selector::from_signature(policy_sig::PREDICATE_FOR);
    static ref VALIDATE: Selector = Selector::from_signature(predicate_sig::VALIDATE);
}

/// A forwarded call, split into the key the policy is consulted with and
/// the argument bytes a predicate sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation<'a> {
    /// Empty input
    Receive,
    Method {
        selector: Selector,
        arguments: &'a [u8],
    },
}

impl<'a> Invocation<'a> {
    pub fn parse(input: &'a [u8]) -> Result<Self, GatewayError> {
        if input.is_empty() {
            return Ok(Invocation::Receive);
        }
        let selector = Selector::from_calldata(input).ok_or(GatewayError::MalformedInput)?;
        Ok(Invocation::Method {
            selector,
            arguments: &input[4..],
        })
    }

    /// Policy key; the receive path uses the reserved zero selector.
    pub fn selector(&self) -> Selector {
        match self {
            Invocation::Receive => Selector::RECEIVE,
            Invocation::Method { selector, .. } => *selector,
        }
    }

    pub fn arguments(&self) -> &'a [u8] {
        match self {
            Invocation::Receive => &[],
            Invocation::Method { arguments, .. } => *arguments,
        }
    }

    pub fn is_receive(&self) -> bool {
        matches!(self, Invocation::Receive)
    }

    /// Failure reported when the pair is not whitelisted
    fn unauthorized(&self) -> GatewayError {
        if self.is_receive() {
            GatewayError::InvalidTarget
        } else {
            GatewayError::Unauthorized
        }
    }
}

/// How a call was authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Destination is whitelisted as a whole; no predicate runs.
    Target,
    /// The (destination, selector) pair is whitelisted.
    Method { predicate: Option<Address> },
}

fn query<R: Relay>(relay: &mut R, policy: Address, calldata: &[u8]) -> Result<Vec<u8>, GatewayError> {
    relay
        .invoke(policy, calldata, 0)
        .map_err(GatewayError::Reverted)
}

fn query_bool<R: Relay>(relay: &mut R, policy: Address, calldata: &[u8]) -> Result<bool, GatewayError> {
    let output = query(relay, policy, calldata)?;
    abi::decode_bool(&output).map_err(GatewayError::MalformedPolicyResponse)
}

/// Decide whether `invocation` may reach `destination`.
pub fn authorize<R: Relay>(
    relay: &mut R,
    policy: Address,
    destination: Address,
    invocation: &Invocation<'_>,
) -> Result<Route, GatewayError> {
    let target_call = abi::encode_call(*ALLOWED_TARGETS, &[Token::Address(destination)]);
    if query_bool(relay, policy, &target_call)? {
        return Ok(Route::Target);
    }

    let pair = [
        Token::Address(destination),
        Token::Selector(invocation.selector()),
    ];
    let method_call = abi::encode_call(*ALLOWED_METHODS, &pair);
    if !query_bool(relay, policy, &method_call)? {
        return Err(invocation.unauthorized());
    }

    let predicate_call = abi::encode_call(*PREDICATE_FOR, &pair);
    let output = query(relay, policy, &predicate_call)?;
    let predicate = abi::decode_address(&output).map_err(GatewayError::MalformedPolicyResponse)?;
    Ok(Route::Method {
        predicate: (!predicate.is_zero()).then_some(predicate),
    })
}

/// Run `validate(arguments)` on a predicate contract.
pub fn check_predicate<R: Relay>(
    relay: &mut R,
    predicate: Address,
    arguments: &[u8],
) -> Result<(), GatewayError> {
    let calldata = abi::encode_call(*VALIDATE, &[Token::Bytes(arguments.to_vec())]);
    let verdict = match relay.invoke(predicate, &calldata, 0) {
        Ok(output) => abi::decode_bool(&output).unwrap_or(false),
        Err(revert) if revert.is_empty() => false,
        Err(revert) => return Err(GatewayError::Reverted(revert)),
    };
    debug!(%predicate, verdict, "predicate verdict");
    if verdict {
        Ok(())
    } else {
        Err(GatewayError::InvalidArguments)
    }
}

/// Authorize and relay `input` with `value` to `destination`.
pub fn forward<R: Relay>(
    relay: &mut R,
    policy: Address,
    destination: Address,
    input: &[u8],
    value: Value,
) -> Result<Vec<u8>, GatewayError> {
    if input.is_empty() && destination.is_zero() {
        return Err(GatewayError::InvalidTarget);
    }
    let invocation = Invocation::parse(input)?;
    if destination.is_zero() {
        return Err(GatewayError::Unauthorized);
    }

    let route = authorize(relay, policy, destination, &invocation)?;
    debug!(%destination, selector = %invocation.selector(), ?route, "call authorized");
    if let Route::Method {
        predicate: Some(predicate),
    } = route
    {
        check_predicate(relay, predicate, invocation.arguments())?;
    }

    info!(%destination, selector = %invocation.selector(), value, "relaying call");
    relay
        .invoke(destination, input, value)
        .map_err(GatewayError::Reverted)
}

/// Fallback entry point of the gateway contract.
pub fn fallback(ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
    let destination = state::destination(ctx);
    let policy = state::policy(ctx);
    let value = ctx.value();
    Ok(forward(ctx, policy, destination, input, value)?)
}
