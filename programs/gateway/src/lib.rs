//! Relaygate Gateway - Policy-gated call forwarding
//!
//! The gateway owns one destination address and a policy store reference.
//! Its own methods (`setTarget`, `getTarget`, `policy`, `owner`,
//! `transferOwnership`) are served directly; every other input, including
//! empty input, goes through [`dispatch::fallback`], which authorizes the
//! call against the policy store and relays it unchanged.

use lazy_static::lazy_static;
use relaygate_common::abi::{self, Decoder, Token};
use relaygate_common::interfaces::gateway as sig;
use relaygate_common::{Address, Selector};
use relaygate_policy::{Ownable, PolicyStore};
use relaygate_runtime::{CallContext, Contract, Revert};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

pub mod dispatch;
pub mod error;
pub mod instructions;
pub mod state;

pub use dispatch::{Invocation, Route};
pub use error::*;

/// Who may call `setTarget`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetAuthority {
    /// No check; whitelisting alone bounds what can be reached.
    #[default]
    Anyone,
    Owner,
}

/// Where the gateway's policy store comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicySource {
    /// An existing store
    Attach(Address),
    /// A fresh store created by the gateway's constructor
    Deploy { owner: Address },
}

/// Construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub initial_target: Address,
    pub owner: Address,
    #[serde(default)]
    pub target_authority: TargetAuthority,
    pub policy: PolicySource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    SetTarget,
    GetTarget,
    Policy,
}

lazy_static! {
    static ref METHODS: HashMap<Selector, Method> = [
        (sig::SET_TARGET, Method::SetTarget),
        (sig::GET_TARGET, Method::GetTarget),
        (sig::POLICY, Method::Policy),
    ]
    .into_iter()
    .map(|(signature, method)| (Selector::from_signature(signature), method))
    .collect();
}

/// The gateway contract.
#[derive(Debug, Clone)]
pub struct Gateway {
    config: GatewayConfig,
}

impl Gateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn ownable() -> Ownable {
        Ownable::at_slot(state::OWNER_SLOT)
    }

    fn resolve_policy(&self, ctx: &mut CallContext<'_>) -> Result<Address, Revert> {
        match self.config.policy {
            PolicySource::Attach(policy) if policy.is_zero() => Err(GatewayError::InvalidPolicy.into()),
            PolicySource::Attach(policy) => Ok(policy),
            PolicySource::Deploy { owner } => ctx.create(Arc::new(PolicyStore::new(owner)), 0),
        }
    }

    fn process(
        &self,
        ctx: &mut CallContext<'_>,
        ownable: &Ownable,
        method: Method,
        args: &[u8],
    ) -> Result<Vec<u8>, GatewayError> {
        match method {
            Method::SetTarget => {
                let target = Decoder::new(args).address()?;
                instructions::set_target(ctx, self.config.target_authority, ownable, target)?;
                Ok(Vec::new())
            }
            Method::GetTarget => Ok(abi::encode(&[Token::Address(instructions::get_target(ctx))])),
            Method::Policy => Ok(abi::encode(&[Token::Address(instructions::policy(ctx))])),
        }
    }
}

impl Contract for Gateway {
    fn construct(&self, ctx: &mut CallContext<'_>) -> Result<(), Revert> {
        Self::ownable().initialize(ctx, self.config.owner)?;
        let policy = self.resolve_policy(ctx)?;
        state::store_policy(ctx, policy);
        state::store_destination(ctx, self.config.initial_target);

        info!(
            gateway = %ctx.address(),
            %policy,
            destination = %self.config.initial_target,
            authority = ?self.config.target_authority,
            "gateway constructed"
        );
        Ok(())
    }

    fn execute(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        if let Some(selector) = Selector::from_calldata(input) {
            let args = &input[4..];
            let ownable = Self::ownable();
            if let Some(result) = ownable.dispatch(ctx, selector, args) {
                return result;
            }
            if let Some(method) = METHODS.get(&selector).copied() {
                if ctx.value() != 0 {
                    return Err(GatewayError::NonPayable.into());
                }
                return Ok(self.process(ctx, &ownable, method, args)?);
            }
        }
        dispatch::fallback(ctx, input)
    }
}
