//! Test fixtures: a recording destination and a ready-made gateway setup

use crate::client::{GatewayClient, PolicyClient};
use lazy_static::lazy_static;
use relaygate_common::abi::{self, Decoder, Token};
use relaygate_common::{Address, Selector, Value};
use relaygate_gateway::{Gateway, GatewayConfig, PolicySource, TargetAuthority};
use relaygate_predicates::{AcceptEven, PredicateContract};
use relaygate_runtime::{CallContext, Contract, Host, Receipt, Revert};

pub const CALLED: &str = "Called(string)";

pub const FOO: &str = "foo(uint256)";
pub const BAR: &str = "bar(uint256,uint256)";
pub const FAIL: &str = "fail(string)";
pub const ECHO: &str = "echo(bytes)";
pub const REENTER: &str = "reenter(address,bytes)";

lazy_static! {
    static ref FOO_SELECTOR: Selector = Selector::from_signature(FOO);
    static ref BAR_SELECTOR: Selector = Selector::from_signature(BAR);
    static ref FAIL_SELECTOR: Selector = Selector::from_signature(FAIL);
    static ref ECHO_SELECTOR: Selector = Selector::from_signature(ECHO);
    static ref REENTER_SELECTOR: Selector = Selector::from_signature(REENTER);
}

/// Destination contract that records what reached it.
///
/// - `foo(uint256)`, `bar(uint256,uint256)` and plain value transfers emit
///   `Called("foo")`, `Called("bar")` and `Called("receive")`
/// - `fail(string)` reverts with the given reason
/// - `echo(bytes)` returns its argument bytes
/// - `reenter(address,bytes)` calls the address with the bytes and returns
///   or re-raises the outcome
/// - anything else reverts without data
#[derive(Debug, Clone, Copy, Default)]
pub struct Recorder;

impl Recorder {
    fn record(ctx: &mut CallContext<'_>, name: &str) -> Vec<u8> {
        ctx.emit(CALLED, &[], abi::encode(&[Token::String(name.to_string())]));
        Vec::new()
    }
}

impl Contract for Recorder {
    fn execute(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        let Some(selector) = Selector::from_calldata(input) else {
            return if input.is_empty() {
                Ok(Self::record(ctx, "receive"))
            } else {
                Err(Revert::empty())
            };
        };
        let mut args = Decoder::new(&input[4..]);

        if selector == *FOO_SELECTOR {
            Ok(Self::record(ctx, "foo"))
        } else if selector == *BAR_SELECTOR {
            Ok(Self::record(ctx, "bar"))
        } else if selector == *FAIL_SELECTOR {
            let reason = args.string().map_err(|_| Revert::empty())?;
            Err(Revert::with_reason(reason))
        } else if selector == *ECHO_SELECTOR {
            args.bytes().map_err(|_| Revert::empty())
        } else if selector == *REENTER_SELECTOR {
            let to = args.address().map_err(|_| Revert::empty())?;
            let data = args.bytes().map_err(|_| Revert::empty())?;
            ctx.call(to, 0, &data)
        } else {
            Err(Revert::empty())
        }
    }
}

/// Predicate-shaped contract that always reverts, with or without a reason.
#[derive(Debug, Clone, Default)]
pub struct Rejector {
    reason: Option<String>,
}

impl Rejector {
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }
}

impl Contract for Rejector {
    fn execute(&self, _ctx: &mut CallContext<'_>, _input: &[u8]) -> Result<Vec<u8>, Revert> {
        Err(self
            .reason
            .as_ref()
            .map_or_else(Revert::empty, |reason| Revert::with_reason(reason.as_str())))
    }
}

/// Names of the `Called(string)` events in a receipt, in order.
pub fn recorded_calls(receipt: &Receipt, recorder: Address) -> Vec<String> {
    receipt
        .events(recorder, CALLED)
        .filter_map(|log| Decoder::new(&log.data).string().ok())
        .collect()
}

/// Calldata for `signature` with `tokens`.
pub fn calldata(signature: &str, tokens: &[Token]) -> Vec<u8> {
    abi::encode_call(Selector::from_signature(signature), tokens)
}

/// A gateway with a fresh policy store pointed at a [`Recorder`].
#[derive(Debug)]
pub struct Fixture {
    pub host: Host,
    pub owner: Address,
    pub user: Address,
    pub gateway: GatewayClient,
    pub policy: PolicyClient,
    pub recorder: Address,
}

impl Fixture {
    pub fn new(authority: TargetAuthority) -> Self {
        Self::build(authority, true)
    }

    /// Same as [`Fixture::new`] with the destination left unset.
    pub fn without_target(authority: TargetAuthority) -> Self {
        Self::build(authority, false)
    }

    fn build(authority: TargetAuthority, with_target: bool) -> Self {
        let mut host = Host::default();
        let owner = Address::from_label("owner");
        let recorder = deploy(&mut host, owner, Recorder);
        let config = GatewayConfig {
            initial_target: if with_target { recorder } else { Address::ZERO },
            owner,
            target_authority: authority,
            policy: PolicySource::Deploy { owner },
        };
        let gateway = GatewayClient::new(deploy(&mut host, owner, Gateway::new(config)));
        let policy = match gateway.policy(&host) {
            Ok(policy) => PolicyClient::new(policy),
            Err(err) => panic!("fixture policy lookup failed: {err}"),
        };

        Self {
            host,
            owner,
            user: Address::from_label("user"),
            gateway,
            policy,
            recorder,
        }
    }

    pub fn deploy(&mut self, contract: impl Contract + 'static) -> Address {
        deploy(&mut self.host, self.owner, contract)
    }

    pub fn even_predicate(&mut self) -> Address {
        self.deploy(PredicateContract::new(AcceptEven))
    }

    /// Set the method bit for `selector` on the recorder.
    pub fn allow_method(&mut self, selector: Selector, allowed: bool) {
        self.expect_ok(|fx| {
            fx.policy
                .set_method_status(&mut fx.host, fx.owner, fx.recorder, selector, allowed)
        });
    }

    pub fn allow_target(&mut self, target: Address, allowed: bool) {
        self.expect_ok(|fx| fx.policy.set_target_status(&mut fx.host, fx.owner, target, allowed));
    }

    pub fn bind_predicate(&mut self, selector: Selector, predicate: Address) {
        self.expect_ok(|fx| {
            fx.policy
                .set_predicate(&mut fx.host, fx.owner, fx.recorder, selector, predicate)
        });
    }

    /// Forward input from the user account.
    pub fn call(&mut self, data: Vec<u8>) -> Receipt {
        self.gateway.forward(&mut self.host, self.user, data, 0)
    }

    /// Forward a plain value transfer from the user account.
    pub fn send_value(&mut self, value: Value) -> Receipt {
        let balance = self.host.balance(&self.user);
        self.host.set_balance(self.user, balance.saturating_add(value));
        self.gateway.forward(&mut self.host, self.user, Vec::new(), value)
    }

    fn expect_ok<T, E: std::fmt::Display>(&mut self, op: impl FnOnce(&mut Self) -> Result<T, E>) {
        if let Err(err) = op(self) {
            panic!("fixture setup failed: {err}");
        }
    }
}

fn deploy(host: &mut Host, deployer: Address, contract: impl Contract + 'static) -> Address {
    match host.deploy(deployer, contract) {
        Ok(address) => address,
        Err(err) => panic!("fixture deployment failed: {err}"),
    }
}
