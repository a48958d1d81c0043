// Core predicate trait and the contract adapter
use lazy_static::lazy_static;
use relaygate_common::abi::{self, Decoder, Token};
use relaygate_common::interfaces::predicate::VALIDATE;
use relaygate_common::Selector;
use relaygate_runtime::{CallContext, Contract, Revert};
use tracing::debug;

lazy_static! {
    static ref VALIDATE_SELECTOR: Selector = Selector::from_signature(VALIDATE);
}

/// Predicates give a boolean verdict over the raw argument bytes of a call
/// (everything after the selector).
pub trait Predicate: Send + Sync {
    /// Decide whether `arguments` are acceptable
    fn validate(&self, arguments: &[u8]) -> bool;

    /// Get a human-readable description
    fn description(&self) -> &'static str {
        "Generic predicate"
    }
}

/// Exposes a [`Predicate`] at an address through `validate(bytes) -> bool`.
#[derive(Debug, Clone)]
pub struct PredicateContract<P> {
    predicate: P,
}

impl<P: Predicate> PredicateContract<P> {
    pub fn new(predicate: P) -> Self {
        Self { predicate }
    }

    pub fn predicate(&self) -> &P {
        &self.predicate
    }
}

impl<P: Predicate> Contract for PredicateContract<P> {
    fn execute(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Vec<u8>, Revert> {
        ctx.require_no_value()?;
        if Selector::from_calldata(input) != Some(*VALIDATE_SELECTOR) {
            return Err(Revert::empty());
        }
        let arguments = Decoder::new(&input[4..])
            .bytes()
            .map_err(|_| Revert::empty())?;

        let verdict = self.predicate.validate(&arguments);
        debug!(
            predicate = self.predicate.description(),
            arguments_len = arguments.len(),
            verdict,
            "predicate evaluated"
        );
        Ok(abi::encode(&[Token::Bool(verdict)]))
    }
}

/// Calldata for `validate(arguments)`.
pub fn validate_call(arguments: &[u8]) -> Vec<u8> {
    abi::encode_call(*VALIDATE_SELECTOR, &[Token::Bytes(arguments.to_vec())])
}
