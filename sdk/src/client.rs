//! Typed clients for the gateway and the policy store
//!
//! Clients hold only an address; every call takes the [`Host`] it runs on.
//! Views read through [`Host::view`] and never change state. Sends fail with
//! [`SdkError::Reverted`] when the transaction reverts.

use crate::{SdkError, SdkResult};
use relaygate_common::abi::{self, Token};
use relaygate_common::interfaces::{gateway as gateway_sig, ownable, policy as policy_sig};
use relaygate_common::{Address, Selector, Value};
use relaygate_runtime::{Host, Receipt, Transaction};

/// Account used as `msg.sender` for read-only calls
const READER: Address = Address::ZERO;

fn view(host: &Host, to: Address, signature: &str, tokens: &[Token]) -> SdkResult<Vec<u8>> {
    let data = abi::encode_call(Selector::from_signature(signature), tokens);
    host.view(READER, to, &data).map_err(SdkError::Reverted)
}

fn send(
    host: &mut Host,
    from: Address,
    to: Address,
    signature: &str,
    tokens: &[Token],
) -> SdkResult<Receipt> {
    let data = abi::encode_call(Selector::from_signature(signature), tokens);
    into_result(host.transact(&Transaction::new(from, to).with_data(data)))
}

fn into_result(receipt: Receipt) -> SdkResult<Receipt> {
    match receipt.revert() {
        Some(revert) => Err(SdkError::Reverted(revert.clone())),
        None => Ok(receipt),
    }
}

/// Client for a deployed gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayClient {
    address: Address,
}

impl GatewayClient {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn target(&self, host: &Host) -> SdkResult<Address> {
        Ok(abi::decode_address(&view(host, self.address, gateway_sig::GET_TARGET, &[])?)?)
    }

    pub fn policy(&self, host: &Host) -> SdkResult<Address> {
        Ok(abi::decode_address(&view(host, self.address, gateway_sig::POLICY, &[])?)?)
    }

    pub fn owner(&self, host: &Host) -> SdkResult<Address> {
        Ok(abi::decode_address(&view(host, self.address, ownable::OWNER, &[])?)?)
    }

    pub fn set_target(&self, host: &mut Host, from: Address, target: Address) -> SdkResult<Receipt> {
        send(host, from, self.address, gateway_sig::SET_TARGET, &[Token::Address(target)])
    }

    pub fn transfer_ownership(&self, host: &mut Host, from: Address, new_owner: Address) -> SdkResult<Receipt> {
        send(host, from, self.address, ownable::TRANSFER_OWNERSHIP, &[Token::Address(new_owner)])
    }

    /// Send raw input and value through the gateway. The receipt is returned
    /// as is, reverted or not.
    pub fn forward(&self, host: &mut Host, from: Address, data: Vec<u8>, value: Value) -> Receipt {
        host.transact(
            &Transaction::new(from, self.address)
                .with_data(data)
                .with_value(value),
        )
    }

    /// Call `signature` on the destination through the gateway.
    pub fn call(&self, host: &mut Host, from: Address, signature: &str, tokens: &[Token]) -> SdkResult<Receipt> {
        send(host, from, self.address, signature, tokens)
    }
}

/// Client for a deployed policy store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyClient {
    address: Address,
}

impl PolicyClient {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self, host: &Host) -> SdkResult<Address> {
        Ok(abi::decode_address(&view(host, self.address, ownable::OWNER, &[])?)?)
    }

    pub fn is_authorized(&self, host: &Host, target: Address, selector: Selector) -> SdkResult<bool> {
        let output = view(
            host,
            self.address,
            policy_sig::IS_AUTHORIZED,
            &[Token::Address(target), Token::Selector(selector)],
        )?;
        Ok(abi::decode_bool(&output)?)
    }

    pub fn allowed_target(&self, host: &Host, target: Address) -> SdkResult<bool> {
        let output = view(host, self.address, policy_sig::ALLOWED_TARGETS, &[Token::Address(target)])?;
        Ok(abi::decode_bool(&output)?)
    }

    pub fn allowed_method(&self, host: &Host, target: Address, selector: Selector) -> SdkResult<bool> {
        let output = view(
            host,
            self.address,
            policy_sig::ALLOWED_METHODS,
            &[Token::Address(target), Token::Selector(selector)],
        )?;
        Ok(abi::decode_bool(&output)?)
    }

    /// Bound predicate, `None` when unbound
    pub fn predicate_for(&self, host: &Host, target: Address, selector: Selector) -> SdkResult<Option<Address>> {
        let output = view(
            host,
            self.address,
            policy_sig::PREDICATE_FOR,
            &[Token::Address(target), Token::Selector(selector)],
        )?;
        let predicate = abi::decode_address(&output)?;
        Ok((!predicate.is_zero()).then_some(predicate))
    }

    pub fn set_target_status(&self, host: &mut Host, from: Address, target: Address, allowed: bool) -> SdkResult<Receipt> {
        send(
            host,
            from,
            self.address,
            policy_sig::SET_TARGET_STATUS,
            &[Token::Address(target), Token::Bool(allowed)],
        )
    }

    pub fn set_method_status(
        &self,
        host: &mut Host,
        from: Address,
        target: Address,
        selector: Selector,
        allowed: bool,
    ) -> SdkResult<Receipt> {
        send(
            host,
            from,
            self.address,
            policy_sig::SET_METHOD_STATUS,
            &[Token::Address(target), Token::Selector(selector), Token::Bool(allowed)],
        )
    }

    pub fn set_predicate(
        &self,
        host: &mut Host,
        from: Address,
        target: Address,
        selector: Selector,
        predicate: Address,
    ) -> SdkResult<Receipt> {
        send(
            host,
            from,
            self.address,
            policy_sig::SET_PREDICATE,
            &[Token::Address(target), Token::Selector(selector), Token::Address(predicate)],
        )
    }

    pub fn transfer_ownership(&self, host: &mut Host, from: Address, new_owner: Address) -> SdkResult<Receipt> {
        send(host, from, self.address, ownable::TRANSFER_OWNERSHIP, &[Token::Address(new_owner)])
    }
}
