//! Host: owns the world and applies transactions one at a time

use crate::contract::{execute_call, execute_create, Frame};
use crate::world::World;
use crate::{Contract, HostConfig, HostError, Log, Result, Revert};
use relaygate_common::{Address, Value, Word};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// An external invocation submitted by an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub from: Address,
    pub to: Address,
    pub value: Value,
    pub data: Vec<u8>,
}

impl Transaction {
    pub fn new(from: Address, to: Address) -> Self {
        Self {
            from,
            to,
            value: 0,
            data: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }
}

/// Result of an applied transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub outcome: std::result::Result<Vec<u8>, Revert>,
    /// Logs emitted by the transaction; always empty when it reverted
    pub logs: Vec<Log>,
}

impl Receipt {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn output(&self) -> Option<&[u8]> {
        self.outcome.as_ref().ok().map(Vec::as_slice)
    }

    pub fn revert(&self) -> Option<&Revert> {
        self.outcome.as_ref().err()
    }

    pub fn revert_reason(&self) -> Option<String> {
        self.revert().and_then(Revert::reason)
    }

    /// Logs of the event `signature` emitted by `address`.
    pub fn events<'a>(
        &'a self,
        address: Address,
        signature: &'a str,
    ) -> impl Iterator<Item = &'a Log> + 'a {
        self.logs
            .iter()
            .filter(move |log| log.address == address && log.is_event(signature))
    }
}

/// Sequential execution environment.
///
/// Transactions are applied in submission order and never interleave. A
/// reverted transaction restores the world exactly as it was before.
#[derive(Debug, Default)]
pub struct Host {
    world: World,
    config: HostConfig,
}

impl Host {
    pub fn new(config: HostConfig) -> Result<Self> {
        if config.max_call_depth == 0 {
            return Err(HostError::InvalidConfiguration(
                "max_call_depth must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            world: World::default(),
            config,
        })
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Credit an account out of thin air.
    pub fn set_balance(&mut self, address: Address, balance: Value) {
        self.world.account_mut(address).balance = balance;
    }

    pub fn balance(&self, address: &Address) -> Value {
        self.world.balance(address)
    }

    pub fn has_code(&self, address: &Address) -> bool {
        self.world.code(address).is_some()
    }

    pub fn storage_at(&self, address: &Address, slot: &Word) -> Word {
        self.world.sload(address, slot)
    }

    /// Copy of an account's non-zero storage.
    pub fn storage(&self, address: &Address) -> BTreeMap<Word, Word> {
        self.world
            .account(address)
            .map(|account| account.storage.clone())
            .unwrap_or_default()
    }

    /// Every log committed so far, in order.
    pub fn logs(&self) -> &[Log] {
        self.world.logs()
    }

    /// Create `contract` with `deployer` as creator and run its constructor.
    pub fn deploy(&mut self, deployer: Address, contract: impl Contract + 'static) -> Result<Address> {
        self.deploy_shared(deployer, Arc::new(contract))
    }

    pub fn deploy_shared(&mut self, deployer: Address, contract: Arc<dyn Contract>) -> Result<Address> {
        let address = execute_create(&mut self.world, &self.config, deployer, contract, 0, 0)
            .map_err(HostError::ConstructorReverted)?;
        info!(%deployer, %address, "deployed contract");
        Ok(address)
    }

    /// Apply `tx` atomically.
    pub fn transact(&mut self, tx: &Transaction) -> Receipt {
        debug!(
            from = %tx.from,
            to = %tx.to,
            value = tx.value,
            data_len = tx.data.len(),
            "applying transaction"
        );

        let logs_before = self.world.logs().len();
        let frame = Frame {
            caller: tx.from,
            address: tx.to,
            value: tx.value,
            depth: 0,
        };
        let outcome = execute_call(&mut self.world, &self.config, frame, &tx.data);

        let logs = match &outcome {
            Ok(_) => self.world.logs()[logs_before..].to_vec(),
            Err(revert) => {
                debug!(to = %tx.to, %revert, "transaction reverted");
                Vec::new()
            }
        };
        Receipt { outcome, logs }
    }

    /// Execute a call against a scratch copy of the world; nothing commits.
    pub fn view(&self, from: Address, to: Address, data: &[u8]) -> std::result::Result<Vec<u8>, Revert> {
        let mut scratch = self.world.clone();
        let frame = Frame {
            caller: from,
            address: to,
            value: 0,
            depth: 0,
        };
        execute_call(&mut scratch, &self.config, frame, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CallContext;
    use relaygate_common::abi::{self, Token};
    use relaygate_common::{storage, Selector};

    const BUMPED: &str = "Bumped(uint256)";

    /// Counter at slot 0. `bump()` increments and logs, `boom()` increments
    /// then reverts, `relay(address,bytes)` calls another contract and
    /// swallows its failure, `loop()` calls itself forever.
    struct Counter;

    impl Contract for Counter {
        fn construct(&self, ctx: &mut CallContext<'_>) -> std::result::Result<(), Revert> {
            ctx.sstore(storage::slot(0), abi::uint_word(100));
            Ok(())
        }

        fn execute(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> std::result::Result<Vec<u8>, Revert> {
            let Some(selector) = Selector::from_calldata(input) else {
                // Accept bare value
                return Ok(Vec::new());
            };
            let count = abi::word_to_u128(&ctx.sload(&storage::slot(0))).unwrap_or_default();

            if selector == Selector::from_signature("bump()") {
                ctx.sstore(storage::slot(0), abi::uint_word(count + 1));
                ctx.emit(BUMPED, &[], abi::encode(&[Token::Uint(count + 1)]));
                Ok(abi::encode(&[Token::Uint(count + 1)]))
            } else if selector == Selector::from_signature("boom()") {
                ctx.sstore(storage::slot(0), abi::uint_word(count + 1));
                ctx.emit(BUMPED, &[], Vec::new());
                Err(Revert::with_reason("boom"))
            } else if selector == Selector::from_signature("relay(address,bytes)") {
                let mut decoder = abi::Decoder::new(&input[4..]);
                let to = decoder.address().map_err(|_| Revert::empty())?;
                let data = decoder.bytes().map_err(|_| Revert::empty())?;
                ctx.sstore(storage::slot(1), abi::uint_word(1));
                let inner_ok = ctx.call(to, 0, &data).is_ok();
                Ok(abi::encode(&[Token::Bool(inner_ok)]))
            } else if selector == Selector::from_signature("loop()") {
                let me = ctx.address();
                ctx.call(me, 0, input)
            } else {
                Err(Revert::empty())
            }
        }
    }

    fn call(signature: &str) -> Vec<u8> {
        Selector::from_signature(signature).as_bytes().to_vec()
    }

    fn setup() -> (Host, Address, Address) {
        let mut host = Host::default();
        let user = Address::from_label("user");
        let counter = host.deploy(user, Counter).unwrap();
        (host, user, counter)
    }

    #[test]
    fn test_deploy_runs_constructor_and_derives_addresses() {
        let (mut host, user, counter) = setup();
        assert!(host.has_code(&counter));
        assert_eq!(abi::word_to_u128(&host.storage_at(&counter, &storage::slot(0))).unwrap(), 100);

        let second = host.deploy(user, Counter).unwrap();
        assert_ne!(second, counter);
    }

    #[test]
    fn test_successful_transaction_commits_state_and_logs() {
        let (mut host, user, counter) = setup();
        let receipt = host.transact(&Transaction::new(user, counter).with_data(call("bump()")));

        assert!(receipt.is_success());
        assert_eq!(abi::Decoder::new(receipt.output().unwrap()).uint().unwrap(), 101);
        assert_eq!(receipt.events(counter, BUMPED).count(), 1);
        assert_eq!(host.logs().len(), 1);
    }

    #[test]
    fn test_reverted_transaction_leaves_world_untouched() {
        let (mut host, user, counter) = setup();
        host.set_balance(user, 50);
        let before = host.storage(&counter);

        let receipt = host.transact(
            &Transaction::new(user, counter)
                .with_value(10)
                .with_data(call("boom()")),
        );

        assert_eq!(receipt.revert_reason().as_deref(), Some("boom"));
        assert!(receipt.logs.is_empty());
        assert_eq!(host.storage(&counter), before);
        assert!(host.logs().is_empty());
        assert_eq!(host.balance(&user), 50);
        assert_eq!(host.balance(&counter), 0);
    }

    #[test]
    fn test_inner_revert_only_undoes_inner_frame() {
        let (mut host, user, counter) = setup();
        let other = host.deploy(user, Counter).unwrap();

        let data = abi::encode_call(
            Selector::from_signature("relay(address,bytes)"),
            &[Token::Address(other), Token::Bytes(call("boom()"))],
        );
        let receipt = host.transact(&Transaction::new(user, counter).with_data(data));

        assert!(receipt.is_success());
        assert!(!abi::decode_bool(receipt.output().unwrap()).unwrap());
        // Outer write survives, inner write and log are gone
        assert_eq!(host.storage_at(&counter, &storage::slot(1)), abi::uint_word(1));
        assert_eq!(abi::word_to_u128(&host.storage_at(&other, &storage::slot(0))).unwrap(), 100);
        assert!(receipt.logs.is_empty());
    }

    #[test]
    fn test_value_transfers() {
        let (mut host, user, counter) = setup();
        let wallet = Address::from_label("wallet");
        host.set_balance(user, 10);

        // Plain account accepts value and returns nothing
        let receipt = host.transact(&Transaction::new(user, wallet).with_value(4));
        assert_eq!(receipt.output(), Some(&[] as &[u8]));
        assert_eq!(host.balance(&wallet), 4);

        let receipt = host.transact(&Transaction::new(user, counter).with_value(6));
        assert!(receipt.is_success());
        assert_eq!(host.balance(&counter), 6);
        assert_eq!(host.balance(&user), 0);

        // Insufficient balance fails without data
        let receipt = host.transact(&Transaction::new(user, counter).with_value(1));
        assert_eq!(receipt.revert(), Some(&Revert::empty()));
    }

    #[test]
    fn test_call_depth_is_bounded() {
        let mut host = Host::new(HostConfig { max_call_depth: 16 }).unwrap();
        let user = Address::from_label("user");
        let counter = host.deploy(user, Counter).unwrap();

        let receipt = host.transact(&Transaction::new(user, counter).with_data(call("loop()")));
        assert_eq!(receipt.revert(), Some(&Revert::empty()));
    }

    #[test]
    fn test_view_never_commits() {
        let (host, user, counter) = setup();
        let output = host.view(user, counter, &call("bump()")).unwrap();
        assert_eq!(abi::Decoder::new(&output).uint().unwrap(), 101);
        assert_eq!(abi::word_to_u128(&host.storage_at(&counter, &storage::slot(0))).unwrap(), 100);
        assert!(host.logs().is_empty());
    }

    #[test]
    fn test_zero_depth_config_is_rejected() {
        assert!(matches!(
            Host::new(HostConfig { max_call_depth: 0 }),
            Err(HostError::InvalidConfiguration(_))
        ));
    }
}
