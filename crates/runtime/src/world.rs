// Account state shared by every call frame of a host.
//
// A checkpoint is a full copy of the world. Code is reference counted, so a
// copy only duplicates balances, nonces, storage maps and the log buffer.

use crate::{Contract, Log, Revert};
use relaygate_common::{keccak256, Address, Value, Word};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Default)]
pub(crate) struct Account {
    pub balance: Value,
    pub nonce: u64,
    pub storage: BTreeMap<Word, Word>,
    pub code: Option<Arc<dyn Contract>>,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("balance", &self.balance)
            .field("nonce", &self.nonce)
            .field("storage_slots", &self.storage.len())
            .field("has_code", &self.code.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct World {
    accounts: BTreeMap<Address, Account>,
    logs: Vec<Log>,
}

impl World {
    pub fn account(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    pub fn account_mut(&mut self, address: Address) -> &mut Account {
        self.accounts.entry(address).or_default()
    }

    pub fn code(&self, address: &Address) -> Option<Arc<dyn Contract>> {
        self.account(address).and_then(|account| account.code.clone())
    }

    pub fn balance(&self, address: &Address) -> Value {
        self.account(address).map_or(0, |account| account.balance)
    }

    pub fn sload(&self, address: &Address, slot: &Word) -> Word {
        self.account(address)
            .and_then(|account| account.storage.get(slot).copied())
            .unwrap_or([0u8; 32])
    }

    /// Zero words are removed so equal states compare equal.
    pub fn sstore(&mut self, address: Address, slot: Word, value: Word) {
        let storage = &mut self.account_mut(address).storage;
        if value == [0u8; 32] {
            storage.remove(&slot);
        } else {
            storage.insert(slot, value);
        }
    }

    pub fn transfer(&mut self, from: Address, to: Address, value: Value) -> Result<(), Revert> {
        if value == 0 || from == to {
            return if self.balance(&from) >= value {
                Ok(())
            } else {
                Err(Revert::empty())
            };
        }

        let remaining = self
            .balance(&from)
            .checked_sub(value)
            .ok_or_else(Revert::empty)?;
        let credited = self
            .balance(&to)
            .checked_add(value)
            .ok_or_else(Revert::empty)?;
        self.account_mut(from).balance = remaining;
        self.account_mut(to).balance = credited;
        Ok(())
    }

    /// Address of the next contract created by `creator`; bumps its nonce.
    pub fn next_create_address(&mut self, creator: Address) -> Address {
        let account = self.account_mut(creator);
        let nonce = account.nonce;
        account.nonce += 1;

        let mut preimage = Vec::with_capacity(28);
        preimage.extend_from_slice(creator.as_bytes());
        preimage.extend_from_slice(&nonce.to_be_bytes());
        let hash = keccak256(preimage);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[12..]);
        Address::new(bytes)
    }

    pub fn push_log(&mut self, log: Log) {
        self.logs.push(log);
    }

    pub fn logs(&self) -> &[Log] {
        &self.logs
    }
}
