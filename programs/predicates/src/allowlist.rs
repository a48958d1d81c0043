// Address argument predicates
use super::core::Predicate;
use relaygate_common::{Address, Word};
use std::collections::BTreeSet;

/// Accepts calls whose argument word at `position` is an address from
/// `allowed` (for example the recipient of a transfer).
#[derive(Clone, Debug)]
pub struct AddressAllowlist {
    pub position: usize,
    pub allowed: BTreeSet<Address>,
}

impl AddressAllowlist {
    pub fn new(position: usize, allowed: impl IntoIterator<Item = Address>) -> Self {
        Self {
            position,
            allowed: allowed.into_iter().collect(),
        }
    }
}

impl Predicate for AddressAllowlist {
    fn validate(&self, arguments: &[u8]) -> bool {
        let Some(start) = self.position.checked_mul(32) else {
            return false;
        };
        let Some(word) = arguments.get(start..start.saturating_add(32)) else {
            return false;
        };
        let Ok(word) = Word::try_from(word) else {
            return false;
        };
        Address::from_word(&word).is_some_and(|address| self.allowed.contains(&address))
    }

    fn description(&self) -> &'static str {
        "Address allowlist"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaygate_common::abi::{encode, Token};

    #[test]
    fn test_address_at_position() {
        let alice = Address::from_label("alice");
        let mallory = Address::from_label("mallory");
        let predicate = AddressAllowlist::new(0, [alice]);

        assert!(predicate.validate(&encode(&[Token::Address(alice), Token::Uint(5)])));
        assert!(!predicate.validate(&encode(&[Token::Address(mallory), Token::Uint(5)])));
        assert!(!predicate.validate(&[]));

        let second = AddressAllowlist::new(1, [alice]);
        assert!(second.validate(&encode(&[Token::Uint(5), Token::Address(alice)])));
        assert!(!second.validate(&encode(&[Token::Address(alice)])));
    }

    #[test]
    fn test_dirty_word_is_not_an_address() {
        let alice = Address::from_label("alice");
        let mut word = alice.to_word();
        word[0] = 0xff;
        assert!(!AddressAllowlist::new(0, [alice]).validate(&word));
    }
}
