// Numeric argument predicates
use super::core::Predicate;
use relaygate_common::abi::Decoder;

/// Accepts exactly one 32-byte word holding an even number.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptEven;

impl Predicate for AcceptEven {
    fn validate(&self, arguments: &[u8]) -> bool {
        arguments.len() == 32 && arguments[31] % 2 == 0
    }

    fn description(&self) -> &'static str {
        "Accept even uint256"
    }
}

/// Accepts calls whose first argument word is at most `max`.
#[derive(Clone, Copy, Debug)]
pub struct UintCeiling {
    pub max: u128,
}

impl UintCeiling {
    pub fn new(max: u128) -> Self {
        Self { max }
    }
}

impl Predicate for UintCeiling {
    fn validate(&self, arguments: &[u8]) -> bool {
        Decoder::new(arguments)
            .uint()
            .is_ok_and(|value| value <= self.max)
    }

    fn description(&self) -> &'static str {
        "Uint ceiling"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaygate_common::abi::uint_word;

    #[test]
    fn test_accept_even() {
        assert!(AcceptEven.validate(&uint_word(4)));
        assert!(AcceptEven.validate(&uint_word(0)));
        assert!(!AcceptEven.validate(&uint_word(5)));
        // Wrong shape
        assert!(!AcceptEven.validate(&[]));
        assert!(!AcceptEven.validate(&[0u8; 31]));
        assert!(!AcceptEven.validate(&[0u8; 64]));
    }

    #[test]
    fn test_uint_ceiling() {
        let ceiling = UintCeiling::new(1_000);
        assert!(ceiling.validate(&uint_word(1_000)));
        assert!(ceiling.validate(&uint_word(0)));
        assert!(!ceiling.validate(&uint_word(1_001)));
        assert!(!ceiling.validate(&[]));

        // Extra words after the first are ignored
        let mut args = uint_word(10).to_vec();
        args.extend_from_slice(&uint_word(u128::MAX));
        assert!(ceiling.validate(&args));

        // Values beyond 128 bits are over any ceiling
        let mut huge = [0u8; 32];
        huge[0] = 1;
        assert!(!UintCeiling::new(u128::MAX).validate(&huge));
    }
}
