use crate::{keccak256, ParseAddressError, Word};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A 20-byte account address.
///
/// The zero address doubles as "unset": an unset destination, an unbound
/// predicate or a cleared owner.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Self = Self([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Deterministic address derived from a human label, handy for test
    /// accounts and fixtures.
    pub fn from_label(label: &str) -> Self {
        let hash = keccak256(label.as_bytes());
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[12..]);
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Left-padded 32-byte word form.
    pub fn to_word(&self) -> Word {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&self.0);
        word
    }

    /// Inverse of [`Address::to_word`]; `None` when the upper 12 bytes are
    /// dirty.
    pub fn from_word(word: &Word) -> Option<Self> {
        if word[..12].iter().any(|b| *b != 0) {
            return None;
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&word[12..]);
        Some(Self(bytes))
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits)?;
        let bytes: [u8; 20] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ParseAddressError::InvalidLength(bytes.len()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let text = "0x5b38da6a701c568545dcfcb03fcb875f56beddc4";
        let address: Address = text.parse().unwrap();
        assert_eq!(address.to_string(), text);

        // Prefix is optional, case is ignored
        let upper: Address = "5B38DA6A701C568545DCFCB03FCB875F56BEDDC4".parse().unwrap();
        assert_eq!(upper, address);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert_eq!(
            "0x1234".parse::<Address>(),
            Err(ParseAddressError::InvalidLength(2))
        );
        assert!(matches!(
            "0xzz".parse::<Address>(),
            Err(ParseAddressError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_word_round_trip_rejects_dirty_padding() {
        let address = Address::from_label("gateway");
        assert_eq!(Address::from_word(&address.to_word()), Some(address));

        let mut dirty = address.to_word();
        dirty[0] = 1;
        assert_eq!(Address::from_word(&dirty), None);
    }

    #[test]
    fn test_zero_and_labels() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::from_label("owner").is_zero());
        assert_ne!(Address::from_label("owner"), Address::from_label("other"));
    }

    #[test]
    fn test_serde_uses_hex_strings() {
        let address = Address::from_label("target");
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{address}\""));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
