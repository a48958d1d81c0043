use crate::{keccak256, ParseSelectorError, Word};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The 4-byte method identifier at the front of calldata.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Selector([u8; 4]);

impl Selector {
    /// Pseudo-selector for a call that carries no data (a bare value
    /// receipt). Policy entries keyed by it govern the receive path.
    ///
    /// It shares its policy key with a real `0x00000000` selector: allowing
    /// the receive path also allows input starting with four zero bytes,
    /// and a predicate bound to the pair sees both.
    pub const RECEIVE: Self = Self([0u8; 4]);

    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// First four bytes of the keccak hash of a canonical signature such as
    /// `"foo(uint256)"`.
    pub fn from_signature(signature: &str) -> Self {
        let hash = keccak256(signature.as_bytes());
        Self([hash[0], hash[1], hash[2], hash[3]])
    }

    /// Leading selector of `calldata`, if it is long enough to carry one.
    pub fn from_calldata(calldata: &[u8]) -> Option<Self> {
        let head: [u8; 4] = calldata.get(..4)?.try_into().ok()?;
        Some(Self(head))
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Right-padded `bytes4` word form.
    pub fn to_word(&self) -> Word {
        let mut word = [0u8; 32];
        word[..4].copy_from_slice(&self.0);
        word
    }

    /// Inverse of [`Selector::to_word`]; `None` when the padding is dirty.
    pub fn from_word(word: &Word) -> Option<Self> {
        if word[4..].iter().any(|b| *b != 0) {
            return None;
        }
        Some(Self([word[0], word[1], word[2], word[3]]))
    }
}

impl From<[u8; 4]> for Selector {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Selector {
    type Err = ParseSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits)?;
        let bytes: [u8; 4] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| ParseSelectorError::InvalidLength(bytes.len()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
