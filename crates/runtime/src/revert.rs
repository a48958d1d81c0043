//! Revert data

use lazy_static::lazy_static;
use relaygate_common::abi::{encode_call, Decoder, Token};
use relaygate_common::interfaces::ERROR_STRING;
use relaygate_common::Selector;
use std::fmt;

lazy_static! {
    static ref ERROR_SELECTOR: Selector = Selector::from_signature(ERROR_STRING);
}

/// Failure of a call frame, carrying the raw revert data.
///
/// The data is kept byte-for-byte so a caller that relays a failure can
/// re-raise exactly what the callee produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Revert {
    data: Vec<u8>,
}

impl Revert {
    /// Failure without data.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_data(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Failure with an `Error(string)` reason.
    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            data: encode_call(*ERROR_SELECTOR, &[Token::String(reason.into())]),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Reason string, when the data is an `Error(string)` payload.
    pub fn reason(&self) -> Option<String> {
        if Selector::from_calldata(&self.data)? != *ERROR_SELECTOR {
            return None;
        }
        Decoder::new(&self.data[4..]).string().ok()
    }
}

impl fmt::Display for Revert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "execution reverted: {reason}"),
            None if self.data.is_empty() => write!(f, "execution reverted"),
            None => write!(f, "execution reverted (0x{})", hex::encode(&self.data)),
        }
    }
}

impl std::error::Error for Revert {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_round_trip() {
        let revert = Revert::with_reason("Invalid arguments");
        assert_eq!(&revert.data()[..4], &[0x08, 0xc3, 0x79, 0xa0]);
        assert_eq!(revert.reason().as_deref(), Some("Invalid arguments"));
        assert_eq!(revert.to_string(), "execution reverted: Invalid arguments");
    }

    #[test]
    fn test_custom_data_has_no_reason() {
        let revert = Revert::from_data(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(revert.reason(), None);
        assert_eq!(revert.to_string(), "execution reverted (0xdeadbeef)");

        assert_eq!(Revert::empty().to_string(), "execution reverted");
        assert!(Revert::empty().is_empty());
    }
}
