//! Common primitives for the relaygate contracts
//!
//! Everything that crosses a contract boundary lives here: 20-byte addresses,
//! 4-byte method selectors, 32-byte storage/ABI words and the head/tail ABI
//! codec used for calldata, return data, revert data and event payloads.

pub mod abi;
pub mod address;
pub mod error;
pub mod interfaces;
pub mod selector;

pub use abi::{Decoder, Token};
pub use address::Address;
pub use error::{AbiError, ParseAddressError, ParseSelectorError};
pub use selector::Selector;

use sha3::{Digest, Keccak256};

/// A 32-byte storage slot, storage value or ABI word.
pub type Word = [u8; 32];

/// Native value attached to a call (wei-style, smallest unit).
pub type Value = u128;

/// Keccak-256 of `data`.
pub fn keccak256(data: impl AsRef<[u8]>) -> Word {
    let mut hasher = Keccak256::new();
    hasher.update(data.as_ref());
    hasher.finalize().into()
}

/// Topic 0 of an event with the given canonical signature.
pub fn event_topic(signature: &str) -> Word {
    keccak256(signature.as_bytes())
}

/// Storage slot helpers (Solidity layout)
pub mod storage {
    use super::{keccak256, Word};

    /// The fixed slot at `index`.
    pub fn slot(index: u64) -> Word {
        crate::abi::uint_word(u128::from(index))
    }

    /// Slot of `mapping[key]` for a mapping rooted at `base`.
    pub fn mapping_slot(base: &Word, key: &Word) -> Word {
        let mut preimage = [0u8; 64];
        preimage[..32].copy_from_slice(key);
        preimage[32..].copy_from_slice(base);
        keccak256(preimage)
    }
}
