use thiserror::Error;

// ================================
// Codec Error Types
// ================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    #[error("read of {len} bytes at offset {offset} is out of bounds")]
    OutOfBounds { offset: usize, len: usize },

    #[error("word is not a valid bool")]
    InvalidBool,

    #[error("word is not a valid address")]
    InvalidAddress,

    #[error("word is not a valid bytes4")]
    InvalidSelector,

    #[error("uint does not fit in 128 bits")]
    UintOverflow,

    #[error("string is not valid UTF-8")]
    InvalidUtf8,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseAddressError {
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("address must be 20 bytes, got {0}")]
    InvalidLength(usize),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseSelectorError {
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("selector must be 4 bytes, got {0}")]
    InvalidLength(usize),
}
