//! Policy store errors

use relaygate_common::AbiError;
use relaygate_runtime::Revert;
use thiserror::Error;

/// Failures of the single-owner access check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Ownable: caller is not the owner")]
    NotOwner,

    #[error("Ownable: new owner is the zero address")]
    ZeroOwner,
}

impl From<AccessError> for Revert {
    fn from(err: AccessError) -> Self {
        Revert::with_reason(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Malformed arguments: {0}")]
    MalformedArguments(#[from] AbiError),

    #[error("Unknown method")]
    UnknownMethod,

    #[error("Method is not payable")]
    NonPayable,
}

impl From<PolicyError> for Revert {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::Access(access) => access.into(),
            // Decoding and dispatch failures carry no reason
            PolicyError::MalformedArguments(_) | PolicyError::UnknownMethod | PolicyError::NonPayable => {
                Revert::empty()
            }
        }
    }
}
