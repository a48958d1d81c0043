//! Gateway errors

use relaygate_common::AbiError;
use relaygate_policy::AccessError;
use relaygate_runtime::Revert;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Invalid target to call fallback on")]
    InvalidTarget,

    #[error("Invalid target or method")]
    Unauthorized,

    #[error("Invalid arguments")]
    InvalidArguments,

    #[error("Malformed calldata")]
    MalformedInput,

    #[error("Invalid policy address")]
    InvalidPolicy,

    #[error(transparent)]
    Access(#[from] AccessError),

    /// A callee failed; its revert data is re-raised untouched.
    #[error(transparent)]
    Reverted(Revert),

    #[error("Malformed policy response: {0}")]
    MalformedPolicyResponse(AbiError),

    #[error("Malformed arguments: {0}")]
    MalformedArguments(#[from] AbiError),

    #[error("Method is not payable")]
    NonPayable,
}

impl From<GatewayError> for Revert {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Access(access) => access.into(),
            GatewayError::Reverted(revert) => revert,
            GatewayError::MalformedPolicyResponse(_)
            | GatewayError::MalformedArguments(_)
            | GatewayError::NonPayable => Revert::empty(),
            reason => Revert::with_reason(reason.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_strings() {
        let cases = [
            (GatewayError::InvalidTarget, "Invalid target to call fallback on"),
            (GatewayError::Unauthorized, "Invalid target or method"),
            (GatewayError::InvalidArguments, "Invalid arguments"),
            (GatewayError::MalformedInput, "Malformed calldata"),
        ];
        for (err, reason) in cases {
            assert_eq!(Revert::from(err).reason().as_deref(), Some(reason));
        }
    }

    #[test]
    fn test_callee_revert_passes_through() {
        let inner = Revert::from_data(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(Revert::from(GatewayError::Reverted(inner.clone())), inner);
        assert_eq!(Revert::from(GatewayError::NonPayable), Revert::empty());
        assert_eq!(
            Revert::from(GatewayError::Access(AccessError::NotOwner)).reason(),
            Some(AccessError::NotOwner.to_string())
        );
    }
}
