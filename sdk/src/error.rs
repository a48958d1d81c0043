/// Error types for the relaygate SDK
use relaygate_common::AbiError;
use relaygate_gateway::GatewayError;
use relaygate_policy::AccessError;
use relaygate_runtime::{HostError, Revert};
use std::fmt;
use thiserror::Error;

/// Main error type for the SDK
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Transaction reverted: {0}")]
    Reverted(Revert),

    #[error("Deployment failed: {0}")]
    Host(#[from] HostError),

    #[error("Malformed return data: {0}")]
    Decode(#[from] AbiError),

    #[error("Invalid method reference `{0}`")]
    InvalidMethod(String),

    #[error("Unknown predicate `{0}`")]
    UnknownPredicate(String),

    #[error("Invalid SDK configuration: {0}")]
    InvalidConfiguration(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SdkError {
    /// Failure category of a reverted transaction
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            SdkError::Reverted(revert) => Some(classify(revert)),
            _ => None,
        }
    }

    pub fn invalid_configuration<T: fmt::Display>(msg: T) -> Self {
        SdkError::InvalidConfiguration(msg.to_string())
    }
}

/// Result type for SDK operations
pub type SdkResult<T> = std::result::Result<T, SdkError>;

/// Coarse category of a gateway failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Pair not whitelisted, or an owner-only operation called by someone
    /// else
    Unauthorized,
    /// A predicate refused the arguments
    InvalidArguments,
    /// Fallback with no usable destination
    InvalidTarget,
    /// Input too short to carry a selector
    MalformedInput,
    /// Anything else, including reverts relayed from a destination
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Unauthorized => "unauthorized",
            FailureKind::InvalidArguments => "invalid arguments",
            FailureKind::InvalidTarget => "invalid target",
            FailureKind::MalformedInput => "malformed input",
            FailureKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Map a revert to its [`FailureKind`] by its reason string.
pub fn classify(revert: &Revert) -> FailureKind {
    let Some(reason) = revert.reason() else {
        return FailureKind::Other;
    };
    let known = [
        (GatewayError::Unauthorized.to_string(), FailureKind::Unauthorized),
        (AccessError::NotOwner.to_string(), FailureKind::Unauthorized),
        (GatewayError::InvalidArguments.to_string(), FailureKind::InvalidArguments),
        (GatewayError::InvalidTarget.to_string(), FailureKind::InvalidTarget),
        (GatewayError::MalformedInput.to_string(), FailureKind::MalformedInput),
    ];
    known
        .into_iter()
        .find(|(text, _)| *text == reason)
        .map_or(FailureKind::Other, |(_, kind)| kind)
}
