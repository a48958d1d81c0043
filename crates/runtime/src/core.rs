//! Core runtime types: configuration and error handling

use crate::Revert;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ================================
// Configuration Types
// ================================

/// Host configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Maximum nesting of message calls; deeper frames fail without data
    pub max_call_depth: usize,
}

impl HostConfig {
    pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            max_call_depth: Self::DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

// ================================
// Error Types
// ================================

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Constructor reverted: {0}")]
    ConstructorReverted(Revert),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, HostError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_missing_fields() {
        let config: HostConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, HostConfig::default());

        let config: HostConfig = serde_json::from_str(r#"{"max_call_depth": 8}"#).unwrap();
        assert_eq!(config.max_call_depth, 8);
    }
}
