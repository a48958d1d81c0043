//! Relaygate SDK - Client-side interface to relaygate contracts
//!
//! This SDK provides:
//! - Typed clients for the gateway and the policy store
//! - Deployment of a gateway and its policy from JSON configuration
//! - Classification of reverts into failure categories
//! - Test fixtures behind the `testing` feature

pub mod client;
pub mod config;
pub mod deploy;
pub mod error;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export key types
pub use client::{GatewayClient, PolicyClient};
pub use config::{DeploymentConfig, MethodRef, MethodRule, PolicyConfig, PredicateRef};
pub use deploy::{AuthorizationPath, Decision, Deployment};
pub use error::{classify, FailureKind, SdkError, SdkResult};

pub use relaygate_common::{Address, Selector, Value};
pub use relaygate_gateway::{GatewayConfig, PolicySource, TargetAuthority};
pub use relaygate_predicates::StockPredicate;
pub use relaygate_runtime::{Host, HostConfig, Receipt, Revert, Transaction};
