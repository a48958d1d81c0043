//! Relaygate Host Runtime
//!
//! Sequential, in-process execution environment for relaygate contracts.
//! Each account has a balance, a nonce, a word-addressed storage map and
//! optional contract code. Message calls nest synchronously; every call frame
//! checkpoints world state and restores it if the frame fails, so a reverted
//! transaction leaves no trace.

// ================================
// Module Declarations
// ================================

pub mod contract;
pub mod core;
pub mod host;
pub mod log;
pub mod relay;
pub mod revert;

mod world;

// ================================
// Public API Re-exports
// ================================

pub use crate::contract::{CallContext, Contract, Frame};
pub use crate::core::{HostConfig, HostError, Result};
pub use crate::host::{Host, Receipt, Transaction};
pub use crate::log::Log;
pub use crate::relay::Relay;
pub use crate::revert::Revert;

pub use relaygate_common::{Address, Selector, Value, Word};
