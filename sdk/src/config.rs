//! Deployment configuration loaded from JSON
//!
//! ```json
//! {
//!   "host": { "max_call_depth": 64 },
//!   "gateway": {
//!     "initial_target": "0x…",
//!     "owner": "0x…",
//!     "target_authority": "owner",
//!     "policy": { "deploy": { "owner": "0x…" } }
//!   },
//!   "predicates": { "even": { "kind": "accept_even" } },
//!   "policy": {
//!     "targets": ["0x…"],
//!     "methods": [
//!       { "target": "0x…", "method": "foo(uint256)", "predicate": "even" },
//!       { "target": "0x…", "method": "0x12345678", "allowed": false }
//!     ]
//!   }
//! }
//! ```

use crate::{SdkError, SdkResult};
use relaygate_common::{Address, Selector};
use relaygate_gateway::GatewayConfig;
use relaygate_predicates::StockPredicate;
use relaygate_runtime::HostConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Everything needed to stand up a gateway on a fresh host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    #[serde(default)]
    pub host: HostConfig,
    pub gateway: GatewayConfig,
    /// Stock predicates deployed before the gateway, by name
    #[serde(default)]
    pub predicates: BTreeMap<String, StockPredicate>,
    #[serde(default)]
    pub policy: PolicyConfig,
}

impl DeploymentConfig {
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> SdkResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Policy entries replayed by the store owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Destinations whitelisted as a whole
    #[serde(default)]
    pub targets: Vec<Address>,
    #[serde(default)]
    pub methods: Vec<MethodRule>,
}

impl PolicyConfig {
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

fn allowed_default() -> bool {
    true
}

/// One (destination, method) entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodRule {
    pub target: Address,
    pub method: MethodRef,
    #[serde(default = "allowed_default")]
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<PredicateRef>,
}

/// A method given as a signature (`"foo(uint256)"`), a hex selector
/// (`"0x2fbebd38"`) or `"receive"` for empty input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MethodRef(Selector);

impl MethodRef {
    pub fn selector(&self) -> Selector {
        self.0
    }
}

impl From<Selector> for MethodRef {
    fn from(selector: Selector) -> Self {
        Self(selector)
    }
}

impl FromStr for MethodRef {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "receive" {
            return Ok(Self(Selector::RECEIVE));
        }
        if s.contains('(') {
            if !s.ends_with(')') {
                return Err(SdkError::InvalidMethod(s.to_string()));
            }
            return Ok(Self(Selector::from_signature(s)));
        }
        s.parse::<Selector>()
            .map(Self)
            .map_err(|_| SdkError::InvalidMethod(s.to_string()))
    }
}

impl TryFrom<String> for MethodRef {
    type Error = SdkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MethodRef> for String {
    fn from(method: MethodRef) -> Self {
        method.0.to_string()
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A predicate given by address or by the name of a configured stock
/// predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredicateRef {
    Address(Address),
    Named(String),
}
