//! Relaygate Predicates - Argument validators for gated methods
//!
//! A predicate is bound to a (destination, selector) pair in the policy
//! store. The gateway calls it with the argument bytes of the forwarded
//! call and forwards only on a `true` verdict.

use relaygate_common::Address;
use relaygate_runtime::Contract;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod allowlist;
pub mod core;
pub mod numeric;

pub use allowlist::AddressAllowlist;
pub use self::core::{validate_call, Predicate, PredicateContract};
pub use numeric::{AcceptEven, UintCeiling};

/// Stock predicates, as they appear in deployment files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StockPredicate {
    AcceptEven,
    UintCeiling {
        max: u64,
    },
    AddressAllowlist {
        #[serde(default)]
        position: usize,
        allowed: Vec<Address>,
    },
}

impl StockPredicate {
    /// Build the deployable contract for this predicate
    pub fn into_contract(self) -> Arc<dyn Contract> {
        match self {
            StockPredicate::AcceptEven => Arc::new(PredicateContract::new(AcceptEven)),
            StockPredicate::UintCeiling { max } => {
                Arc::new(PredicateContract::new(UintCeiling::new(u128::from(max))))
            }
            StockPredicate::AddressAllowlist { position, allowed } => {
                Arc::new(PredicateContract::new(AddressAllowlist::new(position, allowed)))
            }
        }
    }
}
