//! Canonical signatures of every method and event that crosses a contract
//! boundary. Contracts and clients derive selectors and topics from these so
//! both sides always agree.

/// Revert payload carrying a reason string.
pub const ERROR_STRING: &str = "Error(string)";

/// Single-owner access control, shared by the policy store and the gateway.
pub mod ownable {
    pub const OWNER: &str = "owner()";
    pub const TRANSFER_OWNERSHIP: &str = "transferOwnership(address)";

    pub const OWNERSHIP_TRANSFERRED: &str = "OwnershipTransferred(address,address)";
}

pub mod policy {
    pub const SET_TARGET_STATUS: &str = "setTargetStatus(address,bool)";
    pub const SET_METHOD_STATUS: &str = "setMethodStatus(address,bytes4,bool)";
    pub const SET_PREDICATE: &str = "setPredicate(address,bytes4,address)";
    pub const IS_AUTHORIZED: &str = "isAuthorized(address,bytes4)";
    pub const PREDICATE_FOR: &str = "predicateFor(address,bytes4)";
    pub const PREDICATES: &str = "predicates(address,bytes4)";
    pub const ALLOWED_TARGETS: &str = "allowedTargets(address)";
    pub const ALLOWED_METHODS: &str = "allowedMethods(address,bytes4)";

    pub const TARGET_STATUS_CHANGED: &str = "TargetStatusChanged(address,bool)";
    pub const METHOD_STATUS_CHANGED: &str = "MethodStatusChanged(address,bytes4,bool)";
    pub const PREDICATE_SET: &str = "PredicateSet(address,bytes4,address)";
}

pub mod gateway {
    pub const SET_TARGET: &str = "setTarget(address)";
    pub const GET_TARGET: &str = "getTarget()";
    pub const POLICY: &str = "policy()";

    pub const TARGET_CHANGED: &str = "TargetChanged(address,address)";
}

pub mod predicate {
    pub const VALIDATE: &str = "validate(bytes)";
}
