use crate::Revert;
use relaygate_common::{Address, Value};

/// Low-level call capability.
///
/// Forwards `calldata` and `value` to `destination` without knowing its
/// interface and hands back either the callee's return data or its revert,
/// both untouched.
pub trait Relay {
    fn invoke(
        &mut self,
        destination: Address,
        calldata: &[u8],
        value: Value,
    ) -> Result<Vec<u8>, Revert>;
}
