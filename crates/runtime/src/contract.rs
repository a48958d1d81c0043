//! Contract code and the per-frame execution context

use crate::world::World;
use crate::{HostConfig, Log, Relay, Revert};
use relaygate_common::{Address, Value, Word};
use std::sync::Arc;
use tracing::{debug, trace};

/// Code installed at an address.
///
/// Implementations hold only immutable configuration; all mutable state goes
/// through [`CallContext::sload`] / [`CallContext::sstore`] so that the host
/// can roll it back.
pub trait Contract: Send + Sync {
    /// Runs once at creation, before the code is installed.
    fn construct(&self, ctx: &mut CallContext<'_>) -> Result<(), Revert> {
        let _ = ctx;
        Ok(())
    }

    /// Handles a message call. `input` is the full calldata and may be empty
    /// (a bare value transfer).
    fn execute(&self, ctx: &mut CallContext<'_>, input: &[u8]) -> Result<Vec<u8>, Revert>;
}

/// Identity of the running call frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub caller: Address,
    pub address: Address,
    pub value: Value,
    pub depth: usize,
}

/// Everything a contract may touch while it runs.
pub struct CallContext<'a> {
    world: &'a mut World,
    config: &'a HostConfig,
    frame: Frame,
}

impl CallContext<'_> {
    pub fn caller(&self) -> Address {
        self.frame.caller
    }

    /// Address of the executing contract.
    pub fn address(&self) -> Address {
        self.frame.address
    }

    /// Value attached to this call; already credited to [`Self::address`].
    pub fn value(&self) -> Value {
        self.frame.value
    }

    pub fn depth(&self) -> usize {
        self.frame.depth
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Fails without data when value was attached (non-payable entry points).
    pub fn require_no_value(&self) -> Result<(), Revert> {
        if self.frame.value == 0 {
            Ok(())
        } else {
            Err(Revert::empty())
        }
    }

    pub fn sload(&self, slot: &Word) -> Word {
        self.world.sload(&self.frame.address, slot)
    }

    pub fn sstore(&mut self, slot: Word, value: Word) {
        self.world.sstore(self.frame.address, slot, value);
    }

    pub fn balance(&self, address: &Address) -> Value {
        self.world.balance(address)
    }

    pub fn has_code(&self, address: &Address) -> bool {
        self.world.code(address).is_some()
    }

    pub fn emit(&mut self, signature: &str, indexed: &[Word], data: Vec<u8>) {
        let log = Log::new(self.frame.address, signature, indexed, data);
        self.world.push_log(log);
    }

    /// Nested message call from this contract.
    pub fn call(&mut self, to: Address, value: Value, input: &[u8]) -> Result<Vec<u8>, Revert> {
        let frame = Frame {
            caller: self.frame.address,
            address: to,
            value,
            depth: self.frame.depth + 1,
        };
        execute_call(self.world, self.config, frame, input)
    }

    /// Create a contract with this contract as creator, endowing it with
    /// `value`.
    pub fn create(&mut self, contract: Arc<dyn Contract>, value: Value) -> Result<Address, Revert> {
        execute_create(
            self.world,
            self.config,
            self.frame.address,
            contract,
            value,
            self.frame.depth + 1,
        )
    }
}

impl Relay for CallContext<'_> {
    fn invoke(
        &mut self,
        destination: Address,
        calldata: &[u8],
        value: Value,
    ) -> Result<Vec<u8>, Revert> {
        self.call(destination, value, calldata)
    }
}

// ================================
// Frame Execution
// ================================

pub(crate) fn execute_call(
    world: &mut World,
    config: &HostConfig,
    frame: Frame,
    input: &[u8],
) -> Result<Vec<u8>, Revert> {
    if frame.depth > config.max_call_depth {
        debug!(depth = frame.depth, to = %frame.address, "call depth exceeded");
        return Err(Revert::empty());
    }

    let checkpoint = world.clone();
    let result = run_call(world, config, frame, input);
    if let Err(revert) = &result {
        trace!(to = %frame.address, depth = frame.depth, %revert, "frame reverted");
        *world = checkpoint;
    }
    result
}

fn run_call(
    world: &mut World,
    config: &HostConfig,
    frame: Frame,
    input: &[u8],
) -> Result<Vec<u8>, Revert> {
    world.transfer(frame.caller, frame.address, frame.value)?;

    // Plain accounts accept value and return nothing
    let Some(code) = world.code(&frame.address) else {
        return Ok(Vec::new());
    };

    let mut ctx = CallContext {
        world: &mut *world,
        config,
        frame,
    };
    code.execute(&mut ctx, input)
}

pub(crate) fn execute_create(
    world: &mut World,
    config: &HostConfig,
    creator: Address,
    contract: Arc<dyn Contract>,
    value: Value,
    depth: usize,
) -> Result<Address, Revert> {
    if depth > config.max_call_depth {
        return Err(Revert::empty());
    }

    let checkpoint = world.clone();
    let result = run_create(world, config, creator, contract, value, depth);
    match &result {
        Ok(address) => debug!(%creator, %address, "contract created"),
        Err(revert) => {
            debug!(%creator, %revert, "contract creation reverted");
            *world = checkpoint;
        }
    }
    result
}

fn run_create(
    world: &mut World,
    config: &HostConfig,
    creator: Address,
    contract: Arc<dyn Contract>,
    value: Value,
    depth: usize,
) -> Result<Address, Revert> {
    let address = world.next_create_address(creator);
    if world.code(&address).is_some() {
        return Err(Revert::empty());
    }
    world.transfer(creator, address, value)?;

    let mut ctx = CallContext {
        world: &mut *world,
        config,
        frame: Frame {
            caller: creator,
            address,
            value,
            depth,
        },
    };
    contract.construct(&mut ctx)?;

    world.account_mut(address).code = Some(contract);
    Ok(address)
}
