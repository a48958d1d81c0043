//! Single-owner access control
//!
//! One owner address lives in a fixed storage slot of the contract that
//! embeds it. Every owner-gated entry point calls [`Ownable::only_owner`]
//! before touching any state, so a rejected caller never causes a partial
//! write.

use crate::AccessError;
use lazy_static::lazy_static;
use relaygate_common::abi::{self, Token};
use relaygate_common::interfaces::ownable::{OWNER, OWNERSHIP_TRANSFERRED, TRANSFER_OWNERSHIP};
use relaygate_common::{storage, AbiError, Address, Selector, Word};
use relaygate_runtime::{CallContext, Revert};
use tracing::info;

lazy_static! {
    static ref OWNER_SELECTOR: Selector = Selector::from_signature(OWNER);
    static ref TRANSFER_OWNERSHIP_SELECTOR: Selector = Selector::from_signature(TRANSFER_OWNERSHIP);
}

/// Owner record at a fixed slot.
#[derive(Debug, Clone, Copy)]
pub struct Ownable {
    slot: Word,
}

impl Ownable {
    pub fn at_slot(index: u64) -> Self {
        Self {
            slot: storage::slot(index),
        }
    }

    /// Record the first owner. Called from a constructor.
    pub fn initialize(&self, ctx: &mut CallContext<'_>, owner: Address) -> Result<(), AccessError> {
        if owner.is_zero() {
            return Err(AccessError::ZeroOwner);
        }
        self.store(ctx, owner);
        Ok(())
    }

    pub fn owner(&self, ctx: &CallContext<'_>) -> Address {
        Address::from_word(&ctx.sload(&self.slot)).unwrap_or(Address::ZERO)
    }

    pub fn only_owner(&self, ctx: &CallContext<'_>) -> Result<(), AccessError> {
        if ctx.caller() == self.owner(ctx) {
            Ok(())
        } else {
            Err(AccessError::NotOwner)
        }
    }

    pub fn transfer_ownership(&self, ctx: &mut CallContext<'_>, new_owner: Address) -> Result<(), AccessError> {
        self.only_owner(ctx)?;
        if new_owner.is_zero() {
            return Err(AccessError::ZeroOwner);
        }
        self.store(ctx, new_owner);
        Ok(())
    }

    fn store(&self, ctx: &mut CallContext<'_>, new_owner: Address) {
        let previous = self.owner(ctx);
        ctx.sstore(self.slot, new_owner.to_word());
        ctx.emit(
            OWNERSHIP_TRANSFERRED,
            &[previous.to_word(), new_owner.to_word()],
            Vec::new(),
        );
        info!(contract = %ctx.address(), %previous, %new_owner, "ownership transferred");
    }

    /// Serve `owner()` and `transferOwnership(address)`; `None` when the
    /// selector belongs to neither.
    pub fn dispatch(
        &self,
        ctx: &mut CallContext<'_>,
        selector: Selector,
        args: &[u8],
    ) -> Option<Result<Vec<u8>, Revert>> {
        if selector == *OWNER_SELECTOR {
            return Some(
                ctx.require_no_value()
                    .map(|()| abi::encode(&[Token::Address(self.owner(ctx))])),
            );
        }
        if selector == *TRANSFER_OWNERSHIP_SELECTOR {
            return Some(self.dispatch_transfer(ctx, args));
        }
        None
    }

    fn dispatch_transfer(&self, ctx: &mut CallContext<'_>, args: &[u8]) -> Result<Vec<u8>, Revert> {
        ctx.require_no_value()?;
        let new_owner = abi::Decoder::new(args)
            .address()
            .map_err(|_: AbiError| Revert::empty())?;
        self.transfer_ownership(ctx, new_owner)?;
        Ok(Vec::new())
    }
}
