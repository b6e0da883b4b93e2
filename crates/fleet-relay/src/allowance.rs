//! # Allowance Guard
//!
//! Pre-flight protocol run before any value-moving call: make sure the
//! spender holds a sufficient, minimal delegated allowance.
//!
//! The guard approves **exactly** the required amount, never an unbounded
//! grant, so a later compromise of the spender is bounded by one purchase.
//!
//! Known race, left open: between approval confirmation and the spend call
//! a third party holding the owner's key could alter the allowance. There
//! is no atomic permit-and-spend on this ledger; callers must spend
//! promptly after `ensure` returns.

use crate::credential::Credential;
use crate::relay::TransactionRelay;
use fleet_gateway::{intents, FleetContract};
use primitive_types::{H160, U256};
use shared_types::BridgeError;
use std::sync::Arc;
use tracing::{debug, info};

/// Ensures delegated spending rights ahead of value-moving calls.
pub struct AllowanceGuard {
    contract: FleetContract,
    relay: Arc<TransactionRelay>,
}

impl AllowanceGuard {
    /// Build a guard over the payment token exposed by `contract`.
    pub fn new(contract: FleetContract, relay: Arc<TransactionRelay>) -> Self {
        Self { contract, relay }
    }

    /// Ensure `spender` may move at least `required` wei of the credential
    /// holder's funds.
    ///
    /// Reads the current allowance; if short, submits an approval for
    /// exactly `required` and waits for confirmation, then re-reads once.
    /// A re-read still below `required` (a concurrent consumer raced the
    /// approval) fails with [`BridgeError::AllowanceInsufficient`] rather
    /// than looping.
    ///
    /// No stability promise survives the return: spend promptly.
    pub async fn ensure(
        &self,
        spender: H160,
        required: U256,
        credential: Credential,
    ) -> Result<(), BridgeError> {
        let owner = credential.address()?;
        let held = self.contract.allowance(owner, spender).await?;
        if held >= required {
            debug!(%owner, %spender, %held, %required, "allowance already sufficient");
            // credential unused; dropped (zeroized) on return
            return Ok(());
        }

        info!(%owner, %spender, %held, %required, "approving exact allowance");
        self.relay
            .submit(intents::approve(spender, required), credential)
            .await?;

        let after = self.contract.allowance(owner, spender).await?;
        if after < required {
            return Err(BridgeError::AllowanceInsufficient {
                held: after,
                required,
            });
        }
        Ok(())
    }
}
