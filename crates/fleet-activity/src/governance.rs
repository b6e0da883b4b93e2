//! # Governance Tracker
//!
//! Derives proposal lifecycle state from fresh gateway reads and forwards
//! submissions through the relay. This component never mirrors ledger-side
//! accounting: vote weight and the auto-execution threshold are read, not
//! recomputed, and nothing is cached across a submission.

use fleet_gateway::{intents, FleetContract};
use fleet_relay::{Credential, TransactionRelay};
use primitive_types::{H160, U256};
use shared_types::{BridgeError, Proposal, ProposalKind, TransactionRecord};
use std::sync::Arc;
use tracing::info;

/// Read-and-relay view over the DAO's proposals.
pub struct GovernanceTracker {
    contract: FleetContract,
    relay: Arc<TransactionRelay>,
}

impl GovernanceTracker {
    /// Build a tracker over a contract accessor and relay.
    pub fn new(contract: FleetContract, relay: Arc<TransactionRelay>) -> Self {
        Self { contract, relay }
    }

    /// Proposals the ledger has not executed, freshly read.
    pub async fn list_active(&self) -> Result<Vec<Proposal>, BridgeError> {
        let all = self.contract.proposals().await?;
        Ok(all.into_iter().filter(Proposal::is_open).collect())
    }

    /// Fresh read of one proposal.
    pub async fn proposal(&self, id: u64) -> Result<Proposal, BridgeError> {
        self.contract.proposal(id).await
    }

    /// Cast the credential holder's vote on a proposal.
    ///
    /// Existence is re-read first; weighting and threshold execution are
    /// the ledger's business, so the vote is relayed as-is afterwards.
    pub async fn submit_vote(
        &self,
        id: u64,
        credential: Credential,
    ) -> Result<TransactionRecord, BridgeError> {
        let proposal = self.contract.proposal(id).await?;
        info!(id, description = %proposal.description, "relaying vote");
        self.relay.submit(intents::vote(id), credential).await
    }

    /// Open a new proposal of the given kind.
    pub async fn create_proposal(
        &self,
        kind: ProposalKind,
        target: H160,
        amount: U256,
        description: &str,
        credential: Credential,
    ) -> Result<TransactionRecord, BridgeError> {
        let intent = match kind {
            ProposalKind::BuyMachine => intents::propose_buy_machine(target, amount, description),
            ProposalKind::BuyStock => intents::propose_buy_stock(target, amount, description),
            ProposalKind::UpdateSalary => {
                intents::propose_update_salary(target, amount, description)
            }
            ProposalKind::AddVendor => intents::propose_add_vendor(target, description),
        };
        self.relay.submit(intent, credential).await
    }

    /// Force-execute a passed proposal (admin path).
    ///
    /// Re-reads first: executing an already-executed proposal is refused
    /// locally instead of burning a doomed submission.
    pub async fn execute_proposal(
        &self,
        id: u64,
        credential: Credential,
    ) -> Result<TransactionRecord, BridgeError> {
        let proposal = self.contract.proposal(id).await?;
        if proposal.executed {
            return Err(BridgeError::ExecutionReverted {
                reason: "proposal already executed".to_string(),
            });
        }
        self.relay
            .submit(intents::execute_proposal(id), credential)
            .await
    }
}
