//! # Submission Pipeline
//!
//! One entry point: [`TransactionRelay::submit`]. Pipeline per submission:
//!
//! 1. Acquire the per-account lock (serializes all submissions from one
//!    account; the core defense against nonce collisions)
//! 2. Fetch the current nonce
//! 3. Build the standardized envelope (fixed gas ceiling and price tier)
//! 4. Sign, then discard the credential
//! 5. Broadcast (one retry with a refreshed nonce on a nonce conflict)
//! 6. Poll for the receipt with capped exponential backoff
//! 7. Classify the receipt status bit
//! 8. Release the lock

use crate::config::RelayConfig;
use crate::credential::Credential;
use fleet_gateway::ports::LedgerRpc;
use fleet_gateway::wire::{SignedTransaction, TransactionEnvelope};
use parking_lot::Mutex;
use primitive_types::{H160, H256};
use shared_types::{BridgeError, CallIntent, TransactionRecord, TransactionStatus};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Relays signed submissions to the ledger for any number of accounts.
pub struct TransactionRelay {
    rpc: Arc<dyn LedgerRpc>,
    config: RelayConfig,
    locks: Mutex<HashMap<H160, Arc<tokio::sync::Mutex<()>>>>,
}

impl TransactionRelay {
    /// Create a relay over a node connection.
    pub fn new(rpc: Arc<dyn LedgerRpc>, config: RelayConfig) -> Self {
        Self {
            rpc,
            config,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// The submission lock for one account.
    fn account_lock(&self, account: H160) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock();
        Arc::clone(locks.entry(account).or_default())
    }

    /// Submit one intent signed by `credential` and wait for its receipt.
    ///
    /// The credential is consumed: it is dropped (and zeroized) as soon as
    /// the broadcast is accepted, before receipt polling begins.
    pub async fn submit(
        &self,
        intent: CallIntent,
        credential: Credential,
    ) -> Result<TransactionRecord, BridgeError> {
        let account = credential.address()?;
        let lock = self.account_lock(account);
        let _guard = lock.lock().await;

        let (hash, nonce) = self.broadcast(account, &intent, credential).await?;

        let record = TransactionRecord {
            hash,
            account,
            nonce,
            status: TransactionStatus::Pending,
        };
        debug!(
            account = %account,
            nonce,
            tx_hash = %hash,
            method = %intent.method,
            "broadcast accepted"
        );

        self.await_receipt(record).await
    }

    /// Sign and broadcast, retrying a nonce conflict exactly once with a
    /// refreshed nonce. Consumes the credential.
    async fn broadcast(
        &self,
        account: H160,
        intent: &CallIntent,
        credential: Credential,
    ) -> Result<(H256, u64), BridgeError> {
        let nonce = self.rpc.transaction_count(account).await?;
        match self
            .broadcast_once(account, intent, &credential, nonce)
            .await
        {
            Err(BridgeError::NonceConflict { used }) => {
                warn!(account = %account, used = ?used, "nonce conflict, refreshing once");
                let refreshed = self.rpc.transaction_count(account).await?;
                let hash = self
                    .broadcast_once(account, intent, &credential, refreshed)
                    .await?;
                Ok((hash, refreshed))
            }
            Err(other) => Err(other),
            Ok(hash) => Ok((hash, nonce)),
        }
        // credential dropped (zeroized) here, before receipt polling
    }

    async fn broadcast_once(
        &self,
        account: H160,
        intent: &CallIntent,
        credential: &Credential,
        nonce: u64,
    ) -> Result<H256, BridgeError> {
        let envelope = TransactionEnvelope {
            from: account,
            intent: intent.clone(),
            nonce,
            gas: self.config.gas_limit,
            gas_price: self.config.gas_price_wei(),
            chain_id: self.config.chain_id,
        };
        let signature = credential.sign_digest(&envelope.digest())?;
        let signed = SignedTransaction {
            envelope,
            signature,
        };
        self.rpc.send_raw_transaction(signed.to_bytes()).await
    }

    /// Poll for the receipt with capped exponential backoff, then classify
    /// the status bit.
    async fn await_receipt(
        &self,
        mut record: TransactionRecord,
    ) -> Result<TransactionRecord, BridgeError> {
        for attempt in 0..self.config.receipt_poll_attempts {
            match self.rpc.transaction_receipt(record.hash).await {
                Ok(Some(receipt)) => {
                    if receipt.success {
                        record.status = TransactionStatus::Confirmed;
                        info!(
                            tx_hash = %record.hash,
                            nonce = record.nonce,
                            block = receipt.block_number,
                            "transaction confirmed"
                        );
                        return Ok(record);
                    }
                    record.status = TransactionStatus::Reverted;
                    let reason = receipt
                        .revert_reason
                        .unwrap_or_else(|| "no reason reported".to_string());
                    warn!(tx_hash = %record.hash, %reason, "transaction reverted");
                    return Err(BridgeError::ExecutionReverted { reason });
                }
                Ok(None) => {}
                // Transient polling failures are absorbed by the backoff;
                // the broadcast already happened
                Err(BridgeError::Connectivity(reason)) => {
                    debug!(%reason, attempt, "receipt poll failed");
                }
                Err(other) => return Err(other),
            }
            tokio::time::sleep(self.config.backoff(attempt)).await;
        }
        Err(BridgeError::Connectivity(format!(
            "no receipt for {} after {} polls",
            record.hash, self.config.receipt_poll_attempts
        )))
    }
}
