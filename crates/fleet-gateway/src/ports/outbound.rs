//! # Outbound Port
//!
//! The raw ledger-node interface every adapter implements. Everything above
//! this trait is transport-agnostic: swapping the HTTP adapter for a
//! push-based subscription changes no caller.

use crate::wire::{RawLog, Receipt};
use async_trait::async_trait;
use primitive_types::{H160, H256};
use shared_types::BridgeError;

/// Raw read/write access to a ledger node.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Latest mined block number.
    async fn block_number(&self) -> Result<u64, BridgeError>;

    /// Current transaction count (next nonce) for an account.
    async fn transaction_count(&self, account: H160) -> Result<u64, BridgeError>;

    /// Execute a read-only contract call, returning the node's raw value.
    async fn call(
        &self,
        method: &str,
        args: &[serde_json::Value],
    ) -> Result<serde_json::Value, BridgeError>;

    /// Broadcast a signed transaction; returns its hash.
    async fn send_raw_transaction(&self, raw: Vec<u8>) -> Result<H256, BridgeError>;

    /// Fetch a receipt, `None` while the transaction is unmined.
    async fn transaction_receipt(&self, hash: H256) -> Result<Option<Receipt>, BridgeError>;

    /// Fetch logs of one event name from `from_block` (inclusive) to the
    /// chain head.
    async fn logs(&self, event_name: &str, from_block: u64) -> Result<Vec<RawLog>, BridgeError>;
}
