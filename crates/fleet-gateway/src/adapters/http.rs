//! # HTTP Ledger Adapter
//!
//! [`LedgerRpc`] over JSON-RPC 2.0 against a fleet node. Generic chain
//! queries use the standard `eth_*` namespace; typed contract reads and
//! decoded logs go through the node's `fleet_*` indexer facade, which
//! resolves the externally supplied ABI schema server-side.
//!
//! Every transport or protocol failure maps to
//! [`BridgeError::Connectivity`]; retry policy belongs to callers.

use crate::contract::decode;
use crate::ports::LedgerRpc;
use crate::wire::{RawLog, Receipt};
use async_trait::async_trait;
use primitive_types::{H160, H256};
use serde::Deserialize;
use serde_json::json;
use shared_types::BridgeError;
use tracing::debug;

/// JSON-RPC client for a fleet ledger node.
pub struct HttpLedger {
    client: reqwest::Client,
    url: String,
    contract_address: H160,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<serde_json::Value>,
    error: Option<RpcError>,
}

impl HttpLedger {
    /// Connect to a node endpoint for the contract at `contract_address`.
    pub fn new(url: impl Into<String>, contract_address: H160) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            contract_address,
        }
    }

    async fn request(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, BridgeError> {
        debug!(rpc = method, "ledger request");
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BridgeError::Connectivity(e.to_string()))?;
        let decoded: RpcResponse = response
            .json()
            .await
            .map_err(|e| BridgeError::Connectivity(e.to_string()))?;
        if let Some(err) = decoded.error {
            // Nonce races surface as a node error, everything else is
            // treated as a transport-level failure. The node does not
            // report which nonce it rejected.
            if err.message.contains("nonce") {
                return Err(BridgeError::NonceConflict { used: None });
            }
            return Err(BridgeError::Connectivity(format!(
                "rpc error {}: {}",
                err.code, err.message
            )));
        }
        decoded
            .result
            .ok_or_else(|| BridgeError::Connectivity("empty rpc result".to_string()))
    }
}

#[async_trait]
impl LedgerRpc for HttpLedger {
    async fn block_number(&self) -> Result<u64, BridgeError> {
        let raw = self.request("eth_blockNumber", json!([])).await?;
        decode::as_u64(&raw)
            .ok_or_else(|| BridgeError::Connectivity("unparseable block number".to_string()))
    }

    async fn transaction_count(&self, account: H160) -> Result<u64, BridgeError> {
        let raw = self
            .request(
                "eth_getTransactionCount",
                json!([serde_json::to_value(account).unwrap_or_default(), "pending"]),
            )
            .await?;
        decode::as_u64(&raw)
            .ok_or_else(|| BridgeError::Connectivity("unparseable nonce".to_string()))
    }

    async fn call(
        &self,
        method: &str,
        args: &[serde_json::Value],
    ) -> Result<serde_json::Value, BridgeError> {
        self.request(
            "fleet_call",
            json!([
                serde_json::to_value(self.contract_address).unwrap_or_default(),
                method,
                args,
            ]),
        )
        .await
    }

    async fn send_raw_transaction(&self, raw: Vec<u8>) -> Result<H256, BridgeError> {
        let encoded = format!("0x{}", hex::encode(raw));
        let result = self
            .request("eth_sendRawTransaction", json!([encoded]))
            .await?;
        let text = result
            .as_str()
            .ok_or_else(|| BridgeError::Connectivity("unparseable tx hash".to_string()))?;
        let bytes = hex::decode(text.strip_prefix("0x").unwrap_or(text))
            .map_err(|e| BridgeError::Connectivity(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(BridgeError::Connectivity("bad tx hash length".to_string()));
        }
        Ok(H256::from_slice(&bytes))
    }

    async fn transaction_receipt(&self, hash: H256) -> Result<Option<Receipt>, BridgeError> {
        let raw = self
            .request(
                "eth_getTransactionReceipt",
                json!([serde_json::to_value(hash).unwrap_or_default()]),
            )
            .await?;
        if raw.is_null() {
            return Ok(None);
        }
        let status = raw
            .get("status")
            .and_then(decode::as_u64)
            .ok_or_else(|| BridgeError::Connectivity("receipt missing status".to_string()))?;
        let block_number = raw
            .get("blockNumber")
            .and_then(decode::as_u64)
            .unwrap_or_default();
        let revert_reason = raw
            .get("revertReason")
            .and_then(|v| v.as_str())
            .map(str::to_owned);
        Ok(Some(Receipt {
            tx_hash: hash,
            block_number,
            success: status == 1,
            revert_reason,
        }))
    }

    async fn logs(&self, event_name: &str, from_block: u64) -> Result<Vec<RawLog>, BridgeError> {
        let raw = self
            .request(
                "fleet_getLogs",
                json!([
                    serde_json::to_value(self.contract_address).unwrap_or_default(),
                    event_name,
                    from_block,
                ]),
            )
            .await?;
        let entries = raw
            .as_array()
            .ok_or_else(|| BridgeError::Connectivity("unparseable log batch".to_string()))?;
        let mut out = Vec::with_capacity(entries.len());
        for entry in entries {
            let block_number = entry
                .get("blockNumber")
                .and_then(decode::as_u64)
                .unwrap_or_default();
            let log_index = entry
                .get("logIndex")
                .and_then(decode::as_u64)
                .unwrap_or_default();
            let fields = entry
                .get("args")
                .cloned()
                .unwrap_or(serde_json::Value::Null);
            out.push(RawLog {
                block_number,
                log_index,
                fields,
            });
        }
        Ok(out)
    }
}
