//! # Wire Shapes
//!
//! The transaction envelope the relay signs, the broadcast form the ledger
//! accepts, and the raw shapes reads come back in.

use primitive_types::{H160, H256, U256};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use shared_types::CallIntent;

/// Unsigned transaction envelope with the standardized submission
/// parameters filled in by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    /// Submitting account.
    pub from: H160,
    /// The call being made.
    pub intent: CallIntent,
    /// Account nonce consumed by this envelope.
    pub nonce: u64,
    /// Gas ceiling.
    pub gas: u64,
    /// Gas price in wei.
    pub gas_price: U256,
    /// Chain the envelope is valid on.
    pub chain_id: u64,
}

impl TransactionEnvelope {
    /// Canonical signing digest of this envelope (keccak-256 over the
    /// JSON serialization).
    pub fn digest(&self) -> [u8; 32] {
        let encoded = serde_json::to_vec(self).unwrap_or_default();
        let mut hasher = Keccak256::new();
        hasher.update(&encoded);
        hasher.finalize().into()
    }
}

/// A signed envelope in broadcast form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// The signed envelope.
    pub envelope: TransactionEnvelope,
    /// ECDSA signature over [`TransactionEnvelope::digest`].
    pub signature: Vec<u8>,
}

impl SignedTransaction {
    /// Raw broadcast bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Decode broadcast bytes.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        serde_json::from_slice(bytes).ok()
    }

    /// Transaction hash (keccak-256 over the broadcast bytes).
    pub fn hash(&self) -> H256 {
        let mut hasher = Keccak256::new();
        hasher.update(self.to_bytes());
        H256::from_slice(&hasher.finalize())
    }
}

/// Mined-transaction receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Transaction hash.
    pub tx_hash: H256,
    /// Block the transaction was mined in.
    pub block_number: u64,
    /// Status bit: `true` on success, `false` on revert.
    pub success: bool,
    /// Revert reason, when the node exposes one.
    pub revert_reason: Option<String>,
}

/// An event log as fetched from the ledger, payload fields undecoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLog {
    /// Block the event landed in.
    pub block_number: u64,
    /// Position within the block's log stream.
    pub log_index: u64,
    /// Event arguments as the node reported them.
    pub fields: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope() -> TransactionEnvelope {
        TransactionEnvelope {
            from: H160::repeat_byte(0x11),
            intent: CallIntent::new("vote", vec![json!(3)]),
            nonce: 7,
            gas: 3_000_000,
            gas_price: U256::from(20_000_000_000u64),
            chain_id: 1337,
        }
    }

    #[test]
    fn test_digest_is_deterministic() {
        assert_eq!(envelope().digest(), envelope().digest());
    }

    #[test]
    fn test_digest_changes_with_nonce() {
        let mut other = envelope();
        other.nonce = 8;
        assert_ne!(envelope().digest(), other.digest());
    }

    #[test]
    fn test_signed_transaction_round_trips() {
        let signed = SignedTransaction {
            envelope: envelope(),
            signature: vec![0xAB; 64],
        };
        let decoded = SignedTransaction::from_bytes(&signed.to_bytes()).unwrap();
        assert_eq!(decoded.envelope, signed.envelope);
        assert_eq!(decoded.hash(), signed.hash());
    }
}
