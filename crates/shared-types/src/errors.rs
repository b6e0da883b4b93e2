//! # Error Taxonomy
//!
//! The single error enum shared by every bridge subsystem. Variants are
//! split along one axis that callers actually branch on: whether retrying
//! can possibly help.

use primitive_types::U256;
use thiserror::Error;

/// Errors surfaced by the bridge subsystems.
#[derive(Debug, Clone, Error)]
pub enum BridgeError {
    /// Transport-level failure talking to the ledger node. Transient;
    /// callers may retry with backoff.
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// Signing material unusable (malformed key, signer failure). Fatal;
    /// never retried.
    #[error("Credential error: {0}")]
    Credential(String),

    /// The ledger executed the call and reverted it. Deterministic:
    /// retrying against unchanged state reverts again.
    #[error("Execution reverted: {reason}")]
    ExecutionReverted {
        /// On-ledger revert reason, when the node exposes one.
        reason: String,
    },

    /// The ledger rejected the assigned nonce (raced by another submitter).
    #[error("Nonce conflict: {}", nonce_detail(.used))]
    NonceConflict {
        /// Nonce that was rejected, when the node reports it.
        used: Option<u64>,
    },

    /// Allowance still below the required amount after an approval cycle.
    #[error("Allowance insufficient: held {held}, required {required}")]
    AllowanceInsufficient {
        /// Allowance currently granted.
        held: U256,
        /// Amount the pending spend needs.
        required: U256,
    },

    /// An event payload did not match the expected shape for its category.
    /// Isolated per event; never aborts a batch.
    #[error("Schema mismatch in {category} event: missing field `{field}`")]
    SchemaMismatch {
        /// Event category that failed to normalize.
        category: String,
        /// Field that was absent or mistyped.
        field: String,
    },

    /// Read of a nonexistent id (machine, proposal).
    #[error("Not found: {0}")]
    NotFound(String),
}

fn nonce_detail(used: &Option<u64>) -> String {
    match used {
        Some(nonce) => format!("nonce {nonce} already consumed"),
        None => "assigned nonce rejected by the node".to_string(),
    }
}

impl BridgeError {
    /// Whether a retry with unchanged inputs can possibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connectivity(_))
    }
}
