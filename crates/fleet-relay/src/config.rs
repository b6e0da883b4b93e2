//! Configuration for the submission pipeline.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Relay configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Fixed gas ceiling for every envelope.
    pub gas_limit: u64,
    /// Fixed gas price tier, in gwei.
    pub gas_price_gwei: u64,
    /// Chain the relay submits to.
    pub chain_id: u64,
    /// Receipt polls before giving up on a broadcast transaction.
    pub receipt_poll_attempts: u32,
    /// Base receipt-poll delay; doubles per attempt up to
    /// [`RelayConfig::max_backoff_exponent`].
    pub receipt_poll_base_ms: u64,
    /// Cap on the backoff doubling exponent.
    pub max_backoff_exponent: u32,
}

impl RelayConfig {
    /// Gas price in wei.
    pub fn gas_price_wei(&self) -> U256 {
        U256::from(self.gas_price_gwei) * U256::from(1_000_000_000u64)
    }

    /// Delay before receipt poll number `attempt` (zero-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(self.max_backoff_exponent);
        Duration::from_millis(self.receipt_poll_base_ms << exponent)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            gas_limit: 3_000_000,
            gas_price_gwei: 20,
            chain_id: 1337,
            receipt_poll_attempts: 12,
            receipt_poll_base_ms: 200,
            max_backoff_exponent: 6,
        }
    }
}
