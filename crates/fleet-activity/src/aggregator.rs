//! # Event Ledger Aggregator
//!
//! Fetches every event category independently, normalizes each log into the
//! common envelope, and merges the lot into one deterministically ordered
//! activity ledger: `(block_number desc, log_index desc)`.
//!
//! The descending intra-block order recovers true causal order for display:
//! a vote and its triggered auto-execution land in the same block, and the
//! execution (higher log index) must render ahead of the vote.

use crate::normalize::normalize;
use fleet_gateway::FleetContract;
use shared_types::{BridgeError, Event, EventCategory};
use tracing::{debug, warn};

/// Merges the ledger's event categories into one ordered activity log.
pub struct ActivityAggregator {
    contract: FleetContract,
}

impl ActivityAggregator {
    /// Build an aggregator over a contract accessor.
    pub fn new(contract: FleetContract) -> Self {
        Self { contract }
    }

    /// Fetch one category from `from_block` to head, in chain order
    /// (oldest first). Normalization gaps are logged, never fatal.
    pub async fn fetch_category(
        &self,
        category: EventCategory,
        from_block: u64,
    ) -> Result<Vec<Event>, BridgeError> {
        let logs = self.contract.logs(category, from_block).await?;
        let mut events = Vec::with_capacity(logs.len());
        for log in &logs {
            let (event, gaps) = normalize(category, log);
            for field in gaps {
                let err = BridgeError::SchemaMismatch {
                    category: category.name().to_string(),
                    field: field.to_string(),
                };
                warn!(
                    block = log.block_number,
                    log_index = log.log_index,
                    %err,
                    "placeholder substituted"
                );
            }
            events.push(event);
        }
        events.sort_unstable_by_key(|e| e.id);
        Ok(events)
    }

    /// Fetch every category from `from_block` to head and merge into one
    /// ledger ordered newest-first: `(block desc, log_index desc)`.
    pub async fn fetch_all(&self, from_block: u64) -> Result<Vec<Event>, BridgeError> {
        let mut merged = Vec::new();
        for category in EventCategory::ALL {
            let mut events = self.fetch_category(category, from_block).await?;
            merged.append(&mut events);
        }
        // log_index is unique per block, so this order is total and strict
        merged.sort_unstable_by(|a, b| b.id.cmp(&a.id));
        debug!(count = merged.len(), from_block, "aggregated activity ledger");
        Ok(merged)
    }
}
