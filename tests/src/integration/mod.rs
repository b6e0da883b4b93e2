//! Cross-subsystem integration scenarios.

pub mod activity_ordering;
pub mod allowance_flow;
pub mod dispatch_flow;
pub mod governance_flow;
pub mod relay_ordering;

#[cfg(test)]
pub(crate) mod harness {
    //! Shared fixture: a seeded in-memory ledger with the full component
    //! graph wired over it, the way the runtime wires production.

    use fleet_activity::{ActivityAggregator, GovernanceTracker};
    use fleet_gateway::{FleetContract, MemoryLedger};
    use fleet_relay::{AllowanceGuard, Credential, RelayConfig, TransactionRelay};
    use primitive_types::{H160, U256};
    use shared_types::units::WEI_PER_UNIT;
    use std::sync::Arc;

    pub const CONTRACT: H160 = H160::repeat_byte(0xFC);

    pub struct Bridge {
        pub ledger: Arc<MemoryLedger>,
        pub contract: FleetContract,
        pub relay: Arc<TransactionRelay>,
        pub guard: AllowanceGuard,
        pub tracker: GovernanceTracker,
        pub aggregator: ActivityAggregator,
    }

    /// Wire every component over one scripted ledger.
    pub fn bridge_over(ledger: MemoryLedger) -> Bridge {
        let ledger = Arc::new(ledger);
        let contract = FleetContract::new(ledger.clone(), ledger.contract_address());
        let relay = Arc::new(TransactionRelay::new(
            ledger.clone(),
            RelayConfig {
                receipt_poll_base_ms: 1,
                ..RelayConfig::default()
            },
        ));
        Bridge {
            guard: AllowanceGuard::new(contract.clone(), Arc::clone(&relay)),
            tracker: GovernanceTracker::new(contract.clone(), Arc::clone(&relay)),
            aggregator: ActivityAggregator::new(contract.clone()),
            ledger,
            contract,
            relay,
        }
    }

    /// Deterministic test credential; `tag` selects the account.
    pub fn credential(tag: u8) -> Credential {
        let mut bytes = [0u8; 32];
        bytes[31] = tag;
        Credential::from_bytes(bytes).expect("valid scalar")
    }

    /// The account a tagged credential signs for.
    pub fn account(tag: u8) -> H160 {
        credential(tag).address().expect("valid key")
    }

    /// `n` display units in wei.
    pub fn units(n: u64) -> U256 {
        U256::from(n) * U256::from(WEI_PER_UNIT)
    }
}
