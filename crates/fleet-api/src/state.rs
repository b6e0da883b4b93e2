//! Shared handler state: the component graph the runtime wires up.

use fleet_activity::{ActivityAggregator, GovernanceTracker};
use fleet_gateway::FleetContract;
use fleet_relay::{AllowanceGuard, CredentialSource, TransactionRelay};
use std::sync::Arc;

/// Handles to every subsystem a request may touch.
///
/// Holds no secrets: write handlers acquire a fresh [`fleet_relay::Credential`]
/// from the source per request and hand it straight to the relay.
#[derive(Clone)]
pub struct AppState {
    /// Typed contract reads.
    pub contract: FleetContract,
    /// Signed submission pipeline.
    pub relay: Arc<TransactionRelay>,
    /// Pre-flight allowance protocol for value-moving calls.
    pub guard: Arc<AllowanceGuard>,
    /// Proposal lifecycle reads and vote relay.
    pub tracker: Arc<GovernanceTracker>,
    /// Merged activity ledger.
    pub aggregator: Arc<ActivityAggregator>,
    /// Per-request admin credential source.
    pub credentials: Arc<dyn CredentialSource>,
}

impl AppState {
    /// Wire the subsystem graph over one contract accessor and relay.
    pub fn new(
        contract: FleetContract,
        relay: Arc<TransactionRelay>,
        credentials: Arc<dyn CredentialSource>,
    ) -> Self {
        let guard = Arc::new(AllowanceGuard::new(contract.clone(), Arc::clone(&relay)));
        let tracker = Arc::new(GovernanceTracker::new(contract.clone(), Arc::clone(&relay)));
        let aggregator = Arc::new(ActivityAggregator::new(contract.clone()));
        Self {
            contract,
            relay,
            guard,
            tracker,
            aggregator,
            credentials,
        }
    }
}
