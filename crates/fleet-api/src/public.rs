//! Read-only dashboard endpoints. Every number is a fresh ledger read;
//! nothing here is cached or recomputed off-chain.

use crate::error::ApiError;
use crate::state::AppState;
use crate::views::{parse_address, ActivityView, InvestorView, MachineView, ProposalView, StatsView};
use axum::extract::{Path, State};
use axum::Json;
use serde_json::json;

/// `GET /` liveness probe.
pub async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "service": "fleet-bridge",
        "contract": format!("{:#x}", state.contract.address()),
    }))
}

/// `GET /public/stats`
pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsView>, ApiError> {
    use shared_types::units::to_display;
    let c = &state.contract;
    Ok(Json(StatsView {
        total_revenue: to_display(c.total_revenue().await?),
        growth_fund: to_display(c.growth_fund().await?),
        operational_reserve: to_display(c.operational_reserve().await?),
        total_dividends_distributed: to_display(c.total_dividends_distributed().await?),
        coffee_price: to_display(c.coffee_price().await?),
        share_price: to_display(c.share_price().await?),
        available_shares: to_display(c.available_shares().await?),
        machine_count: c.machine_count().await?,
    }))
}

/// `GET /public/machines`
pub async fn machines(State(state): State<AppState>) -> Result<Json<Vec<MachineView>>, ApiError> {
    let fleet = state.contract.machines().await?;
    Ok(Json(fleet.iter().map(MachineView::from).collect()))
}

/// `GET /public/proposals` active proposals only.
pub async fn proposals(State(state): State<AppState>) -> Result<Json<Vec<ProposalView>>, ApiError> {
    let active = state.tracker.list_active().await?;
    Ok(Json(active.iter().map(ProposalView::from).collect()))
}

/// `GET /public/activity` merged ledger, newest first.
pub async fn activity(State(state): State<AppState>) -> Result<Json<Vec<ActivityView>>, ApiError> {
    let events = state.aggregator.fetch_all(0).await?;
    Ok(Json(events.iter().map(ActivityView::from).collect()))
}

/// `GET /investor/:address`
pub async fn investor(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<InvestorView>, ApiError> {
    use shared_types::units::to_display;
    let addr = parse_address(&address)?;
    Ok(Json(InvestorView {
        address: format!("{addr:#x}"),
        share_balance: to_display(state.contract.share_balance(addr).await?),
        withdrawable_dividend: to_display(state.contract.withdrawable_dividend(addr).await?),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::test_state;
    use axum::http::StatusCode;
    use primitive_types::{H160, U256};
    use serde_json::json;
    use shared_types::units::WEI_PER_UNIT;

    fn units(n: u64) -> U256 {
        U256::from(n) * U256::from(WEI_PER_UNIT)
    }

    #[tokio::test]
    async fn test_stats_reports_display_units() {
        let (ledger, state) = test_state();
        drop(ledger);
        let Json(view) = stats(State(state)).await.unwrap();
        assert_eq!(view.coffee_price, 2.0);
        assert_eq!(view.machine_count, 1);
    }

    #[tokio::test]
    async fn test_machines_lists_seeded_fleet() {
        let (_ledger, state) = test_state();
        let Json(fleet) = machines(State(state)).await.unwrap();
        assert_eq!(fleet.len(), 1);
        assert_eq!(fleet[0].location, "Central Station");
    }

    #[tokio::test]
    async fn test_activity_is_newest_first() {
        let (ledger, state) = test_state();
        ledger.push_raw_log("ProposalExecuted", 3, 0, json!({"id": 1}));
        ledger.push_raw_log("ProposalExecuted", 9, 0, json!({"id": 2}));

        let Json(feed) = activity(State(state)).await.unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].block_number, 9);
        assert_eq!(feed[1].block_number, 3);
    }

    #[tokio::test]
    async fn test_investor_reads_position() {
        let investor_addr = H160::repeat_byte(0x42);
        let ledger = std::sync::Arc::new(
            fleet_gateway::MemoryLedger::new(H160::repeat_byte(0xFC))
                .with_shares(investor_addr, units(7)),
        );
        let state = crate::testutil::state_over(ledger);

        let Json(view) = investor(State(state), Path(format!("{investor_addr:#x}")))
            .await
            .unwrap();
        assert_eq!(view.share_balance, 7.0);
    }

    #[tokio::test]
    async fn test_investor_rejects_malformed_address() {
        let (_ledger, state) = test_state();
        let err = investor(State(state), Path("0xzz".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_node_outage_maps_to_bad_gateway() {
        let (ledger, state) = test_state();
        ledger.fail_connectivity(1);
        let err = stats(State(state)).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }
}
