//! Actor-simulation endpoints for demos and load tests. The caller supplies
//! the simulated actor's key per request; it is parsed into a scoped
//! credential, used for exactly one protocol run, and zeroized on drop.

use crate::error::ApiError;
use crate::state::AppState;
use crate::views::{scale_cost, tx_response};
use axum::extract::State;
use axum::Json;
use fleet_gateway::intents;
use fleet_relay::Credential;
use serde::Deserialize;
use shared_types::units::from_display;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct BuyCoffeeRequest {
    /// Simulated buyer's hex key. Never logged, never stored.
    pub key: String,
    pub machine_id: u64,
}

/// `POST /simulate/buy-coffee`
///
/// Allowance-guarded: reads the current price, ensures the contract may
/// pull exactly that amount, then relays the purchase.
pub async fn buy_coffee(
    State(state): State<AppState>,
    Json(req): Json<BuyCoffeeRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let price = state.contract.coffee_price().await?;
    let spender = state.contract.address();

    let guard_credential = Credential::from_hex(&req.key)?;
    state.guard.ensure(spender, price, guard_credential).await?;

    let spend_credential = Credential::from_hex(&req.key)?;
    let record = state
        .relay
        .submit(intents::buy_coffee(req.machine_id), spend_credential)
        .await?;
    info!(machine_id = req.machine_id, tx_hash = %record.hash, "coffee purchased");
    Ok(Json(tx_response(&record)))
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    /// Simulated voter's hex key. Never logged, never stored.
    pub key: String,
    pub proposal_id: u64,
}

/// `POST /simulate/vote`
pub async fn vote(
    State(state): State<AppState>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let credential = Credential::from_hex(&req.key)?;
    let record = state.tracker.submit_vote(req.proposal_id, credential).await?;
    Ok(Json(tx_response(&record)))
}

#[derive(Debug, Deserialize)]
pub struct BuySharesRequest {
    /// Simulated investor's hex key. Never logged, never stored.
    pub key: String,
    /// Shares to buy, display units.
    pub amount: f64,
}

/// `POST /simulate/buy-shares`
///
/// Allowance-guarded for the total cost at the current share price.
pub async fn buy_shares(
    State(state): State<AppState>,
    Json(req): Json<BuySharesRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if req.amount <= 0.0 || !req.amount.is_finite() {
        return Err(ApiError::bad_request("amount must be a positive number"));
    }
    let amount = from_display(req.amount);
    let price = state.contract.share_price().await?;
    let cost = scale_cost(amount, price);
    let spender = state.contract.address();

    let guard_credential = Credential::from_hex(&req.key)?;
    state.guard.ensure(spender, cost, guard_credential).await?;

    let spend_credential = Credential::from_hex(&req.key)?;
    let record = state
        .relay
        .submit(intents::buy_shares(amount), spend_credential)
        .await?;
    Ok(Json(tx_response(&record)))
}
