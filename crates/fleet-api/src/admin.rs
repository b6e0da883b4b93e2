//! Administrative write endpoints. Each handler acquires a fresh admin
//! credential, relays exactly one submission, and reports the receipt.

use crate::error::ApiError;
use crate::state::AppState;
use crate::views::{parse_address, tx_response};
use axum::extract::{Path, State};
use axum::Json;
use fleet_gateway::intents;
use serde::Deserialize;
use shared_types::units::from_display;
use shared_types::ProposalKind;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct AddMachineRequest {
    pub location: String,
}

/// `POST /admin/add-machine`
pub async fn add_machine(
    State(state): State<AppState>,
    Json(req): Json<AddMachineRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if req.location.trim().is_empty() {
        return Err(ApiError::bad_request("location must not be empty"));
    }
    let credential = state.credentials.acquire().await?;
    let record = state
        .relay
        .submit(intents::add_machine(req.location.trim()), credential)
        .await?;
    info!(location = %req.location, tx_hash = %record.hash, "machine registered");
    Ok(Json(tx_response(&record)))
}

#[derive(Debug, Deserialize)]
pub struct CreateProposalRequest {
    pub kind: ProposalKind,
    pub target: String,
    #[serde(default)]
    pub amount: f64,
    pub description: String,
}

/// `POST /admin/create-proposal`
pub async fn create_proposal(
    State(state): State<AppState>,
    Json(req): Json<CreateProposalRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if req.description.trim().is_empty() {
        return Err(ApiError::bad_request("description must not be empty"));
    }
    if req.amount < 0.0 || !req.amount.is_finite() {
        return Err(ApiError::bad_request("amount must be a non-negative number"));
    }
    let target = parse_address(&req.target)?;
    let credential = state.credentials.acquire().await?;
    let record = state
        .tracker
        .create_proposal(
            req.kind,
            target,
            from_display(req.amount),
            req.description.trim(),
            credential,
        )
        .await?;
    Ok(Json(tx_response(&record)))
}

/// `POST /admin/execute-proposal/:id`
pub async fn execute_proposal(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let credential = state.credentials.acquire().await?;
    let record = state.tracker.execute_proposal(id, credential).await?;
    Ok(Json(tx_response(&record)))
}

#[derive(Debug, Deserialize)]
pub struct SetPriceRequest {
    pub price: f64,
}

/// `POST /admin/set-price`
pub async fn set_price(
    State(state): State<AppState>,
    Json(req): Json<SetPriceRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if req.price <= 0.0 || !req.price.is_finite() {
        return Err(ApiError::bad_request("price must be a positive number"));
    }
    let credential = state.credentials.acquire().await?;
    let record = state
        .relay
        .submit(intents::set_coffee_price(from_display(req.price)), credential)
        .await?;
    Ok(Json(tx_response(&record)))
}

#[derive(Debug, Deserialize)]
pub struct PaySalaryRequest {
    pub staff: String,
}

/// `POST /admin/pay-salary`
pub async fn pay_salary(
    State(state): State<AppState>,
    Json(req): Json<PaySalaryRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let staff = parse_address(&req.staff)?;
    let credential = state.credentials.acquire().await?;
    let record = state
        .relay
        .submit(intents::pay_monthly_salary(staff), credential)
        .await?;
    Ok(Json(tx_response(&record)))
}
