//! # Response Shapes
//!
//! Wire-facing views of the domain types. This is the only place wei
//! becomes a human-scale number; every subsystem below the API speaks
//! integer wei.

use crate::error::ApiError;
use primitive_types::{H160, U256};
use serde::Serialize;
use serde_json::json;
use shared_types::units::to_display;
use shared_types::{Event, EventPayload, Machine, Proposal, TransactionRecord};

/// Parse a `0x`-prefixed (or bare) hex address from a request.
pub fn parse_address(raw: &str) -> Result<H160, ApiError> {
    let hex_part = raw.trim().strip_prefix("0x").unwrap_or(raw.trim());
    let bytes = hex::decode(hex_part)
        .map_err(|_| ApiError::bad_request(format!("invalid address: {raw}")))?;
    if bytes.len() != 20 {
        return Err(ApiError::bad_request(format!("invalid address: {raw}")));
    }
    Ok(H160::from_slice(&bytes))
}

/// Canonical success body for write endpoints.
pub fn tx_response(record: &TransactionRecord) -> serde_json::Value {
    json!({
        "status": "confirmed",
        "tx_hash": format!("{:#x}", record.hash),
        "nonce": record.nonce,
    })
}

/// One machine, display units.
#[derive(Debug, Serialize)]
pub struct MachineView {
    pub id: u64,
    pub location: String,
    pub active: bool,
    pub total_sales: f64,
}

impl From<&Machine> for MachineView {
    fn from(m: &Machine) -> Self {
        Self {
            id: m.id,
            location: m.location.clone(),
            active: m.active,
            total_sales: to_display(m.total_sales),
        }
    }
}

/// One proposal, display units.
#[derive(Debug, Serialize)]
pub struct ProposalView {
    pub id: u64,
    pub kind: String,
    pub target: String,
    pub amount: f64,
    pub description: String,
    pub vote_weight: f64,
    pub executed: bool,
    pub end_time: u64,
}

impl From<&Proposal> for ProposalView {
    fn from(p: &Proposal) -> Self {
        Self {
            id: p.id,
            kind: format!("{:?}", p.kind),
            target: format!("{:#x}", p.target),
            amount: to_display(p.amount),
            description: p.description.clone(),
            vote_weight: to_display(p.vote_weight),
            executed: p.executed,
            end_time: p.end_time,
        }
    }
}

/// One activity ledger entry, rendered for the dashboard feed.
#[derive(Debug, Serialize)]
pub struct ActivityView {
    pub block_number: u64,
    pub log_index: u64,
    pub kind: &'static str,
    pub details: serde_json::Value,
}

impl From<&Event> for ActivityView {
    fn from(event: &Event) -> Self {
        let details = match &event.payload {
            EventPayload::Ordered {
                machine_id,
                buyer,
                amount,
            } => json!({
                "machine_id": machine_id,
                "buyer": format!("{buyer:#x}"),
                "amount": to_display(*amount),
            }),
            EventPayload::ExpensePaid {
                category,
                recipient,
                amount,
                note,
            } => json!({
                "category": category,
                "recipient": format!("{recipient:#x}"),
                "amount": to_display(*amount),
                "note": note,
            }),
            EventPayload::SharesPurchased {
                investor,
                amount,
                cost,
            } => json!({
                "investor": format!("{investor:#x}"),
                "amount": to_display(*amount),
                "cost": to_display(*cost),
            }),
            EventPayload::ShareTransferred { from, to, amount } => json!({
                "from": format!("{from:#x}"),
                "to": format!("{to:#x}"),
                "amount": to_display(*amount),
            }),
            EventPayload::DividendClaimed { investor, amount } => json!({
                "investor": format!("{investor:#x}"),
                "amount": to_display(*amount),
            }),
            EventPayload::ProposalCreated {
                id,
                kind_code,
                description,
            } => json!({
                "id": id,
                "kind_code": kind_code,
                "description": description,
            }),
            EventPayload::Voted {
                proposal_id,
                voter,
                weight,
            } => json!({
                "proposal_id": proposal_id,
                "voter": format!("{voter:#x}"),
                "weight": to_display(*weight),
            }),
            EventPayload::ProposalExecuted { id } => json!({ "id": id }),
            EventPayload::ProfitDistributed {
                dividend_amount,
                growth_amount,
            } => json!({
                "dividend_amount": to_display(*dividend_amount),
                "growth_amount": to_display(*growth_amount),
            }),
        };
        Self {
            block_number: event.id.block_number,
            log_index: event.id.log_index,
            kind: event.category.name(),
            details,
        }
    }
}

/// Cooperative-wide treasury and fleet statistics, display units.
#[derive(Debug, Serialize)]
pub struct StatsView {
    pub total_revenue: f64,
    pub growth_fund: f64,
    pub operational_reserve: f64,
    pub total_dividends_distributed: f64,
    pub coffee_price: f64,
    pub share_price: f64,
    pub available_shares: f64,
    pub machine_count: u64,
}

/// One investor's position, display units.
#[derive(Debug, Serialize)]
pub struct InvestorView {
    pub address: String,
    pub share_balance: f64,
    pub withdrawable_dividend: f64,
}

/// Wei-scale amount scaled by a wei-scale price: `shares * price / 10^18`.
pub fn scale_cost(amount: U256, price: U256) -> U256 {
    amount * price / U256::from(shared_types::units::WEI_PER_UNIT)
}
