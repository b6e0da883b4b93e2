//! # Typed Contract Accessor
//!
//! [`FleetContract`] wraps a [`LedgerRpc`] with the fleet DAO contract's
//! read surface, and [`intents`] builds the write-side [`CallIntent`]s.
//!
//! Struct reads decode positionally and ignore trailing fields, so a
//! redeployed contract that appends fields does not break the gateway.

use crate::ports::LedgerRpc;
use crate::wire::RawLog;
use primitive_types::{H160, U256};
use shared_types::{BridgeError, EventCategory, Machine, Proposal, ProposalKind};
use std::sync::Arc;

/// Tolerant decoders for raw node values.
///
/// The node may report numerics as JSON numbers, hex strings, or decimal
/// strings depending on version; these accept all three.
pub mod decode {
    use super::*;

    /// Decode a `u64` from a raw value.
    pub fn as_u64(value: &serde_json::Value) -> Option<u64> {
        if let Some(n) = value.as_u64() {
            return Some(n);
        }
        let s = value.as_str()?;
        if let Some(hex) = s.strip_prefix("0x") {
            u64::from_str_radix(hex, 16).ok()
        } else {
            s.parse().ok()
        }
    }

    /// Decode a `U256` from a raw value.
    pub fn as_u256(value: &serde_json::Value) -> Option<U256> {
        if let Some(n) = value.as_u64() {
            return Some(U256::from(n));
        }
        let s = value.as_str()?;
        if let Some(hex) = s.strip_prefix("0x") {
            U256::from_str_radix(hex, 16).ok()
        } else {
            U256::from_dec_str(s).ok()
        }
    }

    /// Decode an address from a raw value.
    pub fn as_address(value: &serde_json::Value) -> Option<H160> {
        let s = value.as_str()?;
        let hex = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(hex).ok()?;
        if bytes.len() != 20 {
            return None;
        }
        Some(H160::from_slice(&bytes))
    }

    /// Decode a bool from a raw value.
    pub fn as_bool(value: &serde_json::Value) -> Option<bool> {
        value.as_bool()
    }

    /// Decode a string from a raw value.
    pub fn as_text(value: &serde_json::Value) -> Option<String> {
        value.as_str().map(str::to_owned)
    }
}

/// Typed accessor for the fleet DAO contract at a fixed address.
///
/// Owns no mutable state; cheap to clone behind the shared `LedgerRpc`.
#[derive(Clone)]
pub struct FleetContract {
    rpc: Arc<dyn LedgerRpc>,
    address: H160,
}

impl FleetContract {
    /// Bind the accessor to a node connection and contract address.
    pub fn new(rpc: Arc<dyn LedgerRpc>, address: H160) -> Self {
        Self { rpc, address }
    }

    /// Contract address this accessor is bound to.
    pub fn address(&self) -> H160 {
        self.address
    }

    /// The underlying node connection, for components that need raw access
    /// (the relay's nonce/broadcast/receipt path).
    pub fn rpc(&self) -> Arc<dyn LedgerRpc> {
        Arc::clone(&self.rpc)
    }

    async fn read_u256(&self, method: &str, args: &[serde_json::Value]) -> Result<U256, BridgeError> {
        let raw = self.rpc.call(method, args).await?;
        decode::as_u256(&raw).ok_or_else(|| BridgeError::NotFound(method.to_string()))
    }

    async fn read_u64(&self, method: &str) -> Result<u64, BridgeError> {
        let raw = self.rpc.call(method, &[]).await?;
        decode::as_u64(&raw).ok_or_else(|| BridgeError::NotFound(method.to_string()))
    }

    /// Current price of one coffee, in wei.
    pub async fn coffee_price(&self) -> Result<U256, BridgeError> {
        self.read_u256("coffeePrice", &[]).await
    }

    /// Lifetime revenue, in wei.
    pub async fn total_revenue(&self) -> Result<U256, BridgeError> {
        self.read_u256("totalRevenue", &[]).await
    }

    /// Growth fund balance, in wei.
    pub async fn growth_fund(&self) -> Result<U256, BridgeError> {
        self.read_u256("growthFund", &[]).await
    }

    /// Operational reserve, in wei.
    pub async fn operational_reserve(&self) -> Result<U256, BridgeError> {
        self.read_u256("getOperationalReserve", &[]).await
    }

    /// Lifetime dividends distributed, in wei.
    pub async fn total_dividends_distributed(&self) -> Result<U256, BridgeError> {
        self.read_u256("totalDividendsDistributed", &[]).await
    }

    /// Price of one share, in wei.
    pub async fn share_price(&self) -> Result<U256, BridgeError> {
        self.read_u256("sharePrice", &[]).await
    }

    /// Unsold primary-issue shares, wei-scale.
    pub async fn available_shares(&self) -> Result<U256, BridgeError> {
        self.read_u256("getAvailableShares", &[]).await
    }

    /// Number of registered machines.
    pub async fn machine_count(&self) -> Result<u64, BridgeError> {
        self.read_u64("machineCount").await
    }

    /// Number of proposals ever created.
    pub async fn proposal_count(&self) -> Result<u64, BridgeError> {
        self.read_u64("proposalCount").await
    }

    /// Read one machine by id.
    pub async fn machine(&self, id: u64) -> Result<Machine, BridgeError> {
        let raw = self.rpc.call("machines", &[serde_json::json!(id)]).await?;
        decode_machine(&raw).ok_or_else(|| BridgeError::NotFound(format!("machine {id}")))
    }

    /// Read the whole fleet (ids start at 1).
    pub async fn machines(&self) -> Result<Vec<Machine>, BridgeError> {
        let count = self.machine_count().await?;
        let mut out = Vec::with_capacity(count as usize);
        for id in 1..=count {
            out.push(self.machine(id).await?);
        }
        Ok(out)
    }

    /// Read one proposal by id.
    pub async fn proposal(&self, id: u64) -> Result<Proposal, BridgeError> {
        let raw = self.rpc.call("proposals", &[serde_json::json!(id)]).await?;
        decode_proposal(&raw).ok_or_else(|| BridgeError::NotFound(format!("proposal {id}")))
    }

    /// Read every proposal (ids start at 1).
    pub async fn proposals(&self) -> Result<Vec<Proposal>, BridgeError> {
        let count = self.proposal_count().await?;
        let mut out = Vec::with_capacity(count as usize);
        for id in 1..=count {
            out.push(self.proposal(id).await?);
        }
        Ok(out)
    }

    /// Dividend an investor can withdraw right now, in wei.
    pub async fn withdrawable_dividend(&self, investor: H160) -> Result<U256, BridgeError> {
        self.read_u256(
            "getWithdrawableDividend",
            &[serde_json::to_value(investor).unwrap_or_default()],
        )
        .await
    }

    /// Share balance of an investor, wei-scale.
    pub async fn share_balance(&self, investor: H160) -> Result<U256, BridgeError> {
        self.read_u256(
            "shareBalance",
            &[serde_json::to_value(investor).unwrap_or_default()],
        )
        .await
    }

    /// Payment-token allowance `owner` has granted `spender`, in wei.
    pub async fn allowance(&self, owner: H160, spender: H160) -> Result<U256, BridgeError> {
        self.read_u256(
            "allowance",
            &[
                serde_json::to_value(owner).unwrap_or_default(),
                serde_json::to_value(spender).unwrap_or_default(),
            ],
        )
        .await
    }

    /// Fetch raw logs of one event category from `from_block` to head.
    pub async fn logs(
        &self,
        category: EventCategory,
        from_block: u64,
    ) -> Result<Vec<RawLog>, BridgeError> {
        self.rpc.logs(category.name(), from_block).await
    }
}

/// Decode a positional machine struct `[id, location, active, total_sales, ..]`.
fn decode_machine(raw: &serde_json::Value) -> Option<Machine> {
    let fields = raw.as_array()?;
    Some(Machine {
        id: decode::as_u64(fields.first()?)?,
        location: decode::as_text(fields.get(1)?)?,
        active: decode::as_bool(fields.get(2)?)?,
        total_sales: decode::as_u256(fields.get(3)?)?,
    })
}

/// Decode a positional proposal struct
/// `[id, kind, target, amount, description, vote_weight, executed, end_time, ..]`.
fn decode_proposal(raw: &serde_json::Value) -> Option<Proposal> {
    let fields = raw.as_array()?;
    Some(Proposal {
        id: decode::as_u64(fields.first()?)?,
        kind: ProposalKind::from_code(decode::as_u64(fields.get(1)?)? as u8)?,
        target: decode::as_address(fields.get(2)?)?,
        amount: decode::as_u256(fields.get(3)?)?,
        description: decode::as_text(fields.get(4)?)?,
        vote_weight: decode::as_u256(fields.get(5)?)?,
        executed: decode::as_bool(fields.get(6)?)?,
        end_time: decode::as_u64(fields.get(7)?)?,
    })
}

/// Write-side intent builders for the fleet DAO contract.
pub mod intents {
    use super::*;
    use shared_types::CallIntent;

    fn addr(a: H160) -> serde_json::Value {
        serde_json::to_value(a).unwrap_or_default()
    }

    fn wei(v: U256) -> serde_json::Value {
        serde_json::to_value(v).unwrap_or_default()
    }

    /// Register a new machine at a location.
    pub fn add_machine(location: &str) -> CallIntent {
        CallIntent::new("addMachine", vec![serde_json::json!(location)])
    }

    /// Propose buying a machine from `seller` for `amount` wei.
    pub fn propose_buy_machine(seller: H160, amount: U256, description: &str) -> CallIntent {
        CallIntent::new(
            "proposeBuyMachine",
            vec![addr(seller), wei(amount), serde_json::json!(description)],
        )
    }

    /// Propose a stock purchase from `vendor` for `amount` wei.
    pub fn propose_buy_stock(vendor: H160, amount: U256, description: &str) -> CallIntent {
        CallIntent::new(
            "proposeBuyStock",
            vec![addr(vendor), wei(amount), serde_json::json!(description)],
        )
    }

    /// Propose updating `staff`'s monthly salary to `amount` wei.
    pub fn propose_update_salary(staff: H160, amount: U256, description: &str) -> CallIntent {
        CallIntent::new(
            "proposeUpdateSalary",
            vec![addr(staff), wei(amount), serde_json::json!(description)],
        )
    }

    /// Propose registering `vendor` as an approved supplier.
    pub fn propose_add_vendor(vendor: H160, description: &str) -> CallIntent {
        CallIntent::new(
            "proposeAddVendor",
            vec![addr(vendor), serde_json::json!(description)],
        )
    }

    /// Execute a passed proposal.
    pub fn execute_proposal(id: u64) -> CallIntent {
        CallIntent::new("executeProposal", vec![serde_json::json!(id)])
    }

    /// Set the coffee price, in wei.
    pub fn set_coffee_price(price: U256) -> CallIntent {
        CallIntent::new("setCoffeePrice", vec![wei(price)])
    }

    /// Pay a staff member's monthly salary.
    pub fn pay_monthly_salary(staff: H160) -> CallIntent {
        CallIntent::new("payMonthlySalary", vec![addr(staff)])
    }

    /// Buy one coffee at a machine.
    pub fn buy_coffee(machine_id: u64) -> CallIntent {
        CallIntent::new("buyCoffee", vec![serde_json::json!(machine_id)])
    }

    /// Vote on a proposal.
    pub fn vote(proposal_id: u64) -> CallIntent {
        CallIntent::new("vote", vec![serde_json::json!(proposal_id)])
    }

    /// Buy primary-issue shares, wei-scale amount.
    pub fn buy_shares(amount: U256) -> CallIntent {
        CallIntent::new("buyShares", vec![wei(amount)])
    }

    /// Grant `spender` a payment-token allowance of exactly `amount` wei.
    pub fn approve(spender: H160, amount: U256) -> CallIntent {
        CallIntent::new("approve", vec![addr(spender), wei(amount)])
    }
}
