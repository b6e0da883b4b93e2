//! # Core Domain Entities
//!
//! Accounts, machines, governance proposals, and transaction records as the
//! on-ledger cooperative exposes them.
//!
//! ## Clusters
//!
//! - **Identity**: [`Account`], [`Role`]
//! - **Fleet**: [`Machine`]
//! - **Governance**: [`Proposal`], [`ProposalKind`]
//! - **Relay**: [`TransactionRecord`], [`TransactionStatus`], [`CallIntent`]

use primitive_types::{H160, H256, U256};
use serde::{Deserialize, Serialize};

/// Role of an account in the cooperative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Backend operator; signs administrative transactions.
    Admin,
    /// Shareholder with voting weight.
    Investor,
    /// Supplier paid through executed proposals.
    Vendor,
    /// Salaried staff member.
    Staff,
}

/// An on-ledger identity. Pure identity; owns no mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Ledger address.
    pub address: H160,
    /// Role within the cooperative.
    pub role: Role,
}

/// A physical vending machine registered in the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    /// Fleet-wide machine id (ids start at 1).
    pub id: u64,
    /// Human-readable location label.
    pub location: String,
    /// Whether the machine currently accepts orders.
    pub active: bool,
    /// Lifetime sales in wei.
    pub total_sales: U256,
}

/// Governance proposal categories, with the ledger's numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalKind {
    /// Purchase and register a new machine.
    BuyMachine,
    /// Purchase stock (beans, cups) from a vendor.
    BuyStock,
    /// Change a staff member's monthly salary.
    UpdateSalary,
    /// Register a new approved vendor.
    AddVendor,
}

impl ProposalKind {
    /// Ledger-side numeric code for this kind.
    pub fn code(self) -> u8 {
        match self {
            Self::BuyMachine => 0,
            Self::BuyStock => 1,
            Self::UpdateSalary => 2,
            Self::AddVendor => 3,
        }
    }

    /// Decode a ledger-side numeric code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::BuyMachine),
            1 => Some(Self::BuyStock),
            2 => Some(Self::UpdateSalary),
            3 => Some(Self::AddVendor),
            _ => None,
        }
    }
}

/// A governance proposal as read from the ledger.
///
/// `executed` is monotonic: once the ledger reports `true` it never reverts
/// to `false`. Vote weighting and the auto-execution threshold are
/// ledger-side truths; nothing off-chain recomputes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Proposal id (ids start at 1).
    pub id: u64,
    /// Category of the proposal.
    pub kind: ProposalKind,
    /// Beneficiary address (vendor, staff, seller).
    pub target: H160,
    /// Amount in wei (payment or new salary).
    pub amount: U256,
    /// Free-form description.
    pub description: String,
    /// Accumulated vote weight in wei-scale shares.
    pub vote_weight: U256,
    /// Whether the ledger has executed this proposal.
    pub executed: bool,
    /// Unix timestamp at which voting closes.
    pub end_time: u64,
}

impl Proposal {
    /// A proposal is open while the ledger has not executed it.
    pub fn is_open(&self) -> bool {
        !self.executed
    }
}

/// Status of a relayed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// Broadcast, receipt not yet seen.
    Pending,
    /// Receipt seen with success status.
    Confirmed,
    /// Receipt seen with revert status.
    Reverted,
}

/// Record of one relayed submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction hash assigned at broadcast.
    pub hash: H256,
    /// Submitting account.
    pub account: H160,
    /// Nonce consumed by this submission.
    pub nonce: u64,
    /// Final (or current) status.
    pub status: TransactionStatus,
}

/// A state-changing call, immutable once constructed.
///
/// Built by the gateway's typed intent builders and consumed by the relay,
/// which wraps it in a signed envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallIntent {
    /// Ledger method name.
    pub method: String,
    /// ABI-ordered arguments, JSON-encoded.
    pub args: Vec<serde_json::Value>,
    /// Native value attached to the call, in wei.
    pub value: U256,
}

impl CallIntent {
    /// Build an intent with no attached value.
    pub fn new(method: impl Into<String>, args: Vec<serde_json::Value>) -> Self {
        Self {
            method: method.into(),
            args,
            value: U256::zero(),
        }
    }

    /// Attach native value to the call.
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}
