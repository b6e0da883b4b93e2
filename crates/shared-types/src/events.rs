//! # Activity Event Envelope
//!
//! The common envelope every ledger event category is normalized into, plus
//! the tagged per-category payloads. `(block_number, log_index)` is the
//! globally unique event identity; `log_index` is unique within a block, so
//! ordering on the pair is always strict.

use primitive_types::{H160, U256};
use serde::{Deserialize, Serialize};

/// Placeholder substituted for a missing text field during normalization.
pub const UNKNOWN_LABEL: &str = "(unknown)";

/// The fixed set of ledger event categories the bridge understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// A product was ordered at a machine (payment already settled).
    Ordered,
    /// Treasury paid an expense (salary, stock, machine purchase).
    ExpensePaid,
    /// Primary-issue share purchase.
    SharesPurchased,
    /// Peer-to-peer share transfer.
    ShareTransferred,
    /// An investor withdrew accrued dividends.
    DividendClaimed,
    /// A governance proposal was opened.
    ProposalCreated,
    /// A vote was cast.
    Voted,
    /// A proposal crossed its threshold and was executed.
    ProposalExecuted,
    /// Profit was split between dividends and the growth fund.
    ProfitDistributed,
}

impl EventCategory {
    /// All categories, in the order the aggregator fetches them.
    pub const ALL: [EventCategory; 9] = [
        EventCategory::Ordered,
        EventCategory::ExpensePaid,
        EventCategory::SharesPurchased,
        EventCategory::ShareTransferred,
        EventCategory::DividendClaimed,
        EventCategory::ProposalCreated,
        EventCategory::Voted,
        EventCategory::ProposalExecuted,
        EventCategory::ProfitDistributed,
    ];

    /// Ledger-side event name for log queries.
    pub fn name(self) -> &'static str {
        match self {
            Self::Ordered => "CoffeeOrdered",
            Self::ExpensePaid => "ExpensePaid",
            Self::SharesPurchased => "SharesPurchased",
            Self::ShareTransferred => "ShareTransferred",
            Self::DividendClaimed => "DividendClaimed",
            Self::ProposalCreated => "ProposalCreated",
            Self::Voted => "Voted",
            Self::ProposalExecuted => "ProposalExecuted",
            Self::ProfitDistributed => "ProfitDistributed",
        }
    }
}

/// Globally unique event identity.
///
/// Natural order is chain order (oldest first); the activity ledger is
/// rendered newest-first by reversing this order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EventId {
    /// Block the event landed in.
    pub block_number: u64,
    /// Position within the block's log stream.
    pub log_index: u64,
}

impl EventId {
    /// Construct from a `(block, index)` pair.
    pub fn new(block_number: u64, log_index: u64) -> Self {
        Self {
            block_number,
            log_index,
        }
    }
}

/// Normalized, category-tagged event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventPayload {
    /// Product ordered at a machine.
    Ordered {
        /// Machine that received the order.
        machine_id: u64,
        /// Paying account.
        buyer: H160,
        /// Amount paid, in wei.
        amount: U256,
    },
    /// Treasury expense.
    ExpensePaid {
        /// Expense category label (e.g. "SALARY", "STOCK").
        category: String,
        /// Recipient of the payment.
        recipient: H160,
        /// Amount paid, in wei.
        amount: U256,
        /// Free-form note.
        note: String,
    },
    /// Primary share purchase.
    SharesPurchased {
        /// Buying investor.
        investor: H160,
        /// Shares bought, wei-scale.
        amount: U256,
        /// Total price paid, in wei.
        cost: U256,
    },
    /// Secondary share transfer.
    ShareTransferred {
        /// Sending investor.
        from: H160,
        /// Receiving investor.
        to: H160,
        /// Shares moved, wei-scale.
        amount: U256,
    },
    /// Dividend withdrawal.
    DividendClaimed {
        /// Claiming investor.
        investor: H160,
        /// Amount withdrawn, in wei.
        amount: U256,
    },
    /// Proposal opened.
    ProposalCreated {
        /// Proposal id.
        id: u64,
        /// Numeric proposal kind code.
        kind_code: u8,
        /// Proposal description.
        description: String,
    },
    /// Vote cast.
    Voted {
        /// Proposal voted on.
        proposal_id: u64,
        /// Voting account.
        voter: H160,
        /// Vote weight, wei-scale shares.
        weight: U256,
    },
    /// Proposal executed by the ledger.
    ProposalExecuted {
        /// Executed proposal id.
        id: u64,
    },
    /// Profit split event.
    ProfitDistributed {
        /// Portion distributed as dividends, in wei.
        dividend_amount: U256,
        /// Portion retained in the growth fund, in wei.
        growth_amount: U256,
    },
}

impl EventPayload {
    /// Category this payload belongs to.
    pub fn category(&self) -> EventCategory {
        match self {
            Self::Ordered { .. } => EventCategory::Ordered,
            Self::ExpensePaid { .. } => EventCategory::ExpensePaid,
            Self::SharesPurchased { .. } => EventCategory::SharesPurchased,
            Self::ShareTransferred { .. } => EventCategory::ShareTransferred,
            Self::DividendClaimed { .. } => EventCategory::DividendClaimed,
            Self::ProposalCreated { .. } => EventCategory::ProposalCreated,
            Self::Voted { .. } => EventCategory::Voted,
            Self::ProposalExecuted { .. } => EventCategory::ProposalExecuted,
            Self::ProfitDistributed { .. } => EventCategory::ProfitDistributed,
        }
    }
}

/// One normalized ledger event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Category tag (always matches `payload.category()`).
    pub category: EventCategory,
    /// Globally unique identity.
    pub id: EventId,
    /// Normalized payload.
    pub payload: EventPayload,
}

impl Event {
    /// Build an event; the category tag is derived from the payload.
    pub fn new(id: EventId, payload: EventPayload) -> Self {
        Self {
            category: payload.category(),
            id,
            payload,
        }
    }
}
