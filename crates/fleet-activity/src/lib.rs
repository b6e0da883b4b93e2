//! # Activity & Governance
//!
//! Two consumers of the gateway's read surface:
//!
//! - [`ActivityAggregator`] pulls every event category, normalizes the
//!   heterogeneous payloads into one envelope, and merges them into a
//!   deterministically ordered activity ledger.
//! - [`GovernanceTracker`] derives proposal lifecycle state from fresh
//!   ledger reads and forwards vote submissions through the relay. Vote
//!   weighting and threshold auto-execution stay ledger-side truths.

#![warn(clippy::all)]

pub mod aggregator;
pub mod governance;
pub mod normalize;

pub use aggregator::ActivityAggregator;
pub use governance::GovernanceTracker;
