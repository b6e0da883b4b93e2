//! # Fleet-Bridge Test Suite
//!
//! Unified test crate for scenarios that cross subsystem boundaries.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── relay_ordering.rs     # Nonce serialization under concurrency
//!     ├── allowance_flow.rs     # Ensure-then-spend, exact approvals
//!     ├── activity_ordering.rs  # Merged ledger order, placeholder isolation
//!     ├── governance_flow.rs    # Proposal lifecycle end to end
//!     └── dispatch_flow.rs      # Purchase to physical dispense
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p fleet-tests
//!
//! # By scenario
//! cargo test -p fleet-tests integration::relay_ordering
//! ```
//!
//! Every scenario runs real components over the scripted in-memory ledger;
//! nothing here mocks a subsystem away.

#![allow(dead_code)]

pub mod integration;
