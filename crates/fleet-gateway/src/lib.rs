//! # Ledger Gateway
//!
//! Typed read/write access to the cooperative's on-ledger contract. The
//! gateway is a leaf dependency: it owns no mutable state, holds no secrets,
//! and is injected explicitly into every component that talks to the ledger.
//!
//! ## Module Structure
//!
//! ```text
//! fleet-gateway/
//! ├── ports/       # LedgerRpc outbound port
//! ├── wire/        # Transaction envelope, receipt, raw log shapes
//! ├── contract     # FleetContract typed accessor + intent builders
//! └── adapters/    # MemoryLedger (scripted test double), HttpLedger
//! ```
//!
//! Payload shape tolerance: the gateway hands event payloads through as raw
//! JSON and decodes struct reads positionally, ignoring trailing additions.
//! Normalizing payload fields is the activity aggregator's job.

#![warn(clippy::all)]

pub mod adapters;
pub mod contract;
pub mod ports;
pub mod wire;

pub use adapters::{HttpLedger, MemoryLedger};
pub use contract::{intents, FleetContract};
pub use ports::LedgerRpc;
pub use wire::{RawLog, Receipt, SignedTransaction, TransactionEnvelope};
