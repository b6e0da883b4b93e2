//! # Shared Types Crate
//!
//! This crate contains all domain entities shared across the Fleet-Bridge
//! subsystem crates: accounts, machines, proposals, the activity event
//! envelope, and the common error taxonomy.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: all cross-subsystem types are defined here.
//! - **No I/O**: this crate is pure data; ports and adapters live in the
//!   subsystem crates that own them.
//! - **Ledger units stay integral**: monetary values are `U256` wei
//!   everywhere; conversion to human-scale numbers happens only at the API
//!   boundary via [`units`].

pub mod entities;
pub mod errors;
pub mod events;
pub mod units;

pub use entities::*;
pub use errors::BridgeError;
pub use events::*;

// Re-export the primitives used across all subsystems.
pub use primitive_types::{H160, H256, U256};
