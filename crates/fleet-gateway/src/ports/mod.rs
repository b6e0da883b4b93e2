//! Gateway ports.

mod outbound;

pub use outbound::LedgerRpc;
