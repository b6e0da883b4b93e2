//! Gateway adapters.

mod http;
mod memory;

pub use http::HttpLedger;
pub use memory::MemoryLedger;
