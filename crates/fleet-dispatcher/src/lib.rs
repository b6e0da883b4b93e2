//! # Device Dispatcher
//!
//! One dispatcher instance runs per physical machine. It polls the order
//! event stream, keeps only events addressed to its configured machine id,
//! and drives the physical dispense through the [`DispenseSink`] port:
//! exactly once per unique event identity, serialized, never interrupted
//! mid-dispense.
//!
//! State machine: **Listening → Dispensing → Listening**; no terminal
//! state. The only cancellation point is between polls: once payment is
//! confirmed on the ledger, dispensing is irrevocable.
//!
//! The poll/filter/checkpoint contract is independent of the delivery
//! mechanism; a push subscription could replace the polling loop without
//! changing the sink or its callers.

#![warn(clippy::all)]

pub mod config;
pub mod dispatcher;
pub mod ports;

pub use config::DispatcherConfig;
pub use dispatcher::{DeviceState, Dispatcher};
pub use ports::{DispenseSink, DispenseTask, HardwareSink, RecordingSink};
