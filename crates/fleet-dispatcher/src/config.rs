//! Dispatcher configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one device's dispatcher.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Machine identity this device answers to.
    pub machine_id: u64,
    /// Sleep between polls, in milliseconds.
    pub poll_interval_ms: u64,
    /// Fixed sleep after a failed poll, in milliseconds.
    pub retry_backoff_ms: u64,
}

impl DispatcherConfig {
    /// Config for a machine id with the default timings.
    pub fn for_machine(machine_id: u64) -> Self {
        Self {
            machine_id,
            ..Self::default()
        }
    }

    /// Inter-poll sleep.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Post-failure sleep.
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            machine_id: 1,
            poll_interval_ms: 1_000,
            retry_backoff_ms: 5_000,
        }
    }
}
