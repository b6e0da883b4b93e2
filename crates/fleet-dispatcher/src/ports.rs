//! # Dispense Port
//!
//! The outbound seam between event plumbing and physical hardware.

use async_trait::async_trait;
use parking_lot::Mutex;
use primitive_types::{H160, U256};
use shared_types::EventId;
use std::time::Duration;
use tracing::info;

/// One physical dispense to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispenseTask {
    /// Machine performing the dispense.
    pub machine_id: u64,
    /// Paying account, for the receipt display.
    pub buyer: H160,
    /// Amount paid, in wei.
    pub amount: U256,
    /// Ledger event that triggered this task.
    pub event_id: EventId,
}

/// Physical dispense actuator - outbound port.
///
/// Dispensing is irrevocable: payment is already confirmed on the ledger
/// by the time a task reaches the sink, so the sink has no failure mode to
/// report back. Hardware faults are its own operational concern.
#[async_trait]
pub trait DispenseSink: Send + Sync {
    /// Perform one dispense. Runs to completion; never interrupted.
    async fn dispense(&self, task: &DispenseTask);
}

/// Drives the machine's actuators through their staged cycle.
pub struct HardwareSink {
    step_delay: Duration,
}

impl HardwareSink {
    /// Sink with a per-stage actuator delay.
    pub fn new(step_delay: Duration) -> Self {
        Self { step_delay }
    }
}

impl Default for HardwareSink {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl DispenseSink for HardwareSink {
    async fn dispense(&self, task: &DispenseTask) {
        info!(
            machine_id = task.machine_id,
            buyer = %task.buyer,
            amount = %task.amount,
            "order verified on-ledger, dispensing"
        );
        for stage in ["lowering cup", "grinding beans", "pouring water"] {
            info!(machine_id = task.machine_id, stage, "dispense stage");
            tokio::time::sleep(self.step_delay).await;
        }
        info!(machine_id = task.machine_id, "dispense complete");
    }
}

/// Records tasks instead of moving hardware.
#[derive(Default)]
pub struct RecordingSink {
    tasks: Mutex<Vec<DispenseTask>>,
}

impl RecordingSink {
    /// Everything dispensed so far.
    pub fn dispensed(&self) -> Vec<DispenseTask> {
        self.tasks.lock().clone()
    }
}

#[async_trait]
impl DispenseSink for RecordingSink {
    async fn dispense(&self, task: &DispenseTask) {
        self.tasks.lock().push(task.clone());
    }
}
