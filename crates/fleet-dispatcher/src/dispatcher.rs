//! # Polling State Machine
//!
//! Listening → Dispensing → Listening, forever. Each poll fetches order
//! events past the in-memory checkpoint, filters them to this device,
//! deduplicates by event identity, dispenses serially, then advances the
//! checkpoint. The checkpoint advances on every poll, including empty
//! ones, so the loop always makes forward progress.

use crate::config::DispatcherConfig;
use crate::ports::{DispenseSink, DispenseTask};
use fleet_activity::ActivityAggregator;
use fleet_gateway::FleetContract;
use shared_types::{BridgeError, EventCategory, EventId, EventPayload};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Observable dispatcher state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// Waiting for qualifying order events.
    Listening,
    /// Actuators in motion; not interruptible.
    Dispensing,
}

/// Dispatcher for one physical machine.
pub struct Dispatcher {
    contract: FleetContract,
    aggregator: ActivityAggregator,
    sink: Arc<dyn DispenseSink>,
    config: DispatcherConfig,
    state: DeviceState,
    /// Highest event identity consumed; `None` until the first poll.
    /// In-memory only: a restarted dispatcher re-baselines at the chain
    /// head and intentionally drops whatever happened while it was down.
    checkpoint: Option<EventId>,
}

impl Dispatcher {
    /// Build a dispatcher over a contract accessor and a dispense sink.
    pub fn new(
        contract: FleetContract,
        sink: Arc<dyn DispenseSink>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            aggregator: ActivityAggregator::new(contract.clone()),
            contract,
            sink,
            config,
            state: DeviceState::Listening,
            checkpoint: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Current checkpoint, for inspection.
    pub fn checkpoint(&self) -> Option<EventId> {
        self.checkpoint
    }

    /// Resume from a known position (everything at or before `id` is
    /// treated as consumed).
    pub fn resume_from(&mut self, id: EventId) {
        self.checkpoint = Some(id);
    }

    /// Run the poll loop until `stop` flips to `true`.
    ///
    /// The stop signal is honored between polls only; an in-flight
    /// dispense always completes. A failed poll is logged prominently and
    /// retried after a fixed backoff; the loop never exits on error.
    pub async fn run(&mut self, mut stop: watch::Receiver<bool>) {
        if !self.baseline_with_retry(&mut stop).await {
            info!(machine_id = self.config.machine_id, "dispatcher stopped");
            return;
        }
        info!(
            machine_id = self.config.machine_id,
            checkpoint = ?self.checkpoint,
            "dispatcher listening"
        );

        loop {
            if *stop.borrow() {
                break;
            }
            let pause = match self.poll_once().await {
                Ok(dispensed) => {
                    if dispensed > 0 {
                        info!(
                            machine_id = self.config.machine_id,
                            dispensed, "poll complete"
                        );
                    }
                    self.config.poll_interval()
                }
                Err(err) => {
                    error!(
                        machine_id = self.config.machine_id,
                        %err,
                        "poll failed, operator attention may be needed"
                    );
                    self.config.retry_backoff()
                }
            };
            tokio::select! {
                _ = stop.changed() => {
                    if *stop.borrow() {
                        break;
                    }
                }
                _ = tokio::time::sleep(pause) => {}
            }
        }
        info!(machine_id = self.config.machine_id, "dispatcher stopped");
    }

    /// One poll: fetch, filter, deduplicate, dispense, advance.
    ///
    /// Returns the number of dispenses performed. On error the checkpoint
    /// is untouched, so no qualifying event is lost to a transient fault.
    pub async fn poll_once(&mut self) -> Result<usize, BridgeError> {
        let head = self.contract.rpc().block_number().await?;
        let from_block = self
            .checkpoint
            .map(|id| id.block_number)
            .unwrap_or(0);
        let events = self
            .aggregator
            .fetch_category(EventCategory::Ordered, from_block)
            .await?;

        let mut seen: HashSet<EventId> = HashSet::new();
        let mut dispensed = 0usize;
        let mut newest: Option<EventId> = None;
        for event in events {
            if let Some(checkpoint) = self.checkpoint {
                if event.id <= checkpoint {
                    continue;
                }
            }
            // Every fetched event past the checkpoint counts as consumed,
            // including ones filtered out below
            if newest.is_none_or(|n| event.id > n) {
                newest = Some(event.id);
            }
            if !seen.insert(event.id) {
                debug!(event_id = ?event.id, "duplicate event identity skipped");
                continue;
            }
            let EventPayload::Ordered {
                machine_id,
                buyer,
                amount,
            } = event.payload
            else {
                continue;
            };
            if machine_id != self.config.machine_id {
                debug!(
                    machine_id,
                    own_id = self.config.machine_id,
                    "order for another machine ignored"
                );
                continue;
            }

            // Serialized: one dispense at a time, run to completion
            self.state = DeviceState::Dispensing;
            self.sink
                .dispense(&DispenseTask {
                    machine_id,
                    buyer,
                    amount,
                    event_id: event.id,
                })
                .await;
            self.state = DeviceState::Listening;
            dispensed += 1;
        }

        // Monotonic advance, even when the batch was empty: the whole
        // head block has been consumed. The log fetch has no upper bound,
        // so a block mined between the head read and the fetch can carry
        // events newer than `head`; those were consumed too, and the
        // checkpoint must cover them or the next poll would replay them.
        let mut advanced = EventId::new(head, u64::MAX);
        if let Some(newest) = newest {
            if newest > advanced {
                advanced = newest;
            }
        }
        if self.checkpoint.is_none_or(|cp| advanced > cp) {
            self.checkpoint = Some(advanced);
        }
        Ok(dispensed)
    }

    /// Baseline the checkpoint at the chain head, dropping history.
    ///
    /// Retried with backoff until the head read succeeds, so a transient
    /// node fault at startup can never send the first poll back to
    /// genesis and replay old orders. Returns `false` if `stop` flipped
    /// before a baseline was established.
    async fn baseline_with_retry(&mut self, stop: &mut watch::Receiver<bool>) -> bool {
        while self.checkpoint.is_none() {
            if *stop.borrow() {
                return false;
            }
            match self.contract.rpc().block_number().await {
                Ok(head) => self.checkpoint = Some(EventId::new(head, u64::MAX)),
                Err(err) => {
                    error!(%err, "could not baseline checkpoint at head, retrying");
                    tokio::select! {
                        _ = stop.changed() => {
                            if *stop.borrow() {
                                return false;
                            }
                        }
                        _ = tokio::time::sleep(self.config.retry_backoff()) => {}
                    }
                }
            }
        }
        true
    }
}
