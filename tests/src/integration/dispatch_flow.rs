//! # Dispatch Scenarios
//!
//! From a confirmed on-ledger purchase to exactly one physical dispense,
//! with device filtering and checkpoint progress across polls.

#[cfg(test)]
mod tests {
    use crate::integration::harness::{account, bridge_over, credential, units, CONTRACT};
    use fleet_dispatcher::{DispatcherConfig, Dispatcher, RecordingSink};
    use fleet_gateway::{intents, MemoryLedger};
    use serde_json::json;
    use std::sync::Arc;

    fn dispatcher_for(
        bridge: &crate::integration::harness::Bridge,
        machine_id: u64,
    ) -> (Arc<RecordingSink>, Dispatcher) {
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = Dispatcher::new(
            bridge.contract.clone(),
            sink.clone(),
            DispatcherConfig {
                machine_id,
                poll_interval_ms: 1,
                retry_backoff_ms: 1,
            },
        );
        (sink, dispatcher)
    }

    fn seeded() -> MemoryLedger {
        MemoryLedger::new(CONTRACT)
            .with_coffee_price(units(2))
            .with_machine("Central Station")
            .with_machine("Airport T2")
    }

    async fn buy(bridge: &crate::integration::harness::Bridge, machine_id: u64) {
        bridge
            .guard
            .ensure(CONTRACT, units(2), credential(1))
            .await
            .unwrap();
        bridge
            .relay
            .submit(intents::buy_coffee(machine_id), credential(1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_confirmed_purchase_dispenses_exactly_once() {
        let bridge = bridge_over(seeded());
        let (sink, mut dispatcher) = dispatcher_for(&bridge, 1);

        buy(&bridge, 1).await;

        assert_eq!(dispatcher.poll_once().await.unwrap(), 1);
        // the same events again on the next poll: already consumed
        assert_eq!(dispatcher.poll_once().await.unwrap(), 0);

        let tasks = sink.dispensed();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].machine_id, 1);
        assert_eq!(tasks[0].buyer, account(1));
        assert_eq!(tasks[0].amount, units(2));
    }

    #[tokio::test]
    async fn test_each_device_serves_only_its_orders() {
        let bridge = bridge_over(seeded());
        let (sink_one, mut device_one) = dispatcher_for(&bridge, 1);
        let (sink_two, mut device_two) = dispatcher_for(&bridge, 2);

        buy(&bridge, 1).await;
        buy(&bridge, 2).await;
        buy(&bridge, 1).await;

        device_one.poll_once().await.unwrap();
        device_two.poll_once().await.unwrap();

        assert_eq!(sink_one.dispensed().len(), 2);
        assert!(sink_one.dispensed().iter().all(|t| t.machine_id == 1));
        assert_eq!(sink_two.dispensed().len(), 1);
        assert_eq!(sink_two.dispensed()[0].machine_id, 2);
    }

    #[tokio::test]
    async fn test_duplicate_delivery_is_collapsed() {
        let bridge = bridge_over(seeded());
        let (sink, mut dispatcher) = dispatcher_for(&bridge, 1);

        let order = json!({
            "machineId": 1,
            "buyer": format!("{:#x}", account(1)),
            "amount": "0x1bc16d674ec80000",
        });
        bridge.ledger.push_raw_log("CoffeeOrdered", 7, 3, order.clone());
        bridge.ledger.push_raw_log("CoffeeOrdered", 7, 3, order);

        assert_eq!(dispatcher.poll_once().await.unwrap(), 1);
        assert_eq!(sink.dispensed().len(), 1);
    }

    #[tokio::test]
    async fn test_checkpoint_survives_quiet_polls() {
        let bridge = bridge_over(seeded());
        let (sink, mut dispatcher) = dispatcher_for(&bridge, 1);

        dispatcher.poll_once().await.unwrap();
        let quiet = dispatcher.checkpoint().unwrap();

        buy(&bridge, 1).await;
        dispatcher.poll_once().await.unwrap();
        let after = dispatcher.checkpoint().unwrap();

        assert!(after > quiet);
        assert_eq!(sink.dispensed().len(), 1);
    }

    #[tokio::test]
    async fn test_node_outage_defers_dispense_never_duplicates() {
        let bridge = bridge_over(seeded());
        let (sink, mut dispatcher) = dispatcher_for(&bridge, 1);

        buy(&bridge, 1).await;
        bridge.ledger.fail_connectivity(1);

        assert!(dispatcher.poll_once().await.is_err());
        assert!(sink.dispensed().is_empty());

        // recovery dispenses the deferred order exactly once
        assert_eq!(dispatcher.poll_once().await.unwrap(), 1);
        assert_eq!(dispatcher.poll_once().await.unwrap(), 0);
        assert_eq!(sink.dispensed().len(), 1);
    }
}
