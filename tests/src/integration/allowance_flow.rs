//! # Allowance Flow Scenarios
//!
//! The ensure-then-spend protocol end to end: a purchase preceded by the
//! guard must land exactly once, with an approval sized to the purchase
//! and fully consumed by it.

#[cfg(test)]
mod tests {
    use crate::integration::harness::{account, bridge_over, credential, units, CONTRACT};
    use fleet_gateway::{intents, LedgerRpc, MemoryLedger};
    use shared_types::{BridgeError, EventCategory, EventPayload, U256};

    fn seeded() -> MemoryLedger {
        MemoryLedger::new(CONTRACT)
            .with_coffee_price(units(2))
            .with_machine("Central Station")
    }

    #[tokio::test]
    async fn test_guarded_purchase_lands_once_and_consumes_grant() {
        let bridge = bridge_over(seeded());
        let price = bridge.contract.coffee_price().await.unwrap();

        bridge
            .guard
            .ensure(CONTRACT, price, credential(1))
            .await
            .unwrap();
        bridge
            .relay
            .submit(intents::buy_coffee(1), credential(1))
            .await
            .unwrap();

        // grant sized to the purchase, fully consumed
        assert_eq!(
            bridge.ledger.allowance_of(account(1), CONTRACT),
            U256::zero()
        );
        assert_eq!(bridge.contract.total_revenue().await.unwrap(), price);

        let orders = bridge
            .aggregator
            .fetch_category(EventCategory::Ordered, 0)
            .await
            .unwrap();
        assert_eq!(orders.len(), 1);
        match &orders[0].payload {
            EventPayload::Ordered {
                machine_id, buyer, ..
            } => {
                assert_eq!(*machine_id, 1);
                assert_eq!(*buyer, account(1));
            }
            other => panic!("wrong payload {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_preexisting_allowance_skips_approval() {
        let bridge = bridge_over(seeded());
        bridge
            .ledger
            .seed_allowance(account(1), CONTRACT, units(10));

        bridge
            .guard
            .ensure(CONTRACT, units(2), credential(1))
            .await
            .unwrap();

        // no approval transaction: nonce untouched, grant untouched
        assert_eq!(
            bridge.ledger.allowance_of(account(1), CONTRACT),
            units(10)
        );
        let record = bridge
            .relay
            .submit(intents::buy_coffee(1), credential(1))
            .await
            .unwrap();
        assert_eq!(record.nonce, 0);
    }

    #[tokio::test]
    async fn test_spend_without_guard_reverts() {
        let bridge = bridge_over(seeded());

        let err = bridge
            .relay
            .submit(intents::buy_coffee(1), credential(1))
            .await
            .unwrap_err();
        match err {
            BridgeError::ExecutionReverted { reason } => {
                assert!(reason.contains("allowance"));
            }
            other => panic!("expected revert, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_raced_grant_reported_not_retried() {
        let bridge = bridge_over(seeded());
        bridge.ledger.drain_approvals(true);

        let err = bridge
            .guard
            .ensure(CONTRACT, units(2), credential(1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BridgeError::AllowanceInsufficient { .. }
        ));
        // exactly one approval was attempted
        assert_eq!(
            bridge.ledger.transaction_count(account(1)).await.unwrap(),
            1
        );
    }
}
