//! # Relay Ordering Scenarios
//!
//! Nonce serialization is the relay's core promise: all submissions from
//! one account land with consecutive nonces regardless of task
//! interleaving, and distinct accounts never block each other.

#[cfg(test)]
mod tests {
    use crate::integration::harness::{bridge_over, credential, units, CONTRACT};
    use fleet_gateway::{intents, MemoryLedger};
    use shared_types::{BridgeError, TransactionStatus, U256};
    use std::sync::Arc;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_interleaved_accounts_keep_consecutive_nonces() {
        let bridge = Arc::new(bridge_over(MemoryLedger::new(CONTRACT)));

        let mut handles = Vec::new();
        for tag in 1u8..=3 {
            for _ in 0..3 {
                let bridge = Arc::clone(&bridge);
                handles.push(tokio::spawn(async move {
                    let record = bridge
                        .relay
                        .submit(intents::add_machine("kiosk"), credential(tag))
                        .await
                        .unwrap();
                    (tag, record.nonce, record.status)
                }));
            }
        }

        let mut per_account: std::collections::HashMap<u8, Vec<u64>> = Default::default();
        for handle in handles {
            let (tag, nonce, status) = handle.await.unwrap();
            assert_eq!(status, TransactionStatus::Confirmed);
            per_account.entry(tag).or_default().push(nonce);
        }
        for (_, mut nonces) in per_account {
            nonces.sort_unstable();
            assert_eq!(nonces, vec![0, 1, 2]);
        }
    }

    #[tokio::test]
    async fn test_revert_leaves_state_untouched_and_repeats() {
        let bridge = bridge_over(
            MemoryLedger::new(CONTRACT).with_coffee_price(units(2)),
        );
        bridge.ledger.force_revert("setCoffeePrice", "only admin");

        for _ in 0..2 {
            let err = bridge
                .relay
                .submit(intents::set_coffee_price(units(9)), credential(1))
                .await
                .unwrap_err();
            match err {
                BridgeError::ExecutionReverted { reason } => assert_eq!(reason, "only admin"),
                other => panic!("expected revert, got {other:?}"),
            }
        }
        // price unchanged by either attempt
        assert_eq!(bridge.contract.coffee_price().await.unwrap(), units(2));
    }

    #[tokio::test]
    async fn test_reverted_submission_still_consumes_a_nonce() {
        let bridge = bridge_over(MemoryLedger::new(CONTRACT));
        bridge.ledger.force_revert("setCoffeePrice", "only admin");

        let _ = bridge
            .relay
            .submit(intents::set_coffee_price(U256::one()), credential(1))
            .await
            .unwrap_err();
        bridge.ledger.clear_revert("setCoffeePrice");

        let record = bridge
            .relay
            .submit(intents::set_coffee_price(U256::one()), credential(1))
            .await
            .unwrap();
        // the failed attempt burned nonce 0
        assert_eq!(record.nonce, 1);
    }

    #[tokio::test]
    async fn test_slow_receipt_resolves_without_resubmission() {
        let bridge = bridge_over(MemoryLedger::new(CONTRACT));
        bridge.ledger.delay_receipts(4);

        let record = bridge
            .relay
            .submit(intents::add_machine("slow kiosk"), credential(1))
            .await
            .unwrap();
        assert_eq!(record.status, TransactionStatus::Confirmed);
        // exactly one transaction landed
        assert_eq!(
            bridge.contract.machine_count().await.unwrap(),
            1
        );
    }
}
