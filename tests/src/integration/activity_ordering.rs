//! # Activity Ordering Scenarios
//!
//! The merged ledger must render newest-first with a strict intra-block
//! order, and one malformed event must never poison its batch. These
//! scenarios drive real transactions so the ordering under test is the
//! ordering the chain actually produced.

#[cfg(test)]
mod tests {
    use crate::integration::harness::{account, bridge_over, credential, units, CONTRACT};
    use fleet_gateway::{intents, MemoryLedger};
    use primitive_types::H160;
    use serde_json::json;
    use shared_types::{EventCategory, EventPayload, ProposalKind, UNKNOWN_LABEL};

    #[tokio::test]
    async fn test_threshold_vote_renders_execution_before_vote() {
        let bridge = bridge_over(
            MemoryLedger::new(CONTRACT)
                .with_proposal(
                    ProposalKind::BuyStock,
                    H160::repeat_byte(0xBB),
                    units(40),
                    "beans",
                )
                .with_shares(account(1), units(60))
                .with_vote_threshold(units(50)),
        );

        // the vote crosses the threshold, so Voted and ProposalExecuted
        // land in one block
        bridge.tracker.submit_vote(1, credential(1)).await.unwrap();

        let feed = bridge.aggregator.fetch_all(0).await.unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].category, EventCategory::ProposalExecuted);
        assert_eq!(feed[1].category, EventCategory::Voted);
        assert_eq!(feed[0].id.block_number, feed[1].id.block_number);
        assert!(feed[0].id.log_index > feed[1].id.log_index);
    }

    #[tokio::test]
    async fn test_feed_is_newest_first_across_blocks() {
        let bridge = bridge_over(
            MemoryLedger::new(CONTRACT)
                .with_coffee_price(units(1))
                .with_machine("Station"),
        );

        // three purchases in three separate blocks
        for _ in 0..3 {
            bridge
                .guard
                .ensure(CONTRACT, units(1), credential(1))
                .await
                .unwrap();
            bridge
                .relay
                .submit(intents::buy_coffee(1), credential(1))
                .await
                .unwrap();
        }

        let orders: Vec<u64> = bridge
            .aggregator
            .fetch_all(0)
            .await
            .unwrap()
            .into_iter()
            .filter(|e| e.category == EventCategory::Ordered)
            .map(|e| e.id.block_number)
            .collect();
        assert_eq!(orders.len(), 3);
        assert!(orders.windows(2).all(|w| w[0] > w[1]));
    }

    #[tokio::test]
    async fn test_malformed_sibling_gets_placeholders_batch_survives() {
        let bridge = bridge_over(MemoryLedger::new(CONTRACT));
        // missing category and recipient
        bridge
            .ledger
            .push_raw_log("ExpensePaid", 5, 0, json!({"amount": 100, "note": "x"}));
        bridge.ledger.push_raw_log(
            "ExpensePaid",
            5,
            1,
            json!({
                "category": "STOCK",
                "to": format!("{:#x}", H160::repeat_byte(0x11)),
                "amount": 250,
                "note": "beans"
            }),
        );

        let feed = bridge.aggregator.fetch_all(0).await.unwrap();
        assert_eq!(feed.len(), 2);
        match &feed[1].payload {
            EventPayload::ExpensePaid {
                category,
                recipient,
                ..
            } => {
                assert_eq!(category, UNKNOWN_LABEL);
                assert_eq!(*recipient, H160::zero());
            }
            other => panic!("wrong payload {other:?}"),
        }
        match &feed[0].payload {
            EventPayload::ExpensePaid { category, .. } => assert_eq!(category, "STOCK"),
            other => panic!("wrong payload {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_every_category_flows_through_one_feed() {
        let bridge = bridge_over(
            MemoryLedger::new(CONTRACT)
                .with_coffee_price(units(1))
                .with_machine("Station")
                .with_share_offering(units(2), units(100))
                .with_salary(H160::repeat_byte(0x33), units(5))
                .with_reserve(units(50)),
        );

        // coffee purchase
        bridge
            .guard
            .ensure(CONTRACT, units(1), credential(1))
            .await
            .unwrap();
        bridge
            .relay
            .submit(intents::buy_coffee(1), credential(1))
            .await
            .unwrap();
        // share purchase
        bridge
            .guard
            .ensure(CONTRACT, units(20), credential(2))
            .await
            .unwrap();
        bridge
            .relay
            .submit(intents::buy_shares(units(10)), credential(2))
            .await
            .unwrap();
        // salary payment
        bridge
            .relay
            .submit(
                intents::pay_monthly_salary(H160::repeat_byte(0x33)),
                credential(1),
            )
            .await
            .unwrap();
        // proposal
        bridge
            .relay
            .submit(
                intents::propose_add_vendor(H160::repeat_byte(0x44), "new vendor"),
                credential(1),
            )
            .await
            .unwrap();

        let feed = bridge.aggregator.fetch_all(0).await.unwrap();
        let categories: Vec<EventCategory> = feed.iter().map(|e| e.category).collect();
        assert!(categories.contains(&EventCategory::Ordered));
        assert!(categories.contains(&EventCategory::SharesPurchased));
        assert!(categories.contains(&EventCategory::ExpensePaid));
        assert!(categories.contains(&EventCategory::ProposalCreated));
    }
}
