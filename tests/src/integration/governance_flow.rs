//! # Governance Lifecycle Scenarios
//!
//! Proposal creation, vote accumulation, threshold auto-execution, and the
//! tracker's refusal paths, all against ledger-side truth.

#[cfg(test)]
mod tests {
    use crate::integration::harness::{account, bridge_over, credential, units, CONTRACT};
    use fleet_gateway::MemoryLedger;
    use primitive_types::H160;
    use shared_types::{BridgeError, ProposalKind};

    fn with_voters() -> MemoryLedger {
        MemoryLedger::new(CONTRACT)
            .with_shares(account(1), units(30))
            .with_shares(account(2), units(30))
            .with_vote_threshold(units(50))
    }

    #[tokio::test]
    async fn test_create_vote_accumulate_then_auto_execute() {
        let bridge = bridge_over(with_voters());
        bridge
            .tracker
            .create_proposal(
                ProposalKind::BuyMachine,
                H160::repeat_byte(0xBB),
                units(200),
                "airport expansion",
                credential(1),
            )
            .await
            .unwrap();

        // first vote: below threshold, proposal stays open
        bridge.tracker.submit_vote(1, credential(1)).await.unwrap();
        let open = bridge.tracker.list_active().await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].vote_weight, units(30));

        // second vote crosses the threshold and the ledger executes
        bridge.tracker.submit_vote(1, credential(2)).await.unwrap();
        assert!(bridge.tracker.list_active().await.unwrap().is_empty());
        assert!(bridge.tracker.proposal(1).await.unwrap().executed);
    }

    #[tokio::test]
    async fn test_double_vote_reverts_on_ledger() {
        let bridge = bridge_over(with_voters());
        bridge
            .tracker
            .create_proposal(
                ProposalKind::AddVendor,
                H160::repeat_byte(0x44),
                units(0),
                "vendor",
                credential(1),
            )
            .await
            .unwrap();

        bridge.tracker.submit_vote(1, credential(1)).await.unwrap();
        let err = bridge
            .tracker
            .submit_vote(1, credential(1))
            .await
            .unwrap_err();
        match err {
            BridgeError::ExecutionReverted { reason } => {
                assert!(reason.contains("already voted"));
            }
            other => panic!("expected revert, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_vote_without_shares_reverts() {
        let bridge = bridge_over(with_voters());
        bridge
            .tracker
            .create_proposal(
                ProposalKind::BuyStock,
                H160::repeat_byte(0xBB),
                units(10),
                "beans",
                credential(1),
            )
            .await
            .unwrap();

        // account 7 holds no shares
        let err = bridge
            .tracker
            .submit_vote(1, credential(7))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::ExecutionReverted { .. }));
    }

    #[tokio::test]
    async fn test_vote_on_executed_proposal_refused() {
        let bridge = bridge_over(
            MemoryLedger::new(CONTRACT)
                .with_shares(account(1), units(60))
                .with_vote_threshold(units(50))
                .with_proposal(
                    ProposalKind::BuyStock,
                    H160::repeat_byte(0xBB),
                    units(10),
                    "beans",
                ),
        );

        // auto-executes on the first vote
        bridge.tracker.submit_vote(1, credential(1)).await.unwrap();

        let err = bridge
            .tracker
            .submit_vote(1, credential(1))
            .await
            .unwrap_err();
        match err {
            BridgeError::ExecutionReverted { reason } => {
                assert!(reason.contains("already executed"));
            }
            other => panic!("expected revert, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_admin_execute_then_refusal_is_local() {
        let bridge = bridge_over(
            MemoryLedger::new(CONTRACT).with_proposal(
                ProposalKind::UpdateSalary,
                H160::repeat_byte(0x33),
                units(8),
                "raise",
            ),
        );

        bridge
            .tracker
            .execute_proposal(1, credential(1))
            .await
            .unwrap();

        let err = bridge
            .tracker
            .execute_proposal(1, credential(1))
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::ExecutionReverted { .. }));
    }
}
