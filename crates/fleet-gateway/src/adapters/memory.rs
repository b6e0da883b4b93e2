//! # In-Memory Ledger
//!
//! A scripted ledger node implementing [`LedgerRpc`]. This is the test
//! double for the whole workspace: it enforces nonces, consumes allowances,
//! mines one block per accepted transaction, and emits the same event logs
//! the real contract does, so every subsystem exercises its real code path
//! against it.
//!
//! Scripting hooks: forced reverts per method, connectivity failure
//! injection, delayed receipts, and raw log insertion (including malformed
//! payloads for normalization tests).

use crate::contract::decode;
use crate::ports::LedgerRpc;
use crate::wire::{RawLog, Receipt, SignedTransaction};
use async_trait::async_trait;
use parking_lot::RwLock;
use primitive_types::{H160, H256, U256};
use serde_json::json;
use shared_types::units::WEI_PER_UNIT;
use shared_types::{BridgeError, Machine, Proposal, ProposalKind};
use std::collections::HashMap;
use tracing::debug;

/// Voting window applied to new proposals, in seconds.
const VOTING_PERIOD_SECS: u64 = 7 * 24 * 3600;

/// Pseudo-timestamp of block 0.
const GENESIS_TIME: u64 = 1_700_000_000;

#[derive(Default)]
struct LedgerState {
    block_number: u64,
    nonces: HashMap<H160, u64>,
    allowances: HashMap<(H160, H160), U256>,
    machines: Vec<Machine>,
    proposals: Vec<Proposal>,
    voted: HashMap<u64, Vec<H160>>,
    share_balances: HashMap<H160, U256>,
    withdrawable: HashMap<H160, U256>,
    salaries: HashMap<H160, U256>,
    coffee_price: U256,
    share_price: U256,
    available_shares: U256,
    total_revenue: U256,
    growth_fund: U256,
    operational_reserve: U256,
    total_dividends: U256,
    vote_threshold: U256,
    logs: Vec<(String, RawLog)>,
    receipts: HashMap<H256, (Receipt, u32)>,
    forced_reverts: HashMap<String, String>,
    connectivity_failures: u32,
    receipt_delay: u32,
    drain_approvals: bool,
}

/// Scripted in-memory ledger node.
pub struct MemoryLedger {
    contract_address: H160,
    chain_id: u64,
    state: RwLock<LedgerState>,
}

impl MemoryLedger {
    /// Create an empty ledger for the default local chain (id 1337).
    pub fn new(contract_address: H160) -> Self {
        Self {
            contract_address,
            chain_id: 1337,
            state: RwLock::new(LedgerState {
                vote_threshold: U256::MAX,
                ..LedgerState::default()
            }),
        }
    }

    /// Contract (spender) address allowances are granted to.
    pub fn contract_address(&self) -> H160 {
        self.contract_address
    }

    /// Set the coffee price, in wei.
    pub fn with_coffee_price(self, price: U256) -> Self {
        self.state.write().coffee_price = price;
        self
    }

    /// Set the share price and primary-issue pool.
    pub fn with_share_offering(self, price: U256, available: U256) -> Self {
        {
            let mut s = self.state.write();
            s.share_price = price;
            s.available_shares = available;
        }
        self
    }

    /// Register a machine (ids assigned sequentially from 1).
    pub fn with_machine(self, location: &str) -> Self {
        {
            let mut s = self.state.write();
            let id = s.machines.len() as u64 + 1;
            s.machines.push(Machine {
                id,
                location: location.to_string(),
                active: true,
                total_sales: U256::zero(),
            });
        }
        self
    }

    /// Seed an open proposal (ids assigned sequentially from 1).
    pub fn with_proposal(self, kind: ProposalKind, target: H160, amount: U256, desc: &str) -> Self {
        {
            let mut s = self.state.write();
            let id = s.proposals.len() as u64 + 1;
            let end_time = GENESIS_TIME + VOTING_PERIOD_SECS;
            s.proposals.push(Proposal {
                id,
                kind,
                target,
                amount,
                description: desc.to_string(),
                vote_weight: U256::zero(),
                executed: false,
                end_time,
            });
        }
        self
    }

    /// Give an investor voting shares (wei-scale).
    pub fn with_shares(self, investor: H160, amount: U256) -> Self {
        self.state.write().share_balances.insert(investor, amount);
        self
    }

    /// Configure a staff salary, in wei.
    pub fn with_salary(self, staff: H160, amount: U256) -> Self {
        self.state.write().salaries.insert(staff, amount);
        self
    }

    /// Set the auto-execution vote threshold (wei-scale shares).
    pub fn with_vote_threshold(self, threshold: U256) -> Self {
        self.state.write().vote_threshold = threshold;
        self
    }

    /// Fund the operational reserve, in wei.
    pub fn with_reserve(self, amount: U256) -> Self {
        self.state.write().operational_reserve = amount;
        self
    }

    /// Script the next `n` port calls to fail with a connectivity error.
    pub fn fail_connectivity(&self, n: u32) {
        self.state.write().connectivity_failures = n;
    }

    /// Force every call of `method` to mine as reverted with `reason`.
    pub fn force_revert(&self, method: &str, reason: &str) {
        self.state
            .write()
            .forced_reverts
            .insert(method.to_string(), reason.to_string());
    }

    /// Stop forcing reverts for `method`.
    pub fn clear_revert(&self, method: &str) {
        self.state.write().forced_reverts.remove(method);
    }

    /// Withhold receipts for `polls` queries after broadcast.
    pub fn delay_receipts(&self, polls: u32) {
        self.state.write().receipt_delay = polls;
    }

    /// Script a consumer that races every approval: the grant lands, then
    /// is drained to zero before anyone can read it back.
    pub fn drain_approvals(&self, enabled: bool) {
        self.state.write().drain_approvals = enabled;
    }

    /// Grant an allowance directly, bypassing an approval transaction.
    pub fn seed_allowance(&self, owner: H160, spender: H160, amount: U256) {
        self.state.write().allowances.insert((owner, spender), amount);
    }

    /// Append a raw event log as the node would report it. Tests use this
    /// to stage historical, duplicated, or malformed payloads.
    pub fn push_raw_log(
        &self,
        event_name: &str,
        block_number: u64,
        log_index: u64,
        fields: serde_json::Value,
    ) {
        let mut s = self.state.write();
        s.block_number = s.block_number.max(block_number);
        s.logs.push((
            event_name.to_string(),
            RawLog {
                block_number,
                log_index,
                fields,
            },
        ));
    }

    /// Mine an empty block.
    pub fn advance_block(&self) {
        self.state.write().block_number += 1;
    }

    /// Current allowance, for assertions.
    pub fn allowance_of(&self, owner: H160, spender: H160) -> U256 {
        self.state
            .read()
            .allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn check_connectivity(&self) -> Result<(), BridgeError> {
        let mut s = self.state.write();
        if s.connectivity_failures > 0 {
            s.connectivity_failures -= 1;
            return Err(BridgeError::Connectivity(
                "scripted connection failure".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply a mined transaction's effects. Returns the revert reason if
    /// execution failed; the nonce is consumed either way.
    fn execute(
        s: &mut LedgerState,
        contract_address: H160,
        from: H160,
        method: &str,
        args: &[serde_json::Value],
        block: u64,
        log_index: &mut u64,
    ) -> Option<String> {
        let mut emit = |s: &mut LedgerState, name: &str, fields: serde_json::Value| {
            s.logs.push((
                name.to_string(),
                RawLog {
                    block_number: block,
                    log_index: *log_index,
                    fields,
                },
            ));
            *log_index += 1;
        };

        const BAD_ARGS: &str = "malformed call arguments";

        match method {
            "approve" => {
                let Some(spender) = args.first().and_then(decode::as_address) else {
                    return Some(BAD_ARGS.to_string());
                };
                let Some(amount) = args.get(1).and_then(decode::as_u256) else {
                    return Some(BAD_ARGS.to_string());
                };
                let granted = if s.drain_approvals { U256::zero() } else { amount };
                s.allowances.insert((from, spender), granted);
                None
            }
            "buyCoffee" => {
                let Some(machine_id) = args.first().and_then(decode::as_u64) else {
                    return Some(BAD_ARGS.to_string());
                };
                let price = s.coffee_price;
                if !s
                    .machines
                    .iter()
                    .any(|m| m.id == machine_id && m.active)
                {
                    return Some("machine not available".to_string());
                }
                let key = (from, contract_address);
                let held = s.allowances.get(&key).copied().unwrap_or_default();
                if held < price {
                    return Some("payment allowance too low".to_string());
                }
                if let Some(machine) = s.machines.iter_mut().find(|m| m.id == machine_id) {
                    machine.total_sales += price;
                }
                s.allowances.insert(key, held - price);
                s.total_revenue += price;
                s.operational_reserve += price;
                let buyer = serde_json::to_value(from).unwrap_or_default();
                let amount = serde_json::to_value(price).unwrap_or_default();
                emit(
                    s,
                    "CoffeeOrdered",
                    json!({"machineId": machine_id, "buyer": buyer, "amount": amount}),
                );
                None
            }
            "vote" => {
                let Some(proposal_id) = args.first().and_then(decode::as_u64) else {
                    return Some(BAD_ARGS.to_string());
                };
                let weight = s.share_balances.get(&from).copied().unwrap_or_default();
                let threshold = s.vote_threshold;
                let executed = match s.proposals.iter().find(|p| p.id == proposal_id) {
                    None => return Some("unknown proposal".to_string()),
                    Some(p) => p.executed,
                };
                if executed {
                    return Some("proposal already executed".to_string());
                }
                if weight.is_zero() {
                    return Some("no voting shares".to_string());
                }
                {
                    let voters = s.voted.entry(proposal_id).or_default();
                    if voters.contains(&from) {
                        return Some("already voted".to_string());
                    }
                    voters.push(from);
                }
                let crossed = {
                    let p = s
                        .proposals
                        .iter_mut()
                        .find(|p| p.id == proposal_id)
                        .expect("checked above");
                    p.vote_weight += weight;
                    p.vote_weight >= threshold
                };
                let voter = serde_json::to_value(from).unwrap_or_default();
                let w = serde_json::to_value(weight).unwrap_or_default();
                emit(
                    s,
                    "Voted",
                    json!({"proposalId": proposal_id, "voter": voter, "weight": w}),
                );
                if crossed {
                    // Auto-execution lands in the same block, after the vote
                    if let Some(p) = s.proposals.iter_mut().find(|p| p.id == proposal_id) {
                        p.executed = true;
                    }
                    emit(s, "ProposalExecuted", json!({ "id": proposal_id }));
                }
                None
            }
            "executeProposal" => {
                let Some(proposal_id) = args.first().and_then(decode::as_u64) else {
                    return Some(BAD_ARGS.to_string());
                };
                let Some(p) = s.proposals.iter_mut().find(|p| p.id == proposal_id) else {
                    return Some("unknown proposal".to_string());
                };
                if p.executed {
                    return Some("proposal already executed".to_string());
                }
                p.executed = true;
                emit(s, "ProposalExecuted", json!({ "id": proposal_id }));
                None
            }
            "addMachine" => {
                let Some(location) = args.first().and_then(decode::as_text) else {
                    return Some(BAD_ARGS.to_string());
                };
                let id = s.machines.len() as u64 + 1;
                s.machines.push(Machine {
                    id,
                    location,
                    active: true,
                    total_sales: U256::zero(),
                });
                None
            }
            "setCoffeePrice" => {
                let Some(price) = args.first().and_then(decode::as_u256) else {
                    return Some(BAD_ARGS.to_string());
                };
                s.coffee_price = price;
                None
            }
            "payMonthlySalary" => {
                let Some(staff) = args.first().and_then(decode::as_address) else {
                    return Some(BAD_ARGS.to_string());
                };
                let Some(salary) = s.salaries.get(&staff).copied() else {
                    return Some("no salary configured".to_string());
                };
                if s.operational_reserve < salary {
                    return Some("insufficient reserve".to_string());
                }
                s.operational_reserve -= salary;
                let to = serde_json::to_value(staff).unwrap_or_default();
                let amount = serde_json::to_value(salary).unwrap_or_default();
                emit(
                    s,
                    "ExpensePaid",
                    json!({"category": "SALARY", "to": to, "amount": amount, "note": "monthly salary"}),
                );
                None
            }
            "buyShares" => {
                let Some(amount) = args.first().and_then(decode::as_u256) else {
                    return Some(BAD_ARGS.to_string());
                };
                if s.available_shares < amount {
                    return Some("not enough shares available".to_string());
                }
                let cost = amount * s.share_price / U256::from(WEI_PER_UNIT);
                let key = (from, contract_address);
                let held = s.allowances.get(&key).copied().unwrap_or_default();
                if held < cost {
                    return Some("payment allowance too low".to_string());
                }
                s.allowances.insert(key, held - cost);
                s.available_shares -= amount;
                *s.share_balances.entry(from).or_default() += amount;
                let investor = serde_json::to_value(from).unwrap_or_default();
                let a = serde_json::to_value(amount).unwrap_or_default();
                let c = serde_json::to_value(cost).unwrap_or_default();
                emit(
                    s,
                    "SharesPurchased",
                    json!({"investor": investor, "amount": a, "cost": c}),
                );
                None
            }
            "proposeBuyMachine" | "proposeBuyStock" | "proposeUpdateSalary" => {
                let Some(target) = args.first().and_then(decode::as_address) else {
                    return Some(BAD_ARGS.to_string());
                };
                let Some(amount) = args.get(1).and_then(decode::as_u256) else {
                    return Some(BAD_ARGS.to_string());
                };
                let Some(description) = args.get(2).and_then(decode::as_text) else {
                    return Some(BAD_ARGS.to_string());
                };
                let kind = match method {
                    "proposeBuyMachine" => ProposalKind::BuyMachine,
                    "proposeBuyStock" => ProposalKind::BuyStock,
                    _ => ProposalKind::UpdateSalary,
                };
                Self::open_proposal(s, kind, target, amount, description, block, &mut emit);
                None
            }
            "proposeAddVendor" => {
                let Some(target) = args.first().and_then(decode::as_address) else {
                    return Some(BAD_ARGS.to_string());
                };
                let Some(description) = args.get(1).and_then(decode::as_text) else {
                    return Some(BAD_ARGS.to_string());
                };
                Self::open_proposal(
                    s,
                    ProposalKind::AddVendor,
                    target,
                    U256::zero(),
                    description,
                    block,
                    &mut emit,
                );
                None
            }
            other => Some(format!("unknown method {other}")),
        }
    }

    fn open_proposal(
        s: &mut LedgerState,
        kind: ProposalKind,
        target: H160,
        amount: U256,
        description: String,
        block: u64,
        emit: &mut impl FnMut(&mut LedgerState, &str, serde_json::Value),
    ) {
        let id = s.proposals.len() as u64 + 1;
        let end_time = GENESIS_TIME + block + VOTING_PERIOD_SECS;
        s.proposals.push(Proposal {
            id,
            kind,
            target,
            amount,
            description: description.clone(),
            vote_weight: U256::zero(),
            executed: false,
            end_time,
        });
        emit(
            s,
            "ProposalCreated",
            json!({"id": id, "pType": kind.code(), "desc": description}),
        );
    }
}

#[async_trait]
impl LedgerRpc for MemoryLedger {
    async fn block_number(&self) -> Result<u64, BridgeError> {
        self.check_connectivity()?;
        Ok(self.state.read().block_number)
    }

    async fn transaction_count(&self, account: H160) -> Result<u64, BridgeError> {
        self.check_connectivity()?;
        Ok(self.state.read().nonces.get(&account).copied().unwrap_or(0))
    }

    async fn call(
        &self,
        method: &str,
        args: &[serde_json::Value],
    ) -> Result<serde_json::Value, BridgeError> {
        self.check_connectivity()?;
        let s = self.state.read();
        let wei = |v: U256| serde_json::to_value(v).unwrap_or_default();
        match method {
            "coffeePrice" => Ok(wei(s.coffee_price)),
            "totalRevenue" => Ok(wei(s.total_revenue)),
            "growthFund" => Ok(wei(s.growth_fund)),
            "getOperationalReserve" => Ok(wei(s.operational_reserve)),
            "totalDividendsDistributed" => Ok(wei(s.total_dividends)),
            "sharePrice" => Ok(wei(s.share_price)),
            "getAvailableShares" => Ok(wei(s.available_shares)),
            "machineCount" => Ok(json!(s.machines.len() as u64)),
            "proposalCount" => Ok(json!(s.proposals.len() as u64)),
            "machines" => {
                let id = args.first().and_then(decode::as_u64).unwrap_or(0);
                let m = s
                    .machines
                    .iter()
                    .find(|m| m.id == id)
                    .ok_or_else(|| BridgeError::NotFound(format!("machine {id}")))?;
                Ok(json!([
                    m.id,
                    m.location,
                    m.active,
                    serde_json::to_value(m.total_sales).unwrap_or_default()
                ]))
            }
            "proposals" => {
                let id = args.first().and_then(decode::as_u64).unwrap_or(0);
                let p = s
                    .proposals
                    .iter()
                    .find(|p| p.id == id)
                    .ok_or_else(|| BridgeError::NotFound(format!("proposal {id}")))?;
                Ok(json!([
                    p.id,
                    p.kind.code(),
                    serde_json::to_value(p.target).unwrap_or_default(),
                    serde_json::to_value(p.amount).unwrap_or_default(),
                    p.description,
                    serde_json::to_value(p.vote_weight).unwrap_or_default(),
                    p.executed,
                    p.end_time
                ]))
            }
            "getWithdrawableDividend" => {
                let investor = args.first().and_then(decode::as_address).unwrap_or_default();
                Ok(wei(s.withdrawable.get(&investor).copied().unwrap_or_default()))
            }
            "shareBalance" => {
                let investor = args.first().and_then(decode::as_address).unwrap_or_default();
                Ok(wei(s
                    .share_balances
                    .get(&investor)
                    .copied()
                    .unwrap_or_default()))
            }
            "allowance" => {
                let owner = args.first().and_then(decode::as_address).unwrap_or_default();
                let spender = args.get(1).and_then(decode::as_address).unwrap_or_default();
                Ok(wei(s
                    .allowances
                    .get(&(owner, spender))
                    .copied()
                    .unwrap_or_default()))
            }
            other => Err(BridgeError::NotFound(format!("read method {other}"))),
        }
    }

    async fn send_raw_transaction(&self, raw: Vec<u8>) -> Result<H256, BridgeError> {
        self.check_connectivity()?;

        let signed = SignedTransaction::from_bytes(&raw)
            .ok_or_else(|| BridgeError::Connectivity("malformed raw transaction".to_string()))?;
        if signed.signature.is_empty() {
            return Err(BridgeError::Credential("unsigned transaction".to_string()));
        }
        let envelope = &signed.envelope;
        if envelope.chain_id != self.chain_id {
            return Err(BridgeError::Credential(format!(
                "envelope bound to chain {}, node is chain {}",
                envelope.chain_id, self.chain_id
            )));
        }

        let mut s = self.state.write();
        let expected = s.nonces.get(&envelope.from).copied().unwrap_or(0);
        if envelope.nonce != expected {
            return Err(BridgeError::NonceConflict {
                used: Some(envelope.nonce),
            });
        }
        s.nonces.insert(envelope.from, expected + 1);
        s.block_number += 1;
        let block = s.block_number;
        let mut log_index = 0u64;

        let method = envelope.intent.method.clone();
        let revert_reason = if let Some(reason) = s.forced_reverts.get(&method).cloned() {
            Some(reason)
        } else {
            Self::execute(
                &mut s,
                self.contract_address,
                envelope.from,
                &method,
                &envelope.intent.args,
                block,
                &mut log_index,
            )
        };

        let hash = signed.hash();
        debug!(
            method = %method,
            block,
            reverted = revert_reason.is_some(),
            "mined transaction"
        );
        let receipt = Receipt {
            tx_hash: hash,
            block_number: block,
            success: revert_reason.is_none(),
            revert_reason,
        };
        let delay = s.receipt_delay;
        s.receipts.insert(hash, (receipt, delay));
        Ok(hash)
    }

    async fn transaction_receipt(&self, hash: H256) -> Result<Option<Receipt>, BridgeError> {
        self.check_connectivity()?;
        let mut s = self.state.write();
        match s.receipts.get_mut(&hash) {
            None => Ok(None),
            Some((_, remaining)) if *remaining > 0 => {
                *remaining -= 1;
                Ok(None)
            }
            Some((receipt, _)) => Ok(Some(receipt.clone())),
        }
    }

    async fn logs(&self, event_name: &str, from_block: u64) -> Result<Vec<RawLog>, BridgeError> {
        self.check_connectivity()?;
        Ok(self
            .state
            .read()
            .logs
            .iter()
            .filter(|(name, log)| name == event_name && log.block_number >= from_block)
            .map(|(_, log)| log.clone())
            .collect())
    }
}
