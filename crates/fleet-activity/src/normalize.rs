//! # Payload Normalization
//!
//! Each ledger event category arrives as a loosely shaped field map; this
//! module turns one raw log into the tagged [`EventPayload`] for its
//! category. A missing or mistyped field never rejects the event: the field
//! gets a defined placeholder (empty address, zero amount, `"(unknown)"`
//! label) and the gap is reported so the aggregator can log it.

use fleet_gateway::contract::decode;
use fleet_gateway::wire::RawLog;
use primitive_types::{H160, U256};
use shared_types::{Event, EventCategory, EventId, EventPayload, UNKNOWN_LABEL};

/// Fields that had to be placeholder-filled while normalizing one event.
pub type FieldGaps = Vec<&'static str>;

struct Fields<'a> {
    raw: &'a serde_json::Value,
    gaps: FieldGaps,
}

impl<'a> Fields<'a> {
    fn new(raw: &'a serde_json::Value) -> Self {
        Self {
            raw,
            gaps: Vec::new(),
        }
    }

    fn get(&self, key: &str) -> Option<&'a serde_json::Value> {
        self.raw.get(key)
    }

    fn text(&mut self, key: &'static str) -> String {
        match self.get(key).and_then(decode::as_text) {
            Some(value) => value,
            None => {
                self.gaps.push(key);
                UNKNOWN_LABEL.to_string()
            }
        }
    }

    fn address(&mut self, key: &'static str) -> H160 {
        match self.get(key).and_then(decode::as_address) {
            Some(value) => value,
            None => {
                self.gaps.push(key);
                H160::zero()
            }
        }
    }

    fn amount(&mut self, key: &'static str) -> U256 {
        match self.get(key).and_then(decode::as_u256) {
            Some(value) => value,
            None => {
                self.gaps.push(key);
                U256::zero()
            }
        }
    }

    fn id(&mut self, key: &'static str) -> u64 {
        match self.get(key).and_then(decode::as_u64) {
            Some(value) => value,
            None => {
                self.gaps.push(key);
                0
            }
        }
    }
}

/// Normalize one raw log into the common envelope.
///
/// Always yields an event; the returned gap list names any fields that had
/// to be placeholder-filled.
pub fn normalize(category: EventCategory, log: &RawLog) -> (Event, FieldGaps) {
    let mut f = Fields::new(&log.fields);
    let payload = match category {
        EventCategory::Ordered => EventPayload::Ordered {
            machine_id: f.id("machineId"),
            buyer: f.address("buyer"),
            amount: f.amount("amount"),
        },
        EventCategory::ExpensePaid => EventPayload::ExpensePaid {
            category: f.text("category"),
            recipient: f.address("to"),
            amount: f.amount("amount"),
            note: f.text("note"),
        },
        EventCategory::SharesPurchased => EventPayload::SharesPurchased {
            investor: f.address("investor"),
            amount: f.amount("amount"),
            cost: f.amount("cost"),
        },
        EventCategory::ShareTransferred => EventPayload::ShareTransferred {
            from: f.address("from"),
            to: f.address("to"),
            amount: f.amount("amount"),
        },
        EventCategory::DividendClaimed => EventPayload::DividendClaimed {
            investor: f.address("investor"),
            amount: f.amount("amount"),
        },
        EventCategory::ProposalCreated => EventPayload::ProposalCreated {
            id: f.id("id"),
            kind_code: f.id("pType") as u8,
            description: f.text("desc"),
        },
        EventCategory::Voted => EventPayload::Voted {
            proposal_id: f.id("proposalId"),
            voter: f.address("voter"),
            weight: f.amount("weight"),
        },
        EventCategory::ProposalExecuted => EventPayload::ProposalExecuted { id: f.id("id") },
        EventCategory::ProfitDistributed => EventPayload::ProfitDistributed {
            dividend_amount: f.amount("dividendAmount"),
            growth_amount: f.amount("growthAmount"),
        },
    };
    let event = Event::new(EventId::new(log.block_number, log.log_index), payload);
    (event, f.gaps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(block: u64, index: u64, fields: serde_json::Value) -> RawLog {
        RawLog {
            block_number: block,
            log_index: index,
            fields,
        }
    }

    #[test]
    fn test_complete_order_normalizes_cleanly() {
        let buyer = H160::repeat_byte(0x11);
        let log = raw(
            5,
            0,
            json!({
                "machineId": 1,
                "buyer": serde_json::to_value(buyer).unwrap(),
                "amount": "0x3a98",
            }),
        );
        let (event, gaps) = normalize(EventCategory::Ordered, &log);
        assert!(gaps.is_empty());
        assert_eq!(
            event.payload,
            EventPayload::Ordered {
                machine_id: 1,
                buyer,
                amount: U256::from(15_000u64),
            }
        );
    }

    #[test]
    fn test_missing_expense_category_gets_placeholder() {
        let log = raw(7, 2, json!({"to": null, "amount": 500, "note": "beans"}));
        let (event, gaps) = normalize(EventCategory::ExpensePaid, &log);

        assert_eq!(gaps, vec!["category", "to"]);
        match event.payload {
            EventPayload::ExpensePaid {
                category,
                recipient,
                amount,
                note,
            } => {
                assert_eq!(category, UNKNOWN_LABEL);
                assert_eq!(recipient, H160::zero());
                assert_eq!(amount, U256::from(500u64));
                assert_eq!(note, "beans");
            }
            other => panic!("wrong payload {other:?}"),
        }
    }

    #[test]
    fn test_entirely_empty_payload_still_yields_event() {
        let log = raw(9, 1, serde_json::Value::Null);
        let (event, gaps) = normalize(EventCategory::Voted, &log);
        assert_eq!(gaps.len(), 3);
        assert_eq!(event.id, EventId::new(9, 1));
        assert_eq!(event.category, EventCategory::Voted);
    }
}
