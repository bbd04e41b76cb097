// 7.0: every state change in a market produces an event. used for audit
// trails and for notifying whatever transport sits above this crate.

use crate::types::{EventId, Outcome, ParticipantId, Resolution, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AuditId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: AuditId,
    pub timestamp: Timestamp,
    pub payload: AuditPayload,
}

impl AuditEvent {
    pub fn new(id: AuditId, timestamp: Timestamp, payload: AuditPayload) -> Self {
        Self {
            id,
            timestamp,
            payload,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AuditPayload {
    MarketCreated(MarketCreatedEvent),
    TradeExecuted(TradeExecutedEvent),
    MarketResolved(MarketResolvedEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketCreatedEvent {
    pub event_id: EventId,
    pub initial_liquidity: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeExecutedEvent {
    pub event_id: EventId,
    pub participant_id: ParticipantId,
    pub outcome: Outcome,
    pub amount_in: Decimal,
    pub tokens_out: Decimal,
    pub new_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketResolvedEvent {
    pub event_id: EventId,
    pub resolution: Resolution,
    pub total_payout: Decimal,
    pub positions_settled: usize,
}
