// 4.0: the market ledger. owns the pools, positions, volume, and resolution
// state for one external event, and is the only writer of any of them.
// 4.1 buy: quote through the pricing engine, then commit pools + position +
//     volume together. any failure happens before the first write.
// 4.2 resolve: one-shot terminal settlement. a second call is a caller bug
//     and is rejected, never re-applied.

use crate::events::{
    AuditEvent, AuditId, AuditPayload, MarketCreatedEvent, MarketResolvedEvent, TradeExecutedEvent,
};
use crate::position::Position;
use crate::pricing::{PoolSnapshot, PricingError};
use crate::types::{EventId, Outcome, ParticipantId, Resolution, Timestamp, INVARIANT_TOLERANCE};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketError {
    #[error("Market {0} is resolved; no further trades accepted")]
    MarketResolved(EventId),

    #[error("Market {0} already resolved; settlement is one-shot")]
    AlreadyResolved(EventId),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Result of one committed purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeReceipt {
    pub event_id: EventId,
    pub participant_id: ParticipantId,
    pub outcome: Outcome,
    pub amount_in: Decimal,
    pub tokens_out: Decimal,
    /// Spot price of the traded outcome after the trade.
    pub new_price: Decimal,
    pub position: Position,
}

/// Terminal settlement: the verdict plus every participant's payout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    pub event_id: EventId,
    pub resolution: Resolution,
    pub payouts: BTreeMap<ParticipantId, Decimal>,
    pub total_payout: Decimal,
    pub resolved_at: Timestamp,
}

/// Read-only view of market state, safe to hand across a transport boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub event_id: EventId,
    pub pool_a: Decimal,
    pub pool_b: Decimal,
    pub invariant: Decimal,
    pub price_a: Decimal,
    pub price_b: Decimal,
    pub total_volume: Decimal,
    pub resolved: bool,
    pub winning_outcome: Option<Resolution>,
    pub created_at: Timestamp,
}

#[derive(Debug)]
pub struct Market {
    event_id: EventId,
    pool_a: Decimal,
    pool_b: Decimal,
    invariant: Decimal,
    total_volume: Decimal,
    resolved: bool,
    winning_outcome: Option<Resolution>,
    positions: HashMap<ParticipantId, Position>,
    events: Vec<AuditEvent>,
    next_audit_id: u64,
    max_events: usize,
    created_at: Timestamp,
}

impl Market {
    // callers validate liquidity before construction; the registry is the
    // only construction site outside of tests.
    pub fn new(event_id: EventId, initial_liquidity: Decimal, max_events: usize) -> Self {
        debug_assert!(initial_liquidity > Decimal::ZERO);
        let mut market = Self {
            event_id: event_id.clone(),
            pool_a: initial_liquidity,
            pool_b: initial_liquidity,
            invariant: initial_liquidity * initial_liquidity,
            total_volume: Decimal::ZERO,
            resolved: false,
            winning_outcome: None,
            positions: HashMap::new(),
            events: Vec::new(),
            next_audit_id: 1,
            max_events,
            created_at: Timestamp::now(),
        };
        market.emit(AuditPayload::MarketCreated(MarketCreatedEvent {
            event_id,
            initial_liquidity,
        }));
        market
    }

    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn winning_outcome(&self) -> Option<Resolution> {
        self.winning_outcome
    }

    /// Pricing view of the current reserves.
    pub fn pool_snapshot(&self) -> PoolSnapshot {
        PoolSnapshot::new(self.pool_a, self.pool_b, self.invariant)
    }

    pub fn snapshot(&self) -> MarketSnapshot {
        let pools = self.pool_snapshot();
        MarketSnapshot {
            event_id: self.event_id.clone(),
            pool_a: self.pool_a,
            pool_b: self.pool_b,
            invariant: self.invariant,
            price_a: pools.price(Outcome::A),
            price_b: pools.price(Outcome::B),
            total_volume: self.total_volume,
            resolved: self.resolved,
            winning_outcome: self.winning_outcome,
            created_at: self.created_at,
        }
    }

    // 4.1: execute a purchase. validation and pricing run on a snapshot
    // first, so an error leaves the ledger untouched.
    pub fn buy(
        &mut self,
        participant_id: ParticipantId,
        outcome: Outcome,
        amount_in: Decimal,
    ) -> Result<TradeReceipt, MarketError> {
        if self.resolved {
            return Err(MarketError::MarketResolved(self.event_id.clone()));
        }

        let quote = self.pool_snapshot().simulate_buy(outcome, amount_in)?;

        // commit point: from here every write lands
        self.pool_a = quote.pool_a;
        self.pool_b = quote.pool_b;
        self.total_volume += amount_in;

        let position = self
            .positions
            .entry(participant_id.clone())
            .or_insert_with(|| Position::empty(participant_id.clone()));
        position.credit(outcome, quote.tokens_out, amount_in);
        let position = position.clone();

        debug_assert!((self.pool_a * self.pool_b - self.invariant).abs() <= INVARIANT_TOLERANCE);

        self.emit(AuditPayload::TradeExecuted(TradeExecutedEvent {
            event_id: self.event_id.clone(),
            participant_id: participant_id.clone(),
            outcome,
            amount_in,
            tokens_out: quote.tokens_out,
            new_price: quote.price_after,
        }));

        Ok(TradeReceipt {
            event_id: self.event_id.clone(),
            participant_id,
            outcome,
            amount_in,
            tokens_out: quote.tokens_out,
            new_price: quote.price_after,
            position,
        })
    }

    // 4.2: fix the verdict and pay out every position. winning tokens
    // redeem 1:1, losing tokens at zero, a draw pays both sides at half.
    pub fn resolve(&mut self, resolution: Resolution) -> Result<Settlement, MarketError> {
        if self.resolved {
            return Err(MarketError::AlreadyResolved(self.event_id.clone()));
        }

        self.resolved = true;
        self.winning_outcome = Some(resolution);

        let payouts: BTreeMap<ParticipantId, Decimal> = self
            .positions
            .iter()
            .map(|(id, position)| (id.clone(), position.payout(resolution)))
            .collect();
        let total_payout: Decimal = payouts.values().copied().sum();
        let resolved_at = Timestamp::now();

        self.emit(AuditPayload::MarketResolved(MarketResolvedEvent {
            event_id: self.event_id.clone(),
            resolution,
            total_payout,
            positions_settled: payouts.len(),
        }));

        Ok(Settlement {
            event_id: self.event_id.clone(),
            resolution,
            payouts,
            total_payout,
            resolved_at,
        })
    }

    /// Look up a participant's holdings. A participant that never traded
    /// gets a zero position; the read never inserts anything.
    pub fn get_position(&self, participant_id: &ParticipantId) -> Position {
        self.positions
            .get(participant_id)
            .cloned()
            .unwrap_or_else(|| Position::empty(participant_id.clone()))
    }

    pub fn positions_iter(&self) -> impl Iterator<Item = (&ParticipantId, &Position)> {
        self.positions.iter()
    }

    pub fn events(&self) -> &[AuditEvent] {
        &self.events
    }

    pub fn recent_events(&self, count: usize) -> &[AuditEvent] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    fn emit(&mut self, payload: AuditPayload) {
        let event = AuditEvent::new(AuditId(self.next_audit_id), Timestamp::now(), payload);
        self.next_audit_id += 1;
        self.events.push(event);

        if self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(0..drain_count);
        }
    }
}
