// 6.0: one market per external event, behind the crate's only shared
// collection. the map lock covers lookup and insert only; each market has
// its own mutex, so trading on one event never blocks another. reads copy
// a snapshot out from under the market lock and release it before any
// further work.
//
// resolve is guarded against double-apply here and in the ledger; exactly
// once delivery of the terminal event is the event source's job.

use crate::book::{synthesize_book, BookError, OrderBook};
use crate::config::LedgerConfig;
use crate::market::{Market, MarketError, MarketSnapshot, Settlement, TradeReceipt};
use crate::position::Position;
use crate::types::{EventId, Outcome, ParticipantId, Resolution};
use parking_lot::{Mutex, RwLock};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("No market for event {0}")]
    NotFound(EventId),

    #[error("Market for event {0} already exists")]
    DuplicateEvent(EventId),

    #[error("Initial liquidity must be positive, got {0}")]
    InvalidLiquidity(Decimal),

    #[error(transparent)]
    Market(#[from] MarketError),

    #[error(transparent)]
    Book(#[from] BookError),
}

/// Creates and owns every market. Markets live for the life of the process;
/// there is no eviction.
#[derive(Debug)]
pub struct MarketRegistry {
    config: LedgerConfig,
    markets: RwLock<HashMap<EventId, Arc<Mutex<Market>>>>,
}

impl Default for MarketRegistry {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

impl MarketRegistry {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            markets: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // 6.1: seed a market with equal reserves on both sides, so it opens at
    // exactly 50/50.
    pub fn create(
        &self,
        event_id: EventId,
        initial_liquidity: Decimal,
    ) -> Result<MarketSnapshot, RegistryError> {
        if initial_liquidity <= Decimal::ZERO {
            return Err(RegistryError::InvalidLiquidity(initial_liquidity));
        }

        let mut markets = self.markets.write();
        if markets.contains_key(&event_id) {
            return Err(RegistryError::DuplicateEvent(event_id));
        }

        let market = Market::new(event_id.clone(), initial_liquidity, self.config.max_events);
        let snapshot = market.snapshot();
        markets.insert(event_id, Arc::new(Mutex::new(market)));
        Ok(snapshot)
    }

    /// Create with the configured default liquidity.
    pub fn create_default(&self, event_id: EventId) -> Result<MarketSnapshot, RegistryError> {
        self.create(event_id, self.config.default_liquidity)
    }

    fn market(&self, event_id: &EventId) -> Result<Arc<Mutex<Market>>, RegistryError> {
        self.markets
            .read()
            .get(event_id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(event_id.clone()))
    }

    pub fn contains(&self, event_id: &EventId) -> bool {
        self.markets.read().contains_key(event_id)
    }

    pub fn len(&self) -> usize {
        self.markets.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.read().is_empty()
    }

    pub fn event_ids(&self) -> Vec<EventId> {
        self.markets.read().keys().cloned().collect()
    }

    pub fn snapshot(&self, event_id: &EventId) -> Result<MarketSnapshot, RegistryError> {
        Ok(self.market(event_id)?.lock().snapshot())
    }

    // 6.2: mutating operations serialize on the per-market mutex.
    pub fn buy(
        &self,
        event_id: &EventId,
        participant_id: ParticipantId,
        outcome: Outcome,
        amount_in: Decimal,
    ) -> Result<TradeReceipt, RegistryError> {
        let market = self.market(event_id)?;
        let receipt = market.lock().buy(participant_id, outcome, amount_in)?;
        Ok(receipt)
    }

    pub fn resolve(
        &self,
        event_id: &EventId,
        resolution: Resolution,
    ) -> Result<Settlement, RegistryError> {
        let market = self.market(event_id)?;
        let settlement = market.lock().resolve(resolution)?;
        Ok(settlement)
    }

    pub fn position(
        &self,
        event_id: &EventId,
        participant_id: &ParticipantId,
    ) -> Result<Position, RegistryError> {
        Ok(self.market(event_id)?.lock().get_position(participant_id))
    }

    // the curve is sampled on a copied snapshot, so depth synthesis runs
    // without holding the market lock.
    pub fn order_book(
        &self,
        event_id: &EventId,
        depth: usize,
        step: Decimal,
    ) -> Result<OrderBook, RegistryError> {
        let pools = self.market(event_id)?.lock().pool_snapshot();
        Ok(synthesize_book(pools, depth, step)?)
    }

    pub fn order_book_default(&self, event_id: &EventId) -> Result<OrderBook, RegistryError> {
        self.order_book(
            event_id,
            self.config.default_book_depth,
            self.config.default_book_step,
        )
    }
}
