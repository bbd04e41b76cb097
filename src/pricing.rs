// 2.0: constant-product pricing over a pool snapshot. pure math, no state,
// safe to call from any thread. price(A) = pool_b / (pool_a + pool_b), so
// the two prices always sum to one.
// 2.1 has the buy simulation: the opposite pool absorbs the spend, the
// traded pool is recomputed to hold pool_a * pool_b constant, and the
// buyer receives the traded pool's reduction.

use crate::types::Outcome;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// immutable view of one market's reserves. cheap to copy out from under a
// lock so quoting never blocks trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub pool_a: Decimal,
    pub pool_b: Decimal,
    pub invariant: Decimal,
}

// 2.2: everything a caller learns from pricing a hypothetical buy.
// pool_a/pool_b here are the post-trade reserves; the ledger commits them
// verbatim so simulation and execution cannot disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyQuote {
    pub outcome: Outcome,
    pub amount_in: Decimal,
    pub tokens_out: Decimal,
    pub avg_price: Decimal,
    pub price_before: Decimal,
    pub price_after: Decimal,
    pub price_impact: Decimal,
    pub pool_a: Decimal,
    pub pool_b: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("Trade amount must be positive, got {0}")]
    InvalidAmount(Decimal),

    #[error("Pool for {outcome} cannot cover the trade (tokens out {tokens_out})")]
    ExhaustedPool { outcome: Outcome, tokens_out: Decimal },
}

impl PoolSnapshot {
    pub fn new(pool_a: Decimal, pool_b: Decimal, invariant: Decimal) -> Self {
        debug_assert!(pool_a > Decimal::ZERO && pool_b > Decimal::ZERO);
        Self {
            pool_a,
            pool_b,
            invariant,
        }
    }

    fn pool(&self, outcome: Outcome) -> Decimal {
        match outcome {
            Outcome::A => self.pool_a,
            Outcome::B => self.pool_b,
        }
    }

    // 2.3: instantaneous price of one outcome token, in [0, 1]. the scarcer
    // the traded pool, the closer its price to 1.
    pub fn price(&self, outcome: Outcome) -> Decimal {
        let total = self.pool_a + self.pool_b;
        self.pool(outcome.opposite()) / total
    }

    // 2.4: price a hypothetical purchase without touching state.
    //
    // amount_in lands in the opposite pool, the traded pool shrinks to
    // invariant / new_opposite, and the buyer takes the difference. the
    // curve is asymptotic so the traded pool approaches zero but never
    // reaches it; ExhaustedPool is only reachable on degenerate reserves.
    pub fn simulate_buy(&self, outcome: Outcome, amount_in: Decimal) -> Result<BuyQuote, PricingError> {
        if amount_in <= Decimal::ZERO {
            return Err(PricingError::InvalidAmount(amount_in));
        }

        let this_pool = self.pool(outcome);
        let other_pool = self.pool(outcome.opposite());

        let new_other = other_pool + amount_in;
        let new_this = self.invariant / new_other;
        let tokens_out = this_pool - new_this;

        if tokens_out <= Decimal::ZERO {
            return Err(PricingError::ExhaustedPool { outcome, tokens_out });
        }

        let price_before = self.price(outcome);
        let after = match outcome {
            Outcome::A => PoolSnapshot::new(new_this, new_other, self.invariant),
            Outcome::B => PoolSnapshot::new(new_other, new_this, self.invariant),
        };
        let price_after = after.price(outcome);
        let price_impact = (price_after - price_before) / price_before;

        Ok(BuyQuote {
            outcome,
            amount_in,
            tokens_out,
            avg_price: amount_in / tokens_out,
            price_before,
            price_after,
            price_impact,
            pool_a: after.pool_a,
            pool_b: after.pool_b,
        })
    }
}
