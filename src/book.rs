// 5.0: synthetic depth table. there are no resting orders on a bonding
// curve, so the book shown to viewers is the pricing engine sampled at
// increasing trade sizes. display-only; nothing here mutates.

use crate::pricing::{PoolSnapshot, PricingError};
use crate::types::Outcome;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookError {
    #[error("Book depth must be at least 1")]
    InvalidDepth,

    #[error("Step size must be positive, got {0}")]
    InvalidStep(Decimal),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// One rung of the depth table: buy `size` currency, pay `price` per token
/// on average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLevel {
    pub size: Decimal,
    pub price: Decimal,
}

/// Both views of one outcome. Bids come straight from `simulate_buy`; asks
/// are the complement of the opposite outcome's bids, since buying the
/// opposite side at p is selling this side at 1 - p.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSide {
    pub bids: Vec<BookLevel>,
    pub asks: Vec<BookLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    pub depth: usize,
    pub step: Decimal,
    pub outcome_a: BookSide,
    pub outcome_b: BookSide,
}

// 5.1: sample the curve at i * step for i = 1..=depth. levels are strictly
// increasing in size, and on a convex curve non-decreasing in price.
pub fn synthesize_book(
    snapshot: PoolSnapshot,
    depth: usize,
    step: Decimal,
) -> Result<OrderBook, BookError> {
    if depth == 0 {
        return Err(BookError::InvalidDepth);
    }
    if step <= Decimal::ZERO {
        return Err(BookError::InvalidStep(step));
    }

    let mut bids_a = Vec::with_capacity(depth);
    let mut bids_b = Vec::with_capacity(depth);

    for i in 1..=depth {
        let size = Decimal::from(i as u64) * step;
        let quote_a = snapshot.simulate_buy(Outcome::A, size)?;
        let quote_b = snapshot.simulate_buy(Outcome::B, size)?;
        bids_a.push(BookLevel {
            size,
            price: quote_a.avg_price,
        });
        bids_b.push(BookLevel {
            size,
            price: quote_b.avg_price,
        });
    }

    let complement = |levels: &[BookLevel]| -> Vec<BookLevel> {
        levels
            .iter()
            .map(|level| BookLevel {
                size: level.size,
                price: Decimal::ONE - level.price,
            })
            .collect()
    };

    let asks_a = complement(&bids_b);
    let asks_b = complement(&bids_a);

    Ok(OrderBook {
        depth,
        step,
        outcome_a: BookSide {
            bids: bids_a,
            asks: asks_a,
        },
        outcome_b: BookSide {
            bids: bids_b,
            asks: asks_b,
        },
    })
}
