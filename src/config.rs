//! Ledger configuration options.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Ledger configuration. One copy per registry, shared by every market it
/// creates.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Liquidity seeded on each side when a caller does not choose one.
    pub default_liquidity: Decimal,
    /// Depth table levels produced when a caller does not choose.
    pub default_book_depth: usize,
    /// Trade-size step between depth table levels.
    pub default_book_step: Decimal,
    /// Maximum number of audit events retained per market.
    pub max_events: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_liquidity: dec!(1000),
            default_book_depth: 10,
            default_book_step: dec!(10),
            max_events: 10_000,
        }
    }
}
