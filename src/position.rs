// 3.0: per-participant holdings in one market. tokens are only ever bought
// in this design, so every field is monotone non-decreasing until settlement.
// 3.1 has the payout rule applied at resolution.

use crate::types::{Outcome, ParticipantId, Resolution};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub participant_id: ParticipantId,
    pub tokens_a: Decimal,
    pub tokens_b: Decimal,
    pub total_spent: Decimal,
}

impl Position {
    pub fn empty(participant_id: ParticipantId) -> Self {
        Self {
            participant_id,
            tokens_a: Decimal::ZERO,
            tokens_b: Decimal::ZERO,
            total_spent: Decimal::ZERO,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens_a.is_zero() && self.tokens_b.is_zero()
    }

    pub fn tokens(&self, outcome: Outcome) -> Decimal {
        match outcome {
            Outcome::A => self.tokens_a,
            Outcome::B => self.tokens_b,
        }
    }

    pub(crate) fn credit(&mut self, outcome: Outcome, tokens: Decimal, spent: Decimal) {
        match outcome {
            Outcome::A => self.tokens_a += tokens,
            Outcome::B => self.tokens_b += tokens,
        }
        self.total_spent += spent;
    }

    // 3.1: settlement value of this position. winning tokens redeem 1:1,
    // losing tokens redeem at zero, a draw redeems both sides at half.
    pub fn payout(&self, resolution: Resolution) -> Decimal {
        match resolution.winner() {
            Some(outcome) => self.tokens(outcome),
            None => (self.tokens_a + self.tokens_b) * dec!(0.5),
        }
    }
}
