// 1.0: primitives shared by every module. IDs, outcomes, timestamps.
// each is a newtype so the compiler catches type mixups.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// opaque handle for the external event a market settles on. never interpreted,
// only compared and hashed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 1.1: the two sides of a binary market. every trade targets exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    A,
    B,
}

impl Outcome {
    pub fn opposite(&self) -> Self {
        match self {
            Outcome::A => Outcome::B,
            Outcome::B => Outcome::A,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::A => write!(f, "A"),
            Outcome::B => write!(f, "B"),
        }
    }
}

// 1.2: terminal verdict from the external event source. a draw is a real
// terminal state, not an absence of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    OutcomeA,
    OutcomeB,
    Draw,
}

impl Resolution {
    // which side redeems at full value, if any
    pub fn winner(&self) -> Option<Outcome> {
        match self {
            Resolution::OutcomeA => Some(Outcome::A),
            Resolution::OutcomeB => Some(Outcome::B),
            Resolution::Draw => None,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::OutcomeA => write!(f, "outcome A"),
            Resolution::OutcomeB => write!(f, "outcome B"),
            Resolution::Draw => write!(f, "draw"),
        }
    }
}

// 1.3: millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    pub fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }
}

// 1.4: tolerance for the constant-product check. decimal math keeps the
// product far tighter than this in practice, but division still rounds at
// the 28th significant digit.
pub const INVARIANT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 12);
