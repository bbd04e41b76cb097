// outcome-core: binary-outcome prediction market AMM.
// constant-product pricing, one-shot settlement, per-market serialization.
// all computation is deterministic with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x types.rs: primitives: EventId, ParticipantId, Outcome, Resolution
//   2.x pricing.rs: constant-product curve, pure buy simulation
//   3.x position.rs: per-participant holdings and the payout rule
//   4.x market.rs: market ledger: buy, resolve, snapshots
//   5.x book.rs: synthetic depth table sampled from the curve
//   6.x registry.rs: one market per event, locking, boundary facade
//   7.x events.rs: audit events for state changes
//   8.x config.rs: ledger defaults

pub mod book;
pub mod config;
pub mod events;
pub mod market;
pub mod position;
pub mod pricing;
pub mod registry;
pub mod types;

// re exports for convenience
pub use book::*;
pub use config::*;
pub use events::*;
pub use market::*;
pub use position::*;
pub use pricing::*;
pub use registry::*;
pub use types::*;
