//! End-to-end scenarios through the registry boundary, including the
//! concurrency discipline: one mutex per market, none shared across markets.

use outcome_core::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::thread;

fn game(n: u32) -> EventId {
    EventId::new(format!("game-{n}"))
}

fn alice() -> ParticipantId {
    ParticipantId::new("alice")
}

/// The worked example: liquidity 1000, spend 100 on A.
#[test]
fn worked_example_numbers() {
    let registry = MarketRegistry::default();
    let snap = registry.create(game(1), dec!(1000)).unwrap();
    assert_eq!(snap.price_a, dec!(0.5));
    assert_eq!(snap.price_b, dec!(0.5));

    let receipt = registry.buy(&game(1), alice(), Outcome::A, dec!(100)).unwrap();

    // pool_b = 1100, pool_a = 1_000_000 / 1100 ~ 909.09, tokens ~ 90.91
    assert!((receipt.tokens_out - dec!(90.91)).abs() < dec!(0.01));
    assert!((receipt.new_price - dec!(0.5475)).abs() < dec!(0.0001));

    let snap = registry.snapshot(&game(1)).unwrap();
    assert_eq!(snap.pool_b, dec!(1100));
    assert!((snap.pool_a - dec!(909.09)).abs() < dec!(0.01));
    assert_eq!(snap.total_volume, dec!(100));
}

/// After the worked-example buy, resolving for A pays the buyer their
/// token balance, and a second resolve fails.
#[test]
fn worked_example_settlement() {
    let registry = MarketRegistry::default();
    registry.create(game(1), dec!(1000)).unwrap();
    let receipt = registry.buy(&game(1), alice(), Outcome::A, dec!(100)).unwrap();

    let settlement = registry.resolve(&game(1), Resolution::OutcomeA).unwrap();
    assert_eq!(settlement.payouts[&alice()], receipt.tokens_out);
    assert!((settlement.total_payout - dec!(90.91)).abs() < dec!(0.01));

    let err = registry.resolve(&game(1), Resolution::OutcomeB).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Market(MarketError::AlreadyResolved(_))
    ));
    let snap = registry.snapshot(&game(1)).unwrap();
    assert_eq!(snap.winning_outcome, Some(Resolution::OutcomeA));
}

/// Rejected buys leave the market bit-for-bit unchanged.
#[test]
fn rejected_buy_changes_nothing() {
    let registry = MarketRegistry::default();
    registry.create(game(1), dec!(1000)).unwrap();
    registry.buy(&game(1), alice(), Outcome::B, dec!(75)).unwrap();

    let before = registry.snapshot(&game(1)).unwrap();
    let position_before = registry.position(&game(1), &alice()).unwrap();

    for bad_amount in [Decimal::ZERO, dec!(-1), dec!(-100)] {
        let err = registry
            .buy(&game(1), alice(), Outcome::A, bad_amount)
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Market(MarketError::Pricing(PricingError::InvalidAmount(_)))
        ));
    }

    assert_eq!(registry.snapshot(&game(1)).unwrap(), before);
    assert_eq!(registry.position(&game(1), &alice()).unwrap(), position_before);
}

/// A resolved market refuses trades but still serves reads.
#[test]
fn resolved_market_is_read_only() {
    let registry = MarketRegistry::default();
    registry.create(game(1), dec!(1000)).unwrap();
    registry.buy(&game(1), alice(), Outcome::A, dec!(50)).unwrap();
    registry.resolve(&game(1), Resolution::Draw).unwrap();

    let err = registry.buy(&game(1), alice(), Outcome::A, dec!(10)).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Market(MarketError::MarketResolved(_))
    ));

    assert!(registry.snapshot(&game(1)).unwrap().resolved);
    assert!(!registry.position(&game(1), &alice()).unwrap().is_empty());
    assert!(registry.order_book_default(&game(1)).is_ok());
}

/// Concurrent buyers hammering one market never break the constant product.
#[test]
fn concurrent_buys_preserve_invariant() {
    let registry = Arc::new(MarketRegistry::default());
    registry.create(game(1), dec!(10000)).unwrap();

    let threads = 8;
    let buys_per_thread = 50;
    let amount = dec!(7.5);

    let mut handles = Vec::new();
    for t in 0..threads {
        let registry = Arc::clone(&registry);
        handles.push(thread::spawn(move || {
            let participant = ParticipantId::new(format!("trader-{t}"));
            let outcome = if t % 2 == 0 { Outcome::A } else { Outcome::B };
            for _ in 0..buys_per_thread {
                registry.buy(&game(1), participant.clone(), outcome, amount).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let snap = registry.snapshot(&game(1)).unwrap();
    let drift = (snap.pool_a * snap.pool_b - snap.invariant).abs();
    assert!(drift <= INVARIANT_TOLERANCE * snap.invariant);
    assert_eq!(
        snap.total_volume,
        amount * Decimal::from(threads * buys_per_thread)
    );
    assert!((snap.price_a + snap.price_b - Decimal::ONE).abs() <= dec!(0.000000000001));
}

/// Trading on one market while resolving another: no shared lock, no
/// interference.
#[test]
fn markets_do_not_interfere_concurrently() {
    let registry = Arc::new(MarketRegistry::default());
    registry.create(game(1), dec!(1000)).unwrap();
    registry.create(game(2), dec!(1000)).unwrap();

    let trader = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            for _ in 0..100 {
                registry.buy(&game(1), alice(), Outcome::A, dec!(1)).unwrap();
            }
        })
    };
    let resolver = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || registry.resolve(&game(2), Resolution::OutcomeB).unwrap())
    };

    trader.join().unwrap();
    let settlement = resolver.join().unwrap();
    assert_eq!(settlement.resolution, Resolution::OutcomeB);

    let snap = registry.snapshot(&game(1)).unwrap();
    assert!(!snap.resolved);
    assert_eq!(snap.total_volume, dec!(100));
}

/// Concurrent settlement attempts: exactly one wins.
#[test]
fn resolve_races_settle_exactly_once() {
    let registry = Arc::new(MarketRegistry::default());
    registry.create(game(1), dec!(1000)).unwrap();
    registry.buy(&game(1), alice(), Outcome::A, dec!(100)).unwrap();

    let mut handles = Vec::new();
    for verdict in [Resolution::OutcomeA, Resolution::OutcomeB, Resolution::Draw] {
        let registry = Arc::clone(&registry);
        handles.push(thread::spawn(move || registry.resolve(&game(1), verdict)));
    }

    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    for result in outcomes.iter().filter(|r| r.is_err()) {
        assert!(matches!(
            result,
            Err(RegistryError::Market(MarketError::AlreadyResolved(_)))
        ));
    }

    let winner = registry.snapshot(&game(1)).unwrap().winning_outcome.unwrap();
    let settled = outcomes.into_iter().find_map(|r| r.ok()).unwrap();
    assert_eq!(settled.resolution, winner);
}

/// Snapshots and depth tables serialize, since they cross a transport
/// boundary in deployment.
#[test]
fn boundary_types_serialize() {
    let registry = MarketRegistry::default();
    registry.create(game(1), dec!(1000)).unwrap();
    registry.buy(&game(1), alice(), Outcome::A, dec!(100)).unwrap();

    let snap = registry.snapshot(&game(1)).unwrap();
    let json = serde_json::to_string(&snap).unwrap();
    let back: MarketSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snap);

    let book = registry.order_book(&game(1), 5, dec!(10)).unwrap();
    let json = serde_json::to_string(&book).unwrap();
    let back: OrderBook = serde_json::from_str(&json).unwrap();
    assert_eq!(back, book);
}
