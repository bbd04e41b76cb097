//! Binary-outcome market simulation.
//!
//! Walks the full market lifecycle: creation, curve trading, depth table
//! display, and one-shot settlement including the draw case.

use outcome_core::*;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::thread;

fn main() {
    println!("Binary-Outcome AMM Core Simulation");
    println!("Constant-Product Pricing, One-Shot Settlement\n");

    scenario_1_pricing_walk();
    scenario_2_multiple_participants();
    scenario_3_order_book();
    scenario_4_settlement();
    scenario_5_draw();
    scenario_6_concurrent_trading();

    println!("\nAll simulations completed successfully.");
}

/// Single buyer moving the price along the curve.
fn scenario_1_pricing_walk() {
    println!("Scenario 1: Pricing Walk\n");

    let registry = MarketRegistry::default();
    let game = EventId::new("game-1");
    let snap = registry.create(game.clone(), dec!(1000)).unwrap();
    println!("  Market opened at {} / {} (A / B)", snap.price_a, snap.price_b);

    let alice = ParticipantId::new("alice");
    for spend in [dec!(50), dec!(100), dec!(200)] {
        let receipt = registry.buy(&game, alice.clone(), Outcome::A, spend).unwrap();
        println!(
            "  Alice spends {spend} on A: {:.4} tokens, price now {:.4}",
            receipt.tokens_out, receipt.new_price
        );
    }

    let snap = registry.snapshot(&game).unwrap();
    println!(
        "  Pools: A = {:.2}, B = {:.2}, volume = {}\n",
        snap.pool_a, snap.pool_b, snap.total_volume
    );
}

/// Two participants on opposite sides.
fn scenario_2_multiple_participants() {
    println!("Scenario 2: Opposing Participants\n");

    let registry = MarketRegistry::default();
    let game = EventId::new("game-2");
    registry.create(game.clone(), dec!(1000)).unwrap();

    let alice = ParticipantId::new("alice");
    let bob = ParticipantId::new("bob");

    registry.buy(&game, alice.clone(), Outcome::A, dec!(300)).unwrap();
    registry.buy(&game, bob.clone(), Outcome::B, dec!(150)).unwrap();

    let snap = registry.snapshot(&game).unwrap();
    println!("  After opposing flow: price A = {:.4}, price B = {:.4}", snap.price_a, snap.price_b);

    for participant in [&alice, &bob] {
        let pos = registry.position(&game, participant).unwrap();
        println!(
            "  {participant}: {:.4} A tokens, {:.4} B tokens, spent {}",
            pos.tokens_a, pos.tokens_b, pos.total_spent
        );
    }
    println!();
}

/// Depth table synthesized from the curve.
fn scenario_3_order_book() {
    println!("Scenario 3: Synthetic Depth Table\n");

    let registry = MarketRegistry::default();
    let game = EventId::new("game-3");
    registry.create(game.clone(), dec!(1000)).unwrap();
    registry
        .buy(&game, ParticipantId::new("alice"), Outcome::A, dec!(200))
        .unwrap();

    let book = registry.order_book(&game, 5, dec!(50)).unwrap();
    println!("  Outcome A bids (size -> avg price):");
    for level in &book.outcome_a.bids {
        println!("    {:>6} -> {:.4}", level.size, level.price);
    }
    println!("  Outcome A asks (derived from B side):");
    for level in &book.outcome_a.asks {
        println!("    {:>6} -> {:.4}", level.size, level.price);
    }
    println!();
}

/// Terminal settlement with a winner.
fn scenario_4_settlement() {
    println!("Scenario 4: Settlement\n");

    let registry = MarketRegistry::default();
    let game = EventId::new("game-4");
    registry.create(game.clone(), dec!(1000)).unwrap();

    let alice = ParticipantId::new("alice");
    let bob = ParticipantId::new("bob");
    registry.buy(&game, alice.clone(), Outcome::A, dec!(100)).unwrap();
    registry.buy(&game, bob.clone(), Outcome::B, dec!(100)).unwrap();

    let settlement = registry.resolve(&game, Resolution::OutcomeA).unwrap();
    println!("  Resolved as {}", settlement.resolution);
    for (participant, payout) in &settlement.payouts {
        println!("  {participant} receives {payout:.4}");
    }

    match registry.resolve(&game, Resolution::OutcomeB) {
        Err(RegistryError::Market(MarketError::AlreadyResolved(_))) => {
            println!("  Second resolve correctly rejected\n")
        }
        other => println!("  Unexpected: {other:?}\n"),
    }
}

/// Draw pays both sides at half.
fn scenario_5_draw() {
    println!("Scenario 5: Draw Settlement\n");

    let registry = MarketRegistry::default();
    let game = EventId::new("game-5");
    registry.create(game.clone(), dec!(1000)).unwrap();

    let alice = ParticipantId::new("alice");
    registry.buy(&game, alice.clone(), Outcome::A, dec!(100)).unwrap();
    registry.buy(&game, alice.clone(), Outcome::B, dec!(100)).unwrap();

    let settlement = registry.resolve(&game, Resolution::Draw).unwrap();
    println!(
        "  Draw: alice holds both sides, receives {:.4}\n",
        settlement.payouts[&alice]
    );
}

/// Concurrent buyers on one market keep the invariant.
fn scenario_6_concurrent_trading() {
    println!("Scenario 6: Concurrent Trading\n");

    let registry = Arc::new(MarketRegistry::default());
    let game = EventId::new("game-6");
    registry.create(game.clone(), dec!(1000)).unwrap();

    let mut handles = Vec::new();
    for t in 0..4 {
        let registry = Arc::clone(&registry);
        let game = game.clone();
        handles.push(thread::spawn(move || {
            let participant = ParticipantId::new(format!("trader-{t}"));
            for _ in 0..25 {
                let outcome = if t % 2 == 0 { Outcome::A } else { Outcome::B };
                registry.buy(&game, participant.clone(), outcome, dec!(5)).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let snap = registry.snapshot(&game).unwrap();
    let drift = (snap.pool_a * snap.pool_b - snap.invariant).abs();
    println!("  100 concurrent trades, volume = {}", snap.total_volume);
    println!("  Constant-product drift: {drift}");
}
