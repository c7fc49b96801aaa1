//! Property-based tests for the routing core.
//!
//! These tests verify invariants hold under random venue sets and order sizes.

use proptest::prelude::*;
use rust_decimal::Decimal;
use sor_core::*;

// Strategies for generating test data
fn latency_strategy() -> impl Strategy<Value = f64> {
    (0u32..=50_000u32).prop_map(|x| x as f64 / 1000.0) // 0ms to 50ms
}

fn depth_strategy() -> impl Strategy<Value = i64> {
    0i64..=100_000i64
}

fn order_size_strategy() -> impl Strategy<Value = i64> {
    1i64..=200_000i64
}

fn venue_strategy() -> impl Strategy<Value = (f64, i64)> {
    (latency_strategy(), depth_strategy())
}

fn venues_strategy() -> impl Strategy<Value = Vec<Venue>> {
    prop::collection::vec(venue_strategy(), 1..30).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (latency, depth))| Venue::new(format!("V{}", i), latency, Decimal::new(100, 0), depth).unwrap())
            .collect()
    })
}

proptest! {
    /// The chosen venue is an element of the input, by address
    #[test]
    fn chosen_is_member(venues in venues_strategy(), size in order_size_strategy()) {
        let chosen = route_order(&venues, size).unwrap();
        prop_assert!(venues.iter().any(|v| std::ptr::eq(v, chosen)));
    }

    /// No venue scores strictly higher than the chosen one, and every
    /// earlier venue scores strictly lower
    #[test]
    fn chosen_is_first_maximum(venues in venues_strategy(), size in order_size_strategy()) {
        let chosen = route_order(&venues, size).unwrap();
        let idx = venues.iter().position(|v| std::ptr::eq(v, chosen)).unwrap();
        let best = score_venue(chosen, size as u64);

        for (i, v) in venues.iter().enumerate() {
            let s = score_venue(v, size as u64);
            prop_assert!(s <= best);
            if i < idx {
                prop_assert!(s < best, "earlier venue {} ties the winner", i);
            }
        }
    }

    /// Scoring is bit-for-bit repeatable
    #[test]
    fn score_deterministic((latency, depth) in venue_strategy(), size in order_size_strategy()) {
        let v = Venue::new("V", latency, Decimal::new(100, 0), depth).unwrap();
        prop_assert_eq!(score_venue(&v, size as u64).to_bits(), score_venue(&v, size as u64).to_bits());
    }

    /// Identical twins: whichever comes first wins
    #[test]
    fn tie_break_prefers_earlier((latency, depth) in venue_strategy(), size in order_size_strategy()) {
        let a = Venue::new("A", latency, Decimal::new(100, 0), depth).unwrap();
        let b = Venue::new("B", latency, Decimal::new(101, 0), depth).unwrap();

        let forward = vec![a.clone(), b.clone()];
        prop_assert_eq!(route_order(&forward, size).unwrap().name(), "A");

        let reversed = vec![b, a];
        prop_assert_eq!(route_order(&reversed, size).unwrap().name(), "B");
    }

    /// Liquidity term never exceeds 1.0 and is non-negative
    #[test]
    fn liquidity_bounded(depth in 0u64..=1_000_000u64, size in 1u64..=1_000_000u64) {
        let l = liquidity_score(depth, size);
        prop_assert!(l > 0.0);
        prop_assert!(l <= 1.0);
    }

    /// Liquidity term grows with order size until it saturates at 1.0
    #[test]
    fn liquidity_monotone_in_size(
        depth in 0u64..=100_000u64,
        size in 1u64..=100_000u64,
        extra in 0u64..=100_000u64,
    ) {
        let small = liquidity_score(depth, size);
        let large = liquidity_score(depth, size + extra);
        prop_assert!(large >= small);
        if size + extra > depth {
            prop_assert_eq!(large, 1.0);
        }
    }

    /// Extra depth only lowers the ratio of the order it absorbs. a venue
    /// that saturates stays saturated at every shallower depth
    #[test]
    fn liquidity_ratio_in_depth(
        depth in 0u64..=100_000u64,
        extra in 0u64..=100_000u64,
        size in 1u64..=100_000u64,
    ) {
        let shallow = liquidity_score(depth, size);
        let deep = liquidity_score(depth + extra, size);
        prop_assert!(deep <= shallow);
        if deep == 1.0 {
            prop_assert_eq!(shallow, 1.0);
        }
    }

    /// Lower latency never lowers the score at fixed depth and size
    #[test]
    fn lower_latency_never_hurts(
        (latency, depth) in venue_strategy(),
        cut in 0u32..=1000u32,
        size in order_size_strategy(),
    ) {
        let faster_latency = (latency - cut as f64 / 100.0).max(0.0);
        let slow = Venue::new("slow", latency, Decimal::new(100, 0), depth).unwrap();
        let fast = slow.with_latency(faster_latency).unwrap();
        prop_assert!(score_venue(&fast, size as u64) >= score_venue(&slow, size as u64));
    }

    /// Generator output stays in the configured bands and repeats per seed
    #[test]
    fn generator_bounds(n in 1i64..40, seed in any::<u64>()) {
        let venues = generate_venues(n, seed).unwrap();
        prop_assert_eq!(venues.len() as i64, n);
        for (i, v) in venues.iter().enumerate() {
            prop_assert_eq!(v.name(), format!("V{}", i));
            prop_assert!((1.0..=20.0).contains(&v.latency_ms()));
            prop_assert!(v.price() >= Decimal::new(99, 0) && v.price() <= Decimal::new(101, 0));
            prop_assert_eq!(v.depth(), 1000);
        }
        prop_assert_eq!(venues, generate_venues(n, seed).unwrap());
    }

    /// Ranking head agrees with the router and the ranking is sorted
    #[test]
    fn rank_consistent_with_route(venues in venues_strategy(), size in order_size_strategy()) {
        let router = Router::new(LatencyLiquidity);
        let ranked = router.rank(&venues, size).unwrap();
        let chosen = router.route(&venues, size).unwrap();
        prop_assert_eq!(ranked.len(), venues.len());
        prop_assert_eq!(ranked[0].venue.as_str(), chosen.name());
        prop_assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    /// Batch routing agrees with one-by-one routing
    #[test]
    fn batch_agrees_with_single(
        venues in venues_strategy(),
        sizes in prop::collection::vec(-10i64..=50_000i64, 1..20),
    ) {
        let router = Router::new(LatencyLiquidity);
        let batch = router.route_batch(&venues, &sizes);
        for (result, &size) in batch.iter().zip(&sizes) {
            match (result, route_order(&venues, size)) {
                (Ok(a), Ok(b)) => prop_assert!(std::ptr::eq(*a, b)),
                (Err(a), Err(b)) => prop_assert_eq!(a, &b),
                _ => prop_assert!(false, "batch and single routing disagree for size {}", size),
            }
        }
    }
}
