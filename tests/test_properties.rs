//! Property-based tests for the rating model, the Swiss engine, and the
//! prediction search space, plus seeded statistical checks.

use std::cmp::Ordering;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use statrs::distribution::{ContinuousCDF, Normal};

use swiss_sim::constants::{MAX_ROUNDS, STAGE_TEAM_COUNT};
use swiss_sim::series::simulate_series;
use swiss_sim::simulation::Simulation;
use swiss_sim::team::{Bucket, Team};
use swiss_sim::tournament::SwissSystem;
use swiss_sim::win_prob::{calculate_win_prob, WinProbTable};

const SYSTEMS: usize = 3;
const PAIR_COUNT: usize = STAGE_TEAM_COUNT * (STAGE_TEAM_COUNT - 1) / 2;

/// Strategy: one rating per system, in a realistic range.
fn ratings_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0..2000.0f64, SYSTEMS)
}

/// Strategy: one positive sigma per system.
fn sigma_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(50.0..500.0f64, SYSTEMS)
}

/// Strategy: map-win probabilities for every unordered team pair.
fn pair_probs_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.001..0.999f64, PAIR_COUNT)
}

fn seeded_field() -> Vec<Team> {
    (1..=STAGE_TEAM_COUNT)
        .map(|seed| Team::new(format!("Team{}", seed), seed as u32, vec![1000.0; SYSTEMS]))
        .collect()
}

/// Index of the unordered pair `(a, b)` with `a < b` in a flat upper
/// triangle.
fn pair_index(a: usize, b: usize) -> usize {
    a * STAGE_TEAM_COUNT - a * (a + 1) / 2 + (b - a - 1)
}

fn rigged_table(entries: &[f64]) -> WinProbTable {
    WinProbTable::from_fn(STAGE_TEAM_COUNT, |a, b| match a.cmp(&b) {
        Ordering::Less => entries[pair_index(a, b)],
        Ordering::Equal => 0.5,
        Ordering::Greater => 1.0 - entries[pair_index(b, a)],
    })
}

proptest! {
    // 1. The logistic model never produces a certain outcome
    #[test]
    fn win_prob_within_open_unit_interval(
        ra in ratings_strategy(),
        rb in ratings_strategy(),
        sigma in sigma_strategy(),
    ) {
        let a = Team::new("A".to_string(), 1, ra);
        let b = Team::new("B".to_string(), 2, rb);
        let p = calculate_win_prob(&a, &b, &sigma);
        prop_assert!(p > 0.0 && p < 1.0, "p={}", p);
    }

    // 2. Swapping the teams complements the probability
    #[test]
    fn win_prob_symmetric(
        ra in ratings_strategy(),
        rb in ratings_strategy(),
        sigma in sigma_strategy(),
    ) {
        let a = Team::new("A".to_string(), 1, ra);
        let b = Team::new("B".to_string(), 2, rb);
        let forward = calculate_win_prob(&a, &b, &sigma);
        let reverse = calculate_win_prob(&b, &a, &sigma);
        prop_assert!((forward + reverse - 1.0).abs() < 1e-9,
            "forward={} reverse={}", forward, reverse);
    }

    // 3. Table mirror entries are exact complements of the stored values
    #[test]
    fn table_mirror_is_exact_complement(
        fields in prop::collection::vec(ratings_strategy(), STAGE_TEAM_COUNT),
        sigma in sigma_strategy(),
    ) {
        let teams: Vec<Team> = fields
            .into_iter()
            .enumerate()
            .map(|(i, ratings)| Team::new(format!("Team{}", i + 1), i as u32 + 1, ratings))
            .collect();
        let table = WinProbTable::new(&teams, &sigma);

        for a in 0..teams.len() {
            for b in (a + 1)..teams.len() {
                prop_assert_eq!(table.get(b, a), 1.0 - table.get(a, b));
            }
        }
    }

    // 4. Whatever the map probabilities, a stage runs five rounds, decides
    //    every team, fills the fixed bucket sizes, and keeps pairing
    //    history symmetric
    #[test]
    fn tournament_always_classifies_the_field(
        entries in pair_probs_strategy(),
        seed in any::<u64>(),
    ) {
        let teams = seeded_field();
        let probs = rigged_table(&entries);
        let mut swiss = SwissSystem::new(&teams, &probs);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let rounds = swiss.simulate_tournament(&mut rng);
        prop_assert_eq!(rounds, MAX_ROUNDS);

        let mut counts = [0usize; Bucket::COUNT];
        let mut unclassified = 0;
        for (id, record) in swiss.records().iter().enumerate() {
            prop_assert!(record.decided(), "Team{} ended {}", id + 1, record);
            prop_assert!(record.wins <= 3 && record.losses <= 3);

            let faced = swiss.faced(id);
            prop_assert!(faced.len() as u32 <= record.wins + record.losses);
            let mut deduped = faced.to_vec();
            deduped.sort_unstable();
            deduped.dedup();
            prop_assert_eq!(deduped.len(), faced.len(), "opponent listed twice");
            for &opponent in faced {
                prop_assert!(
                    swiss.faced(opponent).contains(&id),
                    "Team{} faced Team{} but not vice versa", id + 1, opponent + 1
                );
            }

            match record.bucket() {
                Some(bucket) => counts[bucket.index()] += 1,
                None => unclassified += 1,
            }
        }
        prop_assert_eq!(counts, [2, 6, 8]);
        prop_assert_eq!(unclassified, 0);
    }

    // 5. Totals stay exact no matter how simulations land on workers
    #[test]
    fn run_totals_exact_for_any_partitioning(
        n in 1..120u64,
        k in 1..12usize,
        seed in any::<u64>(),
    ) {
        let sim = Simulation::new(seeded_field(), vec![250.0; SYSTEMS]).unwrap();
        let summary = sim.run(n, k, &[], 6, Some(seed)).unwrap();

        prop_assert_eq!(summary.simulations, n);
        let mut totals = [0u64; Bucket::COUNT];
        for counts in &summary.bucket_counts {
            for (total, count) in totals.iter_mut().zip(counts) {
                *total += count;
            }
        }
        prop_assert_eq!(totals, [2 * n, 6 * n, 8 * n]);
    }

    // 6. Arbitrarily long mutation chains keep predictions well formed
    #[test]
    fn mutation_chain_keeps_prediction_well_formed(
        seed in any::<u64>(),
        steps in 1..50usize,
    ) {
        use swiss_sim::predictions::Prediction;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut prediction = Prediction::random(STAGE_TEAM_COUNT, &mut rng);

        for _ in 0..steps {
            prediction = prediction.mutate(STAGE_TEAM_COUNT, &mut rng);

            let mut picked = Vec::new();
            for bucket in Bucket::ALL {
                picked.extend_from_slice(prediction.group(bucket));
            }
            prop_assert_eq!(picked.len(), 10);
            picked.sort_unstable();
            picked.dedup();
            prop_assert_eq!(picked.len(), 10, "a team was picked twice");
            prop_assert!(picked.iter().all(|&id| id < STAGE_TEAM_COUNT));
            prop_assert_eq!(prediction.group(Bucket::ThreeZero).len(), 2);
            prop_assert_eq!(prediction.group(Bucket::Advance).len(), 6);
            prop_assert_eq!(prediction.group(Bucket::ZeroThree).len(), 2);
        }
    }
}

// 7. BO3 series win rate matches the closed form p^2 * (3 - 2p)
#[test]
fn bo3_win_rate_matches_closed_form() {
    let p = 0.7;
    let expected = p * p * (3.0 - 2.0 * p);
    let n = 100_000u32;

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let wins = (0..n)
        .filter(|_| simulate_series(p, true, &mut rng))
        .count();
    let observed = wins as f64 / n as f64;

    let se = (expected * (1.0 - expected) / n as f64).sqrt();
    let z = (observed - expected).abs() / se;
    let normal = Normal::new(0.0, 1.0).unwrap();
    let tail = 2.0 * (1.0 - normal.cdf(z));
    assert!(
        tail > 1e-9,
        "observed {:.4} vs expected {:.4}, z={:.2}",
        observed,
        expected,
        z
    );
}

// 8. A clearly stronger half of the field advances more often than the
//    weaker half, for every single team
#[test]
fn stronger_half_advances_more_often() {
    let teams: Vec<Team> = (1..=STAGE_TEAM_COUNT)
        .map(|seed| {
            let rating = if seed <= 8 { 1400.0 } else { 1000.0 };
            Team::new(format!("Team{}", seed), seed as u32, vec![rating])
        })
        .collect();
    let sim = Simulation::new(teams, vec![200.0]).unwrap();
    let summary = sim.run(20_000, 4, &[], 6, Some(11)).unwrap();

    let advance_rate = |id: usize| {
        summary.bucket_percentage(id, Bucket::ThreeZero)
            + summary.bucket_percentage(id, Bucket::Advance)
    };
    let strong_min = (0..8).map(advance_rate).fold(f64::INFINITY, f64::min);
    let weak_max = (8..16).map(advance_rate).fold(0.0, f64::max);
    assert!(
        strong_min > weak_max,
        "strongest-half minimum {:.1}% not above weaker-half maximum {:.1}%",
        strong_min,
        weak_max
    );
}
