use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use swiss_sim::config::Config;
use swiss_sim::constants::DEFAULT_SUCCESS_THRESHOLD;
use swiss_sim::predictions::Prediction;
use swiss_sim::report;
use swiss_sim::simulation::{SimSummary, Simulation};

/// Monte Carlo outcome estimator for the CS Major Swiss stage.
#[derive(Parser, Debug)]
#[command(name = "swiss_sim", version, about)]
struct Args {
    /// Path to the tournament data file (.json)
    #[arg(short = 'f', long = "file")]
    file: PathBuf,

    /// Number of tournament simulations to run
    #[arg(short = 'n', long = "iterations", default_value_t = 1_000_000)]
    iterations: u64,

    /// Number of parallel workers
    #[arg(short = 'k', long = "workers", default_value_t = num_cpus::get())]
    workers: usize,

    /// Number of candidate predictions to score
    #[arg(short = 'p', long = "predictions", default_value_t = 1000)]
    predictions: usize,

    /// Random seed for reproducible runs
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Correct assignments needed for a prediction to count as a success
    #[arg(long, default_value_t = DEFAULT_SUCCESS_THRESHOLD)]
    threshold: u32,

    /// Hill-climbing generations used to refine the best predictions
    #[arg(long, default_value_t = 0)]
    generations: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::from_path(&args.file)
        .with_context(|| format!("failed to load {}", args.file.display()))?;
    let (sigma, teams) = config.build()?;
    let sim = Simulation::new(teams, sigma)?;

    let mut master = match args.seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    };

    let mut predictions = generate_unique(&sim, args.predictions, &mut master)?;

    let started = Instant::now();
    let mut summary = run_scored(&sim, &args, &predictions, &mut master)?;

    for generation in 1..=args.generations {
        predictions = next_generation(&sim, &predictions, &summary, &mut master);
        summary = run_scored(&sim, &args, &predictions, &mut master)?;
        println!(
            "generation {}: best prediction at {:.2}%",
            generation,
            best_success_pct(&summary)
        );
    }
    let elapsed = started.elapsed();

    print!("{}", report::render_results(sim.teams(), &summary, elapsed));

    let mut ranked: Vec<usize> = (0..predictions.len()).collect();
    ranked.sort_by(|&a, &b| {
        summary.prediction_successes[b].cmp(&summary.prediction_successes[a])
    });
    for &i in ranked.iter().take(5) {
        println!();
        print!(
            "{}",
            report::render_prediction(sim.teams(), &predictions[i], summary.success_percentage(i))
        );
    }

    Ok(())
}

/// One full scored run, seeded from the master stream.
fn run_scored(
    sim: &Simulation,
    args: &Args,
    predictions: &[Prediction],
    master: &mut ChaCha8Rng,
) -> Result<SimSummary> {
    let run_seed = master.gen::<u64>();
    let summary = sim.run(
        args.iterations,
        args.workers,
        predictions,
        args.threshold,
        Some(run_seed),
    )?;
    Ok(summary)
}

/// Draw random predictions until `count` distinct ones exist.
fn generate_unique(
    sim: &Simulation,
    count: usize,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<Prediction>> {
    let teams = sim.teams();
    let mut predictions = Vec::with_capacity(count);
    let mut seen = HashSet::new();
    let mut stale = 0;

    while predictions.len() < count {
        let candidate = Prediction::random(teams.len(), rng);
        if seen.insert(candidate.fingerprint(teams)) {
            predictions.push(candidate);
            stale = 0;
        } else {
            stale += 1;
            if stale > 10_000 {
                bail!("could not generate {} distinct predictions", count);
            }
        }
    }
    Ok(predictions)
}

/// Keep the strongest predictions and refill the pool with mutants of them.
fn next_generation(
    sim: &Simulation,
    predictions: &[Prediction],
    summary: &SimSummary,
    rng: &mut ChaCha8Rng,
) -> Vec<Prediction> {
    let teams = sim.teams();
    let mut ranked: Vec<usize> = (0..predictions.len()).collect();
    ranked.sort_by(|&a, &b| {
        summary.prediction_successes[b].cmp(&summary.prediction_successes[a])
    });

    let parents: Vec<Prediction> = ranked
        .iter()
        .take(5)
        .map(|&i| predictions[i].clone())
        .collect();

    let mut seen: HashSet<String> =
        parents.iter().map(|p| p.fingerprint(teams)).collect();
    let mut next = parents.clone();

    while next.len() < predictions.len() {
        let parent = &parents[rng.gen_range(0..parents.len())];
        let mut mutant = parent.mutate(teams.len(), rng);
        // Best effort on uniqueness; a stray duplicate only costs a
        // redundant scoring slot.
        for _ in 0..100 {
            if !seen.contains(&mutant.fingerprint(teams)) {
                break;
            }
            mutant = parent.mutate(teams.len(), rng);
        }
        seen.insert(mutant.fingerprint(teams));
        next.push(mutant);
    }
    next
}

fn best_success_pct(summary: &SimSummary) -> f64 {
    (0..summary.prediction_successes.len())
        .map(|i| summary.success_percentage(i))
        .fold(0.0, f64::max)
}
