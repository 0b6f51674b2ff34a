use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::error::ConfigError;
use crate::predictions::Prediction;
use crate::team::{Bucket, Team, TeamId};
use crate::tournament::SwissSystem;
use crate::win_prob::WinProbTable;

/// Per-team outcome counters, indexed by [`Bucket::index`].
pub type BucketCounts = [u64; Bucket::COUNT];

/// Aggregate over a set of simulations: per-team bucket counts plus
/// per-prediction success counts. Produced by one worker's batch and merged
/// across workers by pointwise sum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimSummary {
    /// Bucket counts per team, indexed by `TeamId`
    pub bucket_counts: Vec<BucketCounts>,
    /// Per prediction: simulations whose outcome met the success threshold
    pub prediction_successes: Vec<u64>,
    /// Simulations contributing to this summary
    pub simulations: u64,
}

impl SimSummary {
    fn zeroed(team_count: usize, prediction_count: usize) -> Self {
        SimSummary {
            bucket_counts: vec![[0; Bucket::COUNT]; team_count],
            prediction_successes: vec![0; prediction_count],
            simulations: 0,
        }
    }

    /// Pointwise sum. Associative and commutative, so totals do not depend
    /// on how simulations were partitioned across workers.
    fn merge(&mut self, other: &SimSummary) {
        assert_eq!(self.bucket_counts.len(), other.bucket_counts.len());
        assert_eq!(self.prediction_successes.len(), other.prediction_successes.len());

        for (mine, theirs) in self.bucket_counts.iter_mut().zip(&other.bucket_counts) {
            for (count, add) in mine.iter_mut().zip(theirs) {
                *count += add;
            }
        }
        for (mine, theirs) in self.prediction_successes.iter_mut().zip(&other.prediction_successes) {
            *mine += theirs;
        }
        self.simulations += other.simulations;
    }

    /// Share of simulations a team finished in a bucket, as a percentage.
    pub fn bucket_percentage(&self, id: TeamId, bucket: Bucket) -> f64 {
        if self.simulations == 0 {
            0.0
        } else {
            self.bucket_counts[id][bucket.index()] as f64 / self.simulations as f64 * 100.0
        }
    }

    /// Share of simulations a prediction met the threshold in, as a
    /// percentage.
    pub fn success_percentage(&self, prediction: usize) -> f64 {
        if self.simulations == 0 {
            0.0
        } else {
            self.prediction_successes[prediction] as f64 / self.simulations as f64 * 100.0
        }
    }
}

/// Prepared simulation inputs: the validated team field, sigma vector, and
/// the probability table every worker reads from.
pub struct Simulation {
    teams: Vec<Team>,
    sigma: Vec<f64>,
    probs: WinProbTable,
}

impl Simulation {
    /// Validate the field and precompute the win-probability table.
    ///
    /// All input problems are rejected here, before any simulation starts:
    /// an empty or odd field, a sigma vector that is empty or non-positive,
    /// rating vectors not aligned with sigma, and duplicate names or seeds.
    pub fn new(teams: Vec<Team>, sigma: Vec<f64>) -> Result<Self, ConfigError> {
        if teams.is_empty() || teams.len() % 2 != 0 {
            return Err(ConfigError::UnevenField { count: teams.len() });
        }
        if sigma.is_empty() {
            return Err(ConfigError::NoSystems);
        }

        let mut names = HashSet::new();
        let mut seed_taken_by: Vec<Option<usize>> = vec![None; teams.len() + 1];
        for (idx, team) in teams.iter().enumerate() {
            if team.ratings.len() != sigma.len() {
                return Err(ConfigError::RatingCountMismatch {
                    team: team.name.clone(),
                    got: team.ratings.len(),
                    expected: sigma.len(),
                });
            }
            if !names.insert(team.name.as_str()) {
                return Err(ConfigError::DuplicateTeam {
                    name: team.name.clone(),
                });
            }
            if team.seed == 0 || team.seed as usize > teams.len() {
                return Err(ConfigError::SeedOutOfRange {
                    team: team.name.clone(),
                    seed: team.seed,
                    teams: teams.len(),
                });
            }
            if let Some(first) = seed_taken_by[team.seed as usize] {
                return Err(ConfigError::DuplicateSeed {
                    seed: team.seed,
                    first: teams[first].name.clone(),
                    second: team.name.clone(),
                });
            }
            seed_taken_by[team.seed as usize] = Some(idx);
        }
        for (i, &s) in sigma.iter().enumerate() {
            if !(s > 0.0) {
                return Err(ConfigError::NonPositiveSigma { index: i, value: s });
            }
        }

        let probs = WinProbTable::new(&teams, &sigma);
        Ok(Simulation { teams, sigma, probs })
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn sigma(&self) -> &[f64] {
        &self.sigma
    }

    pub fn probs(&self) -> &WinProbTable {
        &self.probs
    }

    /// Run `n` simulations sequentially on one reused tournament state.
    ///
    /// Each simulation classifies every decided team into its bucket and,
    /// for each prediction, counts the simulation as a success when at
    /// least `threshold` assignments came true.
    pub fn batch(
        &self,
        n: u64,
        predictions: &[Prediction],
        threshold: u32,
        seed: u64,
    ) -> SimSummary {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut swiss = SwissSystem::new(&self.teams, &self.probs);
        let mut summary = SimSummary::zeroed(self.teams.len(), predictions.len());
        let mut outcome: Vec<Option<Bucket>> = vec![None; self.teams.len()];

        for _ in 0..n {
            swiss.reset();
            swiss.simulate_tournament(&mut rng);

            for (id, record) in swiss.records().iter().enumerate() {
                outcome[id] = record.bucket();
                if let Some(bucket) = outcome[id] {
                    summary.bucket_counts[id][bucket.index()] += 1;
                }
            }
            for (i, prediction) in predictions.iter().enumerate() {
                if prediction.score(&outcome) >= threshold {
                    summary.prediction_successes[i] += 1;
                }
            }
        }

        summary.simulations = n;
        summary
    }

    /// Run `n` simulations split across `k` parallel workers and merge the
    /// partial summaries.
    ///
    /// The first `n % k` workers take one extra simulation so the total is
    /// exact. Every worker owns a private tournament state and RNG; batch
    /// seeds derive from the master seed, so for a fixed `(seed, n, k)` the
    /// result is reproducible. Changing `k` changes how draws land and may
    /// change counts, not just their grouping.
    ///
    /// A worker panic (an engine invariant violation) propagates out of the
    /// rayon join and aborts the whole run; there are no partial results.
    pub fn run(
        &self,
        n: u64,
        k: usize,
        predictions: &[Prediction],
        threshold: u32,
        seed: Option<u64>,
    ) -> Result<SimSummary, ConfigError> {
        if n == 0 {
            return Err(ConfigError::ZeroSimulations);
        }
        if k == 0 {
            return Err(ConfigError::ZeroWorkers);
        }

        let mut seed_rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };

        let base = n / k as u64;
        let remainder = (n % k as u64) as usize;
        let batches: Vec<(u64, u64)> = (0..k)
            .map(|i| {
                let size = base + u64::from(i < remainder);
                (size, seed_rng.gen::<u64>())
            })
            .collect();

        let summaries: Vec<SimSummary> = batches
            .into_par_iter()
            .map(|(size, batch_seed)| self.batch(size, predictions, threshold, batch_seed))
            .collect();

        let mut total = SimSummary::zeroed(self.teams.len(), predictions.len());
        for summary in &summaries {
            total.merge(summary);
        }
        Ok(total)
    }
}
