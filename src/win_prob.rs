use crate::team::{Team, TeamId};

/// Calculate the probability of team `a` beating team `b` on one map.
///
/// Each rating source `i` contributes a logistic expectation
/// `1 / (1 + 10^((rb[i] - ra[i]) / (2 * sigma[i])))`. The per-source values
/// are combined by median, so one outlier source cannot drag the estimate.
///
/// # Arguments
/// * `a` - First team
/// * `b` - Second team
/// * `sigma` - Per-source spread values, index-aligned with team ratings
///
/// # Returns
/// Probability of `a` winning a single map (0.0-1.0)
pub fn calculate_win_prob(a: &Team, b: &Team, sigma: &[f64]) -> f64 {
    let mut probs: Vec<f64> = sigma
        .iter()
        .enumerate()
        .map(|(i, &s)| 1.0 / (1.0 + 10f64.powf((b.ratings[i] - a.ratings[i]) / (2.0 * s))))
        .collect();
    median(&mut probs)
}

/// Median of a non-empty slice; averages the two middle values for an even
/// count so symmetry holds for any number of rating sources.
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Precomputed pairwise map-win probabilities.
///
/// `calculate_win_prob` is pure and gets called with the same pairs millions
/// of times per run, so the full matrix is built once before any simulation
/// and shared read-only across workers. The mirrored entry is stored as the
/// exact complement, which makes lookups symmetric to the last bit.
#[derive(Clone, Debug)]
pub struct WinProbTable {
    len: usize,
    probs: Vec<f64>,
}

impl WinProbTable {
    /// Build the table for a team list and sigma vector.
    pub fn new(teams: &[Team], sigma: &[f64]) -> Self {
        let len = teams.len();
        let mut probs = vec![0.5; len * len];
        for a in 0..len {
            for b in (a + 1)..len {
                let p = calculate_win_prob(&teams[a], &teams[b], sigma);
                probs[a * len + b] = p;
                probs[b * len + a] = 1.0 - p;
            }
        }
        WinProbTable { len, probs }
    }

    /// Build a table from an arbitrary probability function.
    ///
    /// Used by deterministic replays, which rig entries to 0 or 1 to force
    /// known results. Callers are responsible for keeping `f` symmetric.
    pub fn from_fn(len: usize, mut f: impl FnMut(TeamId, TeamId) -> f64) -> Self {
        let mut probs = vec![0.5; len * len];
        for a in 0..len {
            for b in 0..len {
                if a != b {
                    probs[a * len + b] = f(a, b);
                }
            }
        }
        WinProbTable { len, probs }
    }

    /// Probability of `a` beating `b` on one map.
    pub fn get(&self, a: TeamId, b: TeamId) -> f64 {
        self.probs[a * self.len + b]
    }

    /// Number of teams covered by the table.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
