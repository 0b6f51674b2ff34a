use thiserror::Error;

/// Input problems rejected before any simulation starts.
///
/// Engine-internal inconsistencies (odd pairing groups, records past the
/// cutoff) are bugs rather than inputs and panic instead; under a parallel
/// run such a panic propagates and fails the whole run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config JSON")]
    Json(#[from] serde_json::Error),

    #[error("no rating systems declared")]
    NoSystems,

    #[error("no sigma value declared for rating system '{system}'")]
    MissingSigma { system: String },

    #[error("sigma declared for unknown rating system '{system}'")]
    UnknownSigma { system: String },

    #[error("sigma at index {index} must be positive, got {value}")]
    NonPositiveSigma { index: usize, value: f64 },

    #[error("team '{team}' has no rating for system '{system}'")]
    MissingRating { team: String, system: String },

    #[error("duplicate team name '{name}'")]
    DuplicateTeam { name: String },

    #[error("duplicate seed {seed} (teams '{first}' and '{second}')")]
    DuplicateSeed { seed: u32, first: String, second: String },

    #[error("seed {seed} for team '{team}' is outside 1..={teams}")]
    SeedOutOfRange { team: String, seed: u32, teams: usize },

    #[error("team count must be even and non-zero, got {count}")]
    UnevenField { count: usize },

    #[error("team '{team}' has {got} ratings, expected {expected}")]
    RatingCountMismatch { team: String, got: usize, expected: usize },

    #[error("simulation count must be positive")]
    ZeroSimulations,

    #[error("worker count must be positive")]
    ZeroWorkers,
}
