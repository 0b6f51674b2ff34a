//! Swiss Sim - Monte Carlo outcome estimation for the CS Major Swiss stage.
//!
//! Simulates the 16-team Swiss format (best-of-1 rounds, best-of-3
//! deciders, advance at 3 wins, out at 3 losses) under a rating-based map
//! win-probability model, aggregates per-team outcome buckets over many
//! parallel simulations, and scores Pick'Em-style bracket predictions
//! against the simulated outcomes.

pub mod config;
pub mod constants;
pub mod error;
pub mod predictions;
pub mod report;
pub mod series;
pub mod simulation;
pub mod team;
pub mod tournament;
pub mod win_prob;

pub use config::{Config, RatingTransform};
pub use error::ConfigError;
pub use predictions::Prediction;
pub use simulation::{BucketCounts, SimSummary, Simulation};
pub use team::{Bucket, Record, Team, TeamId};
pub use tournament::SwissSystem;
pub use win_prob::{calculate_win_prob, WinProbTable};
