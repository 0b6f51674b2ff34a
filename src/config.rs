use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::team::Team;

/// Closed set of shaping transforms selectable from configuration.
///
/// Raw ratings are shaped exactly once, at load time. Configuration can
/// only name a member of this set; it never supplies code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingTransform {
    /// Use the raw value unchanged
    Identity,
    /// `sqrt(x) * 10`, compressing long-tailed rating scales
    SqrtScale,
}

impl RatingTransform {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            RatingTransform::Identity => value,
            RatingTransform::SqrtScale => value.sqrt() * 10.0,
        }
    }
}

/// On-disk run configuration: per-system sigma and transform, plus the
/// team field with raw ratings.
///
/// Rating systems are keyed by name and ordered alphabetically; the sigma
/// vector and every team's rating vector follow that order.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub sigma: BTreeMap<String, f64>,
    pub systems: BTreeMap<String, RatingTransform>,
    pub teams: Vec<TeamEntry>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TeamEntry {
    pub name: String,
    pub seed: u32,
    pub ratings: BTreeMap<String, f64>,
}

impl Config {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Check cross-references and build the core inputs: the sigma vector
    /// and the team list with transforms applied, teams ordered by seed.
    ///
    /// Pure parse-and-shape; runs no simulation.
    pub fn build(&self) -> Result<(Vec<f64>, Vec<Team>), ConfigError> {
        if self.systems.is_empty() {
            return Err(ConfigError::NoSystems);
        }
        for system in self.sigma.keys() {
            if !self.systems.contains_key(system) {
                return Err(ConfigError::UnknownSigma {
                    system: system.clone(),
                });
            }
        }

        let mut sigma = Vec::with_capacity(self.systems.len());
        for system in self.systems.keys() {
            let value = self
                .sigma
                .get(system)
                .copied()
                .ok_or_else(|| ConfigError::MissingSigma {
                    system: system.clone(),
                })?;
            sigma.push(value);
        }

        let mut teams = Vec::with_capacity(self.teams.len());
        for entry in &self.teams {
            let mut ratings = Vec::with_capacity(self.systems.len());
            for (system, transform) in &self.systems {
                let raw = entry
                    .ratings
                    .get(system)
                    .copied()
                    .ok_or_else(|| ConfigError::MissingRating {
                        team: entry.name.clone(),
                        system: system.clone(),
                    })?;
                ratings.push(transform.apply(raw));
            }
            teams.push(Team::new(entry.name.clone(), entry.seed, ratings));
        }
        teams.sort_by_key(|team| team.seed);

        Ok((sigma, teams))
    }
}
