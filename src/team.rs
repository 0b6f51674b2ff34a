use std::fmt;

use crate::constants::{LOSSES_TO_ELIMINATE, WINS_TO_ADVANCE};

/// Dense index of a team within the stage's team list.
pub type TeamId = usize;

/// Tournament entrant with initial seed and per-source ratings.
///
/// Ratings are stored already shaped (the configured transform is applied
/// once at load time) and are index-aligned with the sigma vector.
#[derive(Clone, Debug)]
pub struct Team {
    pub name: String,

    /// Initial seed, 1..=N, lower is stronger
    pub seed: u32,

    /// One shaped rating value per rating source
    pub ratings: Vec<f64>,
}

impl Team {
    pub fn new(name: String, seed: u32, ratings: Vec<f64>) -> Self {
        Team { name, seed, ratings }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (seed {})", self.name, self.seed)
    }
}

/// Win/loss record of one team within one simulated tournament.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
}

impl Record {
    /// Win/loss differential used for grouping and the Buchholz tiebreak.
    pub fn diff(&self) -> i32 {
        self.wins as i32 - self.losses as i32
    }

    /// True once the team has advanced or been eliminated.
    pub fn decided(&self) -> bool {
        self.wins == WINS_TO_ADVANCE || self.losses == LOSSES_TO_ELIMINATE
    }

    /// Terminal outcome bucket for a final record, `None` while undecided.
    ///
    /// The `0-3` bucket takes every three-loss record, winless or not,
    /// so the buckets partition a finished field.
    pub fn bucket(&self) -> Option<Bucket> {
        if self.wins == WINS_TO_ADVANCE {
            if self.losses == 0 {
                Some(Bucket::ThreeZero)
            } else {
                Some(Bucket::Advance)
            }
        } else if self.losses == LOSSES_TO_ELIMINATE {
            Some(Bucket::ZeroThree)
        } else {
            None
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.wins, self.losses)
    }
}

/// Terminal outcome classification used for tallies and Pick'Em scoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bucket {
    /// Advanced without dropping a series
    ThreeZero,
    /// Advanced after one or two lost series
    Advance,
    /// Eliminated at three losses
    ZeroThree,
}

impl Bucket {
    pub const COUNT: usize = 3;

    pub const ALL: [Bucket; Bucket::COUNT] = [Bucket::ThreeZero, Bucket::Advance, Bucket::ZeroThree];

    /// Position in tally arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Bucket::ThreeZero => "3-0",
            Bucket::Advance => "3-1 or 3-2",
            Bucket::ZeroThree => "0-3",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
