/// Wins required to advance out of the Swiss stage
pub const WINS_TO_ADVANCE: u32 = 3;

/// Losses required for elimination from the Swiss stage
pub const LOSSES_TO_ELIMINATE: u32 = 3;

/// Maps required to take a best-of-3 series
pub const MAPS_TO_WIN_BO3: u32 = 2;

/// Upper bound on rounds before every team is decided
pub const MAX_ROUNDS: u32 = WINS_TO_ADVANCE + LOSSES_TO_ELIMINATE - 1;

/// Entrants in the standard Major Swiss stage
pub const STAGE_TEAM_COUNT: usize = 16;

/// Pick'Em group sizes for a 16-team stage: 3-0 picks, advancing picks, 0-3 picks
pub const PICKEM_GROUP_SIZES: [usize; 3] = [2, 6, 2];

/// Correct assignments (out of 10) for a prediction to count as a success
pub const DEFAULT_SUCCESS_THRESHOLD: u32 = 6;
