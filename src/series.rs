use rand::Rng;

use crate::constants::MAPS_TO_WIN_BO3;

/// Simulate one map given the probability of team A winning it.
///
/// The inequality is strict: a draw landing exactly on `p` counts as a loss
/// for A.
pub fn simulate_map<R: Rng>(p: f64, rng: &mut R) -> bool {
    p > rng.gen::<f64>()
}

/// Simulate a series, returning true if team A takes it.
///
/// Best-of-1 is a single map draw. Best-of-3 is sudden death: maps are
/// drawn only until one side reaches 2 wins, so a 2-0 series never plays a
/// dead third map.
pub fn simulate_series<R: Rng>(p: f64, best_of_3: bool, rng: &mut R) -> bool {
    if !best_of_3 {
        return simulate_map(p, rng);
    }

    let mut a_maps = 0;
    let mut b_maps = 0;
    while a_maps < MAPS_TO_WIN_BO3 && b_maps < MAPS_TO_WIN_BO3 {
        if simulate_map(p, rng) {
            a_maps += 1;
        } else {
            b_maps += 1;
        }
    }
    a_maps > b_maps
}
