use std::cmp::Ordering;

use rand::Rng;

use crate::constants::{LOSSES_TO_ELIMINATE, MAX_ROUNDS, WINS_TO_ADVANCE};
use crate::series::simulate_series;
use crate::team::{Record, Team, TeamId};
use crate::win_prob::WinProbTable;

/// Swiss-stage state machine for a single simulated tournament.
///
/// Owns the per-team records, faced lists, and remaining/finished
/// membership; borrows the team list and probability table, which stay
/// read-only for the whole run. One instance is reused across simulations
/// via [`SwissSystem::reset`] and is never shared between workers.
pub struct SwissSystem<'a> {
    teams: &'a [Team],
    probs: &'a WinProbTable,
    records: Vec<Record>,
    faced: Vec<Vec<TeamId>>,
    remaining: Vec<bool>,
    finished: Vec<bool>,
}

impl<'a> SwissSystem<'a> {
    pub fn new(teams: &'a [Team], probs: &'a WinProbTable) -> Self {
        let n = teams.len();
        SwissSystem {
            teams,
            probs,
            records: vec![Record::default(); n],
            faced: (0..n).map(|_| Vec::with_capacity(MAX_ROUNDS as usize)).collect(),
            remaining: vec![true; n],
            finished: vec![false; n],
        }
    }

    /// Clear all match results in place, keeping allocations for the next
    /// simulation.
    pub fn reset(&mut self) {
        for record in &mut self.records {
            *record = Record::default();
        }
        for faced in &mut self.faced {
            faced.clear();
        }
        self.remaining.fill(true);
        self.finished.fill(false);
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn faced(&self, id: TeamId) -> &[TeamId] {
        &self.faced[id]
    }

    pub fn remaining_count(&self) -> usize {
        self.remaining.iter().filter(|&&r| r).count()
    }

    /// Buchholz-style tiebreak: the summed differentials of every opponent
    /// already faced. Rewards having gone through a harder schedule.
    pub fn buchholz(&self, id: TeamId) -> i32 {
        self.faced[id].iter().map(|&opp| self.records[opp].diff()).sum()
    }

    /// Sort key for pairing: better differential first, then stronger
    /// schedule, then the lower initial seed.
    fn seeding_key(&self, id: TeamId) -> (i32, i32, u32) {
        let record = &self.records[id];
        (-record.diff(), -self.buchholz(id), self.teams[id].seed)
    }

    /// Produce the next round's pairs from the current standings.
    ///
    /// Remaining teams are sorted by seeding key and partitioned by
    /// differential into positive, even, and negative groups, processed in
    /// that order. Within a group the top half meets the bottom half back
    /// to front (best remaining against worst remaining). The pair list is
    /// fixed from round-start state before any match is simulated.
    pub fn next_round_pairs(&self) -> Vec<(TeamId, TeamId)> {
        let mut order: Vec<TeamId> =
            (0..self.teams.len()).filter(|&id| self.remaining[id]).collect();
        order.sort_by_key(|&id| self.seeding_key(id));

        let mut positive = Vec::new();
        let mut even = Vec::new();
        let mut negative = Vec::new();
        for &id in &order {
            match self.records[id].diff().cmp(&0) {
                Ordering::Greater => positive.push(id),
                Ordering::Equal => even.push(id),
                Ordering::Less => negative.push(id),
            }
        }

        // Opening round: the even group is the whole field. Reverse its
        // second half so the draw comes out 1v9, 2v10, .., 8v16 rather than
        // pairing adjacent seeds.
        if even.len() == self.teams.len() {
            let half = even.len() / 2;
            even[half..].reverse();
        }

        let mut pairs = Vec::with_capacity(order.len() / 2);
        for group in [&positive, &even, &negative] {
            assert!(
                group.len() % 2 == 0,
                "Swiss group with odd size {} cannot be paired",
                group.len()
            );
            let half = group.len() / 2;
            for i in 0..half {
                pairs.push((group[i], group[group.len() - 1 - i]));
            }
        }
        pairs
    }

    /// Play one series and apply the result to both teams.
    fn simulate_match<R: Rng>(&mut self, a: TeamId, b: TeamId, rng: &mut R) {
        let (rec_a, rec_b) = (self.records[a], self.records[b]);
        // A series is an elimination or advancement decider for a side one
        // win or one loss from the cutoff; deciders are best-of-3.
        let best_of_3 = rec_a.wins == WINS_TO_ADVANCE - 1
            || rec_a.losses == LOSSES_TO_ELIMINATE - 1
            || rec_b.wins == WINS_TO_ADVANCE - 1
            || rec_b.losses == LOSSES_TO_ELIMINATE - 1;

        let a_takes_series = simulate_series(self.probs.get(a, b), best_of_3, rng);
        let (winner, loser) = if a_takes_series { (a, b) } else { (b, a) };
        self.records[winner].wins += 1;
        self.records[loser].losses += 1;
        // Rematches keep a single faced entry, so an opponent's diff is
        // never counted twice in the Buchholz sum.
        if !self.faced[a].contains(&b) {
            self.faced[a].push(b);
            self.faced[b].push(a);
        }

        assert!(
            self.records[winner].wins <= WINS_TO_ADVANCE
                && self.records[loser].losses <= LOSSES_TO_ELIMINATE,
            "record advanced past the Swiss cutoff"
        );

        for id in [a, b] {
            if self.records[id].decided() {
                self.retire(id);
            }
        }
    }

    fn retire(&mut self, id: TeamId) {
        assert!(
            self.remaining[id] && !self.finished[id],
            "team {} retired twice",
            id
        );
        self.remaining[id] = false;
        self.finished[id] = true;
    }

    /// Pair and play a full round.
    pub fn simulate_round<R: Rng>(&mut self, rng: &mut R) {
        for (a, b) in self.next_round_pairs() {
            self.simulate_match(a, b, rng);
        }
    }

    /// Play rounds until every team has advanced or been eliminated.
    /// Returns the number of rounds played.
    pub fn simulate_tournament<R: Rng>(&mut self, rng: &mut R) -> u32 {
        let mut rounds = 0;
        while self.remaining_count() > 0 {
            rounds += 1;
            assert!(
                rounds <= MAX_ROUNDS,
                "Swiss stage still unresolved after {} rounds",
                MAX_ROUNDS
            );
            self.simulate_round(rng);
        }
        rounds
    }
}
