use rand::seq::SliceRandom;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::constants::PICKEM_GROUP_SIZES;
use crate::team::{Bucket, Team, TeamId};

/// A Pick'Em-style bracket prediction: two teams to go 3-0, six to advance
/// with losses, two to go 0-3. The remaining teams carry no pick.
///
/// Scoring is per assignment: each picked team landing in its predicted
/// bucket counts one point, out of 10 for the standard group sizes. A 0-3
/// pick scores whenever its team goes out, winless or not, since every
/// three-loss record classifies as 0-3.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prediction {
    groups: [Vec<TeamId>; Bucket::COUNT],
}

impl Prediction {
    /// Build a prediction from explicit bucket groups. Callers keep the
    /// groups disjoint; sizes other than 2/6/2 are allowed for non-standard
    /// fields.
    pub fn new(three_zero: Vec<TeamId>, advance: Vec<TeamId>, zero_three: Vec<TeamId>) -> Self {
        Prediction {
            groups: [three_zero, advance, zero_three],
        }
    }

    /// Teams picked for one bucket.
    pub fn group(&self, bucket: Bucket) -> &[TeamId] {
        &self.groups[bucket.index()]
    }

    /// Total number of team→bucket assignments this prediction makes.
    pub fn picks(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Uniformly random prediction: shuffle the field, deal out the
    /// standard group sizes.
    pub fn random<R: Rng>(team_count: usize, rng: &mut R) -> Self {
        let [n30, nadv, n03] = PICKEM_GROUP_SIZES;
        assert!(
            team_count >= n30 + nadv + n03,
            "field of {} teams is too small for a prediction",
            team_count
        );

        let mut ids: Vec<TeamId> = (0..team_count).collect();
        ids.shuffle(rng);
        Prediction {
            groups: [
                ids[..n30].to_vec(),
                ids[n30..n30 + nadv].to_vec(),
                ids[n30 + nadv..n30 + nadv + n03].to_vec(),
            ],
        }
    }

    /// Count how many of this prediction's assignments match a simulated
    /// outcome (`outcome[id]` is the bucket team `id` finished in, if any).
    pub fn score(&self, outcome: &[Option<Bucket>]) -> u32 {
        let mut correct = 0;
        for (bucket, group) in Bucket::ALL.iter().zip(&self.groups) {
            for &id in group {
                if outcome[id] == Some(*bucket) {
                    correct += 1;
                }
            }
        }
        correct
    }

    /// Derive a neighboring prediction by swapping one picked team with a
    /// team outside its group (picked elsewhere or unpicked). Group sizes
    /// are preserved; a swap with an unpicked team moves the old pick out
    /// of the prediction entirely.
    pub fn mutate<R: Rng>(&self, team_count: usize, rng: &mut R) -> Self {
        // Flatten to picked-teams-then-rest so swaps work on positions.
        let mut flat: Vec<TeamId> = Vec::with_capacity(team_count);
        for group in &self.groups {
            flat.extend_from_slice(group);
        }
        for id in 0..team_count {
            if !flat.contains(&id) {
                flat.push(id);
            }
        }

        let group_idx = rng.gen_range(0..self.groups.len());
        let start: usize = self.groups[..group_idx].iter().map(Vec::len).sum();
        let len = self.groups[group_idx].len();
        let a_pos = start + rng.gen_range(0..len);

        let outside: Vec<usize> = (0..flat.len())
            .filter(|pos| !(start..start + len).contains(pos))
            .collect();
        let b_pos = outside[rng.gen_range(0..outside.len())];
        flat.swap(a_pos, b_pos);

        let mut groups: [Vec<TeamId>; Bucket::COUNT] = Default::default();
        let mut offset = 0;
        for (i, group) in self.groups.iter().enumerate() {
            groups[i] = flat[offset..offset + group.len()].to_vec();
            offset += group.len();
        }
        Prediction { groups }
    }

    /// Content fingerprint, insensitive to ordering within groups. Used to
    /// deduplicate generated candidates and as a short display id.
    pub fn fingerprint(&self, teams: &[Team]) -> String {
        let mut hasher = Sha256::new();
        for group in &self.groups {
            let mut names: Vec<&str> =
                group.iter().map(|&id| teams[id].name.as_str()).collect();
            names.sort_unstable();
            for name in names {
                hasher.update(name.as_bytes());
                hasher.update([0u8]);
            }
            hasher.update([0xffu8]);
        }
        hex::encode(hasher.finalize())
    }
}
