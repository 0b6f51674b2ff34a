use std::time::Duration;

use crate::predictions::Prediction;
use crate::simulation::SimSummary;
use crate::team::{Bucket, Team};

/// Render the ranked per-bucket tables with percentages and the run time.
pub fn render_results(teams: &[Team], summary: &SimSummary, run_time: Duration) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "RESULTS FROM {} TOURNAMENT SIMULATIONS\n",
        group_digits(summary.simulations)
    ));

    for bucket in Bucket::ALL {
        out.push_str(&format!("\nMost likely to {}:\n", bucket));

        let mut ranked: Vec<usize> = (0..teams.len()).collect();
        ranked.sort_by(|&a, &b| {
            summary.bucket_counts[b][bucket.index()].cmp(&summary.bucket_counts[a][bucket.index()])
        });

        for (rank, &id) in ranked.iter().enumerate() {
            out.push_str(&format!(
                "{:<3} {:<15} {:>5.1}%\n",
                format!("{}.", rank + 1),
                teams[id].name,
                summary.bucket_percentage(id, bucket)
            ));
        }
    }

    out.push_str(&format!("\nRun time: {:.2} seconds\n", run_time.as_secs_f64()));
    out
}

/// Render one prediction with its success rate and short fingerprint.
pub fn render_prediction(teams: &[Team], prediction: &Prediction, success_pct: f64) -> String {
    let mut out = String::new();
    out.push_str(&format!("Percent of success: {:.2}%\n", success_pct));
    out.push_str(&format!("[{}]\n", &prediction.fingerprint(teams)[..8]));

    for bucket in Bucket::ALL {
        let names: Vec<&str> = prediction
            .group(bucket)
            .iter()
            .map(|&id| teams[id].name.as_str())
            .collect();
        out.push_str(&format!("'{}': {}\n", bucket, names.join(", ")));
    }
    out
}

/// Format an integer with thousands separators.
fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
