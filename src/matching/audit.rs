use serde::{Deserialize, Serialize};
use tracing::info;

use super::matcher::MatchResult;

/// Count adjacent pairs of real matches whose segment start times go
/// backwards in output order
///
/// Estimated results are skipped entirely: the pairs are formed over the
/// subsequence of results that claimed a real segment. Purely an
/// observability tool; the matcher never consults it.
pub fn count_order_violations(results: &[MatchResult]) -> usize {
    let starts: Vec<f64> = results
        .iter()
        .filter(|r| r.is_matched())
        .map(|r| r.start_time())
        .collect();

    starts
        .windows(2)
        .filter(|pair| pair[1] < pair[0])
        .count()
}

/// Share of adjacent matched pairs in chronological order, in [0,1]
pub fn consistency_ratio(results: &[MatchResult]) -> f64 {
    let matched = results.iter().filter(|r| r.is_matched()).count();
    let violations = count_order_violations(results);
    1.0 - violations as f64 / (matched.saturating_sub(1)).max(1) as f64
}

/// Quality summary of one matching run, for logs, plan files and
/// comparing matcher configurations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub total_records: usize,
    pub matched: usize,
    pub estimated: usize,
    pub match_rate: f64,
    pub average_confidence: f64,
    pub average_text_score: f64,
    pub average_temporal_bonus: f64,
    pub order_violations: usize,
    pub consistency_ratio: f64,
}

impl MatchReport {
    pub fn from_results(results: &[MatchResult]) -> Self {
        let total = results.len();
        let matched: Vec<&MatchResult> = results.iter().filter(|r| r.is_matched()).collect();
        let matched_count = matched.len();

        let mean = |extract: fn(&MatchResult) -> f64| -> f64 {
            if matched.is_empty() {
                0.0
            } else {
                matched.iter().map(|r| extract(r)).sum::<f64>() / matched_count as f64
            }
        };

        Self {
            total_records: total,
            matched: matched_count,
            estimated: total - matched_count,
            match_rate: if total == 0 {
                0.0
            } else {
                matched_count as f64 / total as f64
            },
            average_confidence: mean(|r| r.confidence),
            average_text_score: mean(|r| r.text_score),
            average_temporal_bonus: mean(|r| r.temporal_bonus),
            order_violations: count_order_violations(results),
            consistency_ratio: consistency_ratio(results),
        }
    }

    /// Log a one-run summary at info level
    pub fn log_summary(&self) {
        info!(
            "📊 Match report: {}/{} matched ({:.1}%), avg confidence {:.3}",
            self.matched,
            self.total_records,
            self.match_rate * 100.0,
            self.average_confidence
        );
        info!(
            "📈 Order consistency: {:.1}% ({} violations)",
            self.consistency_ratio * 100.0,
            self.order_violations
        );
    }
}
