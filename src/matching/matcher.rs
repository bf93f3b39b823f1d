use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

use super::allocator::{allocate_gap, AllocatedInterval, TimeSlot};
use super::similarity::TextScorer;
use super::temporal::{temporal_bonus, NO_PRIOR_MATCH};
use super::MatchKind;
use crate::config::MatchingConfig;
use crate::qa::QaRecord;
use crate::transcript::TranscriptSegment;

/// One output unit per input record, in input order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    /// The Q&A record this result belongs to
    pub qa: QaRecord,
    /// Index of the claimed segment in the input segment list
    pub segment_index: Option<usize>,
    /// The claimed transcript segment, if any
    pub segment: Option<TranscriptSegment>,
    /// Synthetic timing when no segment was claimed
    pub estimated: Option<TimeSlot>,
    /// Combined score of the accepted match in [0, 1], 0.0 for estimated
    /// results
    pub confidence: f64,
    /// Winning text variant, or `Estimated`
    pub kind: MatchKind,
    /// Text similarity component of the score
    pub text_score: f64,
    /// Temporal bonus component of the score
    pub temporal_bonus: f64,
}

impl MatchResult {
    pub fn is_matched(&self) -> bool {
        self.segment.is_some()
    }

    pub fn start_time(&self) -> f64 {
        match (&self.segment, &self.estimated) {
            (Some(segment), _) => segment.start,
            (None, Some(slot)) => slot.start,
            (None, None) => 0.0,
        }
    }

    pub fn end_time(&self) -> f64 {
        match (&self.segment, &self.estimated) {
            (Some(segment), _) => segment.end,
            (None, Some(slot)) => slot.end,
            (None, None) => 0.0,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end_time() - self.start_time()
    }
}

struct Candidate {
    index: usize,
    text_score: f64,
    temporal_bonus: f64,
    total_score: f64,
    kind: MatchKind,
}

/// Greedy sequential matcher
///
/// Walks the records in input order and claims, for each one, the best
/// still-unused segment by combined text and temporal score. Records
/// without a confident candidate get a synthetic slot from the gap-filling
/// allocator. Every record yields exactly one result and no segment is
/// claimed twice.
#[derive(Debug, Clone)]
pub struct QaMatcher {
    config: MatchingConfig,
    scorer: TextScorer,
}

impl QaMatcher {
    pub fn new(config: MatchingConfig) -> Self {
        let scorer = TextScorer::new(&config);
        Self { config, scorer }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Match every record against the segment pool
    ///
    /// Segments are scanned in the order given; that order decides which
    /// candidate wins when several clear the early-exit threshold, so
    /// callers must not re-sort the pool. The records themselves are never
    /// permuted either: their input order is the chronology proxy.
    pub fn match_records(
        &self,
        records: &[QaRecord],
        segments: &[TranscriptSegment],
    ) -> Vec<MatchResult> {
        let timeline_length = self.timeline_length(segments);
        info!(
            "🔗 Matching {} Q&A records against {} segments (timeline {:.1}s, temporal: {})",
            records.len(),
            segments.len(),
            timeline_length,
            self.config.enable_temporal
        );

        // Segment text is normalized once per run; record variants once per
        // record. Nothing is cached beyond this pass.
        let segment_norms: Vec<String> = segments
            .iter()
            .map(|s| self.scorer.normalizer().normalize(&s.text))
            .collect();

        let mut used_segments: HashSet<usize> = HashSet::new();
        let mut allocated: Vec<AllocatedInterval> = Vec::new();
        let mut last_matched_start = NO_PRIOR_MATCH;
        let mut results = Vec::with_capacity(records.len());

        for qa in records {
            let best = self.find_best_candidate(
                qa,
                segments,
                &segment_norms,
                &used_segments,
                last_matched_start,
            );

            match best {
                Some(candidate) if candidate.total_score >= self.config.confidence_threshold => {
                    let segment = &segments[candidate.index];
                    used_segments.insert(candidate.index);
                    last_matched_start = segment.start;

                    let buffer = self.config.match_buffer_seconds;
                    self.claim_interval(
                        &mut allocated,
                        AllocatedInterval::new(
                            (segment.start - buffer).max(0.0),
                            (segment.end + buffer).min(timeline_length),
                        ),
                    );

                    debug!(
                        "✅ {} matched segment {} at {:.1}s ({:?}, score {:.3})",
                        qa.id, candidate.index, segment.start, candidate.kind, candidate.total_score
                    );

                    results.push(MatchResult {
                        qa: qa.clone(),
                        segment_index: Some(candidate.index),
                        segment: Some(segment.clone()),
                        estimated: None,
                        confidence: candidate.total_score,
                        kind: candidate.kind,
                        text_score: candidate.text_score,
                        temporal_bonus: candidate.temporal_bonus,
                    });
                }
                _ => {
                    let slot = allocate_gap(
                        &allocated,
                        self.config.estimated_duration_seconds,
                        timeline_length,
                        self.config.min_slot_seconds,
                    );
                    self.claim_interval(
                        &mut allocated,
                        AllocatedInterval::new(slot.start, slot.end),
                    );

                    debug!(
                        "🕳️ {} estimated at {:.1}s-{:.1}s (no confident match)",
                        qa.id, slot.start, slot.end
                    );

                    results.push(MatchResult {
                        qa: qa.clone(),
                        segment_index: None,
                        segment: None,
                        estimated: Some(slot),
                        confidence: 0.0,
                        kind: MatchKind::Estimated,
                        text_score: 0.0,
                        temporal_bonus: 0.0,
                    });
                }
            }
        }

        let matched = results.iter().filter(|r| r.is_matched()).count();
        info!(
            "🎯 Matched {}/{} records ({:.1}%)",
            matched,
            results.len(),
            if results.is_empty() {
                0.0
            } else {
                matched as f64 / results.len() as f64 * 100.0
            }
        );

        results
    }

    /// Scan the unused segment pool for the best candidate
    ///
    /// A text score above the early-exit threshold wins immediately, so of
    /// several such candidates the first one in segment order is kept even
    /// if a later one would score higher.
    fn find_best_candidate(
        &self,
        qa: &QaRecord,
        segments: &[TranscriptSegment],
        segment_norms: &[String],
        used_segments: &HashSet<usize>,
        last_matched_start: f64,
    ) -> Option<Candidate> {
        let variants = self.scorer.prepare(qa);
        let mut best: Option<Candidate> = None;

        for (index, segment) in segments.iter().enumerate() {
            if used_segments.contains(&index) {
                continue;
            }

            let (text_score, kind) = self.scorer.best_variant(&variants, &segment_norms[index]);

            let bonus = if self.config.enable_temporal {
                temporal_bonus(segment.start, last_matched_start, &self.config.temporal_tiers)
            } else {
                0.0
            };
            // Bounded to [0,1] like the text score itself
            let total_score = (text_score + self.config.temporal_weight * bonus).min(1.0);

            let candidate = Candidate {
                index,
                text_score,
                temporal_bonus: bonus,
                total_score,
                kind,
            };

            if text_score > self.config.early_exit_threshold {
                return Some(candidate);
            }

            if best.as_ref().map_or(true, |b| total_score > b.total_score) {
                best = Some(candidate);
            }
        }

        best
    }

    /// Insert an interval keeping the allocation list sorted by start
    fn claim_interval(&self, allocated: &mut Vec<AllocatedInterval>, interval: AllocatedInterval) {
        let position = allocated.partition_point(|existing| existing.start < interval.start);
        allocated.insert(position, interval);
    }

    fn timeline_length(&self, segments: &[TranscriptSegment]) -> f64 {
        self.config.timeline_length.unwrap_or_else(|| {
            segments
                .iter()
                .map(|s| s.end)
                .fold(0.0f64, |acc, end| acc.max(end))
        })
    }
}
