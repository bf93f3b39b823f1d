use std::collections::HashMap;

use super::normalize::TextNormalizer;
use super::MatchKind;
use crate::config::MatchingConfig;
use crate::qa::QaRecord;

/// Ratcliff/Obershelp sequence ratio between two strings
///
/// Computes `2.0 * M / T` where `M` is the total size of all matching
/// blocks (found by recursively taking the longest common substring) and
/// `T` is the combined length of both inputs. Equivalent to the classic
/// SequenceMatcher ratio. Character based, so multi-byte scripts are
/// handled correctly.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let total = a_chars.len() + b_chars.len();
    if total == 0 {
        return 1.0;
    }

    let mut b_index: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b_chars.iter().enumerate() {
        b_index.entry(c).or_default().push(j);
    }

    let mut matched = 0usize;
    let mut pending = vec![(0, a_chars.len(), 0, b_chars.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let (i, j, size) = longest_match(&a_chars, &b_index, a_lo, a_hi, b_lo, b_hi);
        if size == 0 {
            continue;
        }
        matched += size;
        if a_lo < i && b_lo < j {
            pending.push((a_lo, i, b_lo, j));
        }
        if i + size < a_hi && j + size < b_hi {
            pending.push((i + size, a_hi, j + size, b_hi));
        }
    }

    2.0 * matched as f64 / total as f64
}

/// Longest common block of `a[a_lo..a_hi]` and `b[b_lo..b_hi]`
///
/// Returns `(a_start, b_start, size)`. Uses the standard dynamic scan where
/// `j2len[j]` holds the length of the longest match ending at `b[j]`.
fn longest_match(
    a: &[char],
    b_index: &HashMap<char, Vec<usize>>,
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let mut best = (a_lo, b_lo, 0usize);
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, &c) in a.iter().enumerate().take(a_hi).skip(a_lo) {
        let mut next_j2len: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b_index.get(&c) {
            for &j in positions {
                if j < b_lo {
                    continue;
                }
                if j >= b_hi {
                    break;
                }
                let len = if j > b_lo {
                    j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
                } else {
                    1
                };
                next_j2len.insert(j, len);
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        j2len = next_j2len;
    }

    best
}

/// Normalized text variants of a Q&A record, prepared once per record and
/// reused across the whole segment sweep
#[derive(Debug, Clone)]
pub struct RecordVariants {
    pub qtext: String,
    pub text: String,
    pub combined: String,
    pub query: String,
}

/// Bounded [0,1] text similarity scorer
///
/// Combines the sequence ratio with a keyword-overlap bonus, with two cheap
/// rejection guards for the large-pool scan: a length-ratio cutoff and a
/// base-similarity floor below which the bonus is skipped.
#[derive(Debug, Clone)]
pub struct TextScorer {
    normalizer: TextNormalizer,
    min_length_ratio: f64,
    base_similarity_floor: f64,
    keyword_bonus_weight: f64,
}

impl TextScorer {
    pub fn new(config: &MatchingConfig) -> Self {
        Self {
            normalizer: TextNormalizer::with_keyword_min_run(config.keyword_min_run),
            min_length_ratio: config.min_length_ratio,
            base_similarity_floor: config.base_similarity_floor,
            keyword_bonus_weight: config.keyword_bonus_weight,
        }
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    /// Similarity between two already-normalized strings, in [0,1]
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let len_a = a.chars().count();
        let len_b = b.chars().count();
        let length_ratio = len_a.min(len_b) as f64 / len_a.max(len_b) as f64;
        if length_ratio < self.min_length_ratio {
            return 0.0;
        }

        let base = sequence_ratio(a, b);
        if base < self.base_similarity_floor {
            return base;
        }

        (base + self.keyword_bonus(a, b)).min(1.0)
    }

    /// Jaccard-weighted bonus over shared keyword runs
    fn keyword_bonus(&self, a: &str, b: &str) -> f64 {
        let keywords_a = self.normalizer.keywords(a);
        let keywords_b = self.normalizer.keywords(b);

        if keywords_a.is_empty() || keywords_b.is_empty() {
            return 0.0;
        }

        let intersection = keywords_a.intersection(&keywords_b).count();
        let union = keywords_a.union(&keywords_b).count();

        self.keyword_bonus_weight * intersection as f64 / union as f64
    }

    /// Normalize the four text variants of a record
    pub fn prepare(&self, qa: &QaRecord) -> RecordVariants {
        RecordVariants {
            qtext: self.normalizer.normalize(&qa.qtext),
            text: self.normalizer.normalize(&qa.text),
            combined: self.normalizer.normalize(&qa.combined_text),
            query: self.normalizer.normalize(&qa.query),
        }
    }

    /// Score a segment against all four variants and return the best score
    /// together with the variant that produced it. Ties resolve to the
    /// earlier variant in qtext, text, combined, query order.
    pub fn best_variant(&self, variants: &RecordVariants, segment_norm: &str) -> (f64, MatchKind) {
        let scored = [
            (self.similarity(&variants.qtext, segment_norm), MatchKind::Qtext),
            (self.similarity(&variants.text, segment_norm), MatchKind::Text),
            (
                self.similarity(&variants.combined, segment_norm),
                MatchKind::Combined,
            ),
            (self.similarity(&variants.query, segment_norm), MatchKind::Query),
        ];

        let mut best = scored[0];
        for candidate in &scored[1..] {
            if candidate.0 > best.0 {
                best = *candidate;
            }
        }
        best
    }
}
