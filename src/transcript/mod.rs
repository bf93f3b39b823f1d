//! Time-stamped speech recognition segments
//!
//! Segments come from a Whisper JSON dump, get their text cleaned once at
//! load time and are immutable afterwards. The matcher treats segment
//! identity by position in the loaded list, so the load order is preserved.

pub mod whisper;

pub use whisper::{clean_segment_text, load_whisper_json, parse_whisper_json};

use serde::{Deserialize, Serialize};

/// One span of recognized speech
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds, always greater than start
    pub end: f64,
    /// Cleaned transcript text
    pub text: String,
    /// Span length in seconds
    pub duration: f64,
}

impl TranscriptSegment {
    pub fn new(start: f64, end: f64, text: String) -> Self {
        Self {
            start,
            end,
            text,
            duration: end - start,
        }
    }
}

/// Merge consecutive short segments into groups of at most `max_duration`
/// seconds
///
/// Useful when Whisper produces very fine-grained segments; grouped spans
/// keep the first start, the last end and the concatenated text.
pub fn merge_segments_by_duration(
    segments: &[TranscriptSegment],
    max_duration: f64,
) -> Vec<TranscriptSegment> {
    let mut merged = Vec::new();
    let mut group: Vec<&TranscriptSegment> = Vec::new();
    let mut group_duration = 0.0;

    for segment in segments {
        if group_duration + segment.duration <= max_duration {
            group.push(segment);
            group_duration += segment.duration;
        } else {
            if let Some(combined) = merge_group(&group) {
                merged.push(combined);
            }
            group_duration = segment.duration;
            group = vec![segment];
        }
    }

    if let Some(combined) = merge_group(&group) {
        merged.push(combined);
    }

    merged
}

fn merge_group(group: &[&TranscriptSegment]) -> Option<TranscriptSegment> {
    let first = group.first()?;
    let last = group.last()?;
    let text: String = group.iter().map(|s| s.text.as_str()).collect();
    Some(TranscriptSegment::new(first.start, last.end, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: f64, end: f64, text: &str) -> TranscriptSegment {
        TranscriptSegment::new(start, end, text.to_string())
    }

    #[test]
    fn test_merge_groups_up_to_max_duration() {
        let segments = vec![
            segment(0.0, 50.0, "一"),
            segment(50.0, 100.0, "二"),
            segment(100.0, 150.0, "三"),
        ];
        let merged = merge_segments_by_duration(&segments, 120.0);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].start, 0.0);
        assert_eq!(merged[0].end, 100.0);
        assert_eq!(merged[0].text, "一二");
        assert_eq!(merged[1].text, "三");
    }

    #[test]
    fn test_merge_empty_input() {
        assert!(merge_segments_by_duration(&[], 120.0).is_empty());
    }

    #[test]
    fn test_merge_single_long_segment_kept() {
        let segments = vec![segment(0.0, 300.0, "長い")];
        let merged = merge_segments_by_duration(&segments, 120.0);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].duration, 300.0);
    }
}
