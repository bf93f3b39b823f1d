//! Q&A-to-transcript temporal alignment engine
//!
//! Takes an ordered list of Q&A records (order is the chronology proxy) and
//! a pool of time-stamped transcript segments, and assigns a time interval
//! to every record: a real segment when text similarity is confident
//! enough, a synthetic non-overlapping slot otherwise. The core is pure and
//! synchronous; all I/O lives in the surrounding loader modules.

pub mod allocator;
pub mod audit;
pub mod matcher;
pub mod normalize;
pub mod similarity;
pub mod temporal;

pub use allocator::{allocate_gap, AllocatedInterval, TimeSlot};
pub use audit::{consistency_ratio, count_order_violations, MatchReport};
pub use matcher::{MatchResult, QaMatcher};
pub use normalize::TextNormalizer;
pub use similarity::{sequence_ratio, RecordVariants, TextScorer};
pub use temporal::{temporal_bonus, TemporalTiers, NO_PRIOR_MATCH};

use serde::{Deserialize, Serialize};

/// Which text variant produced the accepted score, or `Estimated` for
/// records resolved by the gap-filling allocator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Qtext,
    Text,
    Combined,
    Query,
    Estimated,
}

impl MatchKind {
    /// Whether this kind represents a real transcript match
    pub fn is_matched(&self) -> bool {
        !matches!(self, MatchKind::Estimated)
    }

    /// Timing source label for reports and plan files
    pub fn timing_source(&self) -> &'static str {
        if self.is_matched() {
            "whisper"
        } else {
            "estimated"
        }
    }
}
