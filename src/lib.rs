/// Q&A Video Splitter - Rust Implementation
///
/// Aligns question/answer records with Whisper transcript segments and
/// plans per-question video cuts. The alignment engine is pure and
/// deterministic; parsing, planning and file output live in thin modules
/// around it.

pub mod config;
pub mod matching;
pub mod qa;
pub mod splitter;
pub mod transcript;

// Re-export main types for easy access
pub use crate::config::{Config, ConfigBuilder, MatchingConfig};
pub use crate::matching::{
    consistency_ratio, count_order_violations, MatchKind, MatchReport, MatchResult, QaMatcher,
    TemporalTiers,
};
pub use crate::qa::{load_qa_csv, QaRecord};
pub use crate::splitter::{write_plan, CutPlan, CutPlanner};
pub use crate::transcript::{load_whisper_json, TranscriptSegment};
