//! Q&A records parsed from the studio results CSV export
//!
//! Records carry only free text and their creation order; the order (by
//! `created_at`) is the chronology proxy the matcher relies on and is fixed
//! once at load time.

pub mod csv;

pub use self::csv::{load_qa_csv, parse_answer_field, parse_qa_csv};

use serde::{Deserialize, Serialize};

/// One question/answer unit, immutable after parsing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaRecord {
    /// Opaque unique identifier from the source table
    pub id: String,
    /// The original user query
    pub query: String,
    /// Creation timestamp string used for the one-time ordering sort
    pub created_at: String,
    /// Extracted question text from the answer payload
    pub qtext: String,
    /// Extracted answer text from the answer payload
    pub text: String,
    /// Concatenation of qtext and text, precomputed for matching
    pub combined_text: String,
}

/// Phrases that mark an answer as a refusal rather than real content
const INVALID_ANSWER_PATTERNS: &[&str] = &[
    "回答できません",
    "答えられません",
    "お答えできません",
    "分かりません",
    "わかりません",
    "不明です",
    "すみません",
    "申し訳ありません",
];

/// Minimum length (chars) of qtext or text for a record to be usable
const MIN_ANSWER_CHARS: usize = 5;

/// Whether an extracted answer is usable for matching
///
/// Rejects refusal answers and records where both text fields are too short
/// to carry any signal.
pub fn is_valid_answer(qtext: &str, text: &str) -> bool {
    let qtext = qtext.trim();
    let text = text.trim();

    let combined = format!("{} {}", qtext, text).to_lowercase();
    if INVALID_ANSWER_PATTERNS
        .iter()
        .any(|pattern| combined.contains(pattern))
    {
        return false;
    }

    qtext.chars().count() >= MIN_ANSWER_CHARS || text.chars().count() >= MIN_ANSWER_CHARS
}
