use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

use super::TranscriptSegment;

/// Raw Whisper JSON document shape
#[derive(Debug, Deserialize)]
struct WhisperDocument {
    #[serde(default)]
    segments: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    #[serde(default)]
    start: f64,
    #[serde(default)]
    end: f64,
    #[serde(default)]
    text: String,
}

/// Clean raw Whisper text: strip all whitespace and Japanese punctuation
///
/// Applied once at load time so matching never has to re-do it per
/// comparison.
pub fn clean_segment_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '。' | '、' | '？' | '！'))
        .collect()
}

/// Parse segments out of a Whisper JSON string
///
/// Segments with a non-positive span or a negative start are malformed and
/// are dropped with a warning; a bad segment never aborts the load.
pub fn parse_whisper_json(content: &str) -> Result<Vec<TranscriptSegment>> {
    let document: WhisperDocument =
        serde_json::from_str(content).context("malformed Whisper JSON")?;

    let mut segments = Vec::with_capacity(document.segments.len());
    for raw in document.segments {
        if raw.end <= raw.start || raw.start < 0.0 {
            warn!(
                "⚠️ Dropping malformed segment ({:.2}s - {:.2}s)",
                raw.start, raw.end
            );
            continue;
        }
        segments.push(TranscriptSegment::new(
            raw.start,
            raw.end,
            clean_segment_text(&raw.text),
        ));
    }

    Ok(segments)
}

/// Load transcript segments from a Whisper JSON file
pub async fn load_whisper_json<P: AsRef<Path>>(path: P) -> Result<Vec<TranscriptSegment>> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read Whisper JSON: {}", path.display()))?;

    let segments = parse_whisper_json(&content)?;
    info!(
        "🎤 Loaded {} transcript segments from {}",
        segments.len(),
        path.display()
    );
    Ok(segments)
}
