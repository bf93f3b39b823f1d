use anyhow::{Context, Result};
use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::SplitterConfig;
use crate::matching::{MatchReport, MatchResult};

/// One cut instruction for the downstream video encoder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutSegment {
    pub start_time: f64,
    pub end_time: f64,
    pub content: String,
    pub purpose: String,
    pub editing_notes: String,
}

/// One planned output clip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutPlanEntry {
    pub index: usize,
    pub segment_id: String,
    pub output_filename: String,
    pub query: String,
    pub cut: CutSegment,
    pub duration: f64,
    pub confidence: f64,
    pub timing_source: String,
}

/// Full cut plan for one source video, serialized to JSON for the encoder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutPlan {
    pub generated_at: String,
    pub entries: Vec<CutPlanEntry>,
    pub report: Option<MatchReport>,
}

/// Turns match results into an ordered cut plan
///
/// Video encoding itself is an external collaborator; this planner only
/// decides where every clip starts and ends and how its file is named.
#[derive(Debug, Clone)]
pub struct CutPlanner {
    config: SplitterConfig,
    slug_strip: Regex,
    slug_dashes: Regex,
}

impl CutPlanner {
    pub fn new(config: SplitterConfig) -> Self {
        let slug_strip = Regex::new(r"[^\w\s-]").unwrap();
        let slug_dashes = Regex::new(r"[-\s]+").unwrap();
        Self {
            config,
            slug_strip,
            slug_dashes,
        }
    }

    /// Build a plan from match results, one entry per result in order
    pub fn build_plan(&self, results: &[MatchResult], report: Option<MatchReport>) -> CutPlan {
        let entries = results
            .iter()
            .enumerate()
            .map(|(i, result)| self.build_entry(result, i + 1))
            .collect();

        CutPlan {
            generated_at: Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            entries,
            report,
        }
    }

    fn build_entry(&self, result: &MatchResult, index: usize) -> CutPlanEntry {
        let qa = &result.qa;
        let start_time = result.start_time();
        let end_time = result.end_time();
        let timing_source = result.kind.timing_source().to_string();

        let content_preview: String = qa
            .query
            .chars()
            .take(self.config.content_preview_chars)
            .collect();
        let qtext_preview: String = qa.qtext.chars().take(50).collect();

        let cut = CutSegment {
            start_time,
            end_time,
            content: format!("Q: {}...", content_preview),
            purpose: format!("Q&A #{}", index),
            editing_notes: format!(
                "質問: {}... | 信頼度: {:.2} | ソース: {}",
                qtext_preview, result.confidence, timing_source
            ),
        };

        CutPlanEntry {
            index,
            segment_id: qa.id.clone(),
            output_filename: self.safe_filename(&qa.query, &qa.id, index),
            query: qa.query.clone(),
            cut,
            duration: end_time - start_time,
            confidence: result.confidence,
            timing_source,
        }
    }

    /// Filesystem-safe output name: `qa_{index:04}_{id8}_{slug}.{format}`
    fn safe_filename(&self, query: &str, id: &str, index: usize) -> String {
        let truncated: String = query.chars().take(self.config.slug_max_chars).collect();
        let stripped = self.slug_strip.replace_all(&truncated, "");
        let slug = self
            .slug_dashes
            .replace_all(&stripped, "-")
            .trim_matches('-')
            .to_string();
        let short_id: String = id.chars().take(8).collect();

        format!(
            "qa_{:04}_{}_{}.{}",
            index, short_id, slug, self.config.video_format
        )
    }
}

/// Write a cut plan as pretty JSON into the output directory
///
/// Returns the path of the written plan file.
pub async fn write_plan(plan: &CutPlan, output_dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let filename = format!("cut_plan_{}.json", Utc::now().format("%Y%m%d_%H%M%S"));
    let path = output_dir.join(filename);
    let json = serde_json::to_string_pretty(plan)?;
    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("failed to write plan: {}", path.display()))?;

    info!("💾 Cut plan with {} entries written to {}", plan.entries.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::{MatchKind, TimeSlot};
    use crate::qa::QaRecord;
    use crate::transcript::TranscriptSegment;

    fn planner() -> CutPlanner {
        CutPlanner::new(SplitterConfig::default())
    }

    fn qa(id: &str, query: &str) -> QaRecord {
        QaRecord {
            id: id.to_string(),
            query: query.to_string(),
            created_at: String::new(),
            qtext: "質問テキスト".to_string(),
            text: "回答テキスト".to_string(),
            combined_text: "質問テキスト 回答テキスト".to_string(),
        }
    }

    fn matched_result(id: &str, start: f64, end: f64) -> MatchResult {
        MatchResult {
            qa: qa(id, "AIについて教えてください"),
            segment_index: Some(0),
            segment: Some(TranscriptSegment::new(start, end, "テキスト".to_string())),
            estimated: None,
            confidence: 0.72,
            kind: MatchKind::Combined,
            text_score: 0.72,
            temporal_bonus: 0.0,
        }
    }

    #[test]
    fn test_plan_has_one_entry_per_result_in_order() {
        let results = vec![
            matched_result("aaaa-bbbb-cccc", 10.0, 25.0),
            matched_result("dddd-eeee-ffff", 45.0, 60.0),
        ];
        let plan = planner().build_plan(&results, None);
        assert_eq!(plan.entries.len(), 2);
        assert_eq!(plan.entries[0].index, 1);
        assert_eq!(plan.entries[1].index, 2);
        assert_eq!(plan.entries[0].segment_id, "aaaa-bbbb-cccc");
        assert_eq!(plan.entries[0].cut.start_time, 10.0);
        assert_eq!(plan.entries[0].duration, 15.0);
    }

    #[test]
    fn test_estimated_result_uses_slot_timing() {
        let mut result = matched_result("id-1", 0.0, 0.0);
        result.segment = None;
        result.segment_index = None;
        result.estimated = Some(TimeSlot {
            start: 30.0,
            end: 90.0,
            duration: 60.0,
        });
        result.kind = MatchKind::Estimated;
        result.confidence = 0.0;

        let plan = planner().build_plan(&[result], None);
        assert_eq!(plan.entries[0].cut.start_time, 30.0);
        assert_eq!(plan.entries[0].cut.end_time, 90.0);
        assert_eq!(plan.entries[0].timing_source, "estimated");
    }

    #[test]
    fn test_safe_filename_shape() {
        let name = planner().safe_filename("AIについて 教えて/ください?", "abcdef1234567890", 3);
        assert!(name.starts_with("qa_0003_abcdef12_"));
        assert!(name.ends_with(".mp4"));
        assert!(!name.contains('/'));
        assert!(!name.contains('?'));
        assert!(!name.contains(' '));
    }

    #[tokio::test]
    async fn test_write_plan_creates_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let plan = planner().build_plan(&[matched_result("id-1", 5.0, 20.0)], None);

        let path = write_plan(&plan, dir.path()).await.unwrap();
        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: CutPlan = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.entries.len(), 1);
    }
}
