use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

use super::{is_valid_answer, QaRecord};

/// Raw row shape of the studio results CSV
#[derive(Debug, Deserialize)]
struct QaCsvRow {
    id: String,
    query: String,
    created_at: String,
    answer: Option<String>,
}

/// Structured fields extracted from the free-form `answer` column
#[derive(Debug, Default, PartialEq)]
pub struct AnswerFields {
    pub qtext: String,
    pub text: String,
}

/// Extract `qtext:` and `text:` fields from the answer payload
///
/// The payload is a loosely structured dump: one `qtext:` block terminated
/// by the `qvoice:` marker (or end of input), and any number of
/// single-line `text:` entries which are joined with spaces.
pub fn parse_answer_field(answer: &str) -> AnswerFields {
    let qtext_pattern = Regex::new(r"(?s)qtext:\s*(.*?)(?:\nqvoice:|$)").unwrap();
    // Line-anchored so the `text:` tail of `qtext:` lines is not picked up
    let text_pattern = Regex::new(r"(?m)^text:([^\n]+)").unwrap();

    let qtext = qtext_pattern
        .captures(answer)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    let text = text_pattern
        .captures_iter(answer)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect::<Vec<_>>()
        .join(" ");

    AnswerFields { qtext, text }
}

/// Parse Q&A records from CSV content
///
/// Rows without an answer, refusal answers and rows with too little text
/// are dropped. The surviving records are sorted by `created_at` exactly
/// once; that order is the ground-truth chronology proxy for matching.
pub fn parse_qa_csv(content: &str) -> Result<Vec<QaRecord>> {
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let mut records = Vec::new();

    for row in reader.deserialize() {
        let row: QaCsvRow = row.context("malformed CSV row")?;

        let Some(answer) = row.answer.filter(|a| !a.trim().is_empty()) else {
            debug!("Skipping row {} without answer", row.id);
            continue;
        };

        let fields = parse_answer_field(&answer);
        if !is_valid_answer(&fields.qtext, &fields.text) {
            debug!("Skipping row {} with unusable answer", row.id);
            continue;
        }

        let combined_text = format!("{} {}", fields.qtext, fields.text);
        records.push(QaRecord {
            id: row.id,
            query: row.query,
            created_at: row.created_at,
            qtext: fields.qtext,
            text: fields.text,
            combined_text,
        });
    }

    records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(records)
}

/// Load and parse Q&A records from a CSV file
pub async fn load_qa_csv<P: AsRef<Path>>(path: P) -> Result<Vec<QaRecord>> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read Q&A CSV: {}", path.display()))?;

    let records = parse_qa_csv(&content)?;
    info!("📋 Loaded {} Q&A records from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer_field_extracts_qtext_and_text() {
        let answer = "qtext: 機械学習とは何ですか\nqvoice: voice.wav\ntext:統計的な学習手法です\ntext:広く使われています";
        let fields = parse_answer_field(answer);
        assert_eq!(fields.qtext, "機械学習とは何ですか");
        assert_eq!(fields.text, "統計的な学習手法です 広く使われています");
    }

    #[test]
    fn test_parse_answer_field_without_qvoice_marker() {
        let fields = parse_answer_field("qtext: 深層学習について");
        assert_eq!(fields.qtext, "深層学習について");
        assert_eq!(fields.text, "");
    }

    #[test]
    fn test_parse_answer_field_empty() {
        assert_eq!(parse_answer_field(""), AnswerFields::default());
    }

    #[test]
    fn test_parse_qa_csv_filters_and_sorts() {
        // Answer fields are quoted because they contain embedded newlines
        let content = concat!(
            "id,query,created_at,answer\n",
            "b,二番目の質問です,2025-07-10T10:05:00,\"qtext: 二番目の質問内容\ntext:二番目の回答内容です\"\n",
            "a,最初の質問です,2025-07-10T10:00:00,\"qtext: 最初の質問内容\ntext:最初の回答内容です\"\n",
            "c,無効な質問です,2025-07-10T10:10:00,\"qtext: すみません\ntext:回答できません\"\n",
            "d,回答なしの質問,2025-07-10T10:15:00,\n",
        );
        let records = parse_qa_csv(content).unwrap();
        assert_eq!(records.len(), 2);
        // Sorted by created_at, not file order
        assert_eq!(records[0].id, "a");
        assert_eq!(records[1].id, "b");
        assert_eq!(records[0].combined_text, "最初の質問内容 最初の回答内容です");
    }

    #[tokio::test]
    async fn test_load_qa_csv_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qa.csv");
        tokio::fs::write(
            &path,
            "id,query,created_at,answer\n1,テストの質問です,2025-07-10T10:00:00,qtext: テストの質問内容\n",
        )
        .await
        .unwrap();

        let records = load_qa_csv(&path).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].qtext, "テストの質問内容");
    }
}
