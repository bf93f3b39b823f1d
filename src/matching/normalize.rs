use regex::Regex;
use std::collections::HashSet;

/// Unicode ranges for Japanese script: hiragana, katakana, kanji
const JAPANESE_RANGES: &str = r"\x{3040}-\x{309F}\x{30A0}-\x{30FF}\x{4E00}-\x{9FAF}";

/// Text normalizer for fuzzy matching
///
/// Strips everything that is not a word character or a Japanese script
/// character, then lower-cases the result. Compiled once and reused so the
/// matcher can normalize hundreds of strings per run without re-building
/// the patterns.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    strip_pattern: Regex,
    keyword_pattern: Regex,
}

impl TextNormalizer {
    /// Create a normalizer with the default minimum keyword run length (3)
    pub fn new() -> Self {
        Self::with_keyword_min_run(3)
    }

    /// Create a normalizer extracting keyword runs of at least `min_run`
    /// Japanese script characters
    pub fn with_keyword_min_run(min_run: usize) -> Self {
        let strip_pattern = Regex::new(&format!(r"[^\w{JAPANESE_RANGES}]")).unwrap();
        let keyword_pattern =
            Regex::new(&format!(r"[{JAPANESE_RANGES}]{{{min_run},}}")).unwrap();

        Self {
            strip_pattern,
            keyword_pattern,
        }
    }

    /// Normalize text for matching: strip non-word, non-Japanese characters
    /// and lower-case. Pure and deterministic; empty input yields empty output.
    pub fn normalize(&self, text: &str) -> String {
        self.strip_pattern.replace_all(text, "").to_lowercase()
    }

    /// Extract deduplicated keyword runs (3+ Japanese script characters by
    /// default) from already-normalized text
    pub fn keywords(&self, normalized: &str) -> HashSet<String> {
        self.keyword_pattern
            .find_iter(normalized)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation_and_lowercases() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("Hello, World!"), "helloworld");
        assert_eq!(normalizer.normalize("AI について。"), "aiについて");
    }

    #[test]
    fn test_normalize_keeps_japanese_scripts() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize("機械学習、とは？"), "機械学習とは");
        assert_eq!(normalizer.normalize("カタカナ テスト!"), "カタカナテスト");
    }

    #[test]
    fn test_normalize_empty() {
        let normalizer = TextNormalizer::new();
        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize("!?、。"), "");
    }

    #[test]
    fn test_keyword_extraction() {
        let normalizer = TextNormalizer::new();
        let keywords = normalizer.keywords("機械学習とai");
        assert!(keywords.contains("機械学習と"));
        assert_eq!(keywords.len(), 1);
    }

    #[test]
    fn test_keywords_deduplicated() {
        let normalizer = TextNormalizer::new();
        let keywords = normalizer.keywords("人工知能xyz人工知能");
        assert_eq!(keywords.len(), 1);
        assert!(keywords.contains("人工知能"));
    }

    #[test]
    fn test_short_runs_ignored() {
        let normalizer = TextNormalizer::new();
        assert!(normalizer.keywords("あい").is_empty());
    }
}
