use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::matching::TemporalTiers;

/// Configuration for the Q&A video splitter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Matching engine settings
    pub matching: MatchingConfig,

    /// Cut-plan generation settings
    pub splitter: SplitterConfig,

    /// Output and logging settings
    pub output: OutputConfig,
}

/// Settings for the temporal alignment engine
///
/// Every heuristic threshold of the matcher is a named field here so it can
/// be tuned from a config file instead of a code change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Minimum combined score for accepting a match
    pub confidence_threshold: f64,

    /// Text score above which the first candidate in segment order wins
    /// without scanning the rest of the pool
    pub early_exit_threshold: f64,

    /// Enable the temporal bonus component
    pub enable_temporal: bool,

    /// Weight of the temporal bonus in the combined score
    pub temporal_weight: f64,

    /// Length ratio below which two strings are rejected without scoring
    pub min_length_ratio: f64,

    /// Base similarity below which the keyword bonus is skipped
    pub base_similarity_floor: f64,

    /// Weight of the keyword-overlap bonus
    pub keyword_bonus_weight: f64,

    /// Minimum run length (in Japanese script characters) for a keyword
    pub keyword_min_run: usize,

    /// Symmetric buffer added around accepted matches when reserving
    /// timeline intervals (seconds)
    pub match_buffer_seconds: f64,

    /// Smallest gap the allocator will place a synthetic slot into (seconds)
    pub min_slot_seconds: f64,

    /// Requested duration for synthetic slots (seconds)
    pub estimated_duration_seconds: f64,

    /// Total timeline length; defaults to the latest segment end
    pub timeline_length: Option<f64>,

    /// Tier boundaries for the temporal bonus
    ///
    /// Kept last so the TOML serialization emits plain values before the
    /// nested table.
    pub temporal_tiers: TemporalTiers,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.3,
            early_exit_threshold: 0.8,
            enable_temporal: false,
            temporal_weight: 0.2,
            temporal_tiers: TemporalTiers::default(),
            min_length_ratio: 0.1,
            base_similarity_floor: 0.1,
            keyword_bonus_weight: 0.2,
            keyword_min_run: 3,
            match_buffer_seconds: 2.0,
            min_slot_seconds: 5.0,
            estimated_duration_seconds: 60.0,
            timeline_length: None,
        }
    }
}

/// Settings for turning match results into a cut plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitterConfig {
    /// Container format recorded in output filenames
    pub video_format: String,

    /// Maximum number of query characters kept in the filename slug
    pub slug_max_chars: usize,

    /// Maximum number of characters of the query kept as clip content
    pub content_preview_chars: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            video_format: "mp4".to_string(),
            slug_max_chars: 30,
            content_preview_chars: 100,
        }
    }
}

/// Output and logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Base output directory for plan files
    pub base_dir: PathBuf,

    /// Log level
    pub log_level: String,

    /// Include the match report in the plan file
    pub save_report: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("./output"),
            log_level: "info".to_string(),
            save_report: true,
        }
    }
}

impl Config {
    /// Load configuration from conventional file locations, falling back to
    /// environment variables
    pub fn load() -> Result<Self> {
        let config_paths = [
            "qa-splitter.toml",
            "config/qa-splitter.toml",
            "~/.config/qa-splitter/config.toml",
        ];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str(&config_str) {
                    Ok(config) => {
                        tracing::info!("📄 Loaded configuration from: {}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Build configuration from environment variables on top of defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(threshold) = std::env::var("QA_SPLITTER_THRESHOLD") {
            config.matching.confidence_threshold = threshold.parse().unwrap_or(0.3);
        }

        if let Ok(temporal) = std::env::var("QA_SPLITTER_TEMPORAL") {
            config.matching.enable_temporal =
                temporal == "1" || temporal.eq_ignore_ascii_case("true");
        }

        if let Ok(weight) = std::env::var("QA_SPLITTER_TEMPORAL_WEIGHT") {
            config.matching.temporal_weight = weight.parse().unwrap_or(0.2);
        }

        if let Ok(output_dir) = std::env::var("QA_SPLITTER_OUTPUT_DIR") {
            config.output.base_dir = PathBuf::from(output_dir);
        }

        if let Ok(log_level) = std::env::var("QA_SPLITTER_LOG_LEVEL") {
            config.output.log_level = log_level;
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path);
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let m = &self.matching;

        if !(0.0..=1.0).contains(&m.confidence_threshold) {
            return Err(anyhow!("confidence_threshold must be in [0, 1]"));
        }

        if !(0.0..=1.0).contains(&m.early_exit_threshold) {
            return Err(anyhow!("early_exit_threshold must be in [0, 1]"));
        }

        if m.temporal_weight < 0.0 {
            return Err(anyhow!("temporal_weight must not be negative"));
        }

        if m.match_buffer_seconds < 0.0 {
            return Err(anyhow!("match_buffer_seconds must not be negative"));
        }

        if m.min_slot_seconds <= 0.0 || m.estimated_duration_seconds <= 0.0 {
            return Err(anyhow!("slot durations must be positive"));
        }

        if let Some(timeline) = m.timeline_length {
            if timeline <= 0.0 {
                return Err(anyhow!("timeline_length must be positive when set"));
            }
        }

        if self.splitter.slug_max_chars == 0 {
            return Err(anyhow!("slug_max_chars must be greater than 0"));
        }

        Ok(())
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.config.matching.confidence_threshold = threshold;
        self
    }

    pub fn enable_temporal(mut self, enable: bool) -> Self {
        self.config.matching.enable_temporal = enable;
        self
    }

    pub fn with_temporal_weight(mut self, weight: f64) -> Self {
        self.config.matching.temporal_weight = weight;
        self
    }

    pub fn with_timeline_length(mut self, seconds: f64) -> Self {
        self.config.matching.timeline_length = Some(seconds);
        self
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.config.output.base_dir = dir;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_carries_documented_defaults() {
        let config = Config::default();
        assert_eq!(config.matching.confidence_threshold, 0.3);
        assert_eq!(config.matching.early_exit_threshold, 0.8);
        assert_eq!(config.matching.temporal_weight, 0.2);
        assert!(!config.matching.enable_temporal);
        assert_eq!(config.matching.match_buffer_seconds, 2.0);
        assert_eq!(config.matching.min_slot_seconds, 5.0);
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_confidence_threshold(0.5)
            .enable_temporal(true)
            .with_temporal_weight(0.3)
            .build();

        assert_eq!(config.matching.confidence_threshold, 0.5);
        assert!(config.matching.enable_temporal);
        assert_eq!(config.matching.temporal_weight, 0.3);
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::default().validate().is_ok());

        let mut bad = Config::default();
        bad.matching.confidence_threshold = 1.5;
        assert!(bad.validate().is_err());

        let mut bad = Config::default();
        bad.matching.min_slot_seconds = 0.0;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(
            parsed.matching.confidence_threshold,
            config.matching.confidence_threshold
        );
        assert_eq!(parsed.splitter.video_format, config.splitter.video_format);
    }
}
