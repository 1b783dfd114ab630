// Pipeline configuration.
//
// Everything tunable about normalization lives here as plain data, so a
// batch run is a pure function of (rows, config). Defaults match the
// storefront's SEO guidelines; a JSON file can override any subset.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encoding::{SingleByteEncoding, DEFAULT_CANDIDATES};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Full configuration for a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub repair: RepairConfig,
    pub seo: SeoConfig,
    pub weights: ScoreWeights,
    /// Fan batch rows out over the rayon pool. Output order is unaffected.
    pub use_parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            repair: RepairConfig::default(),
            seo: SeoConfig::default(),
            weights: ScoreWeights::default(),
            use_parallel: true,
        }
    }
}

/// Candidate encodings for mojibake repair, tried in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    pub candidates: Vec<SingleByteEncoding>,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_CANDIDATES.to_vec(),
        }
    }
}

/// Length limits and markers for SEO field synthesis. All lengths are in
/// characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoConfig {
    pub title_max_chars: usize,
    pub separator: String,
    pub short_description_max_chars: usize,
    pub ellipsis: String,
    pub slug_max_chars: usize,
}

impl Default for SeoConfig {
    fn default() -> Self {
        Self {
            title_max_chars: 70,
            separator: " | ".to_string(),
            short_description_max_chars: 160,
            ellipsis: "...".to_string(),
            slug_max_chars: 100,
        }
    }
}

/// Points awarded per quality signal, plus the thresholds those signals use.
///
/// The default weights sum to exactly 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub title_present: u8,
    pub title_length: u8,
    pub description: u8,
    pub author: u8,
    pub price: u8,
    pub slug: u8,
    pub in_stock: u8,
    /// Inclusive title length range (chars) considered SEO-friendly.
    pub title_min_chars: usize,
    pub title_max_chars: usize,
    pub description_min_chars: usize,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            title_present: 15,
            title_length: 10,
            description: 20,
            author: 10,
            price: 15,
            slug: 15,
            in_stock: 15,
            title_min_chars: 20,
            title_max_chars: 70,
            description_min_chars: 100,
        }
    }
}

impl ScoreWeights {
    /// Sum of all signal weights (may exceed 100; scores are capped).
    pub fn total(&self) -> u32 {
        [
            self.title_present,
            self.title_length,
            self.description,
            self.author,
            self.price,
            self.slug,
            self.in_stock,
        ]
        .iter()
        .map(|w| u32::from(*w))
        .sum()
    }
}

impl PipelineConfig {
    /// Load a config from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make a stage meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repair.candidates.is_empty() {
            return Err(ConfigError::Invalid(
                "repair.candidates must list at least one encoding".into(),
            ));
        }
        if self.seo.title_max_chars == 0 || self.seo.slug_max_chars == 0 {
            return Err(ConfigError::Invalid(
                "seo title and slug limits must be positive".into(),
            ));
        }
        if self.seo.short_description_max_chars <= self.seo.ellipsis.chars().count() {
            return Err(ConfigError::Invalid(format!(
                "seo.short_description_max_chars ({}) must exceed the ellipsis length",
                self.seo.short_description_max_chars
            )));
        }
        if self.weights.title_min_chars > self.weights.title_max_chars {
            return Err(ConfigError::Invalid(
                "weights.title_min_chars exceeds weights.title_max_chars".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_100() {
        assert_eq!(ScoreWeights::default().total(), 100);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = PipelineConfig::from_json_str(r#"{"seo": {"title_max_chars": 60}}"#).unwrap();
        assert_eq!(config.seo.title_max_chars, 60);
        assert_eq!(config.seo.separator, " | ");
        assert_eq!(config.weights, ScoreWeights::default());
        assert!(config.use_parallel);
    }

    #[test]
    fn test_candidates_from_json() {
        let config =
            PipelineConfig::from_json_str(r#"{"repair": {"candidates": ["latin1"]}}"#).unwrap();
        assert_eq!(config.repair.candidates, vec![SingleByteEncoding::Latin1]);
    }

    #[test]
    fn test_rejects_empty_candidates() {
        let err = PipelineConfig::from_json_str(r#"{"repair": {"candidates": []}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_description_limit_below_ellipsis() {
        let mut config = PipelineConfig::default();
        config.seo.short_description_max_chars = 3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = PipelineConfig::from_json_file("/nonexistent/catalog.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
