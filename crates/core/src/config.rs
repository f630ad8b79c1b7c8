//! Engine configuration
//!
//! All thresholds live here so the matching crates stay tuning-free. Loaded
//! from TOML with per-field defaults; every section can be omitted.

use crate::error::{HotwordError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub corrector: CorrectorConfig,

    #[serde(default)]
    pub rectify: RectifyConfig,

    #[serde(default)]
    pub reload: ReloadConfig,
}

impl EngineConfig {
    /// Parse from a TOML string
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Check threshold ordering and ranges
    pub fn validate(&self) -> Result<()> {
        let c = &self.corrector;
        if !(0.0..=1.0).contains(&c.threshold) || c.threshold == 0.0 {
            return Err(HotwordError::Config(format!(
                "corrector.threshold must be in (0, 1], got {}",
                c.threshold
            )));
        }
        let similar = c.similar_threshold();
        if similar > c.threshold {
            return Err(HotwordError::Config(format!(
                "corrector.similar_threshold ({}) must not exceed threshold ({})",
                similar, c.threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.rectify.threshold) {
            return Err(HotwordError::Config(format!(
                "rectify.threshold must be in [0, 1], got {}",
                self.rectify.threshold
            )));
        }
        if c.top_k_candidates == 0 {
            return Err(HotwordError::Config(
                "corrector.top_k_candidates must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Correction and coarse-retrieval tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectorConfig {
    /// Substitution threshold; matches at or above it rewrite the text
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// Soft-context threshold. Unset means `threshold - 0.2`.
    #[serde(default)]
    pub similar_threshold: Option<f32>,

    /// How far below `similar_threshold` the coarse filter is allowed to cut
    #[serde(default = "default_coarse_margin")]
    pub coarse_margin: f32,

    /// Cap on candidates surviving the coarse filter
    #[serde(default = "default_top_k_candidates")]
    pub top_k_candidates: usize,

    /// Hotwords longer than the input by more than this many phonemes are skipped
    #[serde(default = "default_length_slack")]
    pub length_slack: usize,
}

impl CorrectorConfig {
    /// Resolved soft-context threshold
    pub fn similar_threshold(&self) -> f32 {
        self.similar_threshold
            .unwrap_or((self.threshold - 0.2).max(0.0))
    }

    /// Resolved coarse-filter threshold, always at or below `similar_threshold`
    pub fn coarse_threshold(&self) -> f32 {
        (self.similar_threshold() - self.coarse_margin).max(0.0)
    }
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            similar_threshold: None,
            coarse_margin: default_coarse_margin(),
            top_k_candidates: default_top_k_candidates(),
            length_slack: default_length_slack(),
        }
    }
}

/// Rectification-history retrieval tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectifyConfig {
    /// Minimum fragment score for a record to be returned
    #[serde(default = "default_rectify_threshold")]
    pub threshold: f32,

    /// Fragments below this phoneme count are widened by neighboring words
    #[serde(default = "default_min_fragment_phonemes")]
    pub min_fragment_phonemes: usize,
}

impl Default for RectifyConfig {
    fn default() -> Self {
        Self {
            threshold: default_rectify_threshold(),
            min_fragment_phonemes: default_min_fragment_phonemes(),
        }
    }
}

/// File-reload debounce tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadConfig {
    /// Quiet window after the last file event before a rebuild runs
    #[serde(default = "default_debounce_secs")]
    pub debounce_secs: u64,
}

impl ReloadConfig {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_secs(self.debounce_secs)
    }
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            debounce_secs: default_debounce_secs(),
        }
    }
}

fn default_threshold() -> f32 {
    0.7
}

fn default_coarse_margin() -> f32 {
    0.1
}

fn default_top_k_candidates() -> usize {
    100
}

fn default_length_slack() -> usize {
    2
}

fn default_rectify_threshold() -> f32 {
    0.5
}

fn default_min_fragment_phonemes() -> usize {
    4
}

fn default_debounce_secs() -> u64 {
    3
}
