//! Service facade over the correction and history pipelines
//!
//! One explicit struct constructed at startup and shared by reference; there
//! is no ambient global state. All calls are synchronous and safe from any
//! thread; reloads swap immutable snapshots underneath them.

use crate::corrector::CorrectionEngine;
use crate::history::RectificationIndex;
use hotword_core::{CorrectionResult, EngineConfig, Result};
use hotword_phonetic::Phonemizer;
use std::path::Path;

/// Entry point owning the hotword corrector and the rectification index
pub struct HotwordService {
    corrector: CorrectionEngine,
    rectifier: RectificationIndex,
}

impl HotwordService {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            corrector: CorrectionEngine::new(config.corrector),
            rectifier: RectificationIndex::new(config.rectify),
        }
    }

    /// Service with per-character Chinese matching, for environments without
    /// the pinyin tables
    pub fn with_char_fallback(config: EngineConfig) -> Self {
        Self {
            corrector: CorrectionEngine::with_phonemizer(
                config.corrector,
                Phonemizer::char_fallback(),
            ),
            rectifier: RectificationIndex::new(config.rectify),
        }
    }

    /// Replace the hotword corpus, returning the number of entries loaded
    pub fn update_hotwords(&self, text: &str) -> usize {
        self.corrector.update_hotwords(text)
    }

    /// Correct a finalized transcript
    pub fn correct(&self, text: &str, k: usize) -> CorrectionResult {
        self.corrector.correct(text, k)
    }

    /// Replace the correction history, returning the number of records loaded
    pub fn update_history(&self, text: &str) -> usize {
        self.rectifier.update_history(text)
    }

    /// Retrieve correction-history records similar to `text`
    pub fn search_history(&self, text: &str, top_k: usize) -> Vec<(String, String, f32)> {
        self.rectifier.search(text, top_k)
    }

    pub fn hotword_count(&self) -> usize {
        self.corrector.hotword_count()
    }

    pub fn history_count(&self) -> usize {
        self.rectifier.record_count()
    }

    /// Load the hotword file. On I/O failure the previous snapshot keeps
    /// serving and the error is returned for the caller to log.
    pub fn load_hotwords_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let count = self.update_hotwords(&text);
        tracing::info!(path = %path.as_ref().display(), count, "hotwords loaded");
        Ok(count)
    }

    /// Load the rectification-history file; same failure contract as
    /// `load_hotwords_file`.
    pub fn load_history_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let count = self.update_history(&text);
        tracing::info!(path = %path.as_ref().display(), count, "correction history loaded");
        Ok(count)
    }
}
