//! Core types for the hotword correction engine
//!
//! This crate provides the foundational pieces shared by the phonetic and
//! engine crates:
//! - The phoneme data model (`Phoneme`, `Lang`)
//! - Match and correction result types
//! - Rectification-history records
//! - Engine configuration (TOML-backed)
//! - Error types

pub mod config;
pub mod error;
pub mod types;

pub use config::{CorrectorConfig, EngineConfig, RectifyConfig, ReloadConfig};
pub use error::{HotwordError, Result};
pub use types::{CorrectionResult, Lang, MatchResult, Phoneme, RectifyRecord};
