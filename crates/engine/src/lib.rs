//! Hotword retrieval, correction and history search
//!
//! The engine side of the hotword system:
//! - **CoarseIndex**: inverted-index pre-filter so exact scoring only runs on
//!   a bounded candidate set
//! - **CorrectionEngine**: window search, conflict resolution and text rewrite
//! - **RectificationIndex**: retrieval over diff-mined correction history
//! - **HotwordService**: the single entry point owning both pipelines
//! - **ReloadDebouncer**: coalesced file-reload task feeding the service
//!
//! `correct` and `search` are synchronous and safe to call concurrently; the
//! indexes are immutable snapshots swapped atomically on reload.

pub mod coarse;
pub mod corrector;
pub mod history;
pub mod reload;
pub mod service;

pub use coarse::CoarseIndex;
pub use corrector::CorrectionEngine;
pub use history::RectificationIndex;
pub use reload::{ReloadDebouncer, ReloadEvent};
pub use service::HotwordService;
