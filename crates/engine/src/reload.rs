//! Debounced file reload
//!
//! File-system watchers fire in bursts (editors write, rename and touch).
//! The debouncer coalesces events per file kind: every event resets a single
//! deadline, and only once the quiet window elapses does one rebuild run per
//! touched kind. A failed reload logs a warning and the previous snapshot
//! keeps serving. Built on a channel plus `select!`, no polling loops.

use crate::service::HotwordService;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

/// Which file a watcher saw change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReloadEvent {
    Hotwords,
    History,
}

/// Handle feeding file events into the debounced reload task.
///
/// Dropping every handle stops the task after it drains.
#[derive(Clone)]
pub struct ReloadDebouncer {
    tx: mpsc::UnboundedSender<ReloadEvent>,
}

impl ReloadDebouncer {
    /// Spawn the reload task. Must be called from within a tokio runtime.
    pub fn spawn(
        service: Arc<HotwordService>,
        hotwords_path: PathBuf,
        history_path: PathBuf,
        window: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(service, hotwords_path, history_path, window, rx));
        Self { tx }
    }

    /// Record a file event; send failures mean the task is gone and the
    /// event is moot.
    pub fn notify(&self, event: ReloadEvent) {
        let _ = self.tx.send(event);
    }
}

async fn run(
    service: Arc<HotwordService>,
    hotwords_path: PathBuf,
    history_path: PathBuf,
    window: Duration,
    mut rx: mpsc::UnboundedReceiver<ReloadEvent>,
) {
    let mut pending: HashSet<ReloadEvent> = HashSet::new();
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => {
                    pending.insert(event);
                    deadline = Some(Instant::now() + window);
                }
                None => break,
            },
            _ = async { sleep_until(deadline.unwrap()).await }, if deadline.is_some() => {
                deadline = None;
                for event in pending.drain() {
                    reload_one(&service, event, &hotwords_path, &history_path);
                }
            }
        }
    }
}

fn reload_one(
    service: &HotwordService,
    event: ReloadEvent,
    hotwords_path: &std::path::Path,
    history_path: &std::path::Path,
) {
    let outcome = match event {
        ReloadEvent::Hotwords => service.load_hotwords_file(hotwords_path),
        ReloadEvent::History => service.load_history_file(history_path),
    };
    if let Err(error) = outcome {
        tracing::warn!(?event, %error, "reload failed, keeping previous snapshot");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotword_core::EngineConfig;
    use tempfile::NamedTempFile;

    fn write_all(file: &NamedTempFile, content: &str) {
        std::fs::write(file.path(), content).unwrap();
    }

    async fn wait_for<F: Fn() -> bool>(check: F) {
        for _ in 0..100 {
            if check() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("condition not reached in time");
    }

    #[tokio::test]
    async fn test_burst_coalesces_into_one_reload() {
        let hotword_file = NamedTempFile::new().unwrap();
        write_all(&hotword_file, "科大讯飞\n");
        let history_file = NamedTempFile::new().unwrap();

        let service = Arc::new(HotwordService::new(EngineConfig::default()));
        let debouncer = ReloadDebouncer::spawn(
            service.clone(),
            hotword_file.path().to_path_buf(),
            history_file.path().to_path_buf(),
            Duration::from_millis(50),
        );

        for _ in 0..5 {
            debouncer.notify(ReloadEvent::Hotwords);
        }
        wait_for(|| service.hotword_count() == 1).await;
    }

    #[tokio::test]
    async fn test_event_resets_deadline_then_reloads_latest_content() {
        let hotword_file = NamedTempFile::new().unwrap();
        write_all(&hotword_file, "撒贝宁\n");
        let history_file = NamedTempFile::new().unwrap();

        let service = Arc::new(HotwordService::new(EngineConfig::default()));
        let debouncer = ReloadDebouncer::spawn(
            service.clone(),
            hotword_file.path().to_path_buf(),
            history_file.path().to_path_buf(),
            Duration::from_millis(50),
        );

        debouncer.notify(ReloadEvent::Hotwords);
        // The file keeps changing within the window; only the final content
        // should ever be published.
        write_all(&hotword_file, "撒贝宁\n科大讯飞\n");
        debouncer.notify(ReloadEvent::Hotwords);

        wait_for(|| service.hotword_count() == 2).await;
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_snapshot() {
        let service = Arc::new(HotwordService::new(EngineConfig::default()));
        service.update_hotwords("科大讯飞\n");

        let debouncer = ReloadDebouncer::spawn(
            service.clone(),
            PathBuf::from("/nonexistent/hot.txt"),
            PathBuf::from("/nonexistent/hot-rectify.txt"),
            Duration::from_millis(20),
        );
        debouncer.notify(ReloadEvent::Hotwords);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(service.hotword_count(), 1);
    }

    #[tokio::test]
    async fn test_history_reload() {
        let hotword_file = NamedTempFile::new().unwrap();
        let history_file = NamedTempFile::new().unwrap();
        write_all(&history_file, "原锯子\n原句子\n");

        let service = Arc::new(HotwordService::new(EngineConfig::default()));
        let debouncer = ReloadDebouncer::spawn(
            service.clone(),
            hotword_file.path().to_path_buf(),
            history_file.path().to_path_buf(),
            Duration::from_millis(20),
        );
        debouncer.notify(ReloadEvent::History);
        wait_for(|| service.history_count() == 1).await;
    }
}
