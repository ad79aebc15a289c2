//! Frame feed lifecycle
//!
//! Wraps the replay source in start/stop semantics: `start` validates the
//! source before spawning anything (a session never begins on a broken
//! feed), `stop` is idempotent, and dropping the feed releases the reader
//! task on whatever exit path got us there.

use crate::io::frames::{FrameMessage, ReplaySource};
use anyhow::Context;
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tracing::info;

pub struct FrameFeed {
    frame_interval_ms: u64,
    shutdown: Mutex<Option<watch::Sender<bool>>>,
}

impl FrameFeed {
    pub fn new(frame_interval_ms: u64) -> Self {
        Self { frame_interval_ms, shutdown: Mutex::new(None) }
    }

    /// Start delivering frames from `path` onto `tx`.
    ///
    /// Fails closed: the source is checked before the reader task spawns,
    /// so an unreadable path leaves the feed stopped.
    pub async fn start(&self, path: &str, tx: mpsc::Sender<FrameMessage>) -> anyhow::Result<()> {
        let metadata = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("frame source not readable: {path}"))?;
        if metadata.is_dir() {
            anyhow::bail!("frame source is a directory: {path}");
        }

        let mut guard = self.shutdown.lock();
        if guard.is_some() {
            anyhow::bail!("capture already running");
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        *guard = Some(stop_tx);
        drop(guard);

        let source = ReplaySource::new(path, self.frame_interval_ms);
        tokio::spawn(async move {
            source.run(tx, stop_rx).await;
        });

        info!(path = %path, "capture_started");
        Ok(())
    }

    /// Stop the feed. Safe to call any number of times.
    pub fn stop(&self) {
        if let Some(stop_tx) = self.shutdown.lock().take() {
            let _ = stop_tx.send(true);
            info!("capture_stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.lock().is_some()
    }
}

impl Drop for FrameFeed {
    fn drop(&mut self) {
        self.stop();
    }
}
