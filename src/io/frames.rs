//! Landmark frame ingest
//!
//! Frames arrive as JSONL: one JSON object per line with an optional epoch-ms
//! timestamp and the estimator's landmark list. An absent or null landmark
//! list means no person was detected that frame. The replay source paces
//! lines onto a bounded channel and shuts down via a watch signal.

use crate::domain::landmark::{Landmark, LandmarkSet};
use crate::domain::session::epoch_ms;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Duration};
use tracing::{debug, info, warn};

/// Wire form of a single landmark
#[derive(Debug, Clone, serde::Deserialize)]
pub struct WireLandmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: Option<f64>,
    #[serde(default)]
    pub visibility: Option<f64>,
}

impl From<WireLandmark> for Landmark {
    fn from(wire: WireLandmark) -> Self {
        Landmark { x: wire.x, y: wire.y, z: wire.z, visibility: wire.visibility }
    }
}

/// One line of the frame stream
#[derive(Debug, Clone, serde::Deserialize)]
pub struct FrameRecord {
    /// Epoch milliseconds; receipt time is used when absent
    #[serde(default)]
    pub ts: Option<u64>,
    /// Landmark list; null/absent when no person was detected
    #[serde(default)]
    pub landmarks: Option<Vec<WireLandmark>>,
}

impl FrameRecord {
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    /// Convert to an internal message, stamping `fallback_ts` when the
    /// record carries no timestamp of its own
    pub fn into_message(self, fallback_ts: u64) -> FrameMessage {
        FrameMessage {
            ts_ms: self.ts.unwrap_or(fallback_ts),
            landmarks: self
                .landmarks
                .map(|points| LandmarkSet::new(points.into_iter().map(Into::into).collect())),
        }
    }
}

/// Parsed frame for internal processing
#[derive(Debug, Clone)]
pub struct FrameMessage {
    pub ts_ms: u64,
    pub landmarks: Option<LandmarkSet>,
}

/// Replays a JSONL frame file onto a channel at a fixed pace
pub struct ReplaySource {
    path: String,
    frame_interval: Duration,
}

impl ReplaySource {
    pub fn new(path: &str, frame_interval_ms: u64) -> Self {
        Self { path: path.to_string(), frame_interval: Duration::from_millis(frame_interval_ms) }
    }

    /// Read the source to exhaustion or until shutdown.
    ///
    /// Malformed lines are logged and skipped; the feed survives them.
    pub async fn run(self, tx: mpsc::Sender<FrameMessage>, mut shutdown: watch::Receiver<bool>) {
        let file = match tokio::fs::File::open(&self.path).await {
            Ok(file) => file,
            Err(e) => {
                warn!(path = %self.path, error = %e, "frame_source_open_failed");
                return;
            }
        };

        info!(path = %self.path, "frame_replay_started");

        let mut lines = BufReader::new(file).lines();
        let mut pace = interval(self.frame_interval);
        let mut sent: u64 = 0;
        let mut skipped: u64 = 0;

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = pace.tick() => {
                    let line = match lines.next_line().await {
                        Ok(Some(line)) => line,
                        Ok(None) => break,
                        Err(e) => {
                            warn!(path = %self.path, error = %e, "frame_read_error");
                            break;
                        }
                    };

                    if line.trim().is_empty() {
                        continue;
                    }

                    let record = match FrameRecord::parse(&line) {
                        Ok(record) => record,
                        Err(e) => {
                            skipped += 1;
                            warn!(error = %e, "frame_parse_error");
                            continue;
                        }
                    };

                    if tx.send(record.into_message(epoch_ms())).await.is_err() {
                        debug!("frame_channel_closed");
                        break;
                    }
                    sent += 1;
                }
            }
        }

        info!(path = %self.path, sent = %sent, skipped = %skipped, "frame_replay_finished");
    }
}
