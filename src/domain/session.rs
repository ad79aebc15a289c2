//! Session data model: recorded poses, running stats, and finished summaries

use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Generate a new UUIDv7 (time-sortable) session id
pub fn new_session_id() -> String {
    Uuid::now_v7().to_string()
}

/// Get current epoch milliseconds
#[inline]
pub fn epoch_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
}

/// Format a millisecond duration as "MM:SS"
pub fn format_mm_ss(elapsed_ms: u64) -> String {
    let total_secs = elapsed_ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Local wall-clock "HH:MM:SS" for an epoch-ms timestamp
pub fn local_time_string(ts_ms: u64) -> String {
    use chrono::{DateTime, Local};
    DateTime::from_timestamp_millis(ts_ms as i64)
        .map(|dt| dt.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "00:00:00".to_string())
}

/// A pose that was held long enough to count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedPose {
    /// Full pose label
    pub name: String,
    /// Confidence of the frame that triggered the record
    pub confidence: f64,
    /// Local wall-clock time, "HH:MM:SS"
    pub time: String,
    /// Epoch milliseconds
    pub ts: u64,
}

impl RecordedPose {
    pub fn new(name: &str, confidence: f64, ts: u64) -> Self {
        Self { name: name.to_string(), confidence, time: local_time_string(ts), ts }
    }
}

/// Running aggregates over the recorded-pose log.
///
/// `count` always equals the log length; the best pose is the maximal
/// confidence seen so far, first occurrence winning exact ties.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionStats {
    pub count: u64,
    pub best_pose: Option<String>,
    pub best_confidence: f64,
    pub total_confidence: f64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one recorded pose into the aggregates
    pub fn record(&mut self, name: &str, confidence: f64) {
        self.count += 1;
        self.total_confidence += confidence;
        if confidence > self.best_confidence {
            self.best_confidence = confidence;
            self.best_pose = Some(name.to_string());
        }
    }

    /// Average confidence as a rounded percentage, 0 for an empty session
    pub fn avg_confidence_pct(&self) -> u32 {
        if self.count == 0 {
            return 0;
        }
        ((self.total_confidence / self.count as f64) * 100.0).round() as u32
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A finished session: identity, timing, aggregates, and the full event log
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub sid: String,
    pub started_at: u64,
    pub ended_at: u64,
    pub stats: SessionStats,
    pub poses: Vec<RecordedPose>,
}

impl SessionSummary {
    pub fn duration_ms(&self) -> u64 {
        self.ended_at.saturating_sub(self.started_at)
    }

    pub fn duration_mm_ss(&self) -> String {
        format_mm_ss(self.duration_ms())
    }

    /// Convert to short-key JSON string for the local history file
    pub fn to_json(&self) -> String {
        let mut obj = serde_json::Map::new();
        obj.insert("sid".to_string(), serde_json::Value::String(self.sid.clone()));
        obj.insert("t0".to_string(), serde_json::Value::Number(self.started_at.into()));
        obj.insert("t1".to_string(), serde_json::Value::Number(self.ended_at.into()));
        obj.insert("dur".to_string(), serde_json::Value::String(self.duration_mm_ss()));
        obj.insert("count".to_string(), serde_json::Value::Number(self.stats.count.into()));
        if let Some(best) = &self.stats.best_pose {
            obj.insert("best".to_string(), serde_json::Value::String(best.clone()));
        }
        obj.insert(
            "avg_pct".to_string(),
            serde_json::Value::Number(self.stats.avg_confidence_pct().into()),
        );
        let poses: Vec<serde_json::Value> =
            self.poses.iter().map(|p| serde_json::json!(p)).collect();
        obj.insert("poses".to_string(), serde_json::Value::Array(poses));
        serde_json::Value::Object(obj).to_string()
    }
}
