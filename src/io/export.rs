//! Session export - writes finished sessions to a local history file
//!
//! Sessions are written in JSONL format (one JSON object per line) so a
//! failed cloud save never loses data. Write failures are logged and
//! reported to the caller, never fatal.

use crate::domain::session::SessionSummary;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{debug, error, info};

/// Export writer for session summaries
pub struct SessionExport {
    file_path: String,
}

impl SessionExport {
    pub fn new(file_path: &str) -> Self {
        info!(file_path = %file_path, "export_initialized");
        Self { file_path: file_path.to_string() }
    }

    /// Write one session to the history file.
    /// Returns true if successful, false otherwise
    pub fn write_session(&self, summary: &SessionSummary) -> bool {
        let json = summary.to_json();

        match self.append_line(&json) {
            Ok(()) => {
                info!(
                    sid = %summary.sid,
                    poses = %summary.stats.count,
                    duration = %summary.duration_mm_ss(),
                    "session_exported"
                );
                true
            }
            Err(e) => {
                error!(
                    sid = %summary.sid,
                    error = %e,
                    "session_export_failed"
                );
                false
            }
        }
    }

    /// Append a line to the export file
    fn append_line(&self, line: &str) -> std::io::Result<()> {
        let path = Path::new(&self.file_path);

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        writeln!(file, "{}", line)?;
        debug!(file = %self.file_path, bytes = %line.len(), "export_written");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::{RecordedPose, SessionStats};
    use std::fs;
    use tempfile::tempdir;

    fn sample_summary(sid: &str) -> SessionSummary {
        let mut stats = SessionStats::new();
        stats.record("Tree Pose (Vrikshasana)", 0.765);
        SessionSummary {
            sid: sid.to_string(),
            started_at: 1_736_012_340_000,
            ended_at: 1_736_012_465_000,
            stats,
            poses: vec![RecordedPose::new("Tree Pose (Vrikshasana)", 0.765, 1_736_012_350_000)],
        }
    }

    #[test]
    fn test_export_new() {
        let export = SessionExport::new("history.jsonl");
        assert_eq!(export.file_path, "history.jsonl");
    }

    #[test]
    fn test_write_session() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("sessions.jsonl");
        let export = SessionExport::new(file_path.to_str().unwrap());

        assert!(export.write_session(&sample_summary("sid-abc")));

        let content = fs::read_to_string(&file_path).unwrap();
        assert!(content.ends_with('\n'));

        let parsed: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(parsed["sid"], "sid-abc");
        assert_eq!(parsed["count"], 1);
        assert_eq!(parsed["dur"], "02:05");
    }

    #[test]
    fn test_append_mode() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("sessions.jsonl");
        let export = SessionExport::new(file_path.to_str().unwrap());

        export.write_session(&sample_summary("sid-1"));
        export.write_session(&sample_summary("sid-2"));

        let content = fs::read_to_string(&file_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("sid-1"));
        assert!(lines[1].contains("sid-2"));

        for line in lines {
            let _parsed: serde_json::Value = serde_json::from_str(line).unwrap();
        }
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested").join("dir").join("sessions.jsonl");
        let export = SessionExport::new(nested.to_str().unwrap());

        assert!(export.write_session(&sample_summary("sid-n")));
        assert!(nested.exists());
    }
}
