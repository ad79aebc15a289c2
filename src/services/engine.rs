//! Session engine: per-frame pipeline and session lifecycle
//!
//! Consumes one landmark set per frame, runs the classifier and the hold
//! tracker, and maintains the session log and aggregates. An injected
//! observer is invoked exactly once per recorded pose with the updated
//! stats and the full ordered log (newest last).

use crate::domain::landmark::LandmarkSet;
use crate::domain::pose::Classification;
use crate::domain::session::{new_session_id, RecordedPose, SessionStats, SessionSummary};
use crate::infra::config::Config;
use crate::infra::metrics::Metrics;
use crate::services::classifier::PoseClassifier;
use crate::services::hold::{HoldTracker, HoldTrigger};
use std::sync::Arc;
use tracing::info;

/// Callback fired after every recorded pose
pub type StatsObserver = Box<dyn FnMut(&SessionStats, &[RecordedPose]) + Send>;

pub struct SessionEngine {
    classifier: PoseClassifier,
    hold: HoldTracker,
    active: bool,
    sid: String,
    started_at_ms: u64,
    poses: Vec<RecordedPose>,
    stats: SessionStats,
    observer: Option<StatsObserver>,
    metrics: Option<Arc<Metrics>>,
}

impl SessionEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            classifier: PoseClassifier::new(config.detection_threshold()),
            hold: HoldTracker::new(config.sustain_ms()),
            active: false,
            sid: String::new(),
            started_at_ms: 0,
            poses: Vec::new(),
            stats: SessionStats::new(),
            observer: None,
            metrics: None,
        }
    }

    pub fn with_metrics(config: &Config, metrics: Arc<Metrics>) -> Self {
        let mut engine = Self::new(config);
        engine.classifier =
            PoseClassifier::with_metrics(config.detection_threshold(), metrics.clone());
        engine.metrics = Some(metrics);
        engine
    }

    /// Register the stats observer, replacing any previous one
    pub fn with_observer(mut self, observer: StatsObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn session_id(&self) -> &str {
        &self.sid
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn poses(&self) -> &[RecordedPose] {
        &self.poses
    }

    /// Begin a new session from a cleared state
    pub fn start(&mut self, now_ms: u64) {
        self.sid = new_session_id();
        self.started_at_ms = now_ms;
        self.active = true;
        self.poses.clear();
        self.stats.reset();
        self.hold.reset();
        info!(sid = %self.sid, "session_started");
    }

    /// Process one frame. `landmarks` is `None` when no person was detected.
    ///
    /// Returns the frame's classification while a session is active, `None`
    /// otherwise (frames outside a session are ignored).
    pub fn process_frame(
        &mut self,
        landmarks: Option<&LandmarkSet>,
        now_ms: u64,
    ) -> Option<Classification> {
        if !self.active {
            return None;
        }

        let result = match landmarks {
            Some(set) => self.classifier.classify(set),
            None => Classification::none(),
        };

        if let Some(trigger) = self.hold.observe(&result, now_ms) {
            self.record(trigger);
        }

        Some(result)
    }

    fn record(&mut self, trigger: HoldTrigger) {
        let recorded = RecordedPose::new(trigger.pose.label(), trigger.confidence, trigger.at_ms);
        self.stats.record(&recorded.name, recorded.confidence);
        self.poses.push(recorded);

        if let Some(metrics) = &self.metrics {
            metrics.record_pose(trigger.pose);
        }

        info!(
            sid = %self.sid,
            pose = %trigger.pose.label(),
            confidence = %trigger.confidence,
            count = %self.stats.count,
            "pose_recorded"
        );

        if let Some(observer) = &mut self.observer {
            observer(&self.stats, &self.poses);
        }
    }

    /// End the session and hand back its summary. The engine is left
    /// cleared, ready for the next `start`.
    pub fn end(&mut self, now_ms: u64) -> SessionSummary {
        self.active = false;
        self.hold.reset();

        let summary = SessionSummary {
            sid: std::mem::take(&mut self.sid),
            started_at: self.started_at_ms,
            ended_at: now_ms,
            stats: std::mem::take(&mut self.stats),
            poses: std::mem::take(&mut self.poses),
        };
        self.started_at_ms = 0;

        info!(
            sid = %summary.sid,
            duration = %summary.duration_mm_ss(),
            poses = %summary.stats.count,
            avg_confidence_pct = %summary.stats.avg_confidence_pct(),
            "session_ended"
        );

        summary
    }
}
