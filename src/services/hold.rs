//! Hold-to-count debounce for classified poses
//!
//! A pose only counts once it has been held continuously for the sustain
//! duration. The tracker is driven once per frame with an explicit
//! timestamp, so the elapsed check runs on every incoming frame rather
//! than on an independent clock, and a streak emits at most one trigger
//! no matter how long it continues.

use crate::domain::pose::{Classification, PoseKind};
use tracing::debug;

/// Default minimum hold time before a pose is recorded
pub const DEFAULT_SUSTAIN_MS: u64 = 1000;

/// Emitted once per qualifying hold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldTrigger {
    pub pose: PoseKind,
    /// Confidence of the frame that crossed the sustain threshold
    pub confidence: f64,
    pub at_ms: u64,
}

/// Tracks the current candidate pose streak
pub struct HoldTracker {
    sustain_ms: u64,
    current: Option<PoseKind>,
    started_at_ms: u64,
    last_confidence: f64,
    recorded: bool,
}

impl HoldTracker {
    pub fn new(sustain_ms: u64) -> Self {
        Self {
            sustain_ms,
            current: None,
            started_at_ms: 0,
            last_confidence: 0.0,
            recorded: false,
        }
    }

    /// Currently tracked candidate, if any
    pub fn current(&self) -> Option<PoseKind> {
        self.current
    }

    /// Last confidence observed for the current streak
    pub fn last_confidence(&self) -> f64 {
        self.last_confidence
    }

    /// Feed one frame's classification.
    ///
    /// Returns a trigger on the frame where the streak first reaches the
    /// sustain duration; never more than once per continuous streak. A
    /// changed or lost pose resets the streak.
    pub fn observe(&mut self, result: &Classification, now_ms: u64) -> Option<HoldTrigger> {
        let Some(pose) = result.pose else {
            if self.current.is_some() {
                debug!(pose = %self.current.map_or("", |p| p.label()), "hold_reset");
            }
            self.reset();
            return None;
        };

        if self.current != Some(pose) {
            self.current = Some(pose);
            self.started_at_ms = now_ms;
            self.recorded = false;
            debug!(pose = %pose.label(), at_ms = %now_ms, "hold_started");
        }
        self.last_confidence = result.confidence;

        if !self.recorded && now_ms.saturating_sub(self.started_at_ms) >= self.sustain_ms {
            self.recorded = true;
            debug!(
                pose = %pose.label(),
                held_ms = %now_ms.saturating_sub(self.started_at_ms),
                confidence = %result.confidence,
                "hold_recorded"
            );
            return Some(HoldTrigger { pose, confidence: result.confidence, at_ms: now_ms });
        }

        None
    }

    /// Clear the streak
    pub fn reset(&mut self) {
        self.current = None;
        self.started_at_ms = 0;
        self.last_confidence = 0.0;
        self.recorded = false;
    }
}

impl Default for HoldTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SUSTAIN_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detected(pose: PoseKind, confidence: f64) -> Classification {
        Classification::detected(pose, confidence)
    }

    #[test]
    fn test_short_hold_records_nothing() {
        let mut tracker = HoldTracker::new(1000);

        assert!(tracker.observe(&detected(PoseKind::Tree, 0.765), 0).is_none());
        assert!(tracker.observe(&detected(PoseKind::Tree, 0.765), 500).is_none());
        assert!(tracker.observe(&Classification::none(), 600).is_none());
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn test_sustained_hold_records_once() {
        let mut tracker = HoldTracker::new(1000);

        assert!(tracker.observe(&detected(PoseKind::WarriorTwo, 0.85), 0).is_none());
        assert!(tracker.observe(&detected(PoseKind::WarriorTwo, 0.85), 400).is_none());
        assert!(tracker.observe(&detected(PoseKind::WarriorTwo, 0.85), 800).is_none());

        let trigger = tracker.observe(&detected(PoseKind::WarriorTwo, 0.85), 1200).unwrap();
        assert_eq!(trigger.pose, PoseKind::WarriorTwo);
        assert_eq!(trigger.confidence, 0.85);
        assert_eq!(trigger.at_ms, 1200);

        // Continuing the same streak never emits again
        assert!(tracker.observe(&detected(PoseKind::WarriorTwo, 0.85), 2000).is_none());
        assert!(tracker.observe(&detected(PoseKind::WarriorTwo, 0.85), 60_000).is_none());
    }

    #[test]
    fn test_records_exactly_at_threshold() {
        let mut tracker = HoldTracker::new(1000);

        assert!(tracker.observe(&detected(PoseKind::Chair, 0.85), 100).is_none());
        let trigger = tracker.observe(&detected(PoseKind::Chair, 0.85), 1100).unwrap();
        assert_eq!(trigger.at_ms, 1100);
    }

    #[test]
    fn test_trigger_uses_current_frame_confidence() {
        let mut tracker = HoldTracker::new(1000);

        tracker.observe(&detected(PoseKind::Mountain, 0.85), 0);
        tracker.observe(&detected(PoseKind::Mountain, 0.70), 500);
        let trigger = tracker.observe(&detected(PoseKind::Mountain, 0.78), 1000).unwrap();

        assert_eq!(trigger.confidence, 0.78);
    }

    #[test]
    fn test_pose_change_restarts_streak() {
        let mut tracker = HoldTracker::new(1000);

        tracker.observe(&detected(PoseKind::Tree, 0.765), 0);
        tracker.observe(&detected(PoseKind::Mountain, 0.85), 600);
        // Tree's 600ms do not carry over to Mountain
        assert!(tracker.observe(&detected(PoseKind::Mountain, 0.85), 1200).is_none());
        let trigger = tracker.observe(&detected(PoseKind::Mountain, 0.85), 1600).unwrap();
        assert_eq!(trigger.pose, PoseKind::Mountain);
    }

    #[test]
    fn test_rapid_toggle_records_nothing() {
        let mut tracker = HoldTracker::new(1000);

        for step in 0..10u64 {
            let now = step * 400;
            let result = if step % 2 == 0 {
                detected(PoseKind::Tree, 0.765)
            } else {
                detected(PoseKind::Chair, 0.85)
            };
            assert!(tracker.observe(&result, now).is_none());
        }
    }

    #[test]
    fn test_gap_restarts_timing() {
        let mut tracker = HoldTracker::new(1000);

        // 500ms of Tree, a dropout, then Tree again
        tracker.observe(&detected(PoseKind::Tree, 0.765), 0);
        tracker.observe(&detected(PoseKind::Tree, 0.765), 500);
        tracker.observe(&Classification::none(), 600);

        tracker.observe(&detected(PoseKind::Tree, 0.765), 700);
        assert!(tracker.observe(&detected(PoseKind::Tree, 0.765), 1600).is_none());
        let trigger = tracker.observe(&detected(PoseKind::Tree, 0.765), 1800).unwrap();

        // Timed from the second occurrence's start
        assert_eq!(trigger.at_ms, 1800);
    }

    #[test]
    fn test_new_streak_after_record_can_record_again() {
        let mut tracker = HoldTracker::new(1000);

        tracker.observe(&detected(PoseKind::Cobra, 0.85), 0);
        assert!(tracker.observe(&detected(PoseKind::Cobra, 0.85), 1000).is_some());

        tracker.observe(&Classification::none(), 1500);

        tracker.observe(&detected(PoseKind::Cobra, 0.85), 2000);
        assert!(tracker.observe(&detected(PoseKind::Cobra, 0.85), 3000).is_some());
    }

    #[test]
    fn test_zero_sustain_records_on_first_frame() {
        let mut tracker = HoldTracker::new(0);

        let trigger = tracker.observe(&detected(PoseKind::Tree, 0.765), 42).unwrap();
        assert_eq!(trigger.at_ms, 42);
        assert!(tracker.observe(&detected(PoseKind::Tree, 0.765), 43).is_none());
    }

    #[test]
    fn test_last_confidence_tracks_latest() {
        let mut tracker = HoldTracker::new(1000);

        tracker.observe(&detected(PoseKind::Tree, 0.7), 0);
        tracker.observe(&detected(PoseKind::Tree, 0.765), 100);
        assert_eq!(tracker.last_confidence(), 0.765);
    }
}
