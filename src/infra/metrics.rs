//! Lock-free metrics collection and periodic reporting
//!
//! Uses atomics for hot-path operations to avoid mutex contention.
//! All counter updates are lock-free; reporting is the only operation
//! that needs synchronization (via atomic swap).
//!
//! NOTE: All atomics use Relaxed ordering intentionally—these are statistical
//! counters only. Do NOT use these atomics for coordination or logic decisions.

use crate::domain::pose::{PoseKind, POSE_COUNT};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Update an atomic max value using compare-and-swap loop
#[inline]
fn update_atomic_max(atomic_max: &AtomicU64, new_value: u64) {
    let mut current_max = atomic_max.load(Ordering::Relaxed);
    while new_value > current_max {
        match atomic_max.compare_exchange_weak(
            current_max,
            new_value,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => break,
            Err(actual) => current_max = actual,
        }
    }
}

/// Lock-free metrics collector
///
/// All recording operations are lock-free using atomics.
/// The `report()` method atomically swaps window counters to get a
/// consistent snapshot.
pub struct Metrics {
    /// Total frames ever processed (monotonic)
    frames_total: AtomicU64,
    /// Frames since last report (reset on report)
    frames_since_report: AtomicU64,
    /// Frames with no person detected (monotonic)
    frames_no_person: AtomicU64,
    /// Sum of frame processing latencies in microseconds (reset on report)
    latency_sum_us: AtomicU64,
    /// Max frame processing latency in microseconds (reset on report)
    latency_max_us: AtomicU64,
    /// Predicate evaluation faults (monotonic)
    classify_faults: AtomicU64,
    /// Recorded poses (monotonic)
    poses_recorded: AtomicU64,
    /// Recorded poses by kind, indexed by `PoseKind::index()`
    pose_counts: [AtomicU64; POSE_COUNT],
    /// Completed sessions (monotonic)
    sessions_completed: AtomicU64,
    /// Successful cloud saves (monotonic)
    cloud_saves: AtomicU64,
    /// Failed cloud saves (monotonic)
    cloud_save_failures: AtomicU64,
    /// When this collector was created
    started: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            frames_total: AtomicU64::new(0),
            frames_since_report: AtomicU64::new(0),
            frames_no_person: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
            latency_max_us: AtomicU64::new(0),
            classify_faults: AtomicU64::new(0),
            poses_recorded: AtomicU64::new(0),
            pose_counts: std::array::from_fn(|_| AtomicU64::new(0)),
            sessions_completed: AtomicU64::new(0),
            cloud_saves: AtomicU64::new(0),
            cloud_save_failures: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    /// Record one processed frame and its pipeline latency
    pub fn record_frame(&self, no_person: bool, latency_us: u64) {
        self.frames_total.fetch_add(1, Ordering::Relaxed);
        self.frames_since_report.fetch_add(1, Ordering::Relaxed);
        if no_person {
            self.frames_no_person.fetch_add(1, Ordering::Relaxed);
        }
        self.latency_sum_us.fetch_add(latency_us, Ordering::Relaxed);
        update_atomic_max(&self.latency_max_us, latency_us);
    }

    /// Record a per-pose predicate evaluation fault
    pub fn record_classify_fault(&self) {
        self.classify_faults.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a pose that was held long enough to count
    pub fn record_pose(&self, pose: PoseKind) {
        self.poses_recorded.fetch_add(1, Ordering::Relaxed);
        self.pose_counts[pose.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_session_completed(&self) {
        self.sessions_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cloud_save(&self, ok: bool) {
        if ok {
            self.cloud_saves.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cloud_save_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Snapshot and reset the report window
    pub fn report(&self) -> MetricsSummary {
        let window_frames = self.frames_since_report.swap(0, Ordering::Relaxed);
        let latency_sum_us = self.latency_sum_us.swap(0, Ordering::Relaxed);
        let latency_max_us = self.latency_max_us.swap(0, Ordering::Relaxed);

        let latency_avg_us =
            if window_frames > 0 { latency_sum_us / window_frames } else { 0 };

        let mut pose_counts = [0u64; POSE_COUNT];
        for (i, counter) in self.pose_counts.iter().enumerate() {
            pose_counts[i] = counter.load(Ordering::Relaxed);
        }

        MetricsSummary {
            uptime_secs: self.started.elapsed().as_secs(),
            frames_total: self.frames_total.load(Ordering::Relaxed),
            window_frames,
            frames_no_person: self.frames_no_person.load(Ordering::Relaxed),
            latency_avg_us,
            latency_max_us,
            classify_faults: self.classify_faults.load(Ordering::Relaxed),
            poses_recorded: self.poses_recorded.load(Ordering::Relaxed),
            pose_counts,
            sessions_completed: self.sessions_completed.load(Ordering::Relaxed),
            cloud_saves: self.cloud_saves.load(Ordering::Relaxed),
            cloud_save_failures: self.cloud_save_failures.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A consistent snapshot of the collector
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub uptime_secs: u64,
    pub frames_total: u64,
    pub window_frames: u64,
    pub frames_no_person: u64,
    pub latency_avg_us: u64,
    pub latency_max_us: u64,
    pub classify_faults: u64,
    pub poses_recorded: u64,
    pub pose_counts: [u64; POSE_COUNT],
    pub sessions_completed: u64,
    pub cloud_saves: u64,
    pub cloud_save_failures: u64,
}

impl MetricsSummary {
    /// Emit the summary as a structured log line
    pub fn log(&self) {
        info!(
            uptime_secs = %self.uptime_secs,
            frames_total = %self.frames_total,
            window_frames = %self.window_frames,
            frames_no_person = %self.frames_no_person,
            latency_avg_us = %self.latency_avg_us,
            latency_max_us = %self.latency_max_us,
            classify_faults = %self.classify_faults,
            poses_recorded = %self.poses_recorded,
            sessions_completed = %self.sessions_completed,
            cloud_saves = %self.cloud_saves,
            cloud_save_failures = %self.cloud_save_failures,
            "metrics_report"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_counters() {
        let metrics = Metrics::new();
        metrics.record_frame(false, 120);
        metrics.record_frame(true, 80);
        metrics.record_frame(false, 200);

        let summary = metrics.report();
        assert_eq!(summary.frames_total, 3);
        assert_eq!(summary.window_frames, 3);
        assert_eq!(summary.frames_no_person, 1);
        assert_eq!(summary.latency_avg_us, (120 + 80 + 200) / 3);
        assert_eq!(summary.latency_max_us, 200);
    }

    #[test]
    fn test_report_resets_window() {
        let metrics = Metrics::new();
        metrics.record_frame(false, 100);
        metrics.report();

        let summary = metrics.report();
        assert_eq!(summary.frames_total, 1);
        assert_eq!(summary.window_frames, 0);
        assert_eq!(summary.latency_avg_us, 0);
        assert_eq!(summary.latency_max_us, 0);
    }

    #[test]
    fn test_pose_counters() {
        let metrics = Metrics::new();
        metrics.record_pose(PoseKind::Tree);
        metrics.record_pose(PoseKind::Tree);
        metrics.record_pose(PoseKind::WarriorTwo);

        let summary = metrics.report();
        assert_eq!(summary.poses_recorded, 3);
        assert_eq!(summary.pose_counts[PoseKind::Tree.index()], 2);
        assert_eq!(summary.pose_counts[PoseKind::WarriorTwo.index()], 1);
        assert_eq!(summary.pose_counts[PoseKind::Cobra.index()], 0);
    }

    #[test]
    fn test_fault_and_save_counters() {
        let metrics = Metrics::new();
        metrics.record_classify_fault();
        metrics.record_session_completed();
        metrics.record_cloud_save(true);
        metrics.record_cloud_save(false);

        let summary = metrics.report();
        assert_eq!(summary.classify_faults, 1);
        assert_eq!(summary.sessions_completed, 1);
        assert_eq!(summary.cloud_saves, 1);
        assert_eq!(summary.cloud_save_failures, 1);
    }

    #[test]
    fn test_atomic_max() {
        let max = AtomicU64::new(0);
        update_atomic_max(&max, 10);
        update_atomic_max(&max, 5);
        update_atomic_max(&max, 20);
        assert_eq!(max.load(Ordering::Relaxed), 20);
    }
}
