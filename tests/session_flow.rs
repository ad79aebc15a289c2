//! Integration tests: synthetic landmark frames through the full
//! classify -> hold -> session pipeline

use yogatrack::domain::landmark::{Joint, Landmark, LandmarkSet, LANDMARK_COUNT};
use yogatrack::domain::pose::PoseKind;
use yogatrack::infra::Config;
use yogatrack::services::SessionEngine;

/// Builds landmark sets joint by joint on a neutral body
struct FrameBuilder {
    points: Vec<Landmark>,
}

impl FrameBuilder {
    fn new() -> Self {
        Self { points: vec![Landmark::new(0.5, 0.5); LANDMARK_COUNT] }
    }

    fn joint(mut self, joint: Joint, x: f64, y: f64) -> Self {
        self.points[joint.index()] = Landmark::new(x, y);
        self
    }

    fn build(self) -> LandmarkSet {
        LandmarkSet::new(self.points)
    }
}

/// Legs spread wide, arms extended to the sides
fn warrior_two_frame() -> LandmarkSet {
    FrameBuilder::new()
        .joint(Joint::LeftShoulder, 0.4, 0.35)
        .joint(Joint::RightShoulder, 0.6, 0.35)
        .joint(Joint::LeftElbow, 0.28, 0.35)
        .joint(Joint::RightElbow, 0.72, 0.35)
        .joint(Joint::LeftWrist, 0.15, 0.35)
        .joint(Joint::RightWrist, 0.85, 0.35)
        .joint(Joint::LeftHip, 0.45, 0.6)
        .joint(Joint::RightHip, 0.55, 0.6)
        .joint(Joint::LeftKnee, 0.35, 0.75)
        .joint(Joint::RightKnee, 0.65, 0.75)
        .joint(Joint::LeftAnkle, 0.3, 0.9)
        .joint(Joint::RightAnkle, 0.7, 0.9)
        .build()
}

/// One foot lifted, arms raised overhead
fn tree_frame() -> LandmarkSet {
    FrameBuilder::new()
        .joint(Joint::LeftShoulder, 0.4, 0.35)
        .joint(Joint::RightShoulder, 0.6, 0.35)
        .joint(Joint::LeftWrist, 0.38, 0.2)
        .joint(Joint::RightWrist, 0.62, 0.2)
        .joint(Joint::LeftHip, 0.45, 0.6)
        .joint(Joint::RightHip, 0.55, 0.6)
        .joint(Joint::LeftKnee, 0.44, 0.75)
        .joint(Joint::RightKnee, 0.55, 0.72)
        .joint(Joint::LeftAnkle, 0.45, 0.9)
        .joint(Joint::RightAnkle, 0.68, 0.78)
        .build()
}

/// Neutral body that matches no pose
fn blank_frame() -> LandmarkSet {
    FrameBuilder::new().build()
}

fn engine() -> SessionEngine {
    SessionEngine::new(&Config::default())
}

#[test]
fn warrior_two_held_past_sustain_records_exactly_once() {
    let mut engine = engine();
    engine.start(0);

    let frame = warrior_two_frame();
    // 1200ms of continuous detection at ~30fps cadence
    let mut now = 0u64;
    while now <= 1200 {
        let result = engine.process_frame(Some(&frame), now).unwrap();
        assert_eq!(result.pose, Some(PoseKind::WarriorTwo));
        assert_eq!(result.confidence, 0.85);
        now += 33;
    }

    assert_eq!(engine.stats().count, 1);
    assert_eq!(engine.poses().len(), 1);

    let recorded = &engine.poses()[0];
    assert_eq!(recorded.name, "Warrior II (Virabhadrasana II)");
    assert_eq!(recorded.confidence, 0.85);
    // Emitted on the first frame at or past the sustain duration
    assert_eq!(recorded.ts, 1023);
}

#[test]
fn interrupted_tree_hold_times_from_second_occurrence() {
    let mut engine = engine();
    engine.start(0);

    let tree = tree_frame();
    let blank = blank_frame();

    // Tree for 500ms
    let mut now = 0u64;
    while now <= 500 {
        engine.process_frame(Some(&tree), now).unwrap();
        now += 50;
    }
    // Dropout for 100ms
    while now <= 600 {
        let result = engine.process_frame(Some(&blank), now).unwrap();
        assert!(!result.is_detected());
        now += 50;
    }
    // Tree again for 1100ms
    let second_start = now;
    while now <= second_start + 1100 {
        engine.process_frame(Some(&tree), now).unwrap();
        now += 50;
    }

    assert_eq!(engine.stats().count, 1);
    let recorded = &engine.poses()[0];
    assert_eq!(recorded.name, "Tree Pose (Vrikshasana)");
    // Balance refinement: 0.85 * 0.9
    assert!((recorded.confidence - 0.765).abs() < 1e-9);
    // Timed from the second occurrence, not the first
    assert!(recorded.ts >= second_start + 1000);
    assert!(recorded.ts < second_start + 1100);
}

#[test]
fn alternating_poses_below_sustain_record_nothing() {
    let mut engine = engine();
    engine.start(0);

    let warrior = warrior_two_frame();
    let tree = tree_frame();

    for step in 0..20u64 {
        let frame = if step % 2 == 0 { &warrior } else { &tree };
        engine.process_frame(Some(frame), step * 400);
    }

    assert_eq!(engine.stats().count, 0);
    assert!(engine.poses().is_empty());
}

#[test]
fn missing_person_frames_do_not_break_the_session() {
    let mut engine = engine();
    engine.start(0);

    let warrior = warrior_two_frame();

    engine.process_frame(None, 0);
    engine.process_frame(Some(&warrior), 100);
    engine.process_frame(None, 200);
    engine.process_frame(Some(&warrior), 300);
    engine.process_frame(Some(&warrior), 1300);

    // The streak restarted at 300ms and crossed sustain at 1300ms
    assert_eq!(engine.stats().count, 1);
}

#[test]
fn session_summary_aggregates_multiple_poses() {
    let mut engine = engine();
    engine.start(0);

    let warrior = warrior_two_frame();
    let tree = tree_frame();
    let blank = blank_frame();

    engine.process_frame(Some(&warrior), 0);
    engine.process_frame(Some(&warrior), 1000);
    engine.process_frame(Some(&blank), 1100);
    engine.process_frame(Some(&tree), 1200);
    engine.process_frame(Some(&tree), 2200);

    let summary = engine.end(3000);

    assert_eq!(summary.stats.count, 2);
    assert_eq!(summary.poses.len(), 2);
    // Warrior II (0.85) beats Tree (0.765)
    assert_eq!(summary.stats.best_pose.as_deref(), Some("Warrior II (Virabhadrasana II)"));
    // (0.85 + 0.765) / 2 = 0.8075 -> 81%
    assert_eq!(summary.stats.avg_confidence_pct(), 81);
    assert_eq!(summary.duration_mm_ss(), "00:03");

    // Log order is insertion order, newest last
    assert_eq!(summary.poses[0].name, "Warrior II (Virabhadrasana II)");
    assert_eq!(summary.poses[1].name, "Tree Pose (Vrikshasana)");
}

#[test]
fn ending_a_session_clears_state_for_the_next() {
    let mut engine = engine();
    engine.start(0);

    let warrior = warrior_two_frame();
    engine.process_frame(Some(&warrior), 0);
    engine.process_frame(Some(&warrior), 1000);

    let first = engine.end(2000);
    assert_eq!(first.stats.count, 1);

    engine.start(10_000);
    assert_eq!(engine.stats().count, 0);
    assert!(engine.poses().is_empty());

    // A hold from the previous session never leaks into the new one
    engine.process_frame(Some(&warrior), 10_000);
    assert_eq!(engine.stats().count, 0);

    let second = engine.end(11_000);
    assert_eq!(second.stats.count, 0);
    assert!(second.stats.best_pose.is_none());
    assert_ne!(first.sid, second.sid);
}
