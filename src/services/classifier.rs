//! Pose classification
//!
//! Maps one frame's landmark set to the best-matching pose and a confidence
//! score. Each registered pose is an independent predicate; a matching
//! predicate earns a fixed base confidence which two poses refine with
//! secondary geometry. The scan keeps the maximum with a strict
//! greater-than, so the first pose in `PoseKind::ALL` wins exact ties.

use crate::domain::landmark::{LandmarkError, LandmarkSet};
use crate::domain::pose::{Classification, PoseKind};
use crate::infra::metrics::Metrics;
use crate::services::geometry;
use std::sync::Arc;
use tracing::warn;

/// Confidence granted to any matching predicate before refinement
pub const BASE_CONFIDENCE: f64 = 0.85;

/// Minimum confidence for a classification to count as a detection
pub const DEFAULT_DETECTION_THRESHOLD: f64 = 0.65;

/// Alignment penalty weight for the standing-straight refinement
const ALIGNMENT_PENALTY: f64 = 0.5;

/// Evaluate one pose's predicate against a landmark set
fn matches(pose: PoseKind, set: &LandmarkSet) -> Result<bool, LandmarkError> {
    match pose {
        PoseKind::Mountain => Ok(geometry::torso_upright(set)?
            && geometry::arms_at_sides(set)?
            && geometry::legs_straight(set)?),
        PoseKind::Tree => Ok(geometry::one_leg_lifted(set)? && geometry::arms_raised(set)?),
        PoseKind::WarriorTwo => {
            Ok(geometry::legs_spread(set)? && geometry::arms_extended_sides(set)?)
        }
        PoseKind::Triangle => Ok(geometry::legs_spread(set)?
            && geometry::torso_bent_side(set)?
            && geometry::arms_vertical_split(set)?),
        PoseKind::DownwardDog => geometry::inverted_v(set),
        PoseKind::Cobra => geometry::chest_press_up(set),
        PoseKind::Chair => Ok(geometry::knees_bent(set)? && geometry::arms_raised(set)?),
    }
}

/// Refine a matched pose's base confidence from secondary geometry.
/// Only the standing-straight and single-leg-balance poses carry a
/// refinement; the result is clamped to [0,1] on every path.
fn refine(pose: PoseKind, set: &LandmarkSet, base: f64) -> Result<f64, LandmarkError> {
    let factor = match pose {
        PoseKind::Mountain => {
            1.0 - ALIGNMENT_PENALTY * geometry::vertical_alignment_deviation(set)?
        }
        PoseKind::Tree => geometry::balance_quality(set)?,
        _ => 1.0,
    };
    Ok((base * factor).clamp(0.0, 1.0))
}

/// Per-frame pose classifier
pub struct PoseClassifier {
    threshold: f64,
    metrics: Option<Arc<Metrics>>,
}

impl PoseClassifier {
    pub fn new(threshold: f64) -> Self {
        Self { threshold, metrics: None }
    }

    pub fn with_metrics(threshold: f64, metrics: Arc<Metrics>) -> Self {
        Self { threshold, metrics: Some(metrics) }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Classify one frame.
    ///
    /// Scans every registered pose; a predicate fault (missing landmark)
    /// is logged, counted, and treated as a non-match for that pose only.
    /// Returns the maximal-confidence pose when it is strictly above the
    /// detection threshold, otherwise "no pose detected" at confidence 0.
    pub fn classify(&self, set: &LandmarkSet) -> Classification {
        let mut best: Option<PoseKind> = None;
        let mut highest = 0.0f64;

        for pose in PoseKind::ALL {
            let confidence = match self.evaluate(pose, set) {
                Ok(confidence) => confidence,
                Err(e) => {
                    warn!(pose = %pose.label(), error = %e, "pose_check_failed");
                    if let Some(metrics) = &self.metrics {
                        metrics.record_classify_fault();
                    }
                    0.0
                }
            };

            if confidence > highest {
                highest = confidence;
                best = Some(pose);
            }
        }

        match best {
            Some(pose) if highest > self.threshold => Classification::detected(pose, highest),
            _ => Classification::none(),
        }
    }

    fn evaluate(&self, pose: PoseKind, set: &LandmarkSet) -> Result<f64, LandmarkError> {
        if !matches(pose, set)? {
            return Ok(0.0);
        }
        refine(pose, set, BASE_CONFIDENCE)
    }
}
