//! Shared landmark geometry checks
//!
//! Every pose predicate is a conjunction of these comparisons over a small
//! fixed subset of the landmark set. All coordinates are normalized [0,1]
//! image space with y increasing downward, so "above" means smaller y.
//! A missing joint surfaces as `LandmarkError` and is handled per pose by
//! the classifier.

use crate::domain::landmark::{Joint, LandmarkError, LandmarkSet};

/// Minimum shoulder-to-hip vertical extent for an upright torso
const TORSO_MIN_EXTENT: f64 = 0.2;

/// Maximum shoulder-to-wrist horizontal offset for arms hanging at the sides
const ARMS_AT_SIDES_MAX_DX: f64 = 0.15;

/// Maximum hip/knee/ankle horizontal offset for a straight leg
const LEG_STRAIGHT_MAX_DX: f64 = 0.1;

/// Minimum ankle height difference for a lifted foot
const ANKLE_LIFT_MIN_DY: f64 = 0.1;

/// Minimum ankle separation for a wide stance
const LEGS_SPREAD_MIN_DX: f64 = 0.3;

/// Minimum wrist extension beyond the shoulder for arms out to the sides
const ARMS_EXTENDED_MIN_DX: f64 = 0.15;

/// Minimum shoulder height difference for a sideways-bent torso
const SIDE_BEND_MIN_DY: f64 = 0.15;

/// Minimum wrist height split for one arm up / one arm down
const ARMS_SPLIT_MIN_DY: f64 = 0.3;

/// Image line below which hands/feet count as grounded
const FLOOR_LINE_Y: f64 = 0.7;

/// Image line above which hips count as raised
const HIPS_RAISED_MAX_Y: f64 = 0.6;

/// Minimum hip/knee/ankle vertical gap for a bent knee
const KNEE_BEND_MIN_DY: f64 = 0.1;

/// Minimum knee-to-ankle vertical gap for a straight supporting leg
const SUPPORT_LEG_MIN_DY: f64 = 0.1;

/// Balance factor when weight is clearly on one leg
const BALANCE_ONE_LEG: f64 = 0.9;

/// Balance factor when support is ambiguous
const BALANCE_AMBIGUOUS: f64 = 0.6;

/// Shoulders well above hips on both sides
pub fn torso_upright(set: &LandmarkSet) -> Result<bool, LandmarkError> {
    let left_shoulder = set.get(Joint::LeftShoulder)?;
    let right_shoulder = set.get(Joint::RightShoulder)?;
    let left_hip = set.get(Joint::LeftHip)?;
    let right_hip = set.get(Joint::RightHip)?;

    Ok((left_shoulder.y - left_hip.y).abs() > TORSO_MIN_EXTENT
        && (right_shoulder.y - right_hip.y).abs() > TORSO_MIN_EXTENT)
}

/// Wrists hanging close to the shoulder line
pub fn arms_at_sides(set: &LandmarkSet) -> Result<bool, LandmarkError> {
    let left_shoulder = set.get(Joint::LeftShoulder)?;
    let right_shoulder = set.get(Joint::RightShoulder)?;
    let left_wrist = set.get(Joint::LeftWrist)?;
    let right_wrist = set.get(Joint::RightWrist)?;

    Ok((left_shoulder.x - left_wrist.x).abs() < ARMS_AT_SIDES_MAX_DX
        && (right_shoulder.x - right_wrist.x).abs() < ARMS_AT_SIDES_MAX_DX)
}

/// Hip, knee and ankle vertically stacked on both legs
pub fn legs_straight(set: &LandmarkSet) -> Result<bool, LandmarkError> {
    let left_hip = set.get(Joint::LeftHip)?;
    let right_hip = set.get(Joint::RightHip)?;
    let left_knee = set.get(Joint::LeftKnee)?;
    let right_knee = set.get(Joint::RightKnee)?;
    let left_ankle = set.get(Joint::LeftAnkle)?;
    let right_ankle = set.get(Joint::RightAnkle)?;

    Ok((left_hip.x - left_knee.x).abs() < LEG_STRAIGHT_MAX_DX
        && (left_knee.x - left_ankle.x).abs() < LEG_STRAIGHT_MAX_DX
        && (right_hip.x - right_knee.x).abs() < LEG_STRAIGHT_MAX_DX
        && (right_knee.x - right_ankle.x).abs() < LEG_STRAIGHT_MAX_DX)
}

/// One foot lifted off the other's level
pub fn one_leg_lifted(set: &LandmarkSet) -> Result<bool, LandmarkError> {
    let left_ankle = set.get(Joint::LeftAnkle)?;
    let right_ankle = set.get(Joint::RightAnkle)?;

    Ok((left_ankle.y - right_ankle.y).abs() > ANKLE_LIFT_MIN_DY)
}

/// Both wrists above their shoulders
pub fn arms_raised(set: &LandmarkSet) -> Result<bool, LandmarkError> {
    let left_shoulder = set.get(Joint::LeftShoulder)?;
    let right_shoulder = set.get(Joint::RightShoulder)?;
    let left_wrist = set.get(Joint::LeftWrist)?;
    let right_wrist = set.get(Joint::RightWrist)?;

    Ok(left_wrist.y < left_shoulder.y && right_wrist.y < right_shoulder.y)
}

/// Ankles far apart horizontally
pub fn legs_spread(set: &LandmarkSet) -> Result<bool, LandmarkError> {
    let left_ankle = set.get(Joint::LeftAnkle)?;
    let right_ankle = set.get(Joint::RightAnkle)?;

    Ok((left_ankle.x - right_ankle.x).abs() > LEGS_SPREAD_MIN_DX)
}

/// Wrists pushed out past both shoulders
pub fn arms_extended_sides(set: &LandmarkSet) -> Result<bool, LandmarkError> {
    let left_shoulder = set.get(Joint::LeftShoulder)?;
    let right_shoulder = set.get(Joint::RightShoulder)?;
    let left_wrist = set.get(Joint::LeftWrist)?;
    let right_wrist = set.get(Joint::RightWrist)?;

    Ok(left_wrist.x < left_shoulder.x - ARMS_EXTENDED_MIN_DX
        && right_wrist.x > right_shoulder.x + ARMS_EXTENDED_MIN_DX)
}

/// Shoulder line clearly tilted
pub fn torso_bent_side(set: &LandmarkSet) -> Result<bool, LandmarkError> {
    let left_shoulder = set.get(Joint::LeftShoulder)?;
    let right_shoulder = set.get(Joint::RightShoulder)?;

    Ok((left_shoulder.y - right_shoulder.y).abs() > SIDE_BEND_MIN_DY)
}

/// One wrist high, one low
pub fn arms_vertical_split(set: &LandmarkSet) -> Result<bool, LandmarkError> {
    let left_wrist = set.get(Joint::LeftWrist)?;
    let right_wrist = set.get(Joint::RightWrist)?;

    Ok((left_wrist.y - right_wrist.y).abs() > ARMS_SPLIT_MIN_DY)
}

/// Hands and feet grounded with hips raised into an inverted V
pub fn inverted_v(set: &LandmarkSet) -> Result<bool, LandmarkError> {
    let left_hip = set.get(Joint::LeftHip)?;
    let right_hip = set.get(Joint::RightHip)?;
    let left_wrist = set.get(Joint::LeftWrist)?;
    let right_wrist = set.get(Joint::RightWrist)?;
    let left_ankle = set.get(Joint::LeftAnkle)?;
    let right_ankle = set.get(Joint::RightAnkle)?;

    Ok(left_wrist.y > FLOOR_LINE_Y
        && right_wrist.y > FLOOR_LINE_Y
        && left_ankle.y > FLOOR_LINE_Y
        && right_ankle.y > FLOOR_LINE_Y
        && left_hip.y < HIPS_RAISED_MAX_Y
        && right_hip.y < HIPS_RAISED_MAX_Y)
}

/// Wrists above elbows above shoulders, the prone chest-up press
pub fn chest_press_up(set: &LandmarkSet) -> Result<bool, LandmarkError> {
    let left_shoulder = set.get(Joint::LeftShoulder)?;
    let right_shoulder = set.get(Joint::RightShoulder)?;
    let left_elbow = set.get(Joint::LeftElbow)?;
    let right_elbow = set.get(Joint::RightElbow)?;
    let left_wrist = set.get(Joint::LeftWrist)?;
    let right_wrist = set.get(Joint::RightWrist)?;

    Ok(left_elbow.y < left_shoulder.y
        && right_elbow.y < right_shoulder.y
        && left_wrist.y < left_elbow.y
        && right_wrist.y < right_elbow.y)
}

/// Both knees dropped between hip and ankle level
pub fn knees_bent(set: &LandmarkSet) -> Result<bool, LandmarkError> {
    let left_hip = set.get(Joint::LeftHip)?;
    let right_hip = set.get(Joint::RightHip)?;
    let left_knee = set.get(Joint::LeftKnee)?;
    let right_knee = set.get(Joint::RightKnee)?;
    let left_ankle = set.get(Joint::LeftAnkle)?;
    let right_ankle = set.get(Joint::RightAnkle)?;

    Ok((left_knee.y - left_hip.y).abs() > KNEE_BEND_MIN_DY
        && (right_knee.y - right_hip.y).abs() > KNEE_BEND_MIN_DY
        && (left_knee.y - left_ankle.y).abs() > KNEE_BEND_MIN_DY
        && (right_knee.y - right_ankle.y).abs() > KNEE_BEND_MIN_DY)
}

/// Deviation of the shoulder/hip/ankle midpoints from a vertical line.
/// 0.0 is perfectly stacked; larger values mean more lean.
pub fn vertical_alignment_deviation(set: &LandmarkSet) -> Result<f64, LandmarkError> {
    let left_shoulder = set.get(Joint::LeftShoulder)?;
    let right_shoulder = set.get(Joint::RightShoulder)?;
    let left_hip = set.get(Joint::LeftHip)?;
    let right_hip = set.get(Joint::RightHip)?;
    let left_ankle = set.get(Joint::LeftAnkle)?;
    let right_ankle = set.get(Joint::RightAnkle)?;

    let shoulder_mid_x = (left_shoulder.x + right_shoulder.x) / 2.0;
    let hip_mid_x = (left_hip.x + right_hip.x) / 2.0;
    let ankle_mid_x = (left_ankle.x + right_ankle.x) / 2.0;

    Ok((shoulder_mid_x - hip_mid_x).abs() + (hip_mid_x - ankle_mid_x).abs())
}

/// How clearly the weight rests on a single straight leg.
/// 0.9 when exactly one knee-to-ankle gap reads straight, 0.6 otherwise.
pub fn balance_quality(set: &LandmarkSet) -> Result<f64, LandmarkError> {
    let left_knee = set.get(Joint::LeftKnee)?;
    let right_knee = set.get(Joint::RightKnee)?;
    let left_ankle = set.get(Joint::LeftAnkle)?;
    let right_ankle = set.get(Joint::RightAnkle)?;

    let left_leg_straight = (left_knee.y - left_ankle.y).abs() > SUPPORT_LEG_MIN_DY;
    let right_leg_straight = (right_knee.y - right_ankle.y).abs() > SUPPORT_LEG_MIN_DY;

    if left_leg_straight != right_leg_straight {
        Ok(BALANCE_ONE_LEG)
    } else {
        Ok(BALANCE_AMBIGUOUS)
    }
}
