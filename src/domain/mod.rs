//! Domain models - core types for pose tracking
//!
//! This module contains the canonical data types used throughout the system:
//! - `Landmark` / `LandmarkSet` - one frame of estimator output
//! - `Joint` - named landmark indices
//! - `PoseKind` / `Classification` - the closed pose catalog and per-frame result
//! - `RecordedPose` / `SessionStats` / `SessionSummary` - the session log model

pub mod landmark;
pub mod pose;
pub mod session;

// Re-export commonly used types at module level
