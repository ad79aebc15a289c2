//! Pose catalog and per-frame classification result
//!
//! The pose set is closed and known at build time: a fixed enumeration of
//! kinds, each with a display label and a short description. The predicate
//! logic itself lives in `services::classifier`.

/// Number of registered poses
pub const POSE_COUNT: usize = 7;

/// Registered yoga poses.
///
/// Declaration order is load-bearing: the classifier scans `ALL` in order
/// with a strict greater-than comparison, so on an exact confidence tie the
/// first-declared pose wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoseKind {
    Mountain,
    Tree,
    WarriorTwo,
    Triangle,
    DownwardDog,
    Cobra,
    Chair,
}

impl PoseKind {
    /// All poses, in scan (and tie-break) order
    pub const ALL: [PoseKind; POSE_COUNT] = [
        PoseKind::Mountain,
        PoseKind::Tree,
        PoseKind::WarriorTwo,
        PoseKind::Triangle,
        PoseKind::DownwardDog,
        PoseKind::Cobra,
        PoseKind::Chair,
    ];

    /// Dense index for per-pose counters
    #[inline]
    pub fn index(self) -> usize {
        match self {
            PoseKind::Mountain => 0,
            PoseKind::Tree => 1,
            PoseKind::WarriorTwo => 2,
            PoseKind::Triangle => 3,
            PoseKind::DownwardDog => 4,
            PoseKind::Cobra => 5,
            PoseKind::Chair => 6,
        }
    }

    /// Full display label
    pub fn label(&self) -> &'static str {
        match self {
            PoseKind::Mountain => "Mountain Pose (Tadasana)",
            PoseKind::Tree => "Tree Pose (Vrikshasana)",
            PoseKind::WarriorTwo => "Warrior II (Virabhadrasana II)",
            PoseKind::Triangle => "Triangle Pose (Trikonasana)",
            PoseKind::DownwardDog => "Downward Dog (Adho Mukha Svanasana)",
            PoseKind::Cobra => "Cobra Pose (Bhujangasana)",
            PoseKind::Chair => "Chair Pose (Utkatasana)",
        }
    }

    /// First word of the label, the compact form used in saved documents
    pub fn short_label(&self) -> &'static str {
        match self {
            PoseKind::Mountain => "Mountain",
            PoseKind::Tree => "Tree",
            PoseKind::WarriorTwo => "Warrior",
            PoseKind::Triangle => "Triangle",
            PoseKind::DownwardDog => "Downward",
            PoseKind::Cobra => "Cobra",
            PoseKind::Chair => "Chair",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PoseKind::Mountain => "Standing straight, arms at sides",
            PoseKind::Tree => "Standing on one leg, foot on inner thigh",
            PoseKind::WarriorTwo => "Legs spread, arms extended to sides",
            PoseKind::Triangle => "Legs spread, body bent to side",
            PoseKind::DownwardDog => "Inverted V shape",
            PoseKind::Cobra => "Lying on stomach, chest up, arms pressing",
            PoseKind::Chair => "Knees bent, arms raised overhead",
        }
    }
}

impl std::fmt::Display for PoseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Label reported when no pose clears the detection threshold
pub const NO_POSE_LABEL: &str = "No pose detected";

/// Result of classifying one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Best-matching pose, or `None` below the detection threshold
    pub pose: Option<PoseKind>,
    /// Match quality in [0,1]; 0 when no pose is detected
    pub confidence: f64,
}

impl Classification {
    pub fn detected(pose: PoseKind, confidence: f64) -> Self {
        Self { pose: Some(pose), confidence }
    }

    pub fn none() -> Self {
        Self { pose: None, confidence: 0.0 }
    }

    pub fn is_detected(&self) -> bool {
        self.pose.is_some()
    }

    pub fn label(&self) -> &'static str {
        self.pose.map_or(NO_POSE_LABEL, |p| p.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_covers_every_kind() {
        assert_eq!(PoseKind::ALL.len(), POSE_COUNT);
        for (i, pose) in PoseKind::ALL.iter().enumerate() {
            assert_eq!(pose.index(), i);
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(PoseKind::Mountain.label(), "Mountain Pose (Tadasana)");
        assert_eq!(PoseKind::WarriorTwo.label(), "Warrior II (Virabhadrasana II)");
        assert_eq!(PoseKind::WarriorTwo.short_label(), "Warrior");
        assert_eq!(PoseKind::DownwardDog.short_label(), "Downward");
    }

    #[test]
    fn test_short_label_is_label_prefix() {
        for pose in PoseKind::ALL {
            assert_eq!(pose.label().split_whitespace().next().unwrap(), pose.short_label());
        }
    }

    #[test]
    fn test_classification_none() {
        let c = Classification::none();
        assert!(!c.is_detected());
        assert_eq!(c.confidence, 0.0);
        assert_eq!(c.label(), NO_POSE_LABEL);
    }

    #[test]
    fn test_classification_detected() {
        let c = Classification::detected(PoseKind::Tree, 0.765);
        assert!(c.is_detected());
        assert_eq!(c.label(), "Tree Pose (Vrikshasana)");
    }
}
