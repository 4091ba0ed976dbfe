use std::collections::BTreeMap;
use std::sync::LazyLock;

use tracing::warn;

use crate::core::Vec3;
use crate::error::{PanelError, PanelResult};
use crate::skeleton::{BoneName, Skeleton, SkeletonState};

/// Name of the fallback pose every unknown-pose path resolves to.
pub const NEUTRAL_POSE: &str = "neutral";

/// Target transform for one bone inside a pose.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoneTransform {
    pub rotation: Vec3,
    /// Optional local position override; bones without one keep their
    /// current position when the pose is applied.
    pub position: Option<Vec3>,
}

/// Named target skeleton state. Bones omitted from the map keep whatever
/// transform they currently have, which makes repeated applications
/// composable rather than idempotent resets.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PoseDefinition {
    pub bones: BTreeMap<BoneName, BoneTransform>,
    pub look_at: Option<Vec3>,
    pub weight: Option<f64>,
}

impl PoseDefinition {
    fn from_rotations(rotations: &[(BoneName, f64)]) -> Self {
        let bones = rotations
            .iter()
            .map(|&(name, x)| {
                (
                    name,
                    BoneTransform {
                        rotation: Vec3::new(x, 0.0, 0.0),
                        position: None,
                    },
                )
            })
            .collect();
        Self {
            bones,
            look_at: None,
            weight: None,
        }
    }

    fn with_root_offset(mut self, offset: Vec3) -> Self {
        if let Some(bt) = self.bones.get_mut(&BoneName::Spine) {
            bt.position = Some(offset);
        } else {
            self.bones.insert(
                BoneName::Spine,
                BoneTransform {
                    rotation: Vec3::ZERO,
                    position: Some(offset),
                },
            );
        }
        self
    }

    fn with_look_at(mut self, target: Vec3) -> Self {
        self.look_at = Some(target);
        self
    }
}

impl SkeletonState {
    /// Apply a pose to this state. Only bones named by the definition are
    /// touched; names the arena does not carry are ignored.
    pub fn apply_pose(&mut self, skeleton: &Skeleton, pose: &PoseDefinition) {
        for (name, bt) in &pose.bones {
            let Some(i) = skeleton.index_of(*name) else {
                continue;
            };
            self.transforms[i].rotation = bt.rotation;
            if let Some(p) = bt.position {
                self.transforms[i].position = p;
            }
        }
        if pose.look_at.is_some() {
            self.look_at = pose.look_at;
        }
        if let Some(w) = pose.weight {
            self.weight = w.clamp(0.0, 1.0);
        }
    }
}

static POSES: LazyLock<BTreeMap<&'static str, PoseDefinition>> = LazyLock::new(|| {
    use BoneName::*;

    let mut map = BTreeMap::new();

    map.insert(NEUTRAL_POSE, PoseDefinition::from_rotations(&[]));

    map.insert(
        "standing",
        PoseDefinition::from_rotations(&[
            (UpperArmLeft, 0.06),
            (UpperArmRight, -0.06),
            (Head, 0.0),
        ]),
    );

    map.insert(
        "sitting",
        PoseDefinition::from_rotations(&[
            (Spine, 0.12),
            (UpperLegLeft, 1.45),
            (UpperLegRight, 1.45),
            (LowerLegLeft, -1.35),
            (LowerLegRight, -1.35),
            (UpperArmLeft, 0.30),
            (UpperArmRight, -0.30),
        ])
        .with_root_offset(Vec3::new(0.0, -0.42, 0.0)),
    );

    map.insert(
        "sitting_up",
        PoseDefinition::from_rotations(&[
            (Spine, 0.35),
            (Head, 0.10),
            (UpperLegLeft, 0.90),
            (UpperLegRight, 0.90),
            (LowerLegLeft, -0.50),
            (LowerLegRight, -0.50),
            (UpperArmLeft, 0.55),
            (UpperArmRight, -0.55),
        ])
        .with_root_offset(Vec3::new(0.0, -0.35, 0.0))
        .with_look_at(Vec3::new(0.0, 1.2, 1.0)),
    );

    map.insert(
        "lying",
        PoseDefinition::from_rotations(&[
            (Spine, -1.50),
            (Head, -0.20),
            (UpperLegLeft, 0.06),
            (UpperLegRight, 0.06),
            (LowerLegLeft, 0.04),
            (LowerLegRight, 0.04),
            (UpperArmLeft, 0.15),
            (UpperArmRight, -0.15),
        ])
        .with_root_offset(Vec3::new(0.0, -0.72, 0.0)),
    );

    map.insert(
        "walking",
        PoseDefinition::from_rotations(&[
            (UpperLegLeft, 0.45),
            (LowerLegLeft, -0.25),
            (UpperLegRight, -0.35),
            (LowerLegRight, -0.55),
            (UpperArmLeft, -0.35),
            (UpperArmRight, 0.35),
            (LowerArmRight, 0.25),
        ]),
    );

    map.insert(
        "waving",
        PoseDefinition::from_rotations(&[
            (UpperArmRight, -2.60),
            (LowerArmRight, -0.50),
            (HandRight, -0.30),
            (UpperArmLeft, 0.08),
            (Head, 0.05),
        ]),
    );

    map.insert(
        "arms_crossed",
        PoseDefinition::from_rotations(&[
            (UpperArmLeft, 0.90),
            (LowerArmLeft, 1.85),
            (UpperArmRight, -0.90),
            (LowerArmRight, -1.85),
        ]),
    );

    map.insert(
        "pointing",
        PoseDefinition::from_rotations(&[
            (UpperArmRight, -1.55),
            (LowerArmRight, -0.05),
            (HandRight, -0.10),
            (Head, 0.05),
        ])
        .with_look_at(Vec3::new(1.0, 1.4, 1.0)),
    );

    map.insert(
        "thinking",
        PoseDefinition::from_rotations(&[
            (UpperArmRight, -0.70),
            (LowerArmRight, -2.20),
            (Head, 0.15),
            (UpperArmLeft, 0.40),
        ]),
    );

    map
});

fn normalize_name(name: &str) -> String {
    name.trim()
        .to_ascii_lowercase()
        .replace(['-', ' '], "_")
}

/// Look up a pose by name. Unknown names are an error; callers that must not
/// abort use [`resolve_pose_or_neutral`].
pub fn resolve_pose(name: &str) -> PanelResult<&'static PoseDefinition> {
    let key = normalize_name(name);
    POSES
        .get(key.as_str())
        .ok_or_else(|| PanelError::unknown_pose(name))
}

/// Resolve a pose, falling back to the neutral standing pose with a warning
/// when the name is unknown. Returns the resolved canonical name.
pub fn resolve_pose_or_neutral(name: &str) -> (&'static str, &'static PoseDefinition) {
    let key = normalize_name(name);
    if let Some((k, def)) = POSES.get_key_value(key.as_str()) {
        return (k, def);
    }
    warn!(pose = name, "unknown pose, falling back to neutral");
    let (k, def) = POSES
        .get_key_value(NEUTRAL_POSE)
        .expect("neutral pose always present");
    (k, def)
}

pub fn pose_names() -> impl Iterator<Item = &'static str> {
    POSES.keys().copied()
}
