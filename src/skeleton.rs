use crate::core::Vec3;
use crate::error::{PanelError, PanelResult};

/// Closed set of joint names. Pose definitions may reference any of these;
/// whether a given skeleton actually carries the bone is an arena question.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BoneName {
    Spine,
    Neck,
    Head,
    UpperArmLeft,
    LowerArmLeft,
    HandLeft,
    UpperArmRight,
    LowerArmRight,
    HandRight,
    UpperLegLeft,
    LowerLegLeft,
    FootLeft,
    UpperLegRight,
    LowerLegRight,
    FootRight,
}

impl BoneName {
    /// Segment length in world units (character scale 1.0 is roughly 1.7
    /// units tall).
    pub fn segment_length(self) -> f64 {
        match self {
            Self::Spine => 0.52,
            Self::Neck => 0.10,
            Self::Head => 0.24,
            Self::UpperArmLeft | Self::UpperArmRight => 0.30,
            Self::LowerArmLeft | Self::LowerArmRight => 0.27,
            Self::HandLeft | Self::HandRight => 0.10,
            Self::UpperLegLeft | Self::UpperLegRight => 0.44,
            Self::LowerLegLeft | Self::LowerLegRight => 0.42,
            Self::FootLeft | Self::FootRight => 0.14,
        }
    }
}

/// One bone in the arena. `parent` is an index into the same arena and always
/// points at an earlier slot, so the hierarchy cannot form a cycle.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bone {
    pub name: BoneName,
    pub parent: Option<usize>,
    pub rest_rotation: Vec3,
    pub rest_position: Vec3,
}

/// Bone arena indexed by small integers (root = parent `None`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Skeleton {
    bones: Vec<Bone>,
}

impl Skeleton {
    pub fn new(bones: Vec<Bone>) -> PanelResult<Self> {
        for (i, bone) in bones.iter().enumerate() {
            if let Some(p) = bone.parent
                && p >= i
            {
                return Err(PanelError::validation(format!(
                    "bone {:?} at index {i} has parent index {p} that does not precede it",
                    bone.name
                )));
            }
            if bones[..i].iter().any(|b| b.name == bone.name) {
                return Err(PanelError::validation(format!(
                    "duplicate bone {:?} in arena",
                    bone.name
                )));
            }
        }
        Ok(Self { bones })
    }

    /// The standard 15-bone humanoid rig: spine root at the hips, arms
    /// hanging from the shoulders, legs from the hips.
    pub fn humanoid() -> Self {
        fn bone(name: BoneName, parent: Option<usize>) -> Bone {
            Bone {
                name,
                parent,
                rest_rotation: Vec3::ZERO,
                rest_position: Vec3::ZERO,
            }
        }

        // Parent indices refer to the order below; legs parent to the spine
        // root even though they anchor at its base rather than its end.
        let bones = vec![
            bone(BoneName::Spine, None),
            bone(BoneName::Neck, Some(0)),
            bone(BoneName::Head, Some(1)),
            bone(BoneName::UpperArmLeft, Some(0)),
            bone(BoneName::LowerArmLeft, Some(3)),
            bone(BoneName::HandLeft, Some(4)),
            bone(BoneName::UpperArmRight, Some(0)),
            bone(BoneName::LowerArmRight, Some(6)),
            bone(BoneName::HandRight, Some(7)),
            bone(BoneName::UpperLegLeft, Some(0)),
            bone(BoneName::LowerLegLeft, Some(9)),
            bone(BoneName::FootLeft, Some(10)),
            bone(BoneName::UpperLegRight, Some(0)),
            bone(BoneName::LowerLegRight, Some(12)),
            bone(BoneName::FootRight, Some(13)),
        ];
        Self::new(bones).expect("humanoid arena is well-formed")
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn index_of(&self, name: BoneName) -> Option<usize> {
        self.bones.iter().position(|b| b.name == name)
    }
}

/// Per-bone transform slot in a [`SkeletonState`].
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoneState {
    /// Euler rotation in radians. The renderer reads `x` as the in-plane
    /// joint angle.
    pub rotation: Vec3,
    /// Local position offset from the rest attachment point.
    pub position: Vec3,
}

/// Resolved transform set parallel to a skeleton's arena, plus the pose-level
/// look-at target and blend weight. Created fresh per panel; never shared.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SkeletonState {
    pub transforms: Vec<BoneState>,
    pub look_at: Option<Vec3>,
    pub weight: f64,
}

impl SkeletonState {
    /// State with every bone at its rest transform.
    pub fn rest(skeleton: &Skeleton) -> Self {
        let transforms = skeleton
            .bones()
            .iter()
            .map(|b| BoneState {
                rotation: b.rest_rotation,
                position: b.rest_position,
            })
            .collect();
        Self {
            transforms,
            look_at: None,
            weight: 1.0,
        }
    }

    pub fn rotation_of(&self, skeleton: &Skeleton, name: BoneName) -> Option<Vec3> {
        skeleton
            .index_of(name)
            .and_then(|i| self.transforms.get(i))
            .map(|t| t.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn humanoid_has_all_fifteen_bones() {
        let s = Skeleton::humanoid();
        assert_eq!(s.len(), 15);
        assert!(s.index_of(BoneName::Head).is_some());
        assert!(s.index_of(BoneName::FootRight).is_some());
    }

    #[test]
    fn parents_precede_children() {
        let s = Skeleton::humanoid();
        for (i, bone) in s.bones().iter().enumerate() {
            if let Some(p) = bone.parent {
                assert!(p < i);
            }
        }
    }

    #[test]
    fn forward_parent_reference_is_rejected() {
        let bones = vec![Bone {
            name: BoneName::Spine,
            parent: Some(0),
            rest_rotation: Vec3::ZERO,
            rest_position: Vec3::ZERO,
        }];
        assert!(Skeleton::new(bones).is_err());
    }

    #[test]
    fn duplicate_bone_is_rejected() {
        let mk = |parent| Bone {
            name: BoneName::Head,
            parent,
            rest_rotation: Vec3::ZERO,
            rest_position: Vec3::ZERO,
        };
        assert!(Skeleton::new(vec![mk(None), mk(Some(0))]).is_err());
    }

    #[test]
    fn rest_state_is_parallel_to_arena() {
        let s = Skeleton::humanoid();
        let state = SkeletonState::rest(&s);
        assert_eq!(state.transforms.len(), s.len());
        assert_eq!(state.weight, 1.0);
        assert!(state.look_at.is_none());
    }
}
