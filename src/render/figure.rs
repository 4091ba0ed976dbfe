use crate::core::{Rgba8, Vec3};
use crate::expression::{BlendChannel, ExpressionDefinition};
use crate::params::CharacterParams;
use crate::skeleton::{BoneName, Skeleton, SkeletonState};

use super::primitives::{DrawCategory, Primitive, ScenePrimitive};

/// Build the character's primitives from a resolved skeleton state.
///
/// The figure is a chain of capsules computed with planar trigonometry: each
/// bone's `rotation.x` is its in-plane joint angle, chains accumulate angles
/// from the root outward, and the character's `rotation.y` yaws the whole
/// plane around the vertical axis. This is deliberately not a matrix rig.
pub fn character_primitives(
    character: &CharacterParams,
    skeleton: &Skeleton,
    state: &SkeletonState,
    expression: &ExpressionDefinition,
) -> Vec<ScenePrimitive> {
    if !character.visible {
        return Vec::new();
    }

    let frame = FigureFrame::new(character);
    let palette = FigurePalette::for_character(character);
    let angle = |name| {
        state
            .rotation_of(skeleton, name)
            .map(|r| r.x)
            .unwrap_or(0.0)
    };
    let root_offset = skeleton
        .index_of(BoneName::Spine)
        .and_then(|i| state.transforms.get(i))
        .map(|t| t.position)
        .unwrap_or(Vec3::ZERO);

    let mut out = Vec::new();
    let mut push = |shape| {
        out.push(ScenePrimitive {
            category: DrawCategory::Character,
            shape,
        })
    };

    // Hip height assumes straight legs; the pose's root offset lowers it for
    // sitting and lying poses.
    let leg_reach = BoneName::UpperLegLeft.segment_length()
        + BoneName::LowerLegLeft.segment_length()
        + 0.05;
    let hip = Vec3::new(root_offset.x, leg_reach + root_offset.y, root_offset.z);

    // Legs: sagittal chains, angle 0 pointing straight down, positive
    // swinging the limb forward.
    for (side, upper, lower) in [
        (-1.0, BoneName::UpperLegLeft, BoneName::LowerLegLeft),
        (1.0, BoneName::UpperLegRight, BoneName::LowerLegRight),
    ] {
        let hip_side = hip + Vec3::new(side * 0.10, 0.0, 0.0);
        let a1 = angle(upper);
        let l1 = upper.segment_length();
        let knee = hip_side + Vec3::new(0.0, -a1.cos() * l1, a1.sin() * l1);
        let a2 = a1 + angle(lower);
        let l2 = lower.segment_length();
        let ankle = knee + Vec3::new(0.0, -a2.cos() * l2, a2.sin() * l2);

        push(Primitive::Cylinder {
            bottom: frame.place(knee),
            top: frame.place(hip_side),
            radius: 0.075 * frame.scale,
            color: palette.legs,
        });
        push(Primitive::Cylinder {
            bottom: frame.place(ankle),
            top: frame.place(knee),
            radius: 0.06 * frame.scale,
            color: palette.legs,
        });
        push(Primitive::Sphere {
            center: frame.place(ankle + Vec3::new(0.0, -0.02, 0.08)),
            radius: 0.065 * frame.scale,
            color: palette.shoes,
        });
    }

    // Torso, neck and head continue the sagittal chain upward.
    let spine_angle = angle(BoneName::Spine);
    let spine_len = BoneName::Spine.segment_length();
    let chest = hip
        + Vec3::new(
            0.0,
            spine_angle.cos() * spine_len,
            spine_angle.sin() * spine_len,
        );
    push(Primitive::Cylinder {
        bottom: frame.place(hip),
        top: frame.place(chest),
        radius: 0.14 * frame.scale,
        color: palette.torso,
    });

    let neck_angle = spine_angle + angle(BoneName::Neck);
    let neck_len = BoneName::Neck.segment_length();
    let neck_top = chest
        + Vec3::new(0.0, neck_angle.cos() * neck_len, neck_angle.sin() * neck_len);
    push(Primitive::Cylinder {
        bottom: frame.place(chest),
        top: frame.place(neck_top),
        radius: 0.05 * frame.scale,
        color: palette.skin,
    });

    let head_angle = neck_angle + angle(BoneName::Head);
    let head_radius = BoneName::Head.segment_length() / 2.0;
    let head_center = neck_top
        + Vec3::new(
            0.0,
            head_angle.cos() * head_radius,
            head_angle.sin() * head_radius,
        );
    // Hair cap behind, then the head itself.
    push(Primitive::Sphere {
        center: frame.place(head_center + Vec3::new(0.0, 0.025, -0.03)),
        radius: head_radius * 1.06 * frame.scale,
        color: palette.hair,
    });
    push(Primitive::Sphere {
        center: frame.place(head_center),
        radius: head_radius * frame.scale,
        color: palette.skin,
    });

    // Arms: coronal chains hanging from the shoulders, angle 0 pointing
    // straight down. The sign convention makes positive-left/negative-right
    // pairs swing symmetrically outward.
    for (side, upper, lower) in [
        (-1.0, BoneName::UpperArmLeft, BoneName::LowerArmLeft),
        (1.0, BoneName::UpperArmRight, BoneName::LowerArmRight),
    ] {
        let shoulder = chest + Vec3::new(side * 0.19, -0.03, 0.0);
        let a1 = angle(upper);
        let l1 = upper.segment_length();
        let elbow = shoulder + Vec3::new(-a1.sin() * l1, -a1.cos() * l1, 0.0);
        let a2 = a1 + angle(lower);
        let l2 = lower.segment_length();
        let wrist = elbow + Vec3::new(-a2.sin() * l2, -a2.cos() * l2, 0.0);

        push(Primitive::Cylinder {
            bottom: frame.place(elbow),
            top: frame.place(shoulder),
            radius: 0.055 * frame.scale,
            color: palette.torso,
        });
        push(Primitive::Cylinder {
            bottom: frame.place(wrist),
            top: frame.place(elbow),
            radius: 0.045 * frame.scale,
            color: palette.skin,
        });
        push(Primitive::Sphere {
            center: frame.place(wrist),
            radius: 0.05 * frame.scale,
            color: palette.skin,
        });
    }

    // Face features only when the head roughly faces the camera.
    if frame.yaw_cos > 0.3 {
        face_primitives(&frame, head_center, head_radius, expression, &palette, &mut push);
    }

    out
}

fn face_primitives(
    frame: &FigureFrame,
    head_center: Vec3,
    head_radius: f64,
    expression: &ExpressionDefinition,
    palette: &FigurePalette,
    push: &mut impl FnMut(Primitive),
) {
    let w = |c| expression.weight(c);
    let face_depth = head_radius * 0.9;

    // Eyes: widened by EyeWide, squeezed toward closed by EyeClose.
    let eye_r = (0.022 * (1.0 + 0.6 * w(BlendChannel::EyeWide))
        * (1.0 - 0.8 * w(BlendChannel::EyeClose)))
    .max(0.005);
    for side in [-1.0, 1.0] {
        let eye = head_center + Vec3::new(side * 0.048, 0.015, face_depth);
        push(Primitive::Sphere {
            center: frame.place(eye),
            radius: eye_r * frame.scale,
            color: palette.eyes,
        });

        // Brows ride up with BrowRaise and tilt inward with BrowFurrow.
        let brow_lift = 0.045 + 0.02 * w(BlendChannel::BrowRaise);
        let inner_drop = 0.015 * w(BlendChannel::BrowFurrow);
        let brow = head_center + Vec3::new(side * 0.048, 0.015 + brow_lift, face_depth);
        push(Primitive::Cylinder {
            bottom: frame.place(brow + Vec3::new(side * 0.022, 0.004, 0.0)),
            top: frame.place(brow + Vec3::new(-side * 0.02, -inner_drop, 0.0)),
            radius: 0.006 * frame.scale,
            color: palette.hair.darken(0.3),
        });
    }

    // Mouth: a flat lens widened by smiling and opened into an ellipse by
    // MouthOpen; frowning pulls it lower.
    let smile = w(BlendChannel::MouthSmile);
    let frown = w(BlendChannel::MouthFrown);
    let open = w(BlendChannel::MouthOpen);
    let mouth_y = -0.055 - 0.012 * frown;
    let mouth_w = 0.030 * (1.0 + 0.45 * smile);
    let mouth_h = (0.006 + 0.030 * open).max(0.006);
    let mouth = head_center + Vec3::new(0.0, mouth_y, face_depth);
    push(Primitive::Cylinder {
        bottom: frame.place(mouth + Vec3::new(-mouth_w, 0.0, 0.0)),
        top: frame.place(mouth + Vec3::new(mouth_w, 0.0, 0.0)),
        radius: (mouth_h / 2.0).max(0.004) * frame.scale,
        color: palette.mouth,
    });
}

/// Character-local frame: yaw about the vertical axis, then uniform scale,
/// then translation to the character's world position.
struct FigureFrame {
    origin: Vec3,
    yaw_sin: f64,
    yaw_cos: f64,
    scale: f64,
}

impl FigureFrame {
    fn new(character: &CharacterParams) -> Self {
        Self {
            origin: character.position,
            yaw_sin: character.rotation.y.sin(),
            yaw_cos: character.rotation.y.cos(),
            scale: character.scale,
        }
    }

    /// Local-to-world: local +z faces the camera when yaw is 0.
    fn place(&self, local: Vec3) -> Vec3 {
        let x = local.x * self.yaw_cos + local.z * self.yaw_sin;
        let z = -local.x * self.yaw_sin + local.z * self.yaw_cos;
        Vec3::new(
            self.origin.x + x * self.scale,
            self.origin.y + local.y * self.scale,
            self.origin.z + z * self.scale,
        )
    }
}

struct FigurePalette {
    skin: Rgba8,
    hair: Rgba8,
    torso: Rgba8,
    legs: Rgba8,
    shoes: Rgba8,
    eyes: Rgba8,
    mouth: Rgba8,
}

impl FigurePalette {
    fn for_character(character: &CharacterParams) -> Self {
        let skin = match character.attributes.get("skin_tone").map(String::as_str) {
            Some("pale") => Rgba8::opaque(248, 226, 210),
            Some("tan") => Rgba8::opaque(214, 172, 136),
            Some("dark") => Rgba8::opaque(146, 104, 76),
            _ => Rgba8::opaque(238, 206, 184),
        };
        let (torso, legs) = match character.attributes.get("clothing").map(String::as_str) {
            Some("pajamas") => (Rgba8::opaque(226, 200, 222), Rgba8::opaque(214, 186, 212)),
            Some("school_uniform") => (Rgba8::opaque(58, 70, 110), Rgba8::opaque(48, 54, 72)),
            Some("dress") => (Rgba8::opaque(222, 120, 130), Rgba8::opaque(222, 120, 130)),
            Some("suit") => (Rgba8::opaque(64, 64, 72), Rgba8::opaque(56, 56, 62)),
            _ => (Rgba8::opaque(120, 150, 190), Rgba8::opaque(90, 100, 120)),
        };
        Self {
            skin,
            hair: Rgba8::opaque(74, 54, 44),
            torso,
            legs,
            shoes: Rgba8::opaque(70, 62, 58),
            eyes: Rgba8::opaque(40, 34, 34),
            mouth: Rgba8::opaque(168, 80, 86),
        }
    }
}
