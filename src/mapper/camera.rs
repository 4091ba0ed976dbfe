use crate::core::Vec3;
use crate::descriptor::SceneDescriptor;
use crate::params::CameraParams;

use super::tables::{CAMERA_PHRASES, camera_profile};

pub const FOV_MIN: f64 = 10.0;
pub const FOV_MAX: f64 = 120.0;

/// Map the camera-angle enum plus composition phrases to camera parameters.
///
/// The base profile comes from the fixed angle table; each matched phrase
/// contributes an independent additive nudge, so the result does not depend
/// on phrase order.
pub fn map_camera(descriptor: &SceneDescriptor, fired: &mut Vec<String>) -> CameraParams {
    let profile = camera_profile(descriptor.camera_angle);
    let mut position = Vec3::new(0.0, 1.4, profile.distance);
    let mut target = Vec3::new(0.0, 1.0, 0.0);

    let haystack = descriptor.composition.to_ascii_lowercase();
    for rule in CAMERA_PHRASES {
        if rule.phrases.iter().any(|p| haystack.contains(p)) {
            position = position + rule.position_offset;
            target = target + rule.target_offset;
            fired.push(format!("camera.{}", rule.name));
        }
    }

    CameraParams {
        position,
        target,
        fov: profile.fov.clamp(FOV_MIN, FOV_MAX),
        near: 0.1,
        far: 100.0,
        kind: profile.kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{CameraAngle, VisualEffect};

    fn descriptor(angle: CameraAngle, composition: &str) -> SceneDescriptor {
        SceneDescriptor {
            camera_angle: angle,
            composition: composition.to_string(),
            visual_effects: VisualEffect::Normal,
            character_details: String::new(),
            background: 0,
            background_details: String::new(),
        }
    }

    #[test]
    fn near_angle_places_camera_close() {
        let mut fired = vec![];
        let cam = map_camera(&descriptor(CameraAngle::Near, ""), &mut fired);
        assert!((cam.position.z - 2.0).abs() < 1e-9);
        assert_eq!(cam.fov, 60.0);
        assert!(fired.is_empty());
    }

    #[test]
    fn phrase_nudges_are_additive_and_order_independent() {
        let mut fired_a = vec![];
        let a = map_camera(
            &descriptor(CameraAngle::Middle, "pulled back view, whole room visible"),
            &mut fired_a,
        );
        let mut fired_b = vec![];
        let b = map_camera(
            &descriptor(CameraAngle::Middle, "whole room visible and a pulled back view"),
            &mut fired_b,
        );
        assert_eq!(a.position, b.position);
        assert_eq!(a.target, b.target);
        assert_eq!(fired_a.len(), 2);
        // Both nudges pushed the camera further out than the base profile.
        assert!(a.position.z > 5.0 + 2.5);
    }

    #[test]
    fn fov_stays_in_contract_range() {
        for angle in [CameraAngle::Near, CameraAngle::Middle, CameraAngle::Far] {
            let mut fired = vec![];
            let cam = map_camera(&descriptor(angle, "looking up at the ceiling"), &mut fired);
            assert!(cam.fov >= FOV_MIN && cam.fov <= FOV_MAX);
        }
    }
}
