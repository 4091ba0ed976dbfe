use panelforge::descriptor::{CameraAngle, NO_CHARACTER_SENTINEL, VisualEffect};
use panelforge::params::{CameraKind, FilterKind, LayoutKind, PostProcess, PropKind};
use panelforge::{SceneDescriptor, map, map_with_report};

fn descriptor(
    angle: CameraAngle,
    composition: &str,
    effects: VisualEffect,
    character: &str,
    background: u8,
    background_details: &str,
) -> SceneDescriptor {
    SceneDescriptor {
        camera_angle: angle,
        composition: composition.to_string(),
        visual_effects: effects,
        character_details: character.to_string(),
        background,
        background_details: background_details.to_string(),
    }
}

#[test]
fn near_empty_panel_maps_to_close_camera() {
    let d = descriptor(
        CameraAngle::Near,
        "",
        VisualEffect::Normal,
        NO_CHARACTER_SENTINEL,
        0,
        "",
    );
    let p = map(&d).unwrap();
    assert!(!p.character.visible);
    assert!((p.camera.position.z - 2.0).abs() < 1e-9);
    assert_eq!(p.camera.fov, 60.0);
    assert_eq!(p.camera.kind, CameraKind::CloseUp);
}

#[test]
fn depth_phrase_pairs_produce_layered_composition() {
    let d = descriptor(
        CameraAngle::Middle,
        "the girl in front of the window and the curtain behind the bed",
        VisualEffect::Normal,
        "a girl standing",
        1,
        "a bedroom with a bed, a window and a curtain",
    );
    let p = map(&d).unwrap();
    assert_eq!(p.composition.layout, LayoutKind::DepthLayered);
    assert!(!p.composition.foreground.is_empty());
    assert!(!p.composition.background.is_empty());
}

#[test]
fn past_effect_maps_to_sepia_profile() {
    let d = descriptor(
        CameraAngle::Far,
        "",
        VisualEffect::Past,
        NO_CHARACTER_SENTINEL,
        0,
        "",
    );
    let p = map(&d).unwrap();
    assert_eq!(p.effects.filter, FilterKind::Sepia);
    assert_eq!(p.effects.intensity, 0.8);
    assert!(p.effects.post_processing.contains(&PostProcess::Vignette));
}

#[test]
fn fov_stays_in_bounds_for_every_angle_and_phrase_combination() {
    let phrases = [
        "",
        "pulled back to show the whole room",
        "looking up at the subject in the foreground",
        "gazing out the window, looking down, looking away, pulled back",
    ];
    for angle in [CameraAngle::Near, CameraAngle::Middle, CameraAngle::Far] {
        for phrase in phrases {
            let d = descriptor(
                angle,
                phrase,
                VisualEffect::Normal,
                "a girl",
                0,
                "",
            );
            let p = map(&d).unwrap();
            assert!(
                (panelforge::mapper::FOV_MIN..=panelforge::mapper::FOV_MAX)
                    .contains(&p.camera.fov),
                "fov {} out of range for {angle:?} / {phrase:?}",
                p.camera.fov
            );
            assert!(p.camera.near < p.camera.far);
        }
    }
}

#[test]
fn bedroom_morning_scene_maps_end_to_end() {
    let d = descriptor(
        CameraAngle::Middle,
        "girl sitting up in bed, curtain in front of the window",
        VisualEffect::Emotional,
        "a girl in pajamas with long hair, smiling, sitting up from bed",
        1,
        "a bedroom in the morning with a bed by the window and a curtain",
    );
    let (p, report) = map_with_report(&d).unwrap();

    assert!(p.character.visible);
    assert_eq!(p.character.pose, "sitting_up");
    assert_eq!(p.character.expression, "happy");
    assert_eq!(
        p.character.attributes.get("clothing").map(String::as_str),
        Some("pajamas")
    );

    assert!(p.background.visible);
    assert_eq!(p.background.environment, "bedroom");
    assert_eq!(p.background.lighting, "morning");
    let kinds: Vec<_> = p.background.props.iter().map(|pr| pr.kind).collect();
    assert!(kinds.contains(&PropKind::Bed));
    assert!(kinds.contains(&PropKind::Window));
    assert!(kinds.contains(&PropKind::Curtain));

    assert_eq!(p.effects.filter, FilterKind::SoftGlow);
    assert!(report.fired_rules.iter().any(|r| r.contains("environment")));
}

#[test]
fn mapping_is_deterministic_across_repeated_calls() {
    let d = descriptor(
        CameraAngle::Far,
        "the bed behind the desk",
        VisualEffect::Deformed,
        "a boy in a school uniform, angry, pointing",
        1,
        "a classroom at night",
    );
    let a = map(&d).unwrap();
    let b = map(&d).unwrap();
    assert_eq!(a.camera, b.camera);
    assert_eq!(a.character, b.character);
    assert_eq!(a.background, b.background);
    assert_eq!(a.composition, b.composition);
    assert_eq!(a.effects, b.effects);
}

#[test]
fn invalid_background_flag_is_rejected() {
    let mut d = descriptor(
        CameraAngle::Near,
        "",
        VisualEffect::Normal,
        NO_CHARACTER_SENTINEL,
        0,
        "",
    );
    d.background = 2;
    assert!(map(&d).is_err());
}

#[test]
fn descriptor_json_round_trips_through_serde() {
    let json = r#"{
        "cameraAngle": "near",
        "composition": "girl in front of the window",
        "visualEffects": "emotional",
        "characterDetails": "a girl in pajamas",
        "background": 1,
        "backgroundDetails": "a bedroom in the morning"
    }"#;
    let d: SceneDescriptor = serde_json::from_str(json).unwrap();
    assert_eq!(d.camera_angle, CameraAngle::Near);
    assert_eq!(d.visual_effects, VisualEffect::Emotional);
    let p = map(&d).unwrap();
    assert!(p.character.visible);
    assert!(p.background.visible);
}
