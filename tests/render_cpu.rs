use panelforge::core::{PanelBounds, Rgba8, Vec3};
use panelforge::descriptor::{CameraAngle, NO_CHARACTER_SENTINEL, VisualEffect};
use panelforge::render::primitives::{project_primitive, Primitive};
use panelforge::render::ViewCamera;
use panelforge::{
    CameraParams, PanelThreading, RenderSettings, SceneDescriptor, SceneParameters,
    render_panel, render_panels, render_scene,
};

fn settings(w: u32, h: u32) -> RenderSettings {
    RenderSettings::new(PanelBounds::new(w, h).unwrap())
}

fn bedroom_descriptor() -> SceneDescriptor {
    SceneDescriptor {
        camera_angle: CameraAngle::Middle,
        composition: "girl in front of the window, curtain behind her".to_string(),
        visual_effects: VisualEffect::Normal,
        character_details: "a girl in pajamas, smiling, standing by the window".to_string(),
        background: 1,
        background_details: "a bedroom in the morning with a bed, a window and a curtain"
            .to_string(),
    }
}

#[test]
fn rendered_panel_has_the_requested_dimensions() {
    let frame = render_panel(&bedroom_descriptor(), &settings(160, 120)).unwrap();
    assert_eq!(frame.width, 160);
    assert_eq!(frame.height, 120);
    assert_eq!(frame.data.len(), 160 * 120 * 4);
    assert!(frame.premultiplied);
}

#[test]
fn rendering_is_deterministic() {
    let s = settings(120, 90);
    let a = render_panel(&bedroom_descriptor(), &s).unwrap();
    let b = render_panel(&bedroom_descriptor(), &s).unwrap();
    assert_eq!(a, b);
}

#[test]
fn scene_with_background_differs_from_clear_panel() {
    let s = settings(80, 60);
    let mut empty = bedroom_descriptor();
    empty.background = 0;
    empty.character_details = NO_CHARACTER_SENTINEL.to_string();
    empty.composition = String::new();

    let full = render_panel(&bedroom_descriptor(), &s).unwrap();
    let blank = render_panel(&empty, &s).unwrap();
    assert_ne!(full.data, blank.data);
}

#[test]
fn non_finite_primitive_is_dropped_and_frame_completes() {
    let mut params = SceneParameters::neutral();
    params.character.visible = true;
    params.character.position = Vec3::new(f64::NAN, 0.0, 0.0);
    let (frame, meta) = render_scene(&params, &settings(64, 48)).unwrap();
    assert_eq!(frame.data.len(), 64 * 48 * 4);
    assert!(meta.primitives_skipped > 0);
    assert_eq!(meta.primitives_total, meta.primitives_skipped);
}

#[test]
fn primitive_behind_the_camera_projects_to_an_error() {
    let cam = ViewCamera::new(&CameraParams::default(), PanelBounds::new(64, 64).unwrap())
        .unwrap();
    let behind = Primitive::Sphere {
        center: Vec3::new(0.0, 1.0, 30.0),
        radius: 0.5,
        color: Rgba8::opaque(255, 0, 0),
    };
    assert!(project_primitive(&cam, &behind).is_err());
}

#[test]
fn past_effect_tints_the_panel_warm() {
    let s = settings(80, 60);
    let normal = render_panel(&bedroom_descriptor(), &s).unwrap();
    let mut past = bedroom_descriptor();
    past.visual_effects = VisualEffect::Past;
    let tinted = render_panel(&past, &s).unwrap();
    assert_ne!(normal.data, tinted.data);

    // Sepia pushes red above blue on average.
    let channel_sum = |data: &[u8], i: usize| -> u64 {
        data.chunks_exact(4).map(|p| u64::from(p[i])).sum()
    };
    assert!(channel_sum(&tinted.data, 0) > channel_sum(&tinted.data, 2));
}

#[test]
fn parallel_page_render_preserves_panel_order() {
    let s = settings(48, 48);
    let mut second = bedroom_descriptor();
    second.background_details = "a dim room at night".to_string();
    second.composition = String::new();
    let descriptors = vec![bedroom_descriptor(), second];

    let sequential = render_panels(&descriptors, &s, &PanelThreading::default()).unwrap();
    let parallel = render_panels(
        &descriptors,
        &s,
        &PanelThreading {
            parallel: true,
            threads: Some(2),
        },
    )
    .unwrap();
    assert_eq!(sequential.len(), 2);
    assert_eq!(sequential, parallel);
}
