use kurbo::Shape;
use rayon::prelude::*;
use tracing::warn;

use crate::core::{PanelBounds, Rgba8};
use crate::descriptor::SceneDescriptor;
use crate::error::{PanelError, PanelResult};
use crate::expression::resolve_expression_or_neutral;
use crate::mapper;
use crate::params::{BackgroundParams, CameraKind, SceneParameters};
use crate::pose::resolve_pose_or_neutral;
use crate::skeleton::{Skeleton, SkeletonState};

use super::camera::ViewCamera;
use super::cpu::{RasterFrame, rasterize};
use super::environment::background_primitives;
use super::figure::character_primitives;
use super::post::apply_effects;
use super::primitives::{FillCmd, project_primitive};

/// Panel-level render settings shared by every panel on a page.
#[derive(Clone, Debug)]
pub struct RenderSettings {
    pub bounds: PanelBounds,
    /// Clear color for panels whose background is invisible (and for any
    /// uncovered pixels).
    pub clear: Rgba8,
}

impl RenderSettings {
    pub fn new(bounds: PanelBounds) -> Self {
        Self {
            bounds,
            clear: Rgba8::opaque(236, 236, 240),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PanelThreading {
    pub parallel: bool,
    pub threads: Option<usize>,
}

impl Default for PanelThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
        }
    }
}

/// Per-panel render diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderMeta {
    pub primitives_total: usize,
    pub primitives_skipped: usize,
    /// Canonical pose and expression names after fallback resolution.
    pub pose: String,
    pub expression: String,
    pub camera_kind: CameraKind,
}

/// Render already-mapped scene parameters into a raster frame.
///
/// Primitives are painted in fixed category order (backdrop, furniture,
/// character, foreground); any primitive that fails projection is skipped
/// with a warning rather than failing the panel.
#[tracing::instrument(skip(params, settings), fields(pose = %params.character.pose))]
pub fn render_scene(
    params: &SceneParameters,
    settings: &RenderSettings,
) -> PanelResult<(RasterFrame, RenderMeta)> {
    let camera = ViewCamera::new(&params.camera, settings.bounds)?;

    let (pose_name, pose) = resolve_pose_or_neutral(&params.character.pose);
    let (expression_name, expression) =
        resolve_expression_or_neutral(&params.character.expression);

    let skeleton = Skeleton::humanoid();
    let mut state = SkeletonState::rest(&skeleton);
    state.apply_pose(&skeleton, pose);

    let mut scene = background_primitives(&params.background, &params.composition.foreground);
    scene.extend(character_primitives(
        &params.character,
        &skeleton,
        &state,
        expression,
    ));
    scene.sort_by_key(|p| p.category);

    let mut meta = RenderMeta {
        primitives_total: scene.len(),
        primitives_skipped: 0,
        pose: pose_name.to_string(),
        expression: expression_name.to_string(),
        camera_kind: params.camera.kind,
    };

    let mut fills: Vec<FillCmd> = Vec::with_capacity(scene.len() * 3);
    for prim in &scene {
        match project_primitive(&camera, &prim.shape) {
            Ok(cmds) => fills.extend(cmds),
            Err(err) => {
                meta.primitives_skipped += 1;
                warn!(%err, "skipping unprojectable primitive");
            }
        }
    }
    if let Some(wash) = atmosphere_wash(&params.background, settings.bounds) {
        fills.push(wash);
    }

    let mut frame = rasterize(settings.bounds, settings.clear, &fills)?;
    apply_effects(&mut frame, &params.effects)?;
    Ok((frame, meta))
}

/// Map a descriptor and render it. Fails on descriptor validation.
pub fn render_panel(
    descriptor: &SceneDescriptor,
    settings: &RenderSettings,
) -> PanelResult<RasterFrame> {
    let params = mapper::map(descriptor)?;
    render_scene(&params, settings).map(|(frame, _)| frame)
}

/// Map a descriptor and render it, substituting the neutral scene when the
/// descriptor fails validation so a bad panel cannot sink the whole page.
/// Render-stage errors still propagate.
pub fn render_panel_or_neutral(
    descriptor: &SceneDescriptor,
    settings: &RenderSettings,
) -> PanelResult<RasterFrame> {
    let params = match mapper::map(descriptor) {
        Ok(params) => params,
        Err(err) => {
            warn!(%err, "descriptor rejected, rendering neutral panel");
            SceneParameters::neutral()
        }
    };
    render_scene(&params, settings).map(|(frame, _)| frame)
}

/// Render a page of panels, optionally in parallel across a rayon pool.
/// Output order always matches input order.
pub fn render_panels(
    descriptors: &[SceneDescriptor],
    settings: &RenderSettings,
    threading: &PanelThreading,
) -> PanelResult<Vec<RasterFrame>> {
    if !threading.parallel {
        return descriptors
            .iter()
            .map(|d| render_panel_or_neutral(d, settings))
            .collect();
    }

    let pool = build_thread_pool(threading.threads)?;
    pool.install(|| {
        descriptors
            .par_iter()
            .map(|d| render_panel_or_neutral(d, settings))
            .collect()
    })
}

/// Screen-space atmospheric pass: a translucent full-panel wash in the
/// ambient color when the lighting is dim enough to tint the whole scene
/// (night, evening). Bright lighting gets no wash at all.
fn atmosphere_wash(bg: &BackgroundParams, bounds: PanelBounds) -> Option<FillCmd> {
    if !bg.visible {
        return None;
    }
    let strength = 1.0 - bg.light_intensity.clamp(0.0, 1.0);
    if strength < 0.3 {
        return None;
    }
    let alpha = (strength * 96.0).round() as u8;
    let rect = kurbo::Rect::new(0.0, 0.0, f64::from(bounds.width), f64::from(bounds.height));
    Some(FillCmd {
        path: rect.to_path(0.1),
        color: Rgba8::from_unit_rgb(bg.ambient_color).with_alpha(alpha),
    })
}

fn build_thread_pool(threads: Option<usize>) -> PanelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PanelError::validation(
            "panel threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PanelError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{CameraAngle, NO_CHARACTER_SENTINEL, VisualEffect};

    fn settings() -> RenderSettings {
        RenderSettings::new(PanelBounds::new(96, 64).unwrap())
    }

    fn empty_descriptor() -> SceneDescriptor {
        SceneDescriptor {
            camera_angle: CameraAngle::Middle,
            composition: String::new(),
            visual_effects: VisualEffect::Normal,
            character_details: NO_CHARACTER_SENTINEL.to_string(),
            background: 0,
            background_details: String::new(),
        }
    }

    #[test]
    fn empty_panel_renders_the_clear_color() {
        let frame = render_panel(&empty_descriptor(), &settings()).unwrap();
        assert_eq!(frame.width, 96);
        assert_eq!(frame.height, 64);
        assert_eq!(&frame.data[..3], &[236, 236, 240]);
    }

    #[test]
    fn neutral_fallback_rescues_an_invalid_descriptor() {
        let mut d = empty_descriptor();
        d.background = 9;
        assert!(render_panel(&d, &settings()).is_err());
        let frame = render_panel_or_neutral(&d, &settings()).unwrap();
        assert_eq!(frame.data.len(), 96 * 64 * 4);
    }

    #[test]
    fn zero_threads_is_rejected() {
        let threading = PanelThreading {
            parallel: true,
            threads: Some(0),
        };
        assert!(render_panels(&[empty_descriptor()], &settings(), &threading).is_err());
    }

    #[test]
    fn night_lighting_gets_an_atmospheric_wash() {
        let bounds = PanelBounds::new(32, 32).unwrap();
        let night = BackgroundParams {
            visible: true,
            light_intensity: 0.3,
            ambient_color: [0.35, 0.4, 0.6],
            ..BackgroundParams::invisible()
        };
        assert!(atmosphere_wash(&night, bounds).is_some());

        let bright = BackgroundParams {
            visible: true,
            light_intensity: 0.95,
            ..BackgroundParams::invisible()
        };
        assert!(atmosphere_wash(&bright, bounds).is_none());
        assert!(atmosphere_wash(&BackgroundParams::invisible(), bounds).is_none());
    }

    #[test]
    fn unknown_pose_falls_back_in_render_meta() {
        let mut params = SceneParameters::neutral();
        params.character.visible = true;
        params.character.pose = "backflip".to_string();
        let (_, meta) = render_scene(&params, &settings()).unwrap();
        assert_eq!(meta.pose, "neutral");
    }
}
