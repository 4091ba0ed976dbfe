//! Scene parameter mapper: validates a raw [`SceneDescriptor`] and
//! deterministically converts it into renderer-ready [`SceneParameters`].

mod background;
mod camera;
mod character;
mod composition;
pub mod tables;

use std::time::SystemTime;

use crate::descriptor::SceneDescriptor;
use crate::error::PanelResult;
use crate::params::SceneParameters;

pub use camera::{FOV_MAX, FOV_MIN};

/// Mapping diagnostics: which table rules fired, per section. Useful for
/// statistics and tests, never required for rendering.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MapReport {
    pub fired_rules: Vec<String>,
}

/// Convert a descriptor into normalized scene parameters.
///
/// Pure apart from the `generated_at` timestamp: identical descriptors yield
/// identical parameters. Fails only on descriptor-level validation.
pub fn map(descriptor: &SceneDescriptor) -> PanelResult<SceneParameters> {
    map_with_report(descriptor).map(|(params, _)| params)
}

/// [`map`] plus the rule-level [`MapReport`].
#[tracing::instrument(skip(descriptor), fields(camera_angle = ?descriptor.camera_angle))]
pub fn map_with_report(
    descriptor: &SceneDescriptor,
) -> PanelResult<(SceneParameters, MapReport)> {
    descriptor.validate()?;

    let mut fired = Vec::new();
    let camera = camera::map_camera(descriptor, &mut fired);
    let character = character::map_character(descriptor, &mut fired);
    let background = background::map_background(descriptor, &mut fired);
    let composition = composition::map_composition(descriptor, &mut fired);
    let effects = tables::effect_profile(descriptor.visual_effects);

    tracing::debug!(rules = fired.len(), "mapped scene descriptor");

    Ok((
        SceneParameters {
            camera,
            character,
            background,
            composition,
            effects,
            generated_at: SystemTime::now(),
        },
        MapReport { fired_rules: fired },
    ))
}
