#![forbid(unsafe_code)]

pub mod core;
pub mod descriptor;
pub mod ease;
pub mod error;
pub mod expression;
pub mod mapper;
pub mod params;
pub mod pose;
pub mod render;
pub mod skeleton;
pub mod transition;

pub use core::{PanelBounds, Rgba8, Vec3};
pub use descriptor::{CameraAngle, NO_CHARACTER_SENTINEL, SceneDescriptor, VisualEffect};
pub use ease::Ease;
pub use error::{PanelError, PanelResult};
pub use expression::{BlendChannel, BlendWeights, ExpressionDefinition};
pub use mapper::{MapReport, map, map_with_report};
pub use params::{
    BackgroundParams, CameraParams, CharacterParams, CompositionGraph, EffectProfile,
    SceneParameters,
};
pub use pose::{NEUTRAL_POSE, PoseDefinition};
pub use render::{
    PanelThreading, RasterFrame, RenderMeta, RenderSettings, render_panel,
    render_panel_or_neutral, render_panels, render_scene,
};
pub use skeleton::{Bone, BoneName, BoneState, Skeleton, SkeletonState};
pub use transition::{PoseSession, TransitionPlayer, expression_transition, pose_transition};
