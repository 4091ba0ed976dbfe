//! Software renderer: projects scene primitives through an approximate
//! perspective camera and rasterizes them on the CPU.

pub mod camera;
pub mod cpu;
pub mod environment;
pub mod figure;
pub mod pipeline;
pub mod post;
pub mod primitives;

pub use camera::{Projected, ViewCamera};
pub use cpu::{RasterFrame, rasterize};
pub use pipeline::{
    PanelThreading, RenderMeta, RenderSettings, render_panel, render_panel_or_neutral,
    render_panels, render_scene,
};
pub use primitives::{DrawCategory, FillCmd, Primitive, ScenePrimitive};
