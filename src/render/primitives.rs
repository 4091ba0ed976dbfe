use kurbo::{BezPath, Circle, Shape};

use crate::core::{Rgba8, Vec3};
use crate::error::PanelResult;

use super::camera::ViewCamera;

/// One renderable 3D shape with world-space geometry and a material color.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// Axis-aligned box given by center and full extents.
    BoxShape { center: Vec3, size: Vec3, color: Rgba8 },
    /// Arbitrary quad given by four corners in draw order.
    Plane { corners: [Vec3; 4], color: Rgba8 },
    Sphere { center: Vec3, radius: f64, color: Rgba8 },
    /// Capsule-ish cylinder between two points.
    Cylinder { bottom: Vec3, top: Vec3, radius: f64, color: Rgba8 },
}

/// Fixed draw-order category. Primitives are painted category by category
/// (backdrop first, foreground last); this is a documented policy standing in
/// for a real per-pixel depth test, not an accident to be "fixed".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum DrawCategory {
    Backdrop,
    Furniture,
    Character,
    Foreground,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScenePrimitive {
    pub category: DrawCategory,
    pub shape: Primitive,
}

/// One 2D polygon fill ready for the raster backend.
#[derive(Clone, Debug)]
pub struct FillCmd {
    pub path: BezPath,
    pub color: Rgba8,
}

/// Project a primitive into screen-space fill commands.
///
/// Any projection failure (non-finite input, point outside the near/far
/// band) fails the whole primitive so the caller can skip it and continue
/// with the rest of the frame.
pub fn project_primitive(cam: &ViewCamera, prim: &Primitive) -> PanelResult<Vec<FillCmd>> {
    match prim {
        Primitive::Plane { corners, color } => {
            let pts = project_corners(cam, corners)?;
            Ok(vec![FillCmd {
                path: quad(&pts),
                color: *color,
            }])
        }
        Primitive::BoxShape { center, size, color } => project_box(cam, *center, *size, *color),
        Primitive::Sphere { center, radius, color } => {
            let c = cam.project(*center)?;
            let r_px = radius * cam.pixels_per_unit(c);
            let body = Circle::new((c.x, c.y), r_px).to_path(0.1);
            // Lightened off-center disc approximates a radial gradient.
            let highlight = Circle::new(
                (c.x - r_px * 0.3, c.y - r_px * 0.3),
                r_px * 0.55,
            )
            .to_path(0.1);
            Ok(vec![
                FillCmd { path: body, color: *color },
                FillCmd {
                    path: highlight,
                    color: color.lighten(0.35),
                },
            ])
        }
        Primitive::Cylinder { bottom, top, radius, color } => {
            let b = cam.project(*bottom)?;
            let t = cam.project(*top)?;
            let rb = radius * cam.pixels_per_unit(b);
            let rt = radius * cam.pixels_per_unit(t);

            // Perpendicular to the projected axis, in screen space.
            let (dx, dy) = (t.x - b.x, t.y - b.y);
            let len = (dx * dx + dy * dy).sqrt();
            let (px, py) = if len <= f64::EPSILON {
                (1.0, 0.0)
            } else {
                (-dy / len, dx / len)
            };

            let body = quad(&[
                (b.x - px * rb, b.y - py * rb),
                (b.x + px * rb, b.y + py * rb),
                (t.x + px * rt, t.y + py * rt),
                (t.x - px * rt, t.y - py * rt),
            ]);
            // Rounded caps soften the joints between chained limb segments.
            let cap_b = Circle::new((b.x, b.y), rb).to_path(0.1);
            let cap_t = Circle::new((t.x, t.y), rt).to_path(0.1);
            // Darkened sliver along one edge fakes the curvature shading.
            let edge = quad(&[
                (b.x + px * rb * 0.55, b.y + py * rb * 0.55),
                (b.x + px * rb, b.y + py * rb),
                (t.x + px * rt, t.y + py * rt),
                (t.x + px * rt * 0.55, t.y + py * rt * 0.55),
            ]);
            Ok(vec![
                FillCmd { path: cap_b, color: *color },
                FillCmd { path: cap_t, color: *color },
                FillCmd { path: body, color: *color },
                FillCmd {
                    path: edge,
                    color: color.darken(0.18),
                },
            ])
        }
    }
}

fn project_box(
    cam: &ViewCamera,
    center: Vec3,
    size: Vec3,
    color: Rgba8,
) -> PanelResult<Vec<FillCmd>> {
    let h = size * 0.5;
    let c = |sx: f64, sy: f64, sz: f64| {
        Vec3::new(center.x + h.x * sx, center.y + h.y * sy, center.z + h.z * sz)
    };

    let top = project_corners(
        cam,
        &[c(-1.0, 1.0, -1.0), c(1.0, 1.0, -1.0), c(1.0, 1.0, 1.0), c(-1.0, 1.0, 1.0)],
    )?;
    let side = project_corners(
        cam,
        &[c(1.0, -1.0, -1.0), c(1.0, -1.0, 1.0), c(1.0, 1.0, 1.0), c(1.0, 1.0, -1.0)],
    )?;
    let front = project_corners(
        cam,
        &[c(-1.0, -1.0, 1.0), c(1.0, -1.0, 1.0), c(1.0, 1.0, 1.0), c(-1.0, 1.0, 1.0)],
    )?;

    // Face order fakes occlusion: lightened top, darkened side, base front.
    Ok(vec![
        FillCmd {
            path: quad(&top),
            color: color.lighten(0.28),
        },
        FillCmd {
            path: quad(&side),
            color: color.darken(0.22),
        },
        FillCmd {
            path: quad(&front),
            color,
        },
    ])
}

fn project_corners(cam: &ViewCamera, corners: &[Vec3; 4]) -> PanelResult<[(f64, f64); 4]> {
    let mut out = [(0.0, 0.0); 4];
    for (slot, corner) in out.iter_mut().zip(corners) {
        let p = cam.project(*corner)?;
        *slot = (p.x, p.y);
    }
    Ok(out)
}

fn quad(pts: &[(f64, f64); 4]) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(pts[0]);
    path.line_to(pts[1]);
    path.line_to(pts[2]);
    path.line_to(pts[3]);
    path.close_path();
    path
}
