use crate::core::{PanelBounds, Vec3};
use crate::error::{PanelError, PanelResult};
use crate::params::CameraParams;

/// Result of projecting one world-space point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub x: f64,
    pub y: f64,
    /// Perspective shrink factor in (0, 1]; multiplies on-screen sizes.
    pub scale: f64,
    /// Distance along the view axis, in world units.
    pub depth: f64,
}

/// View camera with a hand-written approximate perspective projection.
///
/// This is deliberately not a 4x4 homogeneous projection: points are moved
/// into the camera's orthonormal basis and shrunk by `1 / (1 + depth * k)`,
/// which preserves the property that objects farther along the view axis
/// project smaller and toward the vanishing point.
#[derive(Clone, Debug)]
pub struct ViewCamera {
    eye: Vec3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
    k: f64,
    units_to_pixels: f64,
    half_width: f64,
    half_height: f64,
    near: f64,
    far: f64,
}

impl ViewCamera {
    pub fn new(cam: &CameraParams, bounds: PanelBounds) -> PanelResult<Self> {
        if cam.near >= cam.far {
            return Err(PanelError::validation("camera near must be < far"));
        }
        if cam.fov <= 0.0 {
            return Err(PanelError::validation("camera fov must be > 0"));
        }

        let forward = (cam.target - cam.position)
            .normalized()
            .ok_or_else(|| PanelError::validation("camera eye and target coincide"))?;
        let world_up = Vec3::new(0.0, 1.0, 0.0);
        // Looking straight up or down leaves the world-up degenerate; fall
        // back to the world X axis.
        let right = forward
            .cross(world_up)
            .normalized()
            .unwrap_or(Vec3::new(1.0, 0.0, 0.0));
        let up = right.cross(forward);

        // Wider fov means stronger shrink per unit of depth.
        let k = (cam.fov.to_radians() * 0.5).tan() * 0.45;
        let units_to_pixels = f64::from(bounds.height) / 3.2;

        Ok(Self {
            eye: cam.position,
            right,
            up,
            forward,
            k,
            units_to_pixels,
            half_width: f64::from(bounds.width) / 2.0,
            half_height: f64::from(bounds.height) / 2.0,
            near: cam.near,
            far: cam.far,
        })
    }

    /// Project a world point onto the panel. Fails for non-finite input,
    /// points behind the near plane and points past the far plane; callers
    /// skip the offending primitive and keep going.
    pub fn project(&self, p: Vec3) -> PanelResult<Projected> {
        if !p.is_finite() {
            return Err(PanelError::projection("non-finite world coordinate"));
        }

        let rel = p - self.eye;
        let depth = rel.dot(self.forward);
        if depth <= self.near {
            return Err(PanelError::projection(format!(
                "point behind near plane (depth {depth:.3})"
            )));
        }
        if depth > self.far {
            return Err(PanelError::projection(format!(
                "point past far plane (depth {depth:.3})"
            )));
        }

        let scale = 1.0 / (1.0 + depth * self.k);
        let x = self.half_width + rel.dot(self.right) * scale * self.units_to_pixels;
        let y = self.half_height - rel.dot(self.up) * scale * self.units_to_pixels;
        if !x.is_finite() || !y.is_finite() || !scale.is_finite() {
            return Err(PanelError::projection("non-finite projected coordinate"));
        }

        Ok(Projected { x, y, scale, depth })
    }

    /// Pixels per world unit at a given projected point.
    pub fn pixels_per_unit(&self, projected: Projected) -> f64 {
        projected.scale * self.units_to_pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> (ViewCamera, PanelBounds) {
        let bounds = PanelBounds::new(320, 240).unwrap();
        let cam = CameraParams::default();
        (ViewCamera::new(&cam, bounds).unwrap(), bounds)
    }

    #[test]
    fn farther_points_project_smaller_and_toward_center() {
        let (cam, bounds) = camera();
        let near = cam.project(Vec3::new(1.0, 1.0, 0.0)).unwrap();
        let far = cam.project(Vec3::new(1.0, 1.0, -8.0)).unwrap();
        assert!(far.scale < near.scale);
        assert!(far.depth > near.depth);

        let cx = f64::from(bounds.width) / 2.0;
        assert!((far.x - cx).abs() < (near.x - cx).abs());
    }

    #[test]
    fn point_behind_camera_is_a_projection_error() {
        let (cam, _) = camera();
        let err = cam.project(Vec3::new(0.0, 1.0, 20.0)).unwrap_err();
        assert!(matches!(err, PanelError::Projection(_)));
    }

    #[test]
    fn non_finite_point_is_a_projection_error() {
        let (cam, _) = camera();
        assert!(matches!(
            cam.project(Vec3::new(f64::NAN, 0.0, 0.0)),
            Err(PanelError::Projection(_))
        ));
        assert!(matches!(
            cam.project(Vec3::new(0.0, f64::INFINITY, 0.0)),
            Err(PanelError::Projection(_))
        ));
    }

    #[test]
    fn target_point_projects_near_panel_center() {
        let (cam, bounds) = camera();
        let p = cam.project(Vec3::new(0.0, 1.0, 0.0)).unwrap();
        assert!((p.x - f64::from(bounds.width) / 2.0).abs() < 1e-6);
        assert!((p.y - f64::from(bounds.height) / 2.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_camera_is_rejected() {
        let bounds = PanelBounds::new(64, 64).unwrap();
        let mut cam = CameraParams::default();
        cam.target = cam.position;
        assert!(ViewCamera::new(&cam, bounds).is_err());
    }
}
