use crate::error::{PanelError, PanelResult};

pub use kurbo::{Affine, BezPath, Point};

/// 3D vector used for world positions, bone rotations (Euler components in
/// radians) and camera math. Hand-written on purpose: the projection layer is
/// a from-scratch approximation, not a linear-algebra crate pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len <= f64::EPSILON || !len.is_finite() {
            return None;
        }
        Some(self * (1.0 / len))
    }

    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        Self {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
            z: a.z + (b.z - a.z) * t,
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Straight-alpha RGBA8 material/fill color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Shift every channel toward white by `amount` in [0,1].
    pub fn lighten(self, amount: f64) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let shift = |c: u8| -> u8 {
            let c = f64::from(c);
            (c + (255.0 - c) * amount).round() as u8
        };
        Self {
            r: shift(self.r),
            g: shift(self.g),
            b: shift(self.b),
            a: self.a,
        }
    }

    /// Shift every channel toward black by `amount` in [0,1].
    pub fn darken(self, amount: f64) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let shift = |c: u8| -> u8 { (f64::from(c) * (1.0 - amount)).round() as u8 };
        Self {
            r: shift(self.r),
            g: shift(self.g),
            b: shift(self.b),
            a: self.a,
        }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Quantize a normalized `[r,g,b]` ambient color to RGBA8.
    pub fn from_unit_rgb(rgb: [f64; 3]) -> Self {
        let q = |c: f64| -> u8 { (c.clamp(0.0, 1.0) * 255.0).round() as u8 };
        Self::opaque(q(rgb[0]), q(rgb[1]), q(rgb[2]))
    }
}

/// Pixel dimensions of one storyboard panel, supplied by the page layout
/// collaborator before rendering begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PanelBounds {
    pub width: u32,
    pub height: u32,
}

impl PanelBounds {
    pub fn new(width: u32, height: u32) -> PanelResult<Self> {
        if width == 0 || height == 0 {
            return Err(PanelError::validation("panel bounds must be non-zero"));
        }
        Ok(Self { width, height })
    }

    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}
