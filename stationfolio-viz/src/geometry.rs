//! Point types shared by the projector and both scenes
//!
//! Coordinates are `f64` throughout so they can be handed to the Canvas 2D API
//! without conversion.

/// A position in the scene's local right-handed space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Translate by another point treated as an offset
    pub fn offset(self, by: Point3D) -> Self {
        Self::new(self.x + by.x, self.y + by.y, self.z + by.z)
    }

    /// Rotate in the (y, z) plane, i.e. about the X axis
    pub fn rotate_x(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(
            self.x,
            self.y * cos - self.z * sin,
            self.y * sin + self.z * cos,
        )
    }

    /// Rotate in the (x, z) plane, i.e. about the Y axis
    pub fn rotate_y(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(
            self.x * cos - self.z * sin,
            self.y,
            self.x * sin + self.z * cos,
        )
    }
}

/// A position on the drawing surface in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Screen position plus the camera-space depth it was projected from.
///
/// Only valid for the frame that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

impl ProjectedPoint {
    pub fn screen(&self) -> ScreenPoint {
        ScreenPoint::new(self.x, self.y)
    }
}

/// Pointer position relative to the canvas, `[-1, 1]` on each axis while the
/// pointer is over it
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedPointer {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPointer {
    pub const CENTERED: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
