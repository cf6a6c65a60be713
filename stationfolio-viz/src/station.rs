//! Station geometry
//!
//! A ring of box-shaped modules orbiting the origin in the XZ plane, plus a
//! thin guide ring inside them. Geometry is rebuilt from scratch for every
//! frame from the current rotation angle; nothing is kept between frames.

use std::f64::consts::TAU;

use serde::Deserialize;

use crate::geometry::Point3D;
use crate::projector::ProjectorConfig;
use crate::raster::ShadingConfig;

/// Corner indices of the six box faces (front, back, then the four sides)
pub const BOX_FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [2, 3, 7, 6],
    [0, 3, 7, 4],
    [1, 2, 6, 5],
];

/// Tuning for the station scene
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// Number of modules on the ring
    pub module_count: usize,
    /// Orbit radius as a fraction of `min(width, height)`
    pub radius_fraction: f64,
    /// Module length (box local Z) as a fraction of the radius
    pub module_width_fraction: f64,
    /// Module height as a fraction of the radius
    pub module_height_fraction: f64,
    /// Module depth (box local X) as a fraction of the radius
    pub module_depth_fraction: f64,
    /// Guide ring radius as a fraction of the orbit radius
    pub ring_fraction: f64,
    /// Line segments in the guide ring
    pub ring_segments: usize,
    /// Rotation added per frame (radians)
    pub rotation_speed: f64,
    pub projector: ProjectorConfig,
    pub shading: ShadingConfig,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            module_count: 12,
            radius_fraction: 0.3,
            module_width_fraction: 0.45,
            module_height_fraction: 0.12,
            module_depth_fraction: 0.18,
            ring_fraction: 0.8,
            ring_segments: 64,
            rotation_speed: 0.0015,
            projector: ProjectorConfig::default(),
            shading: ShadingConfig::default(),
        }
    }
}

/// Sizes derived from the viewport; recomputed on every resize
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StationDimensions {
    pub radius: f64,
    pub module_width: f64,
    pub module_height: f64,
    pub module_depth: f64,
}

impl StationDimensions {
    /// Derive all sizes from the shorter side of the viewport
    pub fn from_min_side(min_side: f64, config: &StationConfig) -> Self {
        let radius = min_side * config.radius_fraction;
        Self {
            radius,
            module_width: radius * config.module_width_fraction,
            module_height: radius * config.module_height_fraction,
            module_depth: radius * config.module_depth_fraction,
        }
    }
}

/// One module's placement on the ring for a single frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Module {
    pub index: usize,
    /// Orbital angle including the current rotation
    pub angle: f64,
    /// World-space center
    pub center: Point3D,
}

impl Module {
    /// Orientation about Y, always the negative of the orbital angle
    pub fn local_rotation(&self) -> f64 {
        -self.angle
    }

    /// World-space box corners.
    ///
    /// The box's local X extent is the module depth and its local Z extent is
    /// the module width. Corners are rotated by [`Module::local_rotation`]
    /// before being moved to the module center.
    pub fn corners(&self, dims: &StationDimensions) -> [Point3D; 8] {
        let hw = dims.module_depth / 2.0;
        let hh = dims.module_height / 2.0;
        let hd = dims.module_width / 2.0;

        let local = [
            Point3D::new(-hw, -hh, -hd),
            Point3D::new(hw, -hh, -hd),
            Point3D::new(hw, hh, -hd),
            Point3D::new(-hw, hh, -hd),
            Point3D::new(-hw, -hh, hd),
            Point3D::new(hw, -hh, hd),
            Point3D::new(hw, hh, hd),
            Point3D::new(-hw, hh, hd),
        ];

        let rotation = self.local_rotation();
        local.map(|c| c.rotate_y(rotation).offset(self.center))
    }
}

/// What a primitive represents, which decides how it is shaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// A quadrilateral side of a module
    Panel,
    /// A segment of the guide ring
    Guide,
}

/// A world-space polygon or line segment
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub vertices: Vec<Point3D>,
    pub kind: PrimitiveKind,
}

/// Builds the station's primitives for a given rotation angle
#[derive(Debug, Clone)]
pub struct StationGeometryBuilder {
    module_count: usize,
    ring_fraction: f64,
    ring_segments: usize,
    dimensions: StationDimensions,
}

impl StationGeometryBuilder {
    pub fn new(config: &StationConfig, dimensions: StationDimensions) -> Self {
        Self {
            module_count: config.module_count,
            ring_fraction: config.ring_fraction,
            ring_segments: config.ring_segments,
            dimensions,
        }
    }

    pub fn module_count(&self) -> usize {
        self.module_count
    }

    pub fn dimensions(&self) -> &StationDimensions {
        &self.dimensions
    }

    /// Replace the derived sizes (after a resize)
    pub fn set_dimensions(&mut self, dimensions: StationDimensions) {
        self.dimensions = dimensions;
    }

    /// Orbital angle of module `index` before the rotation offset
    pub fn base_angle(&self, index: usize) -> f64 {
        index as f64 / self.module_count as f64 * TAU
    }

    /// Module placements for the given rotation
    pub fn modules(&self, rotation: f64) -> Vec<Module> {
        let radius = self.dimensions.radius;
        (0..self.module_count)
            .map(|index| {
                let angle = self.base_angle(index) + rotation;
                Module {
                    index,
                    angle,
                    center: Point3D::new(angle.cos() * radius, 0.0, angle.sin() * radius),
                }
            })
            .collect()
    }

    /// Every primitive for one frame: six panels per module, then the guide ring
    pub fn build_frame(&self, rotation: f64) -> Vec<Primitive> {
        let mut primitives =
            Vec::with_capacity(self.module_count * BOX_FACES.len() + self.ring_segments);

        for module in self.modules(rotation) {
            let corners = module.corners(&self.dimensions);
            primitives.extend(BOX_FACES.iter().map(|face| Primitive {
                vertices: face.iter().map(|&i| corners[i]).collect(),
                kind: PrimitiveKind::Panel,
            }));
        }

        primitives.extend(self.guide_ring(rotation));
        primitives
    }

    fn guide_ring(&self, rotation: f64) -> impl Iterator<Item = Primitive> + '_ {
        let ring_radius = self.dimensions.radius * self.ring_fraction;
        let steps = self.ring_segments as f64;
        let point_at = move |step: usize| {
            let angle = step as f64 / steps * TAU + rotation;
            Point3D::new(angle.cos() * ring_radius, 0.0, angle.sin() * ring_radius)
        };

        (0..self.ring_segments).map(move |i| Primitive {
            vertices: vec![point_at(i), point_at(i + 1)],
            kind: PrimitiveKind::Guide,
        })
    }
}
