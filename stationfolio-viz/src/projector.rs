//! Tilted perspective projection shared by the station scene
//!
//! The camera is fixed; the scene is tilted instead. Tilt combines the pointer
//! position with a slow idle sway so the view keeps moving with no input.
//! Projection is a pure function of its arguments so it can be unit tested
//! without a browser.

use serde::Deserialize;

use crate::geometry::{NormalizedPointer, Point3D, ProjectedPoint, ScreenPoint};

/// Tuning constants for the projector
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectorConfig {
    /// Perspective distance in scene units
    pub fov: f64,
    /// Constant X-axis tilt giving the composition its camera angle (radians)
    pub base_tilt: f64,
    /// Radians of tilt per unit of normalized pointer offset
    pub tilt_sensitivity: f64,
    /// Amplitude of the idle sway (radians)
    pub sway_amplitude: f64,
    /// Sway phase advance per second
    pub sway_rate: f64,
    /// Y-axis sway runs at this fraction of the X-axis rate
    pub sway_rate_ratio_y: f64,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            fov: 1200.0,
            base_tilt: 0.5,
            tilt_sensitivity: 0.05,
            sway_amplitude: 0.03,
            sway_rate: 0.5,
            sway_rate_ratio_y: 0.8,
        }
    }
}

/// Scene tilt for one frame, excluding the base tilt
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tilt {
    /// Rotation about the X axis (driven by vertical pointer offset)
    pub x: f64,
    /// Rotation about the Y axis (driven by horizontal pointer offset)
    pub y: f64,
}

/// Projects scene points onto the drawing surface
#[derive(Debug, Clone, Default)]
pub struct Projector {
    pub config: ProjectorConfig,
}

impl Projector {
    pub fn new(config: ProjectorConfig) -> Self {
        Self { config }
    }

    /// Compute the tilt for the given time and pointer position
    pub fn tilt(&self, seconds: f64, pointer: NormalizedPointer) -> Tilt {
        let cfg = &self.config;
        let phase = seconds * cfg.sway_rate;
        Tilt {
            x: pointer.y * cfg.tilt_sensitivity + phase.sin() * cfg.sway_amplitude,
            y: pointer.x * cfg.tilt_sensitivity
                + (phase * cfg.sway_rate_ratio_y).cos() * cfg.sway_amplitude,
        }
    }

    /// Project a point using the tilt derived from `seconds` and `pointer`
    pub fn project(
        &self,
        point: Point3D,
        center: ScreenPoint,
        seconds: f64,
        pointer: NormalizedPointer,
    ) -> ProjectedPoint {
        self.project_tilted(point, center, self.tilt(seconds, pointer))
    }

    /// Project a point with a precomputed tilt.
    ///
    /// Rotation order is X (tilt plus base tilt) then Y. The returned depth is
    /// the rotated z before perspective division.
    pub fn project_tilted(&self, point: Point3D, center: ScreenPoint, tilt: Tilt) -> ProjectedPoint {
        let rotated = point
            .rotate_x(tilt.x + self.config.base_tilt)
            .rotate_y(tilt.y);

        let scale = self.config.fov / (self.config.fov + rotated.z);

        ProjectedPoint {
            x: rotated.x * scale + center.x,
            y: rotated.y * scale + center.y,
            depth: rotated.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_projector() -> Projector {
        Projector::new(ProjectorConfig {
            sway_amplitude: 0.0,
            ..Default::default()
        })
    }

    #[test]
    fn default_config_values() {
        let cfg = ProjectorConfig::default();
        assert_eq!(cfg.fov, 1200.0);
        assert_eq!(cfg.base_tilt, 0.5);
        assert_eq!(cfg.tilt_sensitivity, 0.05);
    }

    #[test]
    fn origin_projects_to_center() {
        let projector = Projector::default();
        let p = projector.project(
            Point3D::ORIGIN,
            ScreenPoint::new(500.0, 400.0),
            0.0,
            NormalizedPointer::CENTERED,
        );

        // Rotations fix the origin, so z = 0 and scale = 1
        assert_eq!(p.x, 500.0);
        assert_eq!(p.y, 400.0);
        assert_eq!(p.depth, 0.0);
    }

    #[test]
    fn projection_is_deterministic() {
        let projector = Projector::default();
        let point = Point3D::new(120.0, -35.0, 260.0);
        let center = ScreenPoint::new(640.0, 360.0);
        let pointer = NormalizedPointer::new(0.3, -0.8);

        let a = projector.project(point, center, 12.5, pointer);
        let b = projector.project(point, center, 12.5, pointer);
        assert_eq!(a, b);
    }

    #[test]
    fn idle_sway_at_time_zero() {
        let projector = Projector::default();
        let tilt = projector.tilt(0.0, NormalizedPointer::CENTERED);

        // sin(0) = 0 for X, cos(0) = 1 for Y
        assert_eq!(tilt.x, 0.0);
        assert!((tilt.y - 0.03).abs() < 1e-12);
    }

    #[test]
    fn pointer_drives_opposite_axes() {
        let projector = still_projector();
        let tilt = projector.tilt(0.0, NormalizedPointer::new(1.0, -1.0));

        assert!((tilt.x - -0.05).abs() < 1e-12);
        assert!((tilt.y - 0.05).abs() < 1e-12);
    }

    #[test]
    fn tilt_stays_within_bounds() {
        let projector = Projector::default();
        // Pointer term plus sway term, for pointers inside [-1, 1]
        let bound = projector.config.tilt_sensitivity + projector.config.sway_amplitude + 1e-12;

        for step in 0..=20 {
            let px = -1.0 + step as f64 * 0.1;
            for step_y in 0..=20 {
                let py = -1.0 + step_y as f64 * 0.1;
                for t in [0.0, 0.7, 3.1, 47.0, 1234.5] {
                    let tilt = projector.tilt(t, NormalizedPointer::new(px, py));
                    assert!(tilt.x.abs() <= bound, "tilt.x {} out of bounds", tilt.x);
                    assert!(tilt.y.abs() <= bound, "tilt.y {} out of bounds", tilt.y);
                }
            }
        }
    }

    #[test]
    fn base_tilt_matches_analytic_value() {
        let projector = still_projector();
        let center = ScreenPoint::new(0.0, 0.0);
        // With no sway the Y tilt is cos(0) * 0 = 0, so only the base tilt applies
        let p = projector.project(
            Point3D::new(0.0, 100.0, 0.0),
            center,
            0.0,
            NormalizedPointer::CENTERED,
        );

        let y = 100.0 * 0.5_f64.cos();
        let z = 100.0 * 0.5_f64.sin();
        let scale = 1200.0 / (1200.0 + z);

        assert!(p.x.abs() < 1e-9);
        assert!((p.y - y * scale).abs() < 1e-9);
        assert!((p.depth - z).abs() < 1e-9);
    }

    #[test]
    fn rotation_order_is_x_then_y() {
        let projector = still_projector();
        let tilt = Tilt { x: 0.2, y: 0.6 };
        let point = Point3D::new(50.0, 80.0, -30.0);

        let p = projector.project_tilted(point, ScreenPoint::default(), tilt);

        let x_then_y = point.rotate_x(0.2 + 0.5).rotate_y(0.6);
        let y_then_x = point.rotate_y(0.6).rotate_x(0.2 + 0.5);

        assert!((p.depth - x_then_y.z).abs() < 1e-9);
        assert!((p.depth - y_then_x.z).abs() > 1e-3);
    }

    #[test]
    fn farther_points_shrink_toward_center() {
        let projector = Projector::new(ProjectorConfig {
            base_tilt: 0.0,
            sway_amplitude: 0.0,
            ..Default::default()
        });
        let tilt = Tilt::default();
        let near = projector.project_tilted(Point3D::new(100.0, 0.0, -200.0), ScreenPoint::default(), tilt);
        let far = projector.project_tilted(Point3D::new(100.0, 0.0, 200.0), ScreenPoint::default(), tilt);

        assert!(near.x > 100.0);
        assert!(far.x < 100.0);
        assert!(far.depth > near.depth);
    }

    #[test]
    fn config_accepts_partial_json() {
        let cfg: ProjectorConfig = serde_json::from_str(r#"{"base_tilt": 0.35}"#).unwrap();
        assert_eq!(cfg.base_tilt, 0.35);
        assert_eq!(cfg.fov, 1200.0);
    }
}
