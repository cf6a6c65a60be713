//! Drawing surface abstraction
//!
//! Scenes draw through [`DrawSurface`] so that frame output can be inspected
//! in tests without a browser. The Canvas 2D implementation lives in
//! `canvas2d.rs`.

use std::fmt;

use serde::Deserialize;

use crate::geometry::ScreenPoint;

/// An RGBA colour with 0-255 channels and 0-1 alpha
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Render as a CSS colour string
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Minimal set of 2D drawing operations the scenes need
pub trait DrawSurface {
    /// Clear the whole surface (CSS pixel dimensions)
    fn clear(&mut self, width: f64, height: f64);

    /// Fill a closed polygon, then stroke its outline
    fn fill_polygon(&mut self, points: &[ScreenPoint], fill: Rgba, stroke: Rgba, line_width: f64);

    /// Stroke a single line segment
    fn stroke_line(&mut self, from: ScreenPoint, to: ScreenPoint, stroke: Rgba, line_width: f64);

    /// Fill a circle
    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, fill: Rgba);
}

/// Draw calls captured by [`RecordingSurface`]
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear {
        width: f64,
        height: f64,
    },
    Polygon {
        points: Vec<ScreenPoint>,
        fill: Rgba,
        stroke: Rgba,
        line_width: f64,
    },
    Line {
        from: ScreenPoint,
        to: ScreenPoint,
        stroke: Rgba,
        line_width: f64,
    },
    Circle {
        center: ScreenPoint,
        radius: f64,
        fill: Rgba,
    },
}

/// Test double that records every call in order
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

#[cfg(test)]
impl RecordingSurface {
    pub fn polygons(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Polygon { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls.iter().filter(|c| matches!(c, DrawCall::Line { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Circle { .. }))
    }
}

#[cfg(test)]
impl DrawSurface for RecordingSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.calls.push(DrawCall::Clear { width, height });
    }

    fn fill_polygon(&mut self, points: &[ScreenPoint], fill: Rgba, stroke: Rgba, line_width: f64) {
        self.calls.push(DrawCall::Polygon {
            points: points.to_vec(),
            fill,
            stroke,
            line_width,
        });
    }

    fn stroke_line(&mut self, from: ScreenPoint, to: ScreenPoint, stroke: Rgba, line_width: f64) {
        self.calls.push(DrawCall::Line {
            from,
            to,
            stroke,
            line_width,
        });
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, fill: Rgba) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            fill,
        });
    }
}
