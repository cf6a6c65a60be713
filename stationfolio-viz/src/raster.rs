//! Painter's-algorithm rasterizer
//!
//! Faces are shaded from their average depth, sorted farthest first and drawn
//! in that order. There is no depth buffer and no culling: every face is drawn
//! every frame, so overlap is resolved by sort order alone.

use serde::Deserialize;

use crate::geometry::{ProjectedPoint, ScreenPoint};
use crate::projector::{Projector, Tilt};
use crate::station::{Primitive, PrimitiveKind};
use crate::surface::{DrawSurface, Rgba};

/// Depth-to-colour mapping for station faces
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    /// Added to a face's depth before normalizing
    pub depth_offset: f64,
    /// Depth range mapped onto `[0, 1]`
    pub depth_span: f64,
    /// Grey level of the farthest panels
    pub base_grey: f64,
    /// Extra grey added as panels come nearer
    pub grey_range: f64,
    /// Blue channel offset over the grey level
    pub blue_lift: f64,
    pub panel_alpha: f64,
    pub edge: Rgba,
    pub edge_width: f64,
    pub guide: Rgba,
    pub guide_width: f64,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            depth_offset: 500.0,
            depth_span: 1000.0,
            base_grey: 30.0,
            grey_range: 50.0,
            blue_lift: 5.0,
            panel_alpha: 0.95,
            edge: Rgba::new(200.0, 200.0, 210.0, 0.1),
            edge_width: 0.5,
            guide: Rgba::new(255.0, 255.0, 255.0, 0.15),
            guide_width: 1.0,
        }
    }
}

impl ShadingConfig {
    /// Map a depth into `[0, 1]`, 0 being nearest
    pub fn normalized_depth(&self, depth: f64) -> f64 {
        ((depth + self.depth_offset) / self.depth_span).clamp(0.0, 1.0)
    }

    /// Fill colour for a panel at the given depth
    pub fn panel_fill(&self, depth: f64) -> Rgba {
        let grey = self.base_grey + (1.0 - self.normalized_depth(depth)) * self.grey_range;
        Rgba::new(grey, grey, grey + self.blue_lift, self.panel_alpha)
    }
}

/// A projected primitive for the current frame
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub points: Vec<ProjectedPoint>,
    pub kind: PrimitiveKind,
}

impl Face {
    /// Project every vertex of a primitive with the frame's tilt
    pub fn project(
        primitive: &Primitive,
        projector: &Projector,
        center: ScreenPoint,
        tilt: Tilt,
    ) -> Self {
        Self {
            points: primitive
                .vertices
                .iter()
                .map(|&v| projector.project_tilted(v, center, tilt))
                .collect(),
            kind: primitive.kind,
        }
    }

    /// Mean vertex depth, used as the sort key
    pub fn average_depth(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.points.iter().map(|p| p.depth).sum::<f64>() / self.points.len() as f64
    }
}

/// A face with its draw styles resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ShadedFace {
    pub points: Vec<ScreenPoint>,
    pub depth: f64,
    pub fill: Rgba,
    pub stroke: Rgba,
    pub line_width: f64,
}

/// Sort farthest first. The sort is stable, so faces with equal depth keep
/// their emission order.
pub fn sort_back_to_front(faces: &mut [ShadedFace]) {
    faces.sort_by(|a, b| b.depth.total_cmp(&a.depth));
}

/// Shades, sorts and draws faces
#[derive(Debug, Clone, Default)]
pub struct DepthSortedRasterizer {
    pub shading: ShadingConfig,
}

impl DepthSortedRasterizer {
    pub fn new(shading: ShadingConfig) -> Self {
        Self { shading }
    }

    pub fn shade(&self, face: &Face) -> ShadedFace {
        let depth = face.average_depth();
        let (fill, stroke, line_width) = match face.kind {
            PrimitiveKind::Panel => (
                self.shading.panel_fill(depth),
                self.shading.edge,
                self.shading.edge_width,
            ),
            PrimitiveKind::Guide => (
                Rgba::TRANSPARENT,
                self.shading.guide,
                self.shading.guide_width,
            ),
        };

        ShadedFace {
            points: face.points.iter().map(ProjectedPoint::screen).collect(),
            depth,
            fill,
            stroke,
            line_width,
        }
    }

    /// Draw all faces back to front
    pub fn render(&self, surface: &mut dyn DrawSurface, faces: &[Face]) {
        let mut shaded: Vec<ShadedFace> = faces.iter().map(|f| self.shade(f)).collect();
        sort_back_to_front(&mut shaded);

        for face in &shaded {
            match face.points.as_slice() {
                [from, to] => surface.stroke_line(*from, *to, face.stroke, face.line_width),
                points if points.len() > 2 => {
                    surface.fill_polygon(points, face.fill, face.stroke, face.line_width)
                }
                _ => {}
            }
        }
    }
}
