//! 2D Canvas drawing surface
//!
//! Wraps a `CanvasRenderingContext2d` and sizes the canvas backing store for
//! the display's pixel ratio.

use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::geometry::ScreenPoint;
use crate::surface::{DrawSurface, Rgba};
use crate::viewport::Viewport;

/// Errors raised while acquiring or configuring a canvas
#[derive(Error, Debug)]
pub enum SurfaceError {
    /// The browser has no window object
    #[error("no global window")]
    NoWindow,

    /// `getContext("2d")` returned nothing
    #[error("2d context not available")]
    ContextUnavailable,

    /// A DOM call threw
    #[error("{0}")]
    Js(String),

    /// The JSON configuration could not be parsed
    #[error("invalid scene configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl From<JsValue> for SurfaceError {
    fn from(value: JsValue) -> Self {
        SurfaceError::Js(format!("{value:?}"))
    }
}

impl From<SurfaceError> for JsValue {
    fn from(err: SurfaceError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Canvas 2D implementation of [`DrawSurface`]
pub struct Canvas2DSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl Canvas2DSurface {
    /// Acquire the 2D context of a canvas
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, SurfaceError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(SurfaceError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::ContextUnavailable)?;

        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Size the backing store for the viewport while keeping the CSS size,
    /// then scale the context so drawing happens in CSS pixels.
    pub fn configure(&self, viewport: &Viewport) -> Result<(), SurfaceError> {
        let (backing_width, backing_height) = viewport.backing_size();
        self.canvas.set_width(backing_width);
        self.canvas.set_height(backing_height);

        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", viewport.width))?;
        style.set_property("height", &format!("{}px", viewport.height))?;

        // Absolute transform: repeated resizes must not compound
        let dpr = viewport.device_pixel_ratio;
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
        Ok(())
    }

    fn trace(&self, points: &[ScreenPoint]) {
        self.ctx.begin_path();
        if let Some((first, rest)) = points.split_first() {
            self.ctx.move_to(first.x, first.y);
            for p in rest {
                self.ctx.line_to(p.x, p.y);
            }
        }
    }
}

impl DrawSurface for Canvas2DSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_polygon(&mut self, points: &[ScreenPoint], fill: Rgba, stroke: Rgba, line_width: f64) {
        self.trace(points);
        self.ctx.close_path();
        self.ctx.set_fill_style_str(&fill.to_css());
        self.ctx.fill();
        self.ctx.set_stroke_style_str(&stroke.to_css());
        self.ctx.set_line_width(line_width);
        self.ctx.stroke();
    }

    fn stroke_line(&mut self, from: ScreenPoint, to: ScreenPoint, stroke: Rgba, line_width: f64) {
        self.trace(&[from, to]);
        self.ctx.set_stroke_style_str(&stroke.to_css());
        self.ctx.set_line_width(line_width);
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: ScreenPoint, radius: f64, fill: Rgba) {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU)
            .ok();
        self.ctx.set_fill_style_str(&fill.to_css());
        self.ctx.fill();
    }
}
