//! Viewport sizing and pointer normalization
//!
//! This module contains pure calculation logic that can be unit tested
//! without browser dependencies. The runtime measures the container and feeds
//! the numbers in here.

use crate::geometry::{NormalizedPointer, ScreenPoint};

/// Size of a drawing surface in CSS pixels plus the display density
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Layout width in CSS pixels
    pub width: f64,
    /// Layout height in CSS pixels
    pub height: f64,
    /// Physical pixels per CSS pixel
    pub device_pixel_ratio: f64,
}

impl Viewport {
    /// Backing store resolution in physical pixels
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.width * self.device_pixel_ratio).round() as u32,
            (self.height * self.device_pixel_ratio).round() as u32,
        )
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }
}

/// Tracks the last valid viewport.
///
/// Zero-sized or non-finite measurements are ignored so derived geometry is
/// never computed from a collapsed container.
#[derive(Debug, Clone, Default)]
pub struct ViewportManager {
    current: Option<Viewport>,
}

impl ViewportManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last accepted viewport, if any
    pub fn current(&self) -> Option<&Viewport> {
        self.current.as_ref()
    }

    /// Record a new measurement.
    ///
    /// Returns the accepted viewport, or `None` when the measurement was
    /// rejected and the previous one retained. A missing or invalid pixel
    /// ratio falls back to 1.
    pub fn resize(&mut self, width: f64, height: f64, device_pixel_ratio: f64) -> Option<Viewport> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            tracing::debug!(width, height, "ignoring empty viewport");
            return None;
        }

        let device_pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };

        let viewport = Viewport {
            width,
            height,
            device_pixel_ratio,
        };
        self.current = Some(viewport);
        Some(viewport)
    }
}

/// Converts client pointer coordinates to [`NormalizedPointer`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerTracker {
    position: NormalizedPointer,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update from a pointer event.
    ///
    /// `client_x`/`client_y` are viewport coordinates; `left`/`top` are the
    /// canvas's client rect origin. Positions outside the canvas map outside
    /// `[-1, 1]` and are kept as is.
    pub fn update(
        &mut self,
        client_x: f64,
        client_y: f64,
        left: f64,
        top: f64,
        viewport: &Viewport,
    ) -> NormalizedPointer {
        self.position = NormalizedPointer::new(
            ((client_x - left) / viewport.width) * 2.0 - 1.0,
            ((client_y - top) / viewport.height) * 2.0 - 1.0,
        );
        self.position
    }
}
