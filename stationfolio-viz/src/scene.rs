//! Scenes driven by the animation loop
//!
//! A scene owns its animation state and knows how to paint one frame onto a
//! [`DrawSurface`]. The runtime feeds it viewport changes, pointer moves and
//! the frame clock.

use crate::geometry::NormalizedPointer;
use crate::projector::Projector;
use crate::raster::{DepthSortedRasterizer, Face};
use crate::starfield::{Starfield, StarfieldConfig};
use crate::station::{StationConfig, StationDimensions, StationGeometryBuilder};
use crate::surface::DrawSurface;
use crate::viewport::Viewport;

/// Something that can be animated on a canvas
pub trait Scene {
    /// Called with every accepted viewport measurement
    fn resize(&mut self, viewport: &Viewport);

    /// Called with the latest normalized pointer position
    fn pointer_moved(&mut self, _pointer: NormalizedPointer) {}

    /// Clear and repaint the whole surface. `seconds` is the scene clock.
    fn render_frame(&mut self, surface: &mut dyn DrawSurface, seconds: f64);
}

/// The rotating station
#[derive(Debug, Clone)]
pub struct StationScene {
    projector: Projector,
    builder: StationGeometryBuilder,
    rasterizer: DepthSortedRasterizer,
    config: StationConfig,
    viewport: Option<Viewport>,
    pointer: NormalizedPointer,
    rotation: f64,
}

impl StationScene {
    pub fn new(config: StationConfig) -> Self {
        Self {
            projector: Projector::new(config.projector.clone()),
            builder: StationGeometryBuilder::new(&config, StationDimensions::default()),
            rasterizer: DepthSortedRasterizer::new(config.shading.clone()),
            config,
            viewport: None,
            pointer: NormalizedPointer::CENTERED,
            rotation: 0.0,
        }
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn dimensions(&self) -> &StationDimensions {
        self.builder.dimensions()
    }

    /// Project the current geometry without advancing the rotation
    pub fn faces(&self, seconds: f64) -> Vec<Face> {
        let Some(viewport) = self.viewport else {
            return Vec::new();
        };
        let center = viewport.center();
        let tilt = self.projector.tilt(seconds, self.pointer);

        self.builder
            .build_frame(self.rotation)
            .iter()
            .map(|primitive| Face::project(primitive, &self.projector, center, tilt))
            .collect()
    }
}

impl Scene for StationScene {
    fn resize(&mut self, viewport: &Viewport) {
        self.builder.set_dimensions(StationDimensions::from_min_side(
            viewport.min_side(),
            &self.config,
        ));
        self.viewport = Some(*viewport);
    }

    fn pointer_moved(&mut self, pointer: NormalizedPointer) {
        self.pointer = pointer;
    }

    fn render_frame(&mut self, surface: &mut dyn DrawSurface, seconds: f64) {
        let Some(viewport) = self.viewport else {
            return;
        };
        surface.clear(viewport.width, viewport.height);

        self.rotation += self.config.rotation_speed;
        let faces = self.faces(seconds);
        self.rasterizer.render(surface, &faces);
    }
}

/// The drifting background starfield
#[derive(Debug, Clone)]
pub struct StarfieldScene {
    config: StarfieldConfig,
    seed: u64,
    /// Wall-clock seconds at mount; twinkle phases are taken against this
    epoch: f64,
    field: Option<Starfield>,
    viewport: Option<Viewport>,
}

impl StarfieldScene {
    /// The particle pool is created on the first resize, once the size is known.
    ///
    /// `epoch` is the wall-clock time in seconds. Each particle's twinkle
    /// frequency differs, so a large epoch spreads their starting opacities.
    pub fn new(config: StarfieldConfig, seed: u64, epoch: f64) -> Self {
        Self {
            config,
            seed,
            epoch,
            field: None,
            viewport: None,
        }
    }

    pub fn field(&self) -> Option<&Starfield> {
        self.field.as_ref()
    }
}

impl Scene for StarfieldScene {
    fn resize(&mut self, viewport: &Viewport) {
        match &mut self.field {
            Some(field) => field.resize(viewport.width, viewport.height),
            None => {
                self.field = Some(Starfield::new(
                    self.config.clone(),
                    viewport.width,
                    viewport.height,
                    self.seed,
                ))
            }
        }
        self.viewport = Some(*viewport);
    }

    fn render_frame(&mut self, surface: &mut dyn DrawSurface, seconds: f64) {
        let (Some(viewport), Some(field)) = (self.viewport, self.field.as_mut()) else {
            return;
        };
        surface.clear(viewport.width, viewport.height);
        field.tick();
        field.draw(surface, self.epoch + seconds);
    }
}
