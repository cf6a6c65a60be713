//! Ambient starfield
//!
//! A fixed pool of particles drifting slowly upward. Each particle keeps its
//! depth multiplier and twinkle phase for its whole life; when it leaves the
//! top edge it re-enters at the bottom at a new horizontal position.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::geometry::ScreenPoint;
use crate::surface::{DrawSurface, Rgba};

/// Configuration for the starfield
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    /// Number of particles, fixed for the lifetime of the field
    pub particle_count: usize,
    /// Upward drift per frame for a particle with `z = 1`
    pub drift_speed: f64,
    /// Particles get `z` uniformly in `[0, depth_range)`
    pub depth_range: f64,
    /// Opacity around which particles twinkle
    pub base_opacity: f64,
    /// Twinkle amplitude
    pub twinkle_amplitude: f64,
    /// Draw radius per unit of `z`
    pub size_scale: f64,
    /// Smallest draw radius
    pub min_radius: f64,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 100,
            drift_speed: 0.05,
            depth_range: 2.0,
            base_opacity: 0.1,
            twinkle_amplitude: 0.3,
            size_scale: 1.2,
            min_radius: 0.2,
        }
    }
}

/// A single star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    /// Size and speed multiplier
    pub z: f64,
    /// Per-particle twinkle frequency seed in `[0, 1)`
    pub phase: f64,
}

/// Particle pool plus the surface size it lives in
#[derive(Debug, Clone)]
pub struct Starfield {
    particles: Vec<Particle>,
    config: StarfieldConfig,
    width: f64,
    height: f64,
    rng: SmallRng,
}

impl Starfield {
    /// Create a field with every particle placed at random
    pub fn new(config: StarfieldConfig, width: f64, height: f64, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let particles = (0..config.particle_count)
            .map(|_| Particle {
                x: rng.r#gen::<f64>() * width,
                y: rng.r#gen::<f64>() * height,
                z: rng.r#gen::<f64>() * config.depth_range,
                phase: rng.r#gen::<f64>(),
            })
            .collect();

        Self {
            particles,
            config,
            width,
            height,
            rng,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Update the bounds; particles keep their positions
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Advance every particle by one frame
    pub fn tick(&mut self) {
        for particle in &mut self.particles {
            particle.y -= self.config.drift_speed * particle.z;

            if particle.y < 0.0 {
                particle.y = self.height;
                particle.x = self.rng.r#gen::<f64>() * self.width;
            }
        }
    }

    /// Twinkle opacity; may go negative, which the canvas treats as invisible
    pub fn opacity(&self, particle: &Particle, seconds: f64) -> f64 {
        self.config.base_opacity + self.config.twinkle_amplitude * (seconds * particle.phase).sin()
    }

    pub fn radius(&self, particle: &Particle) -> f64 {
        (particle.z * self.config.size_scale).max(self.config.min_radius)
    }

    /// Draw every particle as a white dot
    pub fn draw(&self, surface: &mut dyn DrawSurface, seconds: f64) {
        for particle in &self.particles {
            let fill = Rgba::new(255.0, 255.0, 255.0, self.opacity(particle, seconds));
            surface.fill_circle(
                ScreenPoint::new(particle.x, particle.y),
                self.radius(particle),
                fill,
            );
        }
    }
}
