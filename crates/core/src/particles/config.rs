//! Particle system configuration

use crate::core_types::bounds::Bounds;
use crate::error::SimError;
use serde::{Deserialize, Serialize};

/// Configuration for a [`ParticleSystem`](super::ParticleSystem)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Number of particles in the ensemble
    pub count: usize,

    /// Render size of each particle. Not used by the integration, carried
    /// for the renderer.
    pub size: f32,

    /// Multiplier on the force response and on the speed cap (12 × factor)
    pub speed_factor: f32,

    /// Simulation volume; particles wrap toroidally at its faces
    pub bounds: Bounds,

    /// Seed for particle placement. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 5000,
            size: 0.5,
            speed_factor: 1.0,
            bounds: Bounds::default(),
            seed: None,
        }
    }
}

impl ParticleConfig {
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_speed_factor(mut self, speed_factor: f32) -> Self {
        self.speed_factor = speed_factor;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Check that every parameter is usable.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidParameter`] for non-finite or negative
    /// size/speed factor and for degenerate bounds.
    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.size.is_finite() && self.size >= 0.0) {
            return Err(SimError::invalid("size", "must be finite and >= 0"));
        }
        if !(self.speed_factor.is_finite() && self.speed_factor >= 0.0) {
            return Err(SimError::invalid("speed_factor", "must be finite and >= 0"));
        }
        self.bounds.validate()
    }
}
