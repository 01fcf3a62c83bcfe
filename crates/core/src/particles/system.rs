//! Particle system: owns the ensemble and the wind fields and advances both.
//!
//! # Integration step
//!
//! For every particle, once per [`ParticleSystem::step`]:
//!
//! ```text
//! F  = Σ enabled fields  force_at(p, t)
//! v  = 0.95 v + F × dt × speed_factor × 1.5
//! v  = v × min(1, v_max / |v|)          v_max = 12 × speed_factor
//! p  = wrap(p + v × dt)
//! c  = speed_color(|v|, v_max)
//! ```
//!
//! Damping is applied per step, not per second, so the effective drag depends
//! on the frame rate.
//!
//! The per-particle update runs data-parallel over the flat buffers with
//! rayon. Fields are only read during the pass, so the result is the same as
//! a sequential loop and `step` returns only once every particle has moved.

use super::buffers::ParticleBuffers;
use super::color::speed_color;
use super::config::ParticleConfig;
use crate::core_types::bounds::Bounds;
use crate::core_types::vec3::{is_finite, try_unit, Vec3};
use crate::error::SimError;
use crate::fields::{FieldId, FieldRegistry, WindField};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Integration constants
pub mod constants {
    /// Velocity retained each step
    pub const DAMPING: f32 = 0.95;

    /// Gain from summed field force to velocity change
    pub const FORCE_GAIN: f32 = 1.5;

    /// Speed cap per unit of speed factor
    pub const MAX_SPEED_PER_FACTOR: f32 = 12.0;
}

/// Snapshot of ensemble-wide statistics
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationStats {
    pub particle_count: usize,
    pub field_count: usize,
    pub enabled_field_count: usize,
    pub mean_speed: f32,
    pub max_speed: f32,
    /// Simulation time in seconds
    pub elapsed: f32,
}

impl fmt::Display for SimulationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:.2}s particles={} fields={}/{} mean_speed={:.3} max_speed={:.3}",
            self.elapsed,
            self.particle_count,
            self.enabled_field_count,
            self.field_count,
            self.mean_speed,
            self.max_speed
        )
    }
}

/// Per-step values shared by every particle
#[derive(Debug, Clone, Copy)]
struct Integrator {
    dt: f32,
    force_scale: f32,
    max_speed: f32,
    bounds: Bounds,
}

impl Integrator {
    fn new(dt: f32, speed_factor: f32, bounds: Bounds) -> Self {
        Self {
            dt,
            force_scale: dt * speed_factor * constants::FORCE_GAIN,
            max_speed: constants::MAX_SPEED_PER_FACTOR * speed_factor,
            bounds,
        }
    }

    /// Advance one particle in place.
    #[inline]
    fn integrate(&self, force: &Vec3, pos: &mut [f32], vel: &mut [f32], color: &mut [f32]) {
        let velocity =
            Vec3::new(vel[0], vel[1], vel[2]) * constants::DAMPING + force * self.force_scale;
        let (velocity, speed) = cap_speed(&velocity, self.max_speed);

        for (p, v) in pos.iter_mut().zip(velocity.iter()) {
            *p += v * self.dt;
        }
        self.bounds.wrap(pos);

        vel.copy_from_slice(velocity.as_slice());
        color.copy_from_slice(&speed_color(speed, self.max_speed));
    }
}

/// Rescale `velocity` to at most `max_speed`, returning it with its speed.
///
/// Survives an overflowing norm or non-finite components: the direction is
/// recovered from the largest component and the result is capped at
/// `max_speed`. NaN components count as zero; a velocity with no recoverable
/// direction becomes zero.
fn cap_speed(velocity: &Vec3, max_speed: f32) -> (Vec3, f32) {
    let speed = velocity.norm();
    if speed.is_finite() {
        if speed > max_speed {
            return (velocity * (max_speed / speed), max_speed);
        }
        return (*velocity, speed);
    }

    let cleaned = velocity.map(|c| if c.is_nan() { 0.0 } else { c });
    let direction = if is_finite(&cleaned) {
        let largest = cleaned.amax();
        if largest > 0.0 {
            try_unit(&(cleaned / largest))
        } else {
            None
        }
    } else {
        try_unit(&cleaned.map(|c| if c.is_infinite() { c.signum() } else { 0.0 }))
    };

    match direction {
        Some(unit) => (unit * max_speed, max_speed),
        None => (Vec3::zeros(), 0.0),
    }
}

/// A particle ensemble advected by a set of wind fields
#[derive(Debug)]
pub struct ParticleSystem {
    buffers: ParticleBuffers,
    fields: FieldRegistry,
    size: f32,
    speed_factor: f32,
    bounds: Bounds,
    rng: StdRng,
    /// Simulation clock driving time-dependent fields. Accumulated in `f64`
    /// so small steps keep advancing it over long runs.
    elapsed: f64,
}

impl ParticleSystem {
    /// Create a system with `config.count` freshly seeded particles and no fields.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidParameter`] for an invalid configuration and
    /// [`SimError::AllocationFailed`] if the particle buffers cannot be allocated.
    pub fn new(config: ParticleConfig) -> Result<Self, SimError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut system = Self {
            buffers: ParticleBuffers::default(),
            fields: FieldRegistry::new(),
            size: config.size,
            speed_factor: config.speed_factor,
            bounds: config.bounds,
            rng,
            elapsed: 0.0,
        };
        system
            .buffers
            .resize(config.count, &system.bounds, &mut system.rng)?;

        info!(
            "Particle system initialized: {} particles, speed_factor={:.2}, bounds=({:.1}, {:.1}, {:.1})..({:.1}, {:.1}, {:.1})",
            config.count,
            config.speed_factor,
            config.bounds.min.x,
            config.bounds.min.y,
            config.bounds.min.z,
            config.bounds.max.x,
            config.bounds.max.y,
            config.bounds.max.z
        );

        Ok(system)
    }

    /// Replace the field set, e.g. with a preset scene.
    pub fn with_fields(mut self, fields: FieldRegistry) -> Self {
        self.fields = fields;
        self
    }

    /// Advance every particle once by `dt` seconds.
    ///
    /// Non-finite or negative deltas are ignored.
    pub fn step(&mut self, dt: f32) {
        if !dt.is_finite() || dt < 0.0 {
            warn!("Ignoring invalid timestep {}", dt);
            return;
        }

        self.elapsed += f64::from(dt);
        let time = self.elapsed as f32;
        self.fields.advance(time);

        let integrator = Integrator::new(dt, self.speed_factor, self.bounds);
        let fields = &self.fields;
        let buffers = &mut self.buffers;

        buffers
            .positions
            .par_chunks_exact_mut(3)
            .zip(buffers.velocities.par_chunks_exact_mut(3))
            .zip(buffers.colors.par_chunks_exact_mut(3))
            .for_each(|((pos, vel), color)| {
                let force = fields.force_at(&Vec3::new(pos[0], pos[1], pos[2]), time);
                integrator.integrate(&force, pos, vel, color);
            });

        debug!(
            "Particle step: t={:.3}s, dt={:.4}s, particles={}, fields={}/{}",
            time,
            dt,
            self.buffers.len(),
            self.fields.enabled_count(),
            self.fields.len()
        );
    }

    /// Change the particle count.
    ///
    /// Particles below `min(old, new)` keep their state; extra particles are
    /// dropped when shrinking and freshly seeded when growing.
    ///
    /// # Errors
    /// Returns [`SimError::AllocationFailed`] if the buffers cannot grow. The
    /// ensemble is unchanged in that case.
    pub fn resize(&mut self, count: usize) -> Result<(), SimError> {
        let old = self.buffers.len();
        if count == old {
            return Ok(());
        }
        self.buffers.resize(count, &self.bounds, &mut self.rng)?;
        info!("Resized particle system: {} -> {} particles", old, count);
        Ok(())
    }

    /// Overwrite one particle's position and velocity.
    ///
    /// The position is clamped into the bounds and the velocity to the speed
    /// cap; the colour is refreshed to match.
    ///
    /// # Errors
    /// Returns [`SimError::IndexOutOfRange`] for a bad index and
    /// [`SimError::InvalidParameter`] for non-finite input.
    pub fn place_particle(
        &mut self,
        index: usize,
        position: Vec3,
        velocity: Vec3,
    ) -> Result<(), SimError> {
        let count = self.buffers.len();
        if index >= count {
            return Err(SimError::IndexOutOfRange { index, count });
        }
        if !is_finite(&position) || !is_finite(&velocity) {
            return Err(SimError::invalid("particle state", "must be finite"));
        }

        let max_speed = self.max_speed();
        let position = self.bounds.clamp(&position);
        let (velocity, speed) = cap_speed(&velocity, max_speed);
        let color = speed_color(speed, max_speed);
        self.buffers.write(index, &position, &velocity, color);
        Ok(())
    }

    /// Set the render size of particles.
    pub fn set_particle_size(&mut self, size: f32) {
        if !size.is_finite() {
            warn!("Ignoring non-finite particle size {}", size);
            return;
        }
        if size < 0.0 {
            warn!("Clamping negative particle size {} to 0", size);
        }
        self.size = size.max(0.0);
    }

    /// Set the speed factor used from the next step on.
    pub fn set_speed_factor(&mut self, speed_factor: f32) {
        if !speed_factor.is_finite() {
            warn!("Ignoring non-finite speed factor {}", speed_factor);
            return;
        }
        if speed_factor < 0.0 {
            warn!("Clamping negative speed factor {} to 0", speed_factor);
        }
        self.speed_factor = speed_factor.max(0.0);
    }

    pub fn add_field(&mut self, field: WindField) -> FieldId {
        let kind = field.kind().name();
        let id = self.fields.add(field);
        info!("Added {} wind field {}", kind, id);
        id
    }

    /// Remove a field by id. Unknown ids are ignored.
    pub fn remove_field(&mut self, id: FieldId) -> Option<WindField> {
        let removed = self.fields.remove(id);
        if removed.is_some() {
            info!("Removed wind field {}", id);
        }
        removed
    }

    pub fn field(&self, id: FieldId) -> Option<&WindField> {
        self.fields.get(id)
    }

    pub fn field_mut(&mut self, id: FieldId) -> Option<&mut WindField> {
        self.fields.get_mut(id)
    }

    pub fn fields(&self) -> &FieldRegistry {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FieldRegistry {
        &mut self.fields
    }

    /// Number of particles
    pub fn count(&self) -> usize {
        self.buffers.len()
    }

    pub fn particle_size(&self) -> f32 {
        self.size
    }

    pub fn speed_factor(&self) -> f32 {
        self.speed_factor
    }

    /// Current speed cap (`12 × speed_factor`)
    pub fn max_speed(&self) -> f32 {
        constants::MAX_SPEED_PER_FACTOR * self.speed_factor
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Simulation time in seconds
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Flat `[x, y, z, ...]` positions, valid until the next step
    pub fn positions(&self) -> &[f32] {
        self.buffers.positions()
    }

    /// Flat `[x, y, z, ...]` velocities, valid until the next step
    pub fn velocities(&self) -> &[f32] {
        self.buffers.velocities()
    }

    /// Flat `[r, g, b, ...]` colours, valid until the next step
    pub fn colors(&self) -> &[f32] {
        self.buffers.colors()
    }

    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.buffers.position(index)
    }

    pub fn velocity(&self, index: usize) -> Option<Vec3> {
        self.buffers.velocity(index)
    }

    pub fn color(&self, index: usize) -> Option<[f32; 3]> {
        self.buffers.color(index)
    }

    /// Compute ensemble statistics
    pub fn stats(&self) -> SimulationStats {
        let (total, max) = self
            .buffers
            .velocities
            .par_chunks_exact(3)
            .map(|v| Vec3::new(v[0], v[1], v[2]).norm())
            .fold(|| (0.0_f32, 0.0_f32), |(sum, max), s| (sum + s, max.max(s)))
            .reduce(|| (0.0, 0.0), |a, b| (a.0 + b.0, a.1.max(b.1)));

        let count = self.buffers.len();
        SimulationStats {
            particle_count: count,
            field_count: self.fields.len(),
            enabled_field_count: self.fields.enabled_count(),
            mean_speed: if count > 0 { total / count as f32 } else { 0.0 },
            max_speed: max,
            elapsed: self.elapsed as f32,
        }
    }
}
