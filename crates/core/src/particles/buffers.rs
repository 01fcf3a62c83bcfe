//! Structure-of-arrays particle storage.
//!
//! Positions, velocities and colours live in three flat `f32` buffers of
//! length `3 × count`, indexed in parallel: particle `i` owns elements
//! `3i..3i + 3` of each. The layout matches what a renderer uploads directly.

use super::color::spawn_color;
use crate::core_types::bounds::Bounds;
use crate::core_types::vec3::Vec3;
use crate::error::SimError;
use rand::Rng;

/// Half-width of the random initial velocity on each axis
pub const SPAWN_VELOCITY_JITTER: f32 = 0.05;

/// Flat per-particle buffers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleBuffers {
    pub(crate) positions: Vec<f32>,
    pub(crate) velocities: Vec<f32>,
    pub(crate) colors: Vec<f32>,
}

impl ParticleBuffers {
    /// Number of particles held
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn velocities(&self) -> &[f32] {
        &self.velocities
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn position(&self, index: usize) -> Option<Vec3> {
        read_vec(&self.positions, index)
    }

    pub fn velocity(&self, index: usize) -> Option<Vec3> {
        read_vec(&self.velocities, index)
    }

    pub fn color(&self, index: usize) -> Option<[f32; 3]> {
        let i3 = index.checked_mul(3)?;
        let c = self.colors.get(i3..i3.checked_add(3)?)?;
        Some([c[0], c[1], c[2]])
    }

    /// Grow or shrink to `count` particles.
    ///
    /// Particles below `min(old, new)` are untouched. New slots are seeded
    /// with a random position inside `bounds`, a small random velocity and
    /// the spawn colour.
    ///
    /// # Errors
    /// Returns [`SimError::AllocationFailed`] if the buffers cannot grow; the
    /// existing particles are left as they were.
    pub fn resize<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        bounds: &Bounds,
        rng: &mut R,
    ) -> Result<(), SimError> {
        let current = self.len();
        if count <= current {
            let len = count * 3;
            self.positions.truncate(len);
            self.velocities.truncate(len);
            self.colors.truncate(len);
            return Ok(());
        }

        let extra = (count - current)
            .checked_mul(3)
            .ok_or(SimError::AllocationFailed { requested: count })?;
        for buffer in [&mut self.positions, &mut self.velocities, &mut self.colors] {
            buffer
                .try_reserve_exact(extra)
                .map_err(|_| SimError::AllocationFailed { requested: count })?;
        }

        for _ in current..count {
            self.spawn(bounds, rng);
        }
        Ok(())
    }

    /// Overwrite one particle's state.
    pub(crate) fn write(&mut self, index: usize, position: &Vec3, velocity: &Vec3, color: [f32; 3]) {
        let i3 = index * 3;
        self.positions[i3..i3 + 3].copy_from_slice(position.as_slice());
        self.velocities[i3..i3 + 3].copy_from_slice(velocity.as_slice());
        self.colors[i3..i3 + 3].copy_from_slice(&color);
    }

    fn spawn<R: Rng + ?Sized>(&mut self, bounds: &Bounds, rng: &mut R) {
        let position = bounds.random_point(rng);
        let mut jitter = || (rng.random::<f32>() - 0.5) * 2.0 * SPAWN_VELOCITY_JITTER;
        let velocity = Vec3::new(jitter(), jitter(), jitter());
        let color = spawn_color(rng);
        self.positions.extend_from_slice(position.as_slice());
        self.velocities.extend_from_slice(velocity.as_slice());
        self.colors.extend_from_slice(&color);
    }
}

fn read_vec(buffer: &[f32], index: usize) -> Option<Vec3> {
    let i3 = index.checked_mul(3)?;
    let v = buffer.get(i3..i3.checked_add(3)?)?;
    Some(Vec3::new(v[0], v[1], v[2]))
}
