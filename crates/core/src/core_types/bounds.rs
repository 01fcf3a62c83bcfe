//! Axis-aligned simulation volume with toroidal wrap.

use super::vec3::Vec3;
use crate::error::SimError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box particles live in.
///
/// Particles leaving the box through one face re-enter through the opposite
/// face (toroidal wrap); nothing ever bounces off or sticks to a face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::cube(50.0)
    }
}

impl Bounds {
    /// Create bounds from two corners.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidParameter`] if any coordinate is non-finite
    /// or `min` is not strictly below `max` on every axis.
    pub fn new(min: Vec3, max: Vec3) -> Result<Self, SimError> {
        let bounds = Self { min, max };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Cube centred on the origin spanning `[-half_extent, half_extent]³`.
    pub fn cube(half_extent: f32) -> Self {
        let h = half_extent.abs();
        Self {
            min: Vec3::new(-h, -h, -h),
            max: Vec3::new(h, h, h),
        }
    }

    /// Check that the box is finite and non-degenerate.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidParameter`] describing the first bad axis.
    pub fn validate(&self) -> Result<(), SimError> {
        for (axis, (&lo, &hi)) in self.min.iter().zip(self.max.iter()).enumerate() {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(SimError::invalid("bounds", "corners must be finite"));
            }
            if lo >= hi {
                return Err(SimError::invalid(
                    "bounds",
                    format!("min must be below max on axis {axis} ({lo} >= {hi})"),
                ));
            }
        }
        Ok(())
    }

    /// Edge lengths of the box.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// True when `p` lies inside the box (faces included).
    pub fn contains(&self, p: &Vec3) -> bool {
        (0..3).all(|axis| p[axis] >= self.min[axis] && p[axis] <= self.max[axis])
    }

    /// Uniformly random point inside the box.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let size = self.size();
        Vec3::new(
            self.min.x + rng.random::<f32>() * size.x,
            self.min.y + rng.random::<f32>() * size.y,
            self.min.z + rng.random::<f32>() * size.z,
        )
    }

    /// Teleport each out-of-range coordinate to the opposite face.
    ///
    /// Each axis is handled independently, so a particle leaving through a
    /// corner wraps on every axis it crossed.
    #[inline]
    pub fn wrap(&self, p: &mut [f32]) {
        for (axis, c) in p.iter_mut().enumerate().take(3) {
            if *c < self.min[axis] {
                *c = self.max[axis];
            } else if *c > self.max[axis] {
                *c = self.min[axis];
            }
        }
    }

    /// Clamp a point into the box. Used for externally placed particles whose
    /// coordinates may be arbitrarily far outside.
    pub fn clamp(&self, p: &Vec3) -> Vec3 {
        Vec3::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
            p.z.clamp(self.min.z, self.max.z),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_is_fifty_cube() {
        let b = Bounds::default();
        assert_eq!(b.min, Vec3::new(-50.0, -50.0, -50.0));
        assert_eq!(b.max, Vec3::new(50.0, 50.0, 50.0));
    }

    #[test]
    fn test_wrap_teleports_to_opposite_face() {
        let b = Bounds::default();
        let mut p = [50.5, -51.0, 10.0];
        b.wrap(&mut p);
        assert_eq!(p, [-50.0, 50.0, 10.0]);
    }

    #[test]
    fn test_wrap_keeps_faces() {
        let b = Bounds::default();
        let mut p = [50.0, -50.0, 0.0];
        b.wrap(&mut p);
        assert_eq!(p, [50.0, -50.0, 0.0]);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let err = Bounds::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 1.0));
        assert!(matches!(err, Err(SimError::InvalidParameter { .. })));
        assert!(Bounds::new(Vec3::zeros(), Vec3::new(f32::NAN, 1.0, 1.0)).is_err());
    }

    #[test]
    fn test_random_points_inside() {
        let b = Bounds::new(Vec3::new(-1.0, 0.0, 10.0), Vec3::new(1.0, 5.0, 20.0))
            .expect("valid bounds");
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            assert!(b.contains(&b.random_point(&mut rng)));
        }
    }
}
