//! Vector type alias for 3D positions, velocities and directions.
//!
//! Helpers here keep direction vectors unit-length at every mutation boundary
//! so no NaN from a zero-length normalisation can reach the force laws.

use nalgebra::Vector3;

/// 3D vector type for positions, velocities, forces and directions.
///
/// This is a simple alias for `nalgebra::Vector3<f32>`, used throughout
/// the simulation for particle state and field parameters.
pub type Vec3 = Vector3<f32>;

/// Direction used when a supplied direction cannot be normalised (+Y).
#[inline]
pub fn fallback_direction() -> Vec3 {
    Vec3::y()
}

/// Squared-length threshold below which a vector is treated as zero.
const MIN_NORM_SQUARED: f32 = 1e-12;

/// Normalise `v`, or return `None` when it is zero-length or non-finite.
#[inline]
pub fn try_unit(v: &Vec3) -> Option<Vec3> {
    if !is_finite(v) || v.norm_squared() < MIN_NORM_SQUARED {
        return None;
    }
    Some(v.normalize())
}

/// Normalise `v`, falling back to [`fallback_direction`].
#[inline]
pub fn unit_or_fallback(v: &Vec3) -> Vec3 {
    try_unit(v).unwrap_or_else(fallback_direction)
}

/// True when every component is finite.
#[inline]
pub fn is_finite(v: &Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}
