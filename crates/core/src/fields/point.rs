//! Point field: radial source or sink with linear falloff.

use super::constants::MIN_DISTANCE;
use super::linear_attenuation;
use crate::core_types::vec3::Vec3;
use serde::Serialize;

/// Parameters of a Point wind field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointParams {
    outward: bool,
}

impl PointParams {
    pub fn new(outward: bool) -> Self {
        Self { outward }
    }

    /// True when the field pushes particles away from its centre.
    pub fn is_outward(&self) -> bool {
        self.outward
    }

    pub fn set_outward(&mut self, outward: bool) {
        self.outward = outward;
    }

    /// `strength × (1 - d/D)` along the centre-to-particle axis, zero outside
    /// `[MIN_DISTANCE, D]`.
    pub(crate) fn force(&self, origin: &Vec3, strength: f32, max_distance: f32, p: &Vec3) -> Vec3 {
        let offset = p - origin;
        let distance = offset.norm();
        if distance < MIN_DISTANCE || distance > max_distance {
            return Vec3::zeros();
        }
        let mut direction = offset / distance;
        if !self.outward {
            direction = -direction;
        }
        direction * (strength * linear_attenuation(distance, max_distance))
    }
}
