//! Cone field: a directional fan, like a desk fan blowing along its axis.
//!
//! ```text
//! θ      = angle between (p - apex) and the axis
//! cone   = (1 - θ/α)²
//! dist   = 1 - (d/D)^0.75
//! force  = axis × strength × dist × cone × 3
//! ```
//!
//! The force always points along the axis, not along the particle offset.

use super::constants::{CONE_DISTANCE_EXPONENT, CONE_GAIN, MIN_CONE_ANGLE, MIN_DISTANCE};
use super::sanitize_direction;
use crate::core_types::vec3::Vec3;
use serde::Serialize;
use std::f32::consts::FRAC_PI_2;
use tracing::warn;

/// Parameters of a Cone wind field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConeParams {
    direction: Vec3,
    angle: f32,
}

impl ConeParams {
    pub fn new(direction: Vec3, angle: f32) -> Self {
        let mut params = Self {
            direction: sanitize_direction(&direction),
            angle: std::f32::consts::FRAC_PI_4,
        };
        params.set_angle(angle);
        params
    }

    /// Unit axis of the cone
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = sanitize_direction(&direction);
    }

    /// Half-angle in radians
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Set the half-angle, clamped into `(0, π/2]`.
    pub fn set_angle(&mut self, angle: f32) {
        if angle.is_nan() {
            warn!("Ignoring NaN cone angle");
            return;
        }
        let clamped = angle.clamp(MIN_CONE_ANGLE, FRAC_PI_2);
        if clamped != angle {
            warn!("Clamping cone angle {} to {}", angle, clamped);
        }
        self.angle = clamped;
    }

    pub(crate) fn force(&self, apex: &Vec3, strength: f32, max_distance: f32, p: &Vec3) -> Vec3 {
        let to_particle = p - apex;
        let distance = to_particle.norm();
        if distance > max_distance || distance < MIN_DISTANCE {
            return Vec3::zeros();
        }

        let cos_angle = (to_particle / distance).dot(&self.direction).clamp(-1.0, 1.0);
        let offset_angle = cos_angle.acos();
        if offset_angle > self.angle {
            return Vec3::zeros();
        }

        let cone_attenuation = (1.0 - offset_angle / self.angle).powi(2);
        let distance_attenuation =
            1.0 - (distance / max_distance).powf(CONE_DISTANCE_EXPONENT);

        self.direction * (strength * distance_attenuation * cone_attenuation * CONE_GAIN)
    }
}
