//! Spiral field: a vortex with lift along its axis, like a small tornado.
//!
//! The particle offset is projected onto the plane perpendicular to the axis.
//! Inside the radius every particle gets a constant lift along the axis plus a
//! swirl tangent to the circle around the axis whose magnitude grows linearly
//! from zero at the centre to `strength × rotation_speed` at the rim.
//!
//! The influence region is an infinite cylinder: only the planar distance is
//! tested, never the height along the axis.

use super::constants::{MIN_DISTANCE, SPIRAL_LIFT};
use super::{sanitize_direction, sanitize_range};
use crate::core_types::vec3::Vec3;
use serde::Serialize;
use tracing::warn;

/// Parameters of a Spiral wind field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpiralParams {
    direction: Vec3,
    radius: f32,
    rotation_speed: f32,
}

impl SpiralParams {
    pub fn new(direction: Vec3, radius: f32, rotation_speed: f32) -> Self {
        let mut params = Self {
            direction: sanitize_direction(&direction),
            radius: 5.0,
            rotation_speed: 1.0,
        };
        params.set_radius(radius);
        params.set_rotation_speed(rotation_speed);
        params
    }

    /// Unit ascending axis
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = sanitize_direction(&direction);
    }

    /// Radius of the cylinder of influence; also the field's range.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        if let Some(r) = sanitize_range(radius, "spiral radius") {
            self.radius = r;
        }
    }

    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    /// Swirl multiplier. Negative values reverse the swirl.
    pub fn set_rotation_speed(&mut self, rotation_speed: f32) {
        if rotation_speed.is_finite() {
            self.rotation_speed = rotation_speed;
        } else {
            warn!("Ignoring non-finite rotation speed {}", rotation_speed);
        }
    }

    pub(crate) fn force(&self, origin: &Vec3, strength: f32, p: &Vec3) -> Vec3 {
        let local = p - origin;
        let planar = local - self.direction * local.dot(&self.direction);
        let r = planar.norm();
        if r > self.radius {
            return Vec3::zeros();
        }

        let lift = self.direction * (strength * SPIRAL_LIFT);
        if r <= MIN_DISTANCE {
            return lift;
        }

        // Right-handed about the axis: for an upward axis, (x, 0, z) -> (-z, 0, x).
        let tangent = (planar / r).cross(&self.direction);
        let swirl = tangent * ((r / self.radius) * strength * self.rotation_speed);
        lift + swirl
    }
}
