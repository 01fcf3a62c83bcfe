//! Ready-made fields for interactive scenes.
//!
//! These mirror what a control panel spawns when the user clicks "add field":
//! a randomly placed field near the centre of the default volume with tuned
//! strengths that read well at the default particle speed.

use super::{FieldRegistry, GlobalParams, WindField};
use crate::core_types::vec3::Vec3;
use rand::Rng;
use std::f32::consts::PI;

/// Half-extent of the cube new fields are placed in
pub const SPAWN_HALF_EXTENT: f32 = 15.0;

/// Default scene wind: steady +X breeze with drift and turbulence.
pub fn default_global_field<R: Rng + ?Sized>(rng: &mut R) -> WindField {
    WindField::from_global(GlobalParams::with_rng(Vec3::x(), rng), 5.0)
}

/// Random source or sink, strength 1.5, range 12.
pub fn random_point_field<R: Rng + ?Sized>(rng: &mut R) -> WindField {
    let outward = rng.random_bool(0.5);
    WindField::point(random_spawn_position(rng), 1.5, outward).with_max_distance(12.0)
}

/// Randomly aimed fan, strength 20, half-angle 36°, range 25.
pub fn random_cone_field<R: Rng + ?Sized>(rng: &mut R) -> WindField {
    let position = random_spawn_position(rng);
    let direction = Vec3::new(
        rng.random::<f32>() - 0.5,
        rng.random::<f32>() - 0.5,
        rng.random::<f32>() - 0.5,
    );
    WindField::cone(position, direction, 20.0, PI / 5.0).with_max_distance(25.0)
}

/// Upright vortex rising from y = -20, strength 2, radius 8.
pub fn random_spiral_field<R: Rng + ?Sized>(rng: &mut R) -> WindField {
    let position = Vec3::new(
        (rng.random::<f32>() - 0.5) * 2.0 * SPAWN_HALF_EXTENT,
        -20.0,
        (rng.random::<f32>() - 0.5) * 2.0 * SPAWN_HALF_EXTENT,
    );
    WindField::spiral(position, Vec3::y(), 2.0, 8.0, 1.0)
}

/// Registry holding the default global wind plus one random field of every
/// other kind.
pub fn default_scene<R: Rng + ?Sized>(rng: &mut R) -> FieldRegistry {
    let mut registry = FieldRegistry::new();
    registry.add(default_global_field(rng));
    registry.add(random_point_field(rng));
    registry.add(random_cone_field(rng));
    registry.add(random_spiral_field(rng));
    registry
}

fn random_spawn_position<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let mut coord = || (rng.random::<f32>() - 0.5) * 2.0 * SPAWN_HALF_EXTENT;
    Vec3::new(coord(), coord(), coord())
}
