//! Exact force-law checks through the public field API

use approx::assert_relative_eq;
use std::f32::consts::FRAC_PI_4;
use windfield_core::{FieldKind, FieldRegistry, GlobalParams, Vec3, WindField};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_point_half_range_magnitude() {
    let (s, d) = (3.0, 12.0);
    let origin = Vec3::new(4.0, -2.0, 1.0);
    let field = WindField::point(origin, s, true).with_max_distance(d);
    let dir = Vec3::new(1.0, 2.0, -2.0).normalize();
    let f = field.force_at(&(origin + dir * (d / 2.0)), 0.0);

    assert_relative_eq!(f.norm(), s * 0.5, epsilon = 1e-5);
    // Directed away from the centre
    assert_relative_eq!(f.normalize().dot(&dir), 1.0, epsilon = 1e-5);
}

#[test]
fn test_point_sink_mirrors_source() {
    let source = WindField::point(Vec3::zeros(), 2.0, true);
    let sink = WindField::point(Vec3::zeros(), 2.0, false);
    let probe = Vec3::new(0.0, 0.0, 7.0);
    assert_eq!(source.force_at(&probe, 0.0), -sink.force_at(&probe, 0.0));
}

#[test]
fn test_cone_on_axis_formula() {
    let (s, d) = (20.0, 25.0);
    let apex = Vec3::new(-5.0, 0.0, 0.0);
    let field = WindField::cone(apex, Vec3::new(1.0, 0.0, 0.0), s, FRAC_PI_4).with_max_distance(d);
    let f = field.force_at(&(apex + Vec3::new(d / 2.0, 0.0, 0.0)), 0.0);

    let distance_attenuation = 1.0 - 0.5_f32.powf(0.75);
    assert_relative_eq!(f.norm(), s * distance_attenuation * 1.0 * 3.0, epsilon = 1e-4);
    assert_relative_eq!(f.x, f.norm());
}

#[test]
fn test_cone_edge_is_weak() {
    let field = WindField::cone(Vec3::zeros(), Vec3::z(), 10.0, FRAC_PI_4);
    let near_edge = Vec3::new((FRAC_PI_4 * 0.99).sin(), 0.0, (FRAC_PI_4 * 0.99).cos()) * 5.0;
    let on_axis = Vec3::new(0.0, 0.0, 5.0);
    let weak = field.force_at(&near_edge, 0.0).norm();
    let strong = field.force_at(&on_axis, 0.0).norm();
    assert!(weak < strong * 0.001);
}

#[test]
fn test_spiral_rim_inclusive_outside_exclusive() {
    let radius = 6.0;
    let field = WindField::spiral(Vec3::new(1.0, -20.0, 1.0), Vec3::y(), 2.0, radius, 1.5);

    let rim = Vec3::new(1.0 + radius, 0.0, 1.0);
    let f = field.force_at(&rim, 0.0);
    assert_relative_eq!(f.y, 1.0, epsilon = 1e-6);
    // Swirl at the rim: strength × rotation speed along (-z, 0, x) of the offset
    assert_relative_eq!(f.z, 3.0, epsilon = 1e-5);

    let outside = Vec3::new(1.0 + radius + 0.001, 0.0, 1.0);
    assert_eq!(field.force_at(&outside, 0.0), Vec3::zeros());
}

#[test]
fn test_global_is_uniform_without_turbulence() {
    let mut params = GlobalParams::new(Vec3::new(0.0, 1.0, 1.0));
    params.set_noise_scale(0.0);
    let field = WindField::from_global(params, 4.0);
    let a = field.force_at(&Vec3::new(-40.0, 3.0, 20.0), 8.0);
    let b = field.force_at(&Vec3::new(45.0, -30.0, 0.0), 8.0);
    assert_eq!(a, b);
    assert_relative_eq!(a.norm(), 4.0, epsilon = 1e-5);
}

#[test]
fn test_registry_sum_matches_individual_forces() {
    let fields = [
        WindField::point(Vec3::new(2.0, 0.0, 0.0), 1.5, false).with_max_distance(12.0),
        WindField::cone(Vec3::new(-3.0, 0.0, 0.0), Vec3::x(), 20.0, 0.6),
        WindField::spiral(Vec3::new(0.0, -5.0, 0.0), Vec3::y(), 2.0, 8.0, 1.0),
        WindField::from_global(GlobalParams::steady(Vec3::z()), 1.0),
    ];
    let probe = Vec3::new(1.0, 0.5, 0.5);
    let expected: Vec3 = fields.iter().map(|f| f.force_at(&probe, 3.0)).sum();

    let mut registry = FieldRegistry::new();
    for field in fields {
        registry.add(field);
    }
    let total = registry.force_at(&probe, 3.0);
    assert_relative_eq!(total.x, expected.x, epsilon = 1e-5);
    assert_relative_eq!(total.y, expected.y, epsilon = 1e-5);
    assert_relative_eq!(total.z, expected.z, epsilon = 1e-5);
}

#[test]
fn test_ui_edits_keep_invariants() {
    let mut field = WindField::spiral(Vec3::zeros(), Vec3::y(), 2.0, 8.0, 1.0);
    field.set_direction(Vec3::new(0.0, 0.0, 0.0));
    field.set_strength(-1.0);
    field.set_max_distance(-5.0);
    if let FieldKind::Spiral(params) = field.kind_mut() {
        params.set_rotation_speed(f32::NAN);
    }
    assert!(field.validate().is_ok());
    assert_eq!(field.direction(), Some(Vec3::y()));
    assert_eq!(field.strength(), 0.0);
    assert!(field.max_distance() > 0.0);
}
