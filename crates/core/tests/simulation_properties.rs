//! Ensemble-level behaviour of the particle system under wind fields
//!
//! These tests drive the public API the way a render loop does: build a
//! system, register fields, step it and read the flat buffers back.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use windfield_core::presets::default_scene;
use windfield_core::{GlobalParams, ParticleConfig, ParticleSystem, Vec3, WindField};

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn seeded(count: usize, seed: u64) -> ParticleSystem {
    ParticleSystem::new(ParticleConfig::default().with_count(count).with_seed(seed))
        .expect("valid config")
}

fn scene_system(count: usize, seed: u64) -> ParticleSystem {
    let mut rng = StdRng::seed_from_u64(seed);
    seeded(count, seed).with_fields(default_scene(&mut rng))
}

#[test]
fn test_positions_stay_inside_bounds() {
    let mut sim = scene_system(2000, 1);
    for _ in 0..120 {
        sim.step(1.0 / 30.0);
        for p in sim.positions().chunks_exact(3) {
            for &c in p {
                assert!((-50.0..=50.0).contains(&c), "coordinate escaped: {c}");
            }
        }
    }
}

#[test]
fn test_large_timestep_still_wraps() {
    let mut sim = scene_system(500, 2);
    sim.set_speed_factor(4.0);
    for _ in 0..20 {
        sim.step(1.0);
    }
    let bounds = *sim.bounds();
    for i in 0..sim.count() {
        assert!(bounds.contains(&sim.position(i).unwrap()));
    }
}

#[test]
fn test_speed_never_exceeds_cap() {
    let mut sim = scene_system(2000, 3);
    for factor in [1.0, 0.3, 2.5] {
        sim.set_speed_factor(factor);
        for _ in 0..30 {
            sim.step(0.05);
            let cap = 12.0 * factor + 1e-4;
            for v in sim.velocities().chunks_exact(3) {
                let speed = Vec3::new(v[0], v[1], v[2]).norm();
                assert!(speed <= cap, "speed {speed} above cap {cap}");
            }
        }
    }
}

#[test]
fn test_colors_follow_speed() {
    let mut sim = scene_system(300, 4);
    sim.step(0.1);
    let cap = sim.max_speed();
    for i in 0..sim.count() {
        let ratio = sim.velocity(i).unwrap().norm() / cap;
        let c = sim.color(i).unwrap();
        assert_relative_eq!(c[0], 0.6 + 0.4 * ratio, epsilon = 1e-5);
        assert_relative_eq!(c[1], 0.7 + 0.3 * ratio, epsilon = 1e-5);
        assert_relative_eq!(c[2], 0.8 + 0.2 * ratio, epsilon = 1e-5);
    }
}

#[test]
fn test_steady_global_single_step() {
    // F = 5 along +X, v = 0 × 0.95 + 5 × 1 × 1 × 1.5 = 7.5, below the cap of 12.
    let mut sim = seeded(1, 5);
    sim.add_field(WindField::from_global(GlobalParams::steady(Vec3::x()), 5.0));
    sim.place_particle(0, Vec3::zeros(), Vec3::zeros()).unwrap();
    sim.step(1.0);

    let v = sim.velocity(0).unwrap();
    assert_relative_eq!(v.x, 7.5, epsilon = 1e-6);
    assert_relative_eq!(v.y, 0.0);
    assert_relative_eq!(v.z, 0.0);

    let p = sim.position(0).unwrap();
    assert_relative_eq!(p.x, 7.5, epsilon = 1e-6);

    let c = sim.color(0).unwrap();
    assert_relative_eq!(c[0], 0.6 + 0.4 * 0.625, epsilon = 1e-6);
    assert_relative_eq!(c[1], 0.7 + 0.3 * 0.625, epsilon = 1e-6);
    assert_relative_eq!(c[2], 0.8 + 0.2 * 0.625, epsilon = 1e-6);
}

#[test]
fn test_steady_global_reaches_cap() {
    // Second step: 7.5 × 0.95 + 7.5 = 14.625 > 12, so the cap applies.
    let mut sim = seeded(1, 6);
    sim.add_field(WindField::from_global(GlobalParams::steady(Vec3::x()), 5.0));
    sim.place_particle(0, Vec3::zeros(), Vec3::zeros()).unwrap();
    sim.step(1.0);
    sim.step(1.0);
    let v = sim.velocity(0).unwrap();
    assert_relative_eq!(v.x, 12.0, epsilon = 1e-5);
    assert_relative_eq!(sim.position(0).unwrap().x, 19.5, epsilon = 1e-5);
}

#[test]
fn test_disabling_field_removes_contribution() {
    let mut sim = seeded(1, 7);
    let id = sim.add_field(WindField::point(Vec3::zeros(), 10.0, true));
    sim.place_particle(0, Vec3::new(5.0, 0.0, 0.0), Vec3::zeros())
        .unwrap();
    sim.step(0.1);
    assert!(sim.velocity(0).unwrap().x > 0.0);

    sim.field_mut(id).unwrap().set_enabled(false);
    let before = sim.velocity(0).unwrap();
    sim.step(0.1);
    let after = sim.velocity(0).unwrap();
    // Only damping acts once the field is off.
    assert_relative_eq!(after.x, before.x * 0.95, epsilon = 1e-6);
    assert_eq!(sim.fields().force_at(&Vec3::new(5.0, 0.0, 0.0), 0.0), Vec3::zeros());
}

#[test]
fn test_resize_round_trip_preserves_prefix() {
    let mut sim = scene_system(1000, 8);
    for _ in 0..10 {
        sim.step(0.05);
    }
    let positions = sim.positions().to_vec();
    let velocities = sim.velocities().to_vec();

    sim.resize(1500).unwrap();
    assert_eq!(sim.count(), 1500);
    assert_eq!(&sim.positions()[..3000], positions.as_slice());
    assert_eq!(&sim.velocities()[..3000], velocities.as_slice());

    sim.resize(1000).unwrap();
    assert_eq!(sim.positions(), positions.as_slice());
    assert_eq!(sim.velocities(), velocities.as_slice());

    sim.resize(400).unwrap();
    assert_eq!(sim.positions(), &positions[..1200]);
    assert_eq!(sim.colors().len(), 1200);
}

#[test]
fn test_grown_particles_seeded_inside_bounds() {
    let mut sim = seeded(10, 9);
    sim.resize(5000).unwrap();
    let bounds = *sim.bounds();
    for i in 10..sim.count() {
        assert!(bounds.contains(&sim.position(i).unwrap()));
        assert!(sim.velocity(i).unwrap().norm() < 0.1);
    }
}

#[test]
fn test_same_seed_same_trajectory() {
    let build = || {
        let mut sim = seeded(200, 10);
        sim.add_field(WindField::cone(
            Vec3::new(-10.0, 0.0, 0.0),
            Vec3::x(),
            20.0,
            0.6,
        ));
        sim.add_field(WindField::spiral(Vec3::new(0.0, -20.0, 0.0), Vec3::y(), 2.0, 8.0, 1.0));
        sim
    };
    let mut a = build();
    let mut b = build();
    for _ in 0..25 {
        a.step(1.0 / 60.0);
        b.step(1.0 / 60.0);
    }
    assert_eq!(a.positions(), b.positions());
    assert_eq!(a.velocities(), b.velocities());
}

#[test]
fn test_field_edits_apply_on_next_step() {
    let mut sim = seeded(1, 11);
    let id = sim.add_field(WindField::from_global(GlobalParams::steady(Vec3::x()), 2.0));
    sim.place_particle(0, Vec3::zeros(), Vec3::zeros()).unwrap();

    let field = sim.field_mut(id).unwrap();
    field.set_direction(Vec3::new(0.0, 0.0, -3.0));
    field.set_strength(4.0);
    sim.step(0.5);

    let v = sim.velocity(0).unwrap();
    assert_relative_eq!(v.x, 0.0, epsilon = 1e-6);
    assert_relative_eq!(v.z, -3.0, epsilon = 1e-6);
}

#[test]
fn test_global_direction_drifts_with_clock() {
    let mut sim = seeded(1, 12);
    let mut params = GlobalParams::new(Vec3::x());
    params.set_phase_offset(0.0);
    let id = sim.add_field(WindField::from_global(params, 1.0));

    sim.step(1.0);
    let first = sim.field(id).unwrap().direction().unwrap();
    sim.step(1.0);
    let second = sim.field(id).unwrap().direction().unwrap();

    assert_relative_eq!(first.norm(), 1.0, epsilon = 1e-6);
    assert!((first - second).norm() > 1e-3);
    let windfield_core::FieldKind::Global(g) = sim.field(id).unwrap().kind() else {
        panic!("expected a global field");
    };
    assert_eq!(second, g.drifted_direction(2.0));
}

#[test]
fn test_removed_field_stops_acting() {
    let mut sim = seeded(1, 13);
    let id = sim.add_field(WindField::from_global(GlobalParams::steady(Vec3::y()), 3.0));
    assert!(sim.remove_field(id).is_some());
    assert!(sim.remove_field(id).is_none());

    sim.place_particle(0, Vec3::zeros(), Vec3::zeros()).unwrap();
    sim.step(1.0);
    assert_eq!(sim.velocity(0).unwrap(), Vec3::zeros());
}
