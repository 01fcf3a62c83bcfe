//! Wind Field Particle Simulation Core Library
//!
//! Advects an ensemble of point particles through the superposed forces of
//! several wind fields: a uniform global wind with drift and turbulence,
//! radial point sources/sinks, directional cones and rotating spirals.
//!
//! The crate exposes plain numeric state. A renderer reads the flat position
//! and colour buffers after each [`ParticleSystem::step`]; a control panel
//! edits field parameters and system settings between steps.
//!
//! ```
//! use windfield_core::{ParticleConfig, ParticleSystem, Vec3, WindField};
//!
//! let mut sim = ParticleSystem::new(ParticleConfig::default().with_count(100).with_seed(1))
//!     .expect("valid config");
//! let fan = sim.add_field(WindField::cone(Vec3::zeros(), Vec3::x(), 20.0, 0.6));
//! sim.step(1.0 / 60.0);
//! sim.remove_field(fan);
//! assert_eq!(sim.positions().len(), 300);
//! ```

// Core types and utilities
pub mod core_types;
pub mod error;

// Wind fields and the particle ensemble they drive
pub mod fields;
pub mod particles;

// Re-export core types
pub use core_types::{Bounds, Vec3};
pub use error::SimError;

pub use fields::presets;
pub use fields::{
    ConeParams, FieldId, FieldKind, FieldRegistry, GlobalParams, PointParams, SpiralParams,
    WindField,
};
pub use particles::{ParticleConfig, ParticleSystem, SimulationStats};
