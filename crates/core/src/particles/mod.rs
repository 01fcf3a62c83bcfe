//! Particle ensemble and its integration step

pub mod buffers;
pub mod color;
pub mod config;
mod system;

pub use buffers::ParticleBuffers;
pub use color::speed_color;
pub use config::ParticleConfig;
pub use system::{constants, ParticleSystem, SimulationStats};
