//! Global wind: a uniform field with drifting direction and turbulence.
//!
//! The direction is split into two layers:
//!
//! 1. A slow periodic drift of the base direction, shared by the whole scene.
//!    This is what [`GlobalParams::direction`] exposes, so indicators only
//!    show the low-frequency wind.
//! 2. A spatial/temporal perturbation built from three weighted sinusoids per
//!    axis, evaluated at each particle. This is the fine turbulence.
//!
//! ```text
//! s      = (t + phase) × f
//! drift  = normalize(base + A × (sin s, sin 1.3s, sin 0.7s))
//! force  = strength × normalize(drift + noise(p × k, 0.1t))
//! ```

use super::sanitize_direction;
use crate::core_types::vec3::{try_unit, Vec3};
use rand::Rng;
use serde::Serialize;
use tracing::warn;

/// Default turbulence magnitude
pub const DEFAULT_NOISE_SCALE: f32 = 0.15;
/// Default spatial frequency of the turbulence (smaller is smoother)
pub const DEFAULT_NOISE_SPACE_SCALE: f32 = 0.05;
/// Default amplitude of the periodic drift
pub const DEFAULT_SIN_AMPLITUDE: f32 = 0.2;
/// Default drift frequency (Hz)
pub const DEFAULT_SIN_FREQUENCY: f32 = 0.5;
/// Upper bound of the random per-instance phase offset (seconds)
pub const MAX_PHASE_OFFSET: f32 = 1000.0;

/// Harmonic multipliers of the drift on x, y and z
const DRIFT_HARMONICS: [f32; 3] = [1.0, 1.3, 0.7];
/// Turbulence time runs at a tenth of simulation time
const NOISE_TIME_SCALE: f32 = 0.1;

/// Parameters of a Global wind field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalParams {
    base_direction: Vec3,
    direction: Vec3,
    noise_scale: f32,
    noise_space_scale: f32,
    sin_amplitude: f32,
    sin_frequency: f32,
    phase_offset: f32,
}

impl GlobalParams {
    /// Default drift and turbulence around `direction`, with a random phase.
    pub fn new(direction: Vec3) -> Self {
        Self::with_rng(direction, &mut rand::rng())
    }

    /// Like [`GlobalParams::new`], drawing the phase offset from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(direction: Vec3, rng: &mut R) -> Self {
        let base = sanitize_direction(&direction);
        Self {
            base_direction: base,
            direction: base,
            noise_scale: DEFAULT_NOISE_SCALE,
            noise_space_scale: DEFAULT_NOISE_SPACE_SCALE,
            sin_amplitude: DEFAULT_SIN_AMPLITUDE,
            sin_frequency: DEFAULT_SIN_FREQUENCY,
            phase_offset: rng.random::<f32>() * MAX_PHASE_OFFSET,
        }
    }

    /// Steady wind: no drift, no turbulence.
    pub fn steady(direction: Vec3) -> Self {
        let mut params = Self::new(direction);
        params.noise_scale = 0.0;
        params.sin_amplitude = 0.0;
        params.phase_offset = 0.0;
        params
    }

    /// Drift-only direction at time `time`. Falls back to the base direction
    /// when the offset cancels it out.
    pub fn drifted_direction(&self, time: f32) -> Vec3 {
        if self.sin_amplitude == 0.0 {
            return self.base_direction;
        }
        let s = (time + self.phase_offset) * self.sin_frequency;
        let offset = Vec3::new(
            (s * DRIFT_HARMONICS[0]).sin(),
            (s * DRIFT_HARMONICS[1]).sin(),
            (s * DRIFT_HARMONICS[2]).sin(),
        ) * self.sin_amplitude;
        try_unit(&(self.base_direction + offset)).unwrap_or(self.base_direction)
    }

    /// Turbulence vector at `p` and time `time`, scaled by `noise_scale`.
    pub fn turbulence(&self, p: &Vec3, time: f32) -> Vec3 {
        let px = p.x * self.noise_space_scale;
        let py = p.y * self.noise_space_scale;
        let pz = p.z * self.noise_space_scale;
        let t = time * NOISE_TIME_SCALE;

        let nx = (px * 1.7 + py * 2.3 + t * 0.5).sin() * 0.5
            + (py * 3.1 + pz * 1.9 + t * 0.7).sin() * 0.25
            + (pz * 2.5 + px * 1.3 + t * 0.9).sin() * 0.25;

        let ny = (py * 2.3 + pz * 1.7 + t * 0.6).sin() * 0.5
            + (pz * 1.9 + px * 3.1 + t * 0.8).sin() * 0.25
            + (px * 2.5 + py * 1.3 + t * 1.0).sin() * 0.25;

        let nz = (pz * 1.7 + px * 2.3 + t * 0.7).sin() * 0.5
            + (px * 3.1 + py * 1.9 + t * 0.9).sin() * 0.25
            + (py * 2.5 + pz * 1.3 + t * 1.1).sin() * 0.25;

        Vec3::new(nx, ny, nz) * self.noise_scale
    }

    pub(crate) fn force(&self, strength: f32, p: &Vec3, time: f32) -> Vec3 {
        let drift = self.drifted_direction(time);
        if self.noise_scale <= 0.0 {
            return drift * strength;
        }
        let turbulent = try_unit(&(drift + self.turbulence(p, time))).unwrap_or(drift);
        turbulent * strength
    }

    pub(crate) fn advance(&mut self, time: f32) {
        self.direction = self.drifted_direction(time);
    }

    /// Visible direction: base direction plus drift at the last advance.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn base_direction(&self) -> Vec3 {
        self.base_direction
    }

    /// Set the base direction; the visible direction snaps to it until the
    /// next advance.
    pub fn set_base_direction(&mut self, direction: Vec3) {
        self.base_direction = sanitize_direction(&direction);
        self.direction = self.base_direction;
    }

    pub fn noise_scale(&self) -> f32 {
        self.noise_scale
    }

    /// Turbulence magnitude; 0 disables turbulence.
    pub fn set_noise_scale(&mut self, value: f32) {
        if let Some(v) = non_negative(value, "noise_scale") {
            self.noise_scale = v;
        }
    }

    pub fn noise_space_scale(&self) -> f32 {
        self.noise_space_scale
    }

    pub fn set_noise_space_scale(&mut self, value: f32) {
        if let Some(v) = non_negative(value, "noise_space_scale") {
            self.noise_space_scale = v;
        }
    }

    pub fn sin_amplitude(&self) -> f32 {
        self.sin_amplitude
    }

    /// Drift amplitude; 0 disables drift.
    pub fn set_sin_amplitude(&mut self, value: f32) {
        if let Some(v) = non_negative(value, "sin_amplitude") {
            self.sin_amplitude = v;
        }
    }

    pub fn sin_frequency(&self) -> f32 {
        self.sin_frequency
    }

    pub fn set_sin_frequency(&mut self, value: f32) {
        if let Some(v) = non_negative(value, "sin_frequency") {
            self.sin_frequency = v;
        }
    }

    pub fn phase_offset(&self) -> f32 {
        self.phase_offset
    }

    pub fn set_phase_offset(&mut self, value: f32) {
        if value.is_finite() {
            self.phase_offset = value;
        } else {
            warn!("Ignoring non-finite phase offset {}", value);
        }
    }
}

fn non_negative(value: f32, name: &str) -> Option<f32> {
    if !value.is_finite() {
        warn!("Ignoring non-finite {} {}", name, value);
        return None;
    }
    if value < 0.0 {
        warn!("Clamping negative {} {} to 0", name, value);
    }
    Some(value.max(0.0))
}
