//! Speed-derived particle colour.
//!
//! Colour is simulation state, not render state: it is written by every step
//! and read by the renderer as-is. Channels brighten linearly with the ratio
//! of speed to the current speed cap:
//!
//! ```text
//! R = 0.6 + 0.4 × ratio
//! G = 0.7 + 0.3 × ratio
//! B = 0.8 + 0.2 × ratio
//! ```

use rand::Rng;

/// Colour of a particle at rest
pub const REST_COLOR: [f32; 3] = [0.6, 0.7, 0.8];

/// Per-channel brightening at full speed
pub const SPEED_GAIN: [f32; 3] = [0.4, 0.3, 0.2];

/// Colour for a particle moving at `speed` under a cap of `max_speed`.
///
/// A zero cap yields the rest colour.
#[inline]
pub fn speed_color(speed: f32, max_speed: f32) -> [f32; 3] {
    let ratio = if max_speed > 0.0 { speed / max_speed } else { 0.0 };
    [
        REST_COLOR[0] + SPEED_GAIN[0] * ratio,
        REST_COLOR[1] + SPEED_GAIN[1] * ratio,
        REST_COLOR[2] + SPEED_GAIN[2] * ratio,
    ]
}

/// Bluish-white colour given to freshly spawned particles until their first
/// step.
pub fn spawn_color<R: Rng + ?Sized>(rng: &mut R) -> [f32; 3] {
    [
        0.7 + rng.random::<f32>() * 0.3,
        0.8 + rng.random::<f32>() * 0.2,
        1.0,
    ]
}
