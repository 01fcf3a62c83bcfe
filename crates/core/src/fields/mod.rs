//! Wind fields: spatial force generators that advect particles.
//!
//! A [`WindField`] carries the attributes every generator shares (origin,
//! strength, enabled flag, range, identity) and a [`FieldKind`] holding the
//! shape-specific parameters. Force evaluation dispatches on the kind with a
//! plain `match`, so the per-particle, per-field hot loop has no virtual calls.
//!
//! # Shapes
//!
//! - **Global**: uniform wind with slow sinusoidal direction drift and optional
//!   position-dependent turbulence.
//! - **Point**: radial source (outward) or sink (inward) with linear falloff.
//! - **Cone**: directional fan, strongest on its axis and near its apex.
//! - **Spiral**: vortex with axial lift and a swirl that grows towards the rim.
//!
//! # Time
//!
//! Forces are pure functions of the field parameters, the query position and
//! an explicit simulation time (seconds). Only the Global kind reads the time.

mod cone;
mod global;
mod point;
pub mod presets;
mod registry;
mod spiral;

pub use cone::ConeParams;
pub use global::GlobalParams;
pub use point::PointParams;
pub use registry::FieldRegistry;
pub use spiral::SpiralParams;

use crate::core_types::vec3::{fallback_direction, is_finite, try_unit, Vec3};
use crate::error::SimError;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// Tuned constants shared by the force laws
pub mod constants {
    /// Distance below which radial fields produce no force. Guards the
    /// normalisation of the field-to-particle offset.
    pub const MIN_DISTANCE: f32 = 0.1;

    /// Default range of a point field
    pub const POINT_MAX_DISTANCE: f32 = 10.0;

    /// Default range of a cone field
    pub const CONE_MAX_DISTANCE: f32 = 15.0;

    /// Gain applied to the cone force
    pub const CONE_GAIN: f32 = 3.0;

    /// Exponent of the cone distance falloff
    pub const CONE_DISTANCE_EXPONENT: f32 = 0.75;

    /// Smallest accepted cone half-angle (radians)
    pub const MIN_CONE_ANGLE: f32 = 1e-3;

    /// Fraction of spiral strength applied along the axis
    pub const SPIRAL_LIFT: f32 = 0.5;

    /// Smallest accepted range for bounded fields
    pub const MIN_RANGE: f32 = 0.1;
}

static NEXT_FIELD_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique wind field identifier.
///
/// Assigned when a field is constructed and stable for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FieldId(u64);

impl FieldId {
    fn next() -> Self {
        FieldId(NEXT_FIELD_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, for external bookkeeping maps.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field-{}", self.0)
    }
}

/// Shape-specific wind field parameters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldKind {
    Global(GlobalParams),
    Point(PointParams),
    Cone(ConeParams),
    Spiral(SpiralParams),
}

impl FieldKind {
    /// Short lowercase name of the shape
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Global(_) => "global",
            FieldKind::Point(_) => "point",
            FieldKind::Cone(_) => "cone",
            FieldKind::Spiral(_) => "spiral",
        }
    }
}

/// A single wind field.
///
/// Not `Clone`: a copy would share the id of the original.
#[derive(Debug, Serialize)]
pub struct WindField {
    id: FieldId,
    position: Vec3,
    strength: f32,
    enabled: bool,
    /// Range of Point and Cone fields. Global is unbounded and Spiral uses
    /// its radius, see [`WindField::max_distance`].
    max_distance: f32,
    kind: FieldKind,
}

impl WindField {
    fn with_kind(position: Vec3, strength: f32, max_distance: f32, kind: FieldKind) -> Self {
        let mut field = Self {
            id: FieldId::next(),
            position: Vec3::zeros(),
            strength: 0.0,
            enabled: true,
            max_distance,
            kind,
        };
        field.set_position(position);
        field.set_strength(strength);
        field
    }

    /// Uniform wind blowing along `direction`.
    pub fn global(direction: Vec3, strength: f32) -> Self {
        Self::with_kind(
            Vec3::zeros(),
            strength,
            f32::INFINITY,
            FieldKind::Global(GlobalParams::new(direction)),
        )
    }

    /// Global field with explicitly configured drift and turbulence.
    pub fn from_global(params: GlobalParams, strength: f32) -> Self {
        Self::with_kind(Vec3::zeros(), strength, f32::INFINITY, FieldKind::Global(params))
    }

    /// Radial field centred on `position`; pushes when `outward`, pulls otherwise.
    pub fn point(position: Vec3, strength: f32, outward: bool) -> Self {
        Self::with_kind(
            position,
            strength,
            constants::POINT_MAX_DISTANCE,
            FieldKind::Point(PointParams::new(outward)),
        )
    }

    /// Directional fan with apex at `position` and half-angle `angle` (radians).
    pub fn cone(position: Vec3, direction: Vec3, strength: f32, angle: f32) -> Self {
        Self::with_kind(
            position,
            strength,
            constants::CONE_MAX_DISTANCE,
            FieldKind::Cone(ConeParams::new(direction, angle)),
        )
    }

    /// Vortex around the axis through `position` along `direction`.
    pub fn spiral(
        position: Vec3,
        direction: Vec3,
        strength: f32,
        radius: f32,
        rotation_speed: f32,
    ) -> Self {
        Self::with_kind(
            position,
            strength,
            f32::INFINITY,
            FieldKind::Spiral(SpiralParams::new(direction, radius, rotation_speed)),
        )
    }

    /// Builder form of [`WindField::set_max_distance`].
    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.set_max_distance(max_distance);
        self
    }

    /// Builder form of [`WindField::set_enabled`].
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Force on a particle at `position` at simulation time `time` (seconds).
    ///
    /// The result is a force to be summed with other fields, not a velocity.
    /// Disabled fields return zero.
    #[inline]
    pub fn force_at(&self, position: &Vec3, time: f32) -> Vec3 {
        if !self.enabled {
            return Vec3::zeros();
        }
        match &self.kind {
            FieldKind::Global(g) => g.force(self.strength, position, time),
            FieldKind::Point(p) => {
                p.force(&self.position, self.strength, self.max_distance, position)
            }
            FieldKind::Cone(c) => {
                c.force(&self.position, self.strength, self.max_distance, position)
            }
            FieldKind::Spiral(s) => s.force(&self.position, self.strength, position),
        }
    }

    /// Refresh time-dependent public state for simulation time `time`.
    ///
    /// For Global fields this updates the visible `direction` to the drifted
    /// base direction (periodic component only, no turbulence).
    pub fn advance(&mut self, time: f32) {
        if let FieldKind::Global(g) = &mut self.kind {
            g.advance(time);
        }
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Mutable access to the shape parameters. Their setters uphold the
    /// same invariants as the ones on this type.
    pub fn kind_mut(&mut self) -> &mut FieldKind {
        &mut self.kind
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Range beyond which the field contributes nothing.
    ///
    /// Infinite for Global fields; always equal to the radius for Spiral fields.
    pub fn max_distance(&self) -> f32 {
        match &self.kind {
            FieldKind::Global(_) => f32::INFINITY,
            FieldKind::Spiral(s) => s.radius(),
            FieldKind::Point(_) | FieldKind::Cone(_) => self.max_distance,
        }
    }

    /// Current unit direction, for kinds that have one.
    pub fn direction(&self) -> Option<Vec3> {
        match &self.kind {
            FieldKind::Global(g) => Some(g.direction()),
            FieldKind::Cone(c) => Some(c.direction()),
            FieldKind::Spiral(s) => Some(s.direction()),
            FieldKind::Point(_) => None,
        }
    }

    /// Move the field origin. Non-finite positions are ignored.
    pub fn set_position(&mut self, position: Vec3) {
        if !is_finite(&position) {
            warn!("Ignoring non-finite position for {}", self.id);
            return;
        }
        self.position = position;
    }

    /// Set the force multiplier, clamped to be non-negative.
    pub fn set_strength(&mut self, strength: f32) {
        if !strength.is_finite() {
            warn!("Ignoring non-finite strength {} for {}", strength, self.id);
            return;
        }
        if strength < 0.0 {
            warn!("Clamping negative strength {} to 0 for {}", strength, self.id);
        }
        self.strength = strength.max(0.0);
    }

    /// Enable or disable the field. Disabled fields stay registered but
    /// contribute nothing.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Set the range of the field.
    ///
    /// Global fields are unbounded and ignore this. Spiral fields treat it as
    /// their radius. Values are clamped to at least [`constants::MIN_RANGE`].
    pub fn set_max_distance(&mut self, max_distance: f32) {
        match &mut self.kind {
            FieldKind::Global(_) => {
                warn!("Global field {} has no range; ignoring max distance", self.id);
            }
            FieldKind::Spiral(s) => s.set_radius(max_distance),
            FieldKind::Point(_) | FieldKind::Cone(_) => {
                if let Some(range) = sanitize_range(max_distance, "max_distance") {
                    self.max_distance = range;
                }
            }
        }
    }

    /// Point the field along `direction`, normalised on the way in.
    ///
    /// For Global fields this sets the base direction. Point fields have no
    /// direction and ignore the call.
    pub fn set_direction(&mut self, direction: Vec3) {
        match &mut self.kind {
            FieldKind::Global(g) => g.set_base_direction(direction),
            FieldKind::Cone(c) => c.set_direction(direction),
            FieldKind::Spiral(s) => s.set_direction(direction),
            FieldKind::Point(_) => {
                warn!("Point field {} has no direction; ignoring", self.id);
            }
        }
    }

    /// Check every invariant, for callers that want loud failures.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidParameter`] naming the first violated invariant.
    pub fn validate(&self) -> Result<(), SimError> {
        if !is_finite(&self.position) {
            return Err(SimError::invalid("position", "must be finite"));
        }
        if !(self.strength.is_finite() && self.strength >= 0.0) {
            return Err(SimError::invalid("strength", "must be finite and >= 0"));
        }
        let range = self.max_distance();
        if range.is_nan() || range <= 0.0 {
            return Err(SimError::invalid("max_distance", "must be > 0"));
        }
        if let Some(dir) = self.direction() {
            if (dir.norm() - 1.0).abs() > 1e-4 {
                return Err(SimError::invalid("direction", "must be unit length"));
            }
        }
        if let FieldKind::Cone(c) = &self.kind {
            let angle = c.angle();
            if !(angle > 0.0 && angle <= std::f32::consts::FRAC_PI_2) {
                return Err(SimError::invalid("angle", "must lie in (0, pi/2]"));
            }
        }
        Ok(())
    }
}

/// Linear falloff: 1 at the origin, 0 at and beyond `max_distance`.
#[inline]
pub fn linear_attenuation(distance: f32, max_distance: f32) -> f32 {
    if distance >= max_distance {
        return 0.0;
    }
    1.0 - distance / max_distance
}

/// Normalise a direction for storage, warning when the fallback kicks in.
pub(crate) fn sanitize_direction(direction: &Vec3) -> Vec3 {
    match try_unit(direction) {
        Some(unit) => unit,
        None => {
            warn!(
                "Degenerate direction ({}, {}, {}); falling back to +Y",
                direction.x, direction.y, direction.z
            );
            fallback_direction()
        }
    }
}

/// Accept a range value, clamping it to [`constants::MIN_RANGE`].
/// Returns `None` (and warns) for NaN.
pub(crate) fn sanitize_range(value: f32, name: &str) -> Option<f32> {
    if value.is_nan() {
        warn!("Ignoring NaN {}", name);
        return None;
    }
    if value < constants::MIN_RANGE {
        warn!("Clamping {} {} to {}", name, value, constants::MIN_RANGE);
    }
    Some(value.max(constants::MIN_RANGE))
}
