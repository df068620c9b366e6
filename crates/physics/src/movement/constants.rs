//! Movement tunables.
//!
//! [`MovementConstants`] are shared by every mover in the process.
//! [`MoverSettings`] are per entity (a heavier character can have a lower max
//! speed). Both use metric units.

use serde::{Deserialize, Serialize};

/// Process-wide movement constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConstants {
    /// Scale applied to a surface's dynamic friction coefficient.
    pub friction_multiplier: f32,

    /// Wish speed counted when checking whether air acceleration still applies.
    pub air_cap: f32,

    /// Air acceleration (units/second²).
    pub air_acceleration: f32,

    /// Friction while airborne. Carried for hosts; the airborne step applies none.
    pub air_friction: f32,

    /// Speed floor used by friction so slow movers still stop promptly.
    pub stop_speed: f32,

    /// Drag applied to held props, divided by the prop's mass.
    pub drag_power: f32,

    /// Props at or above this mass count as heavy.
    pub heavy_prop_mass: f32,

    /// Gravity acceleration (meters/second²).
    pub gravity: f32,

    /// Extra weight on gravity for snappier falls.
    pub gravity_scale: f32,
}

/// The constants every mover uses unless a host loads its own.
pub const MOVEMENT_CONSTANTS: MovementConstants = MovementConstants::source();

impl MovementConstants {
    /// Source-style defaults.
    pub const fn source() -> Self {
        Self {
            friction_multiplier: 6.666666,
            air_cap: 0.575,
            air_acceleration: 15000.0,
            air_friction: 0.25,
            stop_speed: 1.905,
            drag_power: 10.0,
            heavy_prop_mass: 15.0,
            gravity: 9.81,
            gravity_scale: 1.55,
        }
    }

    /// Downward acceleration applied to airborne movers.
    #[inline]
    pub fn effective_gravity(&self) -> f32 {
        self.gravity * self.gravity_scale
    }
}

impl Default for MovementConstants {
    fn default() -> Self {
        Self::source()
    }
}

/// Per-entity movement settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoverSettings {
    /// Cap on wish speed (meters/second).
    pub max_speed: f32,

    /// Multiplier on the capped wish speed while grounded.
    pub walk_speed: f32,

    /// Ground acceleration. Also scales the raw input axis.
    pub acceleration: f32,

    /// Upward velocity set when jumping (meters/second).
    pub jump_power: f32,
}

impl Default for MoverSettings {
    fn default() -> Self {
        Self {
            max_speed: 6.0,
            walk_speed: 1.0,
            acceleration: 7.62,
            jump_power: 5.112,
        }
    }
}
