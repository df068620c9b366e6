//! Movement state, per-tick input and per-tick output.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::collision::SurfaceId;

/// Which kinds of surface blocked movement during a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockedFlags(pub u8);

impl BlockedFlags {
    /// Nothing blocked.
    pub const NONE: Self = Self(0);

    /// Blocked by a floor (normal pointing up).
    pub const FLOOR: Self = Self(1 << 0);

    /// Blocked by a wall or step (horizontal normal).
    pub const WALL: Self = Self(1 << 1);

    /// Check if these flags contain every flag in `other`.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if nothing blocked.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Set or clear flags.
    #[inline]
    pub fn set(&mut self, flags: Self, value: bool) {
        if value {
            self.0 |= flags.0;
        } else {
            self.0 &= !flags.0;
        }
    }

    /// Check if a floor blocked.
    #[inline]
    pub fn floor(self) -> bool {
        self.contains(Self::FLOOR)
    }

    /// Check if a wall blocked.
    #[inline]
    pub fn wall(self) -> bool {
        self.contains(Self::WALL)
    }
}

impl std::ops::BitOr for BlockedFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for BlockedFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// What the mover is standing on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundContact {
    /// The surface underfoot.
    pub surface: SurfaceId,

    /// Its dynamic friction coefficient. Surfaces without a material apply
    /// no ground friction.
    pub dynamic_friction: Option<f32>,
}

impl GroundContact {
    /// Ground contact with a known friction coefficient.
    pub fn new(surface: SurfaceId, dynamic_friction: f32) -> Self {
        Self {
            surface,
            dynamic_friction: Some(dynamic_friction),
        }
    }

    /// Ground contact on a surface without a material.
    pub fn frictionless(surface: SurfaceId) -> Self {
        Self {
            surface,
            dynamic_friction: None,
        }
    }
}

/// Movement state for one mover.
///
/// Owned by the caller and mutated once per fixed tick by the controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementState {
    /// Origin in world space (the collider's transform position).
    pub position: Vec3,

    /// Velocity in world space (meters/second).
    pub velocity: Vec3,

    /// Current ground contact, refreshed by the caller every tick.
    /// `None` while airborne.
    pub ground: Option<GroundContact>,

    /// Surfaces that blocked movement on the last tick.
    pub blocked: BlockedFlags,
}

impl MovementState {
    /// Create a resting, airborne state at the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Check if the mover is on the ground.
    #[inline]
    pub fn grounded(&self) -> bool {
        self.ground.is_some()
    }

    /// Get current horizontal speed.
    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }
}

/// Input snapshot for a single tick.
///
/// Replaces key callbacks: the host samples its bindings once per fixed tick
/// and hands the result to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveInput {
    /// Movement axis: `x` strafes right, `y` moves forward. Each in -1.0..=1.0.
    pub axis: Vec2,

    /// Jump was pressed this tick (edge, not held).
    pub jump: bool,

    /// Camera forward vector in world space.
    pub camera_forward: Vec3,

    /// Camera right vector in world space.
    pub camera_right: Vec3,
}

impl Default for MoveInput {
    fn default() -> Self {
        Self {
            axis: Vec2::ZERO,
            jump: false,
            camera_forward: Vec3::NEG_Z,
            camera_right: Vec3::X,
        }
    }
}

impl MoveInput {
    /// Input facing the default camera direction.
    pub fn with_axis(axis: Vec2) -> Self {
        Self {
            axis,
            ..Default::default()
        }
    }
}

/// What a tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickOutput {
    /// Committed origin.
    pub position: Vec3,

    /// Committed velocity.
    pub velocity: Vec3,

    /// Surfaces that blocked movement this tick.
    pub blocked: BlockedFlags,

    /// Whether the tick ran the grounded branch.
    pub grounded: bool,
}
