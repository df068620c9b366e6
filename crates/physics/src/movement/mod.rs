//! Player movement physics.
//!
//! This module implements Source-style FPS movement with:
//!
//! - Ground acceleration and stop-speed friction
//! - Air acceleration with an air cap (air strafing)
//! - Reflection off the surfaces hit while airborne
//! - Penetration resolution after every move
//!
//! # Design
//!
//! Movement is driven by the [`PlayerController`], which takes a per-tick
//! [`MoveInput`] snapshot and updates the mover's [`MovementState`] through any
//! [`CollisionQuery`](crate::CollisionQuery) implementation.
//!
//! The building blocks are plain functions over `Vec3` so they can be used and
//! tested on their own.
//!
//! All movement is deterministic: the same inputs always produce the same
//! outputs.

mod accelerate;
mod clip;
mod constants;
mod controller;
mod friction;
mod ground;
mod penetration;
mod state;

pub use accelerate::{accelerate, air_accelerate};
pub use clip::{
    clip_velocity, reflect, reflect_with_bumps, Reflection, MAX_CLIP_PLANES, NUM_BUMPS, OVERBOUNCE,
    SURF_SLOPE,
};
pub use constants::{MoverSettings, MovementConstants, MOVEMENT_CONSTANTS};
pub use controller::PlayerController;
pub use friction::{apply_friction, REST_SPEED};
pub use ground::{check_ground, GROUND_CHECK_DEPTH};
pub use penetration::{resolve_penetration, MAX_OVERLAPS};
pub use state::{BlockedFlags, GroundContact, MoveInput, MovementState, TickOutput};
