//! Strafe Physics
//!
//! Source-engine style first-person movement for a player capsule. Each fixed
//! tick the controller accelerates the player from its input, applies
//! friction or gravity, slides the velocity along whatever the capsule sweeps
//! into, and finally pushes the capsule out of anything it still overlaps.
//!
//! # Architecture
//!
//! - **Collision**: layers, collider shapes, sweeps and the [`CollisionQuery`]
//!   capability the movement code talks to. [`CollisionWorld`] is the
//!   parry3d-backed implementation.
//! - **Movement**: acceleration, friction, velocity clipping (bump and slide),
//!   penetration resolution and the [`PlayerController`] that sequences them.
//!
//! # Units and axes
//!
//! Y is up. Distances are meters, time is seconds.

pub mod collision;
mod error;
pub mod movement;

pub use collision::{
    CollisionLayers, CollisionQuery, CollisionWorld, Collider, ColliderShape, SurfaceId,
    SurfaceMaterial, Trace,
};
pub use error::PhysicsError;
pub use movement::{
    BlockedFlags, GroundContact, MoveInput, MoverSettings, MovementConstants, MovementState,
    PlayerController, TickOutput, MOVEMENT_CONSTANTS,
};
