//! Collision detection for FPS movement.
//!
//! Movement sweeps the player's collider through the world and measures how
//! far it got. This module owns the pieces of that: layers, collider shapes,
//! the [`CollisionQuery`] capability and its parry3d-backed
//! [`CollisionWorld`].
//!
//! # Key Types
//!
//! - [`Collider`]: an entity's shape, contact skin and identity
//! - [`Trace`]: result of sweeping a collider
//! - [`CollisionQuery`]: cast / overlap / penetration queries any backend can supply
//! - [`CollisionWorld`]: brushes with layers and materials
//!
//! # Sweeping
//!
//! [`sweep`] shrinks the collider by its contact offset, extends the distance
//! by the offset's diagonal, and reports:
//! - How far the shape traveled (fraction 0.0-1.0)
//! - The surface, contact point and normal at impact (if any)

mod layers;
mod query;
mod trace;
mod world;

pub use layers::CollisionLayers;
pub use query::{
    CastHit, CollisionQuery, Penetration, QueryFilter, QueryShape, SurfaceId, SurfaceMaterial,
};
pub use trace::{sweep, Collider, ColliderShape, Trace, DEFAULT_CONTACT_OFFSET};
pub use world::{CollisionBrush, CollisionWorld};
