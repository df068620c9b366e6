//! The query capability movement code depends on.
//!
//! Movement never touches a physics engine directly. It asks a
//! [`CollisionQuery`] to cast, overlap and measure penetration, so a host can
//! plug in any backend. [`CollisionWorld`](super::CollisionWorld) is the
//! bundled parry3d implementation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;

use super::layers::CollisionLayers;

/// Identity of a surface (brush) in the collision world.
///
/// Only an identity: movement state refers to surfaces by id and never owns
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub u32);

/// Physical material of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMaterial {
    /// Friction coefficient while sliding. Scaled by the friction multiplier
    /// when the player stands on this surface.
    pub dynamic_friction: f32,
    /// Friction coefficient at rest.
    pub static_friction: f32,
}

impl SurfaceMaterial {
    /// Material with the same static and dynamic friction.
    pub const fn uniform(friction: f32) -> Self {
        Self {
            dynamic_friction: friction,
            static_friction: friction,
        }
    }
}

impl Default for SurfaceMaterial {
    fn default() -> Self {
        Self::uniform(0.6)
    }
}

/// Concrete query geometry, positioned relative to a query origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryShape {
    /// Axis-aligned box centered on the origin.
    Cuboid { half_extents: Vec3 },
    /// Capsule around the segment `a`-`b` (offsets from the origin).
    Capsule { a: Vec3, b: Vec3, radius: f32 },
    /// Sphere around `center` (offset from the origin).
    Ball { center: Vec3, radius: f32 },
}

/// Which brushes a query may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryFilter {
    /// Layers the query collides with.
    pub layers: CollisionLayers,
    /// Surface to skip, normally the querying entity itself.
    pub exclude: Option<SurfaceId>,
}

impl QueryFilter {
    /// Filter on the given layers without exclusions.
    pub const fn new(layers: CollisionLayers) -> Self {
        Self {
            layers,
            exclude: None,
        }
    }

    /// Skip `surface` in addition to the layer test.
    pub const fn excluding(self, surface: Option<SurfaceId>) -> Self {
        Self {
            layers: self.layers,
            exclude: surface,
        }
    }

    /// Check whether a brush passes this filter.
    #[inline]
    pub fn accepts(&self, surface: SurfaceId, layers: CollisionLayers) -> bool {
        self.layers.intersects(layers) && self.exclude != Some(surface)
    }
}

/// First impact of a shape cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastHit {
    /// Distance travelled along the cast direction before the impact.
    pub distance: f32,
    /// World-space contact point.
    pub point: Vec3,
    /// Outward normal of the surface that was hit.
    pub normal: Vec3,
    /// Surface that was hit.
    pub surface: SurfaceId,
}

/// How to separate two overlapping shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Unit direction to move the query shape along.
    pub direction: Vec3,
    /// Distance to move it.
    pub distance: f32,
}

/// Read-only collision queries against a world.
///
/// Implementations must not mutate the world during a query; movement for
/// every entity only reads world geometry.
pub trait CollisionQuery {
    /// Sweep `shape` from `origin` along the unit vector `direction`.
    ///
    /// Returns the nearest impact within `max_distance`. Brushes the shape
    /// already overlaps at `origin` are not reported.
    fn cast(
        &self,
        shape: &QueryShape,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: &QueryFilter,
    ) -> Result<Option<CastHit>, PhysicsError>;

    /// Collect the surfaces overlapping `shape` placed at `origin`.
    ///
    /// At most `out.len()` surfaces are written; the return value is how many.
    fn overlap(
        &self,
        shape: &QueryShape,
        origin: Vec3,
        filter: &QueryFilter,
        out: &mut [SurfaceId],
    ) -> Result<usize, PhysicsError>;

    /// Compute how to push `shape` at `origin` out of `other`.
    ///
    /// `None` when the two do not overlap.
    fn penetration(
        &self,
        shape: &QueryShape,
        origin: Vec3,
        other: SurfaceId,
    ) -> Result<Option<Penetration>, PhysicsError>;

    /// Material of a surface, if it has one.
    fn material(&self, surface: SurfaceId) -> Option<SurfaceMaterial>;
}
