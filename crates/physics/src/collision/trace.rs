//! Collider shapes and swept traces.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::PhysicsError;

use super::layers::CollisionLayers;
use super::query::{CastHit, CollisionQuery, QueryFilter, QueryShape, SurfaceId};

/// Default skin kept between a collider and the surfaces it rests on (meters).
pub const DEFAULT_CONTACT_OFFSET: f32 = 0.01;

/// Shape of an entity's collider.
///
/// Positions are relative to the entity origin (its transform position).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// An axis-aligned box centered on the origin.
    Box {
        /// Half-size in each axis (x, y, z).
        half_extents: Vec3,
    },

    /// A vertical capsule (pill shape).
    Capsule {
        /// Radius of the cylinder and end caps.
        radius: f32,
        /// Total height from the bottom of the lower cap to the top of the upper.
        height: f32,
        /// Offset of the capsule's middle from the origin.
        center: Vec3,
    },

    /// A sphere. Usable for overlaps, not for sweeps.
    Sphere {
        /// Sphere radius.
        radius: f32,
        /// Offset of the sphere's center from the origin.
        center: Vec3,
    },
}

impl ColliderShape {
    /// Short name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Box { .. } => "box",
            Self::Capsule { .. } => "capsule",
            Self::Sphere { .. } => "sphere",
        }
    }

    /// Radius used for ground checks and penetration tests.
    pub fn radius(&self) -> f32 {
        match self {
            Self::Box { half_extents } => half_extents.x.max(half_extents.z),
            Self::Capsule { radius, .. } | Self::Sphere { radius, .. } => *radius,
        }
    }

    /// World-space centers of the two capsule end spheres at `origin`.
    ///
    /// Returns `(top, bottom)`. Shapes other than capsules have no segment.
    pub fn capsule_points(&self, origin: Vec3) -> Option<(Vec3, Vec3)> {
        match *self {
            Self::Capsule {
                radius,
                height,
                center,
            } => {
                let offset = Vec3::Y * capsule_half_segment(radius, height);
                Some((origin + center + offset, origin + center - offset))
            }
            _ => None,
        }
    }

    /// Point at the bottom of the shape, where the ground check sits.
    pub fn foot_point(&self, origin: Vec3) -> Vec3 {
        match *self {
            Self::Box { half_extents } => origin - Vec3::Y * half_extents.y,
            Self::Capsule { .. } => self
                .capsule_points(origin)
                .map_or(origin, |(_, bottom)| bottom),
            Self::Sphere { center, .. } => origin + center,
        }
    }
}

/// Half the length of a capsule's inner segment.
#[inline]
fn capsule_half_segment(radius: f32, height: f32) -> f32 {
    (height / 2.0 - radius).max(0.0)
}

/// An entity's collider: shape, contact skin and identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    /// Collision shape.
    pub shape: ColliderShape,

    /// Skin fraction the shape is shrunk by when sweeping, so resting contact
    /// does not register as a hit.
    pub contact_offset: f32,

    /// The collider's own surface in the world, if it was registered there.
    /// Queries made for this collider skip it.
    pub id: Option<SurfaceId>,
}

impl Collider {
    /// Create a collider with the default contact offset.
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            contact_offset: DEFAULT_CONTACT_OFFSET,
            id: None,
        }
    }

    /// Standard player capsule: 2m tall, 0.5m radius, origin at the feet.
    pub fn player() -> Self {
        Self::new(ColliderShape::Capsule {
            radius: 0.5,
            height: 2.0,
            center: Vec3::new(0.0, 1.0, 0.0),
        })
    }

    /// Set the collider's own surface id.
    pub fn with_id(mut self, id: SurfaceId) -> Self {
        self.id = Some(id);
        self
    }

    /// Shape swept by traces: shrunk by the contact offset.
    pub fn sweep_shape(&self) -> Result<QueryShape, PhysicsError> {
        let shrink = 1.0 - self.contact_offset;
        match self.shape {
            ColliderShape::Box { half_extents } => Ok(QueryShape::Cuboid {
                half_extents: half_extents * shrink,
            }),
            ColliderShape::Capsule {
                radius,
                height,
                center,
            } => {
                let offset = Vec3::Y * capsule_half_segment(radius, height);
                Ok(QueryShape::Capsule {
                    a: center + offset,
                    b: center - offset,
                    radius: radius * shrink,
                })
            }
            ColliderShape::Sphere { .. } => Err(PhysicsError::unsupported_shape(
                self.shape.name(),
                "sweep",
            )),
        }
    }

    /// Full-size shape used for overlap and penetration tests.
    pub fn solid_shape(&self) -> Result<QueryShape, PhysicsError> {
        match self.shape {
            ColliderShape::Box { half_extents } => Ok(QueryShape::Cuboid { half_extents }),
            ColliderShape::Capsule {
                radius,
                height,
                center,
            } => {
                let offset = Vec3::Y * capsule_half_segment(radius, height);
                Ok(QueryShape::Capsule {
                    a: center + offset,
                    b: center - offset,
                    radius,
                })
            }
            ColliderShape::Sphere { .. } => Err(PhysicsError::unsupported_shape(
                self.shape.name(),
                "penetration",
            )),
        }
    }

    /// Distance added to every sweep to make up for the contact skin.
    #[inline]
    pub fn skin_distance(&self) -> f32 {
        let offset = self.contact_offset;
        (offset * offset + offset * offset).sqrt()
    }
}

impl Default for Collider {
    fn default() -> Self {
        Self::player()
    }
}

/// Result of sweeping a collider through the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    /// Where the sweep started.
    pub start: Vec3,

    /// Where the sweep was headed.
    pub end: Vec3,

    /// How far along the (skin-extended) path the shape got.
    ///
    /// - `1.0` = nothing in the way
    /// - `0.0` = blocked immediately
    pub fraction: f32,

    /// Distance the shape travelled toward `end` before stopping.
    pub distance: f32,

    /// Surface that was hit.
    pub surface: Option<SurfaceId>,

    /// World-space contact point.
    pub hit_point: Option<Vec3>,

    /// Outward normal of the hit surface. `None` if nothing was hit.
    pub hit_normal: Option<Vec3>,
}

impl Trace {
    /// A sweep that reached its end unobstructed.
    pub fn clear(start: Vec3, end: Vec3) -> Self {
        Self {
            start,
            end,
            fraction: 1.0,
            distance: (end - start).length(),
            surface: None,
            hit_point: None,
            hit_normal: None,
        }
    }

    /// A sweep over `max_distance` (the skin-extended path length) stopped
    /// by `hit`.
    pub fn hit(start: Vec3, end: Vec3, max_distance: f32, hit: &CastHit) -> Self {
        let fraction = if max_distance > 0.0 {
            hit.distance / max_distance
        } else {
            0.0
        };

        Self {
            start,
            end,
            fraction: fraction.clamp(0.0, 1.0),
            distance: hit.distance.clamp(0.0, max_distance.max(0.0)),
            surface: Some(hit.surface),
            hit_point: Some(hit.point),
            hit_normal: Some(hit.normal),
        }
    }

    /// Check if this sweep hit something.
    #[inline]
    pub fn hit_something(&self) -> bool {
        self.fraction < 1.0
    }

    /// Hit normal, or zero when nothing was hit.
    #[inline]
    pub fn normal_or_zero(&self) -> Vec3 {
        self.hit_normal.unwrap_or(Vec3::ZERO)
    }

    /// Point the shape reached, never past `end`.
    pub fn reached(&self) -> Vec3 {
        let path = self.end - self.start;
        let length = path.length();
        if length == 0.0 {
            return self.start;
        }
        self.start + path * (self.distance.min(length) / length)
    }
}

/// Sweep `collider` from `start` to `end`.
///
/// The shape is shrunk by the collider's contact offset and the distance is
/// extended by the offset's diagonal to make up for it. Sphere colliders
/// cannot be swept.
pub fn sweep<W>(
    world: &W,
    collider: &Collider,
    start: Vec3,
    end: Vec3,
) -> Result<Trace, PhysicsError>
where
    W: CollisionQuery + ?Sized,
{
    let shape = collider.sweep_shape()?;

    let delta = end - start;
    let direction = delta.normalize_or_zero();
    let max_distance = delta.length() + collider.skin_distance();

    let filter = QueryFilter::new(CollisionLayers::MASK_SWEEP).excluding(collider.id);

    let trace = match world.cast(&shape, start, direction, max_distance, &filter)? {
        Some(hit) => Trace::hit(start, end, max_distance, &hit),
        None => Trace::clear(start, end),
    };

    log::trace!(
        "sweep {} {:?} -> {:?}: fraction={} normal={:?}",
        collider.shape.name(),
        start,
        end,
        trace.fraction,
        trace.hit_normal
    );

    Ok(trace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::CollisionWorld;
    use approx::assert_relative_eq;

    #[test]
    fn test_trace_clear() {
        let trace = Trace::clear(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0));
        assert!(!trace.hit_something());
        assert_eq!(trace.fraction, 1.0);
        assert_eq!(trace.normal_or_zero(), Vec3::ZERO);
        assert_eq!(trace.reached(), Vec3::new(10.0, 0.0, 0.0));
    }

    fn cast_hit(distance: f32) -> CastHit {
        CastHit {
            distance,
            point: Vec3::X,
            normal: -Vec3::X,
            surface: SurfaceId(1),
        }
    }

    #[test]
    fn test_trace_hit_clamps_fraction() {
        let trace = Trace::hit(Vec3::ZERO, Vec3::X, 8.0, &cast_hit(12.0));
        assert_eq!(trace.fraction, 1.0);

        let trace = Trace::hit(Vec3::ZERO, Vec3::X, 8.0, &cast_hit(-0.25));
        assert_eq!(trace.fraction, 0.0);
        assert_eq!(trace.distance, 0.0);
        assert_eq!(trace.surface, Some(SurfaceId(1)));

        let trace = Trace::hit(Vec3::ZERO, Vec3::X, 0.0, &cast_hit(0.0));
        assert_eq!(trace.fraction, 0.0);
    }

    #[test]
    fn test_reached_uses_travelled_distance() {
        // Path of 10 extended by a skin of 0.5
        let trace = Trace::hit(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 10.5, &cast_hit(4.0));
        assert_eq!(trace.reached(), Vec3::new(4.0, 0.0, 0.0));

        // A hit inside the skin extension stops at the end of the path
        let trace = Trace::hit(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 10.5, &cast_hit(10.2));
        assert!(trace.hit_something());
        assert_eq!(trace.reached(), Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_sweep_reaches_contact_point() {
        let mut world = CollisionWorld::new();
        // Wall face at x=9.5
        world.add_box(
            Vec3::new(10.0, 2.5, 0.0),
            Vec3::new(0.5, 2.5, 10.0),
            CollisionLayers::DEFAULT,
        );
        let collider = Collider::player();

        let trace = sweep(&world, &collider, Vec3::ZERO, Vec3::new(20.0, 0.0, 0.0)).unwrap();

        // Shrunk radius 0.495 touches the face after 9.005
        assert!(trace.hit_something());
        assert_relative_eq!(trace.reached().x, 9.005, epsilon = 1e-3);
        let max_distance = 20.0 + collider.skin_distance();
        assert_relative_eq!(trace.fraction, 9.005 / max_distance, epsilon = 1e-4);
    }

    #[test]
    fn test_capsule_points() {
        let shape = ColliderShape::Capsule {
            radius: 0.5,
            height: 2.0,
            center: Vec3::new(0.0, 1.0, 0.0),
        };
        let (top, bottom) = shape.capsule_points(Vec3::new(3.0, 0.0, 0.0)).unwrap();

        assert_eq!(top, Vec3::new(3.0, 1.5, 0.0));
        assert_eq!(bottom, Vec3::new(3.0, 0.5, 0.0));
    }

    #[test]
    fn test_short_capsule_collapses_to_sphere() {
        let shape = ColliderShape::Capsule {
            radius: 1.0,
            height: 1.0,
            center: Vec3::ZERO,
        };
        let (top, bottom) = shape.capsule_points(Vec3::ZERO).unwrap();
        assert_eq!(top, bottom);
    }

    #[test]
    fn test_sweep_shape_shrinks_by_contact_offset() {
        let collider = Collider::player();
        match collider.sweep_shape().unwrap() {
            QueryShape::Capsule { a, b, radius } => {
                assert_relative_eq!(radius, 0.5 * 0.99, epsilon = 1e-6);
                assert_eq!(a, Vec3::new(0.0, 1.5, 0.0));
                assert_eq!(b, Vec3::new(0.0, 0.5, 0.0));
            }
            other => panic!("expected capsule, got {other:?}"),
        }

        let boxed = Collider::new(ColliderShape::Box {
            half_extents: Vec3::splat(1.0),
        });
        assert_eq!(
            boxed.sweep_shape().unwrap(),
            QueryShape::Cuboid {
                half_extents: Vec3::splat(0.99)
            }
        );
    }

    #[test]
    fn test_sphere_sweep_is_unsupported() {
        let collider = Collider::new(ColliderShape::Sphere {
            radius: 0.5,
            center: Vec3::ZERO,
        });
        assert_eq!(
            collider.sweep_shape(),
            Err(PhysicsError::UnsupportedShape {
                shape: "sphere",
                operation: "sweep"
            })
        );
    }

    #[test]
    fn test_skin_distance_is_offset_diagonal() {
        let collider = Collider::player();
        assert_relative_eq!(collider.skin_distance(), 0.01 * 2f32.sqrt(), epsilon = 1e-7);
    }
}
