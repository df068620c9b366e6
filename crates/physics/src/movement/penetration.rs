//! Pushing a collider back out of geometry it ended up inside.

use glam::Vec3;

use crate::collision::{Collider, CollisionLayers, CollisionQuery, QueryFilter, SurfaceId};
use crate::error::PhysicsError;

/// Most overlapping surfaces considered per call. Extra overlaps are skipped
/// for the tick.
pub const MAX_OVERLAPS: usize = 128;

/// Push `origin` out of every surface the collider overlaps.
///
/// For each overlap the origin moves out along the penetration direction, and
/// the velocity loses its horizontal component along that direction. Vertical
/// velocity is kept as-is so callers can still read the landing speed for
/// fall damage.
///
/// Returns the corrected `(origin, velocity)`.
pub fn resolve_penetration<W>(
    world: &W,
    collider: &Collider,
    origin: Vec3,
    velocity: Vec3,
) -> Result<(Vec3, Vec3), PhysicsError>
where
    W: CollisionQuery + ?Sized,
{
    let shape = collider.solid_shape()?;
    let filter = QueryFilter::new(CollisionLayers::MASK_PENETRATION).excluding(collider.id);

    let mut overlaps = [SurfaceId(0); MAX_OVERLAPS];
    let count = world.overlap(&shape, origin, &filter, &mut overlaps)?;
    if count == MAX_OVERLAPS {
        log::debug!("overlap query at {:?} hit the {} candidate cap", origin, MAX_OVERLAPS);
    }

    let mut origin = origin;
    let mut velocity = velocity;

    for &surface in &overlaps[..count] {
        if collider.id == Some(surface) {
            continue;
        }

        let Some(penetration) = world.penetration(&shape, origin, surface)? else {
            continue;
        };

        let direction = penetration.direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            continue;
        }

        origin += direction * penetration.distance;

        let mut along = direction * velocity.dot(direction);
        along.y = 0.0;
        velocity -= along;

        log::debug!(
            "pushed out of {:?} by {:.4} along {:?}",
            surface,
            penetration.distance,
            direction
        );
    }

    Ok((origin, velocity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{ColliderShape, CollisionWorld};
    use crate::PhysicsError;
    use approx::assert_relative_eq;

    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();

        // Floor at y=0
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            CollisionLayers::DEFAULT,
        );

        // Wall face at x=9.5
        world.add_box(
            Vec3::new(10.0, 2.5, 0.0),
            Vec3::new(0.5, 2.5, 10.0),
            CollisionLayers::DEFAULT,
        );

        world
    }

    #[test]
    fn test_clear_collider_is_untouched() {
        let world = create_test_world();
        let origin = Vec3::new(0.0, 0.5, 0.0);
        let velocity = Vec3::new(3.0, -1.0, 2.0);

        let (new_origin, new_velocity) =
            resolve_penetration(&world, &Collider::player(), origin, velocity).unwrap();

        assert_eq!(new_origin, origin);
        assert_eq!(new_velocity, velocity);
    }

    #[test]
    fn test_floor_push_keeps_vertical_velocity() {
        let world = create_test_world();
        let velocity = Vec3::new(3.0, -5.0, 0.0);

        let (origin, new_velocity) = resolve_penetration(
            &world,
            &Collider::player(),
            Vec3::new(0.0, -0.2, 0.0),
            velocity,
        )
        .unwrap();

        assert_relative_eq!(origin.y, 0.0, epsilon = 1e-3);
        assert_eq!(new_velocity, velocity);
    }

    #[test]
    fn test_wall_push_removes_horizontal_velocity() {
        let world = create_test_world();

        let (origin, velocity) = resolve_penetration(
            &world,
            &Collider::player(),
            Vec3::new(9.2, 1.0, 0.0),
            Vec3::new(4.0, 0.0, 1.0),
        )
        .unwrap();

        assert_relative_eq!(origin.x, 9.0, epsilon = 1e-3);
        assert_relative_eq!(velocity.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(velocity.z, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_own_surface_is_ignored() {
        let mut world = CollisionWorld::new();
        let me = world.add_box(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.5, 1.0, 0.5),
            CollisionLayers::DEFAULT,
        );
        let collider = Collider::player().with_id(me);

        let (origin, velocity) =
            resolve_penetration(&world, &collider, Vec3::ZERO, Vec3::X).unwrap();

        assert_eq!(origin, Vec3::ZERO);
        assert_eq!(velocity, Vec3::X);
    }

    #[test]
    fn test_players_layer_is_not_resolved() {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.3, 1.0, 0.0),
            Vec3::new(0.5, 1.0, 0.5),
            CollisionLayers::PLAYER,
        );

        let (origin, _) =
            resolve_penetration(&world, &Collider::player(), Vec3::ZERO, Vec3::ZERO).unwrap();
        assert_eq!(origin, Vec3::ZERO);
    }

    #[test]
    fn test_sphere_collider_is_unsupported() {
        let world = create_test_world();
        let collider = Collider::new(ColliderShape::Sphere {
            radius: 0.5,
            center: Vec3::ZERO,
        });

        let err = resolve_penetration(&world, &collider, Vec3::ZERO, Vec3::ZERO).unwrap_err();
        assert!(matches!(err, PhysicsError::UnsupportedShape { shape: "sphere", .. }));
    }
}
