//! Ground detection.
//!
//! The controller does not look for ground itself: the host refreshes
//! [`MovementState::ground`](super::MovementState::ground) before each step.
//! [`check_ground`] is the usual way to do that.

use glam::Vec3;

use crate::collision::{
    Collider, CollisionLayers, CollisionQuery, QueryFilter, QueryShape, SurfaceId,
};
use crate::error::PhysicsError;

use super::state::GroundContact;

/// How far below the bottom of the collider the ground check sphere sits.
pub const GROUND_CHECK_DEPTH: f32 = 0.05;

/// Surfaces considered by one ground check.
const MAX_GROUND_CANDIDATES: usize = 16;

/// Find the surface under a collider standing at `origin`.
///
/// Overlaps a sphere of the collider's radius just under its foot point. When
/// several surfaces are touched, the last one reported wins. Friction comes
/// from the surface's material; surfaces without one give a frictionless
/// contact.
pub fn check_ground<W>(
    world: &W,
    collider: &Collider,
    origin: Vec3,
) -> Result<Option<GroundContact>, PhysicsError>
where
    W: CollisionQuery + ?Sized,
{
    let sphere = QueryShape::Ball {
        center: Vec3::ZERO,
        radius: collider.shape.radius(),
    };
    let at = collider.shape.foot_point(origin) - Vec3::Y * GROUND_CHECK_DEPTH;
    let filter = QueryFilter::new(CollisionLayers::ALL).excluding(collider.id);

    let mut candidates = [SurfaceId(0); MAX_GROUND_CANDIDATES];
    let count = world.overlap(&sphere, at, &filter, &mut candidates)?;

    let Some(&surface) = candidates[..count]
        .iter()
        .rev()
        .find(|&&surface| collider.id != Some(surface))
    else {
        return Ok(None);
    };

    let contact = match world.material(surface) {
        Some(material) => GroundContact::new(surface, material.dynamic_friction),
        None => GroundContact::frictionless(surface),
    };

    log::trace!("ground under {:?}: {:?}", origin, contact);
    Ok(Some(contact))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{CollisionWorld, SurfaceMaterial};

    fn create_test_world() -> (CollisionWorld, SurfaceId) {
        let mut world = CollisionWorld::new();
        let floor = world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            CollisionLayers::DEFAULT,
        );
        (world, floor)
    }

    #[test]
    fn test_standing_on_floor() {
        let (mut world, floor) = create_test_world();
        world.set_material(floor, SurfaceMaterial::uniform(0.4));

        let contact = check_ground(&world, &Collider::player(), Vec3::ZERO).unwrap();
        assert_eq!(contact, Some(GroundContact::new(floor, 0.4)));
    }

    #[test]
    fn test_floor_without_material_is_frictionless() {
        let (world, floor) = create_test_world();

        let contact = check_ground(&world, &Collider::player(), Vec3::ZERO).unwrap();
        assert_eq!(contact, Some(GroundContact::frictionless(floor)));
    }

    #[test]
    fn test_airborne_finds_nothing() {
        let (world, _) = create_test_world();

        let contact = check_ground(&world, &Collider::player(), Vec3::new(0.0, 2.0, 0.0)).unwrap();
        assert!(contact.is_none());
    }

    #[test]
    fn test_own_surface_is_not_ground() {
        let mut world = CollisionWorld::new();
        let me = world.add_box(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.5, 1.0, 0.5),
            CollisionLayers::PLAYER,
        );
        let collider = Collider::player().with_id(me);

        let contact = check_ground(&world, &collider, Vec3::new(0.0, 0.3, 0.0)).unwrap();
        assert!(contact.is_none());
    }

    #[test]
    fn test_last_surface_wins() {
        let (mut world, _) = create_test_world();
        let plank = world.add_box(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.05, 1.0),
            CollisionLayers::DEFAULT,
        );

        let contact = check_ground(&world, &Collider::player(), Vec3::new(0.0, 0.05, 0.0))
            .unwrap()
            .unwrap();
        assert_eq!(contact.surface, plank);
    }
}
