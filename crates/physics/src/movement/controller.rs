//! Player movement controller.
//!
//! This is the main entry point for player movement. Each fixed tick the host
//! refreshes the ground contact, samples input, and calls
//! [`PlayerController::step`], which updates the [`MovementState`] through the
//! collision world.

use glam::Vec3;

use crate::collision::{Collider, CollisionQuery};
use crate::error::PhysicsError;

use super::accelerate::{accelerate, air_accelerate};
use super::clip::reflect;
use super::constants::{MoverSettings, MovementConstants, MOVEMENT_CONSTANTS};
use super::friction::apply_friction;
use super::penetration::resolve_penetration;
use super::state::{BlockedFlags, MoveInput, MovementState, TickOutput};

/// Player movement controller.
///
/// Handles:
/// - Ground and air acceleration
/// - Gravity and jumping
/// - Ground friction
/// - Collision response (reflection while airborne, penetration always)
///
/// # Example
///
/// ```ignore
/// let controller = PlayerController::default();
/// let collider = Collider::player();
/// let mut state = MovementState::new(spawn_position);
///
/// // Each tick:
/// state.ground = check_ground(&world, &collider, state.position)?;
/// controller.step(&world, &collider, &mut state, &input, 1.0 / 50.0)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerController {
    /// Process-wide constants.
    pub constants: MovementConstants,

    /// This mover's settings.
    pub settings: MoverSettings,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(MOVEMENT_CONSTANTS, MoverSettings::default())
    }
}

impl PlayerController {
    /// Create a controller.
    pub fn new(constants: MovementConstants, settings: MoverSettings) -> Self {
        Self {
            constants,
            settings,
        }
    }

    /// Controller using the shared constants and the given settings.
    pub fn with_settings(settings: MoverSettings) -> Self {
        Self::new(MOVEMENT_CONSTANTS, settings)
    }

    /// Advance `state` by one tick.
    ///
    /// `state.ground` must already describe this tick's ground contact. The
    /// committed position and velocity are written back to `state` and also
    /// returned.
    pub fn step<W>(
        &self,
        world: &W,
        collider: &Collider,
        state: &mut MovementState,
        input: &MoveInput,
        delta_time: f32,
    ) -> Result<TickOutput, PhysicsError>
    where
        W: CollisionQuery + ?Sized,
    {
        let (wish_dir, wish_speed) = self.wish_velocity(input);
        let wish_speed = wish_speed.min(self.settings.max_speed);

        let mut velocity = state.velocity;
        let mut blocked = BlockedFlags::NONE;

        if input.jump && state.grounded() {
            velocity.y = self.settings.jump_power;
        }

        match state.ground {
            Some(ground) => {
                velocity.y = velocity.y.max(0.0);

                velocity += accelerate(
                    velocity,
                    wish_dir,
                    wish_speed * self.settings.walk_speed,
                    self.settings.acceleration,
                    delta_time,
                    1.0,
                );

                if let Some(friction) = ground.dynamic_friction {
                    velocity = apply_friction(
                        velocity,
                        self.constants.stop_speed,
                        friction * self.constants.friction_multiplier,
                        delta_time,
                    );
                }
            }
            None => {
                velocity.y -= self.constants.effective_gravity() * delta_time;

                velocity += air_accelerate(
                    velocity,
                    wish_dir,
                    wish_speed,
                    self.constants.air_acceleration,
                    self.constants.air_cap,
                    delta_time,
                );

                let reflection = reflect(world, collider, velocity, state.position, delta_time)?;
                velocity = reflection.velocity;
                blocked = reflection.blocked;
            }
        }

        let origin = state.position + velocity * delta_time;
        let (position, velocity) = resolve_penetration(world, collider, origin, velocity)?;

        state.position = position;
        state.velocity = velocity;
        state.blocked = blocked;

        Ok(TickOutput {
            position,
            velocity,
            blocked,
            grounded: state.grounded(),
        })
    }

    /// Direction and speed the input asks for.
    ///
    /// The camera vectors are flattened onto the horizontal plane, and the
    /// input axis is scaled by the mover's acceleration before combining.
    /// The returned speed is not yet capped to `max_speed`.
    pub fn wish_velocity(&self, input: &MoveInput) -> (Vec3, f32) {
        let forward = flatten(input.camera_forward);
        let right = flatten(input.camera_right);

        let axis = input.axis * self.settings.acceleration;

        let mut wish = forward * axis.y + right * axis.x;
        wish.y = 0.0;

        (wish.normalize_or_zero(), wish.length())
    }
}

/// Project onto the horizontal plane and normalize.
#[inline]
fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{CollisionLayers, CollisionWorld, SurfaceId};
    use crate::movement::GroundContact;
    use approx::assert_relative_eq;
    use glam::Vec2;

    const DT: f32 = 0.02;

    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();

        // Floor at y=0
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            CollisionLayers::DEFAULT,
        );

        world
    }

    fn grounded_state(friction: Option<f32>) -> MovementState {
        // Hovering a hair above the floor so resting contact stays out of play
        let mut state = MovementState::new(Vec3::new(0.0, 0.001, 0.0));
        state.ground = Some(GroundContact {
            surface: SurfaceId(0),
            dynamic_friction: friction,
        });
        state
    }

    #[test]
    fn test_gravity() {
        let world = CollisionWorld::new();
        let controller = PlayerController::default();
        let mut state = MovementState::new(Vec3::new(0.0, 10.0, 0.0));

        let out = controller
            .step(&world, &Collider::player(), &mut state, &MoveInput::default(), DT)
            .unwrap();

        let expected = -9.81 * 1.55 * DT;
        assert_relative_eq!(out.velocity.y, expected, epsilon = 1e-5);
        assert_relative_eq!(out.position.y, 10.0 + expected * DT, epsilon = 1e-5);
        assert!(!out.grounded);
        assert_eq!(state.velocity, out.velocity);
        assert_eq!(state.position, out.position);
    }

    #[test]
    fn test_jump() {
        let world = create_test_world();
        let controller = PlayerController::default();
        let mut state = grounded_state(None);

        let input = MoveInput {
            jump: true,
            ..Default::default()
        };
        let out = controller
            .step(&world, &Collider::player(), &mut state, &input, DT)
            .unwrap();

        assert_relative_eq!(out.velocity.y, 5.112, epsilon = 1e-5);
        assert!(out.position.y > 0.001);
    }

    #[test]
    fn test_friction_applies_to_jump_tick() {
        let world = create_test_world();
        let controller = PlayerController::default();
        let mut state = grounded_state(Some(0.6));

        let input = MoveInput {
            jump: true,
            ..Default::default()
        };
        let out = controller
            .step(&world, &Collider::player(), &mut state, &input, DT)
            .unwrap();

        // Friction acts on the whole velocity: 5.112 * (1 - 4 * 0.02)
        assert_relative_eq!(out.velocity.y, 5.112 * 0.92, epsilon = 1e-4);
    }

    #[test]
    fn test_jump_ignored_in_air() {
        let world = CollisionWorld::new();
        let controller = PlayerController::default();
        let mut state = MovementState::new(Vec3::new(0.0, 5.0, 0.0));

        let input = MoveInput {
            jump: true,
            ..Default::default()
        };
        let out = controller
            .step(&world, &Collider::player(), &mut state, &input, DT)
            .unwrap();

        assert!(out.velocity.y < 0.0);
    }

    #[test]
    fn test_grounded_clamps_downward_velocity() {
        let world = create_test_world();
        let controller = PlayerController::default();
        let mut state = grounded_state(None);
        state.velocity = Vec3::new(0.0, -12.0, 0.0);

        let out = controller
            .step(&world, &Collider::player(), &mut state, &MoveInput::default(), DT)
            .unwrap();

        assert_eq!(out.velocity.y, 0.0);
        assert_relative_eq!(out.position.y, 0.001, epsilon = 1e-6);
        assert!(out.grounded);
    }

    #[test]
    fn test_forward_movement() {
        let world = create_test_world();
        let controller = PlayerController::default();
        let mut state = grounded_state(None);

        let input = MoveInput::with_axis(Vec2::new(0.0, 1.0));
        let out = controller
            .step(&world, &Collider::player(), &mut state, &input, DT)
            .unwrap();

        // Wish speed 7.62 capped to 6; accel 7.62 * 0.02 * 6
        assert_relative_eq!(out.velocity.z, -0.9144, epsilon = 1e-4);
        assert_relative_eq!(out.velocity.x, 0.0);
        assert!(out.position.z < 0.0);
    }

    #[test]
    fn test_ground_friction_slows_slide() {
        let world = create_test_world();
        let controller = PlayerController::default();

        let mut slick = grounded_state(None);
        slick.velocity = Vec3::new(5.0, 0.0, 0.0);
        let mut rough = grounded_state(Some(0.6));
        rough.velocity = Vec3::new(5.0, 0.0, 0.0);

        let collider = Collider::player();
        let input = MoveInput::default();
        let slick_out = controller.step(&world, &collider, &mut slick, &input, DT).unwrap();
        let rough_out = controller.step(&world, &collider, &mut rough, &input, DT).unwrap();

        assert_eq!(slick_out.velocity.x, 5.0);
        // friction 0.6 * 6.666666 = 4; drop = 5 * 4 * 0.02 = 0.4
        assert_relative_eq!(rough_out.velocity.x, 4.6, epsilon = 1e-4);
    }

    #[test]
    fn test_grounded_walk_speed_scales_wish() {
        let world = create_test_world();
        let slow = PlayerController::with_settings(MoverSettings {
            walk_speed: 0.5,
            ..Default::default()
        });
        let mut state = grounded_state(None);
        state.velocity = Vec3::new(0.0, 0.0, -3.0);

        let input = MoveInput::with_axis(Vec2::new(0.0, 1.0));
        let out = slow
            .step(&world, &Collider::player(), &mut state, &input, DT)
            .unwrap();

        // Already at 6 * 0.5 along the wish direction: nothing added
        assert_relative_eq!(out.velocity.z, -3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_air_strafe_gains_speed() {
        let world = CollisionWorld::new();
        let controller = PlayerController::default();
        let mut state = MovementState::new(Vec3::new(0.0, 50.0, 0.0));
        state.velocity = Vec3::new(0.0, 0.0, -8.0);

        let input = MoveInput::with_axis(Vec2::new(1.0, 0.0));
        let before = state.horizontal_speed();
        controller
            .step(&world, &Collider::player(), &mut state, &input, DT)
            .unwrap();

        assert_relative_eq!(state.velocity.x, 0.575, epsilon = 1e-5);
        assert!(state.horizontal_speed() > before);
    }

    #[test]
    fn test_wish_velocity_flattens_camera() {
        let controller = PlayerController::default();
        let input = MoveInput {
            axis: Vec2::new(0.0, 1.0),
            camera_forward: Vec3::new(0.0, -0.8, -0.6),
            ..Default::default()
        };

        let (dir, speed) = controller.wish_velocity(&input);
        assert_relative_eq!(dir.z, -1.0, epsilon = 1e-6);
        assert_eq!(dir.y, 0.0);
        assert_relative_eq!(speed, 7.62, epsilon = 1e-5);
    }

    #[test]
    fn test_wish_velocity_no_input() {
        let controller = PlayerController::default();
        let (dir, speed) = controller.wish_velocity(&MoveInput::default());
        assert_eq!(dir, Vec3::ZERO);
        assert_eq!(speed, 0.0);
    }

    #[test]
    fn test_wish_velocity_diagonal() {
        let controller = PlayerController::default();
        let input = MoveInput::with_axis(Vec2::new(1.0, 1.0));

        let (dir, speed) = controller.wish_velocity(&input);
        assert_relative_eq!(dir.x, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
        assert_relative_eq!(dir.z, -std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
        assert_relative_eq!(speed, 7.62 * std::f32::consts::SQRT_2, epsilon = 1e-4);
    }
}
