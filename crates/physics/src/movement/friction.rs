//! Ground friction.

use glam::Vec3;

/// Speeds below this are treated as rest; friction leaves them alone.
pub const REST_SPEED: f32 = 0.0001905;

/// Slow `velocity` down by ground friction over `delta_time`.
///
/// Speeds under `stop_speed` lose speed as if they were moving at
/// `stop_speed`, so a slow mover comes to a halt instead of creeping.
pub fn apply_friction(velocity: Vec3, stop_speed: f32, friction: f32, delta_time: f32) -> Vec3 {
    let speed = velocity.length();

    if speed < REST_SPEED {
        return velocity;
    }

    let control = speed.max(stop_speed);
    let drop = control * friction * delta_time;

    let new_speed = (speed - drop).max(0.0);
    if new_speed == speed {
        return velocity;
    }

    velocity * (new_speed / speed)
}
