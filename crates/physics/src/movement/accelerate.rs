//! Ground and air acceleration.
//!
//! Both functions return a velocity delta for the caller to add; neither
//! touches the velocity it is given.

use glam::Vec3;

/// Acceleration toward `wish_dir` while grounded.
///
/// Only the part of the velocity already heading along `wish_dir` counts
/// against `wish_speed`, so turning keeps speed while pushing forward does not
/// exceed it.
pub fn accelerate(
    velocity: Vec3,
    wish_dir: Vec3,
    wish_speed: f32,
    accel: f32,
    delta_time: f32,
    surface_friction: f32,
) -> Vec3 {
    let current_speed = velocity.dot(wish_dir);

    let add_speed = wish_speed - current_speed;
    if add_speed <= 0.0 {
        return Vec3::ZERO;
    }

    let accel_speed = (accel * delta_time * wish_speed * surface_friction).min(add_speed);

    wish_dir * accel_speed
}

/// Acceleration toward `wish_dir` while airborne.
///
/// The speed check uses `wish_speed` capped to `air_cap`, but the rate uses
/// the uncapped `wish_speed`. Strafing perpendicular to the velocity
/// therefore always finds room to add speed, which is what makes air
/// strafing gain speed.
pub fn air_accelerate(
    velocity: Vec3,
    wish_dir: Vec3,
    wish_speed: f32,
    accel: f32,
    air_cap: f32,
    delta_time: f32,
) -> Vec3 {
    let capped_speed = wish_speed.min(air_cap);

    let current_speed = velocity.dot(wish_dir);

    let add_speed = capped_speed - current_speed;
    if add_speed <= 0.0 {
        return Vec3::ZERO;
    }

    let accel_speed = (accel * wish_speed * delta_time).min(add_speed);

    wish_dir * accel_speed
}
