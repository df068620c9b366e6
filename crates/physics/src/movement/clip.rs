//! Velocity clipping and bump-and-slide collision response.
//!
//! [`reflect`] sweeps the collider along its velocity and, when something is
//! in the way, clips the velocity so it slides along the contacted planes
//! instead of stopping dead.

use glam::Vec3;

use crate::collision::{sweep, Collider, CollisionQuery};
use crate::error::PhysicsError;

use super::state::BlockedFlags;

/// Maximum number of planes one reflect call can collect.
pub const MAX_CLIP_PLANES: usize = 5;

/// Sweep-and-clip passes per reflect call.
///
/// One pass means a tick resolves at most one new plane: after a clip the
/// mover does not re-sweep along the clipped velocity. Corners that touch a
/// wall and a ceiling in the same tick resolve only the first of the two.
pub const NUM_BUMPS: usize = 1;

/// Normals with a larger up component than this are floors.
pub const SURF_SLOPE: f32 = 0.7;

/// Overbounce used when clipping. 1.0 removes the into-plane component
/// exactly, without bouncing off.
pub const OVERBOUNCE: f32 = 1.0;

/// Remove the part of `input` that moves into the plane with `normal`.
///
/// Also reports how the plane blocks: floors have a positive up component,
/// walls and steps none.
pub fn clip_velocity(input: Vec3, normal: Vec3, overbounce: f32) -> (Vec3, BlockedFlags) {
    let mut blocked = BlockedFlags::NONE;
    if normal.y > 0.0 {
        blocked |= BlockedFlags::FLOOR;
    }
    if normal.y == 0.0 {
        blocked |= BlockedFlags::WALL;
    }

    let backoff = input.dot(normal) * overbounce;
    let mut output = input - normal * backoff;

    // One more pass in case rounding left us moving through the plane.
    let adjust = output.dot(normal);
    if adjust < 0.0 {
        output -= normal * adjust;
    }

    (output, blocked)
}

/// Planes hit during one reflect call. Lives on the stack of that call.
#[derive(Debug, Clone, Copy)]
struct ClipPlanes {
    planes: [Vec3; MAX_CLIP_PLANES],
    len: usize,
}

impl ClipPlanes {
    fn new() -> Self {
        Self {
            planes: [Vec3::ZERO; MAX_CLIP_PLANES],
            len: 0,
        }
    }

    /// Record a plane. Returns `false` when full.
    fn push(&mut self, normal: Vec3) -> bool {
        if self.len >= MAX_CLIP_PLANES {
            return false;
        }
        self.planes[self.len] = normal;
        self.len += 1;
        true
    }

    fn clear(&mut self) {
        self.len = 0;
    }

    fn as_slice(&self) -> &[Vec3] {
        &self.planes[..self.len]
    }
}

/// Outcome of a reflect call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reflection {
    /// Velocity after clipping.
    pub velocity: Vec3,
    /// Furthest point the sweeps reached.
    pub origin: Vec3,
    /// Kinds of surface that blocked.
    pub blocked: BlockedFlags,
}

/// Slide `velocity` along whatever the collider sweeps into over `delta_time`.
///
/// Runs [`NUM_BUMPS`] passes.
pub fn reflect<W>(
    world: &W,
    collider: &Collider,
    velocity: Vec3,
    origin: Vec3,
    delta_time: f32,
) -> Result<Reflection, PhysicsError>
where
    W: CollisionQuery + ?Sized,
{
    reflect_with_bumps(world, collider, velocity, origin, delta_time, NUM_BUMPS)
}

/// Bump and slide with an explicit number of passes.
///
/// Each pass sweeps from the current origin along the remaining motion. The
/// first plane hit after any progress is clipped against directly, except a
/// floor, which ends the call with the velocity untouched so landing on a
/// slope never wedges the mover into a corner. Later planes (hit without
/// making progress) are clipped against as a set, falling back to sliding
/// along the crease of two planes. The call zeroes the velocity when:
///
/// - more than [`MAX_CLIP_PLANES`] planes pile up
/// - no slide direction exists for three or more planes
/// - the slide would turn the mover against its starting velocity
/// - no pass made any progress
pub fn reflect_with_bumps<W>(
    world: &W,
    collider: &Collider,
    velocity: Vec3,
    origin: Vec3,
    delta_time: f32,
    bumps: usize,
) -> Result<Reflection, PhysicsError>
where
    W: CollisionQuery + ?Sized,
{
    let primal_velocity = velocity;
    let mut velocity = velocity;
    let mut original_velocity = velocity;
    let mut origin = origin;
    let mut blocked = BlockedFlags::NONE;
    let mut planes = ClipPlanes::new();

    let mut all_fraction = 0.0;
    let mut time_left = delta_time;

    for _ in 0..bumps {
        if velocity.length_squared() == 0.0 {
            break;
        }

        let end = origin + velocity * time_left;
        let trace = sweep(world, collider, origin, end)?;

        all_fraction += trace.fraction;

        if trace.fraction > 0.0 {
            // Made progress: the planes from before no longer matter.
            origin = trace.reached();
            original_velocity = velocity;
            planes.clear();
        }

        if trace.fraction == 1.0 {
            break;
        }

        let normal = trace.normal_or_zero();

        if normal.y > SURF_SLOPE {
            blocked |= BlockedFlags::FLOOR;
        }
        if normal.y == 0.0 {
            blocked |= BlockedFlags::WALL;
        }

        time_left -= time_left * trace.fraction;

        if !planes.push(normal) {
            log::warn!(
                "reflect ran out of clip planes at {:?}, stopping mover",
                origin
            );
            velocity = Vec3::ZERO;
            break;
        }

        if planes.len == 1 {
            if normal.y > SURF_SLOPE {
                return Ok(Reflection {
                    velocity,
                    origin,
                    blocked,
                });
            }

            let (clipped, _) = clip_velocity(original_velocity, normal, OVERBOUNCE);
            velocity = clipped;
            original_velocity = clipped;
        } else {
            match clip_to_planes(original_velocity, planes.as_slice()) {
                Some(clipped) => velocity = clipped,
                None => {
                    let [first, second] = match planes.as_slice() {
                        &[first, second] => [first, second],
                        _ => {
                            velocity = Vec3::ZERO;
                            break;
                        }
                    };
                    velocity = slide_along_crease(original_velocity, first, second);
                    log::trace!("sliding along crease, velocity {:?}", velocity);
                }
            }

            // Never slide against the velocity the call started with.
            if velocity.dot(primal_velocity) <= 0.0 {
                velocity = Vec3::ZERO;
                break;
            }
        }
    }

    if all_fraction == 0.0 {
        velocity = Vec3::ZERO;
    }

    Ok(Reflection {
        velocity,
        origin,
        blocked,
    })
}

/// Find a clip against one of `planes` that leaves `velocity` moving into
/// none of the others.
fn clip_to_planes(velocity: Vec3, planes: &[Vec3]) -> Option<Vec3> {
    planes.iter().enumerate().find_map(|(i, plane)| {
        let (clipped, _) = clip_velocity(velocity, *plane, OVERBOUNCE);
        let into_other = planes
            .iter()
            .enumerate()
            .any(|(j, other)| j != i && clipped.dot(*other) < 0.0);
        (!into_other).then_some(clipped)
    })
}

/// Project `velocity` onto the line where two planes meet.
///
/// Parallel or opposing planes have no crease and give zero.
fn slide_along_crease(velocity: Vec3, first: Vec3, second: Vec3) -> Vec3 {
    let crease = first.cross(second).normalize_or_zero();
    crease * crease.dot(velocity)
}
