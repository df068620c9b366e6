//! Strafe - headless movement driver.
//!
//! Runs a scripted player through a small test arena at a fixed tick rate and
//! logs what the movement core does. Pass a JSON file to override the
//! movement constants:
//!
//! ```text
//! RUST_LOG=info strafe [constants.json]
//! ```

use std::error::Error;
use std::f32::consts::TAU;
use std::fs;

use glam::{Quat, Vec2, Vec3};
use strafe_physics::movement::check_ground;
use strafe_physics::{
    Collider, CollisionLayers, CollisionWorld, MoveInput, MoverSettings, MovementConstants,
    MovementState, PlayerController, SurfaceMaterial, MOVEMENT_CONSTANTS,
};

/// Simulation ticks per second.
const TICK_RATE: u32 = 50;

/// Seconds of simulation to run.
const RUN_SECONDS: u32 = 12;

/// Ticks between summary lines.
const REPORT_EVERY: u32 = 25;

// ============================================================================
// LEVEL
// ============================================================================

/// Floor, outer walls, a ramp and a couple of crates.
fn test_arena() -> CollisionWorld {
    let mut world = CollisionWorld::new();

    let floor = world.add_box(
        Vec3::new(0.0, -0.5, 0.0),
        Vec3::new(40.0, 0.5, 40.0),
        CollisionLayers::DEFAULT,
    );
    world.set_material(floor, SurfaceMaterial::default());

    let wall_height = 5.0;
    let wall_thickness = 0.5;
    let arena_size = 40.0;

    for (center, half_extents) in [
        (
            Vec3::new(0.0, wall_height / 2.0, -arena_size),
            Vec3::new(arena_size, wall_height / 2.0, wall_thickness),
        ),
        (
            Vec3::new(0.0, wall_height / 2.0, arena_size),
            Vec3::new(arena_size, wall_height / 2.0, wall_thickness),
        ),
        (
            Vec3::new(arena_size, wall_height / 2.0, 0.0),
            Vec3::new(wall_thickness, wall_height / 2.0, arena_size),
        ),
        (
            Vec3::new(-arena_size, wall_height / 2.0, 0.0),
            Vec3::new(wall_thickness, wall_height / 2.0, arena_size),
        ),
    ] {
        world.add_box(center, half_extents, CollisionLayers::DEFAULT);
    }

    // 20 degree ramp
    let ramp = world.add_oriented_box(
        Vec3::new(10.0, 0.5, -10.0),
        Quat::from_rotation_x(20f32.to_radians()),
        Vec3::new(3.0, 0.25, 6.0),
        CollisionLayers::DEFAULT,
    );
    world.set_material(ramp, SurfaceMaterial::uniform(0.4));

    // Crates
    world.add_box(
        Vec3::new(-6.0, 0.75, -15.0),
        Vec3::new(0.75, 0.75, 0.75),
        CollisionLayers::PROP_MEDIUM,
    );
    world.add_box(
        Vec3::new(4.0, 0.5, -25.0),
        Vec3::new(0.5, 0.5, 0.5),
        CollisionLayers::PROP_SMALL,
    );

    world
}

// ============================================================================
// INPUT SCRIPT
// ============================================================================

/// Input for a given tick: run forward, jump every second, and strafe while
/// slowly turning during the middle of the run.
fn scripted_input(tick: u32) -> MoveInput {
    let seconds = tick as f32 / TICK_RATE as f32;

    let yaw = if (4.0..8.0).contains(&seconds) {
        (seconds - 4.0) * TAU / 8.0
    } else {
        0.0
    };
    let camera_forward = Vec3::new(yaw.sin(), 0.0, -yaw.cos());
    let camera_right = camera_forward.cross(Vec3::Y);

    let strafe = if (4.0..8.0).contains(&seconds) { 1.0 } else { 0.0 };

    MoveInput {
        axis: Vec2::new(strafe, 1.0),
        jump: tick % TICK_RATE == 0,
        camera_forward,
        camera_right,
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn load_constants() -> Result<MovementConstants, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .map_err(|err| format!("failed to read {}: {}", path, err))?;
            let constants = serde_json::from_str(&text)
                .map_err(|err| format!("failed to parse {}: {}", path, err))?;
            log::info!("Loaded movement constants from {}", path);
            Ok(constants)
        }
        None => Ok(MOVEMENT_CONSTANTS),
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let constants = load_constants()?;
    let controller = PlayerController::new(constants, MoverSettings::default());
    let collider = Collider::player();
    let world = test_arena();

    let delta_time = 1.0 / TICK_RATE as f32;
    let mut state = MovementState::new(Vec3::new(0.0, 2.0, 0.0));
    let mut top_speed: f32 = 0.0;

    log::info!(
        "Running {} ticks at {} Hz against {} brushes",
        RUN_SECONDS * TICK_RATE,
        TICK_RATE,
        world.brush_count()
    );

    for tick in 0..RUN_SECONDS * TICK_RATE {
        state.ground = check_ground(&world, &collider, state.position)?;

        let input = scripted_input(tick);
        let out = controller.step(&world, &collider, &mut state, &input, delta_time)?;

        top_speed = top_speed.max(state.horizontal_speed());

        log::debug!(
            "tick {}: pos {:?} vel {:?} blocked {:?} grounded {}",
            tick,
            out.position,
            out.velocity,
            out.blocked,
            out.grounded
        );

        if tick % REPORT_EVERY == 0 {
            log::info!(
                "t={:5.2}s pos=({:7.2}, {:5.2}, {:7.2}) speed={:5.2} {}",
                tick as f32 * delta_time,
                out.position.x,
                out.position.y,
                out.position.z,
                state.horizontal_speed(),
                if out.grounded { "ground" } else { "air" }
            );
        }
    }

    log::info!(
        "Finished at {:?}, top horizontal speed {:.2} m/s",
        state.position,
        top_speed
    );

    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(err) = run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
