//! Flatwalk - Main Entry Point
//!
//! Walks a first-person player through the two-room flat without a window.
//! Key presses and mouse motion are scripted; the camera pose is logged once
//! per simulated second.
//!
//! Usage: `flatwalk [config.ron]`

use std::f32::consts::{PI, TAU};
use std::process::ExitCode;

use flatwalk_game::{ConfigError, FirstPersonView, InputState, Level, Simulation, SimulationConfig};
use glam::{Vec2, Vec3};

/// Rendered frame rate being imitated.
const FRAME_RATE: f32 = 60.0;

/// Frame that pretends the window was hidden for half a second.
const STALL_FRAME: u64 = 120;
const STALL_SECONDS: f32 = 0.5;

/// Give up after this many frames.
const MAX_FRAMES: u64 = 60 * 60;

/// Most mouse movement the script applies per frame (pixels).
const MAX_TURN_PIXELS: f32 = 60.0;

/// Only walk when facing within this angle of the next waypoint (radians).
const WALK_ANGLE: f32 = 0.3;

/// A waypoint counts as reached within this horizontal distance (meters).
const ARRIVE_DISTANCE: f32 = 0.3;

/// Feet positions (x, z) to visit: to the doorway, through it, up to the sofa.
const ROUTE: [Vec2; 4] = [
    Vec2::new(-2.0, 0.0),
    Vec2::new(-1.2, 0.0),
    Vec2::new(3.0, 0.0),
    Vec2::new(3.0, 1.2),
];

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut simulation = match load_simulation() {
        Ok(simulation) => simulation,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let sensitivity = simulation.config().mouse_sensitivity;
    let mut input = InputState::new();
    let mut view = FirstPersonView::default();
    let mut next_waypoint = 0;

    log::info!("walking {} waypoints from {:?}", ROUTE.len(), simulation.spawn());

    for frame in 0..MAX_FRAMES {
        let Some(target) = ROUTE.get(next_waypoint).copied() else {
            break;
        };

        let feet = simulation.player().capsule().feet();
        let offset = target - Vec2::new(feet.x, feet.z);
        if offset.length() < ARRIVE_DISTANCE {
            log::info!("reached waypoint {} at frame {}", next_waypoint, frame);
            next_waypoint += 1;
            continue;
        }

        // Turn with the mouse, walk once roughly facing the target
        let heading_error = wrap_angle(offset.y.atan2(offset.x) - view.yaw);
        let pixels = (heading_error / (sensitivity * 0.001)).clamp(-MAX_TURN_PIXELS, MAX_TURN_PIXELS);
        view.apply_mouse_delta(pixels, 0.0, sensitivity);
        input.handle_key("KeyW", heading_error.abs() < WALK_ANGLE);

        let elapsed = if frame == STALL_FRAME {
            STALL_SECONDS
        } else {
            1.0 / FRAME_RATE
        };

        if simulation.advance(elapsed, &input.movement(), view.look_direction()).is_none() {
            log::warn!("frame {}: dropped {:.2}s stall", frame, elapsed);
            continue;
        }

        if simulation.frame() % FRAME_RATE as u64 == 0 {
            log_pose(&simulation);
        }
    }

    log_pose(&simulation);

    if next_waypoint < ROUTE.len() {
        log::error!("stopped before waypoint {} at {:?}", next_waypoint, ROUTE[next_waypoint]);
        return ExitCode::FAILURE;
    }

    log::info!(
        "walkthrough finished: {} frames simulated, {} skipped",
        simulation.frame(),
        simulation.skipped_frames()
    );
    ExitCode::SUCCESS
}

/// Simulation for the two-room flat, with settings from the optional config
/// path argument.
fn load_simulation() -> Result<Simulation, ConfigError> {
    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    Simulation::new(config, Level::two_room_flat())
}

fn log_pose(simulation: &Simulation) {
    let Vec3 { x, y, z } = simulation.pose().position;
    log::info!(
        "t={:.1}s camera=({:.2}, {:.2}, {:.2}) mode={:?}",
        simulation.frame() as f32 / FRAME_RATE,
        x,
        y,
        z,
        simulation.player().mode()
    );
}

fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}
