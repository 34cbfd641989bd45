//! Player movement controller.
//!
//! This is the main entry point for player movement. It integrates damping,
//! gravity and input into the velocity, moves the capsule, and pushes it back
//! out of the world along the deepest contact.

use glam::Vec3;

use crate::collision::{Capsule, CollisionVolume};

use super::config::MovementConfig;
use super::state::{CameraPose, MovementInput, MovementMode};

/// Player movement controller.
///
/// Owns the player's capsule, velocity and floor state. Nothing else writes
/// them; callers observe the result through [`PlayerController::tick`]'s
/// returned [`CameraPose`] and the read accessors.
///
/// # Example
///
/// ```ignore
/// let mut player = PlayerController::spawn_standing(MovementConfig::default(), spawn_feet);
///
/// // Each frame:
/// let pose = player.tick(&volume, delta_time, &input, camera.look_direction());
/// ```
#[derive(Debug, Clone)]
pub struct PlayerController {
    config: MovementConfig,
    capsule: Capsule,
    velocity: Vec3,
    mode: MovementMode,
}

impl PlayerController {
    /// Create a controller for an existing capsule, at rest and airborne.
    pub fn new(config: MovementConfig, capsule: Capsule) -> Self {
        Self {
            config,
            capsule,
            velocity: Vec3::ZERO,
            mode: MovementMode::Airborne,
        }
    }

    /// Create a controller with a standing capsule whose bottom is at `feet`.
    pub fn spawn_standing(config: MovementConfig, feet: Vec3) -> Self {
        let capsule = config.capsule_at(feet);
        Self::new(config, capsule)
    }

    /// Movement configuration.
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Current collision capsule.
    pub fn capsule(&self) -> &Capsule {
        &self.capsule
    }

    /// Current velocity (meters/second).
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Overwrite the velocity, e.g. for knockback or scripted motion.
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Floor state from the last tick.
    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    /// Check if the last tick ended on a floor.
    pub fn on_floor(&self) -> bool {
        self.mode.on_floor()
    }

    /// Camera pose for the current capsule.
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.capsule.end,
        }
    }

    /// Move the capsule so its bottom is at `feet`, stopping all motion.
    pub fn teleport(&mut self, feet: Vec3) {
        self.capsule.set_feet(feet);
        self.velocity = Vec3::ZERO;
        self.mode = MovementMode::Airborne;
    }

    /// Advance the player by `delta_time` seconds.
    ///
    /// `look_direction` only steers input; its vertical part is ignored.
    /// The caller is responsible for keeping `delta_time` small enough that
    /// one step cannot carry the capsule through a wall.
    pub fn tick(
        &mut self,
        volume: &CollisionVolume,
        delta_time: f32,
        input: &MovementInput,
        look_direction: Vec3,
    ) -> CameraPose {
        if delta_time == 0.0 {
            return self.pose();
        }

        self.integrate_velocity(delta_time);
        self.apply_input(input, look_direction, delta_time);

        self.capsule.translate(self.velocity * delta_time);
        self.resolve_collision(volume);

        log::trace!(
            "tick dt={:.4} feet={:?} velocity={:?} mode={:?}",
            delta_time,
            self.capsule.feet(),
            self.velocity,
            self.mode
        );

        self.pose()
    }

    // ========================================================================
    // Velocity
    // ========================================================================

    fn integrate_velocity(&mut self, delta_time: f32) {
        let mut damping = (-self.config.damping * delta_time).exp() - 1.0;

        if !self.on_floor() {
            self.velocity.y -= self.config.gravity * delta_time;
            damping *= self.config.air_damping_scale;
        }

        self.velocity += self.velocity * damping;
    }

    fn apply_input(&mut self, input: &MovementInput, look_direction: Vec3, delta_time: f32) {
        if !input.has_movement_input() {
            return;
        }

        let (forward, side) = movement_basis(look_direction);
        let speed = self.config.input_speed(self.on_floor()) * delta_time;

        self.velocity += forward * (input.forward_axis() * speed);
        self.velocity += side * (input.side_axis() * speed);
    }

    // ========================================================================
    // Collision Response
    // ========================================================================

    fn resolve_collision(&mut self, volume: &CollisionVolume) {
        let Some(contact) = volume.capsule_intersect(&self.capsule) else {
            self.mode = MovementMode::Airborne;
            return;
        };

        let on_floor = contact.is_floor();
        self.mode = MovementMode::from_on_floor(on_floor);

        if !on_floor {
            self.velocity -= contact.normal * contact.normal.dot(self.velocity);
        }

        self.capsule.translate(contact.correction());
    }
}

/// Horizontal forward and right vectors for a look direction.
///
/// Both are zero when looking straight up or down.
pub fn movement_basis(look_direction: Vec3) -> (Vec3, Vec3) {
    let forward = Vec3::new(look_direction.x, 0.0, look_direction.z).normalize_or_zero();
    let side = forward.cross(Vec3::Y);
    (forward, side)
}

// ============================================================================
// Tests
// ============================================================================
