//! Walkthrough simulation - the per-frame loop.
//!
//! This module owns everything that changes while the player walks: the
//! player controller and the frame counter. The collision volume is built
//! once up front and only read afterwards.

use std::sync::Arc;

use flatwalk_physics::{CameraPose, CollisionVolume, MovementConfig, MovementInput, PlayerController};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SettingError};
use crate::level::Level;

/// Simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Movement physics configuration.
    pub movement: MovementConfig,

    /// Frames whose elapsed time reaches this many seconds are dropped
    /// instead of simulated, e.g. after the window was hidden.
    pub max_frame_delta: f32,

    /// Controller ticks per frame.
    pub substeps: u32,

    /// Mouse sensitivity.
    pub mouse_sensitivity: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            movement: MovementConfig::default(),
            max_frame_delta: 0.1,
            substeps: 1,
            mouse_sensitivity: 2.0,
        }
    }
}

impl SimulationConfig {
    /// Check the values describe a runnable simulation.
    pub fn validate(&self) -> Result<(), SettingError> {
        self.movement.validate()?;
        if !(self.max_frame_delta > 0.0 && self.max_frame_delta.is_finite()) {
            return Err(SettingError::MaxFrameDelta(self.max_frame_delta));
        }
        if self.substeps == 0 {
            return Err(SettingError::NoSubsteps);
        }
        if !self.mouse_sensitivity.is_finite() {
            return Err(SettingError::MouseSensitivity(self.mouse_sensitivity));
        }
        Ok(())
    }
}

/// The walkthrough simulation.
///
/// Advances the player once per rendered frame and publishes the camera pose.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    volume: Arc<CollisionVolume>,
    player: PlayerController,
    spawn: Vec3,

    /// Frames simulated so far.
    frame: u64,

    /// Frames dropped for an unusable elapsed time.
    skipped_frames: u64,
}

impl Simulation {
    /// Build the collision volume for `level` and spawn the player in it.
    ///
    /// Fails without building anything when `config` does not validate.
    pub fn new(config: SimulationConfig, level: Level) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, level))
    }

    /// Spawn a player in an already built (possibly shared) volume.
    pub fn with_volume(
        config: SimulationConfig,
        volume: Arc<CollisionVolume>,
        spawn: Vec3,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::spawn_into(config, volume, spawn))
    }

    /// Create a simulation with default configuration and the two-room flat.
    pub fn two_room_flat() -> Self {
        Self::build(SimulationConfig::default(), Level::two_room_flat())
    }

    fn build(config: SimulationConfig, level: Level) -> Self {
        let volume = CollisionVolume::build(level.triangles);
        log::info!(
            "level '{}': {} collision triangles in {} nodes",
            level.name,
            volume.triangle_count(),
            volume.node_count()
        );
        Self::spawn_into(config, Arc::new(volume), level.spawn)
    }

    fn spawn_into(config: SimulationConfig, volume: Arc<CollisionVolume>, spawn: Vec3) -> Self {
        let player = PlayerController::spawn_standing(config.movement.clone(), spawn);
        Self {
            config,
            volume,
            player,
            spawn,
            frame: 0,
            skipped_frames: 0,
        }
    }

    /// Advance by one rendered frame.
    ///
    /// Returns `None` without touching the player when `elapsed` is negative,
    /// not finite, or at least `max_frame_delta`; stepping that far in one go
    /// could carry the capsule through a wall.
    pub fn advance(&mut self, elapsed: f32, input: &MovementInput, look_direction: Vec3) -> Option<CameraPose> {
        if !elapsed.is_finite() || elapsed < 0.0 || elapsed >= self.config.max_frame_delta {
            log::debug!("frame {}: skipping elapsed time {}", self.frame, elapsed);
            self.skipped_frames += 1;
            return None;
        }

        let substeps = self.config.substeps.max(1);
        let step = elapsed / substeps as f32;
        let mut pose = self.player.pose();
        for _ in 0..substeps {
            pose = self.player.tick(&self.volume, step, input, look_direction);
        }

        self.frame += 1;
        Some(pose)
    }

    /// Put the player back at the spawn point, at rest.
    pub fn respawn(&mut self) {
        log::info!("respawning at {:?}", self.spawn);
        self.player.teleport(self.spawn);
    }

    /// Number of frames simulated.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Number of frames dropped by [`Simulation::advance`].
    pub fn skipped_frames(&self) -> u64 {
        self.skipped_frames
    }

    /// Current camera pose.
    pub fn pose(&self) -> CameraPose {
        self.player.pose()
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn volume(&self) -> &Arc<CollisionVolume> {
        &self.volume
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn spawn(&self) -> Vec3 {
        self.spawn
    }
}

// ============================================================================
// Tests
// ============================================================================
