//! Flatwalk Physics
//!
//! Capsule player movement over static triangle geometry, for walking a
//! first-person camera through an indoor scene.
//!
//! # Architecture
//!
//! The physics core is split into two systems:
//!
//! - **Collision**: A bounding-volume tree over world triangles that reports the
//!   deepest capsule penetration
//! - **Movement**: Integrates damping, gravity and input, then uses that
//!   contact to push the player out of walls and floors
//!
//! # Usage
//!
//! ```ignore
//! let volume = CollisionVolume::build(level_triangles);
//! let mut player = PlayerController::spawn_standing(MovementConfig::default(), spawn);
//!
//! // Each frame:
//! let pose = player.tick(&volume, delta_time, &input, look_direction);
//! camera.set_position(pose.position);
//! ```

pub mod collision;
pub mod movement;

// Re-export commonly used types
pub use collision::{Aabb, Capsule, CollisionVolume, Contact, Triangle};
pub use movement::{
    CameraPose, MovementConfig, MovementConfigError, MovementInput, MovementMode, PlayerController,
};
