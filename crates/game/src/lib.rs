//! Flatwalk Game Logic
//!
//! This crate drives a first-person walkthrough of an apartment:
//!
//! - Level geometry and spawn point
//! - Keyboard and mouse-look state
//! - The per-frame simulation loop and its settings
//!
//! # Architecture
//!
//! Each rendered frame feeds the held keys, the look direction and the elapsed
//! time into the simulation, which publishes the camera pose.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Simulation                           │
//! │  ┌─────────┐    ┌───────────────┐    ┌──────────────────┐   │
//! │  │ Input   │───►│ Player        │───►│ Camera pose      │   │
//! │  │ + view  │    │ controller    │    │ (capsule top)    │   │
//! │  └─────────┘    └──────┬────────┘    └──────────────────┘   │
//! │                        │ capsule query                      │
//! │                 ┌──────▼────────┐                           │
//! │                 │ Collision     │  built once from Level    │
//! │                 │ volume        │                           │
//! │                 └───────────────┘                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod input;
pub mod level;
pub mod simulation;
pub mod view;

// Re-export main types
pub use config::{ConfigError, SettingError};
pub use input::{InputState, MovementKey};
pub use level::{box_triangles, Level, LevelBox};
pub use simulation::{Simulation, SimulationConfig};
pub use view::FirstPersonView;

// Re-export physics types for convenience
pub use flatwalk_physics::{
    CameraPose, CollisionVolume, MovementConfig, MovementConfigError, MovementInput, PlayerController,
};
