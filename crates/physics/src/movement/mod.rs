//! Player movement physics system.
//!
//! This module implements a first-person walking controller with:
//!
//! - Frame-rate independent exponential damping
//! - Gravity and weaker damping while airborne
//! - Camera-relative input acceleration, stronger on the floor
//! - Single deepest-contact push-out with wall sliding
//!
//! # Design
//!
//! Movement is driven by the [`PlayerController`], which owns the player's
//! capsule and velocity and advances them against a
//! [`CollisionVolume`](crate::collision::CollisionVolume) once per tick.
//!
//! The floor state is recomputed from every tick's contact; there is no other
//! persistent movement state.

mod config;
mod controller;
mod state;

pub use config::{MovementConfig, MovementConfigError};
pub use controller::{movement_basis, PlayerController};
pub use state::{CameraPose, MovementInput, MovementMode};
