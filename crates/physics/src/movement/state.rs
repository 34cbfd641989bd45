//! Movement state and input structures.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Whether the player was supported by a floor on the last tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementMode {
    /// Last contact had an upward-facing normal.
    Grounded,
    /// No contact, or the contact faced sideways or down.
    #[default]
    Airborne,
}

impl MovementMode {
    /// Mode for a floor test result.
    #[inline]
    pub fn from_on_floor(on_floor: bool) -> Self {
        if on_floor {
            Self::Grounded
        } else {
            Self::Airborne
        }
    }

    /// Check if player is on the floor.
    #[inline]
    pub fn on_floor(self) -> bool {
        self == Self::Grounded
    }
}

/// Where the camera sits after a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    /// Eye position in world space (top sphere centre of the capsule).
    pub position: Vec3,
}

/// Held movement keys for a single frame.
///
/// Opposite keys held together cancel out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// Accepted for input compatibility; the controller does not jump.
    pub jump: bool,
}

impl MovementInput {
    /// No keys held.
    pub const IDLE: Self = Self {
        forward: false,
        backward: false,
        left: false,
        right: false,
        jump: false,
    };

    /// Only the forward key held.
    pub const FORWARD: Self = Self {
        forward: true,
        ..Self::IDLE
    };

    /// Forward axis in {-1, 0, 1}.
    #[inline]
    pub fn forward_axis(&self) -> f32 {
        axis(self.forward, self.backward)
    }

    /// Strafe axis in {-1, 0, 1}, positive to the right.
    #[inline]
    pub fn side_axis(&self) -> f32 {
        axis(self.right, self.left)
    }

    /// Check if any movement key is active.
    #[inline]
    pub fn has_movement_input(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    f32::from(u8::from(positive)) - f32::from(u8::from(negative))
}
