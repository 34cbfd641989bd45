//! Player input handling.
//!
//! This module turns raw keyboard events (DOM-style key codes such as
//! `"KeyW"`) into the per-frame [`MovementInput`] the physics expects.

use std::collections::HashSet;

use flatwalk_physics::MovementInput;
use serde::{Deserialize, Serialize};

/// Logical movement keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementKey {
    Forward,
    Backward,
    Left,
    Right,
    Jump,
}

impl MovementKey {
    /// Map a key code to a movement key.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" | "ArrowUp" => Some(Self::Forward),
            "KeyS" | "ArrowDown" => Some(Self::Backward),
            "KeyA" | "ArrowLeft" => Some(Self::Left),
            "KeyD" | "ArrowRight" => Some(Self::Right),
            "Space" => Some(Self::Jump),
            _ => None,
        }
    }
}

/// Keys currently held down.
///
/// Key-down and key-up events may arrive at any time between frames; the
/// simulation samples [`InputState::movement`] once per frame.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressed: HashSet<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down (`pressed = true`) or key-up event.
    pub fn handle_key(&mut self, code: &str, pressed: bool) {
        if pressed {
            self.pressed.insert(code.to_string());
        } else {
            self.pressed.remove(code);
        }
    }

    /// Check if a raw key code is held.
    pub fn is_pressed(&self, code: &str) -> bool {
        self.pressed.contains(code)
    }

    /// Release every key, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.pressed.clear();
    }

    /// Movement keys held right now.
    pub fn movement(&self) -> MovementInput {
        let mut input = MovementInput::default();
        for key in self.pressed.iter().filter_map(|code| MovementKey::from_code(code)) {
            match key {
                MovementKey::Forward => input.forward = true,
                MovementKey::Backward => input.backward = true,
                MovementKey::Left => input.left = true,
                MovementKey::Right => input.right = true,
                MovementKey::Jump => input.jump = true,
            }
        }
        input
    }
}
