//! Movement configuration constants.
//!
//! All movement parameters are grouped here for easy tuning.
//! Units are metric (meters, seconds).

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collision::Capsule;

/// A movement setting that cannot describe a usable player.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MovementConfigError {
    #[error("capsule_radius must be positive, got {0}")]
    NonPositiveRadius(f32),

    #[error("standing_height {height} is shorter than the capsule diameter {diameter}")]
    ShorterThanDiameter { height: f32, diameter: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
}

/// Configuration for player movement physics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // ========================================================================
    // Player Dimensions
    // ========================================================================
    /// Collision radius (meters).
    pub capsule_radius: f32,

    /// Standing height, feet to top of head (meters).
    ///
    /// 1.8 is human scale. The scene this walkthrough was modelled on used a
    /// 2.5 m core segment with the same radius, 3.2 m cap to cap.
    pub standing_height: f32,

    // ========================================================================
    // Physics
    // ========================================================================
    /// Gravity acceleration while airborne (meters/second²).
    pub gravity: f32,

    /// Exponential velocity damping rate (1/second).
    pub damping: f32,

    /// Multiplier on the damping factor while airborne.
    pub air_damping_scale: f32,

    // ========================================================================
    // Movement Speeds
    // ========================================================================
    /// Acceleration from held movement keys on the floor (meters/second²).
    pub ground_speed: f32,

    /// Acceleration from held movement keys in the air (meters/second²).
    pub air_speed: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            capsule_radius: 0.35,
            standing_height: 1.8,

            gravity: 15.0,
            damping: 10.0,
            air_damping_scale: 0.1,

            ground_speed: 25.0,
            air_speed: 8.0,
        }
    }
}

impl MovementConfig {
    /// Input acceleration for the current floor state.
    pub fn input_speed(&self, on_floor: bool) -> f32 {
        if on_floor {
            self.ground_speed
        } else {
            self.air_speed
        }
    }

    /// A standing capsule whose bottom touches `feet`.
    pub fn capsule_at(&self, feet: Vec3) -> Capsule {
        Capsule::standing(feet, self.standing_height, self.capsule_radius)
    }

    /// Check the values describe a usable player.
    pub fn validate(&self) -> Result<(), MovementConfigError> {
        if !(self.capsule_radius > 0.0) {
            return Err(MovementConfigError::NonPositiveRadius(self.capsule_radius));
        }

        let diameter = 2.0 * self.capsule_radius;
        if !(self.standing_height >= diameter) {
            return Err(MovementConfigError::ShorterThanDiameter {
                height: self.standing_height,
                diameter,
            });
        }

        for (field, value) in [("damping", self.damping), ("gravity", self.gravity)] {
            if !(value >= 0.0) {
                return Err(MovementConfigError::Negative { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_config() {
        let config = MovementConfig::default();
        assert!(config.capsule_radius > 0.0);
        assert!(config.gravity > 0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_input_speed() {
        let config = MovementConfig::default();
        assert_eq!(config.input_speed(true), config.ground_speed);
        assert_eq!(config.input_speed(false), config.air_speed);
    }

    #[test]
    fn test_capsule_at_feet() {
        let config = MovementConfig::default();
        let capsule = config.capsule_at(Vec3::new(1.0, 0.0, 2.0));

        assert_abs_diff_eq!(capsule.start, Vec3::new(1.0, 0.35, 2.0), epsilon = 1e-6);
        assert_abs_diff_eq!(capsule.end, Vec3::new(1.0, 1.45, 2.0), epsilon = 1e-6);
        assert_eq!(capsule.radius, 0.35);
    }

    #[test]
    fn test_validate_rejects_bad_dimensions() {
        let config = MovementConfig {
            capsule_radius: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(MovementConfigError::NonPositiveRadius(0.0)));

        let config = MovementConfig {
            standing_height: 0.5,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(MovementConfigError::ShorterThanDiameter {
                height: 0.5,
                diameter: 0.7
            })
        );
    }

    #[test]
    fn test_validate_rejects_negative_rates() {
        let config = MovementConfig {
            gravity: -1.0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(
            err,
            MovementConfigError::Negative {
                field: "gravity",
                value: -1.0
            }
        );
        assert!(err.to_string().contains("gravity"));
    }
}
