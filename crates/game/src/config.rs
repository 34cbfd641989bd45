//! Loading and saving simulation settings as RON.

use std::fs;
use std::path::{Path, PathBuf};

use flatwalk_physics::MovementConfigError;
use thiserror::Error;

use crate::simulation::SimulationConfig;

/// Errors that can occur while loading or saving a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("serialize error: {0}")]
    Serialize(#[from] ron::Error),

    #[error("invalid config: {0}")]
    Invalid(#[from] SettingError),
}

/// A simulation setting outside its usable range.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SettingError {
    #[error(transparent)]
    Movement(#[from] MovementConfigError),

    #[error("max_frame_delta must be positive and finite, got {0}")]
    MaxFrameDelta(f32),

    #[error("substeps must be at least 1")]
    NoSubsteps,

    #[error("mouse_sensitivity must be finite, got {0}")]
    MouseSensitivity(f32),
}

impl SimulationConfig {
    /// Read and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_ron_str(&text)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a config. Missing fields take their defaults.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty-printed RON for this config.
    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut config = SimulationConfig::default();
        config.substeps = 4;
        config.movement.ground_speed = 30.0;

        let text = config.to_ron_string().unwrap();
        let parsed = SimulationConfig::from_ron_str(&text).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = SimulationConfig::from_ron_str("(substeps: 2, movement: (gravity: 9.8))").unwrap();

        assert_eq!(config.substeps, 2);
        assert_eq!(config.movement.gravity, 9.8);
        assert_eq!(config.max_frame_delta, SimulationConfig::default().max_frame_delta);
        assert_eq!(config.movement.capsule_radius, 0.35);
    }

    #[test]
    fn test_parse_error() {
        let err = SimulationConfig::from_ron_str("(substeps: \"many\")").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{err:?}");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = SimulationConfig::from_ron_str("(substeps: 0)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(SettingError::NoSubsteps)), "{err:?}");

        let err = SimulationConfig::from_ron_str("(movement: (capsule_radius: -0.5))").unwrap_err();
        assert!(
            matches!(
                err,
                ConfigError::Invalid(SettingError::Movement(MovementConfigError::NonPositiveRadius(_)))
            ),
            "{err:?}"
        );
        assert!(err.to_string().contains("capsule_radius"));
    }

    #[test]
    fn test_missing_file() {
        let err = SimulationConfig::load("/nonexistent/flatwalk.ron").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }), "{err:?}");
        assert!(err.to_string().contains("/nonexistent/flatwalk.ron"));
    }
}
