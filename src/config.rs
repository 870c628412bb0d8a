//! Engine tunables, loadable from TOML.

use crate::body::MAX_ROT_VELOCITY;
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Distance floor for gravity, in world units.
pub const MIN_GRAVITY_DISTANCE: f64 = 5.0;

/// Tunables read by [`Scene`](crate::scene::Scene) every tick.
///
/// Missing keys take their defaults:
///
/// ```toml
/// max_rot_velocity = 0.15
/// min_gravity_distance = 5.0
/// normal_force_elasticity = 0.0
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Spin rate above which rotational acceleration stops applying.
    pub max_rot_velocity: f64,
    /// Gravity treats closer centroids as this far apart.
    pub min_gravity_distance: f64,
    /// Elasticity of the impulse the normal force applies between two
    /// finite masses.
    pub normal_force_elasticity: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            max_rot_velocity: MAX_ROT_VELOCITY,
            min_gravity_distance: MIN_GRAVITY_DISTANCE,
            normal_force_elasticity: 0.0,
        }
    }
}

impl PhysicsConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: PhysicsConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        info!(path = %path.display(), "loaded physics config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_rot_velocity.is_finite() && self.max_rot_velocity > 0.0) {
            return Err(ConfigError::Invalid {
                field: "max_rot_velocity",
                reason: format!("must be positive and finite, got {}", self.max_rot_velocity),
            });
        }
        if !(self.min_gravity_distance.is_finite() && self.min_gravity_distance > 0.0) {
            return Err(ConfigError::Invalid {
                field: "min_gravity_distance",
                reason: format!("must be positive and finite, got {}", self.min_gravity_distance),
            });
        }
        if !(self.normal_force_elasticity.is_finite() && self.normal_force_elasticity >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "normal_force_elasticity",
                reason: format!("must be non-negative, got {}", self.normal_force_elasticity),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = PhysicsConfig::from_toml_str("").unwrap();
        assert_eq!(config, PhysicsConfig::default());
        assert_eq!(config.min_gravity_distance, 5.0);
        assert_eq!(config.max_rot_velocity, 0.15);
    }

    #[test]
    fn partial_override() {
        let config = PhysicsConfig::from_toml_str("min_gravity_distance = 2.5").unwrap();
        assert_eq!(config.min_gravity_distance, 2.5);
        assert_eq!(config.max_rot_velocity, MAX_ROT_VELOCITY);
    }

    #[test]
    fn rejects_negative_floor() {
        let err = PhysicsConfig::from_toml_str("min_gravity_distance = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "min_gravity_distance", .. }));
    }

    #[test]
    fn rejects_bad_toml() {
        let err = PhysicsConfig::from_toml_str("max_rot_velocity = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PhysicsConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("here.toml"));
    }
}
