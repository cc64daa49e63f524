//! Configuration loading for the focus core.
//!
//! All tunables are loaded from a TOML configuration file. Every section is
//! optional; missing keys fall back to the defaults below.

use bevy_math::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Complete focus configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Scale normalization settings
    #[serde(default)]
    pub scale: ScaleConfig,
    /// Camera animation settings
    #[serde(default)]
    pub camera: CameraConfig,
    /// Visual encoding settings
    #[serde(default)]
    pub style: StyleConfig,
}

impl FocusConfig {
    /// Loads and validates configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: FocusConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scale = &self.scale;
        if !(scale.desired_radius.is_finite() && scale.desired_radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "scale.desired_radius must be positive, got {}",
                scale.desired_radius
            )));
        }
        if !(scale.min_scale > 0.0
            && scale.min_scale <= scale.max_scale
            && scale.max_scale.is_finite())
        {
            return Err(ConfigError::Invalid(format!(
                "scale range [{}, {}] is empty or not finite and positive",
                scale.min_scale, scale.max_scale
            )));
        }

        let camera = &self.camera;
        if !(camera.lerp_factor > 0.0 && camera.lerp_factor <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.lerp_factor must be in (0, 1], got {}",
                camera.lerp_factor
            )));
        }
        for (name, offset) in [
            ("camera.focus_offset", camera.focus_offset),
            ("camera.home_offset", camera.home_offset),
        ] {
            if !offset.iter().all(|v| v.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be finite, got {:?}",
                    name, offset
                )));
            }
        }
        if camera.homing_duration_ms == 0 {
            return Err(ConfigError::Invalid(
                "camera.homing_duration_ms must be non-zero".into(),
            ));
        }

        if !(self.style.floor_radius.is_finite() && self.style.floor_radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "style.floor_radius must be positive, got {}",
                self.style.floor_radius
            )));
        }

        Ok(())
    }
}

/// Scale normalization configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    /// Radius, in render units, the farthest body is mapped to
    pub desired_radius: f32,
    /// Lower clamp for the scale factor (huge inputs)
    pub min_scale: f32,
    /// Upper clamp for the scale factor (tiny inputs)
    pub max_scale: f32,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            desired_radius: 30.0,
            min_scale: 0.02,
            max_scale: 5.0,
        }
    }
}

/// Camera animation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Fraction of the remaining distance covered each frame
    pub lerp_factor: f32,
    /// Camera offset from a focused body, multiplied by the scale factor
    pub focus_offset: [f32; 3],
    /// Home camera position, multiplied by `max(1, scale)`
    pub home_offset: [f32; 3],
    /// How long the home view is held after a reset
    pub homing_duration_ms: u64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            lerp_factor: 0.08,
            focus_offset: [12.0, 9.0, 18.0],
            home_offset: [0.0, 35.0, 70.0],
            homing_duration_ms: 600,
        }
    }
}

impl CameraConfig {
    /// Focus offset as a vector.
    pub fn focus_offset(&self) -> Vec3 {
        Vec3::from_array(self.focus_offset)
    }

    /// Home offset as a vector.
    pub fn home_offset(&self) -> Vec3 {
        Vec3::from_array(self.home_offset)
    }

    /// Homing window length.
    pub fn homing_duration(&self) -> Duration {
        Duration::from_millis(self.homing_duration_ms)
    }
}

/// Visual encoding configuration. Colors are sRGB triples in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Minimum rendered body radius
    pub floor_radius: f32,
    /// Body color when selected
    pub selected_color: [f32; 3],
    /// Emissive intensity when selected
    pub selected_emissive: f32,
    /// Body color when not selected
    pub neutral_color: [f32; 3],
    /// Emissive intensity when not selected
    pub neutral_emissive: f32,
    /// Orbit color when its body is selected
    pub selected_orbit_color: [f32; 3],
    /// Orbit opacity when its body is selected
    pub selected_orbit_opacity: f32,
    /// Orbit color when its body is not selected
    pub neutral_orbit_color: [f32; 3],
    /// Orbit opacity when its body is not selected
    pub neutral_orbit_opacity: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            floor_radius: 0.2,
            selected_color: [1.0, 0.8, 0.2],
            selected_emissive: 0.8,
            neutral_color: [0.55, 0.6, 0.68],
            neutral_emissive: 0.05,
            selected_orbit_color: [1.0, 0.8, 0.2],
            selected_orbit_opacity: 0.9,
            neutral_orbit_color: [0.3, 0.45, 0.75],
            neutral_orbit_opacity: 0.35,
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Error serializing TOML config
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// A value is outside its allowed range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Orrery focus configuration

[scale]
desired_radius = 30.0
min_scale = 0.02
max_scale = 5.0

[camera]
lerp_factor = 0.08
focus_offset = [12.0, 9.0, 18.0]
home_offset = [0.0, 35.0, 70.0]
homing_duration_ms = 600

[style]
floor_radius = 0.2
selected_color = [1.0, 0.8, 0.2]
selected_emissive = 0.8
neutral_color = [0.55, 0.6, 0.68]
neutral_emissive = 0.05
selected_orbit_color = [1.0, 0.8, 0.2]
selected_orbit_opacity = 0.9
neutral_orbit_color = [0.3, 0.45, 0.75]
neutral_orbit_opacity = 0.35
"#
    .to_string()
}
