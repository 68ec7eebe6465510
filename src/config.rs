//! Engine configuration
//!
//! Stored as RON. Every field has a default, so a config file only needs the
//! values it changes:
//!
//! ```ron
//! (
//!     start_mode: Solid,
//!     scene: Showcase,
//!     camera_z: 6.0,
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::rasterizer::{
    ByteOrder, Camera, Color565, Fix16, PipelineSettings, RenderMode, Vec3, AMBIENT, CAMERA_Z,
    FOCAL_LENGTH, HEIGHT, NEAR_CLAMP, WIDTH,
};
use crate::scene::SceneKind;

/// Limits applied by [`EngineConfig::validate`]
pub mod limits {
    /// Largest panel edge accepted
    pub const MAX_DIMENSION: usize = 1024;
    /// Keeps values well inside the 16.16 range (+-32767)
    pub const MAX_MAGNITUDE: f32 = 10_000.0;
}

/// Error type for config loading
#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
    ValidationError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(e)
    }
}

impl From<ron::Error> for ConfigError {
    fn from(e: ron::Error) -> Self {
        ConfigError::SerializeError(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Parse error: {}", e),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            ConfigError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError(e) => Some(e),
            ConfigError::ParseError(e) => Some(e),
            ConfigError::SerializeError(e) => Some(e),
            ConfigError::ValidationError(_) => None,
        }
    }
}

/// Startup settings for the engine
///
/// Floats are converted to 16.16 once at init; nothing on the frame path
/// reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub width: usize,
    pub height: usize,
    /// Byte order of serialized pixels on the bus
    pub byte_order: ByteOrder,
    /// Focal length in pixels
    pub focal_length: f32,
    /// Camera-space z floor
    pub near_clamp: f32,
    /// Ambient light added to every face (0.0 - 1.0)
    pub ambient: f32,
    /// Distance the scene is pushed in front of the eye
    pub camera_z: f32,
    pub start_mode: RenderMode,
    pub scene: SceneKind,
    /// Step used by headless runs (seconds)
    pub fixed_dt: f32,
    /// Largest dt a single update may advance (seconds)
    pub max_dt: f32,
    pub background: Color565,
    pub wire_color: Color565,
    pub overlay_color: Color565,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let pipeline = PipelineSettings::default();
        Self {
            width: WIDTH,
            height: HEIGHT,
            byte_order: ByteOrder::BigEndian,
            focal_length: FOCAL_LENGTH.to_f32(),
            near_clamp: NEAR_CLAMP.to_f32(),
            ambient: AMBIENT.to_f32(),
            camera_z: CAMERA_Z.to_f32(),
            start_mode: RenderMode::Wire,
            scene: SceneKind::SpinningMesh,
            fixed_dt: 1.0 / 60.0,
            max_dt: 0.1,
            background: pipeline.background,
            wire_color: pipeline.wire_color,
            overlay_color: pipeline.overlay_color,
        }
    }
}

fn check_range(name: &str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ConfigError::ValidationError(format!(
            "{} = {} (expected {} to {})",
            name, value, min, max
        )));
    }
    Ok(())
}

impl EngineConfig {
    /// Read and validate a RON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }

    /// Parse and validate RON text
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .indentor("    ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        use limits::{MAX_DIMENSION, MAX_MAGNITUDE};

        if self.width == 0 || self.height == 0 || self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(ConfigError::ValidationError(format!(
                "display size {}x{} (each side must be 1 to {})",
                self.width, self.height, MAX_DIMENSION
            )));
        }

        check_range("focal_length", self.focal_length, 1.0, MAX_MAGNITUDE)?;
        // The projection divides by z, so the clamp has to stay clear of zero
        check_range("near_clamp", self.near_clamp, 0.01, MAX_MAGNITUDE)?;
        check_range("ambient", self.ambient, 0.0, 1.0)?;
        check_range("camera_z", self.camera_z, -MAX_MAGNITUDE, MAX_MAGNITUDE)?;
        check_range("max_dt", self.max_dt, 0.001, 1.0)?;
        check_range("fixed_dt", self.fixed_dt, 0.001, self.max_dt)?;
        Ok(())
    }

    pub fn camera(&self) -> Camera {
        Camera::new(
            Vec3::new(Fix16::ZERO, Fix16::ZERO, Fix16::from_f32(self.camera_z)),
            Fix16::from_f32(self.focal_length),
        )
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            near: Fix16::from_f32(self.near_clamp),
            ambient: Fix16::from_f32(self.ambient),
            background: self.background,
            wire_color: self.wire_color,
            overlay_color: self.overlay_color,
        }
    }

    pub fn fixed_dt(&self) -> Fix16 {
        Fix16::from_f32(self.fixed_dt)
    }

    pub fn max_dt(&self) -> Fix16 {
        Fix16::from_f32(self.max_dt)
    }
}
