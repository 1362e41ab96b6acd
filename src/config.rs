//=========================================================================
// Engine Configuration
//=========================================================================
//
// Serializable runtime settings.
//
// Priority:
//   1. EngineBuilder overrides (highest)
//   2. JSON config file
//   3. Defaults (lowest)
//
// Every field has a default so a partial (or empty) JSON object is a
// valid configuration.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::error::ConfigError;

//=== Defaults ============================================================

/// Levels between two automatic cloud checkpoints.
pub const DEFAULT_CHECKPOINT_INTERVAL: u32 = 4;

/// Placeholder screen size used before the first surface is known.
pub const DEFAULT_SCREEN_WIDTH: u32 = 320;
pub const DEFAULT_SCREEN_HEIGHT: u32 = 240;

fn default_checkpoint_interval() -> u32 {
    DEFAULT_CHECKPOINT_INTERVAL
}

fn default_saves_dir() -> PathBuf {
    PathBuf::from("saves")
}

fn default_assets_root() -> PathBuf {
    PathBuf::from("assets")
}

fn default_screen_width() -> u32 {
    DEFAULT_SCREEN_WIDTH
}

fn default_screen_height() -> u32 {
    DEFAULT_SCREEN_HEIGHT
}

fn default_resource_retry_ms() -> u64 {
    16
}

fn default_dead_zone() -> f32 {
    0.1
}

fn default_true() -> bool {
    true
}

//=== EngineConfig ========================================================

/// Runtime configuration for [`crate::Engine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Every level divisible by this is a checkpoint level.
    #[serde(default = "default_checkpoint_interval")]
    pub checkpoint_interval: u32,

    /// Mirror checkpoint saves to the cloud store.
    #[serde(default)]
    pub cloud_save_enabled: bool,

    /// Directory for the local progress store.
    #[serde(default = "default_saves_dir")]
    pub saves_dir: PathBuf,

    /// Root directory for [`crate::core::services::GameAssetManager`].
    #[serde(default = "default_assets_root")]
    pub assets_root: PathBuf,

    /// Optional JSON object of tuning parameters.
    #[serde(default)]
    pub tuning_file: Option<PathBuf>,

    #[serde(default = "default_screen_width")]
    pub initial_screen_width: u32,

    #[serde(default = "default_screen_height")]
    pub initial_screen_height: u32,

    /// Poll timeout while a window exists but the swapchain is not up yet.
    #[serde(default = "default_resource_retry_ms")]
    pub resource_retry_ms: u64,

    /// Joystick axis values with a smaller magnitude are reported as zero.
    #[serde(default = "default_dead_zone")]
    pub joystick_dead_zone: f32,

    /// Quit when the back key is not consumed by the current scene.
    #[serde(default = "default_true")]
    pub exit_on_unhandled_back: bool,

    #[serde(default)]
    pub memory_consumer: MemoryConsumerConfig,

    #[serde(default)]
    pub window: WindowConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            checkpoint_interval: default_checkpoint_interval(),
            cloud_save_enabled: false,
            saves_dir: default_saves_dir(),
            assets_root: default_assets_root(),
            tuning_file: None,
            initial_screen_width: default_screen_width(),
            initial_screen_height: default_screen_height(),
            resource_retry_ms: default_resource_retry_ms(),
            joystick_dead_zone: default_dead_zone(),
            exit_on_unhandled_back: true,
            memory_consumer: MemoryConsumerConfig::default(),
            window: WindowConfig::default(),
        }
    }
}

impl EngineConfig {
    //--- Loading ----------------------------------------------------------

    /// Loads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        info!(target: "engine", "Loaded config from {:?}", path);
        Ok(config)
    }

    /// Parses and validates a JSON config string.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.checkpoint_interval == 0 {
            return Err(ConfigError::Invalid(
                "checkpoint_interval must be positive".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.joystick_dead_zone) {
            return Err(ConfigError::Invalid(format!(
                "joystick_dead_zone must be in [0, 1), got {}",
                self.joystick_dead_zone
            )));
        }
        Ok(())
    }

    //--- Derived Values ---------------------------------------------------

    pub fn resource_retry_interval(&self) -> Duration {
        Duration::from_millis(self.resource_retry_ms)
    }
}

//=== MemoryConsumerConfig ================================================

/// Settings for the debug memory consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConsumerConfig {
    pub enabled: bool,
    pub block_size: usize,
    pub max_blocks: usize,
}

impl Default for MemoryConsumerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            block_size: 1024 * 1024,
            max_blocks: 64,
        }
    }
}

//=== WindowConfig ========================================================

/// Desktop host window settings. Ignored by embedders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Tunnel Engine".into(),
            width: 800,
            height: 600,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.checkpoint_interval, DEFAULT_CHECKPOINT_INTERVAL);
        assert!(!config.cloud_save_enabled);
    }

    #[test]
    fn partial_object_overrides_fields() {
        let config = EngineConfig::from_json_str(
            r#"{ "checkpoint_interval": 5, "cloud_save_enabled": true,
                 "memory_consumer": { "enabled": true } }"#,
        )
        .unwrap();

        assert_eq!(config.checkpoint_interval, 5);
        assert!(config.cloud_save_enabled);
        assert!(config.memory_consumer.enabled);
        assert_eq!(
            config.memory_consumer.max_blocks,
            MemoryConsumerConfig::default().max_blocks,
            "Unspecified nested fields keep their defaults"
        );
    }

    #[test]
    fn zero_checkpoint_interval_is_rejected() {
        let result = EngineConfig::from_json_str(r#"{ "checkpoint_interval": 0 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn dead_zone_out_of_range_is_rejected() {
        let result = EngineConfig::from_json_str(r#"{ "joystick_dead_zone": 1.5 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let result = EngineConfig::from_json_str("{ checkpoint_interval: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        fs::write(&path, r#"{ "resource_retry_ms": 40 }"#).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.resource_retry_interval(), Duration::from_millis(40));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = EngineConfig::load("/definitely/not/here.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
