// Bindings engine configuration

use super::InputError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for the bindings engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingsConfig {
    /// Path handed to the binding store
    pub bindings_file: PathBuf,

    /// Stick and trigger magnitudes below this read as resting
    pub controller_deadzone: f32,

    /// Minimum trigger travel that counts as a rebind gesture
    pub detection_axis_threshold: f32,

    /// Whether detection ignores the OS meta keys
    pub reserve_meta_keys: bool,

    /// Maximum buffered device events per frame
    pub event_queue_capacity: usize,

    /// Write bindings through the store when the manager is dropped
    pub save_on_drop: bool,
}

impl Default for BindingsConfig {
    fn default() -> Self {
        Self {
            bindings_file: PathBuf::from("input_bindings.toml"),
            controller_deadzone: 0.05,
            detection_axis_threshold: 0.5,
            reserve_meta_keys: !cfg!(target_os = "macos"),
            event_queue_capacity: 256,
            save_on_drop: false,
        }
    }
}

impl BindingsConfig {
    /// Parse and validate; missing fields take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| InputError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.controller_deadzone) {
            return Err(InputError::Config(format!(
                "controller_deadzone must be in [0, 1), got {}",
                self.controller_deadzone
            ))
            .into());
        }
        if self.event_queue_capacity == 0 {
            return Err(InputError::Config("event_queue_capacity must be positive".to_string()).into());
        }
        Ok(())
    }
}
