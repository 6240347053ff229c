//! Engine configuration persistence
//!
//! The config types live in wakmeter-types; this module loads and stores
//! them with confy under the `wakmeter` application name.

use std::path::PathBuf;

pub use wakmeter_types::{AttributionConfig, EngineConfig, ReaderConfig};

use super::error::ConfigError;

const APP_NAME: &str = "wakmeter";
const CONFIG_NAME: &str = "config";

/// Extension trait for EngineConfig persistence
pub trait EngineConfigExt: Sized {
    fn load() -> Self;
    fn try_load() -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn config_path() -> Result<PathBuf, ConfigError>;
}

impl EngineConfigExt for EngineConfig {
    /// Load the stored config, falling back to defaults on any error.
    fn load() -> Self {
        Self::try_load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Using default engine configuration");
            Self::default()
        })
    }

    fn try_load() -> Result<Self, ConfigError> {
        Ok(confy::load(APP_NAME, CONFIG_NAME)?)
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self.clone()).map_err(ConfigError::Save)
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).map_err(ConfigError::Locate)
    }
}
