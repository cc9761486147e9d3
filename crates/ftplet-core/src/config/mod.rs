//! Configuration schemas.
//!
//! Configuration is deserialized from an optional TOML file overlaid with
//! `FTPLET__`-prefixed environment variables via the `config` crate. Each
//! sub-module represents one configuration section.

pub mod container;
pub mod logging;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use self::container::ContainerConfig;
use self::logging::LoggingConfig;

use crate::error::AppError;

pub use self::container::FaultPolicy;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FtpletConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Plugin container settings.
    #[serde(default)]
    pub container: ContainerConfig,
}

impl FtpletConfig {
    /// Load configuration from an optional TOML file and the environment.
    ///
    /// Environment variables use the `FTPLET` prefix and `__` as the
    /// section separator, e.g. `FTPLET__CONTAINER__FAULT_POLICY=fail_fast`.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        debug!(file = ?path, env_prefix = "FTPLET", "Loading configuration");

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("FTPLET")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        Self::deserialize_from(config)
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml_str(toml: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        Self::deserialize_from(config)
    }

    fn deserialize_from(config: config::Config) -> Result<Self, AppError> {
        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
