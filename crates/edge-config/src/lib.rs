//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, DataSettings, LoggingConfig};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Prefix for environment overrides, e.g. `EDGE__ENGINE__FAST_LENGTH=5`.
pub const ENV_PREFIX: &str = "EDGE";

/// Load configuration from an optional file and the environment.
///
/// Missing keys fall back to defaults, so an empty file (or none at all)
/// yields `AppConfig::default()` plus any environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_with_prefix(path, ENV_PREFIX)
}

fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(env_prefix)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
