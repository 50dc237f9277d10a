//! Configuration structures.

use edge_core::error::EngineError;
use edge_engine::EngineConfig;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl AppConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.logging.validate()?;
        self.engine.validate()
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "alpha-edge".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), EngineError> {
        match self.format.as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(EngineError::InvalidConfiguration(format!(
                "logging.format must be \"pretty\" or \"json\" (got \"{}\")",
                other
            ))),
        }
    }

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Bar loading settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DataSettings {
    /// Read naive CSV timestamps as exchange-local time instead of UTC
    #[serde(default)]
    pub local_timestamps: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let mut config = AppConfig::default();
        config.logging.format = "xml".to_string();
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_invalid_engine_section() {
        let mut config = AppConfig::default();
        config.engine.slow_length = config.engine.fast_length;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_to_toml_sections() {
        let rendered = AppConfig::default().to_toml().unwrap();
        assert!(rendered.contains("[app]"));
        assert!(rendered.contains("[engine]"));
        assert!(rendered.contains("orb_window = \"0930-0945\""));
        assert!(rendered.contains("ma_kind = \"ema\""));
    }
}
