use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Forecast feed configuration (JMA open data endpoints)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Base URL of the per-office forecast documents
    /// (`{base}/{office_code}.json`)
    pub base_url: String,
    /// Region-hierarchy document used by the navigation tree.
    /// The monitor-point identifiers must align with the office and
    /// sub-area codes this document defines.
    pub area_const_url: String,
    /// Per-request timeout in seconds; a timed-out fetch is treated
    /// as that area's failure, not a sync abort
    pub request_timeout_secs: u64,
    /// Upper bound on concurrent office fetches during a sync pass
    pub max_concurrent_fetches: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.jma.go.jp/bosai/forecast/data/forecast/".to_string(),
            area_const_url: "https://www.jma.go.jp/bosai/common/const/area.json".to_string(),
            request_timeout_secs: 10,
            max_concurrent_fetches: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Path of the SQLite database file
    pub db_path: PathBuf,

    /// Forecast feed settings
    #[serde(default)]
    pub forecast: ForecastConfig,
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tenki");

        let db_path = config_dir.join("weather_intelligence.db");

        Self {
            config_dir,
            db_path,
            forecast: ForecastConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load and validate; bails on validation errors, logs warnings
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        if !validation.warnings.is_empty() {
            for warning in &validation.warnings {
                tracing::warn!("Config warning: {}", warning);
            }
        }

        Ok((config, validation))
    }

    /// Validate configured values without touching the filesystem
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_url(&mut result, "forecast.base_url", &self.forecast.base_url);
        Self::validate_url(
            &mut result,
            "forecast.area_const_url",
            &self.forecast.area_const_url,
        );

        if self.forecast.request_timeout_secs == 0 {
            result.add_error("forecast.request_timeout_secs", "Timeout cannot be 0");
        }
        if self.forecast.max_concurrent_fetches == 0 {
            result.add_error("forecast.max_concurrent_fetches", "Must allow at least 1 fetch");
        }
        if self.db_path.as_os_str().is_empty() {
            result.add_error("db_path", "Database path cannot be empty");
        }
        if self.forecast.request_timeout_secs > 60 {
            result.add_warning(
                "forecast.request_timeout_secs",
                "Timeouts over 60s make a stuck feed block the sync pass for a long time",
            );
        }

        result
    }

    fn validate_url(result: &mut ValidationResult, field_name: &str, value: &str) {
        match Url::parse(value) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(field_name, "URL must be http or https");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("tenki");

        Ok(config_dir.join("config.toml"))
    }
}
