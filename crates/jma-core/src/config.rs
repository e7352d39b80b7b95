use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const APP_DIR_NAME: &str = "jma-weather";
const CONFIG_FILE_NAME: &str = "config.toml";

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
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Forecast endpoint settings
    #[serde(default)]
    pub forecast: ForecastConfig,

    /// Where the area catalog comes from
    #[serde(default)]
    pub areas: AreaConfig,

    /// Local forecast database
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Forecast documents are fetched from `<base_url><area_code>.json`
    #[serde(default = "default_forecast_base_url")]
    pub base_url: String,

    /// Request timeout in seconds; 0 disables the timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_forecast_base_url() -> String {
    "https://www.jma.go.jp/bosai/forecast/data/forecast/".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_url: default_forecast_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Area catalog source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AreaSourceKind {
    /// Document compiled into the binary
    #[default]
    Bundled,
    /// `area.json` downloaded from `remote_url`
    Remote,
    /// Document read from `file_path`
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaConfig {
    #[serde(default)]
    pub source: AreaSourceKind,

    #[serde(default = "default_area_url")]
    pub remote_url: String,

    /// Required when `source = "file"`
    #[serde(default)]
    pub file_path: Option<String>,
}

fn default_area_url() -> String {
    "https://www.jma.go.jp/bosai/common/const/area.json".to_string()
}

impl Default for AreaConfig {
    fn default() -> Self {
        Self {
            source: AreaSourceKind::Bundled,
            remote_url: default_area_url(),
            file_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Persist every fetched forecast
    #[serde(default = "default_storage_enabled")]
    pub enabled: bool,

    /// SQLite file; relative paths resolve against the config directory
    #[serde(default = "default_database_file")]
    pub database_file: String,
}

fn default_storage_enabled() -> bool {
    true
}

fn default_database_file() -> String {
    "weather_forecast.db".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: default_storage_enabled(),
            database_file: default_database_file(),
        }
    }
}

impl StorageConfig {
    /// Absolute location of the database file.
    pub fn database_path(&self, config_dir: &Path) -> PathBuf {
        let file = PathBuf::from(&self.database_file);
        if file.is_absolute() {
            file
        } else {
            config_dir.join(file)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME);

        Self {
            config_dir,
            forecast: ForecastConfig::default(),
            areas: AreaConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file, creating a default one if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let mut config = Self::default();
            if let Some(parent) = config_path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(config_path)?;
            tracing::info!("Created default config at {}", config_path.display());
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated(config_path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match config_path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.forecast.base_url, "forecast.base_url", &mut result);

        if self.forecast.timeout_secs == 0 {
            result.add_warning(
                "forecast.timeout_secs",
                "Timeout disabled (0 seconds); a stalled request will never fail",
            );
        }

        match self.areas.source {
            AreaSourceKind::Bundled => {}
            AreaSourceKind::Remote => {
                self.validate_url(&self.areas.remote_url, "areas.remote_url", &mut result);
            }
            AreaSourceKind::File => match self.areas.file_path.as_deref() {
                None | Some("") => {
                    result.add_error("areas.file_path", "Required when areas.source is \"file\"");
                }
                Some(path) if !Path::new(path).exists() => {
                    result.add_warning("areas.file_path", format!("Path does not exist: {}", path));
                }
                Some(_) => {}
            },
        }

        if self.storage.database_file.trim().is_empty() {
            result.add_error("storage.database_file", "Database file name is empty");
        }
        if !self.storage.enabled {
            result.add_warning("storage", "Storage disabled - forecasts will not be saved");
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Database location for this configuration
    pub fn database_path(&self) -> PathBuf {
        self.storage.database_path(&self.config_dir)
    }

    /// Save configuration to an explicit file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join(APP_DIR_NAME);

        Ok(config_dir.join(CONFIG_FILE_NAME))
    }
}
