// Required external crates for configuration management and serialization
use serde::Deserialize;
use std::path::{Path, PathBuf};
use config::{Config, ConfigError, Environment, File};

/// Configuration for the model registry client
#[derive(Debug, Deserialize, Clone)]
pub struct HubConfig {
    /// Base URL of the registry (no trailing slash needed)
    pub endpoint: String,
    /// Optional access token, falls back to HF_TOKEN when unset
    pub token: Option<String>,
    /// Initial result limit and "load more" increment
    pub page_size: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Configuration for the local model cache
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Overrides the hub cache root
    pub directory: Option<PathBuf>,
    /// Upper bound for waiting on the background scan
    pub wait_timeout_secs: u64,
}

/// Configuration for launching the analyzer from the navigator
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AnalyzerConfig {
    /// Explicit path to the analyzer binary
    pub executable: Option<PathBuf>,
}

/// Configuration for application logging
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    pub level: String,
    /// Optional log directory
    pub directory: Option<PathBuf>,
}

/// Main settings struct that contains all configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Registry-related settings
    pub hub: HubConfig,
    /// Local cache settings
    pub cache: CacheConfig,
    /// Analyzer launch settings
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    /// Logging-related settings
    pub logging: LoggingConfig,
}

impl Settings {
    /// Creates a new Settings instance by loading config from multiple sources
    /// in the following order of precedence (highest to lowest):
    /// 1. Environment variables prefixed with GGUFSCOUT_ (`__` between sections)
    /// 2. Local config file (config/local.toml) if present
    /// 3. Default config file (config/default.toml) if present
    /// 4. Built-in defaults
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = std::env::current_dir()
            .map_err(|e| ConfigError::Message(
                format!("Failed to get current directory: {}", e)
            ))?
            .join("config");

        Self::load_from(&config_dir)
    }

    /// Loads settings using `config_dir` as the location of the TOML files.
    /// Neither the directory nor the files have to exist.
    pub fn load_from(config_dir: &Path) -> Result<Self, ConfigError> {
        let default_config = config_dir.join("default.toml");
        let local_config = config_dir.join("local.toml");

        let mut settings = Config::builder()
            .set_default("hub.endpoint", "https://huggingface.co")?
            .set_default("hub.page_size", 10)?
            .set_default("hub.timeout_secs", 30)?
            .set_default("cache.wait_timeout_secs", 120)?
            .set_default("logging.level", "info")?
            .add_source(File::from(default_config).required(false))
            .add_source(File::from(local_config).required(false))
            .add_source(
                Environment::with_prefix("GGUFSCOUT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        if settings.hub.token.is_none() {
            settings.hub.token = std::env::var("HF_TOKEN").ok().filter(|t| !t.is_empty());
        }

        settings.validate()?;

        Ok(settings)
    }

    /// Directory the rolling log files are written to
    pub fn log_directory(&self) -> PathBuf {
        match &self.logging.directory {
            Some(dir) => dir.clone(),
            None => dirs::cache_dir()
                .map(|d| d.join("ggufscout").join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs")),
        }
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.hub.endpoint.starts_with("http://") || self.hub.endpoint.starts_with("https://")) {
            return Err(ConfigError::Message(
                format!("hub.endpoint must be an http(s) URL, got: {}", self.hub.endpoint)
            ));
        }

        if self.hub.page_size == 0 {
            return Err(ConfigError::Message(
                "hub.page_size must be greater than 0".to_string()
            ));
        }

        if self.hub.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "hub.timeout_secs must be greater than 0".to_string()
            ));
        }

        // Validate logging level
        match self.logging.level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => Ok(()),
            _ => Err(ConfigError::Message(
                format!("Invalid logging level: {}. Must be one of: error, warn, info, debug, trace",
                    self.logging.level)
            )),
        }?;

        Ok(())
    }
}
