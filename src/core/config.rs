//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.sms-composer/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ComposerConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub max_characters: Option<usize>,
    pub unit_price: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CatalogConfig {
    pub file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_MAX_CHARACTERS: usize = 160;
pub const DEFAULT_UNIT_PRICE: f64 = 0.05;
pub const DEFAULT_LOG_LEVEL: &str = "debug";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub max_characters: usize,
    pub unit_price: f64,
    /// JSON catalog file; `None` means the built-in catalog.
    pub catalog_file: Option<PathBuf>,
    pub log_level: log::LevelFilter,
}

/// Values given on the command line (None = flag not passed).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub catalog: Option<PathBuf>,
    pub unit_price: Option<f64>,
    pub max_characters: Option<usize>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.sms-composer/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".sms-composer"))
}

/// Returns the path to `~/.sms-composer/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.sms-composer/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ComposerConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ComposerConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ComposerConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ComposerConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config = parse_config(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<ComposerConfig, ConfigError> {
    toml::from_str(contents).map_err(ConfigError::Parse)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# SMS Composer Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# max_characters = 160               # SMS character limit
# unit_price = 0.05                  # Estimated cost per recipient

# [catalog]
# file = "catalog.json"              # Contacts, lists and products (JSON). Relative to ~/.sms-composer/

# [logging]
# level = "debug"                    # "error", "warn", "info", "debug", "trace", "off"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ComposerConfig, cli: &CliOverrides) -> ResolvedConfig {
    let max_characters = cli
        .max_characters
        .or_else(|| env_parse("SMS_COMPOSER_MAX_CHARACTERS"))
        .or(config.general.max_characters)
        .unwrap_or(DEFAULT_MAX_CHARACTERS);

    let unit_price = cli
        .unit_price
        .or_else(|| env_parse("SMS_COMPOSER_UNIT_PRICE"))
        .or(config.general.unit_price)
        .unwrap_or(DEFAULT_UNIT_PRICE);
    let unit_price = if unit_price.is_finite() && unit_price >= 0.0 {
        unit_price
    } else {
        warn!("Invalid unit price {}, using {}", unit_price, DEFAULT_UNIT_PRICE);
        DEFAULT_UNIT_PRICE
    };

    // Catalog: CLI path is taken as given; config paths are relative to the config dir
    let catalog_file = cli
        .catalog
        .clone()
        .or_else(|| std::env::var("SMS_COMPOSER_CATALOG").ok().map(PathBuf::from))
        .or_else(|| config.catalog.file.as_deref().map(resolve_config_relative));

    let level_name = std::env::var("SMS_COMPOSER_LOG_LEVEL")
        .ok()
        .or_else(|| config.logging.level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let log_level = level_name.parse().unwrap_or_else(|_| {
        warn!("Unknown log level '{}', using {}", level_name, DEFAULT_LOG_LEVEL);
        log::LevelFilter::Debug
    });

    ResolvedConfig {
        max_characters,
        unit_price,
        catalog_file,
        log_level,
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}: cannot parse '{}'", key, raw);
            None
        }
    }
}

fn resolve_config_relative(file: &str) -> PathBuf {
    let path = PathBuf::from(file);
    if path.is_absolute() {
        return path;
    }
    match config_dir() {
        Some(dir) => dir.join(path),
        None => path,
    }
}
