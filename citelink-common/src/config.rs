//! Configuration loading and resolution
//!
//! Each setting resolves in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::favicon::DEFAULT_FAVICON_SERVICE;
use crate::{Error, Result};

pub const ENV_CONFIG: &str = "CITELINK_CONFIG";
pub const ENV_DATA_FILE: &str = "CITELINK_DATA_FILE";
pub const ENV_HOST: &str = "CITELINK_HOST";
pub const ENV_PORT: &str = "CITELINK_PORT";
pub const ENV_FAVICON_SERVICE: &str = "CITELINK_FAVICON_SERVICE";

pub const DEFAULT_DATA_FILE: &str = "data/mock.json";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TomlConfig {
    pub data_file: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub favicon_service: Option<String>,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// Parse TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }

    /// Read and parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub data_file: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub favicon_service: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub data_file: PathBuf,
    pub host: String,
    pub port: u16,
    pub favicon_service: String,
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            favicon_service: DEFAULT_FAVICON_SERVICE.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Resolve configuration from CLI, environment, TOML file and defaults
    ///
    /// An explicitly named config file (CLI or `CITELINK_CONFIG`) must be
    /// readable. The per-user default location is optional. Nothing is
    /// logged here since this runs before the subscriber exists; callers
    /// report the returned [`ConfigSource`] once logging is up.
    pub fn resolve(cli: &CliOverrides) -> Result<(Self, ConfigSource)> {
        let (toml, source) = load_toml_config(cli.config.as_deref())?;
        Ok((Self::resolve_with(cli, &toml)?, source))
    }

    /// Resolve against an already loaded TOML config
    pub fn resolve_with(cli: &CliOverrides, toml: &TomlConfig) -> Result<Self> {
        let defaults = Self::default();

        let data_file = cli
            .data_file
            .clone()
            .or_else(|| env_var(ENV_DATA_FILE).map(PathBuf::from))
            .or_else(|| toml.data_file.clone())
            .unwrap_or(defaults.data_file);

        let host = cli
            .host
            .clone()
            .or_else(|| env_var(ENV_HOST))
            .or_else(|| toml.host.clone())
            .unwrap_or(defaults.host);

        let port = match cli.port {
            Some(port) => port,
            None => match env_var(ENV_PORT) {
                Some(raw) => raw.parse::<u16>().map_err(|_| {
                    Error::Config(format!("{} is not a valid port: {}", ENV_PORT, raw))
                })?,
                None => toml.port.unwrap_or(defaults.port),
            },
        };

        let favicon_service = cli
            .favicon_service
            .clone()
            .or_else(|| env_var(ENV_FAVICON_SERVICE))
            .or_else(|| toml.favicon_service.clone())
            .unwrap_or(defaults.favicon_service);

        let log_level = toml.log_level.clone().unwrap_or(defaults.log_level);

        Ok(Self {
            data_file,
            host,
            port,
            favicon_service,
            log_level,
        })
    }

    /// `host:port` for binding the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Where the TOML layer of the configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` on the command line
    Cli(PathBuf),
    /// `CITELINK_CONFIG`
    Env(PathBuf),
    /// Per-user default location
    UserDefault(PathBuf),
    /// No config file; compiled defaults apply
    Defaults,
}

impl ConfigSource {
    /// Emit the config source to the active subscriber
    pub fn log(&self) {
        match self {
            ConfigSource::Cli(path) | ConfigSource::UserDefault(path) => {
                info!("Loaded config file {}", path.display());
            }
            ConfigSource::Env(path) => {
                info!("Loaded config file {} (from {})", path.display(), ENV_CONFIG);
            }
            ConfigSource::Defaults => warn!("No config file found, using defaults"),
        }
    }
}

/// Load the TOML config, falling back to an empty config when the default
/// file does not exist
fn load_toml_config(explicit: Option<&Path>) -> Result<(TomlConfig, ConfigSource)> {
    if let Some(path) = explicit {
        let toml = TomlConfig::from_file(path)?;
        return Ok((toml, ConfigSource::Cli(path.to_path_buf())));
    }

    if let Some(path) = env_var(ENV_CONFIG).map(PathBuf::from) {
        let toml = TomlConfig::from_file(&path)?;
        return Ok((toml, ConfigSource::Env(path)));
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            let toml = TomlConfig::from_file(&path)?;
            Ok((toml, ConfigSource::UserDefault(path)))
        }
        _ => Ok((TomlConfig::default(), ConfigSource::Defaults)),
    }
}

/// Get default configuration file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("citelink").join("config.toml"))
}
