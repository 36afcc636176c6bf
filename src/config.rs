use crate::constants::{
    DEFAULT_CONFIG_PATH, DEFAULT_DATABASE_PATH, DEFAULT_SOURCE_PATH, DEFAULT_TWO_DIGIT_YEAR_PIVOT,
    LIBSQL_STORE, MEMORY_STORE,
};
use crate::error::{IngestError, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Importer configuration, read from an optional TOML file.
///
/// ```toml
/// [source]
/// path = "food.csv"
///
/// [normalize]
/// two_digit_year_pivot = 50
///
/// [store]
/// backend = "libsql"
/// database_path = "pantry.db"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub normalize: NormalizeConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub path: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_SOURCE_PATH),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Two-digit years below this land in the 2000s, the rest in the 1900s
    pub two_digit_year_pivot: u32,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            two_digit_year_pivot: DEFAULT_TWO_DIGIT_YEAR_PIVOT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Libsql,
}

impl FromStr for StoreBackend {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            MEMORY_STORE => Ok(StoreBackend::Memory),
            LIBSQL_STORE => Ok(StoreBackend::Libsql),
            other => Err(IngestError::Config(format!(
                "Unknown store backend '{other}' (expected one of: {})",
                crate::constants::get_supported_stores().join(", ")
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Local database file, used when no remote URL is configured
    pub database_path: PathBuf,
    /// Remote libSQL URL; `LIBSQL_URL` takes precedence
    pub url: Option<String>,
    /// Remote auth token; `LIBSQL_AUTH_TOKEN` takes precedence
    pub auth_token: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            url: None,
            auth_token: None,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from `pantry.toml` when it exists.
    ///
    /// An explicitly requested file must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            IngestError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Remote database credentials come from the environment when present
    pub fn apply_env(&mut self) {
        if let Ok(url) = env::var("LIBSQL_URL") {
            if !url.trim().is_empty() {
                self.store.url = Some(url);
            }
        }
        if let Ok(token) = env::var("LIBSQL_AUTH_TOKEN") {
            if !token.trim().is_empty() {
                self.store.auth_token = Some(token);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.normalize.two_digit_year_pivot > 100 {
            return Err(IngestError::Config(format!(
                "two_digit_year_pivot must be between 0 and 100, got {}",
                self.normalize.two_digit_year_pivot
            )));
        }
        Ok(())
    }
}
