use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use log::{debug, error, info};

use super::types::Config;
use crate::error_handling::types::ConfigError;

pub const API_URL_ENV: &str = "FEEDBACK_API_URL";
pub const STORAGE_DIR_ENV: &str = "FEEDBACK_STORAGE_DIR";

/// Values that take precedence over the configuration file.
///
/// Each one can be given on the command line or through its environment
/// variable; the command line wins when both are present.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    /// Base URL of the feedback service
    ///
    /// # Command Line
    /// Use `--api-url <URL>` or the `FEEDBACK_API_URL` environment variable
    #[arg(long, global = true, env = API_URL_ENV)]
    pub api_url: Option<String>,

    /// Directory of the local fallback store
    ///
    /// # Command Line
    /// Use `--storage-path <PATH>` or the `FEEDBACK_STORAGE_DIR` environment variable
    #[arg(long, global = true, env = STORAGE_DIR_ENV)]
    pub storage_path: Option<PathBuf>,
}

impl Config {
    /// Parses a TOML document. Missing sections and fields fall back to their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlError(e.to_string()))
    }

    /// Reads and parses a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!("Reading configuration from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            error!("Cannot read configuration file {}: {}", path.display(), e);
            ConfigError::IoError(e)
        })?;
        Self::from_toml(&content)
    }

    /// Builds the effective configuration: file (or defaults), then overrides, then validation.
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                debug!("No configuration file given, using defaults");
                Self::default()
            }
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(url) = &overrides.api_url {
            debug!("Overriding api.base_url with {}", url);
            self.api.base_url = url.clone();
        }
        if let Some(path) = &overrides.storage_path {
            debug!("Overriding storage.path with {}", path.display());
            self.storage.path = path.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.api.base_url)
            .map_err(|e| ConfigError::BadUrl(format!("{}: {}", self.api.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::BadUrl(format!(
                "{}: scheme must be http or https",
                self.api.base_url
            )));
        }

        let non_zero = [
            ("api.connect_timeout_secs", self.api.connect_timeout_secs as usize),
            ("api.request_timeout_secs", self.api.request_timeout_secs as usize),
            ("api.sync_page_size", self.api.sync_page_size),
            ("query.default_page_size", self.query.default_page_size),
        ];
        for (name, value) in non_zero {
            if value == 0 {
                return Err(ConfigError::NotInRange(format!("{name} must be greater than 0")));
            }
        }
        Ok(())
    }
}
