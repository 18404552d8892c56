use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::query::types::DEFAULT_PAGE_SIZE;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_SYNC_PAGE_SIZE: usize = 100;
pub const DEFAULT_STORAGE_DIR: &str = ".feedback-sync";

/// Application configuration.
///
/// Every field has a default, so an empty (or absent) TOML file is a valid
/// configuration. The file layout mirrors the struct:
///
/// ```toml
/// [api]
/// base_url = "https://feedback.example.com"
/// connect_timeout_secs = 5
/// request_timeout_secs = 15
/// sync_page_size = 100
///
/// [storage]
/// path = "/var/lib/feedback-sync"
///
/// [query]
/// default_page_size = 5
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub query: QueryConfig,
}

/// Where the remote service lives and how patient we are with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    /// Total time budget of a single request, body included.
    pub request_timeout_secs: u64,
    /// Page size used when pulling the full remote collection.
    pub sync_page_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            sync_page_size: DEFAULT_SYNC_PAGE_SIZE,
        }
    }
}

/// Directory holding the fallback store files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORAGE_DIR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryConfig {
    pub default_page_size: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
