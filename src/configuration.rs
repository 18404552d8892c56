//! Runtime configuration.
//!
//! Components:
//! - `types`: the `Config` tree and its defaults.
//! - `config`: loading from TOML, command-line/environment overrides and validation.

pub mod config;
pub mod types;

pub use config::Overrides;
pub use types::{ApiConfig, Config, QueryConfig, StorageConfig};
