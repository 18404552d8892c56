//! Local persistence subsystem
//!
//! This module provides the fallback store that keeps the feedback snapshot,
//! the session and UI preferences on the local machine.
//!
//! Components:
//! - `storage_trait`: the `FallbackStore` trait defining a uniform key-value API.
//! - `types`: store keys and the theme preference.
//! - `file_storage`: directory-of-JSON-files implementation, written atomically.
//! - `memory_storage`: in-process implementation for ephemeral use and tests.

pub mod file_storage;
pub mod memory_storage;
pub mod storage_trait;
pub mod types;

pub use file_storage::FileStore;
pub use memory_storage::MemoryStore;
pub use storage_trait::FallbackStore;
pub use types::{StoreKey, Theme};
