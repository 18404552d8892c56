//! Fallback Store Trait
//!
//! This module defines the `FallbackStore` trait, a key-value interface over
//! durable local storage. The feedback repository keeps its last known
//! snapshot here so that reads keep working when the remote service does not.
//!
//! Implementors only provide raw `read`/`write`/`remove` of JSON text; the typed
//! accessors for the snapshot, the session and the theme are provided methods.

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error_handling::types::StorageError;
use crate::feedback::types::FeedbackItem;
use crate::session_management::session::Session;
use crate::storage::types::{StoreKey, Theme};

fn decode<T: DeserializeOwned>(key: StoreKey, raw: Option<String>) -> Result<Option<T>, StorageError> {
    match raw {
        None => Ok(None),
        Some(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: key.as_str(),
                source,
            }),
    }
}

fn encode<T: Serialize + ?Sized>(key: StoreKey, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|source| StorageError::EncodeFailed {
        key: key.as_str(),
        source,
    })
}

/// The `FallbackStore` trait defines the interface for local persistence backends.
///
/// All methods return a `Result` to handle potential storage errors. A missing
/// key is not an error: `read` returns `Ok(None)` and `remove` succeeds.
pub trait FallbackStore: Send + Sync {
    /// Returns the raw JSON stored under `key`, if any.
    fn read(&self, key: StoreKey) -> Result<Option<String>, StorageError>;

    /// Replaces the value stored under `key`.
    fn write(&self, key: StoreKey, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: StoreKey) -> Result<(), StorageError>;

    /// Last persisted feedback snapshot; empty when nothing was stored yet.
    fn load_snapshot(&self) -> Result<Vec<FeedbackItem>, StorageError> {
        let items: Vec<FeedbackItem> =
            decode(StoreKey::Feedback, self.read(StoreKey::Feedback)?)?.unwrap_or_default();
        debug!("Loaded snapshot with {} item(s)", items.len());
        Ok(items)
    }

    /// Overwrites the persisted snapshot, preserving order.
    fn save_snapshot(&self, items: &[FeedbackItem]) -> Result<(), StorageError> {
        let text = encode(StoreKey::Feedback, items)?;
        self.write(StoreKey::Feedback, &text)?;
        debug!("Persisted snapshot with {} item(s)", items.len());
        Ok(())
    }

    fn load_session(&self) -> Result<Option<Session>, StorageError> {
        decode(StoreKey::Session, self.read(StoreKey::Session)?)
    }

    fn save_session(&self, session: &Session) -> Result<(), StorageError> {
        let text = encode(StoreKey::Session, session)?;
        self.write(StoreKey::Session, &text)
    }

    fn clear_session(&self) -> Result<(), StorageError> {
        self.remove(StoreKey::Session)
    }

    /// Stored theme, `Light` when unset.
    fn load_theme(&self) -> Result<Theme, StorageError> {
        Ok(decode(StoreKey::Theme, self.read(StoreKey::Theme)?)?.unwrap_or_default())
    }

    fn save_theme(&self, theme: Theme) -> Result<(), StorageError> {
        let text = encode(StoreKey::Theme, &theme)?;
        self.write(StoreKey::Theme, &text)
    }
}
