//! Feedback repository: the remote service backed by a local fallback store.
//!
//! Components:
//! - `feedback_repository`: `FeedbackRepository`, the single source of truth for callers.
//! - `types`: outcome types telling callers where data came from and what reached the remote.

pub mod feedback_repository;
#[cfg(test)]
pub mod tests;
pub mod types;

pub use feedback_repository::FeedbackRepository;
pub use types::{
    DataSource, Listing, Removal, SaveOutcome, SearchOutcome, StatusChange, SyncState,
};
