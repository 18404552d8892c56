//! Feedback records.
//!
//! - `types`: the record, its draft form and the closed enumerations.
//! - `validation`: field checks applied before a draft or credential is sent.

pub mod types;
pub mod validation;

pub use types::{FeedbackItem, FeedbackStatus, FeedbackType, NewFeedback, ParseEnumError, Priority};
