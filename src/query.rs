//! Search, filtering, ordering and pagination of feedback collections.
//!
//! - `types`: `FeedbackQuery`, `Filter`, `SortKey` and the `Page` result.
//! - `pipeline`: the pure filter → sort → paginate function.

pub mod pipeline;
pub mod types;

pub use pipeline::run;
pub use types::{FeedbackQuery, Filter, Page, SortKey};
