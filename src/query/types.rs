use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error_handling::types::QueryError;
use crate::feedback::types::{FeedbackStatus, FeedbackType, ParseEnumError};

pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Either every value passes, or only one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq + Copy> Filter<T> {
    pub fn matches(&self, value: T) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(wanted) => *wanted == value,
        }
    }

    pub fn selected(&self) -> Option<T> {
        match self {
            Filter::All => None,
            Filter::Only(v) => Some(*v),
        }
    }
}

impl<T> FromStr for Filter<T>
where
    T: FromStr<Err = ParseEnumError>,
{
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") || s.trim().is_empty() {
            Ok(Filter::All)
        } else {
            s.parse().map(Filter::Only)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Most recent first.
    #[default]
    Date,
    /// Highest rating first.
    Rating,
    /// Ascending, case-sensitive.
    Title,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Rating => "rating",
            SortKey::Title => "title",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "rating" => Ok(SortKey::Rating),
            "title" => Ok(SortKey::Title),
            _ => Err(ParseEnumError {
                kind: "sort key",
                value: s.to_string(),
                expected: "date, rating, title",
            }),
        }
    }
}

/// What to show: filters, ordering and the 1-based page window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackQuery {
    pub text: String,
    pub status: Filter<FeedbackStatus>,
    pub kind: Filter<FeedbackType>,
    pub sort: SortKey,
    pub page: usize,
    pub page_size: usize,
}

impl Default for FeedbackQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            status: Filter::All,
            kind: Filter::All,
            sort: SortKey::Date,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FeedbackQuery {
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.page == 0 {
            return Err(QueryError::ZeroPage);
        }
        if self.page_size == 0 {
            return Err(QueryError::ZeroPageSize);
        }
        Ok(())
    }

    /// The search text with surrounding whitespace removed.
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }

    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_status(mut self, status: FeedbackStatus) -> Self {
        self.status = Filter::Only(status);
        self
    }

    pub fn with_kind(mut self, kind: FeedbackType) -> Self {
        self.kind = Filter::Only(kind);
        self
    }

    pub fn sorted_by(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }
}

/// One window of a filtered, sorted collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_elements: usize,
}

impl<T> Page<T> {
    pub fn empty(page: usize, page_size: usize) -> Self {
        Self {
            content: Vec::new(),
            page,
            page_size,
            total_pages: 0,
            total_elements: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}
