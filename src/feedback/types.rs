use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Raised when a CLI argument or stored string does not name a known variant.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} `{value}` (expected one of: {expected})")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

fn normalize(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace(['_', ' '], "-")
}

/// Category of a piece of feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackType {
    Bug,
    Feature,
    Improvement,
    Question,
    Other,
}

impl FeedbackType {
    pub const ALL: [FeedbackType; 5] = [
        FeedbackType::Bug,
        FeedbackType::Feature,
        FeedbackType::Improvement,
        FeedbackType::Question,
        FeedbackType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackType::Bug => "bug",
            FeedbackType::Feature => "feature",
            FeedbackType::Improvement => "improvement",
            FeedbackType::Question => "question",
            FeedbackType::Other => "other",
        }
    }
}

impl FromStr for FeedbackType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "bug" => Ok(FeedbackType::Bug),
            "feature" | "feature-request" => Ok(FeedbackType::Feature),
            "improvement" => Ok(FeedbackType::Improvement),
            "question" => Ok(FeedbackType::Question),
            "other" => Ok(FeedbackType::Other),
            _ => Err(ParseEnumError {
                kind: "feedback type",
                value: s.to_string(),
                expected: "bug, feature, improvement, question, other",
            }),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Urgent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "urgent" => Ok(Priority::Urgent),
            _ => Err(ParseEnumError {
                kind: "priority",
                value: s.to_string(),
                expected: "low, medium, high, urgent",
            }),
        }
    }
}

/// Processing state of a piece of feedback.
///
/// Variants are declared in their expected forward order, so `Ord` reflects
/// workflow progress. Backward moves are allowed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
    Closed,
}

impl FeedbackStatus {
    pub const ALL: [FeedbackStatus; 4] = [
        FeedbackStatus::Pending,
        FeedbackStatus::InProgress,
        FeedbackStatus::Resolved,
        FeedbackStatus::Closed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackStatus::Pending => "pending",
            FeedbackStatus::InProgress => "in-progress",
            FeedbackStatus::Resolved => "resolved",
            FeedbackStatus::Closed => "closed",
        }
    }

    /// `true` when moving from `self` to `next` goes backwards in the workflow.
    pub fn is_regression_to(self, next: FeedbackStatus) -> bool {
        next < self
    }
}

impl FromStr for FeedbackStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "pending" => Ok(FeedbackStatus::Pending),
            "in-progress" | "inprogress" => Ok(FeedbackStatus::InProgress),
            "resolved" => Ok(FeedbackStatus::Resolved),
            "closed" => Ok(FeedbackStatus::Closed),
            _ => Err(ParseEnumError {
                kind: "status",
                value: s.to_string(),
                expected: "pending, in-progress, resolved, closed",
            }),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(FeedbackType, Priority, FeedbackStatus);

/// The backend hands out numeric ids while locally generated ids are UUIDs;
/// both are kept as strings.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum WireId {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    Ok(match WireId::deserialize(deserializer)? {
        WireId::Text(s) => s,
        WireId::Signed(n) => n.to_string(),
        WireId::Unsigned(n) => n.to_string(),
    })
}

/// An explicit JSON `null` decodes like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// The backend stores the rating as a nullable integer. `null` and values that
/// do not fit a `u8` become 0, which record validation then rejects.
fn rating_from_nullable<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?
        .and_then(|n| u8::try_from(n).ok())
        .unwrap_or(0))
}

/// One stored piece of feedback, as exchanged with the remote service and
/// persisted in the fallback store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(rename = "name")]
    pub author_name: String,
    #[serde(rename = "email")]
    pub author_email: String,
    #[serde(rename = "type")]
    pub kind: FeedbackType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: Priority,
    pub title: String,
    pub description: String,
    #[serde(default, deserialize_with = "rating_from_nullable")]
    pub rating: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: FeedbackStatus,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
}

/// A feedback submission before it has an id, status or timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFeedback {
    #[serde(rename = "name")]
    pub author_name: String,
    #[serde(rename = "email")]
    pub author_email: String,
    #[serde(rename = "type")]
    pub kind: FeedbackType,
    #[serde(default)]
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub rating: u8,
}

impl NewFeedback {
    /// Builds the full record, trimming free-text fields.
    pub fn into_item(self, id: String, created_at: DateTime<Utc>) -> FeedbackItem {
        FeedbackItem {
            id,
            author_name: self.author_name.trim().to_string(),
            author_email: self.author_email.trim().to_string(),
            kind: self.kind,
            priority: self.priority,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            rating: self.rating,
            status: FeedbackStatus::Pending,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn decodes_backend_record_with_numeric_id() {
        let body = r#"{
            "id": 42,
            "name": "Jane Smith",
            "email": "jane.smith@example.com",
            "type": "feature",
            "priority": "medium",
            "title": "Add dark mode support",
            "description": "Nighttime usage",
            "rating": 4,
            "status": "in-progress",
            "date": "2024-09-22T14:15:00Z"
        }"#;
        let item: FeedbackItem = serde_json::from_str(body).unwrap();
        assert_eq!(item.id, "42");
        assert_eq!(item.kind, FeedbackType::Feature);
        assert_eq!(item.status, FeedbackStatus::InProgress);
        assert_eq!(
            item.created_at,
            Utc.with_ymd_and_hms(2024, 9, 22, 14, 15, 0).unwrap()
        );
    }

    #[test]
    fn missing_priority_and_status_take_defaults() {
        let body = r#"{"id":"a","name":"n","email":"e@x.io","type":"bug","title":"t",
            "description":"d","rating":2,"date":"2024-01-01T00:00:00Z"}"#;
        let item: FeedbackItem = serde_json::from_str(body).unwrap();
        assert_eq!(item.priority, Priority::Medium);
        assert_eq!(item.status, FeedbackStatus::Pending);
    }

    #[test]
    fn null_priority_and_status_take_defaults() {
        let body = r#"{"content":[{"id":7,"name":"n","email":"e@x.io","type":"bug","title":"t",
            "description":"d","rating":2,"priority":null,"status":null,
            "date":"2024-01-01T00:00:00Z"}],"totalPages":1,"totalElements":1}"#;
        let page: crate::gateway::types::RemotePage = serde_json::from_str(body).unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].priority, Priority::Medium);
        assert_eq!(page.content[0].status, FeedbackStatus::Pending);
    }

    #[test]
    fn unusable_rating_decodes_as_zero() {
        for rating in ["null", "300", "-1"] {
            let body = format!(
                r#"{{"id":"a","name":"n","email":"e@x.io","type":"bug","title":"t",
                "description":"d","rating":{rating},"date":"2024-01-01T00:00:00Z"}}"#
            );
            let item: FeedbackItem = serde_json::from_str(&body).unwrap();
            assert_eq!(item.rating, 0, "rating {rating}");
        }
    }

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&FeedbackStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
    }

    #[test]
    fn parses_loose_cli_spellings() {
        assert_eq!("In_Progress".parse::<FeedbackStatus>(), Ok(FeedbackStatus::InProgress));
        assert_eq!(" URGENT ".parse::<Priority>(), Ok(Priority::Urgent));
        assert_eq!("Feature Request".parse::<FeedbackType>(), Ok(FeedbackType::Feature));
        assert!("done".parse::<FeedbackStatus>().is_err());
    }

    #[test]
    fn regression_follows_declaration_order() {
        assert!(FeedbackStatus::Resolved.is_regression_to(FeedbackStatus::Pending));
        assert!(!FeedbackStatus::Pending.is_regression_to(FeedbackStatus::Closed));
        assert!(!FeedbackStatus::Closed.is_regression_to(FeedbackStatus::Closed));
    }
}
