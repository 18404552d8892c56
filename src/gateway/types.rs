use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error_handling::types::AuthError;
use crate::feedback::types::{FeedbackItem, FeedbackStatus, FeedbackType, Priority};
use crate::query::types::{FeedbackQuery, Page};
use crate::session_management::session::{Session, UserProfile};

/// Body of `POST /api/feedback`: the record without its id.
#[derive(Debug, Serialize)]
pub struct CreateFeedbackRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    #[serde(rename = "type")]
    pub kind: FeedbackType,
    pub priority: Priority,
    pub title: &'a str,
    pub description: &'a str,
    pub rating: u8,
    pub status: FeedbackStatus,
    pub date: DateTime<Utc>,
}

impl<'a> From<&'a FeedbackItem> for CreateFeedbackRequest<'a> {
    fn from(item: &'a FeedbackItem) -> Self {
        Self {
            name: &item.author_name,
            email: &item.author_email,
            kind: item.kind,
            priority: item.priority,
            title: &item.title,
            description: &item.description,
            rating: item.rating,
            status: item.status,
            date: item.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateRequest {
    pub status: FeedbackStatus,
}

/// One page of `GET /api/feedback`. The server counts pages from 0.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePage {
    #[serde(default)]
    pub content: Vec<FeedbackItem>,
    #[serde(default)]
    pub total_pages: usize,
    #[serde(default)]
    pub total_elements: usize,
}

impl RemotePage {
    /// Re-labels the page with the caller's 1-based window.
    pub fn into_page(self, query: &FeedbackQuery) -> Page<FeedbackItem> {
        Page {
            content: self.content,
            page: query.page,
            page_size: query.page_size,
            total_pages: self.total_pages,
            total_elements: self.total_elements,
        }
    }
}

/// Query string for the search endpoint. Empty text and `all` filters are
/// left out; the page is shifted to the server's 0-based numbering.
pub fn search_params(query: &FeedbackQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(6);
    let text = query.trimmed_text();
    if !text.is_empty() {
        params.push(("q", text.to_string()));
    }
    if let Some(status) = query.status.selected() {
        params.push(("status", status.as_str().to_string()));
    }
    if let Some(kind) = query.kind.selected() {
        params.push(("type", kind.as_str().to_string()));
    }
    params.push(("page", query.page.saturating_sub(1).to_string()));
    params.push(("size", query.page_size.to_string()));
    params.push(("sortBy", query.sort.as_str().to_string()));
    params
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SignupRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// `{user, token}`. Some deployments flatten the profile into the top level,
/// so `name`/`email` are accepted there too.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl AuthResponse {
    pub fn into_session(self) -> Result<Session, AuthError> {
        if self.token.trim().is_empty() {
            return Err(AuthError::Malformed("response carries no token".into()));
        }
        let user = match (self.user, self.name, self.email) {
            (Some(user), _, _) => user,
            (None, name, Some(email)) => UserProfile {
                name: name.unwrap_or_default(),
                email,
            },
            (None, _, None) => {
                return Err(AuthError::Malformed("response carries no user".into()))
            }
        };
        Ok(Session {
            user,
            token: self.token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::types::SortKey;

    #[test]
    fn params_skip_empty_filters_and_shift_page() {
        let q = FeedbackQuery::default().page(3, 5);
        let params = search_params(&q);
        assert_eq!(
            params,
            vec![
                ("page", "2".to_string()),
                ("size", "5".to_string()),
                ("sortBy", "date".to_string()),
            ]
        );
    }

    #[test]
    fn params_carry_selected_filters() {
        let q = FeedbackQuery::default()
            .with_text("  slow ")
            .with_status(FeedbackStatus::InProgress)
            .with_kind(FeedbackType::Bug)
            .sorted_by(SortKey::Title);
        let params = search_params(&q);
        assert!(params.contains(&("q", "slow".to_string())));
        assert!(params.contains(&("status", "in-progress".to_string())));
        assert!(params.contains(&("type", "bug".to_string())));
        assert!(params.contains(&("sortBy", "title".to_string())));
    }

    #[test]
    fn remote_page_decodes_spring_shape() {
        let body = r#"{"content":[],"totalPages":3,"totalElements":11,"number":0,"size":5}"#;
        let page: RemotePage = serde_json::from_str(body).unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_elements, 11);
    }

    #[test]
    fn auth_response_with_nested_user() {
        let body = r#"{"user":{"id":7,"name":"Ann","email":"ann@example.com"},"token":"t0k"}"#;
        let session = serde_json::from_str::<AuthResponse>(body)
            .unwrap()
            .into_session()
            .unwrap();
        assert_eq!(session.user.name, "Ann");
        assert_eq!(session.token, "t0k");
    }

    #[test]
    fn auth_response_with_flat_user() {
        let body = r#"{"name":"Ann","email":"ann@example.com","token":"t0k"}"#;
        let session = serde_json::from_str::<AuthResponse>(body)
            .unwrap()
            .into_session()
            .unwrap();
        assert_eq!(session.user.email, "ann@example.com");
    }

    #[test]
    fn auth_response_without_token_is_malformed() {
        let body = r#"{"user":{"name":"Ann","email":"ann@example.com"}}"#;
        let err = serde_json::from_str::<AuthResponse>(body)
            .unwrap()
            .into_session()
            .unwrap_err();
        assert!(matches!(err, AuthError::Malformed(_)));
    }
}
