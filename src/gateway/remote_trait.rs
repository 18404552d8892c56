//! Remote service traits
//!
//! The repository and the session manager talk to the remote service only
//! through these traits, so tests and alternative transports can stand in for
//! the HTTP client.

use std::future::Future;

use crate::error_handling::types::GatewayError;
use crate::feedback::types::{FeedbackItem, FeedbackStatus};
use crate::gateway::types::{AuthResponse, LoginRequest, RemotePage, SignupRequest};
use crate::query::types::FeedbackQuery;

/// CRUD and search against the remote feedback collection.
pub trait FeedbackRemote: Send + Sync {
    /// Submits `item` (its id is not sent) and returns the record the server stored.
    fn create(
        &self,
        item: &FeedbackItem,
    ) -> impl Future<Output = Result<FeedbackItem, GatewayError>> + Send;

    /// Server-side filtered search; `query.page` is 1-based.
    fn search(
        &self,
        query: &FeedbackQuery,
    ) -> impl Future<Output = Result<RemotePage, GatewayError>> + Send;

    fn update_status(
        &self,
        id: &str,
        status: FeedbackStatus,
    ) -> impl Future<Output = Result<FeedbackItem, GatewayError>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), GatewayError>> + Send;
}

/// Credential issuance.
pub trait AuthRemote: Send + Sync {
    fn login(
        &self,
        request: &LoginRequest<'_>,
    ) -> impl Future<Output = Result<AuthResponse, GatewayError>> + Send;

    fn signup(
        &self,
        request: &SignupRequest<'_>,
    ) -> impl Future<Output = Result<AuthResponse, GatewayError>> + Send;
}
