//! HTTP implementation of the remote traits.
//!
//! `HttpGateway` is a thin wrapper: it builds requests, attaches the bearer
//! token when one is available, and turns every non-2xx answer into
//! [`GatewayError::RemoteRejected`] carrying the response body. It makes no
//! fallback decisions; those belong to the repository.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::configuration::types::ApiConfig;
use crate::error_handling::types::GatewayError;
use crate::feedback::types::{FeedbackItem, FeedbackStatus};
use crate::gateway::remote_trait::{AuthRemote, FeedbackRemote};
use crate::gateway::types::{
    search_params, AuthResponse, CreateFeedbackRequest, LoginRequest, RemotePage, SignupRequest,
    StatusUpdateRequest,
};
use crate::query::types::FeedbackQuery;
use crate::session_management::CredentialProvider;

/// Upper bound on any response body we are willing to buffer.
const MAX_RESPONSE_BYTES: usize = 8 * 1024 * 1024;

pub struct HttpGateway {
    http: Client,
    base_url: Url,
    credentials: Option<Arc<dyn CredentialProvider>>,
}

impl HttpGateway {
    pub fn new(config: &ApiConfig) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("feedback-sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::ClientSetup(e.to_string()))?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| GatewayError::ClientSetup(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::ClientSetup(format!(
                "{} cannot be a base URL",
                config.base_url
            )));
        }
        debug!("HTTP gateway targeting {}", base_url);
        Ok(Self {
            http,
            base_url,
            credentials: None,
        })
    }

    /// Attaches `Authorization: Bearer` from `provider` to every request.
    pub fn with_credentials(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(provider);
        self
    }

    /// Appends `segments` to the base path. Each segment is percent-encoded,
    /// so an id can never add path components of its own.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::ClientSetup(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.as_ref().and_then(|c| c.bearer_token()) {
            Some(token) => request.bearer_auth(token.trim()),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, GatewayError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| GatewayError::NetworkUnreachable(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = read_body(response).await.unwrap_or_default();
        warn!("Remote rejected request with HTTP {}: {}", status.as_u16(), body);
        Err(GatewayError::RemoteRejected {
            status: status.as_u16(),
            body,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let response = self.send(request).await?;
        let body = read_body(response).await?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Decode(format!("{e}: {body}")))
    }
}

async fn read_body(response: Response) -> Result<String, GatewayError> {
    if let Some(length) = response.content_length() {
        if length > MAX_RESPONSE_BYTES as u64 {
            return Err(GatewayError::Decode(format!(
                "Response too large: {length} bytes"
            )));
        }
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| GatewayError::NetworkUnreachable(e.to_string()))?;
    if bytes.len() > MAX_RESPONSE_BYTES {
        return Err(GatewayError::Decode(format!(
            "Response exceeded {MAX_RESPONSE_BYTES} bytes"
        )));
    }
    String::from_utf8(bytes.to_vec()).map_err(|e| GatewayError::Decode(e.to_string()))
}

impl FeedbackRemote for HttpGateway {
    async fn create(&self, item: &FeedbackItem) -> Result<FeedbackItem, GatewayError> {
        let body = CreateFeedbackRequest::from(item);
        let request = self.http.post(self.endpoint(&["api", "feedback"])?).json(&body);
        let created: FeedbackItem = self.send_json(request).await?;
        debug!("Remote created feedback {}", created.id);
        Ok(created)
    }

    async fn search(&self, query: &FeedbackQuery) -> Result<RemotePage, GatewayError> {
        let request = self
            .http
            .get(self.endpoint(&["api", "feedback"])?)
            .query(&search_params(query));
        let page: RemotePage = self.send_json(request).await?;
        debug!(
            "Remote search returned {} item(s) of {}",
            page.content.len(),
            page.total_elements
        );
        Ok(page)
    }

    async fn update_status(
        &self,
        id: &str,
        status: FeedbackStatus,
    ) -> Result<FeedbackItem, GatewayError> {
        let request = self
            .http
            .patch(self.endpoint(&["api", "feedback", id, "status"])?)
            .json(&StatusUpdateRequest { status });
        self.send_json(request).await
    }

    async fn delete(&self, id: &str) -> Result<(), GatewayError> {
        let request = self.http.delete(self.endpoint(&["api", "feedback", id])?);
        self.send(request).await?;
        debug!("Remote deleted feedback {}", id);
        Ok(())
    }
}

impl AuthRemote for HttpGateway {
    async fn login(&self, request: &LoginRequest<'_>) -> Result<AuthResponse, GatewayError> {
        let request = self.http.post(self.endpoint(&["api", "auth", "login"])?).json(request);
        self.send_json(request).await
    }

    async fn signup(&self, request: &SignupRequest<'_>) -> Result<AuthResponse, GatewayError> {
        let request = self.http.post(self.endpoint(&["api", "auth", "signup"])?).json(request);
        self.send_json(request).await
    }
}
