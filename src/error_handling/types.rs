use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlError(String),
    #[error("Bad API URL: {0}")]
    BadUrl(String),
    #[error("Value out of range: {0}")]
    NotInRange(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage read failed for {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Storage write failed for {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Stored value for `{key}` is corrupt: {source}")]
    Corrupt {
        key: &'static str,
        source: serde_json::Error,
    },
    #[error("Unable to encode value for `{key}`: {source}")]
    EncodeFailed {
        key: &'static str,
        source: serde_json::Error,
    },
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Failures talking to the remote feedback service.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("Remote service unreachable: {0}")]
    NetworkUnreachable(String),
    /// The service answered with a non-2xx status.
    #[error("Remote service rejected the request (HTTP {status}): {body}")]
    RemoteRejected { status: u16, body: String },
    #[error("Unable to decode remote response: {0}")]
    Decode(String),
    #[error("Unable to build HTTP client: {0}")]
    ClientSetup(String),
}

impl GatewayError {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, GatewayError::NetworkUnreachable(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::RemoteRejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Page numbers start at 1")]
    ZeroPage,
    #[error("Page size must be at least 1")]
    ZeroPageSize,
}

/// A single rejected field of a feedback draft or credential form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub reason: String,
}

impl FieldIssue {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Feedback `{0}` not found")]
    NotFound(String),
    #[error("Validation failed: {}", join_issues(.0))]
    ValidationFailed(Vec<FieldIssue>),
    #[error("Invalid query: {0}")]
    InvalidQuery(#[from] QueryError),
    #[error("Local storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation failed: {}", join_issues(.0))]
    ValidationFailed(Vec<FieldIssue>),
    #[error("Authentication rejected (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("Authentication service unreachable: {0}")]
    Unreachable(String),
    #[error("Malformed authentication response: {0}")]
    Malformed(String),
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<GatewayError> for AuthError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::RemoteRejected { status, body } => AuthError::Rejected { status, body },
            GatewayError::NetworkUnreachable(e) | GatewayError::ClientSetup(e) => {
                AuthError::Unreachable(e)
            }
            GatewayError::Decode(e) => AuthError::Malformed(e),
        }
    }
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
    #[error("`{0}` requires a logged-in session")]
    LoginRequired(&'static str),
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),
}
