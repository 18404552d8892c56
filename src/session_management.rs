//! Session management core module.
//!
//! This module provides the session type, the manager that owns its lifecycle,
//! and the `CredentialProvider` seam through which the gateway reads the token.

/// Submodule for session data structures.
pub mod session;
/// Submodule for session manager implementation.
pub mod session_manager;

pub use session::{Session, UserProfile};
pub use session_manager::SessionManager;

/// Read-only view of the current credential.
///
/// The gateway attaches `bearer_token` to outgoing requests; front ends gate
/// protected operations on `is_authenticated`.
pub trait CredentialProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
    fn is_authenticated(&self) -> bool;
}
