use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, info};

use crate::error_handling::types::{AuthError, FieldIssue, StorageError};
use crate::feedback::validation::{check_email, validate_credentials, validate_signup};
use crate::gateway::remote_trait::AuthRemote;
use crate::gateway::types::{LoginRequest, SignupRequest};
use crate::session_management::session::{Session, UserProfile};
use crate::session_management::CredentialProvider;
use crate::storage::storage_trait::FallbackStore;

/// The structure related to session management
///
/// Owns the current `Session` exclusively. Other components see it only through
/// [`CredentialProvider`] or by cloning it out with [`SessionManager::current`].
///
/// # Lifecycle
///
/// - created empty with [`SessionManager::new`] or from the store with [`SessionManager::restore`]
/// - populated by [`SessionManager::login`] / [`SessionManager::signup`], and persisted
/// - destroyed by [`SessionManager::logout`], which also clears the store
pub struct SessionManager<S> {
    store: Arc<S>,
    current: RwLock<Option<Session>>,
}

impl<S: FallbackStore> SessionManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            current: RwLock::new(None),
        }
    }

    /// Picks up a session persisted by an earlier run, if any.
    pub fn restore(store: Arc<S>) -> Result<Self, StorageError> {
        let session = store.load_session()?;
        match &session {
            Some(s) => info!("Restored session for {}", s.user.email),
            None => debug!("No stored session"),
        }
        Ok(Self {
            store,
            current: RwLock::new(session),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn establish(&self, session: Session) -> Result<Session, AuthError> {
        self.store.save_session(&session)?;
        *self.write() = Some(session.clone());
        info!("Session established for {}", session.user.email);
        Ok(session)
    }

    pub async fn login<A: AuthRemote>(
        &self,
        auth: &A,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        validate_credentials(email, password).map_err(AuthError::ValidationFailed)?;
        let request = LoginRequest {
            email: email.trim(),
            password,
        };
        let session = auth.login(&request).await?.into_session()?;
        self.establish(session)
    }

    pub async fn signup<A: AuthRemote>(
        &self,
        auth: &A,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        validate_signup(name, email, password).map_err(AuthError::ValidationFailed)?;
        let request = SignupRequest {
            name: name.trim(),
            email: email.trim(),
            password,
        };
        let session = auth.signup(&request).await?.into_session()?;
        self.establish(session)
    }

    /// Forgets the session in memory and on disk. Logging out twice is fine.
    pub fn logout(&self) -> Result<(), StorageError> {
        let previous = self.write().take();
        self.store.clear_session()?;
        match previous {
            Some(s) => info!("Logged out {}", s.user.email),
            None => debug!("Logout without an active session"),
        }
        Ok(())
    }

    pub fn current(&self) -> Option<Session> {
        self.read().clone()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.read().as_ref().map(|s| s.user.clone())
    }

    /// Edits the local profile of the logged-in user.
    pub fn update_profile(
        &self,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<UserProfile, AuthError> {
        let mut issues = Vec::new();
        if let Some(name) = name {
            if name.trim().is_empty() {
                issues.push(FieldIssue::new("name", "is required"));
            }
        }
        if let Some(email) = email {
            check_email(&mut issues, email);
        }
        if !issues.is_empty() {
            return Err(AuthError::ValidationFailed(issues));
        }

        let mut guard = self.write();
        let session = guard.as_mut().ok_or(AuthError::NotAuthenticated)?;
        let mut updated = session.clone();
        if let Some(name) = name {
            updated.user.name = name.trim().to_string();
        }
        if let Some(email) = email {
            updated.user.email = email.trim().to_string();
        }
        self.store.save_session(&updated)?;
        *session = updated;
        Ok(session.user.clone())
    }
}

impl<S: FallbackStore> CredentialProvider for SessionManager<S> {
    fn bearer_token(&self) -> Option<String> {
        self.read()
            .as_ref()
            .filter(|s| s.is_authenticated())
            .map(|s| s.token.clone())
    }

    fn is_authenticated(&self) -> bool {
        self.read().as_ref().is_some_and(Session::is_authenticated)
    }
}
