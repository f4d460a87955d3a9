//! Signed-in session.
//!
//! [`SessionContext`] is the single owner of the bearer token and the current
//! user. It is handed to the REST client explicitly; nothing else keeps a
//! copy of the token.
//!
//! Lifecycle: [`SessionContext::init`] on start-up, [`SessionContext::set`]
//! after login, [`SessionContext::clear`] on logout, expiry or a rejected
//! token.

pub mod store;
pub mod token;

pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
pub use token::{TokenClaims, TokenError};

use crate::types::User;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use venue_core::environment::Clock;

/// Session persistence errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Reading or writing the session storage failed
    #[error("Session storage failed: {0}")]
    Io(String),

    /// Stored session is not valid JSON
    #[error("Session data is corrupt: {0}")]
    Serialization(String),

    /// Token could not be read
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Bearer token and the user it belongs to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Access token sent as `Authorization: Bearer`
    pub token: String,
    /// Signed-in user
    pub user: User,
}

/// Holds the active session and keeps it in sync with its store
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    current: RwLock<Option<(Session, TokenClaims)>>,
}

impl SessionContext {
    /// Context with no active session
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            current: RwLock::new(None),
        }
    }

    /// Restore the persisted session.
    ///
    /// An expired, malformed or unreadable session is discarded and removed
    /// from the store; that is not an error.
    ///
    /// # Errors
    ///
    /// Returns error only if the storage itself cannot be read or cleared.
    pub async fn init(&self) -> Result<Option<User>, SessionError> {
        let stored = match self.store.load().await {
            Ok(stored) => stored,
            Err(SessionError::Serialization(reason)) => {
                tracing::warn!(%reason, "Discarding unreadable session");
                self.store.clear().await?;
                return Ok(None);
            },
            Err(e) => return Err(e),
        };

        let Some(session) = stored else {
            return Ok(None);
        };

        match TokenClaims::parse(&session.token) {
            Ok(claims) if !claims.is_expired(self.clock.now()) => {
                tracing::info!(user = %session.user.email, "Session restored");
                let user = session.user.clone();
                self.replace(Some((session, claims)));
                Ok(Some(user))
            },
            Ok(_) => {
                tracing::info!(user = %session.user.email, "Stored session expired");
                self.store.clear().await?;
                Ok(None)
            },
            Err(error) => {
                tracing::warn!(%error, "Discarding session with unreadable token");
                self.store.clear().await?;
                Ok(None)
            },
        }
    }

    /// Make `session` the active one and persist it.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Token`]: the token cannot be read
    /// - storage errors from the [`SessionStore`]
    pub async fn set(&self, session: Session) -> Result<(), SessionError> {
        let claims = TokenClaims::parse(&session.token)?;
        self.store.save(&session).await?;
        tracing::info!(user = %session.user.email, role = ?session.user.role, "Signed in");
        self.replace(Some((session, claims)));
        Ok(())
    }

    /// Drop the active session and its persisted copy.
    ///
    /// # Errors
    ///
    /// Returns error if the storage cannot be cleared; the in-memory session
    /// is dropped regardless.
    pub async fn clear(&self) -> Result<(), SessionError> {
        self.replace(None);
        self.store.clear().await
    }

    /// Token for the `Authorization` header, unless missing or expired
    #[must_use]
    pub fn bearer_token(&self) -> Option<String> {
        self.live(|session| session.token.clone())
    }

    /// The signed-in user, unless the session is missing or expired
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.live(|session| session.user.clone())
    }

    /// Claims of the active token
    #[must_use]
    pub fn claims(&self) -> Option<TokenClaims> {
        self.read(|current| current.as_ref().map(|(_, claims)| claims.clone()))
    }

    /// Whether a non-expired session is active
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.bearer_token().is_some()
    }

    fn live<T>(&self, f: impl FnOnce(&Session) -> T) -> Option<T> {
        let now = self.clock.now();
        self.read(|current| {
            current
                .as_ref()
                .filter(|(_, claims)| !claims.is_expired(now))
                .map(|(session, _)| f(session))
        })
    }

    fn read<T>(&self, f: impl FnOnce(&Option<(Session, TokenClaims)>) -> T) -> T {
        f(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn replace(&self, next: Option<(Session, TokenClaims)>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next;
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("user", &self.current_user().map(|user| user.email))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::token::tests::token_with;
    use super::*;
    use crate::types::{Role, UserId};
    use serde_json::json;
    use venue_testing::test_clock;

    fn owner() -> User {
        User {
            id: UserId::new(1),
            name: "Maria".to_string(),
            email: "owner@venue.com".to_string(),
            role: Role::Owner,
            client_id: None,
        }
    }

    fn session_expiring_at(exp: i64) -> Session {
        Session {
            token: token_with(&json!({ "sub": "owner@venue.com", "exp": exp })),
            user: owner(),
        }
    }

    fn far_future() -> i64 {
        test_clock().now().timestamp() + 3600
    }

    #[tokio::test]
    async fn init_restores_live_session() {
        let store = Arc::new(MemorySessionStore::with_session(session_expiring_at(far_future())));
        let context = SessionContext::new(store, Arc::new(test_clock()));

        assert_eq!(context.init().await.unwrap(), Some(owner()));
        assert!(context.is_authenticated());
    }

    #[tokio::test]
    async fn init_drops_expired_session() {
        let expired = test_clock().now().timestamp() - 1;
        let store = Arc::new(MemorySessionStore::with_session(session_expiring_at(expired)));
        let context = SessionContext::new(store.clone(), Arc::new(test_clock()));

        assert_eq!(context.init().await.unwrap(), None);
        assert!(context.bearer_token().is_none());
        assert!(store.snapshot().is_none());
    }

    #[tokio::test]
    async fn set_rejects_unreadable_token() {
        let store = Arc::new(MemorySessionStore::new());
        let context = SessionContext::new(store.clone(), Arc::new(test_clock()));

        let result = context
            .set(Session {
                token: "not-a-jwt".to_string(),
                user: owner(),
            })
            .await;

        assert_eq!(result, Err(SessionError::Token(TokenError::Malformed(1))));
        assert!(store.snapshot().is_none());
    }

    #[tokio::test]
    async fn clear_forgets_everything() {
        let store = Arc::new(MemorySessionStore::new());
        let context = SessionContext::new(store.clone(), Arc::new(test_clock()));
        context.set(session_expiring_at(far_future())).await.unwrap();
        assert!(store.snapshot().is_some());

        context.clear().await.unwrap();

        assert!(context.current_user().is_none());
        assert!(store.snapshot().is_none());
    }

    #[tokio::test]
    async fn expired_session_has_no_user() {
        let store = Arc::new(MemorySessionStore::new());
        let context = SessionContext::new(store, Arc::new(test_clock()));
        let expired = test_clock().now().timestamp() - 1;
        context.set(session_expiring_at(expired)).await.unwrap();

        assert!(context.current_user().is_none());
        assert!(context.bearer_token().is_none());
        assert!(!context.is_authenticated());
    }
}
