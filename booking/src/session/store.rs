//! Session persistence.

use super::{Session, SessionError};
use futures::future::BoxFuture;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Where the signed-in session survives between runs.
///
/// Returns `BoxFuture` instead of async fn to stay dyn-compatible.
pub trait SessionStore: Send + Sync {
    /// Load the persisted session, if any.
    ///
    /// # Errors
    ///
    /// Returns error if the storage cannot be read or holds garbage.
    fn load(&self) -> BoxFuture<'_, Result<Option<Session>, SessionError>>;

    /// Persist `session`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns error if the storage cannot be written.
    fn save<'a>(&'a self, session: &'a Session) -> BoxFuture<'a, Result<(), SessionError>>;

    /// Forget the persisted session. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns error if the storage cannot be written.
    fn clear(&self) -> BoxFuture<'_, Result<(), SessionError>>;
}

/// JSON file holding the session
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store backed by the file at `path`; parent directories are created on save
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the session file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> BoxFuture<'_, Result<Option<Session>, SessionError>> {
        Box::pin(async move {
            let bytes = match tokio::fs::read(&self.path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(SessionError::Io(e.to_string())),
            };
            serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| SessionError::Serialization(e.to_string()))
        })
    }

    fn save<'a>(&'a self, session: &'a Session) -> BoxFuture<'a, Result<(), SessionError>> {
        Box::pin(async move {
            let bytes = serde_json::to_vec_pretty(session)
                .map_err(|e| SessionError::Serialization(e.to_string()))?;
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| SessionError::Io(e.to_string()))?;
            }
            tokio::fs::write(&self.path, bytes)
                .await
                .map_err(|e| SessionError::Io(e.to_string()))
        })
    }

    fn clear(&self) -> BoxFuture<'_, Result<(), SessionError>> {
        Box::pin(async move {
            match tokio::fs::remove_file(&self.path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(SessionError::Io(e.to_string())),
            }
        })
    }
}

/// Session kept in memory only
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    /// An empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `session`
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }

    /// Current contents, for assertions
    #[must_use]
    pub fn snapshot(&self) -> Option<Session> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> BoxFuture<'_, Result<Option<Session>, SessionError>> {
        let session = self.snapshot();
        Box::pin(async move { Ok(session) })
    }

    fn save<'a>(&'a self, session: &'a Session) -> BoxFuture<'a, Result<(), SessionError>> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Box::pin(async { Ok(()) })
    }

    fn clear(&self) -> BoxFuture<'_, Result<(), SessionError>> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Box::pin(async { Ok(()) })
    }
}
