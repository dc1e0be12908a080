//! Session storage.
//!
//! A session is an opaque bearer token plus two display strings. Its
//! presence is the only authentication signal the client has.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use mockall::automock;
use parking_lot::RwLock;
use platter::{delivery::PartnerId, routes::Route};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroize;

/// Bearer token issued at login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for the `Authorization` header only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(**redacted**)")
    }
}

impl Drop for BearerToken {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Stored login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: BearerToken,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_id: Option<PartnerId>,
}

impl Session {
    #[must_use]
    pub fn new(token: BearerToken) -> Self {
        Self {
            token,
            name: None,
            username: None,
            partner_id: None,
        }
    }

    /// Greeting name, falling back to the username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.username.as_deref())
            .unwrap_or("there")
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("session file {path} is corrupt")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where the session lives between requests.
#[automock]
pub trait SessionStore: Send + Sync {
    /// The stored session, if any.
    fn load(&self) -> Result<Option<Session>, SessionError>;

    /// Replace the stored session.
    fn save(&self, session: &Session) -> Result<(), SessionError>;

    /// Forget the session.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Protected views call this before rendering.
///
/// # Errors
///
/// Returns the login route when no usable token is stored.
pub fn require_session(store: &dyn SessionStore) -> Result<Session, Route> {
    match store.load() {
        Ok(Some(session)) if !session.token.is_empty() => Ok(session),
        Ok(_) | Err(_) => Err(Route::Login),
    }
}

/// Session held in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(self.session.read().clone())
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self.session.write() = Some(session.clone());

        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.session.write() = None;

        Ok(())
    }
}

/// Session persisted as a small JSON file.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(self.io_error(error)),
        };

        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|source| SessionError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|error| self.io_error(error))?;
        }

        let contents = serde_json::to_string_pretty(session).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        fs::write(&self.path, contents).map_err(|error| self.io_error(error))?;

        debug!(path = %self.path.display(), "session saved");

        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(self.io_error(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn session() -> Session {
        Session {
            name: Some("Asha".to_string()),
            username: Some("asha@example.com".to_string()),
            ..Session::new(BearerToken::new("tok-123"))
        }
    }

    #[test]
    fn token_is_redacted_in_debug_output() {
        assert!(!format!("{:?}", session()).contains("tok-123"));
    }

    #[test]
    fn file_store_round_trips_and_clears() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));

        assert_eq!(store.load()?, None);

        store.save(&session())?;

        assert_eq!(store.load()?, Some(session()));

        store.clear()?;
        store.clear()?;

        assert_eq!(store.load()?, None);

        Ok(())
    }

    #[test]
    fn corrupt_file_is_reported() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");

        fs::write(&path, "not json")?;

        let result = FileSessionStore::new(&path).load();

        assert!(matches!(result, Err(SessionError::Corrupt { .. })));

        Ok(())
    }

    #[test]
    fn protected_views_redirect_without_token() {
        let empty = MemorySessionStore::new();
        let blank = MemorySessionStore::with_session(Session::new(BearerToken::new("  ")));
        let signed_in = MemorySessionStore::with_session(session());

        assert_eq!(require_session(&empty), Err(Route::Login));
        assert_eq!(require_session(&blank), Err(Route::Login));
        assert_eq!(require_session(&signed_in).map(|s| s.display_name().to_string()), Ok("Asha".to_string()));
    }
}
