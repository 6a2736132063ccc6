//! Client-side session: the stored bearer token and cached user profile.
//!
//! The session is an explicit capability handed to the API client and to the
//! route guard. It is read from its store on every access, written only by a
//! successful login, and cleared only by logout. The token is never checked
//! against the server here; a revoked token shows up as a 401 on the next call.

use crate::error::{ClientError, Result};
use chrono::{DateTime, Utc};
use marquee_core::{LoginResponse, UserProfile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Token and profile persisted together after login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
    /// When the login happened; informational, never used for expiry
    pub saved_at: DateTime<Utc>,
}

/// Persistence for the single client session.
pub trait SessionStore: Send + Sync {
    /// Read the stored session, if any.
    fn load(&self) -> Result<Option<Session>>;

    /// Replace the stored session.
    fn save(&self, session: &Session) -> Result<()>;

    /// Remove token and profile together.
    fn clear(&self) -> Result<()>;
}

/// Session kept in process memory only.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Session stored as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ClientError::Session(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        serde_json::from_str(&contents).map(Some).map_err(|e| {
            ClientError::Session(format!("Corrupt session file {}: {}", self.path.display(), e))
        })
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ClientError::Session(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(session)
            .map_err(|e| ClientError::Session(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| {
            ClientError::Session(format!("Failed to write {}: {}", self.path.display(), e))
        })?;

        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Session(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

/// Client routes gated by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The catalog view; requires a session
    Catalog,
    /// Login entry point
    Login,
    /// Account creation
    Signup,
}

/// Outcome of a route guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(Route),
}

/// Shared handle to the session store.
#[derive(Clone)]
pub struct SessionHolder {
    store: Arc<dyn SessionStore>,
}

impl SessionHolder {
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Holder backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MemorySessionStore::new())
    }

    /// Current session; an unreadable store counts as signed out.
    pub fn current(&self) -> Option<Session> {
        match self.store.load() {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Failed to read session, treating as signed out");
                None
            }
        }
    }

    /// Bearer token to attach to requests, if signed in.
    pub fn token(&self) -> Option<String> {
        self.current().map(|s| s.token)
    }

    /// Cached profile, or `None` when no token is stored.
    pub fn user(&self) -> Option<UserProfile> {
        self.current().map(|s| s.user)
    }

    pub fn is_signed_in(&self) -> bool {
        self.current().is_some()
    }

    /// Persist token and profile after a successful login.
    pub fn store_login(&self, response: LoginResponse) -> Result<Session> {
        let session = Session {
            token: response.token,
            user: response.user,
            saved_at: Utc::now(),
        };
        self.store.save(&session)?;

        info!(email = %session.user.email, "Signed in");
        Ok(session)
    }

    /// Clear token and profile; the caller navigates to the returned route.
    pub fn logout(&self) -> Result<Route> {
        self.store.clear()?;
        info!("Logged out");
        Ok(Route::Login)
    }

    /// Route guard: only the catalog needs a stored token.
    pub fn guard(&self, route: Route) -> RouteDecision {
        match route {
            Route::Catalog if !self.is_signed_in() => RouteDecision::Redirect(Route::Login),
            _ => RouteDecision::Allow,
        }
    }
}

impl std::fmt::Debug for SessionHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHolder")
            .field("signed_in", &self.is_signed_in())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login() -> LoginResponse {
        LoginResponse {
            token: "tok-1".to_string(),
            user: UserProfile {
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
            },
        }
    }

    #[test]
    fn test_login_then_logout() {
        let holder = SessionHolder::in_memory();
        assert!(holder.user().is_none());
        assert_eq!(
            holder.guard(Route::Catalog),
            RouteDecision::Redirect(Route::Login)
        );

        holder.store_login(login()).unwrap();
        assert_eq!(holder.token().as_deref(), Some("tok-1"));
        assert_eq!(holder.user().unwrap().name, "Ana");
        assert_eq!(holder.guard(Route::Catalog), RouteDecision::Allow);

        assert_eq!(holder.logout().unwrap(), Route::Login);
        assert!(holder.token().is_none());
        assert!(holder.user().is_none());
    }

    #[test]
    fn test_login_and_signup_never_redirect() {
        let holder = SessionHolder::in_memory();
        assert_eq!(holder.guard(Route::Login), RouteDecision::Allow);
        assert_eq!(holder.guard(Route::Signup), RouteDecision::Allow);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let holder = SessionHolder::new(FileSessionStore::new(&path));

        holder.store_login(login()).unwrap();
        assert!(path.exists());

        // A second holder over the same file sees the same session
        let other = SessionHolder::new(FileSessionStore::new(&path));
        assert_eq!(other.user().unwrap().email, "ana@example.com");

        other.logout().unwrap();
        assert!(!path.exists());
        assert!(holder.current().is_none());

        // Clearing twice is fine
        other.logout().unwrap();
    }

    #[test]
    fn test_corrupt_file_reads_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(matches!(store.load(), Err(ClientError::Session(_))));

        let holder = SessionHolder::new(store);
        assert!(!holder.is_signed_in());
    }
}
