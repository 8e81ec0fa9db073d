//! Authentication state

use crate::routes::{Route, resolve_route};
use dogmatch_core::{DogApi, Session};
use dogmatch_storage::{JsonStoreExt, KeyValueStore, StorageResult, keys};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials and try again.";
pub const LOGOUT_FAILED: &str = "Logout failed. Please try again.";

#[derive(Default)]
struct SessionState {
    session: Option<Session>,
    loading: bool,
    error: Option<String>,
}

/// Tracks the logged-in user and gates the protected views
///
/// The session is persisted under `user`; presence of a session is what the
/// client treats as authenticated. All methods take `&self`, so a view can
/// poll `is_loading` while a login or logout is awaiting the service.
pub struct SessionStore {
    api: Arc<dyn DogApi>,
    storage: Arc<dyn KeyValueStore>,
    state: Mutex<SessionState>,
}

impl SessionStore {
    /// Create the store, restoring a persisted session if one exists
    pub fn new(api: Arc<dyn DogApi>, storage: Arc<dyn KeyValueStore>) -> Self {
        let session = match storage.load_json::<Session>(keys::USER) {
            Ok(session) => session,
            Err(e) => {
                warn!("Ignoring unreadable persisted session: {}", e);
                None
            }
        };

        Self {
            api,
            storage,
            state: Mutex::new(SessionState {
                session,
                ..Default::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn session(&self) -> Option<Session> {
        self.lock().session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().session.is_some()
    }

    /// Whether a login or logout call is in flight
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// The pending user-facing error, if any
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Take the pending error so it is surfaced exactly once
    pub fn take_error(&self) -> Option<String> {
        self.lock().error.take()
    }

    /// The view to show when `requested` is entered with the current session
    pub fn guard(&self, requested: Route) -> Route {
        resolve_route(requested, self.lock().session.as_ref())
    }

    fn begin(&self) {
        let mut state = self.lock();
        state.loading = true;
        state.error = None;
    }

    /// Log in through the remote service
    ///
    /// Returns the view to navigate to on success. When the service rejects
    /// the login no session is stored, the error state is set and `Ok(None)`
    /// is returned. When the session cannot be persisted the login is not
    /// kept and the storage error is returned.
    pub async fn login(&self, name: &str, email: &str) -> StorageResult<Option<Route>> {
        self.begin();
        let outcome = self.api.login(name, email).await;

        let mut state = self.lock();
        state.loading = false;

        if let Err(e) = outcome {
            warn!("Login error: {}", e);
            state.error = Some(LOGIN_FAILED.to_string());
            return Ok(None);
        }

        let session = Session::logged_in(name, email);
        if let Err(e) = self.storage.save_json(keys::USER, &session) {
            warn!("Failed to persist session: {}", e);
            return Err(e);
        }
        state.session = Some(session);
        info!("Logged in as {}", name);
        Ok(Some(Route::Search))
    }

    /// Log out through the remote service
    ///
    /// The in-memory session is cleared whatever the outcome. A failed remote
    /// call only leaves an error to surface; a failure to remove the persisted
    /// session is returned.
    pub async fn logout(&self) -> StorageResult<Route> {
        self.begin();
        let outcome = self.api.logout().await;

        let mut state = self.lock();
        state.loading = false;

        if let Err(e) = outcome {
            warn!("Logout error: {}", e);
            state.error = Some(LOGOUT_FAILED.to_string());
        }

        state.session = None;
        if let Err(e) = self.storage.remove(keys::USER) {
            warn!("Failed to clear persisted session: {}", e);
            return Err(e);
        }
        info!("Logged out");
        Ok(Route::Login)
    }
}
