//! Session store: the token and user every request is made on behalf of.
//!
//! Lifecycle: `init` restores the persisted copy once at startup and marks
//! the store hydrated; `login` persists; `logout` clears both memory and
//! storage and tells the UI why.

use std::cell::RefCell;
use std::rc::Rc;

use planner_types::{
    event::AppEvent,
    session::{LogoutReason, Session},
    user::UserSummary,
    Result,
};

use crate::event_bus::EventBus;
use crate::ports::StoragePort;

pub const SESSION_STORAGE_KEY: &str = "planner:session";

#[derive(Debug, Default)]
struct SessionState {
    session: Session,
    hydrated: bool,
}

/// Clone-cheap handle shared by the API client, stores and UI.
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<RefCell<SessionState>>,
    storage: Rc<dyn StoragePort>,
    bus: EventBus,
}

impl SessionStore {
    pub fn new(storage: Rc<dyn StoragePort>, bus: EventBus) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SessionState::default())),
            storage,
            bus,
        }
    }

    /// Restore the persisted session. A corrupt entry is discarded.
    /// Always leaves the store hydrated, even when storage fails.
    pub async fn init(&self) {
        let restored = match self.storage.get(SESSION_STORAGE_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    log::warn!("Discarding unreadable persisted session: {}", e);
                    if let Err(e) = self.storage.delete(SESSION_STORAGE_KEY).await {
                        log::warn!("Failed to remove persisted session: {}", e);
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!("Session storage unavailable ({}): {}", self.storage.backend_name(), e);
                None
            }
        };

        let authenticated = {
            let mut state = self.inner.borrow_mut();
            if let Some(session) = restored {
                state.session = session;
            }
            state.hydrated = true;
            state.session.is_authenticated()
        };
        log::info!("Session hydrated (authenticated: {})", authenticated);
        self.bus.emit(AppEvent::SessionRestored { authenticated });
    }

    pub fn is_hydrated(&self) -> bool {
        self.inner.borrow().hydrated
    }

    pub fn snapshot(&self) -> Session {
        self.inner.borrow().session.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.borrow().session.token.clone()
    }

    pub fn user(&self) -> Option<UserSummary> {
        self.inner.borrow().session.user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.borrow().session.is_authenticated()
    }

    /// A user was held, so a 401 now means "expired" rather than "never logged in".
    pub fn was_ever_authenticated(&self) -> bool {
        self.inner.borrow().session.user.is_some()
    }

    pub async fn login(&self, token: impl Into<String>, user: UserSummary) -> Result<()> {
        let email = user.email.clone();
        self.inner.borrow_mut().session = Session::new(token, user);
        self.persist().await?;
        self.bus.emit(AppEvent::LoggedIn { email });
        Ok(())
    }

    /// Replace the token only (refresh, or before the profile is fetched).
    pub async fn set_token(&self, token: impl Into<String>) -> Result<()> {
        self.inner.borrow_mut().session.token = Some(token.into());
        self.persist().await
    }

    pub async fn set_user(&self, user: UserSummary) -> Result<()> {
        self.inner.borrow_mut().session.user = Some(user);
        self.persist().await
    }

    /// Tear the session down. No-op when nothing is held.
    pub async fn logout(&self, reason: LogoutReason) {
        let had_session = {
            let mut state = self.inner.borrow_mut();
            let had = state.session.token.is_some() || state.session.user.is_some();
            state.session = Session::default();
            had
        };
        if !had_session {
            return;
        }
        if let Err(e) = self.storage.delete(SESSION_STORAGE_KEY).await {
            log::warn!("Failed to remove persisted session: {}", e);
        }
        log::info!("Logged out ({})", reason.as_str());
        self.bus.emit(AppEvent::LoggedOut { reason });
    }

    /// Drop a half-established session (token without user) without
    /// announcing a logout.
    pub async fn discard(&self) {
        self.inner.borrow_mut().session = Session::default();
        if let Err(e) = self.storage.delete(SESSION_STORAGE_KEY).await {
            log::warn!("Failed to remove persisted session: {}", e);
        }
    }

    async fn persist(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.snapshot())?;
        self.storage.set(SESSION_STORAGE_KEY, &raw).await
    }
}
