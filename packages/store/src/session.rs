//! # Session store
//!
//! [`SessionStore`] owns the client [`Session`] and mirrors every mutation into
//! a [`SessionStorage`] backend. It is an ordinary value: the UI wraps it in a
//! signal and hands it down through context, tests construct one directly.
//!
//! ## Lifecycle
//!
//! 1. `SessionStore::new(storage)` starts empty and **unhydrated**.
//! 2. [`SessionStore::hydrate`] loads the persisted entry (if any), flips
//!    [`SessionStore::has_hydrated`] and fires every listener registered with
//!    [`SessionStore::on_finish_hydration`] exactly once.
//! 3. Setters update memory, then persist the whole session. Persistence
//!    failures are logged and swallowed; memory stays authoritative.
//! 4. [`SessionStore::logout`] clears every field and purges storage in one
//!    call.

use tracing::{debug, info, warn};

use crate::models::{Session, User, UserPatch};
use crate::storage::SessionStorage;

/// Handle returned by [`SessionStore::on_finish_hydration`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HydrationSubscription(u64);

type HydrationListener = Box<dyn FnOnce()>;

/// Owned, persisted client session.
pub struct SessionStore<S = Box<dyn SessionStorage>> {
    session: Session,
    storage: S,
    hydrated: bool,
    listeners: Vec<(u64, HydrationListener)>,
    next_listener: u64,
}

impl<S: SessionStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            session: Session::default(),
            storage,
            hydrated: false,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token.as_deref()
    }

    pub fn context_opened(&self) -> bool {
        self.session.context_opened
    }

    pub fn has_registered_faces(&self) -> bool {
        self.session.has_registered_faces
    }

    pub fn has_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Load the persisted session and notify hydration listeners.
    ///
    /// A corrupt or unreadable entry hydrates as an empty session.
    pub fn hydrate(&mut self) {
        match self.storage.load() {
            Ok(Some(raw)) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => self.session = session,
                Err(e) => {
                    warn!("Discarding unreadable persisted session: {}", e);
                    self.session = Session::default();
                }
            },
            Ok(None) => debug!("No persisted session"),
            Err(e) => warn!("Failed to load persisted session: {}", e),
        }
        self.hydrated = true;
        info!(
            authenticated = self.session.is_authenticated(),
            "Session hydrated"
        );

        for (_, listener) in self.listeners.drain(..) {
            listener();
        }
    }

    /// Register a one-shot listener for the end of hydration.
    ///
    /// Listeners registered after hydration never fire, so callers must also
    /// check [`Self::has_hydrated`].
    pub fn on_finish_hydration(&mut self, listener: impl FnOnce() + 'static) -> HydrationSubscription {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        HydrationSubscription(id)
    }

    pub fn unsubscribe(&mut self, subscription: HydrationSubscription) {
        self.listeners.retain(|(id, _)| *id != subscription.0);
    }

    /// Shallow-merge into the current user, creating one if absent.
    pub fn set_user(&mut self, patch: UserPatch) {
        match self.session.user.as_mut() {
            Some(user) => user.merge(patch),
            None => {
                let mut user = User::default();
                user.merge(patch);
                self.session.user = Some(user);
            }
        }
        self.persist();
    }

    pub fn clear_user(&mut self) {
        self.session.user = None;
        self.persist();
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.session.token = token;
        self.persist();
    }

    pub fn set_context_opened(&mut self, opened: bool) {
        self.session.context_opened = opened;
        self.persist();
    }

    pub fn set_has_registered_faces(&mut self, registered: bool) {
        self.session.has_registered_faces = registered;
        self.persist();
    }

    /// Start a fresh session for `user`. The context and face flags belong
    /// to whoever was signed in before, so they start over.
    pub fn login(&mut self, user: User, token: String) {
        info!(user_id = user.id, "Session started");
        self.session = Session {
            user: Some(user),
            token: Some(token),
            context_opened: false,
            has_registered_faces: false,
        };
        self.persist();
    }

    /// Clear every field and purge persisted storage.
    pub fn logout(&mut self) {
        info!("Session cleared");
        self.session = Session::default();
        self.clear_storage();
    }

    /// Remove the persisted entry without touching the in-memory session.
    pub fn clear_storage(&self) {
        if let Err(e) = self.storage.clear() {
            warn!("Failed to purge persisted session: {}", e);
        }
    }

    fn persist(&self) {
        let raw = match serde_json::to_string(&self.session) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize session: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.save(&raw) {
            warn!("Failed to persist session: {}", e);
        }
    }
}
