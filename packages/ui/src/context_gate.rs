//! Encryption-context workflow on the profile page.
//!
//! The service keeps per-user key material behind a mnemonic phrase. The
//! profile page can generate that material once (the phrase is shown a
//! single time), check whether it exists, and open it again by entering the
//! phrase. Face registration and attendance are only offered as "ready" once
//! the context is open.
//!
//! | Operation | Request | Effect |
//! |-----------|---------|--------|
//! | [`ContextGate::check_saved_context_key`] | `GET /user-profile/check-saved-context-key` | sets `has_encryption_context`, failures only logged |
//! | [`ContextGate::generate_context_key`] | `POST /user-profile/generate-context-key` | no-op when a context exists, otherwise re-checks and keeps the phrase for display |
//! | [`ContextGate::open_saved_context_key`] | `POST /user-profile/open-saved-context-key` | marks the session's context as opened |
//! | [`ContextGate::check_opened_context_key`] | `GET /user-profile/check-opened-saved-context-key` | restores the opened flag after a reload |
//!
//! The opened flag is a client hint. The gate never clears it, and the
//! service re-checks the context on every biometric request.

use std::cell::RefCell;
use std::rc::Rc;

use api::{ApiClient, ApiError, CancelToken};
use store::SessionStore;

use crate::in_flight::InFlight;
use crate::snackbar::Notification;

pub const BUSY_MESSAGE: &str = "A process is running, please wait";
const GENERATE_FAILED: &str = "Failed to generate the context key";
const OPEN_FAILED: &str = "Failed to open the context key, check the mnemonic phrase and try again";

/// Banner shown while the context is not open.
pub const GATE_NOTICE: &str = "Your encryption context is not open. Open it from your profile \
     before registering faces or checking in. This notice is informational; the attendance \
     service performs the actual check.";

/// The context-key endpoints the gate needs.
#[allow(async_fn_in_trait)]
pub trait ContextKeyApi {
    async fn check_saved(&self) -> Result<bool, ApiError>;
    async fn generate(&self) -> Result<String, ApiError>;
    async fn open(&self, mnemonic_phrase: &str) -> Result<(), ApiError>;
    async fn check_opened(&self) -> Result<bool, ApiError>;
}

impl ContextKeyApi for ApiClient {
    async fn check_saved(&self) -> Result<bool, ApiError> {
        self.check_saved_context_key().await
    }

    async fn generate(&self) -> Result<String, ApiError> {
        self.generate_context_key().await
    }

    async fn open(&self, mnemonic_phrase: &str) -> Result<(), ApiError> {
        self.open_saved_context_key(mnemonic_phrase).await
    }

    async fn check_opened(&self) -> Result<bool, ApiError> {
        self.check_opened_context_key().await
    }
}

/// View state of the gate. The mnemonic phrase lives only here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GateState {
    pub has_encryption_context: bool,
    pub checking: bool,
    pub generating: bool,
    pub opening: bool,
    pub mnemonic_phrase: Option<String>,
}

/// What an operation asks the page to do.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GateOutcome {
    pub notification: Option<Notification>,
    pub context_opened: bool,
}

impl GateOutcome {
    fn silent() -> Self {
        Self::default()
    }

    fn notify(notification: Notification) -> Self {
        Self {
            notification: Some(notification),
            context_opened: false,
        }
    }

    fn opened(notification: Option<Notification>) -> Self {
        Self {
            notification,
            context_opened: true,
        }
    }

    /// Write the outcome into the session. Only ever sets the flag.
    pub fn apply<S: store::SessionStorage>(&self, session: &mut SessionStore<S>) {
        if self.context_opened && !session.context_opened() {
            tracing::info!("Encryption context opened");
            session.set_context_opened(true);
        }
    }
}

type Observer = Rc<dyn Fn(&GateState)>;

pub struct ContextGate<A: ContextKeyApi> {
    api: A,
    cancel: CancelToken,
    in_flight: InFlight,
    state: RefCell<GateState>,
    observer: Option<Observer>,
}

impl<A: ContextKeyApi> ContextGate<A> {
    pub fn new(api: A, cancel: CancelToken, in_flight: InFlight) -> Self {
        Self {
            api,
            cancel,
            in_flight,
            state: RefCell::new(GateState::default()),
            observer: None,
        }
    }

    /// Called with a snapshot after every state change.
    pub fn with_observer(mut self, observer: impl Fn(&GateState) + 'static) -> Self {
        self.observer = Some(Rc::new(observer));
        self
    }

    pub fn state(&self) -> GateState {
        self.state.borrow().clone()
    }

    /// Forget the displayed phrase once the user has acknowledged it.
    pub fn dismiss_mnemonic(&self) {
        self.update(|s| s.mnemonic_phrase = None);
    }

    pub async fn check_saved_context_key(&self) -> GateOutcome {
        if self.state.borrow().checking {
            return GateOutcome::silent();
        }
        self.refresh_saved().await;
        GateOutcome::silent()
    }

    pub async fn generate_context_key(&self) -> GateOutcome {
        if self.state.borrow().has_encryption_context {
            return GateOutcome::silent();
        }
        let Some(_guard) = self.in_flight.try_begin() else {
            return GateOutcome::notify(Notification::info(BUSY_MESSAGE));
        };

        self.update(|s| s.generating = true);
        let result = self.cancel.run(self.api.generate()).await;
        self.update(|s| s.generating = false);

        match result {
            Ok(phrase) => {
                self.refresh_saved().await;
                self.update(|s| s.mnemonic_phrase = Some(phrase));
                GateOutcome::notify(Notification::success(
                    "Context key generated. Store the mnemonic phrase somewhere safe, it is shown only once.",
                ))
            }
            Err(err) => self.failed(&err, GENERATE_FAILED),
        }
    }

    pub async fn open_saved_context_key(&self, mnemonic_phrase: &str) -> GateOutcome {
        let phrase = mnemonic_phrase.trim();
        if phrase.is_empty() {
            return GateOutcome::notify(Notification::warning("Enter your mnemonic phrase"));
        }
        let Some(_guard) = self.in_flight.try_begin() else {
            return GateOutcome::notify(Notification::info(BUSY_MESSAGE));
        };

        self.update(|s| s.opening = true);
        let result = self.cancel.run(self.api.open(phrase)).await;
        self.update(|s| s.opening = false);

        match result {
            Ok(()) => GateOutcome::opened(Some(Notification::success("Context opened"))),
            Err(err) => self.failed(&err, OPEN_FAILED),
        }
    }

    /// A `false` answer leaves the session flag alone.
    pub async fn check_opened_context_key(&self) -> GateOutcome {
        if self.state.borrow().checking {
            return GateOutcome::silent();
        }
        self.update(|s| s.checking = true);
        let result = self.cancel.run(self.api.check_opened()).await;
        self.update(|s| s.checking = false);

        match result {
            Ok(true) => GateOutcome::opened(None),
            Ok(false) => GateOutcome::silent(),
            Err(err) => {
                if !err.is_canceled() {
                    tracing::warn!("Checking opened context failed: {err}");
                }
                GateOutcome::silent()
            }
        }
    }

    async fn refresh_saved(&self) {
        self.update(|s| s.checking = true);
        let result = self.cancel.run(self.api.check_saved()).await;
        match result {
            Ok(exists) => self.update(|s| {
                s.checking = false;
                s.has_encryption_context = exists;
            }),
            Err(err) => {
                if !err.is_canceled() {
                    tracing::warn!("Checking saved context failed: {err}");
                }
                self.update(|s| {
                    s.checking = false;
                    s.has_encryption_context = false;
                });
            }
        }
    }

    fn failed(&self, err: &ApiError, fallback: &str) -> GateOutcome {
        match Notification::from_error(err, fallback) {
            Some(notification) => {
                tracing::error!("{fallback}: {err}");
                GateOutcome::notify(notification)
            }
            None => GateOutcome::silent(),
        }
    }

    fn update(&self, f: impl FnOnce(&mut GateState)) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            f(&mut state);
            state.clone()
        };
        if let Some(observer) = &self.observer {
            observer(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    use store::MemoryStorage;

    use super::*;
    use crate::snackbar::Severity;

    #[derive(Default)]
    struct ScriptedApi {
        saved: RefCell<VecDeque<Result<bool, ApiError>>>,
        generated: RefCell<VecDeque<Result<String, ApiError>>>,
        opened: RefCell<VecDeque<Result<(), ApiError>>>,
        opened_checks: RefCell<VecDeque<Result<bool, ApiError>>>,
        open_calls: RefCell<Vec<String>>,
        generate_calls: Cell<usize>,
    }

    impl ContextKeyApi for ScriptedApi {
        async fn check_saved(&self) -> Result<bool, ApiError> {
            self.saved.borrow_mut().pop_front().unwrap_or(Ok(false))
        }

        async fn generate(&self) -> Result<String, ApiError> {
            self.generate_calls.set(self.generate_calls.get() + 1);
            self.generated
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Network("unscripted".into())))
        }

        async fn open(&self, mnemonic_phrase: &str) -> Result<(), ApiError> {
            self.open_calls.borrow_mut().push(mnemonic_phrase.to_string());
            self.opened
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Network("unscripted".into())))
        }

        async fn check_opened(&self) -> Result<bool, ApiError> {
            self.opened_checks.borrow_mut().pop_front().unwrap_or(Ok(false))
        }
    }

    fn gate(api: ScriptedApi) -> ContextGate<ScriptedApi> {
        ContextGate::new(api, CancelToken::new(), InFlight::new())
    }

    fn session() -> SessionStore<MemoryStorage> {
        let mut session = SessionStore::new(MemoryStorage::new("userStore"));
        session.hydrate();
        session
    }

    #[tokio::test]
    async fn test_correct_mnemonic_opens_context_and_stays_open() {
        let api = ScriptedApi::default();
        api.opened.borrow_mut().push_back(Ok(()));
        api.opened.borrow_mut().push_back(Err(ApiError::Rejected {
            message: "Invalid mnemonic".into(),
        }));
        api.generated
            .borrow_mut()
            .push_back(Err(ApiError::from_status(500, b"{}")));
        api.opened_checks.borrow_mut().push_back(Ok(false));
        let gate = gate(api);
        let mut session = session();

        let outcome = gate.open_saved_context_key("  abandon ability able  ").await;
        outcome.apply(&mut session);
        assert!(session.context_opened());
        assert_eq!(gate.api.open_calls.borrow().as_slice(), ["abandon ability able"]);

        // Unrelated failures afterwards leave the flag set
        gate.open_saved_context_key("wrong words").await.apply(&mut session);
        gate.generate_context_key().await.apply(&mut session);
        gate.check_opened_context_key().await.apply(&mut session);
        assert!(session.context_opened());
    }

    #[tokio::test]
    async fn test_wrong_mnemonic_prompts_retry() {
        let api = ScriptedApi::default();
        api.opened.borrow_mut().push_back(Err(ApiError::Server {
            status: 400,
            message: "Invalid mnemonic phrase".into(),
        }));
        let gate = gate(api);

        let outcome = gate.open_saved_context_key("wrong").await;
        assert!(!outcome.context_opened);
        let notification = outcome.notification.unwrap();
        assert_eq!(notification.severity, Severity::Error);
        assert_eq!(notification.lines, ["Invalid mnemonic phrase"]);
        assert!(!gate.state().opening);
    }

    #[tokio::test]
    async fn test_empty_phrase_is_not_sent() {
        let gate = gate(ScriptedApi::default());
        let outcome = gate.open_saved_context_key("   ").await;
        assert_eq!(outcome.notification.unwrap().severity, Severity::Warning);
        assert!(gate.api.open_calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_generate_rechecks_and_keeps_phrase() {
        let api = ScriptedApi::default();
        api.saved.borrow_mut().push_back(Ok(true));
        api.generated
            .borrow_mut()
            .push_back(Ok("abandon ability able about".into()));
        let gate = gate(api);

        let outcome = gate.generate_context_key().await;
        assert_eq!(outcome.notification.unwrap().severity, Severity::Success);
        let state = gate.state();
        assert!(state.has_encryption_context);
        assert!(!state.generating);
        assert_eq!(state.mnemonic_phrase.as_deref(), Some("abandon ability able about"));

        gate.dismiss_mnemonic();
        assert_eq!(gate.state().mnemonic_phrase, None);
    }

    #[tokio::test]
    async fn test_generate_is_noop_when_context_exists() {
        let api = ScriptedApi::default();
        api.saved.borrow_mut().push_back(Ok(true));
        let gate = gate(api);

        gate.check_saved_context_key().await;
        let outcome = gate.generate_context_key().await;

        assert_eq!(outcome, GateOutcome::default());
        assert_eq!(gate.api.generate_calls.get(), 0);
    }

    #[tokio::test]
    async fn test_check_failure_assumes_no_context() {
        let api = ScriptedApi::default();
        api.saved.borrow_mut().push_back(Ok(true));
        api.saved
            .borrow_mut()
            .push_back(Err(ApiError::Network("offline".into())));
        let gate = gate(api);

        gate.check_saved_context_key().await;
        assert!(gate.state().has_encryption_context);

        let outcome = gate.check_saved_context_key().await;
        assert_eq!(outcome.notification, None);
        assert!(!gate.state().has_encryption_context);
    }

    #[tokio::test]
    async fn test_busy_page_refuses_second_request() {
        let marker = InFlight::new();
        let gate = ContextGate::new(ScriptedApi::default(), CancelToken::new(), marker.clone());

        // e.g. a profile update holding the page's marker
        let _profile_update = marker.try_begin().unwrap();
        let outcome = gate.open_saved_context_key("abandon").await;

        let notification = outcome.notification.unwrap();
        assert_eq!(notification.severity, Severity::Info);
        assert_eq!(notification.lines, [BUSY_MESSAGE]);
        assert!(gate.api.open_calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_canceled_gate_is_silent() {
        let api = ScriptedApi::default();
        api.opened.borrow_mut().push_back(Ok(()));
        let cancel = CancelToken::new();
        let gate = ContextGate::new(api, cancel.clone(), InFlight::new());

        cancel.cancel();
        let outcome = gate.open_saved_context_key("abandon").await;
        assert_eq!(outcome, GateOutcome::default());
    }

    #[tokio::test]
    async fn test_opened_check_restores_flag() {
        let api = ScriptedApi::default();
        api.opened_checks.borrow_mut().push_back(Ok(true));
        let gate = gate(api);
        let mut session = session();

        gate.check_opened_context_key().await.apply(&mut session);
        assert!(session.context_opened());
    }

    #[tokio::test]
    async fn test_observer_sees_progress() {
        let api = ScriptedApi::default();
        api.saved.borrow_mut().push_back(Ok(true));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let gate = ContextGate::new(api, CancelToken::new(), InFlight::new())
            .with_observer(move |state| sink.borrow_mut().push(state.checking));

        gate.check_saved_context_key().await;
        assert_eq!(seen.borrow().as_slice(), [true, false]);
    }
}
