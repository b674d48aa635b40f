//! Route guard for the signed-in part of the app.

use dioxus::prelude::*;
use store::HydrationSubscription;

use crate::session::{use_api, use_session};

/// Where the guard stands for the current session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    /// Persisted state is still loading; render nothing.
    Unhydrated,
    /// Hydrated without a token; purge and redirect to login.
    Anonymous,
    /// Hydrated with a token; render the protected tree.
    Authenticated,
}

impl GuardState {
    pub fn evaluate(hydrated: bool, token: Option<&str>) -> Self {
        if !hydrated {
            GuardState::Unhydrated
        } else if token.is_some_and(|t| !t.is_empty()) {
            GuardState::Authenticated
        } else {
            GuardState::Anonymous
        }
    }
}

/// Renders `children` only for an authenticated session.
///
/// An anonymous session is cleared, its persisted entry purged, and
/// `on_anonymous` is called to redirect (the caller should replace the
/// history entry).
#[component]
pub fn AuthGuard(on_anonymous: EventHandler<()>, children: Element) -> Element {
    let mut session = use_session();
    let api = use_api();
    let mut hydrated = use_signal(|| session.peek().has_hydrated());
    let mut subscription = use_signal(|| None::<HydrationSubscription>);

    // Hydration may already be over by the time this runs
    use_effect(move || {
        if session.peek().has_hydrated() {
            hydrated.set(true);
            return;
        }
        let id = session.write().on_finish_hydration(move || hydrated.set(true));
        subscription.set(Some(id));
    });

    use_drop(move || {
        if let Some(id) = subscription.peek().as_ref().copied() {
            session.write().unsubscribe(id);
        }
    });

    let state = use_memo(move || GuardState::evaluate(hydrated(), session.read().token()));

    let anonymous_api = api.clone();
    use_effect(move || {
        if state() != GuardState::Anonymous {
            return;
        }
        let stale = {
            let current = session.peek();
            current.user().is_some() || current.token().is_some()
        };
        if stale {
            let mut current = session.write();
            current.clear_user();
            current.set_token(None);
        }
        session.peek().clear_storage();
        anonymous_api.set_bearer(None);
        tracing::info!("No session token, redirecting to login");
        on_anonymous.call(());
    });

    match state() {
        GuardState::Authenticated => {
            let token = session.read().token().map(str::to_string);
            if api.bearer() != token {
                api.set_bearer(token);
            }
            rsx! {
                {children}
            }
        }
        GuardState::Unhydrated | GuardState::Anonymous => rsx! {},
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use api::ApiClient;
    use store::{MemoryStorage, SessionStorage, SessionStore, User};

    use super::*;
    use crate::session::SessionContext;

    #[derive(Clone)]
    struct Harness {
        storage: MemoryStorage,
        api: ApiClient,
        redirects: Rc<Cell<u32>>,
        child_renders: Rc<Cell<u32>>,
    }

    impl Harness {
        fn with_persisted(raw: &str) -> Self {
            let storage = MemoryStorage::new("userStore");
            storage.save(raw).unwrap();
            Self {
                storage,
                api: ApiClient::new("http://localhost:5001"),
                redirects: Rc::new(Cell::new(0)),
                child_renders: Rc::new(Cell::new(0)),
            }
        }

        fn run(&self) {
            let mut dom = VirtualDom::new(guarded_app).with_root_context(self.clone());
            dom.rebuild_in_place();
            for _ in 0..8 {
                dom.render_immediate_to_vec();
            }
        }
    }

    fn guarded_app() -> Element {
        let harness = use_context::<Harness>();
        use_context_provider(|| harness.api.clone());
        let mut session: SessionContext = use_signal(|| {
            SessionStore::new(Box::new(harness.storage.clone()) as Box<dyn SessionStorage>)
        });
        use_context_provider(|| session);

        // Hydrate after mount, the way the provider does
        use_effect(move || {
            if !session.peek().has_hydrated() {
                session.write().hydrate();
            }
        });

        let redirects = harness.redirects.clone();
        rsx! {
            AuthGuard {
                on_anonymous: move |_| redirects.set(redirects.get() + 1),
                Protected {}
            }
        }
    }

    #[component]
    fn Protected() -> Element {
        let harness = use_context::<Harness>();
        harness.child_renders.set(harness.child_renders.get() + 1);
        rsx! { "protected" }
    }

    #[test]
    fn test_guard_redirects_without_token_and_never_renders_children() {
        let harness = Harness::with_persisted(r#"{"user":{"id":1},"token":null}"#);
        harness.run();

        assert_eq!(harness.redirects.get(), 1);
        assert_eq!(harness.child_renders.get(), 0);
        assert_eq!(harness.storage.load().unwrap(), None);
        assert_eq!(harness.api.bearer(), None);
    }

    #[test]
    fn test_guard_renders_children_and_installs_bearer() {
        let harness = Harness::with_persisted(r#"{"user":{"id":1},"token":"tok1"}"#);
        harness.run();

        assert_eq!(harness.redirects.get(), 0);
        assert!(harness.child_renders.get() >= 1);
        assert_eq!(harness.api.bearer().as_deref(), Some("tok1"));
        assert!(harness.storage.load().unwrap().is_some());
    }

    #[test]
    fn test_unhydrated_renders_nothing_yet() {
        assert_eq!(GuardState::evaluate(false, None), GuardState::Unhydrated);
        assert_eq!(GuardState::evaluate(false, Some("tok1")), GuardState::Unhydrated);
    }

    #[test]
    fn test_hydrated_without_token_is_anonymous() {
        assert_eq!(GuardState::evaluate(true, None), GuardState::Anonymous);
        assert_eq!(GuardState::evaluate(true, Some("")), GuardState::Anonymous);
    }

    #[test]
    fn test_hydrated_with_token_is_authenticated() {
        assert_eq!(GuardState::evaluate(true, Some("tok1")), GuardState::Authenticated);
    }

    #[test]
    fn test_401_clears_session_once_per_response() {
        let storage = MemoryStorage::new("userStore");
        let session = Rc::new(RefCell::new(SessionStore::new(storage.clone())));
        session.borrow_mut().hydrate();
        session.borrow_mut().login(
            User {
                id: 1,
                email: "a@b.com".into(),
                ..User::default()
            },
            "tok1".into(),
        );
        session.borrow_mut().set_context_opened(true);

        let logouts = Rc::new(Cell::new(0));
        let api = ApiClient::new("http://localhost:5001");
        api.set_bearer(Some("tok1".into()));
        let hook_session = Rc::clone(&session);
        let counter = Rc::clone(&logouts);
        assert!(api.install_unauthorized_hook(move || {
            counter.set(counter.get() + 1);
            hook_session.borrow_mut().logout();
        }));

        let err = api.intercept_failure(401, br#"{"message": "Token expired"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(logouts.get(), 1);

        let current = session.borrow();
        assert_eq!(current.user(), None);
        assert_eq!(current.token(), None);
        assert!(!current.context_opened());
        assert_eq!(storage.load().unwrap(), None);
        assert_eq!(api.bearer(), None);
        assert_eq!(
            GuardState::evaluate(current.has_hydrated(), current.token()),
            GuardState::Anonymous
        );
    }
}
