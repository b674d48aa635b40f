//! Session and API context for the component tree.

use api::{ApiClient, CancelToken, LoginData};
use dioxus::prelude::*;
use store::{ServiceConfig, SessionStorage, SessionStore};

use crate::capture::record_listing;

/// The session store as shared through context.
pub type SessionContext = Signal<SessionStore>;

pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
}

pub fn use_api() -> ApiClient {
    use_context::<ApiClient>()
}

/// Install a successful login on the client and the session.
pub fn complete_login<S: SessionStorage>(api: &ApiClient, session: &mut SessionStore<S>, data: LoginData) {
    api.set_bearer(Some(data.access_token.clone()));
    session.login(data.user, data.access_token);
}

/// Refresh `has_registered_faces` from the faces the service has enrolled.
/// A failed listing leaves the flag alone.
pub async fn sync_registered_faces(api: &ApiClient, cancel: &CancelToken, mut session: SessionContext) {
    match cancel.run(api.registered_faces()).await {
        Ok(faces) => record_listing(&mut *session.write(), faces.len()),
        Err(err) if err.is_canceled() => {}
        Err(err) => tracing::warn!("Listing registered faces failed: {err}"),
    }
}

/// A token canceled when the calling component unmounts.
pub fn use_cancel_token() -> CancelToken {
    let token = use_hook(CancelToken::new);
    let on_drop = token.clone();
    use_drop(move || on_drop.cancel());
    token
}

/// Provides [`use_session`] and [`use_api`] to its children.
///
/// The store is hydrated once on mount. The 401 hook is installed here, once
/// per client: it logs the session out and the guard takes care of the
/// redirect.
#[component]
pub fn SessionProvider(config: ServiceConfig, children: Element) -> Element {
    let api = use_context_provider(|| ApiClient::from_config(&config));
    let session: SessionContext =
        use_signal(|| SessionStore::new(store::default_storage(&config.storage.key)));
    use_context_provider(|| session);

    use_hook(move || {
        let installed = api.install_unauthorized_hook(move || {
            let mut session = session;
            if session.peek().session().is_authenticated() {
                tracing::info!("Service answered 401, logging out");
            }
            session.write().logout();
        });
        if !installed {
            tracing::debug!("Unauthorized hook already installed");
        }
    });

    use_effect(move || {
        let mut session = session;
        if !session.peek().has_hydrated() {
            session.write().hydrate();
        }
    });

    rsx! {
        {children}
    }
}

#[cfg(test)]
mod tests {
    use store::{MemoryStorage, User};

    use super::*;
    use crate::GuardState;

    fn login_data(id: u64, token: &str) -> LoginData {
        LoginData {
            access_token: token.to_string(),
            user: User {
                id,
                email: "a@b.com".into(),
                ..User::default()
            },
        }
    }

    #[test]
    fn test_complete_login_sets_session_and_bearer() {
        let storage = MemoryStorage::new("userStore");
        let mut session = SessionStore::new(storage.clone());
        session.hydrate();
        let api = ApiClient::new("http://localhost:5001");

        complete_login(&api, &mut session, login_data(1, "tok1"));

        assert_eq!(session.token(), Some("tok1"));
        assert_eq!(session.user().map(|u| u.id), Some(1));
        assert_eq!(api.bearer().as_deref(), Some("tok1"));
        assert!(storage.load().unwrap().is_some_and(|raw| raw.contains("tok1")));
        // The dashboard route is now let through
        assert_eq!(
            GuardState::evaluate(session.has_hydrated(), session.token()),
            GuardState::Authenticated
        );
    }

    #[test]
    fn test_enrolled_user_regains_face_flag_after_fresh_login() {
        let mut session = SessionStore::new(MemoryStorage::new("userStore"));
        session.hydrate();
        let api = ApiClient::new("http://localhost:5001");

        complete_login(&api, &mut session, login_data(2, "tok2"));
        assert!(!session.has_registered_faces());

        record_listing(&mut session, 2);
        assert!(session.has_registered_faces());
    }
}
