//! HTTP client for the attendance service.
//!
//! Wraps the service's REST endpoints using [`reqwest`], which compiles to
//! `fetch` on WebAssembly. One [`ApiClient`] is created at start-up and shared
//! by cloning; clones share the bearer token and the unauthorized hook.

use std::cell::{OnceCell, RefCell};
use std::rc::Rc;

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::envelope::{Accepted, ApiResponse};
use crate::error::ApiError;
use crate::image::UploadPart;

type UnauthorizedHook = Rc<dyn Fn()>;

#[derive(Default)]
struct Shared {
    bearer: RefCell<Option<String>>,
    unauthorized: OnceCell<UnauthorizedHook>,
}

/// Client for one attendance service instance.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    shared: Rc<Shared>,
}

impl ApiClient {
    /// Create a client for the service at `base_url`, e.g. `http://host:5001`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            shared: Rc::default(),
        }
    }

    /// Create a client from the client configuration.
    pub fn from_config(config: &store::ServiceConfig) -> Self {
        Self::new(config.base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Install or remove the `Authorization: Bearer` header sent with every
    /// subsequent request.
    pub fn set_bearer(&self, token: Option<String>) {
        let mut bearer = self.shared.bearer.borrow_mut();
        if *bearer != token {
            debug!(present = token.is_some(), "Bearer token changed");
            *bearer = token;
        }
    }

    pub fn bearer(&self) -> Option<String> {
        self.shared.bearer.borrow().clone()
    }

    /// Install the global 401 handler. Only the first call takes effect;
    /// later calls return `false` and keep the original hook.
    pub fn install_unauthorized_hook(&self, hook: impl Fn() + 'static) -> bool {
        let installed = self.shared.unauthorized.set(Rc::new(hook)).is_ok();
        if installed {
            info!("Unauthorized hook installed");
        }
        installed
    }

    /// Classify a failed response and run the unauthorized hook on 401.
    ///
    /// Every non-2xx response passes through here exactly once.
    pub fn intercept_failure(&self, status: u16, body: &[u8]) -> ApiError {
        let err = ApiError::from_status(status, body);
        if err.is_unauthorized() {
            info!("Service answered 401, ending session");
            self.set_bearer(None);
            if let Some(hook) = self.shared.unauthorized.get() {
                hook();
            }
        }
        err
    }

    // ---- crate-private request helpers ----

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "Sending request");
        let builder = self.http.request(method, url);
        match self.shared.bearer.borrow().as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and pass the response through the failure interceptor.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(self.intercept_failure(status.as_u16(), &body))
    }

    /// Send and decode the JSON envelope.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Accepted<T>, ApiError> {
        let response = self.send(builder).await?;
        let envelope: ApiResponse<T> = response.json().await?;
        envelope.into_result()
    }
}

/// Build a multipart form from upload parts.
pub(crate) fn multipart_form(parts: Vec<UploadPart>) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for part in parts {
        let file = Part::bytes(part.bytes)
            .file_name(part.file_name)
            .mime_str(&part.mime)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        form = form.part(part.field, file);
    }
    Ok(form)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_hook_installs_once() {
        let client = ApiClient::new("http://localhost:5001/");
        assert_eq!(client.base_url(), "http://localhost:5001");

        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let counter = Rc::clone(&first);
        assert!(client.install_unauthorized_hook(move || counter.set(counter.get() + 1)));
        let counter = Rc::clone(&second);
        assert!(!client
            .clone()
            .install_unauthorized_hook(move || counter.set(counter.get() + 1)));

        client.intercept_failure(401, b"{}");
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 0);
    }

    #[test]
    fn test_401_fires_hook_once_per_response() {
        let client = ApiClient::new("http://localhost:5001");
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        client.install_unauthorized_hook(move || counter.set(counter.get() + 1));
        client.set_bearer(Some("tok".into()));

        let err = client.intercept_failure(401, br#"{"message": "expired"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(fired.get(), 1);
        assert!(client.bearer().is_none());

        // Other failures leave the session alone
        client.set_bearer(Some("tok".into()));
        client.intercept_failure(500, b"{}");
        client.intercept_failure(422, b"{}");
        assert_eq!(fired.get(), 1);
        assert_eq!(client.bearer().as_deref(), Some("tok"));

        client.intercept_failure(401, b"");
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn test_bearer_is_shared_between_clones() {
        let client = ApiClient::new("http://localhost:5001");
        let clone = client.clone();
        client.set_bearer(Some("tok1".into()));
        assert_eq!(clone.bearer().as_deref(), Some("tok1"));
    }

    #[test]
    fn test_request_carries_bearer() {
        let client = ApiClient::new("http://localhost:5001");
        client.set_bearer(Some("tok1".into()));
        let request = client.request(Method::GET, "/user-profile/check-saved-context-key").build().unwrap();

        assert_eq!(
            request.url().as_str(),
            "http://localhost:5001/user-profile/check-saved-context-key"
        );
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer tok1"
        );

        client.set_bearer(None);
        let request = client.request(Method::GET, "/auth/logout").build().unwrap();
        assert!(request.headers().get("authorization").is_none());
    }
}
