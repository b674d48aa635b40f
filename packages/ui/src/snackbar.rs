//! Transient notifications shown in the top-right corner.

use api::ApiError;
use dioxus::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    fn class(self) -> &'static str {
        match self {
            Severity::Success => "bg-green-600 text-white",
            Severity::Info => "bg-blue-600 text-white",
            Severity::Warning => "bg-amber-500 text-white",
            Severity::Error => "bg-red-600 text-white",
        }
    }
}

/// One notification. Validation failures carry one line per message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub lines: Vec<String>,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            lines: vec![message.into()],
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Notification for a failed request, `None` when it was canceled.
    ///
    /// Transport and decode failures show `fallback`; service answers show
    /// the service's own message.
    pub fn from_error(err: &ApiError, fallback: &str) -> Option<Self> {
        match err {
            ApiError::Canceled => None,
            ApiError::Validation { messages } if !messages.is_empty() => Some(Self {
                severity: Severity::Error,
                lines: messages.clone(),
            }),
            ApiError::Network(_) | ApiError::Decode(_) | ApiError::Validation { .. } => {
                Some(Self::error(fallback))
            }
            _ => Some(Self::error(err.user_message().unwrap_or_else(|| fallback.to_string()))),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SnackbarState {
    pub current: Option<Notification>,
    serial: u64,
}

/// Handle for showing notifications from any component.
#[derive(Clone, Copy)]
pub struct Snackbar {
    state: Signal<SnackbarState>,
}

const AUTO_HIDE_MS: u32 = 2000;

impl Snackbar {
    pub fn show(&self, notification: Notification) {
        let mut state = self.state;
        let serial = {
            let mut state = state.write();
            state.serial += 1;
            state.current = Some(notification);
            state.serial
        };

        #[cfg(target_arch = "wasm32")]
        spawn(async move {
            gloo_timers::future::TimeoutFuture::new(AUTO_HIDE_MS).await;
            if state.peek().serial == serial {
                state.write().current = None;
            }
        });
        #[cfg(not(target_arch = "wasm32"))]
        let _ = (serial, AUTO_HIDE_MS);
    }

    /// Show the notification for `err` unless the request was canceled.
    pub fn show_error(&self, err: &ApiError, fallback: &str) {
        if let Some(notification) = Notification::from_error(err, fallback) {
            self.show(notification);
        }
    }

    pub fn dismiss(&self) {
        let mut state = self.state;
        state.write().current = None;
    }
}

pub fn use_snackbar() -> Snackbar {
    use_context::<Snackbar>()
}

/// Provides [`use_snackbar`] to the tree and renders the active notification.
#[component]
pub fn SnackbarProvider(children: Element) -> Element {
    let state = use_signal(SnackbarState::default);
    let snackbar = use_context_provider(|| Snackbar { state });

    let current = state
        .read()
        .current
        .as_ref()
        .map(|n| (n.severity.class(), n.lines.clone()));

    rsx! {
        {children}

        if let Some((tone, lines)) = current {
            div {
                class: "fixed top-4 right-4 z-50 flex items-start gap-3 max-w-sm px-4 py-3 rounded shadow-lg text-sm {tone}",
                role: "alert",
                if lines.len() > 1 {
                    ul {
                        class: "list-disc pl-4",
                        for line in lines {
                            li { "{line}" }
                        }
                    }
                } else {
                    span { {lines.into_iter().next().unwrap_or_default()} }
                }
                button {
                    class: "ml-auto opacity-80 hover:opacity-100",
                    onclick: move |_| snackbar.dismiss(),
                    "×"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canceled_requests_are_not_notified() {
        assert_eq!(Notification::from_error(&ApiError::Canceled, "Login failed"), None);
    }

    #[test]
    fn test_validation_messages_become_lines() {
        let err = ApiError::Validation {
            messages: vec!["email is required".into(), "password is required".into()],
        };
        let notification = Notification::from_error(&err, "Login failed").unwrap();
        assert_eq!(notification.severity, Severity::Error);
        assert_eq!(notification.lines.len(), 2);
    }

    #[test]
    fn test_transport_failures_use_fallback() {
        let err = ApiError::Network("connection refused".into());
        let notification = Notification::from_error(&err, "Login failed, please try again").unwrap();
        assert_eq!(notification.lines, ["Login failed, please try again"]);
    }

    #[test]
    fn test_service_message_is_shown() {
        let err = ApiError::Rejected {
            message: "Invalid credentials".into(),
        };
        let notification = Notification::from_error(&err, "Login failed").unwrap();
        assert_eq!(notification.lines, ["Invalid credentials"]);
    }
}
