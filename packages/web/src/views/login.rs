//! Login page with email and password.

use api::LoginRequest;
use dioxus::prelude::*;
use ui::components::{Button, TextField};
use ui::{
    complete_login, use_api, use_cancel_token, use_session, use_snackbar, InFlight, Notification,
    BUSY_MESSAGE,
};

use crate::Route;

#[component]
pub fn Login() -> Element {
    let mut session = use_session();
    let api = use_api();
    let snackbar = use_snackbar();
    let nav = use_navigator();
    let cancel = use_cancel_token();
    let in_flight = use_hook(InFlight::new);

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut show_password = use_signal(|| false);
    let mut loading = use_signal(|| false);

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        let Some(guard) = in_flight.try_begin() else {
            snackbar.show(Notification::info(BUSY_MESSAGE));
            return;
        };

        let request = LoginRequest {
            email: email().trim().to_string(),
            password: password(),
        };
        if request.email.is_empty() || request.password.is_empty() {
            snackbar.show(Notification::warning("Please enter your email and password"));
            return;
        }

        let api = api.clone();
        let cancel = cancel.clone();
        spawn(async move {
            let _guard = guard;
            loading.set(true);
            let result = cancel.run(api.login(&request)).await;
            loading.set(false);

            match result {
                Ok(data) => {
                    complete_login(&api, &mut *session.write(), data);
                    nav.push(Route::Dashboard {});
                }
                Err(err) => snackbar.show_error(&err, "Login failed, please try again"),
            }
        });
    };

    rsx! {
        div {
            class: "mb-4",
            h2 { class: "text-lg font-semibold text-neutral-800", "Hello," }
            p { class: "text-neutral-600", "Welcome back" }
        }

        form {
            class: "flex flex-col gap-3",
            novalidate: true,
            onsubmit: handle_login,

            TextField {
                label: "Email",
                r#type: "email",
                value: email(),
                oninput: move |v| email.set(v),
            }

            TextField {
                label: "Password",
                r#type: if show_password() { "text".to_string() } else { "password".to_string() },
                value: password(),
                oninput: move |v| password.set(v),
            }

            div {
                class: "flex items-center justify-between text-sm",
                label {
                    class: "flex items-center gap-2 text-neutral-600",
                    input {
                        r#type: "checkbox",
                        checked: show_password(),
                        onchange: move |evt: FormEvent| show_password.set(evt.checked()),
                    }
                    "Show password"
                }
                Link { class: "text-blue-600", to: Route::ForgotPassword {}, "Forgot password?" }
            }

            Button {
                class: "w-full",
                r#type: "submit",
                disabled: loading(),
                if loading() { "Signing in..." } else { "Sign in" }
            }
        }

        p {
            class: "mt-6 text-center text-sm text-neutral-600",
            "Don't have an account? "
            Link { class: "text-blue-600", to: Route::Register {}, "Register" }
        }
    }
}
