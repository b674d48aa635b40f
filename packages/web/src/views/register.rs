//! Account registration.

use api::RegisterRequest;
use dioxus::prelude::*;
use ui::components::{Button, TextField};
use ui::{use_api, use_cancel_token, use_snackbar, InFlight, Notification, BUSY_MESSAGE};

use crate::Route;

#[component]
pub fn Register() -> Element {
    let api = use_api();
    let snackbar = use_snackbar();
    let nav = use_navigator();
    let cancel = use_cancel_token();
    let in_flight = use_hook(InFlight::new);

    let mut email = use_signal(String::new);
    let mut full_name = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut loading = use_signal(|| false);

    let handle_register = move |evt: FormEvent| {
        evt.prevent_default();
        let Some(guard) = in_flight.try_begin() else {
            snackbar.show(Notification::info(BUSY_MESSAGE));
            return;
        };

        let request = RegisterRequest {
            email: email().trim().to_string(),
            full_name: full_name().trim().to_string(),
            password: password(),
        };
        if request.email.is_empty() || request.full_name.is_empty() || request.password.is_empty() {
            snackbar.show(Notification::warning("Please fill in every field"));
            return;
        }
        if request.password != confirm_password() {
            snackbar.show(Notification::warning("Passwords must match"));
            return;
        }

        let api = api.clone();
        let cancel = cancel.clone();
        spawn(async move {
            let _guard = guard;
            loading.set(true);
            let result = cancel.run(api.register(&request)).await;
            loading.set(false);

            match result {
                Ok(_) => {
                    snackbar.show(Notification::success("Registration succeeded, please sign in"));
                    nav.replace(Route::Login {});
                }
                Err(err) => snackbar.show_error(&err, "Registration failed, please try again"),
            }
        });
    };

    rsx! {
        div {
            class: "mb-4",
            h2 { class: "text-lg font-semibold text-neutral-800", "Create an account" }
        }

        form {
            class: "flex flex-col gap-3",
            novalidate: true,
            onsubmit: handle_register,

            TextField {
                label: "Email",
                r#type: "email",
                value: email(),
                oninput: move |v| email.set(v),
            }
            TextField {
                label: "Full name",
                value: full_name(),
                oninput: move |v| full_name.set(v),
            }
            TextField {
                label: "Password",
                r#type: "password",
                value: password(),
                oninput: move |v| password.set(v),
            }
            TextField {
                label: "Confirm password",
                r#type: "password",
                value: confirm_password(),
                oninput: move |v| confirm_password.set(v),
            }

            Button {
                class: "w-full",
                r#type: "submit",
                disabled: loading(),
                if loading() { "Registering..." } else { "Register" }
            }
        }

        p {
            class: "mt-6 text-center text-sm text-neutral-600",
            "Already have an account? "
            Link { class: "text-blue-600", to: Route::Login {}, "Sign in" }
        }
    }
}
