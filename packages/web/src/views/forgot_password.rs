use dioxus::prelude::*;
use ui::components::{Button, TextField};
use ui::{use_snackbar, Notification};

use crate::Route;

/// The service has no reset endpoint yet; the form only records the request.
#[component]
pub fn ForgotPassword() -> Element {
    let snackbar = use_snackbar();
    let mut email = use_signal(String::new);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let address = email().trim().to_string();
        if address.is_empty() {
            snackbar.show(Notification::warning("Please enter your email"));
            return;
        }
        tracing::info!(email = %address, "Password reset requested");
        snackbar.show(Notification::info("Password reset is not available yet, please contact your administrator"));
    };

    rsx! {
        div {
            class: "mb-4",
            h2 { class: "text-lg font-semibold text-neutral-800", "Forgot password" }
        }

        form {
            class: "flex flex-col gap-3",
            novalidate: true,
            onsubmit: handle_submit,

            TextField {
                label: "Email",
                r#type: "email",
                value: email(),
                oninput: move |v| email.set(v),
            }

            Button { class: "w-full", r#type: "submit", "Send" }
        }

        p {
            class: "mt-6 text-center text-sm",
            Link { class: "text-blue-600", to: Route::Login {}, "Back to sign in" }
        }
    }
}
