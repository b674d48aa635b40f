use dioxus::prelude::*;
use ui::components::Banner;
use ui::{sync_registered_faces, use_api, use_cancel_token, use_session, GATE_NOTICE};

use crate::Route;

/// Landing page: who is signed in and which biometric steps are ready.
#[component]
pub fn Dashboard() -> Element {
    let session = use_session();
    let api = use_api();
    let cancel = use_cancel_token();

    use_effect(move || {
        let api = api.clone();
        let cancel = cancel.clone();
        spawn(async move { sync_registered_faces(&api, &cancel, session).await });
    });

    let current = session.read();

    let name = current.user().map(|u| u.display_name().to_string()).unwrap_or_default();
    let email = current.user().map(|u| u.email.clone()).unwrap_or_default();
    let context_opened = current.context_opened();
    let has_faces = current.has_registered_faces();
    drop(current);

    let status = |ready: bool| if ready { "Ready" } else { "Not yet" };
    let context_status = status(context_opened);
    let faces_status = status(has_faces);

    rsx! {
        div {
            class: "flex flex-col gap-6 max-w-3xl",

            div {
                h2 { class: "text-xl font-semibold text-neutral-800", "Welcome, {name}" }
                p { class: "text-sm text-neutral-600", "{email}" }
            }

            if !context_opened {
                Banner { warning: true, "{GATE_NOTICE}" }
            }

            div {
                class: "grid grid-cols-2 gap-4",

                div {
                    class: "p-4 bg-white rounded border border-neutral-200",
                    p { class: "text-sm text-neutral-600", "Encryption context" }
                    p { class: "text-lg font-medium", "{context_status}" }
                    Link { class: "text-sm text-blue-600", to: Route::Profile {}, "Manage in profile" }
                }

                div {
                    class: "p-4 bg-white rounded border border-neutral-200",
                    p { class: "text-sm text-neutral-600", "Registered faces" }
                    p { class: "text-lg font-medium", "{faces_status}" }
                    Link { class: "text-sm text-blue-600", to: Route::FaceRegistration {}, "Register faces" }
                }
            }

            if has_faces {
                Link {
                    class: "self-start px-4 py-2 rounded bg-blue-600 text-white text-sm",
                    to: Route::Absence {},
                    "Check in now"
                }
            }
        }
    }
}
