//! Sidebar shell for the signed-in pages, behind the auth guard.

use dioxus::prelude::*;
use ui::components::{Button, ButtonVariant};
use ui::{use_api, use_cancel_token, use_session, use_snackbar, AuthGuard, InFlight};

use crate::Route;

#[component]
pub fn MainLayout() -> Element {
    let nav = use_navigator();

    rsx! {
        AuthGuard {
            on_anonymous: move |_| {
                nav.replace(Route::Login {});
            },
            Shell {}
        }
    }
}

#[component]
fn Shell() -> Element {
    let mut session = use_session();
    let api = use_api();
    let snackbar = use_snackbar();
    let nav = use_navigator();
    let cancel = use_cancel_token();
    let in_flight = use_hook(InFlight::new);
    let route = use_route::<Route>();

    let greeting = session
        .read()
        .user()
        .map(|u| u.display_name().to_string())
        .unwrap_or_default();

    let logout = move |_: MouseEvent| {
        let Some(guard) = in_flight.try_begin() else {
            return;
        };
        let api = api.clone();
        let cancel = cancel.clone();
        spawn(async move {
            let _guard = guard;
            match cancel.run(api.logout()).await {
                Ok(()) => {
                    session.write().logout();
                    api.set_bearer(None);
                    nav.replace(Route::Login {});
                }
                Err(err) => snackbar.show_error(&err, "Logout failed, please try again"),
            }
        });
    };

    let menu = [
        ("Dashboard", Route::Dashboard {}),
        ("Face Registration", Route::FaceRegistration {}),
        ("Attendance", Route::Absence {}),
        ("Profile", Route::Profile {}),
    ]
    .map(|(title, target)| {
        let class = if route == target {
            "px-4 py-2.5 text-sm bg-neutral-100 font-medium"
        } else {
            "px-4 py-2.5 text-sm text-neutral-700 hover:bg-neutral-50"
        };
        (title, target, class)
    });

    rsx! {
        div {
            class: "flex min-h-screen bg-neutral-50",

            nav {
                class: "flex flex-col w-60 shrink-0 border-r border-neutral-200 bg-white",

                div {
                    class: "px-4 py-5 font-bold text-lg text-neutral-800",
                    "Attendance App"
                }

                for (title, target, class) in menu {
                    Link { class, to: target, "{title}" }
                }

                div {
                    class: "mt-auto flex flex-col gap-2 p-4 border-t border-neutral-200",
                    span { class: "text-sm text-neutral-600", "Hello {greeting}!" }
                    Button {
                        variant: ButtonVariant::Danger,
                        onclick: logout,
                        "Log out"
                    }
                }
            }

            main {
                class: "flex-1 p-6",
                Outlet::<Route> {}
            }
        }
    }
}
