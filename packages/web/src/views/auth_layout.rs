//! Centered card shared by the login, register and forgot-password pages.

use dioxus::prelude::*;

use crate::Route;

#[component]
pub fn AuthLayout() -> Element {
    rsx! {
        div {
            class: "flex flex-col items-center justify-center min-h-screen p-8 bg-neutral-100",

            h1 {
                class: "mb-6 text-neutral-800 font-bold text-[1.75rem]",
                "Attendance App"
            }

            div {
                class: "w-full max-w-[360px] p-6 bg-white rounded shadow",
                Outlet::<Route> {}
            }
        }
    }
}
