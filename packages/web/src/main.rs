use dioxus::logger::tracing::Level;
use dioxus::prelude::*;

use store::ServiceConfig;
use views::{
    Absence, AuthLayout, Dashboard, FaceRegistration, ForgotPassword, Login, MainLayout, Profile,
    Register,
};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(AuthLayout)]
        #[route("/auth/login")]
        Login {},
        #[route("/auth/register")]
        Register {},
        #[route("/auth/forgot-password")]
        ForgotPassword {},
    #[end_layout]
    #[layout(MainLayout)]
        #[route("/")]
        Dashboard {},
        #[route("/profile")]
        Profile {},
        #[route("/face-registration")]
        FaceRegistration {},
        #[route("/absence")]
        Absence {},
    #[end_layout]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

fn main() {
    dioxus::logger::init(Level::INFO).ok();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let config = use_hook(|| {
        let config = ServiceConfig::from_env();
        tracing::info!(url = config.base_url(), "Attendance client starting");
        config
    });

    rsx! {
        document::Title { "Attendance App" }
        document::Link { rel: "stylesheet", href: ui::TAILWIND_CSS }
        ui::SessionProvider {
            config,
            ui::SnackbarProvider {
                Router::<Route> {}
            }
        }
    }
}

#[component]
fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        div {
            class: "flex flex-col items-center justify-center min-h-screen gap-3 text-neutral-700",
            h1 { class: "text-2xl font-bold", "Page not found" }
            p { class: "text-sm", "/{path}" }
            Link { class: "text-blue-600", to: Route::Dashboard {}, "Back to dashboard" }
        }
    }
}
