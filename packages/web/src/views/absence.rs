//! Attendance check-in by face verification.

use api::{upload_stamp, CapturedImage};
use dioxus::prelude::*;
use ui::components::Banner;
use ui::{
    sync_registered_faces, use_api, use_cancel_token, use_session, use_snackbar,
    AttendanceCapture, Camera, Notification, GATE_NOTICE,
};

use crate::Route;

#[component]
pub fn Absence() -> Element {
    let session = use_session();
    let api = use_api();
    let snackbar = use_snackbar();
    let cancel = use_cancel_token();

    let mut capture = use_signal(AttendanceCapture::default);
    let mut syncing = use_signal(|| true);

    // The flag may be stale after a fresh login; ask the service.
    {
        let api = api.clone();
        let cancel = cancel.clone();
        use_effect(move || {
            let api = api.clone();
            let cancel = cancel.clone();
            spawn(async move {
                sync_registered_faces(&api, &cancel, session).await;
                syncing.set(false);
            });
        });
    }

    let on_capture = move |image: CapturedImage| {
        // One frame at a time; extra clicks while verifying are dropped.
        let frame = match capture.write().capture(image) {
            Ok(frame) => frame.clone(),
            Err(_) => return,
        };
        let api = api.clone();
        let cancel = cancel.clone();
        spawn(async move {
            let result = cancel.run(api.verify_face(&frame, &upload_stamp())).await;
            capture.write().settle();
            match result {
                Ok(outcome) => {
                    tracing::info!(data = ?outcome.data, "Face verified");
                    snackbar.show(Notification::success(
                        outcome.message.unwrap_or_else(|| "Attendance recorded".to_string()),
                    ));
                }
                Err(err) => snackbar.show_error(&err, "Face verification failed, please try again"),
            }
        });
    };

    let context_opened = session.read().context_opened();
    let has_faces = session.read().has_registered_faces();
    let verifying = capture.read().is_verifying();
    let frame_src = capture.read().frame().map(CapturedImage::to_data_url);

    rsx! {
        div {
            class: "flex flex-col gap-4 max-w-3xl",

            if !context_opened {
                Banner {
                    warning: true,
                    "{GATE_NOTICE} "
                    Link { class: "underline", to: Route::Profile {}, "Open it on your profile" }
                }
            }

            if has_faces {
                div {
                    class: "flex flex-col items-center gap-4 p-4 bg-white rounded border border-neutral-200",
                    div {
                        class: "relative",
                        if let Some(src) = frame_src {
                            img { class: "w-[640px] h-[480px] object-contain", src: "{src}" }
                            div {
                                class: "absolute inset-0 flex items-center justify-center bg-black/75",
                                div { class: "h-16 w-16 rounded-full border-4 border-white border-t-transparent animate-spin" }
                            }
                        } else {
                            Camera {
                                on_capture,
                                disabled: verifying,
                                label: "Check in",
                            }
                        }
                    }
                }
            } else if syncing() {
                div { class: "h-12 rounded bg-neutral-200 animate-pulse" }
            } else {
                Banner {
                    warning: true,
                    "You have not registered your face yet. "
                    Link { class: "underline", to: Route::FaceRegistration {}, "Register it here" }
                }
            }
        }
    }
}
