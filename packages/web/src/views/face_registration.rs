//! Face enrollment: collect up to three snapshots, then upload them together.

use api::{upload_stamp, ApiClient, CancelToken, CapturedImage};
use dioxus::prelude::*;
use ui::capture::{record_listing, record_registration};
use ui::components::{Banner, Button, ButtonVariant};
use ui::{
    read_selected, use_api, use_cancel_token, use_session, use_snackbar, Camera, CaptureError,
    CaptureQueue, InFlight, Notification, ObjectUrl, SessionContext, BUSY_MESSAGE, GATE_NOTICE,
};

const FILE_INPUT_ID: &str = "face-registration-files";

/// Refresh the enrolled-face previews. Replacing the list revokes the old
/// object URLs.
async fn load_registered(
    api: ApiClient,
    cancel: CancelToken,
    mut session: SessionContext,
    mut previews: Signal<Vec<ObjectUrl>>,
) {
    let faces = match cancel.run(api.registered_faces()).await {
        Ok(faces) => faces,
        Err(err) => {
            if !err.is_canceled() {
                tracing::warn!("Listing registered faces failed: {err}");
            }
            return;
        }
    };
    record_listing(&mut *session.write(), faces.len());

    let mut urls = Vec::with_capacity(faces.len());
    for face in &faces {
        match cancel.run(api.registered_face_content(&face.id)).await {
            Ok(content) => match ObjectUrl::new(&content.content_type, &content.bytes) {
                Ok(url) => urls.push(url),
                Err(e) => tracing::warn!("Preview for face {} failed: {e}", face.id),
            },
            Err(err) if err.is_canceled() => return,
            Err(err) => tracing::warn!("Loading face {} failed: {err}", face.id),
        }
    }
    previews.set(urls);
}

#[component]
pub fn FaceRegistration() -> Element {
    let mut session = use_session();
    let api = use_api();
    let snackbar = use_snackbar();
    let cancel = use_cancel_token();
    let in_flight = use_hook(InFlight::new);

    let mut queue = use_signal(CaptureQueue::default);
    let previews = use_signal(Vec::<ObjectUrl>::new);
    let mut camera_open = use_signal(|| false);
    let mut uploading = use_signal(|| false);

    {
        let api = api.clone();
        let cancel = cancel.clone();
        use_effect(move || {
            spawn(load_registered(api.clone(), cancel.clone(), session, previews));
        });
    }

    let on_capture = move |image: CapturedImage| {
        if let Err(err) = queue.write().push(image) {
            snackbar.show(Notification::warning(err.to_string()));
        }
    };

    let on_files = move |_: FormEvent| {
        spawn(async move {
            let files = match read_selected(FILE_INPUT_ID).await {
                Ok(files) => files,
                Err(e) => {
                    snackbar.show(Notification::error(e));
                    return;
                }
            };
            match queue.write().add_files(files) {
                Ok(skipped) if !skipped.is_empty() => snackbar.show(Notification {
                    severity: ui::Severity::Warning,
                    lines: skipped.iter().map(CaptureError::to_string).collect(),
                }),
                Ok(_) => {}
                Err(err) => snackbar.show(Notification::warning(err.to_string())),
            }
        });
    };

    let register = {
        let api = api.clone();
        let cancel = cancel.clone();
        move |_: MouseEvent| {
            if queue.peek().is_empty() {
                return;
            }
            let Some(guard) = in_flight.try_begin() else {
                snackbar.show(Notification::info(BUSY_MESSAGE));
                return;
            };
            let images = queue.peek().images().to_vec();
            let api = api.clone();
            let cancel = cancel.clone();
            spawn(async move {
                let _guard = guard;
                uploading.set(true);
                let stamp = upload_stamp();
                let result = cancel.run(api.register_faces(&images, &stamp)).await;
                uploading.set(false);

                record_registration(&mut *session.write(), result.is_ok());
                match result {
                    Ok(outcome) => {
                        queue.write().remove_uploaded(&images);
                        snackbar.show(Notification::success(
                            outcome.message.unwrap_or_else(|| "Faces registered".to_string()),
                        ));
                        load_registered(api, cancel, session, previews).await;
                    }
                    Err(err) => snackbar.show_error(&err, "Face registration failed, please try again"),
                }
            });
        }
    };

    let context_opened = session.read().context_opened();
    let has_faces = session.read().has_registered_faces();
    let thumbnails: Vec<String> = queue.read().images().iter().map(|i| i.to_data_url()).collect();
    let enrolled: Vec<String> = previews.read().iter().map(|u| u.as_str().to_string()).collect();
    let queue_full = queue.read().is_full();
    let max_images = queue.read().max();
    let camera_label = if camera_open() { "Close camera" } else { "Open camera" };

    rsx! {
        div {
            class: "flex flex-col gap-4 max-w-4xl",

            if !context_opened {
                Banner { warning: true, "{GATE_NOTICE}" }
            }

            if has_faces {
                Banner { "Your face is registered. Uploading new images adds to your enrollment." }
            } else {
                Banner { warning: true, "You have not registered your face yet." }
            }

            if !enrolled.is_empty() {
                div {
                    class: "grid grid-cols-3 gap-3",
                    for src in enrolled {
                        img { class: "h-48 w-full object-contain rounded bg-neutral-100", src: "{src}" }
                    }
                }
            }

            Banner {
                p { "For good results:" }
                ul {
                    class: "list-disc pl-5",
                    li { "Make sure your face is clearly visible" }
                    li { "Remove accessories covering your face" }
                    li { "Use good lighting" }
                }
            }

            div {
                class: "flex gap-3",
                Button {
                    onclick: move |_| camera_open.toggle(),
                    "{camera_label}"
                }
                label {
                    class: "px-4 py-2 rounded text-sm font-medium bg-white border border-neutral-300 cursor-pointer",
                    r#for: FILE_INPUT_ID,
                    "Choose from files"
                }
                input {
                    id: FILE_INPUT_ID,
                    class: "hidden",
                    r#type: "file",
                    accept: "image/jpeg",
                    multiple: true,
                    disabled: uploading(),
                    onchange: on_files,
                }
            }

            if camera_open() {
                Camera {
                    on_capture,
                    disabled: queue_full || uploading(),
                    label: "Take picture",
                }
            }

            p { class: "text-sm text-neutral-600", "{thumbnails.len()} of {max_images} images" }

            div {
                class: "grid grid-cols-3 gap-3",
                for (idx, src) in thumbnails.into_iter().enumerate() {
                    div {
                        key: "{idx}",
                        class: "flex flex-col gap-2",
                        img { class: "h-40 w-full object-cover rounded", src: "{src}" }
                        Button {
                            variant: ButtonVariant::Secondary,
                            disabled: uploading(),
                            onclick: move |_| {
                                queue.write().remove(idx);
                            },
                            "Remove"
                        }
                    }
                }
            }

            Button {
                class: "self-start",
                disabled: uploading() || queue.read().is_empty(),
                onclick: register,
                if uploading() { "Registering..." } else { "Register faces" }
            }
        }
    }
}
