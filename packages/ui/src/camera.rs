//! Live camera preview with JPEG snapshots.
//!
//! In the browser the stream comes from `getUserMedia` and snapshots are
//! drawn onto an off-screen canvas. Other targets show a notice instead.
//!
//! The permission prompt can outlive the component, so the stream is
//! requested outside the component's task scope and parked in a
//! [`StreamSlot`]. Closing the slot on unmount stops whatever is in it now
//! and whatever arrives later.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use api::CapturedImage;
use dioxus::prelude::*;

static NEXT_CAMERA: AtomicU32 = AtomicU32::new(0);

/// A handle on camera hardware that must be released when done.
pub(crate) trait Release {
    fn release(&self);
}

struct SlotState<T> {
    stream: Option<T>,
    closed: bool,
}

/// The active stream of one camera instance. Clones share the slot.
pub(crate) struct StreamSlot<T> {
    state: Rc<RefCell<SlotState<T>>>,
}

impl<T> Clone for StreamSlot<T> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<T> Default for StreamSlot<T> {
    fn default() -> Self {
        Self {
            state: Rc::new(RefCell::new(SlotState {
                stream: None,
                closed: false,
            })),
        }
    }
}

impl<T: Release> StreamSlot<T> {
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    pub(crate) fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }

    /// Keep `stream` as the active one, releasing any previous stream.
    /// A slot that was already closed releases `stream` at once and
    /// returns `false`.
    pub(crate) fn install(&self, stream: T) -> bool {
        let mut state = self.state.borrow_mut();
        if state.closed {
            stream.release();
            return false;
        }
        if let Some(previous) = state.stream.replace(stream) {
            previous.release();
        }
        true
    }

    pub(crate) fn close(&self) {
        let mut state = self.state.borrow_mut();
        state.closed = true;
        if let Some(stream) = state.stream.take() {
            stream.release();
        }
    }
}

#[component]
pub fn Camera(
    on_capture: EventHandler<CapturedImage>,
    #[props(default)] disabled: bool,
    #[props(default = "Capture".to_string())] label: String,
) -> Element {
    let video_id = use_hook(|| format!("camera-{}", NEXT_CAMERA.fetch_add(1, Ordering::Relaxed)));
    let error = use_signal(|| Option::<String>::None);
    let stream = use_hook(StreamSlot::<platform::Stream>::default);

    {
        let video_id = video_id.clone();
        let stream = stream.clone();
        use_effect(move || {
            platform::open(stream.clone(), video_id.clone(), move |e| {
                tracing::warn!("Camera unavailable: {e}");
                let mut error = error;
                // The component may be gone by the time the prompt is answered
                if let Ok(mut slot) = error.try_write() {
                    *slot = Some(e);
                };
            });
        });
    }

    {
        let stream = stream.clone();
        use_drop(move || stream.close());
    }

    let snapshot_id = video_id.clone();
    let take_snapshot = move |_: MouseEvent| match platform::snapshot(&snapshot_id) {
        Ok(image) => on_capture.call(image),
        Err(e) => {
            tracing::error!("Snapshot failed: {e}");
            let mut error = error;
            error.set(Some(e));
        }
    };

    rsx! {
        div {
            class: "flex flex-col gap-3",

            if let Some(err) = error() {
                div {
                    class: "px-3 py-2 bg-red-50 border border-red-200 rounded text-red-600 text-sm",
                    "{err}"
                }
            }

            video {
                id: "{video_id}",
                class: "w-full max-w-md rounded bg-black",
                autoplay: true,
                playsinline: true,
                muted: true,
            }

            button {
                class: "px-4 py-2 rounded bg-blue-600 text-white disabled:opacity-50",
                r#type: "button",
                disabled: disabled || error().is_some(),
                onclick: take_snapshot,
                "{label}"
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod platform {
    use api::{CapturedImage, JPEG_MIME};
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
        MediaStreamConstraints, MediaStreamTrack,
    };

    use super::{Release, StreamSlot};

    fn js_err(e: JsValue) -> String {
        e.as_string().unwrap_or_else(|| format!("{e:?}"))
    }

    fn video_element(id: &str) -> Result<HtmlVideoElement, String> {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
            .ok_or_else(|| format!("video element {id} not found"))?
            .dyn_into::<HtmlVideoElement>()
            .map_err(|_| format!("{id} is not a video element"))
    }

    pub type Stream = MediaStream;

    impl Release for MediaStream {
        fn release(&self) {
            for track in self.get_tracks().iter() {
                if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                    track.stop();
                }
            }
        }
    }

    /// Request the camera on a task of its own, so a pending permission
    /// prompt survives the component. `on_error` is not called once the slot
    /// has been closed.
    pub fn open(
        slot: StreamSlot<MediaStream>,
        video_id: String,
        on_error: impl FnOnce(String) + 'static,
    ) {
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = start(&slot, &video_id).await {
                if !slot.is_closed() {
                    on_error(e);
                }
            }
        });
    }

    async fn start(slot: &StreamSlot<MediaStream>, video_id: &str) -> Result<(), String> {
        if slot.is_closed() {
            return Ok(());
        }
        let window = web_sys::window().ok_or("no window")?;
        let devices = window.navigator().media_devices().map_err(js_err)?;
        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&JsValue::TRUE);
        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(js_err)?;
        let stream: MediaStream = JsFuture::from(promise)
            .await
            .map_err(|e| format!("Camera permission denied: {}", js_err(e)))?
            .dyn_into()
            .map_err(js_err)?;

        if !slot.install(stream.clone()) {
            tracing::debug!("Camera closed before the stream arrived");
            return Ok(());
        }
        let video = video_element(video_id)?;
        video.set_src_object(Some(&stream));
        if let Err(e) = video.play() {
            tracing::debug!("Autoplay refused: {}", js_err(e));
        }
        Ok(())
    }

    pub fn snapshot(video_id: &str) -> Result<CapturedImage, String> {
        let video = video_element(video_id)?;
        let (width, height) = (video.video_width(), video.video_height());
        if width == 0 || height == 0 {
            return Err("Camera is not ready yet".to_string());
        }

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| "canvas element expected".to_string())?;
        canvas.set_width(width);
        canvas.set_height(height);

        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or("2d context unavailable")?
            .dyn_into()
            .map_err(|_| "2d context expected".to_string())?;
        context
            .draw_image_with_html_video_element(&video, 0.0, 0.0)
            .map_err(js_err)?;

        let url = canvas.to_data_url_with_type(JPEG_MIME).map_err(js_err)?;
        CapturedImage::from_data_url(&url).map_err(|e| e.to_string())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod platform {
    use api::CapturedImage;

    use super::{Release, StreamSlot};

    const UNSUPPORTED: &str = "Camera capture is only available in the browser";

    pub struct Stream;

    impl Release for Stream {
        fn release(&self) {}
    }

    pub fn open(_slot: StreamSlot<Stream>, _video_id: String, on_error: impl FnOnce(String) + 'static) {
        on_error(UNSUPPORTED.to_string());
    }

    pub fn snapshot(_video_id: &str) -> Result<CapturedImage, String> {
        Err(UNSUPPORTED.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[derive(Clone, Default)]
    struct FakeStream(Rc<Cell<bool>>);

    impl FakeStream {
        fn released(&self) -> bool {
            self.0.get()
        }
    }

    impl Release for FakeStream {
        fn release(&self) {
            self.0.set(true);
        }
    }

    #[test]
    fn test_close_releases_active_stream() {
        let slot = StreamSlot::default();
        let stream = FakeStream::default();

        assert!(slot.install(stream.clone()));
        assert!(!stream.released());

        slot.close();
        assert!(stream.released());
        assert!(slot.is_closed());
    }

    #[test]
    fn test_stream_arriving_after_unmount_is_released() {
        let slot = StreamSlot::<FakeStream>::default();
        // Unmounted while the permission prompt was still open
        slot.clone().close();

        let late = FakeStream::default();
        assert!(!slot.install(late.clone()));
        assert!(late.released());
    }

    #[test]
    fn test_new_stream_replaces_and_releases_previous() {
        let slot = StreamSlot::default();
        let first = FakeStream::default();
        let second = FakeStream::default();

        slot.install(first.clone());
        slot.install(second.clone());
        assert!(first.released());
        assert!(!second.released());
    }
}
