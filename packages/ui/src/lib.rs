//! This crate contains the shared UI and page workflows for the attendance
//! client.
//!
//! Workflow state (guard, context gate, capture queues) lives in plain types
//! so it can be tested without a renderer; the components wire it to
//! signals and context.

use dioxus::prelude::*;

pub const TAILWIND_CSS: Asset = asset!("/assets/tailwind.css");

pub mod components;

mod auth_guard;
pub use auth_guard::{AuthGuard, GuardState};

mod session;
pub use session::{
    complete_login, sync_registered_faces, use_api, use_cancel_token, use_session, SessionContext,
    SessionProvider,
};

pub mod snackbar;
pub use snackbar::{use_snackbar, Notification, Severity, Snackbar, SnackbarProvider};

mod in_flight;
pub use in_flight::{InFlight, InFlightGuard};

pub mod context_gate;
pub use context_gate::{ContextGate, ContextKeyApi, GateOutcome, GateState, BUSY_MESSAGE, GATE_NOTICE};

pub mod capture;
pub use capture::{AttendanceCapture, CaptureError, CaptureQueue, SelectedFile, MAX_IMAGES};

mod file_picker;
pub use file_picker::read_selected;

mod camera;
pub use camera::Camera;

mod preview;
pub use preview::ObjectUrl;
