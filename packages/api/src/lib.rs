//! # API crate: typed client for the attendance service
//!
//! Every page of the web client talks to the attendance service through the
//! [`ApiClient`] defined here. The service proxies to the attendance backend
//! and owns all face matching, encryption and storage; this crate only shapes
//! requests and classifies responses.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | `ApiClient`: base URL, shared bearer token, the one-time 401 hook, the response interceptor |
//! | [`auth`] | `/auth/register`, `/auth/login`, `/auth/logout` |
//! | [`user_profile`] | Profile updates and the encryption-context endpoints |
//! | [`faces`] | Face enrollment (multipart), enrolled previews, attendance verification |
//! | [`cancel`] | `CancelToken`, aborting a view's requests when it unmounts |
//! | [`image`] | Data-URL decoding and upload file naming |
//! | [`error`] | `ApiError`, the error taxonomy every call returns |
//!
//! ## Error taxonomy
//!
//! - **422** → [`ApiError::Validation`], field messages flattened into one list
//! - **401** → [`ApiError::Unauthorized`], after the unauthorized hook ran
//! - **aborted** → [`ApiError::Canceled`], never shown to the user
//! - **other** → [`ApiError::Server`] / [`ApiError::Rejected`] with the best
//!   message found in the body, or `"Server Error."`
//!
//! Nothing is retried; the user resubmits.

pub mod auth;
pub mod cancel;
pub mod client;
pub mod envelope;
pub mod error;
pub mod faces;
pub mod image;
pub mod user_profile;

pub use auth::{LoginData, LoginRequest, RegisterRequest};
pub use cancel::CancelToken;
pub use client::ApiClient;
pub use envelope::{Accepted, ApiResponse};
pub use error::ApiError;
pub use faces::{FaceContent, FaceId, RegisteredFace, UploadOutcome};
pub use image::{upload_stamp, CapturedImage, DataUrlError, JPEG_MIME, MAX_IMAGE_BYTES};
pub use user_profile::ProfileUpdate;
