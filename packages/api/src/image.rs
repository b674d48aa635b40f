//! # Captured images and upload naming
//!
//! Camera snapshots arrive as `data:image/jpeg;base64,...` URLs and selected
//! files arrive as raw bytes. Both end up as a [`CapturedImage`] that can be
//! previewed (via [`CapturedImage::to_data_url`]) and uploaded as a multipart
//! part.
//!
//! Upload file names follow the service convention:
//!
//! | Upload | Field | File name |
//! |--------|-------|-----------|
//! | Face registration | `images` | `<stamp>_<index>.jpg` |
//! | Attendance verification | `captured_image` | `<stamp>_face_verify.jpg` |
//!
//! where `<stamp>` is [`upload_stamp`], the local time as `%Y-%m-%d_%H-%M-%S`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

/// MIME type of every image the service accepts.
pub const JPEG_MIME: &str = "image/jpeg";

/// Per-file size limit enforced by the service.
pub const MAX_IMAGE_BYTES: usize = 1024 * 1024;

#[derive(Debug, Error, PartialEq)]
pub enum DataUrlError {
    #[error("data URL has no payload")]
    MissingPayload,

    #[error("data URL is not base64 encoded")]
    NotBase64,

    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// A decoded image ready for preview or upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl CapturedImage {
    pub fn new(mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.into(),
            bytes,
        }
    }

    /// Parse `data:<mime>;base64,<payload>`. A bare base64 string is taken
    /// as a JPEG payload.
    pub fn from_data_url(url: &str) -> Result<Self, DataUrlError> {
        let (mime, payload) = match url.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest.split_once(',').ok_or(DataUrlError::MissingPayload)?;
                let mime = header
                    .strip_suffix(";base64")
                    .ok_or(DataUrlError::NotBase64)?;
                let mime = if mime.is_empty() { JPEG_MIME } else { mime };
                (mime, payload)
            }
            None => (JPEG_MIME, url),
        };
        if payload.is_empty() {
            return Err(DataUrlError::MissingPayload);
        }
        Ok(Self::new(mime, STANDARD.decode(payload.trim())?))
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    pub fn is_jpeg(&self) -> bool {
        self.mime == JPEG_MIME
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Local time formatted for upload file names.
pub fn upload_stamp() -> String {
    chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// One file part of a multipart upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadPart {
    pub field: &'static str,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Parts for `POST /face-verification/register-faces`.
pub fn registration_parts(images: &[CapturedImage], stamp: &str) -> Vec<UploadPart> {
    images
        .iter()
        .enumerate()
        .map(|(idx, image)| UploadPart {
            field: "images",
            file_name: format!("{stamp}_{idx}.jpg"),
            mime: image.mime.clone(),
            bytes: image.bytes.clone(),
        })
        .collect()
}

/// Part for `POST /face-verification`.
pub fn verification_part(image: &CapturedImage, stamp: &str) -> UploadPart {
    UploadPart {
        field: "captured_image",
        file_name: format!("{stamp}_face_verify.jpg"),
        mime: image.mime.clone(),
        bytes: image.bytes.clone(),
    }
}
