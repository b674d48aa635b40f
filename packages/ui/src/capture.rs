//! Image queues for face registration and attendance check-in.

use api::{CapturedImage, JPEG_MIME, MAX_IMAGE_BYTES};
use store::{SessionStorage, SessionStore};
use thiserror::Error;

/// Images sent in one registration request.
pub const MAX_IMAGES: usize = 3;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("You can only add up to {max} images")]
    QueueFull { max: usize },

    #[error("Only JPEG images are accepted")]
    NotJpeg,

    #[error("{name} is larger than 1 MB")]
    TooLarge { name: String },
}

/// A file picked from the local file input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    fn check(&self) -> Result<(), CaptureError> {
        let is_jpeg = self.content_type == JPEG_MIME
            || (self.content_type.is_empty() && {
                let name = self.name.to_ascii_lowercase();
                name.ends_with(".jpg") || name.ends_with(".jpeg")
            });
        if !is_jpeg {
            return Err(CaptureError::NotJpeg);
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(CaptureError::TooLarge {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// Pending registration images, in capture order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureQueue {
    images: Vec<CapturedImage>,
    max: usize,
}

impl Default for CaptureQueue {
    fn default() -> Self {
        Self::new(MAX_IMAGES)
    }
}

impl CaptureQueue {
    pub fn new(max: usize) -> Self {
        Self {
            images: Vec::with_capacity(max),
            max,
        }
    }

    /// Add one snapshot. A full queue is left unchanged.
    pub fn push(&mut self, image: CapturedImage) -> Result<(), CaptureError> {
        if self.is_full() {
            return Err(CaptureError::QueueFull { max: self.max });
        }
        self.images.push(image);
        Ok(())
    }

    /// Add a batch of selected files.
    ///
    /// A batch that would overflow the queue is rejected as a whole. Files
    /// that are not JPEG or exceed the size limit are skipped; the returned
    /// list says why.
    pub fn add_files(&mut self, files: Vec<SelectedFile>) -> Result<Vec<CaptureError>, CaptureError> {
        if self.images.len() + files.len() > self.max {
            return Err(CaptureError::QueueFull { max: self.max });
        }
        let mut skipped = Vec::new();
        for file in files {
            match file.check() {
                Ok(()) => self.images.push(CapturedImage::new(JPEG_MIME, file.bytes)),
                Err(err) => {
                    tracing::warn!("Skipping {}: {err}", file.name);
                    skipped.push(err);
                }
            }
        }
        Ok(skipped)
    }

    pub fn remove(&mut self, index: usize) -> Option<CapturedImage> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    /// Drop the images a registration upload carried, one occurrence each.
    /// Anything added while the upload was running stays queued.
    pub fn remove_uploaded(&mut self, uploaded: &[CapturedImage]) -> usize {
        let mut removed = 0;
        for image in uploaded {
            if let Some(pos) = self.images.iter().position(|queued| queued == image) {
                self.images.remove(pos);
                removed += 1;
            }
        }
        removed
    }

    pub fn images(&self) -> &[CapturedImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.images.len() >= self.max
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

/// Single-frame attendance capture.
///
/// A frame is held only while its verification request is outstanding.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttendanceCapture {
    frame: Option<CapturedImage>,
}

impl AttendanceCapture {
    /// Hold `image` for verification. Returns it back if a request is
    /// already outstanding.
    pub fn capture(&mut self, image: CapturedImage) -> Result<&CapturedImage, CapturedImage> {
        if self.frame.is_some() {
            return Err(image);
        }
        Ok(&*self.frame.insert(image))
    }

    pub fn is_verifying(&self) -> bool {
        self.frame.is_some()
    }

    pub fn frame(&self) -> Option<&CapturedImage> {
        self.frame.as_ref()
    }

    /// Drop the frame once the request settled, whatever the result.
    pub fn settle(&mut self) {
        self.frame = None;
    }
}

/// Record the result of a registration upload. A failed upload leaves the
/// flag as it was.
pub fn record_registration<S: SessionStorage>(session: &mut SessionStore<S>, succeeded: bool) {
    if succeeded {
        session.set_has_registered_faces(true);
    }
}

/// Record how many faces the service reports as enrolled.
pub fn record_listing<S: SessionStorage>(session: &mut SessionStore<S>, enrolled: usize) {
    let registered = enrolled > 0;
    if session.has_registered_faces() != registered {
        session.set_has_registered_faces(registered);
    }
}
