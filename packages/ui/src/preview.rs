//! Image previews for bytes fetched from the service.

/// A URL an `<img>` can show. In the browser this is a blob object URL,
/// revoked when the value is dropped.
#[derive(Debug, PartialEq, Eq)]
pub struct ObjectUrl {
    url: String,
}

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

#[cfg(target_arch = "wasm32")]
impl ObjectUrl {
    pub fn new(content_type: &str, bytes: &[u8]) -> Result<Self, String> {
        use web_sys::{Blob, BlobPropertyBag, Url};

        let array = js_sys::Uint8Array::from(bytes);
        let parts = js_sys::Array::of1(&array);
        let options = BlobPropertyBag::new();
        options.set_type(content_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| format!("{e:?}"))?;
        let url = Url::create_object_url_with_blob(&blob).map_err(|e| format!("{e:?}"))?;
        Ok(Self { url })
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for ObjectUrl {
    fn drop(&mut self) {
        if let Err(e) = web_sys::Url::revoke_object_url(&self.url) {
            tracing::warn!("Failed to revoke object URL: {e:?}");
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ObjectUrl {
    pub fn new(content_type: &str, bytes: &[u8]) -> Result<Self, String> {
        let url = api::CapturedImage::new(content_type, bytes.to_vec()).to_data_url();
        Ok(Self { url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_preview_is_data_url() {
        let url = ObjectUrl::new("image/jpeg", &[0xFF, 0xD8, 0xFF]).unwrap();
        assert_eq!(url.as_str(), "data:image/jpeg;base64,/9j/");
    }
}
