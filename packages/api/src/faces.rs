//! `/face-verification` endpoints: enrollment, enrolled previews, attendance.

use std::fmt;

use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;

use crate::client::{multipart_form, ApiClient};
use crate::error::ApiError;
use crate::image::{registration_parts, verification_part, CapturedImage};

/// Server-assigned face id; the service has used both numbers and strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum FaceId {
    Number(i64),
    Text(String),
}

impl fmt::Display for FaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaceId::Number(n) => write!(f, "{n}"),
            FaceId::Text(s) => f.write_str(s),
        }
    }
}

/// Entry of `GET /face-verification/get-registered-faces`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RegisteredFace {
    pub id: FaceId,
}

/// Raw image bytes of an enrolled face.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceContent {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Result of an accepted upload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UploadOutcome {
    pub message: Option<String>,
    pub data: Option<Value>,
}

impl ApiClient {
    /// Enroll up to the queue's worth of images in one multipart request.
    pub async fn register_faces(
        &self,
        images: &[CapturedImage],
        stamp: &str,
    ) -> Result<UploadOutcome, ApiError> {
        let form = multipart_form(registration_parts(images, stamp))?;
        let builder = self
            .request(Method::POST, "/face-verification/register-faces")
            .multipart(form);
        let accepted = self.send_json::<Value>(builder).await?;
        Ok(UploadOutcome {
            message: accepted.message,
            data: accepted.data,
        })
    }

    pub async fn registered_faces(&self) -> Result<Vec<RegisteredFace>, ApiError> {
        let builder = self.request(Method::GET, "/face-verification/get-registered-faces");
        let accepted = self.send_json::<Vec<RegisteredFace>>(builder).await?;
        Ok(accepted.data.unwrap_or_default())
    }

    pub async fn registered_face_content(&self, id: &FaceId) -> Result<FaceContent, ApiError> {
        let path = format!("/face-verification/get-registered-face-content/{id}");
        let response = self.send(self.request(Method::GET, &path)).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await?.to_vec();
        Ok(FaceContent {
            content_type,
            bytes,
        })
    }

    /// Check a single attendance snapshot against the enrolled faces.
    pub async fn verify_face(
        &self,
        image: &CapturedImage,
        stamp: &str,
    ) -> Result<UploadOutcome, ApiError> {
        let form = multipart_form(vec![verification_part(image, stamp)])?;
        let builder = self
            .request(Method::POST, "/face-verification")
            .multipart(form);
        let accepted = self.send_json::<Value>(builder).await?;
        Ok(UploadOutcome {
            message: accepted.message,
            data: accepted.data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApiResponse;

    #[test]
    fn test_registered_faces_accept_both_id_kinds() {
        let body = r#"{"error": false, "data": [{"id": 3}, {"id": "b1c2"}]}"#;
        let envelope: ApiResponse<Vec<RegisteredFace>> = serde_json::from_str(body).unwrap();
        let faces = envelope.into_result().unwrap().data.unwrap();

        assert_eq!(faces[0].id, FaceId::Number(3));
        assert_eq!(faces[1].id.to_string(), "b1c2");
    }
}
