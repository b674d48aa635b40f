use serde::Deserialize;

use crate::error::ApiError;

/// `{ "error": bool, "message": string, "data": T }`, the body shape every
/// JSON endpoint of the service returns. All fields are optional on the wire.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub error: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Turn `error: true` into [`ApiError::Rejected`].
    pub fn into_result(self) -> Result<Accepted<T>, ApiError> {
        if self.error {
            return Err(ApiError::Rejected {
                message: self
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Request rejected".to_string()),
            });
        }
        Ok(Accepted {
            message: self.message,
            data: self.data,
        })
    }
}

/// A successful envelope.
#[derive(Debug)]
pub struct Accepted<T> {
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Accepted<T> {
    /// The payload, or [`ApiError::Decode`] if the service sent none.
    pub fn require_data(self) -> Result<T, ApiError> {
        self.data
            .ok_or_else(|| ApiError::Decode("missing `data` in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_flag_becomes_rejected() {
        let resp: ApiResponse<bool> =
            serde_json::from_str(r#"{"error": true, "message": "TenSEAL context not found", "data": null}"#)
                .unwrap();
        assert_eq!(
            resp.into_result().unwrap_err(),
            ApiError::Rejected {
                message: "TenSEAL context not found".to_string()
            }
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let resp: ApiResponse<String> = serde_json::from_str("{}").unwrap();
        let accepted = resp.into_result().unwrap();
        assert!(accepted.message.is_none());
        assert!(matches!(accepted.require_data(), Err(ApiError::Decode(_))));
    }
}
