//! `/auth` endpoints.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use store::User;

use crate::client::ApiClient;
use crate::error::ApiError;

/// Body of `POST /auth/register`.
#[derive(Clone, Debug, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

/// Body of `POST /auth/login`.
#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `data` of a successful login.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LoginData {
    pub access_token: String,
    pub user: User,
}

impl ApiClient {
    /// Create an account. The user still has to log in afterwards.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Option<String>, ApiError> {
        let builder = self.request(Method::POST, "/auth/register").json(request);
        let accepted = self.send_json::<Value>(builder).await?;
        Ok(accepted.message)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginData, ApiError> {
        let builder = self.request(Method::POST, "/auth/login").json(request);
        self.send_json(builder).await?.require_data()
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let builder = self.request(Method::POST, "/auth/logout");
        self.send(builder).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_payload_decodes_into_user() {
        let body = r#"{"error": false, "data": {"access_token": "tok1", "user": {"id": 1, "email": "a@b.com", "full_name": "Ayu", "profile": {"address": null, "phone_number": "0812", "birthdate": null}}}}"#;
        let envelope: crate::ApiResponse<LoginData> = serde_json::from_str(body).unwrap();
        let data = envelope.into_result().unwrap().require_data().unwrap();

        assert_eq!(data.access_token, "tok1");
        assert_eq!(data.user.id, 1);
        assert_eq!(
            data.user.profile.unwrap().phone_number.as_deref(),
            Some("0812")
        );
    }

    #[test]
    fn test_register_request_shape() {
        let request = RegisterRequest {
            email: "a@b.com".into(),
            full_name: "Ayu".into(),
            password: "x".into(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"email": "a@b.com", "full_name": "Ayu", "password": "x"})
        );
    }
}
