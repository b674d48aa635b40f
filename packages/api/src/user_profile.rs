//! `/user-profile` endpoints: profile updates and the encryption context.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use store::{Profile, UserPatch};

use crate::client::ApiClient;
use crate::error::ApiError;

/// Body of `PUT /user-profile`. The service expects the camelCase keys.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProfileUpdate {
    pub user_id: u64,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub address: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    pub birthdate: String,
}

impl ProfileUpdate {
    /// The session patch applied after the service accepts the update.
    pub fn to_patch(&self) -> UserPatch {
        UserPatch {
            full_name: Some(self.full_name.clone()),
            profile: Some(Profile {
                address: Some(self.address.clone()),
                phone_number: Some(self.phone_number.clone()),
                birthdate: Some(self.birthdate.clone()).filter(|b| !b.is_empty()),
            }),
            ..UserPatch::default()
        }
    }
}

#[derive(Serialize)]
struct OpenContextRequest<'a> {
    mnemonic_phrase: &'a str,
}

#[derive(Deserialize)]
struct Exists {
    exists: bool,
}

impl ApiClient {
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), ApiError> {
        let builder = self.request(Method::PUT, "/user-profile").json(update);
        self.send_json::<Value>(builder).await?;
        Ok(())
    }

    /// Generate a new encryption context. Returns the mnemonic phrase, which
    /// the service never shows again.
    pub async fn generate_context_key(&self) -> Result<String, ApiError> {
        let builder = self
            .request(Method::POST, "/user-profile/generate-context-key")
            .json(&serde_json::json!({}));
        self.send_json(builder).await?.require_data()
    }

    /// Whether an encryption context has been generated for this user.
    pub async fn check_saved_context_key(&self) -> Result<bool, ApiError> {
        let builder = self.request(Method::GET, "/user-profile/check-saved-context-key");
        let exists: Exists = self.send_json(builder).await?.require_data()?;
        Ok(exists.exists)
    }

    /// Unlock the saved context with the user's mnemonic phrase.
    pub async fn open_saved_context_key(&self, mnemonic_phrase: &str) -> Result<(), ApiError> {
        let builder = self
            .request(Method::POST, "/user-profile/open-saved-context-key")
            .json(&OpenContextRequest { mnemonic_phrase });
        self.send_json::<Value>(builder).await?;
        Ok(())
    }

    /// Whether the service currently holds an opened context.
    pub async fn check_opened_context_key(&self) -> Result<bool, ApiError> {
        let builder = self.request(Method::GET, "/user-profile/check-opened-saved-context-key");
        let exists: Exists = self.send_json(builder).await?.require_data()?;
        Ok(exists.exists)
    }
}
