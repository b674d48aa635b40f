//! # Session data model
//!
//! The types the attendance client keeps about the signed-in user. They are
//! `Serialize + Deserialize` because the whole [`Session`] is what gets written
//! to durable client storage and read back during hydration.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Session`] | Current user, bearer token and the two advisory gate flags (`context_opened`, `has_registered_faces`). |
//! | [`User`] | The user record returned by `POST /auth/login`. Every field is defaulted so partial payloads deserialize. |
//! | [`Profile`] | Contact details nested under the user. |
//! | [`UserPatch`] | A partial user used for shallow merges (`Some` fields win, `profile` is replaced wholesale). |
//!
//! The gate flags are hints for the UI only. The service re-checks every
//! biometric operation, so nothing here is an access-control decision.

use serde::{Deserialize, Serialize};

/// Contact details attached to a user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    /// `YYYY-MM-DD`, as the service stores it.
    #[serde(default)]
    pub birthdate: Option<String>,
}

/// The signed-in user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub profile: Option<Profile>,
}

impl User {
    /// Shallow-merge `patch` into this user. Top-level `Some` fields replace
    /// the current value; a patched `profile` replaces the whole profile.
    pub fn merge(&mut self, patch: UserPatch) {
        if let Some(id) = patch.id {
            self.id = id;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(full_name) = patch.full_name {
            self.full_name = full_name;
        }
        if let Some(profile) = patch.profile {
            self.profile = Some(profile);
        }
    }

    /// Get display name, falling back to email if the full name is empty.
    pub fn display_name(&self) -> &str {
        if self.full_name.is_empty() {
            &self.email
        } else {
            &self.full_name
        }
    }
}

/// Partial user payload for [`crate::SessionStore::set_user`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

impl From<User> for UserPatch {
    fn from(user: User) -> Self {
        Self {
            id: Some(user.id),
            email: Some(user.email),
            full_name: Some(user.full_name),
            profile: user.profile,
        }
    }
}

/// Client session. This is also the persisted shape.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub context_opened: bool,
    #[serde(default)]
    pub has_registered_faces: bool,
}

impl Session {
    /// A token is present and non-empty.
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_user_payload_deserializes() {
        let user: User = serde_json::from_str(r#"{"id": 1, "email": "a@b.com"}"#).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.full_name, "");
        assert!(user.profile.is_none());
    }

    #[test]
    fn test_profile_is_replaced_not_deep_merged() {
        let mut user = User {
            profile: Some(Profile {
                address: Some("Jl. Merdeka 1".into()),
                phone_number: Some("0812".into()),
                birthdate: None,
            }),
            ..User::default()
        };
        user.merge(UserPatch {
            profile: Some(Profile {
                birthdate: Some("2000-01-01".into()),
                ..Profile::default()
            }),
            ..UserPatch::default()
        });
        let profile = user.profile.unwrap();
        assert_eq!(profile.address, None);
        assert_eq!(profile.birthdate.as_deref(), Some("2000-01-01"));
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut user = User {
            email: "a@b.com".into(),
            ..User::default()
        };
        assert_eq!(user.display_name(), "a@b.com");
        user.full_name = "Ayu".into();
        assert_eq!(user.display_name(), "Ayu");
    }

    #[test]
    fn test_empty_token_is_not_authenticated() {
        let session = Session {
            token: Some(String::new()),
            ..Session::default()
        };
        assert!(!session.is_authenticated());
    }
}
