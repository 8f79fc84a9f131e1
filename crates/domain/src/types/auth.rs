//! Auth group models: signup, login, profile and API key storage

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use crate::constants::EMPTY_FIELD_SENTINEL;

/// Opaque bearer credential.
///
/// `Debug` never prints the value; call [`BearerToken::expose`] at the one
/// place that writes the header.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

impl From<String> for BearerToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for BearerToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response of signup and login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "authToken")]
    pub auth_token: BearerToken,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct UserProfile {
    pub id: i64,
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Whether the user has stored an API key; the key itself never comes back
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub has_api_key: bool,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    #[cfg_attr(feature = "ts-gen", ts(type = "number | null"))]
    pub created_at: Option<DateTime<Utc>>,
}

/// Partial profile update as the caller expresses it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub avatar_url: Option<String>,
}

impl ProfileUpdate {
    /// Wire payload with every field present; absent fields become `""`,
    /// which the backend treats as "leave unchanged".
    pub fn into_payload(self) -> ProfileUpdatePayload {
        fn or_sentinel(value: Option<String>) -> String {
            value.unwrap_or_else(|| EMPTY_FIELD_SENTINEL.to_string())
        }

        ProfileUpdatePayload {
            name: or_sentinel(self.name),
            first_name: or_sentinel(self.first_name),
            last_name: or_sentinel(self.last_name),
            company: or_sentinel(self.company),
            avatar_url: or_sentinel(self.avatar_url),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdatePayload {
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveApiKeyRequest {
    pub api_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct SaveApiKeyResponse {
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
