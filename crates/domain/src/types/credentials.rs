//! Credentials group models: stored Xano instance credentials

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

/// A Xano instance credential saved by the user.
///
/// Only `id` and `credential_name` are required; the backend omits the rest
/// on older records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct XanoCredential {
    pub id: i64,
    pub credential_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xano_instance_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xano_instance_email: Option<String>,
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub is_default: bool,
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub is_active: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    #[cfg_attr(feature = "ts-gen", ts(type = "number | null"))]
    pub last_validated: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    #[cfg_attr(feature = "ts-gen", ts(type = "number | null"))]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct CredentialList {
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub items: Vec<XanoCredential>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCredentialRequest {
    pub credential_name: String,
    pub api_key: String,
}

/// Fields to change on a credential; `None` leaves the field untouched and is
/// not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl CredentialUpdate {
    pub fn is_empty(&self) -> bool {
        self.credential_name.is_none() && self.api_key.is_none() && self.is_active.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCredentialRequest {
    pub id: i64,
    #[serde(flatten)]
    pub fields: CredentialUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateCredentialRequest {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct Workspace {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct CredentialValidation {
    pub valid: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub workspaces: Vec<Workspace>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn minimal_credential_parses() {
        let list: CredentialList =
            serde_json::from_value(json!({"items": [{"id": 1, "credential_name": "Prod"}]}))
                .unwrap();

        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].credential_name, "Prod");
        assert!(!list.items[0].is_default);
        assert!(list.items[0].created_at.is_none());
    }

    #[test]
    fn null_columns_read_as_defaults() {
        let list: CredentialList = serde_json::from_value(json!({
            "items": [{
                "id": 2,
                "credential_name": "Staging",
                "xano_instance_name": null,
                "is_default": null,
                "is_active": null,
                "last_validated": null
            }]
        }))
        .unwrap();

        let credential = &list.items[0];
        assert!(!credential.is_default);
        assert!(!credential.is_active);
        assert!(credential.xano_instance_name.is_none());

        let empty: CredentialList = serde_json::from_value(json!({"items": null})).unwrap();
        assert!(empty.items.is_empty());
    }

    #[test]
    fn credential_without_name_is_rejected() {
        let result = serde_json::from_value::<XanoCredential>(json!({"id": 1}));
        assert!(result.is_err());
    }

    #[test]
    fn update_request_only_sends_present_fields() {
        let request = UpdateCredentialRequest {
            id: 4,
            fields: CredentialUpdate { is_active: Some(false), ..Default::default() },
        };

        assert_eq!(serde_json::to_value(request).unwrap(), json!({"id": 4, "is_active": false}));
        assert!(CredentialUpdate::default().is_empty());
    }
}
