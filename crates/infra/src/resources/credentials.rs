//! Credentials group: the user's stored Xano instance credentials

use std::sync::Arc;

use reqwest::Method;
use tracing::{debug, instrument};
use xanodash_domain::{
    ApiGroup, CreateCredentialRequest, CredentialList, CredentialUpdate, CredentialValidation,
    DeleteResponse, IdRequest, UpdateCredentialRequest, ValidateCredentialRequest, XanoCredential,
};

use crate::api::{ApiClient, ApiError, RequestOptions};

/// Façade over the credentials API group. Every call requires a session.
#[derive(Clone)]
pub struct CredentialsApi {
    client: Arc<ApiClient>,
}

impl CredentialsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    // === Reads ===

    /// List all stored credentials
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<CredentialList, ApiError> {
        let list: CredentialList = self
            .client
            .request(ApiGroup::Credentials, "/xano-credentials/list", RequestOptions::get())
            .await?;

        debug!(count = list.items.len(), "Credentials listed");
        Ok(list)
    }

    /// The credential currently selected for tool calls, if any
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn active(&self) -> Result<Option<XanoCredential>, ApiError> {
        self.client
            .request(ApiGroup::Credentials, "/xano-credentials/active", RequestOptions::get())
            .await
    }

    // === Writes ===

    /// Store a new credential
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self, api_key))]
    pub async fn create(
        &self,
        credential_name: &str,
        api_key: &str,
    ) -> Result<XanoCredential, ApiError> {
        let request = CreateCredentialRequest {
            credential_name: credential_name.to_string(),
            api_key: api_key.to_string(),
        };
        let options = RequestOptions::json(Method::POST, &request)?;
        let credential: XanoCredential =
            self.client.request(ApiGroup::Credentials, "/xano-credentials/create", options).await?;

        debug!(credential_id = credential.id, "Credential created");
        Ok(credential)
    }

    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<DeleteResponse, ApiError> {
        let options = RequestOptions::json(Method::DELETE, &IdRequest { id })?;
        self.client.request(ApiGroup::Credentials, "/xano-credentials/delete", options).await
    }

    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn set_default(&self, id: i64) -> Result<XanoCredential, ApiError> {
        let options = RequestOptions::json(Method::POST, &IdRequest { id })?;
        self.client.request(ApiGroup::Credentials, "/xano-credentials/set-default", options).await
    }

    /// Change the given fields of a credential; `None` fields are not sent.
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self, fields))]
    pub async fn update(
        &self,
        id: i64,
        fields: CredentialUpdate,
    ) -> Result<XanoCredential, ApiError> {
        let options = RequestOptions::json(Method::PATCH, &UpdateCredentialRequest { id, fields })?;
        self.client.request(ApiGroup::Credentials, "/xano-credentials/update", options).await
    }

    /// Check the credential against Xano, optionally scoped to one workspace
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn validate(
        &self,
        id: i64,
        workspace_id: Option<i64>,
    ) -> Result<CredentialValidation, ApiError> {
        let options =
            RequestOptions::json(Method::POST, &ValidateCredentialRequest { id, workspace_id })?;
        let result: CredentialValidation =
            self.client.request(ApiGroup::Credentials, "/xano-credentials/validate", options).await?;

        debug!(valid = result.valid, workspaces = result.workspaces.len(), "Credential validated");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::resources::test_support::client_for;

    #[tokio::test]
    async fn create_posts_name_and_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/xano-credentials/create"))
            .and(header("Authorization", "Bearer tok"))
            .and(body_json(json!({"credential_name": "Staging", "api_key": "xk_1"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": 5, "credential_name": "Staging"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = CredentialsApi::new(client_for(&mock_server, Some("tok")));
        let credential = api.create("Staging", "xk_1").await.unwrap();

        assert_eq!(credential.id, 5);
        assert!(!credential.is_default);
    }

    #[tokio::test]
    async fn set_default_posts_id() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/xano-credentials/set-default"))
            .and(body_json(json!({"id": 5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 5,
                "credential_name": "Staging",
                "is_default": true
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = CredentialsApi::new(client_for(&mock_server, Some("tok")));
        assert!(api.set_default(5).await.unwrap().is_default);
    }

    #[tokio::test]
    async fn update_sends_only_present_fields() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/xano-credentials/update"))
            .and(body_json(json!({"id": 5, "credential_name": "Renamed"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": 5, "credential_name": "Renamed"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = CredentialsApi::new(client_for(&mock_server, Some("tok")));
        let fields = CredentialUpdate { credential_name: Some("Renamed".into()), ..Default::default() };
        let credential = api.update(5, fields).await.unwrap();

        assert_eq!(credential.credential_name, "Renamed");
    }

    #[tokio::test]
    async fn validate_omits_missing_workspace() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/xano-credentials/validate"))
            .and(body_json(json!({"id": 5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "valid": true,
                "workspaces": [{"id": 1, "name": "Main"}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = CredentialsApi::new(client_for(&mock_server, Some("tok")));
        let result = api.validate(5, None).await.unwrap();

        assert!(result.valid);
        assert_eq!(result.workspaces[0].name, "Main");
    }

    #[tokio::test]
    async fn active_is_none_for_null_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/xano-credentials/active"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
            .mount(&mock_server)
            .await;

        let api = CredentialsApi::new(client_for(&mock_server, Some("tok")));
        assert!(api.active().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_rejects_wrong_shape() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/xano-credentials/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [{"id": "x"}]})))
            .mount(&mock_server)
            .await;

        let api = CredentialsApi::new(client_for(&mock_server, Some("tok")));
        let err = api.list().await.unwrap_err();

        assert!(matches!(err, ApiError::Decode { ref endpoint, .. } if endpoint == "/xano-credentials/list"));
    }
}
