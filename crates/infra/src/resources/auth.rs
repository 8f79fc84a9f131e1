//! Auth group: signup, login, profile and personal API key

use std::sync::Arc;

use reqwest::Method;
use tracing::{debug, instrument};
use xanodash_domain::{
    ApiGroup, AuthResponse, LoginRequest, ProfileUpdate, SaveApiKeyRequest, SaveApiKeyResponse,
    SignupRequest, UserProfile,
};

use crate::api::{ApiClient, ApiError, RequestOptions};

/// Façade over the auth API group
#[derive(Clone)]
pub struct AuthApi {
    client: Arc<ApiClient>,
}

impl AuthApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Register a new account. Public endpoint.
    ///
    /// The returned token is not stored; persisting it is up to the caller's
    /// login flow.
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse, ApiError> {
        let options = RequestOptions::json(Method::POST, request)?.public();
        self.client.request(ApiGroup::Auth, "/auth/signup", options).await
    }

    /// Exchange email and password for a bearer token. Public endpoint.
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let options = RequestOptions::json(Method::POST, request)?.public();
        let response: AuthResponse =
            self.client.request(ApiGroup::Auth, "/auth/login", options).await?;

        debug!(has_profile = response.user.is_some(), "Login accepted");
        Ok(response)
    }

    /// Profile of the signed-in user
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        self.client.request(ApiGroup::Auth, "/auth/me", RequestOptions::get()).await
    }

    /// Update the profile. Every field is sent; absent ones go out as `""`.
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: ProfileUpdate) -> Result<UserProfile, ApiError> {
        let options = RequestOptions::json(Method::PATCH, &update.into_payload())?;
        self.client.request(ApiGroup::Auth, "/auth/update_profile", options).await
    }

    /// Store the user's own Xano API key on the account
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self, api_key))]
    pub async fn save_api_key(&self, api_key: &str) -> Result<SaveApiKeyResponse, ApiError> {
        let request = SaveApiKeyRequest { api_key: api_key.to_string() };
        let options = RequestOptions::json(Method::POST, &request)?;
        self.client.request(ApiGroup::Auth, "/auth/save_api_key", options).await
    }
}
