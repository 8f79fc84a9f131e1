//! Typed façades over the four xanodash API groups
//!
//! Each façade shares one [`ApiClient`] and maps a method to a fixed group,
//! path and body shape. There are no client-side business rules here.

pub mod analytics;
pub mod auth;
pub mod billing;
pub mod credentials;

use std::sync::Arc;

pub use analytics::AnalyticsApi;
pub use auth::AuthApi;
pub use billing::BillingApi;
pub use credentials::CredentialsApi;
use xanodash_domain::ClientConfig;

use crate::api::{ApiClient, ApiError, TokenStore};

/// Entry point handing out the per-group façades
#[derive(Clone)]
pub struct XanoClient {
    client: Arc<ApiClient>,
}

impl XanoClient {
    /// # Errors
    /// Returns `ApiError::Config` if the client cannot be constructed.
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        Ok(Self::from_client(Arc::new(ApiClient::new(config, tokens)?)))
    }

    pub fn from_client(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn api_client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn auth(&self) -> AuthApi {
        AuthApi::new(Arc::clone(&self.client))
    }

    pub fn credentials(&self) -> CredentialsApi {
        CredentialsApi::new(Arc::clone(&self.client))
    }

    pub fn analytics(&self) -> AnalyticsApi {
        AnalyticsApi::new(Arc::clone(&self.client))
    }

    pub fn billing(&self) -> BillingApi {
        BillingApi::new(Arc::clone(&self.client))
    }
}

/// Append percent-encoded query parameters to `path`. `None` values are
/// left out entirely.
pub(crate) fn query_path(path: &str, params: &[(&str, Option<String>)]) -> String {
    let query: Vec<String> = params
        .iter()
        .filter_map(|(name, value)| {
            value.as_ref().map(|value| format!("{name}={}", urlencoding::encode(value)))
        })
        .collect();

    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", query.join("&"))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use wiremock::MockServer;
    use xanodash_domain::{ApiGroupsConfig, ClientConfig};

    use crate::api::{ApiClient, MemoryTokenStore};

    pub(crate) fn client_for(server: &MockServer, token: Option<&str>) -> Arc<ApiClient> {
        let store = match token {
            Some(token) => MemoryTokenStore::with_token(token),
            None => MemoryTokenStore::new(),
        };
        let config = ClientConfig::new(ApiGroupsConfig::uniform(server.uri()));
        Arc::new(ApiClient::new(&config, Arc::new(store)).unwrap())
    }

    pub(crate) fn has_auth_header(request: &wiremock::Request) -> bool {
        request.headers.get("authorization").is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_path_skips_missing_values() {
        let path = query_path(
            "/analytics/summary",
            &[("period", Some("7d".into())), ("compare", None)],
        );
        assert_eq!(path, "/analytics/summary?period=7d");
    }

    #[test]
    fn query_path_encodes_values() {
        let path = query_path("/analytics/tool-metrics", &[("tool_name", Some("list tables/v2".into()))]);
        assert_eq!(path, "/analytics/tool-metrics?tool_name=list%20tables%2Fv2");
    }

    #[test]
    fn query_path_without_params_is_unchanged() {
        assert_eq!(query_path("/billing/usage", &[]), "/billing/usage");
    }
}
