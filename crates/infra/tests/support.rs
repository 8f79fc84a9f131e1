#![allow(dead_code)]

use std::sync::Arc;

use wiremock::MockServer;
use xanodash_domain::{ApiGroupsConfig, ClientConfig};
use xanodash_infra::{MemoryTokenStore, TokenStore, XanoClient};

/// Client wired to a mock server, with access to its token store.
pub struct TestClient {
    pub server: MockServer,
    pub tokens: Arc<MemoryTokenStore>,
    pub client: XanoClient,
}

impl TestClient {
    /// Start a mock server and build a client for it, optionally signed in.
    pub async fn start(token: Option<&str>) -> Self {
        Self::start_with(token, |config| config).await
    }

    /// Like [`TestClient::start`] but lets the caller adjust the config.
    pub async fn start_with(
        token: Option<&str>,
        adjust: impl FnOnce(ClientConfig) -> ClientConfig,
    ) -> Self {
        let server = MockServer::start().await;
        let tokens = Arc::new(match token {
            Some(token) => MemoryTokenStore::with_token(token),
            None => MemoryTokenStore::new(),
        });

        let config = adjust(ClientConfig::new(ApiGroupsConfig::uniform(server.uri())));
        let store: Arc<dyn TokenStore> = tokens.clone();
        let client = XanoClient::new(&config, store).expect("client should build");

        Self { server, tokens, client }
    }

    /// Authorization header of every request the server has seen, in order.
    pub async fn auth_headers(&self) -> Vec<Option<String>> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| {
                request
                    .headers
                    .get("authorization")
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
            })
            .collect()
    }
}
