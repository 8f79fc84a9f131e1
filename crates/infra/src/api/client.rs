//! Request executor
//!
//! Builds the URL for an API group, attaches headers and the bearer token,
//! sends through [`HttpClient`], parses the JSON body and maps non-2xx
//! statuses to [`ApiError::Status`]. Every façade goes through here.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};
use xanodash_domain::{ApiGroup, ApiGroupsConfig, BearerToken, ClientConfig, RunMode};

use super::errors::ApiError;
use super::inflight::{InFlight, RequestKey};
use super::token_store::TokenStore;
use crate::http::HttpClient;

/// Payload keys whose values never reach the diagnostics output
const REDACTED_KEYS: &[&str] = &["password", "api_key", "authToken", "auth_token", "token"];

/// Per-call request descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    /// Public endpoint: never attach the bearer token
    pub skip_auth: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self { method: Method::GET, body: None, skip_auth: false }
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self { method, ..Default::default() }
    }

    pub fn get() -> Self {
        Self::default()
    }

    /// Request with a JSON body
    ///
    /// # Errors
    /// Returns `ApiError::Serialization` if `body` cannot be encoded.
    pub fn json<B: Serialize + ?Sized>(method: Method, body: &B) -> Result<Self, ApiError> {
        let body =
            serde_json::to_value(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(Self { method, body: Some(body), skip_auth: false })
    }

    pub fn public(mut self) -> Self {
        self.skip_auth = true;
        self
    }
}

/// Join a group base URL and an endpoint path.
///
/// Trailing slashes on the base are dropped and a leading slash is added to
/// the endpoint when missing.
pub fn join_url(base_url: &str, endpoint: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if endpoint.starts_with('/') {
        format!("{base}{endpoint}")
    } else {
        format!("{base}/{endpoint}")
    }
}

/// Typed executor over the configured API groups
pub struct ApiClient {
    http: HttpClient,
    groups: ApiGroupsConfig,
    tokens: Arc<dyn TokenStore>,
    run_mode: RunMode,
    timeout: Duration,
    in_flight: Option<InFlight>,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the limits in `config` are out of range
    /// or the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        config.validate_limits()?;

        let mut http = HttpClient::builder().retry(&config.retry);
        if let Some(agent) = &config.user_agent {
            http = http.user_agent(agent.clone());
        }
        let http = http.build()?;

        Ok(Self {
            http,
            groups: config.groups.clone(),
            tokens,
            run_mode: config.run_mode,
            timeout: config.timeout(),
            in_flight: config.coalesce_reads.then(InFlight::new),
        })
    }

    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Full URL for `endpoint` within `group`
    pub fn url(&self, group: ApiGroup, endpoint: &str) -> String {
        join_url(self.groups.base_url(group), endpoint)
    }

    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Execute a request and decode the JSON response into `T`.
    ///
    /// # Errors
    /// - `ApiError::Status` for a non-2xx response
    /// - `ApiError::Decode` when the body is not JSON or has the wrong shape
    /// - `ApiError::Network` / `ApiError::Timeout` for transport failures
    pub async fn request<T: DeserializeOwned>(
        &self,
        group: ApiGroup,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let value = self.request_value(group, endpoint, options).await?;
        serde_json::from_value(value).map_err(|e| ApiError::decode(endpoint, e))
    }

    /// Execute a request and return the parsed JSON untouched.
    ///
    /// # Errors
    /// Same as [`ApiClient::request`], minus shape errors.
    #[instrument(skip(self, options), fields(group = %group, method = %options.method))]
    pub async fn request_value(
        &self,
        group: ApiGroup,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Value, ApiError> {
        let RequestOptions { method, body, skip_auth } = options;
        let token = if skip_auth { None } else { self.tokens.token() };

        let exchange = Exchange {
            http: self.http.clone(),
            method: method.clone(),
            url: self.url(group, endpoint),
            endpoint: endpoint.to_string(),
            body,
            token,
            timeout: self.timeout,
            diagnostics: self.run_mode.is_development(),
        };

        match &self.in_flight {
            Some(in_flight) if method == Method::GET => {
                let key = RequestKey::new(
                    group,
                    endpoint,
                    &method,
                    exchange.body.as_ref(),
                    exchange.token.as_ref(),
                );
                in_flight.run(key, move || exchange.perform().boxed()).await
            }
            _ => exchange.perform().await,
        }
    }
}

/// One fully resolved request, owned so it can run inside a shared future
struct Exchange {
    http: HttpClient,
    method: Method,
    url: String,
    endpoint: String,
    body: Option<Value>,
    token: Option<BearerToken>,
    timeout: Duration,
    diagnostics: bool,
}

impl Exchange {
    async fn perform(self) -> Result<Value, ApiError> {
        let started = Instant::now();

        if self.diagnostics {
            let payload = self.body.as_ref().map(redact).unwrap_or(Value::Null);
            debug!(
                method = %self.method,
                url = %self.url,
                payload = %payload,
                token_attached = self.token.is_some(),
                "api request"
            );
        }

        let mut builder = self
            .http
            .request(self.method.clone(), &self.url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose());
        }
        if let Some(body) = &self.body {
            builder = builder.json(body);
        }

        let http = &self.http;
        let round_trip = async move {
            let response = http.send(builder).await?;
            let status = response.status();
            let bytes = response.bytes().await?;
            Ok::<_, ApiError>((status, bytes))
        };

        let (status, bytes) = tokio::time::timeout(self.timeout, round_trip)
            .await
            .map_err(|_| ApiError::Timeout(self.timeout))??;

        let parsed = parse_body(&bytes);

        if self.diagnostics {
            let body = parsed.as_ref().map(redact).unwrap_or(Value::Null);
            debug!(
                status = status.as_u16(),
                duration_ms = started.elapsed().as_millis() as u64,
                body = %body,
                "api response"
            );
        }

        if !status.is_success() {
            return Err(status_error(status, parsed.ok()));
        }

        parsed.map_err(|e| ApiError::decode(&self.endpoint, e))
    }
}

fn parse_body(bytes: &[u8]) -> Result<Value, serde_json::Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes)
}

fn status_error(status: StatusCode, body: Option<Value>) -> ApiError {
    ApiError::Status {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        body: body.filter(|value| !value.is_null()),
    }
}

/// Copy of `value` with secret-bearing fields masked
fn redact(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, inner)| {
                    if REDACTED_KEYS.contains(&key.as_str()) {
                        (key.clone(), Value::String("***".into()))
                    } else {
                        (key.clone(), redact(inner))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        other => other.clone(),
    }
}

/// Builder for API client
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ClientConfig>,
    tokens: Option<Arc<dyn TokenStore>>,
}

impl ApiClientBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the token store the client reads the session token from
    pub fn token_store(mut self, tokens: Arc<dyn TokenStore>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// # Errors
    /// Returns `ApiError::Config` if the configuration or token store is
    /// missing, or if client creation fails.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let config =
            self.config.ok_or_else(|| ApiError::Config("Client config not set".to_string()))?;
        let tokens =
            self.tokens.ok_or_else(|| ApiError::Config("Token store not set".to_string()))?;

        ApiClient::new(&config, tokens)
    }
}
