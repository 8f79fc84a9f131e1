use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::trace;
use xanodash_domain::RetryConfig;

use crate::api::errors::ApiError;

/// Upper bound on the backoff doubling
const MAX_BACKOFF_SHIFT: u32 = 8;

/// HTTP transport with optional bounded retry.
///
/// Retries only apply to idempotent methods, and only for 5xx responses or
/// connect/timeout failures. With `max_attempts == 1` every request is sent
/// exactly once. Per-call deadlines and headers belong to the executor.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    retry: RetryConfig,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    pub fn max_attempts(&self) -> u32 {
        self.retry.max_attempts.max(1)
    }

    /// Send `builder`, retrying per the configured policy.
    ///
    /// # Errors
    /// Returns `ApiError::Network` when the final attempt fails at the
    /// transport level, or `ApiError::Config` if the request cannot be built.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let attempts = self.max_attempts();
        let mut attempt = 1;

        loop {
            let request = builder
                .try_clone()
                .ok_or_else(|| ApiError::Config("streaming request bodies cannot be sent".into()))?
                .build()?;

            let method = request.method().clone();
            let url = request.url().clone();
            let may_retry = method.is_idempotent() && attempt < attempts;
            trace!(attempt, %method, %url, "sending HTTP request");

            let outcome = self.client.execute(request).await;
            let retry = match &outcome {
                Ok(response) => {
                    trace!(attempt, %method, %url, status = %response.status(), "received HTTP response");
                    response.status().is_server_error()
                }
                Err(err) => {
                    trace!(attempt, %method, %url, error = %err, "HTTP request failed");
                    is_transient(err)
                }
            };

            if !(retry && may_retry) {
                return outcome.map_err(ApiError::from);
            }

            let delay = self.backoff_delay(attempt);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }
    }

    /// Delay before retry number `retry` (1-based)
    fn backoff_delay(&self, retry: u32) -> Duration {
        let shift = retry.saturating_sub(1).min(MAX_BACKOFF_SHIFT);
        self.retry.base_backoff().saturating_mul(1 << shift)
    }
}

/// Builder for [`HttpClient`]
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    retry: RetryConfig,
    user_agent: Option<String>,
}

impl HttpClientBuilder {
    pub fn retry(mut self, retry: &RetryConfig) -> Self {
        self.retry = retry.clone();
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// # Errors
    /// Returns `ApiError::Config` if the TLS backend cannot be initialised.
    pub fn build(self) -> Result<HttpClient, ApiError> {
        let mut builder = ReqwestClient::builder().no_proxy();
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client =
            builder.build().map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {e}")))?;

        Ok(HttpClient { client, retry: self.retry })
    }
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use reqwest::StatusCode;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_with_attempts(max_attempts: u32) -> HttpClient {
        HttpClient::builder()
            .retry(&RetryConfig { max_attempts, base_backoff_ms: 10 })
            .build()
            .expect("http client")
    }

    fn flaky_responder(
        failures: usize,
    ) -> impl Fn(&wiremock::Request) -> ResponseTemplate + Send + Sync + 'static {
        let attempts = Arc::new(AtomicUsize::new(0));
        move |_req: &wiremock::Request| -> ResponseTemplate {
            let current = attempts.fetch_add(1, Ordering::SeqCst);
            if current < failures {
                ResponseTemplate::new(500)
            } else {
                ResponseTemplate::new(200)
            }
        }
    }

    #[tokio::test]
    async fn default_client_sends_exactly_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::builder().build().expect("http client");
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(client.max_attempts(), 1);
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn retries_idempotent_server_errors_until_success() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(flaky_responder(2))
            .expect(3)
            .mount(&server)
            .await;

        let client = client_with_attempts(3);
        let response =
            client.send(client.request(Method::DELETE, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_with_attempts(2);
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn never_retries_post_or_patch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(flaky_responder(2))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_attempts(3);
        let post = client.send(client.request(Method::POST, server.uri())).await.expect("response");
        let patch =
            client.send(client.request(Method::PATCH, server.uri())).await.expect("response");

        assert_eq!(post.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(patch.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_with_attempts(3);
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn user_agent_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "xanodash-admin/1.0"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::builder().user_agent("xanodash-admin/1.0").build().unwrap();
        let response = client.send(client.request(Method::GET, server.uri())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn connection_failure_surfaces_as_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let url = format!("http://{addr}");

        let client = client_with_attempts(2);
        let result = client.send(client.request(Method::GET, &url)).await;

        assert!(matches!(result, Err(ApiError::Network(_))), "got {:?}", result.map(|r| r.status()));
    }

    #[test]
    fn backoff_doubles_per_retry() {
        let client = HttpClient::builder()
            .retry(&RetryConfig { max_attempts: 4, base_backoff_ms: 100 })
            .build()
            .unwrap();
        assert_eq!(client.backoff_delay(1), Duration::from_millis(100));
        assert_eq!(client.backoff_delay(2), Duration::from_millis(200));
        assert_eq!(client.backoff_delay(3), Duration::from_millis(400));
    }
}
