//! Analytics group: usage statistics, exports and log maintenance

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};
use xanodash_domain::{
    AnalyticsExport, AnalyticsSummary, ApiGroup, CleanupOptions, CleanupReport, ErrorBreakdown,
    LogAck, PerformanceMetrics, Period, ToolMetrics, TrendSeries, UsageLogEntry,
};

use super::query_path;
use crate::api::{ApiClient, ApiError, RequestOptions};

/// Façade over the analytics API group
#[derive(Clone)]
pub struct AnalyticsApi {
    client: Arc<ApiClient>,
}

impl AnalyticsApi {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    // === Period reports ===

    /// Call totals for `period`. With `compare` set to `Some(true)` the
    /// backend adds a comparison against the previous window of the same
    /// length; `None` leaves the flag off the query string.
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn summary(
        &self,
        period: &Period,
        compare: Option<bool>,
    ) -> Result<AnalyticsSummary, ApiError> {
        self.period_report("/analytics/summary", period, compare).await
    }

    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn performance(
        &self,
        period: &Period,
        compare: Option<bool>,
    ) -> Result<PerformanceMetrics, ApiError> {
        self.period_report("/analytics/performance", period, compare).await
    }

    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn trends(
        &self,
        period: &Period,
        compare: Option<bool>,
    ) -> Result<TrendSeries, ApiError> {
        self.period_report("/analytics/trends", period, compare).await
    }

    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn errors(
        &self,
        period: &Period,
        compare: Option<bool>,
    ) -> Result<ErrorBreakdown, ApiError> {
        self.period_report("/analytics/errors", period, compare).await
    }

    async fn period_report<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        period: &Period,
        compare: Option<bool>,
    ) -> Result<T, ApiError> {
        let path = query_path(
            endpoint,
            &[
                ("period", Some(period.to_string())),
                ("compare", compare.map(|flag| flag.to_string())),
            ],
        );
        self.client.request(ApiGroup::Analytics, &path, RequestOptions::get()).await
    }

    // === Per-tool and raw data ===

    /// Daily breakdown for one tool over the last `days` days
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn tool_metrics(&self, tool_name: &str, days: u32) -> Result<ToolMetrics, ApiError> {
        let path = query_path(
            "/analytics/tool-metrics",
            &[("tool_name", Some(tool_name.to_string())), ("days", Some(days.to_string()))],
        );
        self.client.request(ApiGroup::Analytics, &path, RequestOptions::get()).await
    }

    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn export(&self, days: u32) -> Result<AnalyticsExport, ApiError> {
        let path = query_path("/analytics/export", &[("days", Some(days.to_string()))]);
        let export: AnalyticsExport =
            self.client.request(ApiGroup::Analytics, &path, RequestOptions::get()).await?;

        debug!(records = export.records.len(), "Analytics exported");
        Ok(export)
    }

    /// Report one tool invocation
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self, entry), fields(tool = %entry.tool_name, request_id = %entry.request_id))]
    pub async fn log_usage(&self, entry: &UsageLogEntry) -> Result<LogAck, ApiError> {
        let options = RequestOptions::json(Method::POST, entry)?;
        self.client.request(ApiGroup::Analytics, "/analytics/log", options).await
    }

    // === Maintenance ===

    /// Purge old usage logs. Nothing is deleted unless `options.dry_run` is
    /// false.
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded
    #[instrument(skip(self))]
    pub async fn cleanup_logs(&self, options: CleanupOptions) -> Result<CleanupReport, ApiError> {
        let request = RequestOptions::json(Method::POST, &options)?;
        let report: CleanupReport =
            self.client.request(ApiGroup::Analytics, "/analytics/cleanup", request).await?;

        info!(dry_run = report.dry_run, affected_rows = report.affected_rows, "Log cleanup finished");
        Ok(report)
    }

    /// Dry-run cleanup with the backend's default retention
    ///
    /// # Errors
    /// See [`AnalyticsApi::cleanup_logs`].
    pub async fn cleanup_logs_default(&self) -> Result<CleanupReport, ApiError> {
        self.cleanup_logs(CleanupOptions::default()).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::resources::test_support::client_for;

    fn summary_body() -> serde_json::Value {
        json!({
            "total_calls": 120,
            "successful_calls": 114,
            "failed_calls": 6,
            "success_rate": 95.0,
            "avg_response_time_ms": 210.5
        })
    }

    #[tokio::test]
    async fn summary_omits_missing_compare() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/analytics/summary"))
            .and(query_param("period", "7d"))
            .respond_with(ResponseTemplate::new(200).set_body_json(summary_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = AnalyticsApi::new(client_for(&mock_server, Some("tok")));
        let summary = api.summary(&Period::last_week(), None).await.unwrap();

        assert_eq!(summary.total_calls, 120);
        assert!(summary.comparison.is_none());

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), Some("period=7d"));
    }

    #[tokio::test]
    async fn summary_sends_compare_flag() {
        let mock_server = MockServer::start().await;

        let mut body = summary_body();
        body["comparison"] = json!({"total_calls_change": 12.5, "success_rate_change": -1.0});

        Mock::given(method("GET"))
            .and(path("/analytics/summary"))
            .and(query_param("period", "24h"))
            .and(query_param("compare", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = AnalyticsApi::new(client_for(&mock_server, Some("tok")));
        let summary = api.summary(&Period::last_day(), Some(true)).await.unwrap();

        let comparison = summary.comparison.unwrap();
        assert_eq!(comparison.total_calls_change, 12.5);
        assert_eq!(comparison.avg_response_time_change, 0.0);

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), Some("period=24h&compare=true"));
    }

    #[tokio::test]
    async fn period_reports_send_explicit_false() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/analytics/errors"))
            .and(query_param("period", "30d"))
            .and(query_param("compare", "false"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_errors": 0,
                "by_type": [],
                "recent": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = AnalyticsApi::new(client_for(&mock_server, Some("tok")));
        let breakdown = api.errors(&Period::last_month(), Some(false)).await.unwrap();

        assert!(breakdown.comparison.is_none());
    }

    #[tokio::test]
    async fn tool_metrics_encodes_tool_name() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/analytics/tool-metrics"))
            .and(query_param("tool_name", "list tables"))
            .and(query_param("days", "14"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tool_name": "list tables",
                "total_calls": 9,
                "success_rate": 100.0,
                "avg_response_time_ms": 80.0
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = AnalyticsApi::new(client_for(&mock_server, Some("tok")));
        let metrics = api.tool_metrics("list tables", 14).await.unwrap();

        assert_eq!(metrics.total_calls, 9);
        assert!(metrics.daily.is_empty());
    }

    #[tokio::test]
    async fn cleanup_default_is_dry_run() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/analytics/cleanup"))
            .and(body_json(json!({"dry_run": true})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"dry_run": true, "affected_rows": 17})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = AnalyticsApi::new(client_for(&mock_server, Some("tok")));
        let report = api.cleanup_logs_default().await.unwrap();

        assert!(report.dry_run);
        assert_eq!(report.affected_rows, 17);
    }

    #[tokio::test]
    async fn log_usage_posts_entry() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/analytics/log"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "id": 3})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let api = AnalyticsApi::new(client_for(&mock_server, Some("tok")));
        let entry = UsageLogEntry::success("list_tables", 42).with_credential(5);
        let ack = api.log_usage(&entry).await.unwrap();
        assert!(ack.success);

        let requests = mock_server.received_requests().await.unwrap();
        let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(sent["tool_name"], "list_tables");
        assert_eq!(sent["credential_id"], 5);
        assert!(sent.get("error_message").is_none());
    }
}
