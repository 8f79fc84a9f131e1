//! Analytics group models: usage summaries, trends, errors and log upkeep

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;
use uuid::Uuid;

/// Reporting window understood by the backend (`"24h"`, `"7d"`, `"30d"`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Period(String);

impl Period {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn last_day() -> Self {
        Self::new("24h")
    }

    pub fn last_week() -> Self {
        Self::new("7d")
    }

    pub fn last_month() -> Self {
        Self::new("30d")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Period {
    fn default() -> Self {
        Self::last_week()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Period {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Change against the previous window of the same length
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct PeriodComparison {
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub total_calls_change: f64,
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub success_rate_change: f64,
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub avg_response_time_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct AnalyticsSummary {
    pub total_calls: u64,
    pub successful_calls: u64,
    pub failed_calls: u64,
    pub success_rate: f64,
    pub avg_response_time_ms: f64,
    #[serde(default)]
    pub comparison: Option<PeriodComparison>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct EndpointTiming {
    pub endpoint: String,
    pub avg_ms: f64,
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub calls: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct PerformanceMetrics {
    pub avg_response_time_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub slowest_endpoints: Vec<EndpointTiming>,
    #[serde(default)]
    pub comparison: Option<PeriodComparison>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct TrendPoint {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub timestamp: DateTime<Utc>,
    pub calls: u64,
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub errors: u64,
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub avg_response_time_ms: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct TrendSeries {
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub points: Vec<TrendPoint>,
    #[serde(default)]
    pub comparison: Option<PeriodComparison>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct ErrorBucket {
    pub error_type: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct ErrorEvent {
    pub tool_name: String,
    pub message: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[cfg_attr(feature = "ts-gen", ts(type = "number"))]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct ErrorBreakdown {
    pub total_errors: u64,
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub by_type: Vec<ErrorBucket>,
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub recent: Vec<ErrorEvent>,
    #[serde(default)]
    pub comparison: Option<PeriodComparison>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct ToolMetrics {
    pub tool_name: String,
    pub total_calls: u64,
    pub success_rate: f64,
    pub avg_response_time_ms: f64,
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub daily: Vec<TrendPoint>,
}

/// Raw usage log rows for download; the row schema is owned by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct AnalyticsExport {
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    #[cfg_attr(feature = "ts-gen", ts(type = "Array<unknown>"))]
    pub records: Vec<serde_json::Value>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    #[cfg_attr(feature = "ts-gen", ts(type = "number | null"))]
    pub generated_at: Option<DateTime<Utc>>,
}

/// One tool invocation reported to the log-ingestion endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageLogEntry {
    pub request_id: Uuid,
    pub tool_name: String,
    pub success: bool,
    pub response_time_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<i64>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl UsageLogEntry {
    pub fn success(tool_name: impl Into<String>, response_time_ms: u64) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            tool_name: tool_name.into(),
            success: true,
            response_time_ms,
            error_message: None,
            credential_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failure(
        tool_name: impl Into<String>,
        response_time_ms: u64,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            error_message: Some(error_message.into()),
            ..Self::success(tool_name, response_time_ms)
        }
    }

    pub fn with_credential(mut self, credential_id: i64) -> Self {
        self.credential_id = Some(credential_id);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogAck {
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub success: bool,
    #[serde(default)]
    pub id: Option<i64>,
}

/// Options for the log-cleanup maintenance call.
///
/// `dry_run` defaults to `true`: a cleanup only deletes when asked explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupOptions {
    pub dry_run: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<u32>,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self { dry_run: true, retention_days: None }
    }
}

impl CleanupOptions {
    /// Options that actually delete rows
    pub fn destructive() -> Self {
        Self { dry_run: false, ..Self::default() }
    }

    pub fn retention_days(mut self, days: u32) -> Self {
        self.retention_days = Some(days);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
pub struct CleanupReport {
    pub dry_run: bool,
    /// Rows deleted, or rows that would be deleted for a dry run
    #[serde(default, deserialize_with = "crate::types::common::null_as_default")]
    pub affected_rows: u64,
}
