//! Client configuration structures
//!
//! `ClientConfig` is plain data: loading it from the environment or a file is
//! the job of `xanodash_infra::config`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_BACKOFF_MS, DEFAULT_TIMEOUT_MS, MAX_RETRY_ATTEMPTS,
};
use crate::errors::{Result, XanodashError};
use crate::impl_wire_enum_conversions;

/// Logical backend surface. Each group has its own base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiGroup {
    Auth,
    Credentials,
    Analytics,
    Billing,
}

impl ApiGroup {
    pub const ALL: [ApiGroup; 4] =
        [ApiGroup::Auth, ApiGroup::Credentials, ApiGroup::Analytics, ApiGroup::Billing];
}

impl_wire_enum_conversions!(ApiGroup {
    Auth => "auth",
    Credentials => "credentials",
    Analytics => "analytics",
    Billing => "billing",
});

/// Process run mode. Request diagnostics are only emitted in development.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Development,
    #[default]
    Production,
}

impl RunMode {
    pub fn is_development(self) -> bool {
        matches!(self, RunMode::Development)
    }
}

impl_wire_enum_conversions!(RunMode {
    Development => "development",
    Production => "production",
});

/// Base URL per API group, e.g. `https://x1.xano.io/api:AbCd1234`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiGroupsConfig {
    pub auth: String,
    pub credentials: String,
    pub analytics: String,
    pub billing: String,
}

impl ApiGroupsConfig {
    pub fn base_url(&self, group: ApiGroup) -> &str {
        match group {
            ApiGroup::Auth => &self.auth,
            ApiGroup::Credentials => &self.credentials,
            ApiGroup::Analytics => &self.analytics,
            ApiGroup::Billing => &self.billing,
        }
    }

    /// Every group pointed at the same base URL. Handy for tests and for
    /// single-group deployments.
    pub fn uniform(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            auth: base_url.clone(),
            credentials: base_url.clone(),
            analytics: base_url.clone(),
            billing: base_url,
        }
    }
}

/// Bounded retry policy for idempotent requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first one. `1` disables retries.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each further retry.
    #[serde(default = "default_retry_backoff_ms")]
    pub base_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS, base_backoff_ms: DEFAULT_RETRY_BACKOFF_MS }
    }
}

impl RetryConfig {
    pub fn base_backoff(&self) -> Duration {
        Duration::from_millis(self.base_backoff_ms)
    }
}

/// Configuration for the remote resource client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub run_mode: RunMode,
    pub groups: ApiGroupsConfig,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub retry: RetryConfig,
    /// Share one network call among identical concurrent GET requests
    #[serde(default)]
    pub coalesce_reads: bool,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ClientConfig {
    pub fn new(groups: ApiGroupsConfig) -> Self {
        Self {
            run_mode: RunMode::default(),
            groups,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry: RetryConfig::default(),
            coalesce_reads: false,
            user_agent: None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check numeric bounds. URL validation happens in the infra loader.
    ///
    /// # Errors
    /// Returns `XanodashError::Config` for a zero timeout or an out-of-range
    /// attempt count.
    pub fn validate_limits(&self) -> Result<()> {
        if self.timeout_ms == 0 {
            return Err(XanodashError::Config("timeout_ms must be greater than zero".into()));
        }
        if self.retry.max_attempts == 0 || self.retry.max_attempts > MAX_RETRY_ATTEMPTS {
            return Err(XanodashError::Config(format!(
                "retry.max_attempts must be between 1 and {MAX_RETRY_ATTEMPTS}, got {}",
                self.retry.max_attempts
            )));
        }
        Ok(())
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_retry_backoff_ms() -> u64 {
    DEFAULT_RETRY_BACKOFF_MS
}
