//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! service layer.

// Transport defaults
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 200;
pub const MAX_RETRY_ATTEMPTS: u32 = 10;

// Pagination
pub const DEFAULT_INVOICE_PAGE: u32 = 1;
pub const DEFAULT_INVOICE_PAGE_SIZE: u32 = 20;

// Profile updates send absent fields as this sentinel
pub const EMPTY_FIELD_SENTINEL: &str = "";

// Persistent token storage
pub const DEFAULT_KEYCHAIN_SERVICE: &str = "xanodash";
pub const DEFAULT_KEYCHAIN_ACCOUNT: &str = "session";

// Environment variables
pub const ENV_AUTH_URL: &str = "XANODASH_AUTH_URL";
pub const ENV_CREDENTIALS_URL: &str = "XANODASH_CREDENTIALS_URL";
pub const ENV_ANALYTICS_URL: &str = "XANODASH_ANALYTICS_URL";
pub const ENV_BILLING_URL: &str = "XANODASH_BILLING_URL";
pub const ENV_RUN_MODE: &str = "XANODASH_ENV";
pub const ENV_TIMEOUT_MS: &str = "XANODASH_TIMEOUT_MS";
pub const ENV_MAX_ATTEMPTS: &str = "XANODASH_MAX_ATTEMPTS";
pub const ENV_RETRY_BACKOFF_MS: &str = "XANODASH_RETRY_BACKOFF_MS";
pub const ENV_COALESCE_READS: &str = "XANODASH_COALESCE_READS";
pub const ENV_USER_AGENT: &str = "XANODASH_USER_AGENT";
