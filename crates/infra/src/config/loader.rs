//! Configuration loader
//!
//! ## Loading Strategy
//! 1. `.env` files are read into the process environment (`dotenvy`)
//! 2. The environment is tried first
//! 3. If a required variable is missing, falls back to a config file
//! 4. Probes multiple paths for config files (JSON or TOML)
//!
//! ## Environment Variables
//! - `XANODASH_AUTH_URL`, `XANODASH_CREDENTIALS_URL`, `XANODASH_ANALYTICS_URL`,
//!   `XANODASH_BILLING_URL`: base URL per API group (required)
//! - `XANODASH_ENV`: `development` or `production` (default `production`)
//! - `XANODASH_TIMEOUT_MS`: per-call timeout in milliseconds
//! - `XANODASH_MAX_ATTEMPTS`: total attempts for idempotent requests
//! - `XANODASH_RETRY_BACKOFF_MS`: delay before the first retry
//! - `XANODASH_COALESCE_READS`: share identical concurrent GETs (true/false)
//! - `XANODASH_USER_AGENT`: optional `User-Agent` override
//!
//! ## File Locations
//! `xanodash.{json,toml}` then `config.{json,toml}`, looked up in the
//! current directory, its two parents, and next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use url::Url;
use xanodash_domain::constants::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_BACKOFF_MS, DEFAULT_TIMEOUT_MS, ENV_ANALYTICS_URL,
    ENV_AUTH_URL, ENV_BILLING_URL, ENV_COALESCE_READS, ENV_CREDENTIALS_URL, ENV_MAX_ATTEMPTS,
    ENV_RETRY_BACKOFF_MS, ENV_RUN_MODE, ENV_TIMEOUT_MS, ENV_USER_AGENT,
};
use xanodash_domain::{
    ApiGroup, ApiGroupsConfig, ClientConfig, Result, RetryConfig, RunMode, XanodashError,
};

const CONFIG_FILE_NAMES: [&str; 4] = ["xanodash.json", "xanodash.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `XanodashError::Config` if neither source yields a complete,
/// valid configuration.
pub fn load() -> Result<ClientConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)?
        }
    };

    validate(&config)?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// The four group URLs are required; everything else falls back to its
/// default.
///
/// # Errors
/// Returns `XanodashError::Config` if a required variable is missing or a
/// value cannot be parsed.
pub fn load_from_env() -> Result<ClientConfig> {
    let groups = ApiGroupsConfig {
        auth: env_var(ENV_AUTH_URL)?,
        credentials: env_var(ENV_CREDENTIALS_URL)?,
        analytics: env_var(ENV_ANALYTICS_URL)?,
        billing: env_var(ENV_BILLING_URL)?,
    };

    let run_mode = match std::env::var(ENV_RUN_MODE) {
        Ok(value) => RunMode::from_str(&value).map_err(XanodashError::Config)?,
        Err(_) => RunMode::default(),
    };

    Ok(ClientConfig {
        run_mode,
        groups,
        timeout_ms: env_parse(ENV_TIMEOUT_MS, DEFAULT_TIMEOUT_MS)?,
        retry: RetryConfig {
            max_attempts: env_parse(ENV_MAX_ATTEMPTS, DEFAULT_MAX_ATTEMPTS)?,
            base_backoff_ms: env_parse(ENV_RETRY_BACKOFF_MS, DEFAULT_RETRY_BACKOFF_MS)?,
        },
        coalesce_reads: env_bool(ENV_COALESCE_READS, false),
        user_agent: std::env::var(ENV_USER_AGENT).ok().filter(|agent| !agent.trim().is_empty()),
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `XanodashError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(XanodashError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            XanodashError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| XanodashError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Check group URLs and numeric limits
///
/// # Errors
/// Returns `XanodashError::Config` naming the first offending field.
pub fn validate(config: &ClientConfig) -> Result<()> {
    for group in ApiGroup::ALL {
        validate_base_url(group, config.groups.base_url(group))?;
    }
    config.validate_limits()
}

fn validate_base_url(group: ApiGroup, raw: &str) -> Result<()> {
    let parsed = Url::parse(raw)
        .map_err(|e| XanodashError::Config(format!("Invalid {group} base URL '{raw}': {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(XanodashError::Config(format!(
            "Unsupported scheme '{other}' in {group} base URL"
        ))),
    }
}

/// Parse configuration from string content; format follows the extension
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| XanodashError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| XanodashError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(XanodashError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file in the standard locations, if any
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        XanodashError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional numeric variable, using `default` when unset
fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| XanodashError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
