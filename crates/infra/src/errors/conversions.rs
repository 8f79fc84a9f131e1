//! Conversions from external infrastructure errors into [`ApiError`].

use keyring::Error as KeyringError;
use reqwest::Error as HttpError;
use xanodash_domain::XanodashError;

use crate::api::errors::ApiError;

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ApiError */
/* -------------------------------------------------------------------------- */

impl From<HttpError> for ApiError {
    fn from(err: HttpError) -> Self {
        if err.is_builder() {
            return ApiError::Config(format!("invalid HTTP request: {err}"));
        }

        if err.is_decode() {
            let endpoint = err.url().map(|url| url.path().to_string()).unwrap_or_default();
            return ApiError::Decode { endpoint, message: err.to_string() };
        }

        if err.is_timeout() {
            return ApiError::Network(format!("HTTP request timed out: {err}"));
        }

        #[cfg(not(target_arch = "wasm32"))]
        if err.is_connect() {
            return ApiError::Network(format!("HTTP connection failure: {err}"));
        }

        ApiError::Network(format!("HTTP transport error: {err}"))
    }
}

/* -------------------------------------------------------------------------- */
/* keyring::Error → ApiError */
/* -------------------------------------------------------------------------- */

impl From<KeyringError> for ApiError {
    fn from(err: KeyringError) -> Self {
        use KeyringError::{Ambiguous, BadEncoding, NoEntry, NoStorageAccess, PlatformFailure};

        match err {
            NoEntry => ApiError::TokenStore("keychain entry not found".into()),
            BadEncoding(_) => {
                ApiError::TokenStore("token in keychain is not valid UTF-8".into())
            }
            Ambiguous(entries) => ApiError::TokenStore(format!(
                "multiple keychain entries matched request ({} results)",
                entries.len()
            )),
            PlatformFailure(err) => ApiError::TokenStore(format!("keychain platform error: {err}")),
            NoStorageAccess(err) => {
                ApiError::TokenStore(format!("unable to access secure storage: {err}"))
            }
            other => ApiError::TokenStore(other.to_string()),
        }
    }
}

/* -------------------------------------------------------------------------- */
/* XanodashError → ApiError */
/* -------------------------------------------------------------------------- */

impl From<XanodashError> for ApiError {
    fn from(err: XanodashError) -> Self {
        ApiError::Config(err.to_string())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
