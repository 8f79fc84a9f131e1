//! Request execution for the xanodash backend
//!
//! - [`ApiClient`] resolves group URLs, attaches the bearer token and maps
//!   responses to typed models or [`ApiError`]
//! - [`TokenStore`] implementations hold the session token; the store is
//!   injected, never global
//! - [`InFlight`] shares one network call among identical concurrent reads
//!   when coalescing is enabled

pub mod client;
pub mod errors;
pub mod inflight;
pub mod token_store;

pub use client::{join_url, ApiClient, ApiClientBuilder, RequestOptions};
pub use errors::{ApiError, ApiErrorCategory};
pub use inflight::{InFlight, RequestKey};
pub use token_store::{KeychainTokenStore, MemoryTokenStore, TokenStore};
