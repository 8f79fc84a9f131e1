//! # xanodash Infrastructure
//!
//! Everything that talks to the outside world on behalf of the dashboard.
//!
//! This crate contains:
//! - HTTP transport with timeout and bounded retry (`http`)
//! - Request executor, token stores and in-flight coalescing (`api`)
//! - Typed façades for the auth, credentials, analytics and billing groups
//!   (`resources`)
//! - Query/mutation state holders consumed by UI code (`query`)
//! - Configuration loading and logging setup (`config`, `observability`)
//!
//! ## Architecture
//! - Implements I/O over the plain data types in `xanodash-domain`
//! - The token store is injected; there is no global session state

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod query;
pub mod resources;

// Re-export commonly used items
pub use api::{
    join_url, ApiClient, ApiClientBuilder, ApiError, ApiErrorCategory, InFlight, KeychainTokenStore,
    MemoryTokenStore, RequestKey, RequestOptions, TokenStore,
};
pub use http::{HttpClient, HttpClientBuilder};
pub use query::{mutate_then_refetch, Query, QueryState};
pub use resources::{AnalyticsApi, AuthApi, BillingApi, CredentialsApi, XanoClient};
