//! In-flight request coalescing
//!
//! Identical concurrent reads share one network call. An entry lives only
//! while its request is running; completed results are never served again.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::Method;
use serde_json::Value;
use tracing::trace;
use xanodash_domain::{ApiGroup, BearerToken};

use super::errors::ApiError;

type SharedExchange = Shared<BoxFuture<'static, Result<Value, ApiError>>>;

/// Identity of a request for coalescing purposes.
///
/// The token is folded in as a fingerprint so that callers with different
/// sessions never share a response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    group: ApiGroup,
    path: String,
    method: Method,
    body_hash: String,
    principal: String,
}

impl RequestKey {
    pub fn new(
        group: ApiGroup,
        path: &str,
        method: &Method,
        body: Option<&Value>,
        token: Option<&BearerToken>,
    ) -> Self {
        let body_hash = body.map(|value| fingerprint(value.to_string().as_bytes())).unwrap_or_default();
        let principal = token.map(|token| fingerprint(token.expose().as_bytes())).unwrap_or_default();

        Self { group, path: path.to_string(), method: method.clone(), body_hash, principal }
    }
}

fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(&blake3::hash(bytes).as_bytes()[..16])
}

/// Table of requests currently on the wire
#[derive(Clone, Default)]
pub struct InFlight {
    pending: Arc<DashMap<RequestKey, SharedExchange>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the running request for `key`, or start one with `start`.
    pub async fn run<F>(&self, key: RequestKey, start: F) -> Result<Value, ApiError>
    where
        F: FnOnce() -> BoxFuture<'static, Result<Value, ApiError>>,
    {
        let shared = match self.pending.entry(key.clone()) {
            Entry::Occupied(existing) => {
                trace!(path = %key.path, "joining in-flight request");
                existing.get().clone()
            }
            Entry::Vacant(slot) => {
                let shared = start().shared();
                slot.insert(shared.clone());
                shared
            }
        };

        let result = shared.clone().await;

        // Whoever finishes first removes the entry, but only if it still
        // belongs to this exchange.
        self.pending.remove_if(&key, |_, current| current.ptr_eq(&shared));
        result
    }

    /// Number of requests currently shared
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
