//! Query and mutation state holders
//!
//! The dashboard's screens never call façades directly. They own a [`Query`]
//! that tracks loading/data/error for one fetcher and notifies subscribers on
//! every change, and they run writes through [`mutate_then_refetch`] so the
//! affected query reloads after a successful mutation.
//!
//! Stale responses are not discarded: if two refetches overlap, the one that
//! finishes last wins.

use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, instrument};

use crate::api::{ApiError, TokenStore};

/// Snapshot of a query
#[derive(Debug, Clone)]
pub struct QueryState<T> {
    pub loading: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self { loading: false, data: None, error: None }
    }
}

impl<T> QueryState<T> {
    /// Neither loading nor holding a result
    pub fn is_idle(&self) -> bool {
        !self.loading && self.data.is_none() && self.error.is_none()
    }
}

type Fetcher<P, T> = Box<dyn Fn(P) -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync>;

/// Data-fetching state for one parameterised read
pub struct Query<P, T> {
    fetcher: Fetcher<P, T>,
    params: Mutex<P>,
    session: Option<Arc<dyn TokenStore>>,
    state: watch::Sender<QueryState<T>>,
}

impl<P, T> Query<P, T>
where
    P: Clone + PartialEq + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Build an idle query. Nothing is fetched until [`Query::refetch`].
    pub fn new<F, Fut>(params: P, fetcher: F) -> Self
    where
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let (state, _) = watch::channel(QueryState::default());
        Self {
            fetcher: Box::new(move |params| fetcher(params).boxed()),
            params: Mutex::new(params),
            session: None,
            state,
        }
    }

    /// Only fetch while `tokens` holds a session token
    pub fn requires_session(mut self, tokens: Arc<dyn TokenStore>) -> Self {
        self.session = Some(tokens);
        self
    }

    pub fn state(&self) -> QueryState<T> {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
        self.state.subscribe()
    }

    pub fn params(&self) -> P {
        self.params.lock().clone()
    }

    /// Run the fetcher with the current parameters.
    ///
    /// Without a session (when one is required) the state is left as is. A
    /// failed fetch records the error and keeps the previous data.
    #[instrument(skip(self))]
    pub async fn refetch(&self) {
        if let Some(tokens) = &self.session {
            if tokens.token().is_none() {
                debug!("No session token; query left idle");
                return;
            }
        }

        let params = self.params();
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        let result = (self.fetcher)(params).await;

        self.state.send_modify(move |state| {
            state.loading = false;
            match result {
                Ok(data) => state.data = Some(data),
                Err(err) => {
                    debug!(error = %err, "Query fetch failed");
                    state.error = Some(err);
                }
            }
        });
    }

    /// Replace the parameters and refetch if they changed
    pub async fn set_params(&self, params: P) {
        let changed = {
            let mut current = self.params.lock();
            if *current == params {
                false
            } else {
                *current = params;
                true
            }
        };

        if changed {
            self.refetch().await;
        }
    }
}

/// Await `mutation`, then refetch `query` if it succeeded.
///
/// On failure the query is not touched and the error is returned.
///
/// # Errors
/// Returns the mutation's error unchanged.
pub async fn mutate_then_refetch<M, R, P, T>(mutation: M, query: &Query<P, T>) -> Result<R, ApiError>
where
    M: Future<Output = Result<R, ApiError>>,
    P: Clone + PartialEq + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    let outcome = mutation.await?;
    query.refetch().await;
    Ok(outcome)
}
