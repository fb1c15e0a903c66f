//! Batch transports.
//!
//! A [`Transport`] executes an ordered batch of requests and returns the
//! parsed JSON bodies in the same order. The batch is all-or-nothing: the
//! first failed request fails the whole batch and the remaining requests are
//! dropped.
//!
//! Both implementations enforce each request's `timeout_ms` on top of
//! whatever the [`HttpClient`] does, so fake clients get the same timeout
//! behavior as reqwest.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::{StreamExt, TryStreamExt};
use serde_json::Value;
use tracing::debug;

use crate::config::ExecutionMode;
use crate::http_client::{HttpClient, HttpError, HttpRequest};

type BatchFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<Value>, HttpError>> + Send + 'a>>;

/// Executes a batch of requests, preserving order.
pub trait Transport: Send + Sync {
    fn execute_all<'a>(&'a self, requests: Vec<HttpRequest>) -> BatchFuture<'a>;
}

/// Builds the transport matching an execution mode.
pub fn transport_for(mode: ExecutionMode, client: Arc<dyn HttpClient>) -> Arc<dyn Transport> {
    match mode {
        ExecutionMode::Sequential => Arc::new(SequentialTransport::new(client)),
        ExecutionMode::Concurrent { max_in_flight } => {
            Arc::new(ConcurrentTransport::new(client, max_in_flight))
        }
    }
}

/// Runs requests one after another.
#[derive(Clone)]
pub struct SequentialTransport {
    client: Arc<dyn HttpClient>,
}

impl SequentialTransport {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        Self { client }
    }
}

impl Transport for SequentialTransport {
    fn execute_all<'a>(&'a self, requests: Vec<HttpRequest>) -> BatchFuture<'a> {
        Box::pin(async move {
            let mut bodies = Vec::with_capacity(requests.len());
            for request in requests {
                bodies.push(fetch_json(self.client.as_ref(), request).await?);
            }
            Ok(bodies)
        })
    }
}

/// Fans requests out with at most `max_in_flight` outstanding at once.
#[derive(Clone)]
pub struct ConcurrentTransport {
    client: Arc<dyn HttpClient>,
    max_in_flight: usize,
}

impl ConcurrentTransport {
    pub fn new(client: Arc<dyn HttpClient>, max_in_flight: usize) -> Self {
        Self {
            client,
            max_in_flight: max_in_flight.max(1),
        }
    }

    pub const fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }
}

impl Transport for ConcurrentTransport {
    fn execute_all<'a>(&'a self, requests: Vec<HttpRequest>) -> BatchFuture<'a> {
        Box::pin(async move {
            let client = self.client.as_ref();
            futures::stream::iter(requests)
                .map(|request| fetch_json(client, request))
                .buffered(self.max_in_flight)
                .try_collect::<Vec<Value>>()
                .await
        })
    }
}

async fn fetch_json(client: &dyn HttpClient, request: HttpRequest) -> Result<Value, HttpError> {
    let timeout_ms = request.timeout_ms;
    debug!(url = %request.redacted_url(), timeout_ms, "sending request");

    let response = tokio::time::timeout(
        Duration::from_millis(timeout_ms),
        client.execute(request),
    )
    .await
    .map_err(|_| HttpError::timeout(timeout_ms))??;

    if !response.is_success() {
        return Err(HttpError::status(response.status));
    }

    serde_json::from_str(&response.body)
        .map_err(|e| HttpError::non_retryable(format!("response body is not valid JSON: {e}")))
}
