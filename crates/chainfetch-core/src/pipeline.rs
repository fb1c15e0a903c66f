//! Fetch pipeline.
//!
//! [`FetcherPipeline`] binds a [`Fetcher`] to a [`Transport`] and runs one
//! call end to end:
//!
//! ```text
//! params ──▶ transform_query ──▶ build_requests ──▶ Transport::execute_all
//!                                                          │
//!        RecordSet ◀── transform_data (flatten + validate) ◀┘
//! ```
//!
//! Every stage short-circuits on failure. A call makes exactly one pass over
//! the requests; there are no retries and no pagination. Dropping the
//! returned future abandons any in-flight requests.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

use crate::error::CoreError;
use crate::fetch_error::FetchError;
use crate::fetcher::Fetcher;
use crate::query::QueryParams;
use crate::transport::Transport;
use crate::Credentials;

/// Metadata describing one completed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchMeta {
    pub provider: String,
    pub fetcher: String,
    pub call_id: Uuid,
    pub request_count: usize,
    pub latency_ms: u64,
}

/// Ordered output records of one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSet<T> {
    pub meta: FetchMeta,
    pub records: Vec<T>,
}

impl<T> RecordSet<T> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}

impl RecordSet<Value> {
    /// Re-types records returned through the registry.
    pub fn into_typed<R: DeserializeOwned>(self) -> Result<RecordSet<R>, CoreError> {
        let records = self
            .records
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<R>, _>>()?;

        Ok(RecordSet {
            meta: self.meta,
            records,
        })
    }
}

type DynFetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<RecordSet<Value>, FetchError>> + Send + 'a>>;

/// Object-safe view of a pipeline, used by the registry.
///
/// Records come back as JSON values; callers that know the fetcher can use
/// [`RecordSet::into_typed`].
pub trait DynFetcher: Send + Sync {
    fn provider(&self) -> &str;

    fn name(&self) -> &str;

    fn fetch<'a>(
        &'a self,
        params: &'a QueryParams,
        credentials: Option<&'a Credentials>,
    ) -> DynFetchFuture<'a>;
}

/// A fetcher bound to the transport that executes its requests.
pub struct FetcherPipeline<F> {
    fetcher: F,
    transport: Arc<dyn Transport>,
}

impl<F: Fetcher> FetcherPipeline<F> {
    pub fn new(fetcher: F, transport: Arc<dyn Transport>) -> Self {
        Self { fetcher, transport }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Runs one fetch: validate, build, execute, normalize.
    pub async fn run(
        &self,
        params: &QueryParams,
        credentials: Option<&Credentials>,
    ) -> Result<RecordSet<F::Record>, FetchError> {
        let call_id = Uuid::new_v4();
        let span = info_span!(
            "fetch",
            provider = self.fetcher.provider(),
            fetcher = self.fetcher.name(),
            %call_id
        );

        self.run_stages(params, credentials, call_id)
            .instrument(span)
            .await
    }

    async fn run_stages(
        &self,
        params: &QueryParams,
        credentials: Option<&Credentials>,
        call_id: Uuid,
    ) -> Result<RecordSet<F::Record>, FetchError> {
        let started = Instant::now();

        let query = self
            .fetcher
            .transform_query(params)
            .map_err(FetchError::invalid_query)?;

        let requests = self.fetcher.build_requests(&query, credentials);
        let request_count = requests.len();
        debug!(request_count, "built requests");

        let responses = self
            .transport
            .execute_all(requests)
            .await
            .map_err(|error| {
                warn!(%error, retryable = error.retryable(), "transport failed");
                FetchError::transport(&error)
            })?;

        let records = self.fetcher.transform_data(&query, responses)?;
        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!(record_count = records.len(), latency_ms, "fetch completed");

        Ok(RecordSet {
            meta: FetchMeta {
                provider: self.fetcher.provider().to_owned(),
                fetcher: self.fetcher.name().to_owned(),
                call_id,
                request_count,
                latency_ms,
            },
            records,
        })
    }
}

impl<F: Fetcher> DynFetcher for FetcherPipeline<F> {
    fn provider(&self) -> &str {
        self.fetcher.provider()
    }

    fn name(&self) -> &str {
        self.fetcher.name()
    }

    fn fetch<'a>(
        &'a self,
        params: &'a QueryParams,
        credentials: Option<&'a Credentials>,
    ) -> DynFetchFuture<'a> {
        Box::pin(async move {
            let set = self.run(params, credentials).await?;
            let records = set
                .records
                .iter()
                .map(serde_json::to_value)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| FetchError::internal(format!("failed to serialize records: {e}")))?;

            Ok(RecordSet {
                meta: set.meta,
                records,
            })
        })
    }
}
