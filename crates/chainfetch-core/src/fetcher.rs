//! Fetcher contract.
//!
//! A fetcher is the provider-specific half of a fetch: it declares its query
//! type and output record type, and supplies the three pure steps the
//! [`FetcherPipeline`](crate::pipeline::FetcherPipeline) runs around the
//! transport call.
//!
//! | Step | Method | Fails with |
//! |------|--------|------------|
//! | Query validation | [`transform_query`](Fetcher::transform_query) | [`ValidationError`] |
//! | Request building | [`build_requests`](Fetcher::build_requests) | never |
//! | Record normalization | [`transform_data`](Fetcher::transform_data) | [`FetchError`] |

use serde_json::Value;

use crate::fetch_error::FetchError;
use crate::http_client::HttpRequest;
use crate::normalizer::{normalize, FetchRecord};
use crate::query::QueryParams;
use crate::{Credentials, ValidationError};

pub trait Fetcher: Send + Sync + 'static {
    type Query: Send + Sync;
    type Record: FetchRecord;

    /// Provider this fetcher belongs to.
    fn provider(&self) -> &str;

    /// Stable name the fetcher is registered under.
    fn name(&self) -> &str;

    /// Validates raw host parameters into an immutable query.
    fn transform_query(&self, params: &QueryParams) -> Result<Self::Query, ValidationError>;

    /// Turns a query into outbound requests, in query order.
    ///
    /// Missing credentials must not fail here; the provider rejects the
    /// request instead.
    fn build_requests(
        &self,
        query: &Self::Query,
        credentials: Option<&Credentials>,
    ) -> Vec<HttpRequest>;

    /// Turns the ordered response bodies into output records.
    fn transform_data(
        &self,
        query: &Self::Query,
        responses: Vec<Value>,
    ) -> Result<Vec<Self::Record>, FetchError> {
        let _ = query;
        normalize(responses)
    }
}
