//! Behavior-driven tests for the fetch pipeline
//!
//! These tests verify HOW a fetch behaves end to end: request fan-out,
//! response flattening, record validation and error propagation, using
//! in-process HTTP clients instead of the network.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chainfetch_core::{
    transport_for, Credentials, ExecutionMode, FetchErrorKind, FetcherPipeline, HttpClient,
    HttpError, HttpRequest, HttpResponse, OratsConfig, OratsTickersFetcher, QueryParams,
};
use serde_json::{json, Value};

/// Records every request and answers per ticker, echoing a valid record by default.
#[derive(Default)]
struct ScriptedHttpClient {
    scripted: HashMap<String, HttpResponse>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    fn echo() -> Self {
        Self::default()
    }

    fn respond(mut self, ticker: &str, response: HttpResponse) -> Self {
        self.scripted.insert(ticker.to_owned(), response);
        self
    }

    fn recorded_requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let ticker = request.query_param("ticker").unwrap_or_default();
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);

        let echoed = json!([{ "ticker": ticker, "min": "2020-01-01", "max": "2020-12-31" }]);
        let response = match self.scripted.get(&ticker) {
            Some(response) => response.clone(),
            None => json_body(json!({ "data": echoed })),
        };
        Box::pin(async move { Ok(response) })
    }
}

struct HangingHttpClient {
    started: Mutex<usize>,
}

impl HttpClient for HangingHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let _ = request;
        *self.started.lock().expect("counter should not be poisoned") += 1;
        Box::pin(async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(HttpResponse::ok_json("[]"))
        })
    }
}

fn pipeline(
    client: Arc<dyn HttpClient>,
    execution: ExecutionMode,
) -> FetcherPipeline<OratsTickersFetcher> {
    let config = OratsConfig::default().with_execution(execution);
    FetcherPipeline::new(
        OratsTickersFetcher::new(config.clone()),
        transport_for(config.execution, client),
    )
}

fn params(value: Value) -> QueryParams {
    match value {
        Value::Object(map) => map,
        _ => panic!("query params fixture must be an object"),
    }
}

fn json_body(value: Value) -> HttpResponse {
    HttpResponse::ok_json(value.to_string())
}

fn credentials() -> Credentials {
    Credentials::new().with("orats_api_key", "test-token")
}

// =============================================================================
// Pipeline: Fan-out and Ordering
// =============================================================================

#[tokio::test]
async fn when_multiple_symbols_are_requested_records_follow_symbol_order() {
    for execution in [
        ExecutionMode::Sequential,
        ExecutionMode::Concurrent { max_in_flight: 3 },
    ] {
        // Given: An echoing provider
        let client = Arc::new(ScriptedHttpClient::echo());
        let pipeline = pipeline(client.clone(), execution);

        // When: Four symbols are requested in one call
        let result = pipeline
            .run(&params(json!({ "symbol": "SPY,QQQ,IWM,DIA" })), Some(&credentials()))
            .await
            .expect("fetch should succeed");

        // Then: One record per symbol, in the order the symbols were given
        let tickers: Vec<&str> = result.records.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["SPY", "QQQ", "IWM", "DIA"], "{execution:?}");
        assert_eq!(client.recorded_requests().len(), 4);
        assert_eq!(result.meta.request_count, 4);
    }
}

#[tokio::test]
async fn when_symbol_is_repeated_each_occurrence_is_fetched() {
    // Given: An echoing provider
    let client = Arc::new(ScriptedHttpClient::echo());
    let pipeline = pipeline(client.clone(), ExecutionMode::default());

    // When: The same symbol is listed twice
    let result = pipeline
        .run(&params(json!({ "symbol": "SPY, SPY" })), Some(&credentials()))
        .await
        .expect("fetch should succeed");

    // Then: Both occurrences are fetched and returned
    assert_eq!(result.len(), 2);
    assert_eq!(client.recorded_requests().len(), 2);
}

#[tokio::test]
async fn when_credentials_are_absent_call_is_made_with_empty_token() {
    // Given: An echoing provider and no credentials
    let client = Arc::new(ScriptedHttpClient::echo());
    let pipeline = pipeline(client.clone(), ExecutionMode::default());

    // When: A fetch is run without credentials
    let result = pipeline
        .run(&params(json!({ "symbol": "SPY" })), None)
        .await
        .expect("fetch should succeed");

    // Then: The request carried an empty token and the records came back
    assert_eq!(result.len(), 1);
    let requests = client.recorded_requests();
    assert_eq!(requests[0].query_param("token").as_deref(), Some(""));
}

// =============================================================================
// Pipeline: Response Shapes
// =============================================================================

#[tokio::test]
async fn when_responses_mix_bare_and_wrapped_lists_all_records_are_kept() {
    // Given: One provider answer is a bare list, the other wraps under "data"
    let body = json!([
        { "ticker": "SPY", "min": "2007-01-03", "max": "2024-06-28" },
        { "ticker": "SPX", "min": "2007-01-03", "max": "2024-06-28" }
    ]);
    let client = Arc::new(ScriptedHttpClient::echo().respond("SPY", json_body(body)));
    let pipeline = pipeline(client, ExecutionMode::default());

    // When: Both symbols are fetched together
    let result = pipeline
        .run(&params(json!({ "symbol": "SPY,QQQ" })), Some(&credentials()))
        .await
        .expect("fetch should succeed");

    // Then: Records from both shapes are present, in response order
    let tickers: Vec<&str> = result.records.iter().map(|r| r.ticker.as_str()).collect();
    assert_eq!(tickers, vec!["SPY", "SPX", "QQQ"]);
}

#[tokio::test]
async fn when_every_response_is_empty_user_gets_empty_data_error() {
    // Given: A provider with nothing for any symbol
    let client = Arc::new(
        ScriptedHttpClient::echo()
            .respond("SPY", HttpResponse::ok_json("[]"))
            .respond("QQQ", HttpResponse::ok_json(r#"{"data": []}"#)),
    );
    let pipeline = pipeline(client, ExecutionMode::default());

    // When: Both symbols are fetched
    let error = pipeline
        .run(&params(json!({ "symbol": "SPY,QQQ" })), Some(&credentials()))
        .await
        .expect_err("no data should fail");

    // Then: The failure is the recoverable "no data" kind
    assert_eq!(error.kind(), FetchErrorKind::EmptyData);
    assert!(error.is_empty_data());
}

#[tokio::test]
async fn when_response_has_unexpected_shape_it_counts_as_no_data() {
    // Given: The provider answers with an error object instead of records
    let unexpected = HttpResponse::ok_json(r#"{"message": "ticker not covered"}"#);
    let client = Arc::new(ScriptedHttpClient::echo().respond("SPY", unexpected));
    let pipeline = pipeline(client, ExecutionMode::default());

    // When: Only that symbol is fetched
    let error = pipeline
        .run(&params(json!({ "symbol": "SPY" })), Some(&credentials()))
        .await
        .expect_err("no data should fail");

    // Then: No crash, just empty data
    assert_eq!(error.kind(), FetchErrorKind::EmptyData);
}

// =============================================================================
// Pipeline: Validation and Transport Errors
// =============================================================================

#[tokio::test]
async fn when_a_record_is_missing_max_whole_call_fails() {
    // Given: The second symbol's record lacks "max"
    let body = json!({ "data": [{ "ticker": "QQQ", "min": "2020-01-01" }] });
    let client = Arc::new(ScriptedHttpClient::echo().respond("QQQ", json_body(body)));
    let pipeline = pipeline(client, ExecutionMode::default());

    // When: Both symbols are fetched
    let error = pipeline
        .run(&params(json!({ "symbol": "SPY,QQQ" })), Some(&credentials()))
        .await
        .expect_err("invalid record should fail the call");

    // Then: A schema error names the record position and field
    assert_eq!(error.kind(), FetchErrorKind::SchemaValidation);
    assert_eq!(error.record(), Some(1));
    assert_eq!(error.field(), Some("max"));
}

#[tokio::test]
async fn when_symbol_is_missing_no_request_is_sent() {
    // Given: An echoing provider
    let client = Arc::new(ScriptedHttpClient::echo());
    let pipeline = pipeline(client.clone(), ExecutionMode::default());

    // When: The host forgets the symbol parameter
    let error = pipeline
        .run(&params(json!({ "expiration": "2024-06-21" })), Some(&credentials()))
        .await
        .expect_err("missing symbol should fail");

    // Then: An invalid-query error is returned before any network call
    assert_eq!(error.kind(), FetchErrorKind::InvalidQuery);
    assert!(error.message().contains("symbol"));
    assert!(client.recorded_requests().is_empty());
}

#[tokio::test]
async fn when_provider_rejects_token_user_gets_non_retryable_transport_error() {
    // Given: The provider answers 401 for one symbol
    let rejected = HttpResponse::with_status(401, "unauthorized");
    let client = Arc::new(ScriptedHttpClient::echo().respond("QQQ", rejected));
    let pipeline = pipeline(client, ExecutionMode::default());

    // When: A multi-symbol fetch is run
    let error = pipeline
        .run(&params(json!({ "symbol": "SPY,QQQ" })), None)
        .await
        .expect_err("401 should fail the call");

    // Then: The whole call fails with a transport error
    assert_eq!(error.kind(), FetchErrorKind::Transport);
    assert!(!error.retryable());
    assert!(error.message().contains("401"));
}

#[tokio::test]
async fn when_host_cancels_call_in_flight_requests_are_abandoned() {
    // Given: A provider that never answers
    let client = Arc::new(HangingHttpClient {
        started: Mutex::new(0),
    });
    let pipeline = pipeline(client.clone(), ExecutionMode::Concurrent { max_in_flight: 2 });
    let params = params(json!({ "symbol": "SPY,QQQ" }));

    // When: The host gives up after a short wait
    let outcome =
        tokio::time::timeout(Duration::from_millis(50), pipeline.run(&params, None)).await;

    // Then: No result is produced at all
    assert!(outcome.is_err(), "cancelled call must not yield a result");
    assert_eq!(*client.started.lock().expect("counter should not be poisoned"), 2);
}

#[tokio::test]
async fn metadata_identifies_provider_and_fetcher() {
    // Given: An echoing provider
    let pipeline = pipeline(Arc::new(ScriptedHttpClient::echo()), ExecutionMode::default());

    // When: A fetch completes
    let result = pipeline
        .run(&params(json!({ "symbol": "SPY" })), Some(&credentials()))
        .await
        .expect("fetch should succeed");

    // Then: The record set carries call metadata
    assert_eq!(result.meta.provider, "ORATS");
    assert_eq!(result.meta.fetcher, "Tickers");
    assert_eq!(result.meta.request_count, 1);
}
