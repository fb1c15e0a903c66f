//! # Chainfetch Core
//!
//! Fetch pipeline and provider registry for option-chain reference data.
//!
//! ## Overview
//!
//! A provider integration is split into a [`Fetcher`] (what to ask for, how
//! to build the requests, how to read the answers) and a [`Transport`] (how
//! the requests are executed). [`FetcherPipeline`] composes the two into one
//! call, and [`ProviderRegistry`] exposes pipelines to the host by name.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider fetchers (ORATS tickers) |
//! | [`config`] | Fetcher configuration |
//! | [`domain`] | Symbols and credentials |
//! | [`error`] | Validation errors |
//! | [`fetch_error`] | Call-level fetch errors |
//! | [`fetcher`] | Fetcher contract |
//! | [`http_client`] | Single-request HTTP abstraction |
//! | [`normalizer`] | Response flattening and record validation |
//! | [`pipeline`] | Pipeline orchestration and record sets |
//! | [`provider`] | Provider definitions |
//! | [`query`] | Query parameter validation |
//! | [`registry`] | Name-based fetcher lookup |
//! | [`transport`] | Sequential and concurrent batch transports |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Host           │
//! └────────┬────────┘
//!          │ fetch(name, params, credentials)
//!          ▼
//! ┌─────────────────┐
//! │ ProviderRegistry│
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ FetcherPipeline │────▶│ Transport        │
//! │ (Fetcher)       │     │ (HttpClient)     │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ RecordSet       │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Every call returns `Result<_, FetchError>`:
//!
//! ```rust
//! use chainfetch_core::{FetchError, FetchErrorKind};
//!
//! fn handle_error(error: FetchError) {
//!     match error.kind() {
//!         FetchErrorKind::EmptyData => {
//!             // Nothing available for this query
//!         }
//!         FetchErrorKind::Transport if error.retryable() => {
//!             // Retry later
//!         }
//!         FetchErrorKind::InvalidQuery | FetchErrorKind::SchemaValidation => {
//!             // Report to user
//!         }
//!         _ => {}
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! - Credentials are supplied per call by the host, never read from the environment
//! - `Credentials` debug output and logged URLs never contain secret values

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod fetch_error;
pub mod fetcher;
pub mod http_client;
pub mod normalizer;
pub mod pipeline;
pub mod provider;
pub mod query;
pub mod registry;
pub mod transport;

// Adapter implementations
pub use adapters::{
    orats_provider, OratsTickersFetcher, TickerRecord, ORATS_PROVIDER, TICKERS_FETCHER,
};

// Configuration
pub use config::{ExecutionMode, OratsConfig};

// Domain types
pub use domain::{Credentials, Symbol};

// Error types
pub use error::{CoreError, ValidationError};
pub use fetch_error::{FetchError, FetchErrorKind};

// Pipeline
pub use fetcher::Fetcher;
pub use normalizer::FetchRecord;
pub use pipeline::{DynFetcher, FetchMeta, FetcherPipeline, RecordSet};
pub use query::{OptionsChainsQuery, QueryParams};

// HTTP client and transports
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};
pub use transport::{transport_for, ConcurrentTransport, SequentialTransport, Transport};

// Registry
pub use provider::Provider;
pub use registry::{ProviderRegistry, ProviderRegistryBuilder};
