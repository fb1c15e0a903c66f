//! Provider registry.
//!
//! The registry maps stable fetcher names to pipelines. It is assembled once
//! at startup from [`Provider`] definitions and is read-only afterwards, so
//! it can be shared behind an `Arc` without locking.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use chainfetch_core::{
//!     orats_provider, Credentials, OratsConfig, ProviderRegistry, ReqwestHttpClient,
//! };
//!
//! let http_client = Arc::new(ReqwestHttpClient::new());
//! let registry = ProviderRegistry::builder()
//!     .with_provider(orats_provider(OratsConfig::default(), http_client))
//!     .build()?;
//!
//! let credentials = Credentials::new().with("orats_api_key", api_key);
//! let params = serde_json::json!({ "symbol": "SPY,QQQ" });
//! let tickers = registry
//!     .fetch("Tickers", params.as_object().unwrap(), Some(&credentials))
//!     .await?;
//! ```

use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::fetch_error::FetchError;
use crate::pipeline::{DynFetcher, RecordSet};
use crate::provider::Provider;
use crate::query::QueryParams;
use crate::{Credentials, ValidationError};

/// Read-only lookup from fetcher name to pipeline.
pub struct ProviderRegistry {
    providers: Vec<Provider>,
    fetchers: HashMap<String, Arc<dyn DynFetcher>>,
}

impl ProviderRegistry {
    pub fn builder() -> ProviderRegistryBuilder {
        ProviderRegistryBuilder::default()
    }

    /// Builds a registry; fetcher names must be unique across providers.
    pub fn new(providers: Vec<Provider>) -> Result<Self, ValidationError> {
        let mut fetchers = HashMap::new();
        for provider in &providers {
            for fetcher in provider.fetchers() {
                let name = fetcher.name().to_owned();
                if fetchers.contains_key(&name) {
                    return Err(ValidationError::DuplicateFetcher { name });
                }
                fetchers.insert(name, Arc::clone(fetcher));
            }
        }

        Ok(Self {
            providers,
            fetchers,
        })
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn provider(&self, name: &str) -> Option<&Provider> {
        self.providers
            .iter()
            .find(|provider| provider.name() == name)
    }

    /// Registered fetcher names, sorted.
    pub fn fetcher_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fetchers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fetchers.contains_key(name)
    }

    /// Looks a pipeline up by its exact fetcher name.
    pub fn lookup(&self, name: &str) -> Result<&dyn DynFetcher, FetchError> {
        self.fetchers
            .get(name)
            .map(|fetcher| fetcher.as_ref())
            .ok_or_else(|| FetchError::not_found(name))
    }

    /// Host entry point: `lookup(name)` then one pipeline run.
    pub async fn fetch(
        &self,
        name: &str,
        params: &QueryParams,
        credentials: Option<&Credentials>,
    ) -> Result<RecordSet<Value>, FetchError> {
        let fetcher = self.lookup(name).inspect_err(|_| {
            debug!(fetcher = name, "fetcher not registered");
        })?;
        fetcher.fetch(params, credentials).await
    }
}

impl Debug for ProviderRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.providers)
            .field("fetchers", &self.fetcher_names())
            .finish()
    }
}

/// Collects provider definitions before the registry is frozen.
#[derive(Debug, Default)]
pub struct ProviderRegistryBuilder {
    providers: Vec<Provider>,
}

impl ProviderRegistryBuilder {
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn build(self) -> Result<ProviderRegistry, ValidationError> {
        ProviderRegistry::new(self.providers)
    }
}
