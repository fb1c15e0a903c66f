use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::pipeline::DynFetcher;

/// Provider definition: descriptive metadata plus the fetchers it offers.
#[derive(Clone)]
pub struct Provider {
    name: String,
    description: String,
    website: Option<String>,
    credentials: Vec<String>,
    fetchers: Vec<Arc<dyn DynFetcher>>,
}

impl Provider {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            website: None,
            credentials: Vec::new(),
            fetchers: Vec::new(),
        }
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    /// Declares a credential key the host should supply for this provider.
    pub fn with_credential(mut self, key: impl Into<String>) -> Self {
        self.credentials.push(key.into());
        self
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn DynFetcher>) -> Self {
        self.fetchers.push(fetcher);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn website(&self) -> Option<&str> {
        self.website.as_deref()
    }

    pub fn credentials(&self) -> &[String] {
        &self.credentials
    }

    pub fn fetchers(&self) -> &[Arc<dyn DynFetcher>] {
        &self.fetchers
    }

    pub fn fetcher_names(&self) -> Vec<&str> {
        self.fetchers.iter().map(|fetcher| fetcher.name()).collect()
    }
}

impl Debug for Provider {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("website", &self.website)
            .field("credentials", &self.credentials)
            .field("fetchers", &self.fetcher_names())
            .finish()
    }
}
