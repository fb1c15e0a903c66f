use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

/// Host-supplied secrets keyed by credential name (e.g. `orats_api_key`).
///
/// `Debug` prints key names only, so credentials can sit inside logged
/// structures without leaking values.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials(BTreeMap<String, String>);

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolves `key` from optional credentials, falling back to an empty token.
    ///
    /// A missing credential is not an error at build time; the provider
    /// rejects the request instead.
    pub fn token_or_empty(credentials: Option<&Self>, key: &str) -> String {
        credentials
            .and_then(|credentials| credentials.get(key))
            .map(str::to_owned)
            .unwrap_or_default()
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Credentials
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
