//! Call-level error surfaced by every fetch.
//!
//! Each pipeline stage maps its failure onto one [`FetchErrorKind`]. Nothing
//! inside the core swallows or retries an error; the kind tells the host how
//! to react.
//!
//! | Kind | Code | Raised by |
//! |------|------|-----------|
//! | `InvalidQuery` | `fetch.invalid_query` | query validation |
//! | `NotFound` | `fetch.not_found` | registry lookup |
//! | `Transport` | `fetch.transport` | transport (network, timeout, status, body) |
//! | `EmptyData` | `fetch.empty_data` | normalizer, zero records overall |
//! | `SchemaValidation` | `fetch.schema_validation` | normalizer, bad record |
//! | `Internal` | `fetch.internal` | anything else |

use std::fmt::{Display, Formatter};

use crate::http_client::HttpError;
use crate::ValidationError;

/// Classification of a failed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    InvalidQuery,
    NotFound,
    Transport,
    EmptyData,
    SchemaValidation,
    Internal,
}

/// Structured fetch error returned to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
    retryable: bool,
    record: Option<usize>,
    field: Option<&'static str>,
}

impl FetchError {
    fn new(kind: FetchErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
            record: None,
            field: None,
        }
    }

    pub fn invalid_query(error: ValidationError) -> Self {
        Self::new(FetchErrorKind::InvalidQuery, error.to_string(), false)
    }

    pub fn not_found(name: &str) -> Self {
        Self::new(
            FetchErrorKind::NotFound,
            format!("fetcher '{name}' is not registered"),
            false,
        )
    }

    pub fn transport(error: &HttpError) -> Self {
        Self::new(
            FetchErrorKind::Transport,
            format!("transport error: {}", error.message()),
            error.retryable(),
        )
    }

    pub fn empty_data() -> Self {
        Self::new(
            FetchErrorKind::EmptyData,
            "the provider returned no data for this query",
            false,
        )
    }

    /// Builds a schema error pointing at the zero-based `record` position.
    pub fn schema_validation(record: usize, error: ValidationError) -> Self {
        let field = match &error {
            ValidationError::MissingField { field } | ValidationError::FieldNotString { field } => {
                Some(*field)
            }
            _ => None,
        };

        Self {
            field,
            record: Some(record),
            ..Self::new(
                FetchErrorKind::SchemaValidation,
                format!("record {record}: {error}"),
                false,
            )
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Internal, message, false)
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    /// Position of the offending record for schema errors.
    pub const fn record(&self) -> Option<usize> {
        self.record
    }

    /// Name of the offending field for schema errors.
    pub const fn field(&self) -> Option<&'static str> {
        self.field
    }

    /// "No data" is an expected outcome, not a bug.
    pub const fn is_empty_data(&self) -> bool {
        matches!(self.kind, FetchErrorKind::EmptyData)
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            FetchErrorKind::InvalidQuery => "fetch.invalid_query",
            FetchErrorKind::NotFound => "fetch.not_found",
            FetchErrorKind::Transport => "fetch.transport",
            FetchErrorKind::EmptyData => "fetch.empty_data",
            FetchErrorKind::SchemaValidation => "fetch.schema_validation",
            FetchErrorKind::Internal => "fetch.internal",
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for FetchError {}
