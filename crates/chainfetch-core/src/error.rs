use thiserror::Error;

/// Validation and contract errors exposed by `chainfetch-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required query parameter 'symbol'")]
    MissingSymbol,
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol must be a string or a list of strings, got {found}")]
    InvalidSymbolType { found: &'static str },

    #[error("record is not a JSON object")]
    RecordNotObject,
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },
    #[error("field '{field}' must be a string")]
    FieldNotString { field: &'static str },

    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },

    #[error("fetcher '{name}' is registered more than once")]
    DuplicateFetcher { name: String },
    #[error("invalid configuration value for '{key}': '{value}'")]
    InvalidConfig { key: &'static str, value: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
