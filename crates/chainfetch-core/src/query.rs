//! Query parameter validation.
//!
//! Hosts hand fetchers a loose JSON mapping ([`QueryParams`]). Each fetcher
//! turns it into an immutable query value; unknown keys are ignored so hosts
//! can pass parameters meant for other providers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Symbol, ValidationError};

/// Raw, unvalidated query parameters as supplied by the host.
pub type QueryParams = serde_json::Map<String, Value>;

/// Reads the required `symbol` parameter.
///
/// A string is taken as-is (it may be a comma-separated list); a list of
/// strings is joined with `,`. The result must contain at least one
/// non-empty token.
pub fn symbol_param(params: &QueryParams) -> Result<String, ValidationError> {
    let raw = match params.get("symbol") {
        None | Some(Value::Null) => return Err(ValidationError::MissingSymbol),
        Some(Value::String(value)) => value.clone(),
        Some(Value::Array(values)) => values
            .iter()
            .map(|value| match value {
                Value::String(item) => Ok(item.as_str()),
                other => Err(ValidationError::InvalidSymbolType {
                    found: json_type_name(other),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?
            .join(","),
        Some(other) => {
            return Err(ValidationError::InvalidSymbolType {
                found: json_type_name(other),
            })
        }
    };

    if Symbol::split_list(&raw).is_empty() {
        return Err(ValidationError::EmptySymbol);
    }

    Ok(raw)
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Standard option-chains query: a single `symbol` parameter.
///
/// Deserializing goes through [`OptionsChainsQuery::from_params`], so a
/// deserialized query is always valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QueryParams")]
pub struct OptionsChainsQuery {
    symbol: String,
}

impl OptionsChainsQuery {
    pub fn new(symbol: impl Into<String>) -> Result<Self, ValidationError> {
        let mut params = QueryParams::new();
        params.insert(String::from("symbol"), Value::String(symbol.into()));
        Self::from_params(&params)
    }

    pub fn from_params(params: &QueryParams) -> Result<Self, ValidationError> {
        Ok(Self {
            symbol: symbol_param(params)?,
        })
    }

    /// The symbol parameter as supplied, possibly comma-separated.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Symbol tokens in query order.
    pub fn symbols(&self) -> Vec<Symbol> {
        Symbol::split_list(&self.symbol)
    }

    #[cfg(test)]
    pub(crate) fn unvalidated(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }
}

impl TryFrom<QueryParams> for OptionsChainsQuery {
    type Error = ValidationError;

    fn try_from(params: QueryParams) -> Result<Self, Self::Error> {
        Self::from_params(&params)
    }
}
