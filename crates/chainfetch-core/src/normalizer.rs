//! Response flattening and record validation.
//!
//! Provider payloads arrive either as a bare list of records or as an object
//! wrapping the list under `data`. Anything else contributes no records. The
//! flattened records are validated one by one; the first invalid record fails
//! the whole batch.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::fetch_error::FetchError;
use crate::query::json_type_name;
use crate::ValidationError;

/// Key under which wrapped payloads carry their record list.
pub const DATA_KEY: &str = "data";

/// Output record constructed from one raw JSON object.
pub trait FetchRecord: Sized + Serialize + Send + 'static {
    fn from_raw(raw: Map<String, Value>) -> Result<Self, ValidationError>;
}

/// Concatenates the records of every response, in response order.
pub fn flatten(responses: Vec<Value>) -> Vec<Value> {
    let mut records = Vec::new();
    for (index, response) in responses.into_iter().enumerate() {
        match response {
            Value::Array(items) => records.extend(items),
            Value::Object(mut object) => match object.remove(DATA_KEY) {
                Some(Value::Array(items)) => records.extend(items),
                other => debug!(
                    index,
                    data = other.as_ref().map_or("absent", json_type_name),
                    "response object has no data list"
                ),
            },
            other => debug!(
                index,
                shape = json_type_name(&other),
                "response contributed no records"
            ),
        }
    }
    records
}

/// Flattens `responses` and validates every record into `R`.
///
/// # Errors
///
/// - [`FetchError::empty_data`] when no response contributed a record.
/// - [`FetchError::schema_validation`] for the first record that fails
///   validation, carrying its position.
pub fn normalize<R: FetchRecord>(responses: Vec<Value>) -> Result<Vec<R>, FetchError> {
    let records = flatten(responses);
    if records.is_empty() {
        return Err(FetchError::empty_data());
    }

    records
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let record = match raw {
                Value::Object(object) => R::from_raw(object),
                _ => Err(ValidationError::RecordNotObject),
            };
            record.map_err(|error| FetchError::schema_validation(index, error))
        })
        .collect()
}

/// Removes `field` from `raw`, requiring a string value.
pub fn take_str(
    raw: &mut Map<String, Value>,
    field: &'static str,
) -> Result<String, ValidationError> {
    match raw.remove(field) {
        Some(Value::String(value)) => Ok(value),
        None | Some(Value::Null) => Err(ValidationError::MissingField { field }),
        Some(_) => Err(ValidationError::FieldNotString { field }),
    }
}
