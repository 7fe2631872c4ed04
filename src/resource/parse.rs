use serde_json::Value;

use crate::error::{ConnectorError, Result};
use crate::resource::value::WireRecord;

/// Shape of a search response body.
#[derive(Debug, PartialEq)]
pub(crate) enum Page {
    /// Array of records, bare or wrapped under the collection key.
    Records(Vec<WireRecord>),
    /// A single bare object; always the complete result.
    Single(WireRecord),
}

impl Page {
    pub(crate) fn len(&self) -> usize {
        match self {
            Page::Records(records) => records.len(),
            Page::Single(_) => 1,
        }
    }

    pub(crate) fn into_records(self) -> Vec<WireRecord> {
        match self {
            Page::Records(records) => records,
            Page::Single(record) => vec![record],
        }
    }
}

/// Parse a response body into a single record. An empty body yields an
/// empty record.
pub(crate) fn parse_record(body: &str) -> Result<WireRecord> {
    if body.trim().is_empty() {
        return Ok(WireRecord::new());
    }

    let json: Value = serde_json::from_str(body)
        .map_err(|e| ConnectorError::protocol(format!("Failed to parse JSON: {e}")))?;

    match json {
        Value::Object(record) => Ok(record),
        Value::Null => Ok(WireRecord::new()),
        other => Err(ConnectorError::protocol(format!(
            "Expected a JSON object, got {}",
            json_type(&other)
        ))),
    }
}

/// Normalise a search response: bare array, wrapped array under
/// `collection_key`, or a single bare object. An empty body is an empty
/// page.
pub(crate) fn parse_page(body: &str, collection_key: &str) -> Result<Page> {
    if body.trim().is_empty() {
        return Ok(Page::Records(Vec::new()));
    }

    let json: Value = serde_json::from_str(body)
        .map_err(|e| ConnectorError::protocol(format!("Failed to parse JSON: {e}")))?;

    match json {
        Value::Array(items) => Ok(Page::Records(records_from_array(items)?)),
        Value::Object(mut object) => match object.remove(collection_key) {
            Some(Value::Array(items)) => Ok(Page::Records(records_from_array(items)?)),
            Some(Value::Null) => Ok(Page::Records(Vec::new())),
            Some(other) => Err(ConnectorError::protocol(format!(
                "Expected an array under '{collection_key}', got {}",
                json_type(&other)
            ))),
            None => Ok(Page::Single(object)),
        },
        Value::Null => Ok(Page::Records(Vec::new())),
        other => Err(ConnectorError::protocol(format!(
            "Invalid search response: {}",
            json_type(&other)
        ))),
    }
}

fn records_from_array(items: Vec<Value>) -> Result<Vec<WireRecord>> {
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(record) => Ok(record),
            other => Err(ConnectorError::protocol(format!(
                "Expected an array of objects, found {}",
                json_type(&other)
            ))),
        })
        .collect()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
