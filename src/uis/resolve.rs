//! Target VM Resolution
//!
//! When no VM id is configured, the first record of an inventory listing is used
//! as the report target. UIS returns listings in one of two shapes:
//!
//! - `{"entity": {"data": [...]}}`
//! - `{"data": [...]}`
//!
//! Each shape is an entry in [`RECORD_LIST_SHAPES`], tried in order.

use crate::uis::types::FallbackResult;
use serde_json::{Map, Value};

type RecordListShape = fn(&Value) -> Option<&Vec<Value>>;

fn entity_data(body: &Value) -> Option<&Vec<Value>> {
    body.get("entity")?.get("data")?.as_array()
}

fn top_level_data(body: &Value) -> Option<&Vec<Value>> {
    body.get("data")?.as_array()
}

pub const RECORD_LIST_SHAPES: &[RecordListShape] = &[entity_data, top_level_data];

/// Object records of the first shape yielding a non-empty listing
pub fn extract_records(body: &Value) -> Vec<&Map<String, Value>> {
    RECORD_LIST_SHAPES
        .iter()
        .filter_map(|shape| shape(body))
        .map(|list| list.iter().filter_map(Value::as_object).collect::<Vec<_>>())
        .find(|records| !records.is_empty())
        .unwrap_or_default()
}

/// Reads a record id, truncating floating-point ids to integers
pub fn record_id(record: &Map<String, Value>) -> Option<i64> {
    match record.get("id")? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        _ => None,
    }
}

/// Picks the report target id
///
/// An explicit id is returned unchanged. Otherwise each source is inspected in
/// order and the first record id found wins. `None` means resolution failed.
pub fn resolve_identifier(explicit: Option<i64>, sources: &[&FallbackResult]) -> Option<i64> {
    if explicit.is_some() {
        return explicit;
    }

    sources.iter().find_map(|source| {
        let body = source.selected_body()?;
        let records = extract_records(body);
        record_id(records.first()?)
    })
}
