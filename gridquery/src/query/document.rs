//! Native document rendering
//!
//! Renders [`QueryFilter`] trees as `$match` bodies for the aggregation
//! pipeline. Equality on a scalar is written implicitly (`{field: value}`),
//! equality on an object or array as `{field: {"$eq": value}}` so its keys are
//! never read as operators, every other comparison as
//! `{field: {"$op": value}}`, and the case-insensitive string predicates as
//! `{field: {"$regex": pattern, "$options": "i"}}`.

use bson::{Bson, Document};
use serde_json::Value;

use super::types::{CompareOp, FilterValue, QueryFilter};
use crate::utils::pattern::{contains_pattern, starts_with_pattern};

/// Convert a JSON value to BSON
///
/// Integers that fit in 32 bits become `Int32`, larger ones `Int64`.
/// Unsigned integers above `i64::MAX` have no exact BSON integer type and
/// become `Double`, rounded to the nearest representable value. Anything
/// else numeric becomes `Double`.
pub fn json_to_bson(value: &Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                match i32::try_from(i) {
                    Ok(small) => Bson::Int32(small),
                    Err(_) => Bson::Int64(i),
                }
            } else if let Some(u) = n.as_u64() {
                tracing::debug!(value = u, "Unsigned integer exceeds Int64, rendering as Double");
                Bson::Double(u as f64)
            } else {
                Bson::Double(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => Bson::String(s.clone()),
        Value::Array(items) => Bson::Array(items.iter().map(json_to_bson).collect()),
        Value::Object(map) => Bson::Document(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_bson(v)))
                .collect(),
        ),
    }
}

/// Convert a comparison value to BSON
///
/// Timestamps keep millisecond precision, the resolution of BSON dates.
pub fn filter_value_to_bson(value: &FilterValue) -> Bson {
    match value {
        FilterValue::Timestamp(dt) => {
            Bson::DateTime(bson::DateTime::from_millis(dt.timestamp_millis()))
        }
        FilterValue::Regex {
            pattern,
            case_insensitive,
        } => Bson::Document(regex_document(pattern.clone(), *case_insensitive)),
        FilterValue::Json(value) => json_to_bson(value),
    }
}

fn regex_document(pattern: String, case_insensitive: bool) -> Document {
    let mut doc = Document::new();
    doc.insert("$regex", pattern);
    if case_insensitive {
        doc.insert("$options", "i");
    }
    doc
}

fn field_document(field: &str, value: impl Into<Bson>) -> Document {
    let mut doc = Document::new();
    doc.insert(field, value.into());
    doc
}

fn operator_document(key: &str, value: Bson) -> Document {
    let mut doc = Document::new();
    doc.insert(key, value);
    doc
}

impl QueryFilter {
    /// Render the expression as a `$match` body
    pub fn to_match_document(&self) -> Document {
        match self {
            Self::Compare { field, op, value } => {
                let implicit = *op == CompareOp::Eq && !is_container(value);
                let value = filter_value_to_bson(value);
                if implicit {
                    field_document(field, value)
                } else {
                    field_document(field, operator_document(op.as_operator_key(), value))
                }
            }
            Self::StartsWith { field, prefix } => {
                field_document(field, regex_document(starts_with_pattern(prefix), true))
            }
            Self::Contains { field, needle } => {
                field_document(field, regex_document(contains_pattern(needle), true))
            }
            Self::Exists { field, exists } => {
                field_document(field, operator_document("$exists", Bson::Boolean(*exists)))
            }
            Self::And(filters) => field_document("$and", render_all(filters)),
            Self::Or(filters) => field_document("$or", render_all(filters)),
        }
    }
}

fn is_container(value: &FilterValue) -> bool {
    matches!(
        value,
        FilterValue::Json(Value::Object(_) | Value::Array(_))
    )
}

fn render_all(filters: &[QueryFilter]) -> Bson {
    Bson::Array(
        filters
            .iter()
            .map(|f| Bson::Document(f.to_match_document()))
            .collect(),
    )
}
