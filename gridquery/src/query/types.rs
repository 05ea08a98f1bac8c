//! Filter expression type definitions

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::MATCH_ALL_FIELD;
use crate::utils::time::format_rfc3339;

/// Comparison operators of the expression model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    /// Native operator key (e.g. `$gte`)
    pub fn as_operator_key(&self) -> &'static str {
        match self {
            CompareOp::Eq => "$eq",
            CompareOp::Ne => "$ne",
            CompareOp::Lt => "$lt",
            CompareOp::Lte => "$lte",
            CompareOp::Gt => "$gt",
            CompareOp::Gte => "$gte",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::Ne => write!(f, "!="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
        }
    }
}

/// Right-hand side of a comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Instant parsed from an RFC 3339 string
    Timestamp(DateTime<Utc>),
    /// Regular expression the field must match
    Regex {
        pattern: String,
        case_insensitive: bool,
    },
    /// Any other value, passed through as received
    Json(Value),
}

impl FilterValue {
    pub fn regex(pattern: impl Into<String>, case_insensitive: bool) -> Self {
        Self::Regex {
            pattern: pattern.into(),
            case_insensitive,
        }
    }

    pub fn null() -> Self {
        Self::Json(Value::Null)
    }
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Json(Value::String(value.to_string()))
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Timestamp(dt) => write!(f, "{}", format_rfc3339(dt)),
            FilterValue::Regex {
                pattern,
                case_insensitive,
            } => {
                let flags = if *case_insensitive { "i" } else { "" };
                write!(f, "/{}/{}", pattern, flags)
            }
            FilterValue::Json(value) => write!(f, "{}", value),
        }
    }
}

/// Backend-agnostic filter expression
///
/// `StartsWith` and `Contains` are case-insensitive by construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryFilter {
    Compare {
        field: String,
        op: CompareOp,
        value: FilterValue,
    },
    StartsWith {
        field: String,
        prefix: String,
    },
    Contains {
        field: String,
        needle: String,
    },
    Exists {
        field: String,
        exists: bool,
    },
    And(Vec<QueryFilter>),
    Or(Vec<QueryFilter>),
}

impl QueryFilter {
    pub fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<FilterValue>) -> Self {
        Self::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::compare(field, CompareOp::Eq, value)
    }

    pub fn ne(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::compare(field, CompareOp::Ne, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::compare(field, CompareOp::Lt, value)
    }

    pub fn lte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::compare(field, CompareOp::Lte, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::compare(field, CompareOp::Gt, value)
    }

    pub fn gte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::compare(field, CompareOp::Gte, value)
    }

    pub fn starts_with(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::StartsWith {
            field: field.into(),
            prefix: prefix.into(),
        }
    }

    pub fn contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::Contains {
            field: field.into(),
            needle: needle.into(),
        }
    }

    pub fn exists(field: impl Into<String>, exists: bool) -> Self {
        Self::Exists {
            field: field.into(),
            exists,
        }
    }

    pub fn and(filters: Vec<QueryFilter>) -> Self {
        Self::And(filters)
    }

    pub fn or(filters: Vec<QueryFilter>) -> Self {
        Self::Or(filters)
    }

    /// Concrete predicate matching every stored document
    ///
    /// Stand-in for backends that need a filter value even when the grid
    /// query carried nothing usable.
    pub fn match_all() -> Self {
        Self::exists(MATCH_ALL_FIELD, true)
    }
}

impl fmt::Display for QueryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, filters: &[QueryFilter], sep: &str) -> fmt::Result {
            write!(f, "(")?;
            for (i, filter) in filters.iter().enumerate() {
                if i > 0 {
                    write!(f, " {} ", sep)?;
                }
                write!(f, "{}", filter)?;
            }
            write!(f, ")")
        }

        match self {
            Self::Compare { field, op, value } => write!(f, "{} {} {}", field, op, value),
            Self::StartsWith { field, prefix } => write!(f, "{} startswith {:?}", field, prefix),
            Self::Contains { field, needle } => write!(f, "{} contains {:?}", field, needle),
            Self::Exists { field, exists } => {
                if *exists {
                    write!(f, "{} exists", field)
                } else {
                    write!(f, "{} not exists", field)
                }
            }
            Self::And(filters) => join(f, filters, "AND"),
            Self::Or(filters) => join(f, filters, "OR"),
        }
    }
}
