//! Stock rewrite handlers
//!
//! Handlers applied through [`FilterNode::handle`] / [`FilterNode::handle_field`]
//! and their sort counterparts before translation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::filter::{FilterLeaf, FilterNode, FilterOperator};
use super::sort::SortList;
use crate::utils::time::{add_days, format_rfc3339, parse_rfc3339};

/// Maps grid field names to storage field names
///
/// Unmapped fields pass through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct FieldAliases(BTreeMap<String, String>);

impl FieldAliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, grid_field: impl Into<String>, storage_field: impl Into<String>) {
        self.0.insert(grid_field.into(), storage_field.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `(grid, storage)` pairs in grid-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Add every mapping of `other`, replacing existing grid names
    pub fn merge(&mut self, other: FieldAliases) {
        self.0.extend(other.0);
    }

    pub fn resolve(&self, field: &str) -> String {
        self.0
            .get(field)
            .cloned()
            .unwrap_or_else(|| field.to_string())
    }

    pub fn apply_to_filter(&self, filter: &mut FilterNode) {
        filter.handle_field(|field| self.resolve(field));
    }

    pub fn apply_to_sort(&self, sort: &mut SortList) {
        sort.handle_field(|field| self.resolve(field));
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldAliases {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Turns `eq` on an instant into a one-day range
///
/// Grids send a date picker value as midnight of the chosen day. Matching
/// that instant exactly misses every record later that day, so for the
/// configured fields `field eq T` becomes `field gte T and field lt T+1d`.
/// Values that are not RFC 3339 strings are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRangeExpander {
    fields: Vec<String>,
}

impl DateRangeExpander {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Rewrite a single leaf
    pub fn expand(&self, leaf: FilterLeaf) -> FilterNode {
        if leaf.operator != FilterOperator::Eq || !self.fields.iter().any(|f| *f == leaf.field) {
            return FilterNode::Leaf(leaf);
        }
        let Some(start) = leaf.value.as_str().and_then(parse_rfc3339) else {
            return FilterNode::Leaf(leaf);
        };
        let end = format_rfc3339(&add_days(&start, 1));
        tracing::trace!(field = %leaf.field, %start, %end, "Expanding date equality into range");

        FilterNode::and(vec![
            FilterNode::Leaf(FilterLeaf {
                field: leaf.field.clone(),
                operator: FilterOperator::Gte,
                value: leaf.value,
            }),
            FilterNode::Leaf(FilterLeaf {
                field: leaf.field,
                operator: FilterOperator::Lt,
                value: Value::String(end),
            }),
        ])
    }

    pub fn apply(&self, filter: &mut FilterNode) {
        if self.is_empty() {
            return;
        }
        filter.handle(|leaf| self.expand(leaf));
    }
}
