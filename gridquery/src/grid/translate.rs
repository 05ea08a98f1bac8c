//! Filter tree translation to the generic expression model
//!
//! Every invalid, unrecognized, or type-mismatched piece of the tree
//! resolves to `None`, the pass-through: it matches everything, so a broken
//! filter widens to an unfiltered listing instead of an empty one.

use serde_json::Value;

use super::filter::{FilterBranch, FilterLeaf, FilterNode, FilterOperator, Logic};
use crate::query::{FilterValue, QueryFilter};
use crate::utils::pattern::{not_contains_pattern, not_starts_with_pattern};
use crate::utils::time::parse_rfc3339;

impl FilterLeaf {
    /// Translate a single condition
    ///
    /// String values that parse as RFC 3339 are compared as instants. The
    /// string-only operators reject any non-string value, and comparisons
    /// reject object and array values.
    pub fn to_query_filter(&self) -> Option<QueryFilter> {
        let text = match &self.value {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        };

        if text.is_none() && self.operator.is_string_only() {
            tracing::debug!(
                field = %self.field,
                operator = %self.operator,
                "String operator on non-string value, passing through"
            );
            return None;
        }

        if matches!(self.value, Value::Object(_) | Value::Array(_))
            && !matches!(self.operator, FilterOperator::IsNull | FilterOperator::IsNotNull)
        {
            tracing::debug!(
                field = %self.field,
                operator = %self.operator,
                "Non-scalar value, passing through"
            );
            return None;
        }

        let value = match text.and_then(parse_rfc3339) {
            Some(ts) => FilterValue::Timestamp(ts),
            None => FilterValue::Json(self.value.clone()),
        };
        let field = self.field.as_str();
        let text = text.unwrap_or_default();

        let filter = match &self.operator {
            FilterOperator::IsNull => QueryFilter::eq(field, FilterValue::null()),
            FilterOperator::IsNotNull => QueryFilter::ne(field, FilterValue::null()),
            FilterOperator::Eq => QueryFilter::eq(field, value),
            FilterOperator::Neq => QueryFilter::ne(field, value),
            FilterOperator::Lt => QueryFilter::lt(field, value),
            FilterOperator::Lte => QueryFilter::lte(field, value),
            FilterOperator::Gt => QueryFilter::gt(field, value),
            FilterOperator::Gte => QueryFilter::gte(field, value),
            FilterOperator::StartsWith => QueryFilter::starts_with(field, text),
            FilterOperator::DoesNotStartWith => {
                QueryFilter::eq(field, FilterValue::regex(not_starts_with_pattern(text), true))
            }
            FilterOperator::Contains => QueryFilter::contains(field, text),
            FilterOperator::DoesNotContain => {
                QueryFilter::eq(field, FilterValue::regex(not_contains_pattern(text), true))
            }
            FilterOperator::IsEmpty => QueryFilter::eq(field, ""),
            FilterOperator::IsNotEmpty => QueryFilter::ne(field, ""),
            FilterOperator::Unrecognized(tag) => {
                tracing::debug!(field = %self.field, operator = %tag, "Unrecognized operator, passing through");
                return None;
            }
        };
        Some(filter)
    }
}

impl FilterBranch {
    /// Translate the children and combine the survivors
    ///
    /// Children that pass through are dropped. With no survivors, or with a
    /// logic tag other than `and`/`or`, the branch itself passes through.
    pub fn to_query_filter(&self) -> Option<QueryFilter> {
        let filters: Vec<QueryFilter> = self
            .filters
            .iter()
            .filter_map(FilterNode::to_query_filter)
            .collect();

        if filters.is_empty() {
            tracing::debug!(children = self.filters.len(), "No usable children, passing through");
            return None;
        }

        match self.logic {
            Logic::And => Some(QueryFilter::and(filters)),
            Logic::Or => Some(QueryFilter::or(filters)),
            Logic::Unset => {
                tracing::debug!(children = filters.len(), "Branch without logic, passing through");
                None
            }
        }
    }
}

impl FilterNode {
    /// Translate the tree into a generic filter expression
    ///
    /// `None` means the tree carries nothing usable and the query should
    /// not be filtered at all.
    pub fn to_query_filter(&self) -> Option<QueryFilter> {
        let filter = match self {
            Self::Leaf(leaf) => leaf.to_query_filter(),
            Self::Branch(branch) => branch.to_query_filter(),
        };
        tracing::trace!(filter = ?filter, "Translated filter tree");
        filter
    }

    /// Like [`to_query_filter`](Self::to_query_filter), falling back to
    /// [`QueryFilter::match_all`] for backends that need a concrete value
    pub fn to_query_filter_or_match_all(&self) -> QueryFilter {
        self.to_query_filter().unwrap_or_else(QueryFilter::match_all)
    }
}
