//! Grid query request shape
//!
//! The filter tree and sort list a grid widget sends together, and the two
//! translated forms consumed by the query layer and the aggregation pipeline.

use bson::{Document, doc};
use serde::{Deserialize, Deserializer, Serialize};

use super::error::GridError;
use super::filter::FilterNode;
use super::rewrite::{DateRangeExpander, FieldAliases};
use super::sort::SortList;
use crate::query::QueryFilter;

/// Filter tree plus sort list, as sent by the grid
///
/// Other request keys (paging, grouping) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GridQuery {
    #[serde(default)]
    pub filter: Option<FilterNode>,
    #[serde(default, deserialize_with = "null_as_empty_sort")]
    pub sort: SortList,
}

fn null_as_empty_sort<'de, D>(deserializer: D) -> Result<SortList, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<SortList>::deserialize(deserializer)?.unwrap_or_default())
}

/// Query layer form of a grid query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslatedQuery {
    /// `None` means no filtering
    pub filter: Option<QueryFilter>,
    pub order: Vec<String>,
}

impl GridQuery {
    /// Parse and validate raw grid query JSON
    pub fn parse(json_str: &str) -> Result<Self, GridError> {
        super::parser::parse_grid_query(json_str)
    }

    /// Rename grid fields to storage fields in both filter and sort
    pub fn apply_aliases(&mut self, aliases: &FieldAliases) {
        if aliases.is_empty() {
            return;
        }
        if let Some(filter) = self.filter.as_mut() {
            aliases.apply_to_filter(filter);
        }
        aliases.apply_to_sort(&mut self.sort);
    }

    pub fn expand_dates(&mut self, expander: &DateRangeExpander) {
        if let Some(filter) = self.filter.as_mut() {
            expander.apply(filter);
        }
    }

    pub fn to_query(&self) -> TranslatedQuery {
        TranslatedQuery {
            filter: self.filter.as_ref().and_then(FilterNode::to_query_filter),
            order: self.sort.to_query_order(),
        }
    }

    /// Aggregation stages: `$match` when a filter survives translation,
    /// `$sort` when at least one sort entry is valid
    pub fn to_pipeline(&self) -> Vec<Document> {
        let mut stages = Vec::with_capacity(2);
        if let Some(stage) = self.filter.as_ref().and_then(FilterNode::to_match_stage) {
            stages.push(stage);
        }
        let sort = self.sort.to_aggregate_sort();
        if !sort.is_empty() {
            stages.push(doc! { "$sort": sort });
        }
        tracing::trace!(stages = stages.len(), "Built aggregation pipeline");
        stages
    }
}
