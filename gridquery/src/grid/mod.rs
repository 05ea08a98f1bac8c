//! Grid query translation
//!
//! Translates a data grid's filter tree and sort list into the generic
//! [`QueryFilter`](crate::query::QueryFilter) model and into aggregation
//! pipeline `$match`/`$sort` documents.
//!
//! ## Usage
//!
//! ```
//! use gridquery::grid::GridQuery;
//!
//! let json = r#"{
//!     "filter": {"logic": "and", "filters": [
//!         {"field": "Name", "operator": "startswith", "value": "H"}
//!     ]},
//!     "sort": [{"field": "Age", "dir": "desc"}]
//! }"#;
//! let query = GridQuery::parse(json).unwrap();
//! assert_eq!(query.to_query().order, vec!["-Age"]);
//! assert_eq!(query.to_pipeline().len(), 2);
//! ```

mod aggregate;
mod error;
mod filter;
mod parser;
mod request;
mod rewrite;
mod sort;
mod translate;


pub use error::GridError;
pub use filter::{FilterBranch, FilterLeaf, FilterNode, FilterOperator, Logic};
pub use parser::{
    MAX_FILTER_DEPTH, MAX_FILTER_NODES, MAX_QUERY_JSON_SIZE, MAX_SORT_ENTRIES, parse_grid_query,
    validate,
};
pub use request::{GridQuery, TranslatedQuery};
pub use rewrite::{DateRangeExpander, FieldAliases};
pub use sort::{SortDirection, SortEntry, SortList};
