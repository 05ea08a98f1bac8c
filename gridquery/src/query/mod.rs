//! Generic filter expression model
//!
//! A backend-agnostic predicate tree: leaf comparisons combined by AND/OR
//! nodes. Grid filters translate into this model first; the document
//! rendering in [`document`] turns it into a native `$match` body.

mod document;
mod types;

pub use document::{filter_value_to_bson, json_to_bson};
pub use types::{CompareOp, FilterValue, QueryFilter};

/// Field used by the concrete "match everything" predicate
pub const MATCH_ALL_FIELD: &str = "_id";
