//! Data-grid query translation
//!
//! Turns the filter tree and sort list a data grid sends into a generic
//! [`QueryFilter`] expression with order tokens, or into aggregation
//! pipeline `$match`/`$sort` stages.

mod app;

pub mod core;
pub mod grid;
pub mod query;
pub mod utils;

pub use grid::{FilterNode, GridError, GridQuery, SortList};
pub use query::QueryFilter;
