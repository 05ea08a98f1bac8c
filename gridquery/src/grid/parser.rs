//! Grid query parsing
//!
//! Parses raw grid query JSON into a [`GridQuery`] with size and shape limits.

use super::error::GridError;
use super::request::GridQuery;

/// Maximum size of grid query JSON in bytes (64KB)
pub const MAX_QUERY_JSON_SIZE: usize = 64 * 1024;

/// Maximum filter tree depth
pub const MAX_FILTER_DEPTH: usize = 32;

/// Maximum number of filter nodes, branches included
pub const MAX_FILTER_NODES: usize = 256;

/// Maximum number of sort entries
pub const MAX_SORT_ENTRIES: usize = 32;

/// Parse a grid query from JSON
///
/// Validates JSON size, parses the filter tree and sort list, and checks the
/// tree shape. Invalid operators or directions are not errors; they are
/// dropped during translation.
pub fn parse_grid_query(json_str: &str) -> Result<GridQuery, GridError> {
    if json_str.len() > MAX_QUERY_JSON_SIZE {
        return Err(GridError::InputTooLarge {
            limit: MAX_QUERY_JSON_SIZE,
        });
    }

    let query: GridQuery = serde_json::from_str(json_str)?;
    validate(&query)?;

    tracing::debug!(
        filter_nodes = query.filter.as_ref().map_or(0, |f| f.node_count()),
        sort_entries = query.sort.len(),
        "Parsed grid query"
    );
    Ok(query)
}

/// Check the shape limits of an already-built query
pub fn validate(query: &GridQuery) -> Result<(), GridError> {
    if let Some(filter) = &query.filter {
        if filter.depth() > MAX_FILTER_DEPTH {
            return Err(GridError::TooDeep {
                limit: MAX_FILTER_DEPTH,
            });
        }
        if filter.node_count() > MAX_FILTER_NODES {
            return Err(GridError::TooManyFilters {
                limit: MAX_FILTER_NODES,
            });
        }
    }

    if query.sort.len() > MAX_SORT_ENTRIES {
        return Err(GridError::TooManySortEntries {
            limit: MAX_SORT_ENTRIES,
        });
    }

    Ok(())
}
