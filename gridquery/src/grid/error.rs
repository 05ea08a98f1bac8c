//! Error type for grid query input
//!
//! Translation itself never fails; these errors only come from reading a
//! raw grid query payload.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    /// Payload larger than the accepted size
    #[error("Grid query JSON exceeds maximum size of {limit} bytes")]
    InputTooLarge { limit: usize },

    /// Payload is not a valid grid query
    #[error("Invalid grid query JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Filter tree nested too deeply
    #[error("Filter tree exceeds maximum depth of {limit}")]
    TooDeep { limit: usize },

    /// Filter tree has too many nodes
    #[error("Maximum {limit} filter nodes allowed")]
    TooManyFilters { limit: usize },

    /// Sort list has too many entries
    #[error("Maximum {limit} sort entries allowed")]
    TooManySortEntries { limit: usize },
}

impl GridError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::InputTooLarge { .. } => "GRID_QUERY_TOO_LARGE",
            Self::InvalidJson(_) => "INVALID_GRID_QUERY_JSON",
            Self::TooDeep { .. } => "FILTER_TOO_DEEP",
            Self::TooManyFilters { .. } => "TOO_MANY_FILTERS",
            Self::TooManySortEntries { .. } => "TOO_MANY_SORT_ENTRIES",
        }
    }
}
