// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "gridquery";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".gridquery";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "gridquery.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "GRIDQUERY_CONFIG";

// =============================================================================
// Environment Variables - Runtime
// =============================================================================

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "GRIDQUERY_LOG";

/// Environment variable for the grid query input file
pub const ENV_INPUT: &str = "GRIDQUERY_INPUT";

/// Input path meaning "read standard input"
pub const STDIN_PATH: &str = "-";
