//! Regular expression pattern helpers

/// Escape regex metacharacters in user input
///
/// Use this when embedding grid values into `$regex` patterns so that
/// characters like `.` or `(` match literally. Every escape produced is a
/// backslash before a non-alphanumeric character, which PCRE also reads as
/// a literal.
///
/// # Example
///
/// ```
/// use gridquery::utils::pattern::escape_regex_pattern;
///
/// assert_eq!(escape_regex_pattern("a.b"), "a\\.b");
/// ```
pub fn escape_regex_pattern(s: &str) -> String {
    regex::escape(s)
}

/// Pattern matching strings that do not start with `prefix`
pub fn not_starts_with_pattern(prefix: &str) -> String {
    format!(r"^(?!{})\w+", escape_regex_pattern(prefix))
}

/// Pattern matching strings that do not contain `needle`
pub fn not_contains_pattern(needle: &str) -> String {
    format!(r"^((?!{}).)*$", escape_regex_pattern(needle))
}

/// Pattern matching strings that start with `prefix`
pub fn starts_with_pattern(prefix: &str) -> String {
    format!("^{}", escape_regex_pattern(prefix))
}

/// Pattern matching strings that contain `needle`
pub fn contains_pattern(needle: &str) -> String {
    format!(".*{}.*", escape_regex_pattern(needle))
}
