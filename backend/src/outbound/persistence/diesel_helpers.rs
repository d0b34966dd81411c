//! Shared helpers for the Diesel repository implementations.

/// Escape LIKE metacharacters and wrap the term for a substring match.
///
/// Postgres treats backslash as the default escape character, so escaping
/// `\`, `%`, and `_` keeps user input literal inside `ILIKE` patterns.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Cast a non-negative database count (i32) to the domain's u32.
///
/// Negative values cannot appear under the schema's CHECK constraints; they
/// clamp to zero rather than panicking if the constraint is ever dropped.
pub(crate) fn cast_count(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

/// Cast a domain count (u32) to the database's i32, saturating at the
/// column maximum.
pub(crate) fn cast_count_for_db(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
