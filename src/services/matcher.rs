//! Wildcard expression matching for retrieval rules.
//!
//! An expression is a pattern with an optional leading `!`. The pattern is split
//! on `*` and each segment must occur in the value, in order, each search
//! starting after the previous hit. Matching is not anchored, so a pattern
//! without `*` is a substring test.

/// Whether `value` satisfies `expression`.
pub fn matches_expression(value: &str, expression: &str) -> bool {
    match expression.strip_prefix('!') {
        Some(pattern) => !matches_wildcard(value, pattern),
        None => matches_wildcard(value, expression),
    }
}

/// Ordered segment search; `*` is the only metacharacter.
pub fn matches_wildcard(value: &str, pattern: &str) -> bool {
    let mut rest = value;
    for segment in pattern.split('*') {
        match rest.find(segment) {
            Some(pos) => rest = &rest[pos + segment.len()..],
            None => return false,
        }
    }
    true
}
