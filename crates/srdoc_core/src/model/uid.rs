//! Unique identifier syntax and generation.
//!
//! UIDs are dotted decimal strings of at most 64 characters. Generated UIDs
//! use the `2.25.` root followed by a random v4 UUID as an unsigned integer.

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

/// Maximum length of a UID string.
pub const MAX_UID_LENGTH: usize = 64;

const UUID_DERIVED_ROOT: &str = "2.25";

static UID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(0|[1-9][0-9]*)(\.(0|[1-9][0-9]*))*$").expect("valid uid regex")
});

/// Returns whether `value` is a syntactically valid UID.
pub fn is_valid_uid(value: &str) -> bool {
    !value.is_empty() && value.len() <= MAX_UID_LENGTH && UID_PATTERN.is_match(value)
}

/// Generates a fresh UUID-derived UID.
pub fn generate_uid() -> String {
    format!("{UUID_DERIVED_ROOT}.{}", Uuid::new_v4().as_u128())
}
