//! Masking of sensitive values in diagnostics.

/// Character used to replace every character of a sensitive value.
pub const MASK_CHAR: char = '*';

/// Mask a value for display.
///
/// The result has the same number of characters as `value` and contains
/// nothing but [`MASK_CHAR`].
///
/// # Examples
///
/// ```rust
/// use stratum_config::core::mask;
///
/// assert_eq!(mask("secret123"), "*********");
/// assert_eq!(mask(""), "");
/// ```
pub fn mask(value: &str) -> String {
    value.chars().map(|_| MASK_CHAR).collect()
}
