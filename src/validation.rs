//! Input validation and parsing helpers shared by the panel gates.
//!
//! Competition ids end up inside storage keys, so they are restricted to a safe
//! character set. The remaining helpers parse the free-text numeric fields the
//! wizard collects (fees, weights, counts) without ever panicking.

use anyhow::{bail, Result};
use regex::Regex;
use std::sync::LazyLock;

use crate::models::constants::MAX_STAGE_NAME_LENGTH;

/// Maximum allowed length for competition ids.
pub const MAX_ID_LENGTH: usize = 128;

/// Validates that an id is safe for use in storage keys and file paths.
///
/// An id is valid if:
/// - It is not empty
/// - It is no longer than MAX_ID_LENGTH characters
/// - It contains only alphanumeric characters, dashes, and underscores
///
/// # Examples
///
/// ```
/// use contest_wizard::validation::validate_id;
///
/// assert!(validate_id("comp-001").is_ok());
/// assert!(validate_id("").is_err());
/// assert!(validate_id("../etc/passwd").is_err());
/// ```
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        bail!("ID cannot be empty");
    }

    if id.len() > MAX_ID_LENGTH {
        bail!(
            "ID too long: {} characters (max {})",
            id.len(),
            MAX_ID_LENGTH
        );
    }

    let valid_chars = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid_chars {
        bail!("ID '{id}' contains invalid characters. Use only alphanumeric characters, dashes (-), and underscores (_)");
    }

    Ok(())
}

/// Validates a stage name entered on the overview panel.
pub fn validate_stage_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        bail!("Stage name cannot be empty");
    }

    if trimmed.chars().count() > MAX_STAGE_NAME_LENGTH {
        bail!(
            "Stage name too long: {} characters (max {})",
            trimmed.chars().count(),
            MAX_STAGE_NAME_LENGTH
        );
    }

    Ok(())
}

static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?$").expect("decimal pattern is valid"));

/// Parse a non-negative decimal such as `"0"`, `"150"` or `"99.50"`.
///
/// Signs, exponents and thousands separators are rejected. Returns `None` for
/// anything that is not a plain decimal.
pub fn parse_decimal(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if !DECIMAL_RE.is_match(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parse a strictly positive whole number such as a question count.
pub fn parse_count(value: &str) -> Option<u32> {
    match value.trim().parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}

/// True when a user-entered text field holds something other than whitespace.
pub fn is_filled(value: &str) -> bool {
    !value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id_valid() {
        assert!(validate_id("comp-001").is_ok());
        assert!(validate_id("contest_2024").is_ok());
        assert!(validate_id("a").is_ok());
    }

    #[test]
    fn test_validate_id_empty() {
        let result = validate_id("");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_validate_id_too_long() {
        let long_id = "a".repeat(MAX_ID_LENGTH + 1);
        let result = validate_id(&long_id);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too long"));
    }

    #[test]
    fn test_validate_id_invalid_chars() {
        assert!(validate_id("comp/001").is_err());
        assert!(validate_id("../passwd").is_err());
        assert!(validate_id("comp 001").is_err());
        assert!(validate_id("comp:001").is_err());
    }

    #[test]
    fn test_validate_stage_name() {
        assert!(validate_stage_name("Round 1").is_ok());
        assert!(validate_stage_name("   ").is_err());
        assert!(validate_stage_name(&"x".repeat(MAX_STAGE_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("0"), Some(0.0));
        assert_eq!(parse_decimal(" 150 "), Some(150.0));
        assert_eq!(parse_decimal("99.50"), Some(99.5));
        assert_eq!(parse_decimal("-5"), None);
        assert_eq!(parse_decimal("1e3"), None);
        assert_eq!(parse_decimal("1,000"), None);
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("12."), None);
    }

    #[test]
    fn test_parse_decimal_is_stable_across_calls() {
        for _ in 0..100 {
            assert_eq!(parse_decimal("25.00"), Some(25.0));
            assert_eq!(parse_decimal("abc"), None);
        }
        assert!(DECIMAL_RE.is_match("7"));
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("50"), Some(50));
        assert_eq!(parse_count("0"), None);
        assert_eq!(parse_count("-1"), None);
        assert_eq!(parse_count("2.5"), None);
        assert_eq!(parse_count(""), None);
    }
}
