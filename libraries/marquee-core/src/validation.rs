//! Client-side form rules.
//!
//! Every rule appends to a shared [`ValidationErrors`] so a form reports all
//! failing fields at once. Nothing here touches the network.

use crate::error::ValidationErrors;

/// Minimum title length in characters
pub const MIN_TITLE_CHARS: usize = 2;

/// Minimum password length in characters
pub const MIN_PASSWORD_CHARS: usize = 6;

/// Record `message` when `value` is blank
pub fn require(errors: &mut ValidationErrors, field: &'static str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(field, message);
    }
}

/// Record `message` when `value` has fewer than `min` characters
pub fn min_chars(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    min: usize,
    message: &str,
) {
    if value.trim().chars().count() < min {
        errors.push(field, message);
    }
}

/// Whether `value` reads as a non-negative decimal amount
pub fn is_amount(value: &str) -> bool {
    value
        .trim()
        .parse::<f64>()
        .is_ok_and(|n| n.is_finite() && n >= 0.0)
}

/// Structural email check: one `@`, a non-empty local part, a dotted domain
pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amounts() {
        assert!(is_amount("1000000"));
        assert!(is_amount("2.5"));
        assert!(is_amount(" 0 "));
        assert!(!is_amount(""));
        assert!(!is_amount("ten"));
        assert!(!is_amount("-5"));
        assert!(!is_amount("inf"));
        assert!(!is_amount("NaN"));
    }

    #[test]
    fn test_emails() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.org"));
        assert!(!is_valid_email("ana"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@@example.com"));
        assert!(!is_valid_email("ana@example..com"));
        assert!(!is_valid_email("an a@example.com"));
    }

    #[test]
    fn test_min_chars_counts_characters() {
        let mut errors = ValidationErrors::new();
        min_chars(&mut errors, "title", "Åé", 2, "too short");
        assert!(errors.is_empty());

        min_chars(&mut errors, "title", " A ", 2, "too short");
        assert_eq!(errors.message_for("title"), Some("too short"));
    }
}
