//! Driver license number validation
//!
//! A license number is an identifier of at most 8 characters: a prefix of
//! 3 uppercase letters followed by a suffix of 5 digits. The rules are
//! checked in a fixed order and the first failing rule is the one reported,
//! so callers (and their users) always see a single, stable message for a
//! given input.

use std::fmt;

/// Maximum number of characters in a license number
pub const MAX_LENGTH: usize = 8;

/// Number of leading characters that must be uppercase letters
pub const PREFIX_LENGTH: usize = 3;

/// Number of trailing characters that must be digits
pub const SUFFIX_LENGTH: usize = 5;

/// Why a candidate license number was rejected
///
/// Exactly one variant is reported per rejection; rules are evaluated in
/// declaration order and the first failure wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseError {
    /// More than [`MAX_LENGTH`] characters
    TooLong,
    /// First [`PREFIX_LENGTH`] characters are not all uppercase letters
    BadPrefix,
    /// Last [`SUFFIX_LENGTH`] characters are not all digits
    BadSuffix,
}

impl fmt::Display for LicenseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LicenseError::TooLong => write!(
                f,
                "License number must be no longer than {} characters",
                MAX_LENGTH
            ),
            LicenseError::BadPrefix => write!(
                f,
                "First {} characters of license number must be uppercase letters",
                PREFIX_LENGTH
            ),
            LicenseError::BadSuffix => write!(
                f,
                "Last {} characters of license number must be digits",
                SUFFIX_LENGTH
            ),
        }
    }
}

impl std::error::Error for LicenseError {}

/// Validate a candidate license number.
///
/// Returns the candidate unchanged on success; no normalization is
/// performed. There is deliberately no minimum-length rule: a string
/// shorter than `PREFIX_LENGTH + SUFFIX_LENGTH` is evaluated against the
/// prefix and suffix rules on clamped slices, so short input is rejected
/// by whichever of those rules its content first violates rather than by
/// an explicit length check.
pub fn validate_license_number(candidate: &str) -> Result<&str, LicenseError> {
    let char_count = candidate.chars().count();

    if char_count > MAX_LENGTH {
        return Err(LicenseError::TooLong);
    }

    // Clamped slice: for input shorter than PREFIX_LENGTH this examines
    // the whole string, and an empty prefix fails the rule.
    let mut prefix = candidate.chars().take(PREFIX_LENGTH).peekable();
    if prefix.peek().is_none() {
        return Err(LicenseError::BadPrefix);
    }
    if !prefix.all(|c| c.is_alphabetic() && c.is_uppercase()) {
        return Err(LicenseError::BadPrefix);
    }

    // Take-from-end with clamping: for input shorter than SUFFIX_LENGTH
    // the whole string is examined.
    let mut suffix = candidate
        .chars()
        .skip(char_count.saturating_sub(SUFFIX_LENGTH))
        .peekable();
    if suffix.peek().is_none() {
        return Err(LicenseError::BadSuffix);
    }
    if !suffix.all(|c| c.is_ascii_digit()) {
        return Err(LicenseError::BadSuffix);
    }

    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_license_accepted_unchanged() {
        assert_eq!(validate_license_number("ABC12345"), Ok("ABC12345"));
        assert_eq!(validate_license_number("XYZ00001"), Ok("XYZ00001"));
    }

    #[test]
    fn test_too_long_rejected() {
        assert_eq!(
            validate_license_number("ABC123456"),
            Err(LicenseError::TooLong)
        );
    }

    #[test]
    fn test_too_long_wins_over_other_rules() {
        // Length is checked first, so a 9-character string with a bad
        // prefix still reports TooLong.
        assert_eq!(
            validate_license_number("abc123456"),
            Err(LicenseError::TooLong)
        );
    }

    #[test]
    fn test_lowercase_prefix_rejected() {
        assert_eq!(
            validate_license_number("abc12345"),
            Err(LicenseError::BadPrefix)
        );
    }

    #[test]
    fn test_digit_in_prefix_rejected() {
        assert_eq!(
            validate_license_number("AB312345"),
            Err(LicenseError::BadPrefix)
        );
    }

    #[test]
    fn test_non_digit_suffix_rejected() {
        assert_eq!(
            validate_license_number("ABC1234X"),
            Err(LicenseError::BadSuffix)
        );
    }

    #[test]
    fn test_empty_string_fails_prefix_rule() {
        // No minimum-length rule: the empty string falls through the
        // length check and fails on the empty prefix slice.
        assert_eq!(validate_license_number(""), Err(LicenseError::BadPrefix));
    }

    #[test]
    fn test_short_uppercase_string_fails_suffix_rule() {
        // Two uppercase letters satisfy the clamped prefix rule, then the
        // clamped suffix slice ("AB") is not all digits.
        assert_eq!(validate_license_number("AB"), Err(LicenseError::BadSuffix));
    }

    #[test]
    fn test_short_mixed_string() {
        // Prefix slice "A1" contains a digit.
        assert_eq!(validate_license_number("A1"), Err(LicenseError::BadPrefix));
    }

    #[test]
    fn test_exactly_eight_chars_boundary() {
        assert_eq!(validate_license_number("ABC12345"), Ok("ABC12345"));
        assert_eq!(
            validate_license_number("ABCD12345"),
            Err(LicenseError::TooLong)
        );
    }

    #[test]
    fn test_uncased_alphabetic_prefix_rejected() {
        // Alphabetic but not uppercase (no case at all). Length is counted
        // in characters, not bytes, so this is 8 characters and reaches
        // the prefix rule.
        assert_eq!(
            validate_license_number("漢字字12345"),
            Err(LicenseError::BadPrefix)
        );
    }

    #[test]
    fn test_validation_is_idempotent() {
        let first = validate_license_number("ABC12345");
        let second = validate_license_number("ABC12345");
        assert_eq!(first, second);

        let first = validate_license_number("ABC1234X");
        let second = validate_license_number("ABC1234X");
        assert_eq!(first, second);
    }

    #[test]
    fn test_error_messages_name_the_rule() {
        assert!(LicenseError::TooLong.to_string().contains('8'));
        assert!(LicenseError::BadPrefix
            .to_string()
            .contains("uppercase letters"));
        assert!(LicenseError::BadSuffix.to_string().contains("digits"));
    }
}
