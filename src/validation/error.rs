//! Field Errors
//!
//! Validation failures are plain values attached to a field, never faults.

use thiserror::Error;

/// Broad class of a field failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Not enough characters yet. Never shown to the user.
    IncompleteInput,
    /// Wrong shape
    FormatError,
    /// Out of range value or wrong digit count
    RangeError,
    /// Well-formed but rejected (checksum, expiry)
    SemanticError,
}

/// Why a field is currently invalid
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Incomplete")]
    Incomplete,
    #[error("Invalid format")]
    InvalidFormat,
    #[error("Card number too short")]
    NumberTooShort,
    #[error("Invalid card length")]
    InvalidLength,
    #[error("Invalid card number")]
    ChecksumMismatch,
    #[error("Invalid month")]
    InvalidMonth,
    #[error("Card expired")]
    Expired,
    #[error("Must be {expected} digits")]
    WrongDigitCount { expected: usize },
    #[error("Name too short")]
    NameTooShort,
}

impl FieldError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FieldError::Incomplete => ErrorKind::IncompleteInput,
            FieldError::InvalidFormat => ErrorKind::FormatError,
            FieldError::NumberTooShort
            | FieldError::InvalidLength
            | FieldError::InvalidMonth
            | FieldError::WrongDigitCount { .. }
            | FieldError::NameTooShort => ErrorKind::RangeError,
            FieldError::ChecksumMismatch | FieldError::Expired => ErrorKind::SemanticError,
        }
    }

    /// Text to show next to the field, if any
    pub fn message(&self) -> Option<String> {
        match self.kind() {
            ErrorKind::IncompleteInput => None,
            _ => Some(self.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_has_no_message() {
        assert_eq!(FieldError::Incomplete.message(), None);
        assert_eq!(
            FieldError::Incomplete.kind(),
            ErrorKind::IncompleteInput
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            FieldError::WrongDigitCount { expected: 4 }.message().as_deref(),
            Some("Must be 4 digits")
        );
        assert_eq!(FieldError::Expired.kind(), ErrorKind::SemanticError);
        assert_eq!(FieldError::InvalidMonth.kind(), ErrorKind::RangeError);
        assert_eq!(FieldError::InvalidFormat.kind(), ErrorKind::FormatError);
    }
}
