//! Validation Engine
//!
//! Pure checks and formatters for the card form fields. Nothing here
//! keeps state; the form reducer calls these on every pass.

use chrono::Datelike;

use crate::card::{CardTypeRegistry, CardTypeRule, DEFAULT_CODE_SIZE, DEFAULT_GAPS};
use crate::validation::FieldError;

/// Separator inserted between digit groups
pub const NUMBER_SEPARATOR: char = ' ';
/// Luhn is only trusted from this many digits
pub const MIN_NUMBER_DIGITS: usize = 13;
/// Formatted `MM/YY`
pub const EXPIRY_FORMATTED_LEN: usize = 5;
pub const EXPIRY_DIGITS: usize = 4;
/// Security code cap while the issuer is still unknown
pub const MAX_UNKNOWN_CODE_SIZE: usize = 4;
pub const MAX_HOLDER_NAME_LEN: usize = 26;
pub const MIN_HOLDER_NAME_LEN: usize = 2;

/// Keep only ASCII digits
pub fn strip_non_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Luhn mod-10 checksum. Non-digit characters are ignored, so the empty
/// string passes; callers gate on [`MIN_NUMBER_DIGITS`].
pub fn luhn_check(number: &str) -> bool {
    let sum: u32 = number
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
        .map(|(i, digit)| {
            if i % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();

    sum % 10 == 0
}

/// First rule in registry order whose prefix matches
pub fn detect_card_type<'a>(
    registry: &'a CardTypeRegistry,
    number: &str,
) -> Option<&'a CardTypeRule> {
    registry.detect(number)
}

/// Group digits with a separator before each gap position.
///
/// Uses the issuer's gaps, or `4, 8, 12` when the issuer is unknown. Does
/// not cap the length.
pub fn format_card_number(value: &str, rule: Option<&CardTypeRule>) -> String {
    let digits = strip_non_digits(value);
    let gaps: &[usize] = rule.map(|r| r.gaps.as_slice()).unwrap_or(&DEFAULT_GAPS);

    let mut formatted = String::with_capacity(digits.len() + gaps.len());
    let mut next_gap = gaps.iter().peekable();
    for (i, digit) in digits.chars().enumerate() {
        if next_gap.peek().is_some_and(|&&gap| gap == i) {
            formatted.push(NUMBER_SEPARATOR);
            next_gap.next();
        }
        formatted.push(digit);
    }

    formatted
}

/// Format as `MM/YY` once two digits are present. Digits past the fourth
/// are dropped; the form refuses such input before calling this.
pub fn format_expiry_date(value: &str) -> String {
    let digits = strip_non_digits(value);
    if digits.len() < 2 {
        return digits;
    }

    let year: String = digits.chars().skip(2).take(2).collect();
    format!("{}/{}", &digits[..2], year)
}

/// A calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Current month in local system time
    pub fn current() -> Self {
        let now = chrono::Local::now();
        Self::new(now.year(), now.month())
    }
}

/// Validate an expiry against the local calendar month
pub fn validate_expiry_date(value: &str) -> Result<(), FieldError> {
    validate_expiry_date_at(value, YearMonth::current())
}

/// Validate an expiry (`MM/YY`, separators optional) against `today`
pub fn validate_expiry_date_at(value: &str, today: YearMonth) -> Result<(), FieldError> {
    let digits = strip_non_digits(value);
    if digits.len() != EXPIRY_DIGITS {
        return Err(FieldError::InvalidFormat);
    }

    let month: u32 = digits[..2].parse().map_err(|_| FieldError::InvalidFormat)?;
    let year: i32 = digits[2..].parse().map_err(|_| FieldError::InvalidFormat)?;

    if !(1..=12).contains(&month) {
        return Err(FieldError::InvalidMonth);
    }

    if YearMonth::new(2000 + year, month) < today {
        return Err(FieldError::Expired);
    }

    Ok(())
}

/// Security code length expected for the issuer
pub fn expected_code_size(rule: Option<&CardTypeRule>) -> usize {
    rule.map(|r| r.code.size).unwrap_or(DEFAULT_CODE_SIZE)
}

/// Entry-time cap on the security code
pub fn max_code_size(rule: Option<&CardTypeRule>) -> usize {
    rule.map(|r| r.code.size).unwrap_or(MAX_UNKNOWN_CODE_SIZE)
}

/// Exact digit count match against the expected code size
pub fn validate_cvv(cvv: &str, rule: Option<&CardTypeRule>) -> bool {
    strip_non_digits(cvv).len() == expected_code_size(rule)
}

/// Keep Latin letters and whitespace, uppercased
pub fn normalize_holder_name(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub fn validate_holder_name(name: &str) -> bool {
    name.trim().chars().count() >= MIN_HOLDER_NAME_LEN
}
