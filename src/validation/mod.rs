//! Validation Engine
//!
//! Field checks and formatters, separated from form state handling.

pub mod engine;
pub mod error;

pub use engine::{
    detect_card_type, format_card_number, format_expiry_date, luhn_check, normalize_holder_name,
    strip_non_digits, validate_cvv, validate_expiry_date, validate_expiry_date_at,
    validate_holder_name, YearMonth,
};
pub use error::{ErrorKind, FieldError};
