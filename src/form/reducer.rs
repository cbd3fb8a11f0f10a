//! Form Reducer
//!
//! One pure pass over the whole form per input event: clamp the edited
//! field, re-detect the issuer, then re-validate every field against that
//! issuer. Recomputing everything keeps the CVV and number checks in step
//! with the card type currently on screen.

use thiserror::Error;

use crate::card::{CardTypeRegistry, CardTypeRule, DEFAULT_MAX_LENGTH};
use crate::form::state::{DetectedType, Field, FieldState, FormState, SubmissionResult};
use crate::validation::engine::{
    expected_code_size, format_card_number, format_expiry_date, luhn_check, max_code_size,
    normalize_holder_name, strip_non_digits, validate_cvv, validate_expiry_date_at,
    validate_holder_name, YearMonth, EXPIRY_DIGITS, EXPIRY_FORMATTED_LEN, MAX_HOLDER_NAME_LEN,
    MIN_NUMBER_DIGITS,
};
use crate::validation::FieldError;

/// Source of "today" for expiry checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    /// Local system time
    #[default]
    Local,
    Fixed(YearMonth),
}

impl Clock {
    pub fn today(&self) -> YearMonth {
        match self {
            Clock::Local => YearMonth::current(),
            Clock::Fixed(today) => *today,
        }
    }
}

/// Submission attempted while the form is not acceptable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("form is not ready, invalid fields: {}", join_fields(.invalid))]
    NotReady { invalid: Vec<Field> },
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(Field::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reconciles form state against an issuer registry
#[derive(Debug, Clone, Default)]
pub struct FormEngine {
    registry: CardTypeRegistry,
    clock: Clock,
}

impl FormEngine {
    pub fn new(registry: CardTypeRegistry) -> Self {
        Self {
            registry,
            clock: Clock::Local,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn registry(&self) -> &CardTypeRegistry {
        &self.registry
    }

    /// Fresh, empty form
    pub fn reset(&self) -> FormState {
        self.reconcile(FormState::default())
    }

    /// Apply one input event and return the next state.
    ///
    /// Input past a field's cap is refused: the previous value is kept
    /// rather than truncated.
    pub fn on_field_change(&self, state: &FormState, field: Field, raw: &str) -> FormState {
        let mut next = state.clone();
        match self.clamp(state, field, raw) {
            Some(value) => next.field_mut(field).value = value,
            None => log::debug!("Refused {} input exceeding its limit", field),
        }
        self.reconcile(next)
    }

    /// Accept the form if every field validates
    pub fn on_submit(&self, state: &FormState) -> Result<SubmissionResult, SubmitError> {
        let state = self.reconcile(state.clone());

        match (&state.detected, state.can_submit) {
            (Some(detected), true) => {
                log::info!("Card accepted: {}", detected.name);
                Ok(SubmissionResult {
                    card_type_name: detected.name.clone(),
                })
            }
            (None, true) => Err(SubmitError::NotReady {
                invalid: vec![Field::Number],
            }),
            (_, false) => Err(SubmitError::NotReady {
                invalid: state.invalid_fields(),
            }),
        }
    }

    /// Field-specific transform of a raw edit, or `None` to refuse it
    fn clamp(&self, state: &FormState, field: Field, raw: &str) -> Option<String> {
        match field {
            Field::Number => {
                let digits = strip_non_digits(raw);
                let rule = self.registry.detect(&digits);
                let max = rule.map(CardTypeRule::max_length).unwrap_or(DEFAULT_MAX_LENGTH);
                (digits.len() <= max).then(|| format_card_number(&digits, rule))
            }
            Field::Expiry => {
                let digits = strip_non_digits(raw);
                (digits.len() <= EXPIRY_DIGITS).then(|| format_expiry_date(&digits))
            }
            Field::Cvv => {
                let digits = strip_non_digits(raw);
                let rule = self.registry.detect(&state.number.value);
                (digits.len() <= max_code_size(rule)).then_some(digits)
            }
            Field::HolderName => {
                let name = normalize_holder_name(raw);
                (name.chars().count() <= MAX_HOLDER_NAME_LEN).then_some(name)
            }
        }
    }

    /// Re-derive the issuer and every validity from the current values
    fn reconcile(&self, mut state: FormState) -> FormState {
        let rule = self.registry.detect(&state.number.value);
        let today = self.clock.today();

        state.number.validity = number_validity(&state.number, rule);
        state.expiry.validity = expiry_validity(&state.expiry, today);
        state.cvv.validity = cvv_validity(&state.cvv, rule);
        state.holder_name.validity = holder_name_validity(&state.holder_name);

        state.detected = rule.map(DetectedType::from);
        state.can_submit = Field::ALL.iter().all(|&f| state.field(f).is_valid());

        log::debug!(
            "Reconciled form: type={:?} can_submit={}",
            state.detected.as_ref().map(|d| d.key.as_str()),
            state.can_submit
        );

        state
    }
}

fn number_validity(field: &FieldState, rule: Option<&CardTypeRule>) -> Result<(), FieldError> {
    let digits = strip_non_digits(&field.value);
    if digits.is_empty() {
        return Err(FieldError::Incomplete);
    }
    if digits.len() < MIN_NUMBER_DIGITS {
        return Err(FieldError::NumberTooShort);
    }

    match rule {
        Some(rule) if rule.accepts_length(digits.len()) => {
            if luhn_check(&digits) {
                Ok(())
            } else {
                Err(FieldError::ChecksumMismatch)
            }
        }
        _ => Err(FieldError::InvalidLength),
    }
}

fn expiry_validity(field: &FieldState, today: YearMonth) -> Result<(), FieldError> {
    if field.value.len() < EXPIRY_FORMATTED_LEN {
        return Err(FieldError::Incomplete);
    }
    validate_expiry_date_at(&field.value, today)
}

fn cvv_validity(field: &FieldState, rule: Option<&CardTypeRule>) -> Result<(), FieldError> {
    if field.value.is_empty() {
        return Err(FieldError::Incomplete);
    }
    if validate_cvv(&field.value, rule) {
        Ok(())
    } else {
        Err(FieldError::WrongDigitCount {
            expected: expected_code_size(rule),
        })
    }
}

fn holder_name_validity(field: &FieldState) -> Result<(), FieldError> {
    if field.value.is_empty() {
        return Err(FieldError::Incomplete);
    }
    if validate_holder_name(&field.value) {
        Ok(())
    } else {
        Err(FieldError::NameTooShort)
    }
}
