//! Form State
//!
//! The whole form as one value. The reducer always produces a fresh
//! `FormState`; nothing is patched in place from outside.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::card::CardTypeRule;
use crate::validation::FieldError;

/// The four form inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Number,
    Expiry,
    Cvv,
    HolderName,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Number, Field::Expiry, Field::Cvv, Field::HolderName];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Number => "number",
            Field::Expiry => "expiry",
            Field::Cvv => "cvv",
            Field::HolderName => "holderName",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display value of one input plus its validity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldState {
    pub value: String,
    pub validity: Result<(), FieldError>,
}

impl Default for FieldState {
    fn default() -> Self {
        Self {
            value: String::new(),
            validity: Err(FieldError::Incomplete),
        }
    }
}

impl FieldState {
    pub fn is_valid(&self) -> bool {
        self.validity.is_ok()
    }

    pub fn error(&self) -> Option<&FieldError> {
        self.validity.as_ref().err()
    }

    /// Inline error text; incomplete input shows nothing
    pub fn error_message(&self) -> Option<String> {
        self.error().and_then(FieldError::message)
    }
}

impl Serialize for FieldState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let message = self.error_message();
        let len = if message.is_some() { 3 } else { 2 };

        let mut state = serializer.serialize_struct("FieldState", len)?;
        state.serialize_field("value", &self.value)?;
        state.serialize_field("isValid", &self.is_valid())?;
        if let Some(message) = message {
            state.serialize_field("errorMessage", &message)?;
        }
        state.end()
    }
}

/// Issuer recognized from the number field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedType {
    pub key: String,
    pub name: String,
    pub security_code_label: String,
    pub security_code_length: usize,
}

impl From<&CardTypeRule> for DetectedType {
    fn from(rule: &CardTypeRule) -> Self {
        Self {
            key: rule.key.clone(),
            name: rule.name.clone(),
            security_code_label: rule.code.name.clone(),
            security_code_length: rule.code.size,
        }
    }
}

/// Complete form snapshot handed to the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub number: FieldState,
    pub expiry: FieldState,
    pub cvv: FieldState,
    pub holder_name: FieldState,
    #[serde(rename = "detectedType")]
    pub detected: Option<DetectedType>,
    pub can_submit: bool,
}

impl FormState {
    pub fn field(&self, field: Field) -> &FieldState {
        match field {
            Field::Number => &self.number,
            Field::Expiry => &self.expiry,
            Field::Cvv => &self.cvv,
            Field::HolderName => &self.holder_name,
        }
    }

    pub(crate) fn field_mut(&mut self, field: Field) -> &mut FieldState {
        match field {
            Field::Number => &mut self.number,
            Field::Expiry => &mut self.expiry,
            Field::Cvv => &mut self.cvv,
            Field::HolderName => &mut self.holder_name,
        }
    }

    /// Fields currently failing validation, in form order
    pub fn invalid_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|&f| !self.field(f).is_valid())
            .collect()
    }
}

/// Payload returned for an accepted form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResult {
    pub card_type_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state() {
        let state = FormState::default();
        assert!(!state.can_submit);
        assert_eq!(state.invalid_fields(), Field::ALL.to_vec());
        assert_eq!(state.number.error_message(), None);
    }

    #[test]
    fn test_field_state_serialization() {
        let field = FieldState {
            value: "12/1".to_string(),
            validity: Err(FieldError::Incomplete),
        };
        assert_eq!(
            serde_json::to_value(&field).unwrap(),
            serde_json::json!({ "value": "12/1", "isValid": false })
        );

        let field = FieldState {
            value: "13/25".to_string(),
            validity: Err(FieldError::InvalidMonth),
        };
        assert_eq!(
            serde_json::to_value(&field).unwrap(),
            serde_json::json!({ "value": "13/25", "isValid": false, "errorMessage": "Invalid month" })
        );
    }

    #[test]
    fn test_form_state_keys() {
        let value = serde_json::to_value(FormState::default()).unwrap();
        assert!(value.get("holderName").is_some());
        assert!(value["detectedType"].is_null());
        assert_eq!(value["canSubmit"], false);
    }

    #[test]
    fn test_field_names() {
        assert_eq!(Field::HolderName.to_string(), "holderName");
        let field: Field = serde_json::from_str("\"holderName\"").unwrap();
        assert_eq!(field, Field::HolderName);
    }
}
