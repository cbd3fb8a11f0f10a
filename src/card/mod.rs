//! Card Type System
//!
//! Issuer rules and the ordered registry used for detection.

pub mod registry;
pub mod schema;

pub use registry::{CardTypeRegistry, DEFAULT_CODE_SIZE, DEFAULT_GAPS, DEFAULT_MAX_LENGTH};
pub use schema::{CardRulesFile, CardTypeDef, CardTypeRule, SecurityCode};
