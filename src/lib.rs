//! cardform
//!
//! Credit card form engine with a decorative cursor trail.
//!
//! This library provides:
//! - Issuer detection from an ordered, extensible card type registry
//! - Luhn checks and field formatting/validation
//! - A single reducer that keeps the whole form state consistent
//! - A bounded pointer trail and timer-driven ribbon animation
//! - A JSON-lines stdio front end and configuration management

pub mod card;
pub mod cli;
pub mod config;
pub mod form;
pub mod server;
pub mod trail;
pub mod validation;

// Re-exports for the public API
pub use card::{CardTypeRegistry, CardTypeRule};
pub use config::Config;
pub use form::{Field, FormEngine, FormState, SubmissionResult};
pub use validation::{luhn_check, FieldError};
