//! Form Reconciliation
//!
//! Form state and the reducer that keeps it consistent.

pub mod reducer;
pub mod state;

pub use reducer::{Clock, FormEngine, SubmitError};
pub use state::{DetectedType, Field, FieldState, FormState, SubmissionResult};
