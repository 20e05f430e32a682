//! Error types for the ticker core.
//!
//! Only construction and configuration can fail. Once a counter exists every
//! operation is total and malformed values degrade instead of erroring.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TickerError {
    /// The initial value produced no digits, so there is nothing to lay out.
    #[error("initial value {input:?} contains no digits")]
    EmptyValue { input: String },

    /// The decimal separator must be at least one character.
    #[error("decimal separator must not be empty")]
    EmptySeparator,

    /// Durations are seconds and must be finite and non-negative.
    #[error("invalid duration for {field}: {value}")]
    InvalidDuration { field: &'static str, value: f32 },

    /// Config JSON could not be deserialized.
    #[error("config json error: {0}")]
    ConfigJson(String),
}
