//! Calculator engine core
//!
//! The state machine, its number formatting and the history log. Nothing in
//! here knows about windows, widgets or terminals; adapters read the display
//! strings and forward key presses.

pub mod config;
mod engine;
pub mod format;
pub mod history;
mod operations;

pub use config::{ConfigError, EngineConfig, TaxRates, TaxSlot};
pub use engine::{Calculator, CalculatorState, DisplaySnapshot};
pub use operations::Operator;

use thiserror::Error;

/// Result type for engine internals
pub type EngineResult<T> = Result<T, EngineError>;

/// Failures inside the engine.
///
/// None of these escape a key operation: arithmetic errors become an error
/// display plus a reset, parse errors leave the state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Division by zero attempted
    #[error("Division by zero")]
    DivisionByZero,
    /// Result is not a finite number
    #[error("Overflow: result exceeds the representable range")]
    Overflow,
    /// Text that is not a plain decimal number
    #[error("Invalid number: {0:?}")]
    InvalidNumber(String),
    /// Key that is not a digit key
    #[error("Invalid digit key: {0:?}")]
    InvalidDigit(String),
}

impl EngineError {
    /// Create an invalid number error
    #[must_use]
    pub fn invalid_number(text: impl Into<String>) -> Self {
        Self::InvalidNumber(text.into())
    }

    /// Primary display text shown when this error ends a computation
    #[must_use]
    pub const fn display_text(&self) -> &'static str {
        match self {
            Self::DivisionByZero => "Error: /0",
            Self::Overflow => "Error: overflow",
            Self::InvalidNumber(_) | Self::InvalidDigit(_) => "Error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(EngineError::DivisionByZero.to_string(), "Division by zero");
        assert!(EngineError::Overflow.to_string().contains("Overflow"));
        assert_eq!(
            EngineError::invalid_number("abc").to_string(),
            "Invalid number: \"abc\""
        );
        assert!(EngineError::InvalidDigit("7a".into())
            .to_string()
            .contains("7a"));
    }

    #[test]
    fn test_error_display_text() {
        assert_eq!(EngineError::DivisionByZero.display_text(), "Error: /0");
        assert_eq!(EngineError::Overflow.display_text(), "Error: overflow");
    }

    #[test]
    fn test_error_is_error_trait() {
        let err: Box<dyn std::error::Error> = Box::new(EngineError::DivisionByZero);
        assert!(err.to_string().contains("Division"));
    }
}
