//! Calcpad - desk-calculator engine with VAT and memory keys
//!
//! The engine is a pure state machine: keys go in, display strings come out.
//! No toolkit, clipboard or clock is touched by [`core::Calculator`];
//! [`driver::Session`] layers those collaborators on top.
//!
//! # Example
//!
//! ```rust
//! use calcpad::prelude::*;
//!
//! let mut calc = Calculator::new();
//! for c in "7/2=".chars() {
//!     calc.press(KeyAction::from_char(c).unwrap());
//! }
//! assert_eq!(calc.primary_display(), "3,50");
//! assert_eq!(calc.history_entries(), vec!["7 / 2 = 3,50"]);
//!
//! // VAT keys use injected rates
//! let mut calc = Calculator::with_config(EngineConfig::new().with_standard_rate(25.0));
//! calc.input_digit("8");
//! calc.press(KeyAction::ExclusiveToInclusive);
//! assert_eq!(calc.primary_display(), "10");
//! assert_eq!(calc.secondary_display(), "8 HT > TTC (25%)");
//! ```

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod core;
pub mod driver;
pub mod keypad;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::core::history::{History, HistoryEntry};
    pub use crate::core::{
        Calculator, CalculatorState, ConfigError, DisplaySnapshot, EngineConfig, EngineError,
        EngineResult, Operator, TaxRates, TaxSlot,
    };
    pub use crate::driver::{
        CalculatorDriver, Clipboard, Command, CopyFeedback, MemoryClipboard, Session,
    };
    pub use crate::keypad::{KeyAction, MemoryKey};
}
