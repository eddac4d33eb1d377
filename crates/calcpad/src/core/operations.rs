//! Binary keypad operators
//!
//! Type-safe operator enum: a pending operation can only ever be one of the
//! four keys on the pad.

use crate::core::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

/// Arithmetic operator awaiting its right-hand operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Sub,
    /// Multiplication (x)
    Mul,
    /// Division (/)
    Div,
}

impl Operator {
    /// All operators in keypad order
    pub const ALL: [Self; 4] = [Self::Add, Self::Sub, Self::Mul, Self::Div];

    /// Returns the symbol shown on the secondary display and in history lines
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "x",
            Self::Div => "/",
        }
    }

    /// Maps a typed character onto an operator.
    ///
    /// Accepts the keyboard aliases of the pad: `*`, `x` and `X` multiply,
    /// `/` and `:` divide.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Sub),
            '*' | 'x' | 'X' => Some(Self::Mul),
            '/' | ':' => Some(Self::Div),
            _ => None,
        }
    }

    /// Applies the operator to two operands.
    ///
    /// Division by an exact zero and non-finite results are reported as
    /// errors; every other case is plain IEEE-754 arithmetic.
    pub fn apply(&self, a: f64, b: f64) -> EngineResult<f64> {
        let raw = match self {
            Self::Add => a + b,
            Self::Sub => a - b,
            Self::Mul => a * b,
            Self::Div => {
                if b == 0.0 {
                    return Err(EngineError::DivisionByZero);
                }
                a / b
            }
        };
        check_finite(raw)
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Rejects infinities and NaN produced by an operation
pub(crate) fn check_finite(value: f64) -> EngineResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::Overflow)
    }
}
