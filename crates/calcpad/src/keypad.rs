//! Keypad actions and their keyboard / button mapping
//!
//! Type-safe key actions: adapters translate whatever their toolkit reports
//! (a typed character, a named key, a button label) into a [`KeyAction`] and
//! hand it to [`Calculator::press`](crate::core::Calculator::press).

use crate::core::{EngineConfig, Operator, TaxSlot};
use serde::{Deserialize, Serialize};

/// Memory register keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryKey {
    /// `MC`
    Clear,
    /// `MR`
    Recall,
    /// `M+`
    Add,
    /// `M-`
    Subtract,
    /// `MS`
    Store,
}

impl MemoryKey {
    /// All memory keys in panel order
    pub const ALL: [Self; 5] = [
        Self::Clear,
        Self::Recall,
        Self::Add,
        Self::Subtract,
        Self::Store,
    ];

    /// Button label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Clear => "MC",
            Self::Recall => "MR",
            Self::Add => "M+",
            Self::Subtract => "M-",
            Self::Store => "MS",
        }
    }
}

/// Every key the engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAction {
    /// Digit 0-9
    Digit(u8),
    /// The `00` key
    DoubleZero,
    /// Decimal separator
    Decimal,
    /// Arithmetic operator
    Operator(Operator),
    /// `=`
    Equals,
    /// `C`
    ClearAll,
    /// `CE`
    ClearEntry,
    /// `<-`
    Backspace,
    /// `%`
    Percent,
    /// `+/-`
    ToggleSign,
    /// VAT amount at a configured rate
    Tax(TaxSlot),
    /// `HT>TTC`
    ExclusiveToInclusive,
    /// `TTC>HT`
    InclusiveToExclusive,
    /// Memory register key
    Memory(MemoryKey),
}

impl KeyAction {
    /// Maps a typed character.
    ///
    /// Digits, `+ - * x X / :`, `=`, both decimal marks and `%`.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => c.to_digit(10).map(|d| Self::Digit(d as u8)),
            ',' | '.' => Some(Self::Decimal),
            '=' => Some(Self::Equals),
            '%' => Some(Self::Percent),
            other => Operator::from_char(other).map(Self::Operator),
        }
    }

    /// Maps a named (non-character) key
    #[must_use]
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "Enter" | "Return" => Some(Self::Equals),
            "Backspace" => Some(Self::Backspace),
            "Escape" => Some(Self::ClearAll),
            "Delete" => Some(Self::ClearEntry),
            _ => None,
        }
    }

    /// Maps a button label; tax buttons are labelled from `config`
    #[must_use]
    pub fn from_label(label: &str, config: &EngineConfig) -> Option<Self> {
        let fixed = match label {
            "C" => Some(Self::ClearAll),
            "CE" => Some(Self::ClearEntry),
            "<-" => Some(Self::Backspace),
            "=" => Some(Self::Equals),
            "00" => Some(Self::DoubleZero),
            "%" => Some(Self::Percent),
            "+/-" => Some(Self::ToggleSign),
            "HT>TTC" => Some(Self::ExclusiveToInclusive),
            "TTC>HT" => Some(Self::InclusiveToExclusive),
            _ => None,
        };
        if fixed.is_some() {
            return fixed;
        }
        if let Some(key) = MemoryKey::ALL.into_iter().find(|k| k.label() == label) {
            return Some(Self::Memory(key));
        }
        if let Some(slot) = TaxSlot::ALL
            .into_iter()
            .find(|slot| tax_label(*slot, config) == label)
        {
            return Some(Self::Tax(slot));
        }
        let mut chars = label.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => None,
        }
    }

    /// Button label for this action
    #[must_use]
    pub fn label(&self, config: &EngineConfig) -> String {
        match self {
            Self::Digit(d) => d.to_string(),
            Self::DoubleZero => "00".to_string(),
            Self::Decimal => config.decimal_mark.to_string(),
            Self::Operator(op) => op.symbol().to_string(),
            Self::Equals => "=".to_string(),
            Self::ClearAll => "C".to_string(),
            Self::ClearEntry => "CE".to_string(),
            Self::Backspace => "<-".to_string(),
            Self::Percent => "%".to_string(),
            Self::ToggleSign => "+/-".to_string(),
            Self::Tax(slot) => tax_label(*slot, config),
            Self::ExclusiveToInclusive => "HT>TTC".to_string(),
            Self::InclusiveToExclusive => "TTC>HT".to_string(),
            Self::Memory(key) => key.label().to_string(),
        }
    }

    /// Every button on the pad, panel order (memory, tax, functions, digits)
    #[must_use]
    pub fn buttons() -> Vec<Self> {
        let mut buttons: Vec<Self> = MemoryKey::ALL.into_iter().map(Self::Memory).collect();
        buttons.extend(TaxSlot::ALL.into_iter().map(Self::Tax));
        buttons.extend([
            Self::ExclusiveToInclusive,
            Self::InclusiveToExclusive,
            Self::Percent,
            Self::ToggleSign,
            Self::ClearAll,
            Self::ClearEntry,
            Self::Backspace,
            Self::Operator(Operator::Div),
            Self::Digit(7),
            Self::Digit(8),
            Self::Digit(9),
            Self::Operator(Operator::Mul),
            Self::Digit(4),
            Self::Digit(5),
            Self::Digit(6),
            Self::Operator(Operator::Sub),
            Self::Digit(1),
            Self::Digit(2),
            Self::Digit(3),
            Self::Operator(Operator::Add),
            Self::DoubleZero,
            Self::Digit(0),
            Self::Decimal,
            Self::Equals,
        ]);
        buttons
    }
}

/// `"20%"`, `"5.5%"`: whole rates without decimals, others with one
fn tax_label(slot: TaxSlot, config: &EngineConfig) -> String {
    let rate = config.tax.rate(slot);
    if rate.fract() == 0.0 {
        format!("{rate:.0}%")
    } else {
        format!("{rate:.1}%")
    }
}
