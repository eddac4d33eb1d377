//! Keypad state machine
//!
//! [`Calculator`] interprets discrete key presses and keeps three outputs
//! current after every call: the primary display, the secondary
//! (operation-in-progress) display and the history log.
//!
//! Operands are accumulated as dot-decimal strings and only parsed to `f64`
//! when something is computed, so backspace and partial entries such as
//! `"0."` behave exactly as typed.

use super::operations::check_finite;
use crate::core::config::{EngineConfig, TaxSlot};
use crate::core::format::{self, NumberFormat};
use crate::core::history::{History, HistoryEntry};
use crate::core::{EngineError, EngineResult, Operator};
use crate::keypad::{KeyAction, MemoryKey};
use serde::Serialize;
use tracing::{debug, trace};

/// Secondary display text after a history line was loaded
pub const HISTORY_LOADED_INDICATOR: &str = "From history:";

/// Raw arithmetic state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculatorState {
    /// In-progress entry; empty means nothing typed yet
    pub current: String,
    /// Left operand once an operator was chosen
    pub previous: String,
    /// Operation waiting for its right operand
    pub operator: Option<Operator>,
    /// The primary display shows a computed result
    pub result_shown: bool,
    /// Memory register
    pub memory: f64,
}

impl CalculatorState {
    fn reset_operands(&mut self) {
        self.current.clear();
        self.previous.clear();
        self.operator = None;
        self.result_shown = false;
    }
}

/// Everything an adapter needs to paint the calculator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySnapshot {
    /// Main display
    pub primary: String,
    /// Operation-in-progress line
    pub secondary: String,
    /// Pending operator, if any
    pub pending: Option<Operator>,
    /// Memory register
    pub memory: f64,
    /// History lines, oldest first
    pub history: Vec<String>,
}

/// The calculator engine
#[derive(Debug, Clone)]
pub struct Calculator {
    config: EngineConfig,
    format: NumberFormat,
    state: CalculatorState,
    history: History,
    primary: String,
    secondary: String,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    /// Creates a calculator with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates a calculator for a specific tax regime / locale
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            format: config.number_format(),
            config,
            state: CalculatorState::default(),
            history: History::new(),
            primary: "0".to_string(),
            secondary: String::new(),
        }
    }

    // ===== Observers =====

    /// Active configuration
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Raw arithmetic state
    #[must_use]
    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    /// Main display text
    #[must_use]
    pub fn primary_display(&self) -> &str {
        &self.primary
    }

    /// Operation-in-progress text
    #[must_use]
    pub fn secondary_display(&self) -> &str {
        &self.secondary
    }

    /// History log
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// History lines, oldest first
    #[must_use]
    pub fn history_entries(&self) -> Vec<String> {
        self.history.lines()
    }

    /// Memory register
    #[must_use]
    pub fn memory(&self) -> f64 {
        self.state.memory
    }

    /// True when the memory register holds something other than zero
    #[must_use]
    pub fn has_memory(&self) -> bool {
        self.state.memory != 0.0
    }

    /// Numeric value of the current entry (0 when empty or unparseable)
    #[must_use]
    pub fn current_value(&self) -> f64 {
        self.value_of(&self.state.current)
    }

    /// Serializable view of the displays
    #[must_use]
    pub fn snapshot(&self) -> DisplaySnapshot {
        DisplaySnapshot {
            primary: self.primary.clone(),
            secondary: self.secondary.clone(),
            pending: self.state.operator,
            memory: self.state.memory,
            history: self.history.lines(),
        }
    }

    // ===== Entry =====

    /// Applies one key action
    pub fn press(&mut self, action: KeyAction) {
        trace!(?action, "key pressed");
        match action {
            KeyAction::Digit(d) => self.input_digit(&d.to_string()),
            KeyAction::DoubleZero => self.input_digit("00"),
            KeyAction::Decimal => self.input_decimal_point(),
            KeyAction::Operator(op) => self.set_operator(op),
            KeyAction::Equals => self.equals(),
            KeyAction::ClearAll => self.clear_all(),
            KeyAction::ClearEntry => self.clear_entry(),
            KeyAction::Backspace => self.backspace(),
            KeyAction::Percent => self.percent(),
            KeyAction::ToggleSign => self.toggle_sign(),
            KeyAction::Tax(slot) => self.apply_tax(slot),
            KeyAction::ExclusiveToInclusive => self.convert_exclusive_to_inclusive(),
            KeyAction::InclusiveToExclusive => self.convert_inclusive_to_exclusive(),
            KeyAction::Memory(key) => match key {
                MemoryKey::Clear => self.memory_clear(),
                MemoryKey::Recall => self.memory_recall(),
                MemoryKey::Add => self.memory_add(),
                MemoryKey::Subtract => self.memory_subtract(),
                MemoryKey::Store => self.memory_store(),
            },
        }
    }

    /// Appends a digit key (`"0"`..`"9"` or `"00"`).
    ///
    /// After a result the entry starts over. Input beyond the length limit is
    /// dropped; for `"00"` only the zeros that fit are kept.
    pub fn input_digit(&mut self, digits: &str) {
        if let Err(err) = check_digit_key(digits) {
            debug!(%err, "ignoring key");
            return;
        }
        if self.state.result_shown {
            self.state.current.clear();
            self.state.result_shown = false;
        }
        let room = self
            .config
            .max_entry_len
            .saturating_sub(self.state.current.len());
        if room == 0 {
            trace!(len = self.state.current.len(), "entry full, digit dropped");
            return;
        }
        self.state.current.extend(digits.chars().take(room));
        self.refresh_primary();
    }

    /// Adds the decimal separator once; further presses are no-ops
    pub fn input_decimal_point(&mut self) {
        if self.state.result_shown {
            self.state.current = "0".to_string();
            self.state.result_shown = false;
        }
        if self.state.current.is_empty() {
            self.state.current.push('0');
        }
        if !self.state.current.contains('.')
            && self.state.current.len() < self.config.max_entry_len
        {
            self.state.current.push('.');
        }
        self.refresh_primary();
    }

    /// Selects the pending operator.
    ///
    /// With both operands present the pending operation is evaluated first,
    /// so `5 + 3 +` shows 8 before the second `+` applies. Pressing another
    /// operator right after one only swaps it.
    pub fn set_operator(&mut self, op: Operator) {
        if self.state.current.is_empty() && self.state.previous.is_empty() {
            return;
        }
        if !self.state.previous.is_empty()
            && !self.state.current.is_empty()
            && self.evaluate().is_err()
        {
            // the chain ended on an error display; nothing to carry over
            return;
        }
        if !self.state.current.is_empty() {
            self.state.previous = std::mem::take(&mut self.state.current);
        }
        self.state.operator = Some(op);
        self.state.current.clear();
        self.state.result_shown = false;
        self.secondary = format!("{} {}", self.format.operand(&self.state.previous), op);
    }

    /// Evaluates `previous OP current`
    pub fn equals(&mut self) {
        if let Err(err) = self.evaluate() {
            trace!(%err, "equals ended on an error display");
        }
    }

    fn evaluate(&mut self) -> EngineResult<()> {
        let Some(op) = self.state.operator else {
            return Ok(());
        };
        if self.state.previous.is_empty() || self.state.current.is_empty() {
            return Ok(());
        }
        let a = self.value_of(&self.state.previous);
        let b = self.value_of(&self.state.current);
        let expression = format!(
            "{} {} {}",
            self.format.operand(&self.state.previous),
            op,
            self.format.operand(&self.state.current)
        );

        let result = match op.apply(a, b) {
            Ok(result) => result,
            Err(err) => {
                self.fail(&err);
                return Err(err);
            }
        };

        let shown = self.format.result(result);
        self.history.record(expression.clone(), shown.clone());
        self.state.current = format::to_operand_string(result);
        self.state.previous.clear();
        self.state.operator = None;
        self.state.result_shown = true;
        self.secondary = format!("{expression} =");
        self.primary = shown;
        Ok(())
    }

    // ===== Clearing =====

    /// `C`: drops operands and pending operator; memory and history stay
    pub fn clear_all(&mut self) {
        self.state.reset_operands();
        self.secondary.clear();
        self.primary = "0".to_string();
    }

    /// `CE`: drops the current entry only
    pub fn clear_entry(&mut self) {
        self.state.current.clear();
        self.primary = "0".to_string();
    }

    /// Removes the last typed character; results cannot be edited
    pub fn backspace(&mut self) {
        if self.state.result_shown || self.state.current.is_empty() {
            return;
        }
        self.state.current.pop();
        self.refresh_primary();
    }

    // ===== Accounting =====

    /// VAT amount at `rate` percent of the current value
    pub fn apply_tax_rate(&mut self, rate: f64) {
        let value = self.current_value();
        if value == 0.0 {
            return;
        }
        let expression = format!("TVA {rate:.1}% of {}", self.format.result(value));
        self.show_result(expression, value * rate / 100.0);
    }

    /// VAT amount at one of the configured rates
    pub fn apply_tax(&mut self, slot: TaxSlot) {
        self.apply_tax_rate(self.config.tax.rate(slot));
    }

    /// Net (HT) to gross (TTC) at the standard rate
    pub fn convert_exclusive_to_inclusive(&mut self) {
        let value = self.current_value();
        if value == 0.0 {
            return;
        }
        let rate = self.config.tax.standard;
        let expression = format!(
            "{} HT > TTC ({}%)",
            self.format.result(value),
            self.format.rate(rate)
        );
        self.show_result(expression, value * (1.0 + rate / 100.0));
    }

    /// Gross (TTC) to net (HT) at the standard rate
    pub fn convert_inclusive_to_exclusive(&mut self) {
        let value = self.current_value();
        if value == 0.0 {
            return;
        }
        let rate = self.config.tax.standard;
        let expression = format!(
            "{} TTC > HT ({}%)",
            self.format.result(value),
            self.format.rate(rate)
        );
        self.show_result(expression, value / (1.0 + rate / 100.0));
    }

    /// `%` key.
    ///
    /// Mid-expression (`200 + 10 %`) the entry becomes that percentage of the
    /// left operand and stays editable. On a lone entry it divides by 100 and
    /// shows the result.
    pub fn percent(&mut self) {
        if !self.state.previous.is_empty() && !self.state.current.is_empty() {
            let base = self.value_of(&self.state.previous);
            let pct = self.value_of(&self.state.current);
            match check_finite(base * pct / 100.0) {
                Ok(value) => {
                    self.state.current = format::to_operand_string(value);
                    self.refresh_primary();
                }
                Err(err) => self.fail(&err),
            }
        } else if !self.state.current.is_empty() {
            let value = self.current_value();
            let result = value / 100.0;
            self.secondary = format!("{}% =", self.format.result(value));
            self.primary = self.format.result(result);
            self.state.current = format::to_operand_string(result);
            self.state.result_shown = true;
        }
    }

    /// `+/-` key
    pub fn toggle_sign(&mut self) {
        let current = &mut self.state.current;
        if current.is_empty() || *current == "0" {
            return;
        }
        if current.starts_with('-') {
            current.remove(0);
        } else if current.len() < self.config.max_entry_len {
            current.insert(0, '-');
        } else {
            trace!("entry full, sign not added");
            return;
        }
        self.refresh_primary();
    }

    // ===== Memory =====

    /// `MC`
    pub fn memory_clear(&mut self) {
        self.state.memory = 0.0;
    }

    /// `MR`: loads the register into the entry
    pub fn memory_recall(&mut self) {
        if !self.state.memory.is_finite() {
            debug!(memory = self.state.memory, "refusing to recall memory");
            return;
        }
        self.state.current = format::to_operand_string(self.state.memory);
        self.refresh_primary();
    }

    /// `M+`
    pub fn memory_add(&mut self) {
        self.set_memory(self.state.memory + self.current_value());
    }

    /// `M-`
    pub fn memory_subtract(&mut self) {
        self.set_memory(self.state.memory - self.current_value());
    }

    /// `MS`
    pub fn memory_store(&mut self) {
        self.set_memory(self.current_value());
    }

    /// Register keeps its old value when `value` overflowed
    fn set_memory(&mut self, value: f64) {
        match check_finite(value) {
            Ok(value) => self.state.memory = value,
            Err(err) => self.fail(&err),
        }
    }

    // ===== History and clipboard =====

    /// Loads the result part of a history line as the new entry
    pub fn load_from_history(&mut self, line: &str) {
        let Some(text) = HistoryEntry::result_text(line) else {
            debug!(line, "history line has no result");
            return;
        };
        let normalized = self.format.normalize(text);
        if let Err(err) = format::parse_number(&normalized) {
            debug!(%err, "ignoring history line");
            return;
        }
        self.state.current = normalized;
        self.state.previous.clear();
        self.state.operator = None;
        self.state.result_shown = true;
        self.secondary = HISTORY_LOADED_INDICATOR.to_string();
        self.refresh_primary();
    }

    /// Loads history panel row `index`, counted from the newest entry
    pub fn load_history_entry(&mut self, index: usize) {
        match self.history.newest(index).map(HistoryEntry::display) {
            Some(line) => self.load_from_history(&line),
            None => debug!(index, len = self.history.len(), "no such history row"),
        }
    }

    /// Empties the history log
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Primary display with a dot decimal, ready for the clipboard
    #[must_use]
    pub fn copy_value(&self) -> String {
        self.format.normalize(&self.primary)
    }

    /// Replaces the entry with pasted text; anything that is not a plain
    /// number (after dropping whitespace) is ignored
    pub fn paste_value(&mut self, raw: &str) {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
        let cleaned = self.format.normalize(&compact).replace(',', ".");
        if cleaned.is_empty() {
            return;
        }
        if cleaned.len() > self.config.max_entry_len {
            debug!(len = cleaned.len(), "pasted number too long");
            return;
        }
        if let Err(err) = format::parse_number(&cleaned) {
            debug!(%err, "ignoring pasted text");
            return;
        }
        self.state.current = cleaned;
        self.state.result_shown = false;
        self.refresh_primary();
    }

    // ===== Internals =====

    fn value_of(&self, text: &str) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        format::parse_number(text).unwrap_or_else(|err| {
            debug!(%err, "operand read as zero");
            0.0
        })
    }

    fn refresh_primary(&mut self) {
        self.primary = self.format.operand(&self.state.current);
    }

    fn show_result(&mut self, expression: String, value: f64) {
        let value = match check_finite(value) {
            Ok(value) => value,
            Err(err) => {
                self.fail(&err);
                return;
            }
        };
        let shown = self.format.result(value);
        self.history.record(expression.clone(), shown.clone());
        self.state.current = format::to_operand_string(value);
        self.state.result_shown = true;
        self.secondary = expression;
        self.primary = shown;
    }

    fn fail(&mut self, err: &EngineError) {
        debug!(%err, "computation reset");
        self.state.reset_operands();
        self.secondary.clear();
        self.primary = err.display_text().to_string();
    }
}

fn check_digit_key(key: &str) -> EngineResult<()> {
    let is_digit_key = key == "00" || (key.len() == 1 && key.bytes().all(|b| b.is_ascii_digit()));
    if is_digit_key {
        Ok(())
    } else {
        Err(EngineError::InvalidDigit(key.to_string()))
    }
}
