//! Number formatting at the display boundary
//!
//! Operands are stored as dot-decimal strings. Two renderings exist:
//!
//! - results use the accounting convention: whole numbers without decimals,
//!   everything else rounded to cents;
//! - operands are shown exactly as typed, only the decimal mark is localized.

use crate::core::{EngineError, EngineResult};

/// Decimal mark used when no configuration says otherwise
pub const DEFAULT_DECIMAL_MARK: char = ',';

/// Decimals kept when a computed value is stored back as an operand
pub const OPERAND_PRECISION: usize = 10;

/// Locale-aware renderer for display strings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    decimal_mark: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::new(DEFAULT_DECIMAL_MARK)
    }
}

impl NumberFormat {
    /// Creates a formatter using `decimal_mark` on screen
    #[must_use]
    pub const fn new(decimal_mark: char) -> Self {
        Self { decimal_mark }
    }

    /// Renders a computed value: `6.0 -> "6"`, `6.5 -> "6,50"`
    #[must_use]
    pub fn result(&self, value: f64) -> String {
        let value = value + 0.0;
        if value.fract() == 0.0 {
            format!("{value:.0}")
        } else {
            self.localize(&format!("{value:.2}"))
        }
    }

    /// Renders an in-progress entry; an empty entry shows as `"0"`
    #[must_use]
    pub fn operand(&self, raw: &str) -> String {
        if raw.is_empty() {
            "0".to_string()
        } else {
            self.localize(raw)
        }
    }

    /// Renders a tax rate for button labels: `20.0 -> "20"`, `5.5 -> "5,5"`
    #[must_use]
    pub fn rate(&self, rate: f64) -> String {
        if rate.fract() == 0.0 {
            format!("{rate:.0}")
        } else {
            self.localize(&format!("{rate:.1}"))
        }
    }

    /// Swaps the dot for the on-screen mark
    #[must_use]
    pub fn localize(&self, text: &str) -> String {
        if self.decimal_mark == '.' {
            text.to_string()
        } else {
            text.replace('.', &self.decimal_mark.to_string())
        }
    }

    /// Swaps the on-screen mark back to a dot
    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        if self.decimal_mark == '.' {
            text.to_string()
        } else {
            text.replace(self.decimal_mark, ".")
        }
    }
}

/// Stores a computed value as an operand string.
///
/// Ten fixed decimals, then trailing zeros and a dangling separator are
/// trimmed: `8.0 -> "8"`, `2.5 -> "2.5"`, `1.0 / 3.0 -> "0.3333333333"`.
#[must_use]
pub fn to_operand_string(value: f64) -> String {
    let value = value + 0.0;
    let fixed = format!("{value:.prec$}", prec = OPERAND_PRECISION);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Parses a plain dot-decimal number.
///
/// Only an optional leading `-`, digits and at most one `.` are accepted, so
/// exponents, `inf` and `NaN` are rejected even though `f64::from_str` would
/// take them.
pub fn parse_number(text: &str) -> EngineResult<f64> {
    let body = text.strip_prefix('-').unwrap_or(text);
    let mut digits = 0usize;
    let mut dots = 0usize;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return Err(EngineError::invalid_number(text)),
        }
    }
    if digits == 0 || dots > 1 {
        return Err(EngineError::invalid_number(text));
    }
    let value: f64 = text
        .parse()
        .map_err(|_| EngineError::invalid_number(text))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::invalid_number(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format_result(value: f64) -> String {
        NumberFormat::default().result(value)
    }

    fn format_operand(raw: &str) -> String {
        NumberFormat::default().operand(raw)
    }

    // ===== Result formatting =====

    #[test]
    fn test_format_result_integer() {
        assert_eq!(format_result(6.0), "6");
        assert_eq!(format_result(-42.0), "-42");
        assert_eq!(format_result(0.0), "0");
    }

    #[test]
    fn test_format_result_decimal_uses_comma() {
        assert_eq!(format_result(6.5), "6,50");
        assert_eq!(format_result(0.126), "0,13");
        assert_eq!(format_result(-1.25), "-1,25");
    }

    #[test]
    fn test_format_result_rounds_to_cents() {
        assert_eq!(format_result(6.999), "7,00");
        assert_eq!(format_result(1.0 / 3.0), "0,33");
    }

    #[test]
    fn test_format_result_negative_zero() {
        assert_eq!(format_result(-0.0), "0");
    }

    #[test]
    fn test_format_result_dot_locale() {
        let fmt = NumberFormat::new('.');
        assert_eq!(fmt.result(6.5), "6.50");
        assert_eq!(fmt.result(6.0), "6");
    }

    // ===== Operand formatting =====

    #[test]
    fn test_format_operand() {
        assert_eq!(format_operand(""), "0");
        assert_eq!(format_operand("12.5"), "12,5");
        assert_eq!(format_operand("0."), "0,");
        assert_eq!(format_operand("-7"), "-7");
    }

    #[test]
    fn test_rate_labels() {
        let fmt = NumberFormat::default();
        assert_eq!(fmt.rate(20.0), "20");
        assert_eq!(fmt.rate(5.5), "5,5");
        assert_eq!(NumberFormat::new('.').rate(2.1), "2.1");
    }

    #[test]
    fn test_normalize() {
        let fmt = NumberFormat::default();
        assert_eq!(fmt.normalize("1234,56"), "1234.56");
        assert_eq!(NumberFormat::new('.').normalize("1.5"), "1.5");
    }

    // ===== Operand storage =====

    #[test]
    fn test_to_operand_string_trims() {
        assert_eq!(to_operand_string(8.0), "8");
        assert_eq!(to_operand_string(100.0), "100");
        assert_eq!(to_operand_string(2.5), "2.5");
        assert_eq!(to_operand_string(1.0 / 3.0), "0.3333333333");
        assert_eq!(to_operand_string(0.0), "0");
        assert_eq!(to_operand_string(-0.0), "0");
        assert_eq!(to_operand_string(-1e-12), "0");
        assert_eq!(to_operand_string(-20.25), "-20.25");
    }

    // ===== Parsing =====

    #[test]
    fn test_parse_number_accepts_plain_decimals() {
        assert_eq!(parse_number("42"), Ok(42.0));
        assert_eq!(parse_number("-3.5"), Ok(-3.5));
        assert_eq!(parse_number("0."), Ok(0.0));
        assert_eq!(parse_number(".5"), Ok(0.5));
    }

    #[test]
    fn test_parse_number_rejects_everything_else() {
        for bad in ["", "-", ".", "abc", "1e5", "inf", "NaN", "1.2.3", "--1", "+1", "1 2"] {
            assert!(parse_number(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_parse_number_rejects_infinite() {
        let huge = format!("1{}", "0".repeat(400));
        assert!(matches!(
            parse_number(&huge),
            Err(EngineError::InvalidNumber(_))
        ));
    }
}
