//! Engine configuration
//!
//! Tax rates and display conventions are injected at construction so several
//! tax regimes can live side by side (and be tested) without global state.

use crate::core::format::{NumberFormat, DEFAULT_DECIMAL_MARK};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON configuration
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML configuration
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Well-formed but unusable values
    #[error("invalid configuration: {message}")]
    Invalid {
        /// What is wrong
        message: String,
    },

    /// File extension is neither JSON nor YAML
    #[error("unsupported configuration format: {}", path.display())]
    UnsupportedFormat {
        /// Offending path
        path: PathBuf,
    },
}

impl ConfigError {
    /// Create an invalid configuration error
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// One of the four tax-rate keys on the pad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxSlot {
    /// Standard rate
    Standard,
    /// Reduced rate
    Reduced,
    /// Second reduced rate
    ReducedAlt,
    /// Super-reduced rate
    SuperReduced,
}

impl TaxSlot {
    /// All slots in keypad order
    pub const ALL: [Self; 4] = [
        Self::Standard,
        Self::Reduced,
        Self::ReducedAlt,
        Self::SuperReduced,
    ];
}

/// VAT rates in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaxRates {
    /// Standard rate, also used by the HT/TTC conversions
    pub standard: f64,
    /// Reduced rate
    pub reduced: f64,
    /// Second reduced rate
    pub reduced_alt: f64,
    /// Super-reduced rate
    pub super_reduced: f64,
}

impl Default for TaxRates {
    fn default() -> Self {
        Self {
            standard: 20.0,
            reduced: 10.0,
            reduced_alt: 5.5,
            super_reduced: 2.1,
        }
    }
}

impl TaxRates {
    /// Returns the rate bound to a slot
    #[must_use]
    pub const fn rate(&self, slot: TaxSlot) -> f64 {
        match slot {
            TaxSlot::Standard => self.standard,
            TaxSlot::Reduced => self.reduced,
            TaxSlot::ReducedAlt => self.reduced_alt,
            TaxSlot::SuperReduced => self.super_reduced,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// VAT rates
    pub tax: TaxRates,
    /// Maximum characters of a typed operand
    pub max_entry_len: usize,
    /// Decimal mark used on screen
    pub decimal_mark: char,
    /// How long the "copied" indicator stays up, in milliseconds
    pub copy_feedback_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tax: TaxRates::default(),
            max_entry_len: Self::DEFAULT_MAX_ENTRY_LEN,
            decimal_mark: DEFAULT_DECIMAL_MARK,
            copy_feedback_ms: Self::DEFAULT_COPY_FEEDBACK_MS,
        }
    }
}

impl EngineConfig {
    /// Default operand length limit
    pub const DEFAULT_MAX_ENTRY_LEN: usize = 15;

    /// Default lifetime of the "copied" indicator
    pub const DEFAULT_COPY_FEEDBACK_MS: u64 = 500;

    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set all tax rates
    #[must_use]
    pub const fn with_tax_rates(mut self, tax: TaxRates) -> Self {
        self.tax = tax;
        self
    }

    /// Set the standard rate
    #[must_use]
    pub const fn with_standard_rate(mut self, rate: f64) -> Self {
        self.tax.standard = rate;
        self
    }

    /// Set the operand length limit
    #[must_use]
    pub const fn with_max_entry_len(mut self, len: usize) -> Self {
        self.max_entry_len = len;
        self
    }

    /// Set the on-screen decimal mark
    #[must_use]
    pub const fn with_decimal_mark(mut self, mark: char) -> Self {
        self.decimal_mark = mark;
        self
    }

    /// Set the "copied" indicator lifetime
    #[must_use]
    pub const fn with_copy_feedback_ms(mut self, ms: u64) -> Self {
        self.copy_feedback_ms = ms;
        self
    }

    /// Formatter for this configuration's locale
    #[must_use]
    pub const fn number_format(&self) -> NumberFormat {
        NumberFormat::new(self.decimal_mark)
    }

    /// "Copied" indicator lifetime
    #[must_use]
    pub const fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }

    /// Checks values that deserialize fine but would break the engine
    pub fn validate(&self) -> Result<(), ConfigError> {
        for slot in TaxSlot::ALL {
            let rate = self.tax.rate(slot);
            if !rate.is_finite() || rate < 0.0 {
                return Err(ConfigError::invalid(format!(
                    "tax rate {slot:?} must be a non-negative number, got {rate}"
                )));
            }
        }
        if self.max_entry_len == 0 {
            return Err(ConfigError::invalid("max_entry_len must be at least 1"));
        }
        let mark = self.decimal_mark;
        if mark.is_ascii_digit() || mark == '-' || mark == '=' || mark.is_whitespace() {
            return Err(ConfigError::invalid(format!(
                "decimal_mark {mark:?} would be ambiguous on screen"
            )));
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a YAML configuration
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a configuration file, picking the format from its extension
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&text),
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}
