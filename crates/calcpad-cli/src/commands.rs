//! CLI command definitions using clap

use crate::config::{CliConfig, ColorChoice, Verbosity};
use crate::output::OutputFormat;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// calcpad: accounting calculator driven by key scripts
///
/// Keys are whitespace-separated tokens. A token that is a button label
/// (`C`, `CE`, `<-`, `00`, `+/-`, `HT>TTC`, `MS`, `20%`...), a bracketed label
/// (`[MC]`) or a named key (`<Enter>`) presses that one key. Anything else is
/// typed character by character, so `12+30=` works as a single token.
/// `[copy]`, `[paste]`, `[history:N]` and `[clear-history]` drive the
/// clipboard and history panel. Without KEYS the script is read from stdin.
#[derive(Parser, Debug)]
#[command(name = "calcpad")]
#[command(author, version, about, long_about)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (print the primary display only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorArg,

    /// Engine configuration file (.json, .yaml or .yml)
    #[arg(short, long, value_name = "FILE", env = "CALCPAD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Initial clipboard content for `[paste]`
    #[arg(long, value_name = "TEXT")]
    pub clipboard: Option<String>,

    /// Print a JSON snapshot instead of text
    #[arg(long)]
    pub json: bool,

    /// List every button label and exit
    #[arg(long)]
    pub list_keys: bool,

    /// Key script tokens
    #[arg(value_name = "KEYS", allow_hyphen_values = true)]
    pub keys: Vec<String>,
}

impl Cli {
    /// Builds the runtime configuration from the parsed flags
    #[must_use]
    pub fn to_config(&self) -> CliConfig {
        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        };
        let mut config = CliConfig::new()
            .with_verbosity(Verbosity::from_flags(self.verbose, self.quiet))
            .with_color(self.color.into())
            .with_format(format)
            .with_clipboard(self.clipboard.clone().unwrap_or_default());
        if let Some(path) = &self.config {
            config = config.with_engine_config(path);
        }
        config
    }
}

/// Color argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
