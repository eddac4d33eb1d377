//! Output formatting

use crate::error::CliResult;
use calcpad::core::format::{NumberFormat, DEFAULT_DECIMAL_MARK};
use calcpad::core::DisplaySnapshot;
use console::Style;
use serde::{Deserialize, Serialize};

/// Output format for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON snapshot
    Json,
}

/// What a run leaves behind: the displays plus the clipboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Display state
    #[serde(flatten)]
    pub display: DisplaySnapshot,
    /// Clipboard content after the script
    pub clipboard: String,
}

/// Renders a [`RunReport`]
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    numbers: NumberFormat,
}

impl Renderer {
    /// Create a new renderer
    #[must_use]
    pub const fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self {
            format,
            use_color,
            quiet,
            numbers: NumberFormat::new(DEFAULT_DECIMAL_MARK),
        }
    }

    /// Formats the memory register with the engine's decimal mark
    #[must_use]
    pub const fn with_number_format(mut self, numbers: NumberFormat) -> Self {
        self.numbers = numbers;
        self
    }

    /// Renders the report, ending with a newline
    pub fn render(&self, report: &RunReport) -> CliResult<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
            OutputFormat::Text => Ok(self.render_text(report)),
        }
    }

    fn render_text(&self, report: &RunReport) -> String {
        let display = &report.display;
        let primary = Style::new().bold().force_styling(self.use_color);
        let dim = Style::new().dim().force_styling(self.use_color);

        let mut out = format!("{}\n", primary.apply_to(&display.primary));
        if self.quiet {
            return out;
        }
        if !display.secondary.is_empty() {
            out.push_str(&format!("{}\n", dim.apply_to(&display.secondary)));
        }
        if display.memory != 0.0 {
            out.push_str(&format!("M = {}\n", self.numbers.result(display.memory)));
        }
        if !display.history.is_empty() {
            out.push_str("history:\n");
            for line in display.history.iter().rev() {
                out.push_str(&format!("  {line}\n"));
            }
        }
        if !report.clipboard.is_empty() {
            out.push_str(&format!("clipboard: {}\n", report.clipboard));
        }
        out
    }

    /// Renders the button list, one row per panel line
    #[must_use]
    pub fn render_keys(labels: &[String]) -> String {
        let mut out = String::new();
        for row in labels.chunks(4) {
            out.push_str(&row.join("  "));
            out.push('\n');
        }
        out
    }
}
