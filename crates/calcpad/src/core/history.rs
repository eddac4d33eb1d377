//! Calculation history
//!
//! Append-only log of `"expression = result"` lines. Entries are never
//! reordered or deduplicated; the only removal is a full clear.

use serde::{Deserialize, Serialize};

/// A single line of the history panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Left-hand side as shown, e.g. `"5 + 3"` or `"TVA 20.0% of 100"`
    pub expression: String,
    /// Formatted result as shown on the primary display
    pub result: String,
}

impl HistoryEntry {
    /// Creates a new history entry
    #[must_use]
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
        }
    }

    /// Returns the panel line
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} = {}", self.expression, self.result)
    }

    /// Extracts the result text from a panel line: whatever follows the last
    /// `=`, trimmed. `None` when the line has no `=`.
    #[must_use]
    pub fn result_text(line: &str) -> Option<&str> {
        line.rsplit_once('=').map(|(_, result)| result.trim())
    }
}

impl std::fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.expression, self.result)
    }
}

/// Calculator history, oldest entry first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Creates an empty history
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a computed line
    pub fn record(&mut self, expression: impl Into<String>, result: impl Into<String>) {
        self.entries.push(HistoryEntry::new(expression, result));
    }

    /// Returns the number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the history is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clears all history entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns an iterator over the entries (newest first)
    pub fn iter_rev(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    /// Returns the entry at the given panel row (0 = newest)
    #[must_use]
    pub fn newest(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.iter().rev().nth(index)
    }

    /// Panel lines, oldest first
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(HistoryEntry::display).collect()
    }
}
