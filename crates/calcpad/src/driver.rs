//! Headless presentation adapter
//!
//! [`Session`] wires the engine to its external collaborators: a
//! [`Clipboard`] and the transient "copied" indicator. [`CalculatorDriver`]
//! lets one behavioural specification run against any adapter:
//!
//! ```rust
//! use calcpad::driver::{run_full_specification, Session};
//!
//! let mut session = Session::default();
//! run_full_specification(&mut session);
//! ```

use crate::core::{Calculator, TaxSlot};
use crate::keypad::KeyAction;
use std::time::{Duration, Instant};
use tracing::debug;

/// Clipboard collaborator; the OS integration lives outside this crate
pub trait Clipboard {
    /// Replaces the clipboard text
    fn set_content(&mut self, text: String);

    /// Current clipboard text (empty when nothing usable is on it)
    fn content(&self) -> String;
}

/// In-process clipboard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    text: String,
}

impl MemoryClipboard {
    /// Creates a clipboard already holding `text`
    #[must_use]
    pub fn with_content(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Clipboard for MemoryClipboard {
    fn set_content(&mut self, text: String) {
        self.text = text;
    }

    fn content(&self) -> String {
        self.text.clone()
    }
}

/// The short-lived "Copied!" overlay on the secondary display.
///
/// Time is passed in explicitly, so nothing ever sleeps or blocks: the
/// overlay simply stops applying once its deadline is behind `now`. Copying
/// again while it is up pushes the deadline out.
#[derive(Debug, Clone)]
pub struct CopyFeedback {
    delay: Duration,
    until: Option<Instant>,
}

impl CopyFeedback {
    /// Overlay text
    pub const INDICATOR: &'static str = "Copied!";

    /// Creates an idle indicator lasting `delay` once triggered
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay, until: None }
    }

    /// Shows the indicator from `now`
    pub fn trigger(&mut self, now: Instant) {
        self.until = Some(now + self.delay);
    }

    /// Whether the indicator is visible at `now`
    #[must_use]
    pub fn is_active(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    /// The secondary text to paint at `now`
    #[must_use]
    pub fn overlay<'a>(&self, secondary: &'a str, now: Instant) -> &'a str {
        if self.is_active(now) {
            Self::INDICATOR
        } else {
            secondary
        }
    }
}

/// Adapter-level commands, a superset of engine keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Engine key
    Key(KeyAction),
    /// Copy the primary display to the clipboard
    Copy,
    /// Paste the clipboard into the entry
    Paste,
    /// Load history panel row (0 = newest)
    LoadHistory(usize),
    /// Empty the history panel
    ClearHistory,
}

/// Engine + clipboard + copy indicator
#[derive(Debug, Clone)]
pub struct Session<C: Clipboard = MemoryClipboard> {
    calculator: Calculator,
    clipboard: C,
    feedback: CopyFeedback,
}

impl Default for Session<MemoryClipboard> {
    fn default() -> Self {
        Self::new(Calculator::new(), MemoryClipboard::default())
    }
}

impl<C: Clipboard> Session<C> {
    /// Creates a session; the indicator delay comes from the engine config
    #[must_use]
    pub fn new(calculator: Calculator, clipboard: C) -> Self {
        let feedback = CopyFeedback::new(calculator.config().copy_feedback());
        Self {
            calculator,
            clipboard,
            feedback,
        }
    }

    /// Returns the engine
    #[must_use]
    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Returns the clipboard
    #[must_use]
    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Runs a command now
    pub fn execute(&mut self, command: Command) {
        self.execute_at(command, Instant::now());
    }

    /// Runs a command at a given instant
    pub fn execute_at(&mut self, command: Command, now: Instant) {
        match command {
            Command::Key(action) => self.calculator.press(action),
            Command::Copy => self.copy_at(now),
            Command::Paste => self.paste(),
            Command::LoadHistory(index) => self.calculator.load_history_entry(index),
            Command::ClearHistory => self.calculator.clear_history(),
        }
    }

    /// Copies the primary display and raises the indicator
    pub fn copy_at(&mut self, now: Instant) {
        let text = self.calculator.copy_value();
        debug!(%text, "copied to clipboard");
        self.clipboard.set_content(text);
        self.feedback.trigger(now);
    }

    /// Pastes the clipboard content; unusable text is ignored
    pub fn paste(&mut self) {
        let text = self.clipboard.content();
        if text.is_empty() {
            return;
        }
        self.calculator.paste_value(&text);
    }

    /// Main display text
    #[must_use]
    pub fn primary_display(&self) -> &str {
        self.calculator.primary_display()
    }

    /// Secondary display text at `now`, indicator included
    #[must_use]
    pub fn secondary_display_at(&self, now: Instant) -> &str {
        self.feedback
            .overlay(self.calculator.secondary_display(), now)
    }

    /// Secondary display text right now
    #[must_use]
    pub fn secondary_display(&self) -> &str {
        self.secondary_display_at(Instant::now())
    }
}

/// Abstract driver for calculator interactions
pub trait CalculatorDriver {
    /// Presses one key
    fn press(&mut self, action: KeyAction);

    /// Main display text
    fn primary(&self) -> String;

    /// Secondary display text
    fn secondary(&self) -> String;

    /// History lines, newest first
    fn history(&self) -> Vec<String>;

    /// Types characters through the keyboard mapping; unmapped ones are skipped
    fn type_keys(&mut self, keys: &str) {
        for action in keys.chars().filter_map(KeyAction::from_char) {
            self.press(action);
        }
    }

    /// Presses `C`
    fn clear(&mut self) {
        self.press(KeyAction::ClearAll);
    }
}

impl CalculatorDriver for Calculator {
    fn press(&mut self, action: KeyAction) {
        Self::press(self, action);
    }

    fn primary(&self) -> String {
        self.primary_display().to_string()
    }

    fn secondary(&self) -> String {
        self.secondary_display().to_string()
    }

    fn history(&self) -> Vec<String> {
        Self::history(self).iter_rev().map(ToString::to_string).collect()
    }
}

impl<C: Clipboard> CalculatorDriver for Session<C> {
    fn press(&mut self, action: KeyAction) {
        self.execute(Command::Key(action));
    }

    fn primary(&self) -> String {
        self.primary_display().to_string()
    }

    fn secondary(&self) -> String {
        self.secondary_display().to_string()
    }

    fn history(&self) -> Vec<String> {
        CalculatorDriver::history(&self.calculator)
    }
}

// ===== Unified Test Specifications =====
// These work with ANY CalculatorDriver implementation

/// Verifies the four operations and result formatting
pub fn verify_basic_arithmetic<D: CalculatorDriver>(driver: &mut D) {
    driver.type_keys("2+3=");
    assert_eq!(driver.primary(), "5");
    driver.clear();

    driver.type_keys("10-4=");
    assert_eq!(driver.primary(), "6");
    driver.clear();

    driver.type_keys("6x7=");
    assert_eq!(driver.primary(), "42");
    driver.clear();

    driver.type_keys("7:2=");
    assert_eq!(driver.primary(), "3,50");
    driver.clear();
}

/// Verifies chained, left-to-right evaluation
pub fn verify_chained_evaluation<D: CalculatorDriver>(driver: &mut D) {
    driver.type_keys("2+3+");
    assert_eq!(driver.primary(), "5");
    assert_eq!(driver.secondary(), "5 +");
    driver.type_keys("4=");
    assert_eq!(driver.primary(), "9");
    driver.clear();
}

/// Verifies the divide-by-zero reset
pub fn verify_division_by_zero<D: CalculatorDriver>(driver: &mut D) {
    driver.type_keys("8/0=");
    assert_eq!(driver.primary(), "Error: /0");
    assert_eq!(driver.secondary(), "");
    driver.type_keys("1+1=");
    assert_eq!(driver.primary(), "2");
    driver.clear();
}

/// Verifies the VAT keys with the default French rates
pub fn verify_tax_keys<D: CalculatorDriver>(driver: &mut D) {
    driver.type_keys("100");
    driver.press(KeyAction::Tax(TaxSlot::Standard));
    assert_eq!(driver.primary(), "20");
    driver.clear();

    driver.type_keys("100");
    driver.press(KeyAction::ExclusiveToInclusive);
    assert_eq!(driver.primary(), "120");
    driver.press(KeyAction::InclusiveToExclusive);
    assert_eq!(driver.primary(), "100");
    driver.clear();
}

/// Verifies history ordering (newest first through the driver)
pub fn verify_history<D: CalculatorDriver>(driver: &mut D) {
    driver.clear();
    driver.type_keys("1+1=");
    driver.type_keys("2+2=");
    driver.type_keys("3+3=");

    let history = driver.history();
    assert!(history.len() >= 3);
    assert_eq!(history[0], "3 + 3 = 6");
    assert_eq!(history[1], "2 + 2 = 4");
    driver.clear();
}

/// Complete verification suite - runs all specifications
pub fn run_full_specification<D: CalculatorDriver>(driver: &mut D) {
    verify_basic_arithmetic(driver);
    verify_chained_evaluation(driver);
    verify_division_by_zero(driver);
    verify_tax_keys(driver);
    verify_history(driver);
}
