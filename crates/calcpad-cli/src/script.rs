//! Key script parsing
//!
//! Turns whitespace-separated tokens into session commands.

use crate::error::{CliError, CliResult};
use calcpad::core::EngineConfig;
use calcpad::driver::Command;
use calcpad::keypad::KeyAction;
use tracing::trace;

/// Parses a whole script
pub fn parse_script(script: &str, config: &EngineConfig) -> CliResult<Vec<Command>> {
    let mut commands = Vec::new();
    for token in script.split_whitespace() {
        let parsed = parse_token(token, config)?;
        trace!(token, count = parsed.len(), "token parsed");
        commands.extend(parsed);
    }
    Ok(commands)
}

/// Parses one token into one or more commands
pub fn parse_token(token: &str, config: &EngineConfig) -> CliResult<Vec<Command>> {
    if let Some(inner) = token.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        return parse_bracketed(inner, config).map(|command| vec![command]);
    }
    if let Some(name) = token.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        if let Some(action) = KeyAction::from_key_name(name) {
            return Ok(vec![Command::Key(action)]);
        }
    }
    if let Some(action) = KeyAction::from_label(token, config) {
        return Ok(vec![Command::Key(action)]);
    }
    token
        .chars()
        .map(|c| {
            KeyAction::from_char(c).map(Command::Key).ok_or_else(|| {
                CliError::invalid_argument(format!("unknown key {c:?} in token {token:?}"))
            })
        })
        .collect()
}

fn parse_bracketed(inner: &str, config: &EngineConfig) -> CliResult<Command> {
    match inner {
        "copy" => return Ok(Command::Copy),
        "paste" => return Ok(Command::Paste),
        "clear-history" => return Ok(Command::ClearHistory),
        _ => {}
    }
    if let Some(index) = inner.strip_prefix("history:") {
        return index.parse().map(Command::LoadHistory).map_err(|_| {
            CliError::invalid_argument(format!("history row must be a number, got {index:?}"))
        });
    }
    KeyAction::from_label(inner, config)
        .map(Command::Key)
        .ok_or_else(|| CliError::invalid_argument(format!("unknown button [{inner}]")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use calcpad::core::{Operator, TaxSlot};
    use calcpad::keypad::MemoryKey;

    fn parse(script: &str) -> Vec<Command> {
        parse_script(script, &EngineConfig::default()).unwrap()
    }

    fn key(action: KeyAction) -> Command {
        Command::Key(action)
    }

    #[test]
    fn test_characters_split_per_key() {
        assert_eq!(
            parse("12+3="),
            vec![
                key(KeyAction::Digit(1)),
                key(KeyAction::Digit(2)),
                key(KeyAction::Operator(Operator::Add)),
                key(KeyAction::Digit(3)),
                key(KeyAction::Equals),
            ]
        );
    }

    #[test]
    fn test_labels_are_single_keys() {
        assert_eq!(
            parse("00 C CE <- +/- HT>TTC TTC>HT MS 20% 5.5%"),
            vec![
                key(KeyAction::DoubleZero),
                key(KeyAction::ClearAll),
                key(KeyAction::ClearEntry),
                key(KeyAction::Backspace),
                key(KeyAction::ToggleSign),
                key(KeyAction::ExclusiveToInclusive),
                key(KeyAction::InclusiveToExclusive),
                key(KeyAction::Memory(MemoryKey::Store)),
                key(KeyAction::Tax(TaxSlot::Standard)),
                key(KeyAction::Tax(TaxSlot::ReducedAlt)),
            ]
        );
    }

    #[test]
    fn test_bracketed_and_named_keys() {
        assert_eq!(
            parse("[MR] [M+] <Enter> <Escape> <Backspace>"),
            vec![
                key(KeyAction::Memory(MemoryKey::Recall)),
                key(KeyAction::Memory(MemoryKey::Add)),
                key(KeyAction::Equals),
                key(KeyAction::ClearAll),
                key(KeyAction::Backspace),
            ]
        );
    }

    #[test]
    fn test_session_tokens() {
        assert_eq!(
            parse("[copy] [paste] [history:2] [clear-history]"),
            vec![
                Command::Copy,
                Command::Paste,
                Command::LoadHistory(2),
                Command::ClearHistory,
            ]
        );
    }

    #[test]
    fn test_percent_inside_expression() {
        assert_eq!(
            parse("200+10%"),
            vec![
                key(KeyAction::Digit(2)),
                key(KeyAction::Digit(0)),
                key(KeyAction::Digit(0)),
                key(KeyAction::Operator(Operator::Add)),
                key(KeyAction::Digit(1)),
                key(KeyAction::Digit(0)),
                key(KeyAction::Percent),
            ]
        );
    }

    #[test]
    fn test_unknown_tokens_rejected() {
        let config = EngineConfig::default();
        let err = parse_script("2 + y", &config).unwrap_err();
        assert!(err.to_string().contains("'y'"));
        assert!(parse_script("[sqrt]", &config).is_err());
        assert!(parse_script("[history:last]", &config).is_err());
        assert!(parse_script("<Tab>", &config).is_err());
    }

    #[test]
    fn test_empty_script() {
        assert!(parse("   \n\t").is_empty());
    }
}
