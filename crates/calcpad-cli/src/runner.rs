//! Script execution

use crate::commands::Cli;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::{Renderer, RunReport};
use crate::script::parse_script;
use calcpad::core::{Calculator, EngineConfig};
use calcpad::driver::{Clipboard, MemoryClipboard, Session};
use calcpad::keypad::KeyAction;
use std::io::{Read, Write};
use tracing::{debug, info};

/// Runs the CLI against the given streams
#[derive(Debug)]
pub struct ScriptRunner {
    config: CliConfig,
    engine: EngineConfig,
}

impl ScriptRunner {
    /// Loads the engine configuration named by `config`, if any
    pub fn new(config: CliConfig) -> CliResult<Self> {
        let engine = match &config.engine_config {
            Some(path) => {
                let engine = EngineConfig::load(path)?;
                info!(path = %path.display(), "engine configuration loaded");
                engine
            }
            None => EngineConfig::default(),
        };
        Ok(Self { config, engine })
    }

    /// Executes `cli`; the script comes from its KEYS or, when there are
    /// none, from `input`
    pub fn run(&self, cli: &Cli, mut input: impl Read, output: &mut impl Write) -> CliResult<()> {
        if cli.list_keys {
            let labels: Vec<String> = KeyAction::buttons()
                .iter()
                .map(|action| action.label(&self.engine))
                .collect();
            output.write_all(Renderer::render_keys(&labels).as_bytes())?;
            return Ok(());
        }

        let script = if cli.keys.is_empty() {
            let mut script = String::new();
            input.read_to_string(&mut script)?;
            script
        } else {
            cli.keys.join(" ")
        };

        let report = self.execute(&script)?;
        let renderer = Renderer::new(
            self.config.format,
            self.config.color.should_color(),
            self.config.verbosity.is_quiet(),
        )
        .with_number_format(self.engine.number_format());
        output.write_all(renderer.render(&report)?.as_bytes())?;
        Ok(())
    }

    /// Parses and runs a script on a fresh session
    pub fn execute(&self, script: &str) -> CliResult<RunReport> {
        let commands = parse_script(script, &self.engine)?;
        debug!(count = commands.len(), "running script");

        let clipboard = MemoryClipboard::with_content(self.config.clipboard.clone());
        let mut session = Session::new(Calculator::with_config(self.engine.clone()), clipboard);
        for command in commands {
            session.execute(command);
        }

        Ok(RunReport {
            display: session.calculator().snapshot(),
            clipboard: session.clipboard().content(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use clap::Parser;

    fn runner() -> ScriptRunner {
        ScriptRunner::new(CliConfig::new()).unwrap()
    }

    #[test]
    fn test_execute_chain() {
        let report = runner().execute("2+3+4=").unwrap();
        assert_eq!(report.display.primary, "9");
        assert_eq!(report.display.history, vec!["2 + 3 = 5", "5 + 4 = 9"]);
    }

    #[test]
    fn test_execute_copy_and_paste() {
        let report = runner().execute("7/2= [copy] C [paste]").unwrap();
        assert_eq!(report.clipboard, "3.50");
        assert_eq!(report.display.primary, "3,50");
    }

    #[test]
    fn test_initial_clipboard() {
        let config = CliConfig::new().with_clipboard(" 1 234,5 ");
        let report = ScriptRunner::new(config)
            .unwrap()
            .execute("[paste] +1=")
            .unwrap();
        assert_eq!(report.display.primary, "1235,50");
    }

    #[test]
    fn test_history_row_tokens() {
        let report = runner().execute("1+1= 2+2= [history:1]").unwrap();
        assert_eq!(report.display.primary, "2");
        assert_eq!(report.display.secondary, "From history:");
    }

    #[test]
    fn test_run_reads_stdin_without_keys() {
        let cli = Cli::try_parse_from(["calcpad", "--color", "never", "-q"]).unwrap();
        let runner = ScriptRunner::new(cli.to_config()).unwrap();
        let mut out = Vec::new();
        runner.run(&cli, "6 x 7 =\n".as_bytes(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "42\n");
    }

    #[test]
    fn test_run_json() {
        let cli = Cli::try_parse_from(["calcpad", "--json", "100", "HT>TTC"]).unwrap();
        let runner = ScriptRunner::new(cli.to_config()).unwrap();
        assert_eq!(runner.config.format, OutputFormat::Json);
        let mut out = Vec::new();
        runner.run(&cli, std::io::empty(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["primary"], "120");
        assert_eq!(value["secondary"], "100 HT > TTC (20%)");
    }

    #[test]
    fn test_list_keys_uses_configured_rates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rates.json");
        std::fs::write(&path, r#"{"tax":{"standard":8.1}}"#).unwrap();

        let path_arg = path.to_string_lossy().to_string();
        let cli = Cli::try_parse_from(["calcpad", "--config", path_arg.as_str(), "--list-keys"]).unwrap();
        let runner = ScriptRunner::new(cli.to_config()).unwrap();
        let mut out = Vec::new();
        runner.run(&cli, std::io::empty(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("MC  MR  M+  M-\n"));
        assert!(text.contains("8.1%"));
        assert!(!text.contains("20%"));
    }

    #[test]
    fn test_missing_config_file() {
        let config = CliConfig::new().with_engine_config("/nonexistent/calcpad.json");
        let err = ScriptRunner::new(config).unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
