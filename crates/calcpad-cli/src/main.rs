//! calcpad: accounting calculator on the command line
//!
//! ## Usage
//!
//! ```bash
//! calcpad 200+10% =              # 220
//! calcpad 100 20%                # VAT at the standard rate
//! calcpad --config rates.yaml 50 HT>TTC
//! calcpad --list-keys
//! ```

use calcpad_cli::{logging, Cli, CliResult, ScriptRunner};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = cli.to_config();
    logging::init(config.verbosity);

    let runner = ScriptRunner::new(config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    runner.run(&cli, std::io::stdin().lock(), &mut out)
}
