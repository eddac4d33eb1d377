//! calcpad CLI library
//!
//! Runs key scripts against the calculator engine and prints the displays.
//!
//! ```bash
//! calcpad 12+30=                 # 42
//! calcpad 100 HT>TTC --json      # JSON snapshot
//! echo "7 / 2 = [copy]" | calcpad
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)]
#![allow(clippy::missing_errors_doc)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

mod commands;
mod config;
mod error;
pub mod logging;
mod output;
mod runner;
pub mod script;

pub use commands::{Cli, ColorArg};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, Renderer, RunReport};
pub use runner::ScriptRunner;
