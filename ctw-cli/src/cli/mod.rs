//! Command-line interface orchestration for the CTW meta-variable generator.
//!
//! The CLI offers a single `generate` command that validates the overrides,
//! samples the requested records and writes them as a semicolon-delimited
//! table.

mod commands;

pub use commands::{
    CapacityPolicyArg, Cli, CliError, Command, DEFAULT_MAX_ATTEMPTS, DEFAULT_OUTPUT,
    ExecutionSummary, GenerateCommand, render_summary, run_cli,
};

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;
