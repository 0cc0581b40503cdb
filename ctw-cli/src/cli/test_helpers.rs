//! Small helpers shared across CLI tests.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use super::{
    CapacityPolicyArg, Cli, CliError, Command, DEFAULT_MAX_ATTEMPTS, GenerateCommand, run_cli,
};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

/// Returns a seeded `generate` command writing `count` records to `output`.
pub(super) fn generate_command(output: &Path, count: usize, seed: u64) -> GenerateCommand {
    GenerateCommand {
        insertion_jobs: None,
        two_sided_cables: None,
        one_sided_cables: None,
        side_cables: None,
        count,
        output: output.to_path_buf(),
        seed: Some(seed),
        capacity_policy: CapacityPolicyArg::Resample,
        max_attempts: DEFAULT_MAX_ATTEMPTS,
        parallel: false,
    }
}

pub(super) fn generate_cli(command: GenerateCommand) -> Cli {
    Cli {
        command: Command::Generate(command),
    }
}

pub(super) fn output_path(dir: &TempDir) -> PathBuf {
    dir.path().join("meta_data.csv")
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
