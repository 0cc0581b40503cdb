//! Command implementations and argument parsing for the ctw-meta CLI.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use ctw_core::{
    CapacityPolicy, DEFAULT_RECORD_COUNT, ExecutionStrategy, GenerationError, GeneratorBuilder,
    MetaVariableRecord, Overrides, write_table,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Table written when `--output` is not given.
pub const DEFAULT_OUTPUT: &str = "meta_data.csv";

/// Attempts per record under `--capacity-policy resample`.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "ctw-meta",
    about = "Generate meta variables of synthetic cable-tree-wiring instances."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate a table of meta-variable records.
    Generate(GenerateCommand),
}

/// Options accepted by the `generate` command.
#[derive(Debug, Args, Clone)]
pub struct GenerateCommand {
    /// Fix the insertion jobs `k = 2B + O` of every record.
    #[arg(long = "insertion-jobs", allow_negative_numbers = true)]
    pub insertion_jobs: Option<i64>,

    /// Fix the two-sided cables `B` of every record.
    #[arg(long = "two-sided-cables", allow_negative_numbers = true)]
    pub two_sided_cables: Option<i64>,

    /// Fix the one-sided cables `O` of every record.
    #[arg(long = "one-sided-cables", allow_negative_numbers = true)]
    pub one_sided_cables: Option<i64>,

    /// Fix the side cables of every record.
    #[arg(long = "side-cables", allow_negative_numbers = true)]
    pub side_cables: Option<i64>,

    /// Number of records to generate.
    #[arg(long, default_value_t = DEFAULT_RECORD_COUNT)]
    pub count: usize,

    /// Path of the semicolon-delimited output table.
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Base seed; a fresh one is drawn and reported when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// What to do with records that overflow a capacity limit.
    #[arg(long = "capacity-policy", value_enum, default_value_t = CapacityPolicyArg::Abort)]
    pub capacity_policy: CapacityPolicyArg,

    /// Attempts per record when resampling.
    #[arg(long = "max-attempts", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Generate records on all cores.
    #[arg(long)]
    pub parallel: bool,
}

impl GenerateCommand {
    /// Returns the fixed overrides given on the command line.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            insertion_jobs: self.insertion_jobs,
            two_sided_cables: self.two_sided_cables,
            one_sided_cables: self.one_sided_cables,
            side_cables: self.side_cables,
        }
    }

    /// Returns the capacity policy selected on the command line.
    #[must_use]
    pub fn capacity_policy(&self) -> CapacityPolicy {
        match self.capacity_policy {
            CapacityPolicyArg::Abort => CapacityPolicy::Abort,
            CapacityPolicyArg::Resample => CapacityPolicy::Resample {
                max_attempts: self.max_attempts,
            },
        }
    }

    /// Returns the execution strategy selected on the command line.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        if self.parallel {
            ExecutionStrategy::Parallel
        } else {
            ExecutionStrategy::Sequential
        }
    }
}

/// Capacity policies selectable with `--capacity-policy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CapacityPolicyArg {
    /// Fail the run at the first rejected record.
    Abort,
    /// Redraw rejected records up to `--max-attempts` times.
    Resample,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Writing the output table failed.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Validation or generation failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionSummary {
    /// Records written to the table.
    pub records: usize,
    /// Base seed the records were derived from.
    pub seed: u64,
    /// Records that needed more than one attempt.
    pub resampled: usize,
    /// Path of the written table.
    pub output: PathBuf,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when validation, generation or writing fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use clap::Parser;
/// # use ctw_cli::cli::{Cli, run_cli};
/// # use tempfile::TempDir;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let dir = TempDir::new()?;
/// let output = dir.path().join("meta.csv");
/// let cli = Cli::try_parse_from([
///     "ctw-meta",
///     "generate",
///     "--count",
///     "3",
///     "--seed",
///     "9",
///     "--output",
///     output.to_str().ok_or("temp path is UTF-8")?,
/// ])?;
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.records, 3);
/// assert_eq!(std::fs::read_to_string(&output)?.lines().count(), 4);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Generate(generate) => {
            Span::current().record("command", field::display("generate"));
            run_generate(generate)
        }
    }
}

#[instrument(
    name = "cli.generate",
    err,
    skip(command),
    fields(
        count = command.count,
        output = %command.output.display(),
        policy = ?command.capacity_policy,
        parallel = command.parallel,
    ),
)]
pub(super) fn run_generate(command: GenerateCommand) -> Result<ExecutionSummary, CliError> {
    let mut builder = GeneratorBuilder::new()
        .with_overrides(command.overrides())
        .with_record_count(command.count)
        .with_capacity_policy(command.capacity_policy())
        .with_execution_strategy(command.execution_strategy());
    if let Some(seed) = command.seed {
        builder = builder.with_seed(seed);
    }
    let generator = builder.build()?;
    let batch = generator.generate()?;
    write_output(&command.output, batch.records())?;

    info!(
        records = batch.records().len(),
        seed = batch.seed(),
        output = %command.output.display(),
        "command completed"
    );
    Ok(ExecutionSummary {
        records: batch.records().len(),
        seed: batch.seed(),
        resampled: batch.resampled(),
        output: command.output,
    })
}

#[instrument(
    name = "cli.write_table",
    err,
    skip(records),
    fields(path = field::Empty, rows = records.len()),
)]
pub(super) fn write_output(path: &Path, records: &[MetaVariableRecord]) -> Result<(), CliError> {
    Span::current().record("path", field::display(path.display()));
    let io_error = |source| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    write_table(records, BufWriter::new(file)).map_err(io_error)
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use std::io::Cursor;
/// # use ctw_cli::cli::{ExecutionSummary, render_summary};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     records: 600,
///     seed: 42,
///     resampled: 0,
///     output: "meta_data.csv".into(),
/// };
/// let mut buffer = Cursor::new(Vec::new());
/// render_summary(&summary, &mut buffer)?;
/// let text = String::from_utf8(buffer.into_inner())?;
/// assert_eq!(text.lines().next(), Some("records: 600"));
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "records: {}", summary.records)?;
    writeln!(writer, "seed: {}", summary.seed)?;
    writeln!(writer, "resampled: {}", summary.resampled)?;
    writeln!(writer, "output: {}", summary.output.display())?;
    Ok(())
}
