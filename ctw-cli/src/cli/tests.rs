//! Unit tests for argument parsing and the `generate` command.

use super::commands::{run_generate, write_output};
use super::test_helpers::{
    generate_cli, generate_command, output_path, run_cli_expecting_error, temp_dir,
};
use super::{
    CapacityPolicyArg, Cli, CliError, Command, DEFAULT_MAX_ATTEMPTS, DEFAULT_OUTPUT,
    ExecutionSummary, render_summary, run_cli,
};

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use ctw_core::{
    DEFAULT_RECORD_COUNT, GenerationError, GenerationErrorCode, ValidationErrorCode, limits,
};
use ctw_test_support::{table::parse_table, tracing::RecordingLayer};
use rstest::rstest;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(["ctw-meta", "generate"].into_iter().chain(args.iter().copied()))
}

fn validation_report(err: CliError) -> ctw_core::ValidationReport {
    match err {
        CliError::Generation(GenerationError::Validation { source }) => source,
        other => panic!("expected a validation error, got {other:?}"),
    }
}

#[test]
fn generate_defaults_match_documented_values() -> TestResult {
    let cli = parse(&[])?;
    let Command::Generate(command) = cli.command;
    assert_eq!(command.count, DEFAULT_RECORD_COUNT);
    assert_eq!(command.output, PathBuf::from(DEFAULT_OUTPUT));
    assert_eq!(command.capacity_policy, CapacityPolicyArg::Abort);
    assert_eq!(command.max_attempts, DEFAULT_MAX_ATTEMPTS);
    assert_eq!(command.seed, None);
    assert!(!command.parallel);
    assert_eq!(command.overrides(), ctw_core::Overrides::default());
    Ok(())
}

#[test]
fn negative_overrides_reach_validation() -> TestResult {
    let cli = parse(&["--two-sided-cables", "-3", "--side-cables", "-1"])?;
    let Command::Generate(command) = &cli.command;
    assert_eq!(command.two_sided_cables, Some(-3));
    assert_eq!(command.side_cables, Some(-1));

    let report = validation_report(run_cli_expecting_error(cli, "negative counts must fail"));
    assert!(report.contains(ValidationErrorCode::TwoSidedCablesOutOfRange));
    assert!(report.contains(ValidationErrorCode::SideCablesOutOfRange));
    Ok(())
}

#[rstest]
#[case::fraction(&["--insertion-jobs", "2.5"])]
#[case::word(&["--one-sided-cables", "many"])]
#[case::unknown_policy(&["--capacity-policy", "retry"])]
fn malformed_arguments_are_rejected_by_the_parser(#[case] args: &[&str]) {
    assert!(parse(args).is_err(), "{args:?} must not parse");
}

#[test]
fn resample_policy_carries_max_attempts() -> TestResult {
    let cli = parse(&["--capacity-policy", "resample", "--max-attempts", "7", "--parallel"])?;
    let Command::Generate(command) = cli.command;
    assert_eq!(
        command.capacity_policy(),
        ctw_core::CapacityPolicy::Resample { max_attempts: 7 }
    );
    assert_eq!(
        command.execution_strategy(),
        ctw_core::ExecutionStrategy::Parallel
    );
    Ok(())
}

#[test]
fn default_run_writes_six_hundred_rows() -> TestResult {
    let dir = temp_dir();
    let output = output_path(&dir);
    let summary = run_cli(generate_cli(generate_command(
        &output,
        DEFAULT_RECORD_COUNT,
        11,
    )))?;
    assert_eq!(summary.records, 600);
    assert_eq!(summary.seed, 11);

    let text = fs::read_to_string(&output)?;
    assert_eq!(text.lines().count(), 601);
    let table = parse_table(&text)?;
    assert_eq!(table.rows.len(), 600);
    Ok(())
}

#[test]
fn fixed_insertion_jobs_hold_in_every_row() -> TestResult {
    let dir = temp_dir();
    let output = output_path(&dir);
    let mut command = generate_command(&output, 200, 3);
    command.insertion_jobs = Some(50);
    run_cli(generate_cli(command))?;

    let table = parse_table(&fs::read_to_string(&output)?)?;
    for row in &table.rows {
        assert_eq!(2 * row[0] + row[1], 50, "row {row:?}");
        assert!(row[1] <= limits::MAX_ONE_SIDED_CABLES, "row {row:?}");
    }
    Ok(())
}

#[rstest]
#[case::mismatch(Some(10), Some(10), Some(5), None, ValidationErrorCode::InsertionJobsMismatch)]
#[case::side_over_two_sided(
    None,
    Some(3),
    None,
    Some(5),
    ValidationErrorCode::SideCablesExceedTwoSidedCables
)]
fn invalid_overrides_write_no_file(
    #[case] insertion_jobs: Option<i64>,
    #[case] two_sided_cables: Option<i64>,
    #[case] one_sided_cables: Option<i64>,
    #[case] side_cables: Option<i64>,
    #[case] expected: ValidationErrorCode,
) {
    let dir = temp_dir();
    let output = output_path(&dir);
    let mut command = generate_command(&output, 10, 1);
    command.insertion_jobs = insertion_jobs;
    command.two_sided_cables = two_sided_cables;
    command.one_sided_cables = one_sided_cables;
    command.side_cables = side_cables;

    let report = validation_report(run_cli_expecting_error(
        generate_cli(command),
        "inconsistent overrides must fail",
    ));
    assert!(report.contains(expected), "{report}");
    assert!(!output.exists(), "no table may be written");
}

#[rstest]
#[case::zero_attempts(0, 10, GenerationErrorCode::InvalidMaxAttempts)]
#[case::zero_records(5, 0, GenerationErrorCode::InvalidRecordCount)]
fn degenerate_run_settings_are_rejected(
    #[case] max_attempts: u32,
    #[case] count: usize,
    #[case] expected: GenerationErrorCode,
) {
    let dir = temp_dir();
    let output = output_path(&dir);
    let mut command = generate_command(&output, count, 1);
    command.max_attempts = max_attempts;

    match run_cli_expecting_error(generate_cli(command), "degenerate settings must fail") {
        CliError::Generation(err) => assert_eq!(err.code(), expected),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!output.exists());
}

#[test]
fn seeded_runs_are_reproducible_across_strategies() -> TestResult {
    let dir = temp_dir();
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");
    let parallel = dir.path().join("parallel.csv");

    run_generate(generate_command(&first, 300, 2_024))?;
    run_generate(generate_command(&second, 300, 2_024))?;
    let mut command = generate_command(&parallel, 300, 2_024);
    command.parallel = true;
    run_generate(command)?;

    let expected = fs::read_to_string(&first)?;
    assert_eq!(fs::read_to_string(&second)?, expected);
    assert_eq!(fs::read_to_string(&parallel)?, expected);
    Ok(())
}

#[test]
fn unseeded_run_reports_the_drawn_seed() -> TestResult {
    let dir = temp_dir();
    let output = output_path(&dir);
    let mut command = generate_command(&output, 40, 0);
    command.seed = None;
    let summary = run_generate(command)?;

    let replay = dir.path().join("replay.csv");
    run_generate(generate_command(&replay, 40, summary.seed))?;
    assert_eq!(fs::read_to_string(&replay)?, fs::read_to_string(&output)?);
    Ok(())
}

#[test]
fn render_summary_lists_every_field() -> TestResult {
    let summary = ExecutionSummary {
        records: 12,
        seed: 99,
        resampled: 2,
        output: PathBuf::from("out/meta.csv"),
    };
    let mut buffer = Vec::new();
    render_summary(&summary, &mut buffer)?;
    assert_eq!(
        String::from_utf8(buffer)?,
        "records: 12\nseed: 99\nresampled: 2\noutput: out/meta.csv\n"
    );
    Ok(())
}

#[test]
fn unwritable_output_reports_the_path() {
    let dir = temp_dir();
    let output = dir.path().join("missing").join("meta.csv");
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let result = tracing::subscriber::with_default(subscriber, || write_output(&output, &[]));
    match result {
        Err(CliError::Io { path, .. }) => assert_eq!(path, output),
        other => panic!("expected an I/O error, got {other:?}"),
    }

    let span = layer
        .span("cli.write_table")
        .expect("cli.write_table span must exist");
    let expected = output.display().to_string();
    assert_eq!(span.field("path"), Some(expected.as_str()));
    assert_eq!(span.field("rows"), Some("0"));
}

#[test]
fn generate_emits_spans_and_completion_event() -> TestResult {
    let dir = temp_dir();
    let output = output_path(&dir);
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let cli = generate_cli(generate_command(&output, 5, 8));
    let summary = tracing::subscriber::with_default(subscriber, || run_cli(cli))?;
    assert_eq!(summary.records, 5);

    let run = layer.span("cli.run").expect("cli.run span must exist");
    assert_eq!(run.field("command"), Some("generate"));

    let generate = layer
        .span("cli.generate")
        .expect("cli.generate span must exist");
    assert_eq!(generate.field("count"), Some("5"));
    assert_eq!(generate.field("policy"), Some("Resample"));
    assert_eq!(generate.field("parallel"), Some("false"));

    let core = layer
        .span("core.generate")
        .expect("core.generate span must exist");
    assert_eq!(core.field("seed"), Some("8"));

    assert!(layer.has_event(Level::INFO, "command completed"));
    let completed = layer
        .events()
        .into_iter()
        .find(|event| event.message() == Some("command completed"))
        .expect("completion event must exist");
    assert_eq!(completed.field("records"), Some("5"));
    assert_eq!(completed.field("seed"), Some("8"));
    Ok(())
}
