// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use serde::Serialize;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use vad_cli::run_pipeline;
use vad_clean::{clean, CleanConfig};
use vad_core::{RawColumn, RawTable, VadError};
use vad_detect::{DetectConfig, SpikeRow, SpikeTable};
use vad_report::{render_summary, report_json, SummaryOptions};

const DEFAULT_OUT_DIR: &str = "outputs";

struct Cli {
    command: Command,
}

enum Command {
    Run(RunArgs),
    Clean(CleanArgs),
}

#[derive(Debug)]
struct RunArgs {
    input: PathBuf,
    min_v: f64,
    max_v: f64,
    detect: DetectConfig,
    top_spikes: usize,
    out_dir: PathBuf,
}

#[derive(Debug)]
struct CleanArgs {
    input: PathBuf,
    min_v: f64,
    max_v: f64,
    out_dir: PathBuf,
}

#[derive(Debug)]
enum CliError {
    Vad(VadError),
    Io {
        context: String,
        source: std::io::Error,
    },
    Csv {
        context: String,
        source: csv::Error,
    },
    Json {
        context: String,
        source: serde_json::Error,
    },
    InvalidInput(String),
}

impl CliError {
    fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    fn csv(context: impl Into<String>, source: csv::Error) -> Self {
        Self::Csv {
            context: context.into(),
            source,
        }
    }

    fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Vad(VadError::Schema(_)) => "schema_error",
            Self::Vad(VadError::InvalidInput(_)) | Self::InvalidInput(_) => "invalid_input",
            Self::Io { .. } => "io_error",
            Self::Csv { .. } => "csv_error",
            Self::Json { .. } => "json_error",
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vad(err) => write!(f, "{err}"),
            Self::Io { context, source } => write!(f, "{context}: {source}"),
            Self::Csv { context, source } => write!(f, "{context}: {source}"),
            Self::Json { context, source } => write!(f, "{context}: {source}"),
            Self::InvalidInput(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Vad(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<VadError> for CliError {
    fn from(value: VadError) -> Self {
        Self::Vad(value)
    }
}

#[derive(Serialize)]
struct ErrorEnvelope {
    error: ErrorPayload,
}

#[derive(Serialize)]
struct ErrorPayload {
    code: String,
    message: String,
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        emit_structured_error(&err);
        process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let Some(cli) = parse_cli_from_env()? else {
        return Ok(());
    };

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Clean(args) => handle_clean(args),
    }
}

fn parse_cli_from_env() -> Result<Option<Cli>, CliError> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.is_empty() {
        print_root_help();
        return Ok(None);
    }

    if matches!(args[0].as_str(), "-h" | "--help") {
        print_root_help();
        return Ok(None);
    }
    if matches!(args[0].as_str(), "-V" | "--version") {
        print_version();
        return Ok(None);
    }

    let command_name = args[0].clone();
    let rest = &args[1..];

    if rest
        .iter()
        .any(|arg| matches!(arg.as_str(), "-h" | "--help"))
    {
        print_command_help(command_name.as_str())?;
        return Ok(None);
    }
    if rest
        .iter()
        .any(|arg| matches!(arg.as_str(), "-V" | "--version"))
    {
        print_version();
        return Ok(None);
    }

    let command = match command_name.as_str() {
        "run" => Command::Run(parse_run_args(rest)?),
        "clean" => Command::Clean(parse_clean_args(rest)?),
        _ => {
            return Err(CliError::invalid_input(format!(
                "unknown command '{}'; expected one of: run, clean",
                command_name
            )));
        }
    };

    Ok(Some(Cli { command }))
}

fn parse_run_args(tokens: &[String]) -> Result<RunArgs, CliError> {
    let mut input = PathBuf::new();
    let mut min_v: Option<f64> = None;
    let mut max_v: Option<f64> = None;
    let mut detect = DetectConfig::default();
    let mut top_spikes = SummaryOptions::default().top_spikes;
    let mut out_dir = PathBuf::from(DEFAULT_OUT_DIR);

    let mut idx = 0usize;
    while idx < tokens.len() {
        let (flag, inline_value) = split_flag(tokens[idx].as_str())?;
        match flag {
            "--input" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                input = PathBuf::from(raw);
            }
            "--min-v" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                min_v = Some(parse_f64_arg(raw.as_str(), flag)?);
            }
            "--max-v" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                max_v = Some(parse_f64_arg(raw.as_str(), flag)?);
            }
            "--window" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                detect.window = parse_usize_arg(raw.as_str(), flag)?;
            }
            "--min-periods" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                detect.min_periods = parse_usize_arg(raw.as_str(), flag)?;
            }
            "--zscore-threshold" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                detect.zscore_threshold = parse_f64_arg(raw.as_str(), flag)?;
            }
            "--delta-threshold" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                detect.delta_threshold = parse_f64_arg(raw.as_str(), flag)?;
            }
            "--top-spikes" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                top_spikes = parse_usize_arg(raw.as_str(), flag)?;
            }
            "--out-dir" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                out_dir = PathBuf::from(raw);
            }
            other => {
                return Err(CliError::invalid_input(format!(
                    "unknown run option '{other}'"
                )));
            }
        }
        idx += 1;
    }

    if input.as_os_str().is_empty() {
        return Err(CliError::invalid_input("run requires --input <path>"));
    }
    let min_v = min_v.ok_or_else(|| CliError::invalid_input("run requires --min-v <volts>"))?;
    let max_v = max_v.ok_or_else(|| CliError::invalid_input("run requires --max-v <volts>"))?;

    Ok(RunArgs {
        input,
        min_v,
        max_v,
        detect,
        top_spikes,
        out_dir,
    })
}

fn parse_clean_args(tokens: &[String]) -> Result<CleanArgs, CliError> {
    let mut input = PathBuf::new();
    let mut min_v: Option<f64> = None;
    let mut max_v: Option<f64> = None;
    let mut out_dir = PathBuf::from(DEFAULT_OUT_DIR);

    let mut idx = 0usize;
    while idx < tokens.len() {
        let (flag, inline_value) = split_flag(tokens[idx].as_str())?;
        match flag {
            "--input" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                input = PathBuf::from(raw);
            }
            "--min-v" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                min_v = Some(parse_f64_arg(raw.as_str(), flag)?);
            }
            "--max-v" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                max_v = Some(parse_f64_arg(raw.as_str(), flag)?);
            }
            "--out-dir" => {
                let raw = take_flag_value(flag, inline_value, tokens, &mut idx)?;
                out_dir = PathBuf::from(raw);
            }
            other => {
                return Err(CliError::invalid_input(format!(
                    "unknown clean option '{other}'"
                )));
            }
        }
        idx += 1;
    }

    if input.as_os_str().is_empty() {
        return Err(CliError::invalid_input("clean requires --input <path>"));
    }
    let min_v = min_v.ok_or_else(|| CliError::invalid_input("clean requires --min-v <volts>"))?;
    let max_v = max_v.ok_or_else(|| CliError::invalid_input("clean requires --max-v <volts>"))?;

    Ok(CleanArgs {
        input,
        min_v,
        max_v,
        out_dir,
    })
}

fn split_flag(token: &str) -> Result<(&str, Option<String>), CliError> {
    if !token.starts_with("--") {
        return Err(CliError::invalid_input(format!(
            "unexpected positional argument '{token}'; expected --flag value"
        )));
    }
    if let Some((flag, value)) = token.split_once('=') {
        return Ok((flag, Some(value.to_string())));
    }
    Ok((token, None))
}

fn take_flag_value(
    flag: &str,
    inline_value: Option<String>,
    tokens: &[String],
    idx: &mut usize,
) -> Result<String, CliError> {
    if let Some(value) = inline_value {
        return Ok(value);
    }

    *idx += 1;
    let value = tokens
        .get(*idx)
        .ok_or_else(|| CliError::invalid_input(format!("{flag} requires a value")))?;
    if value.starts_with("--") {
        return Err(CliError::invalid_input(format!(
            "{flag} requires a value, but got option '{value}'"
        )));
    }
    Ok(value.clone())
}

fn parse_usize_arg(raw: &str, flag: &str) -> Result<usize, CliError> {
    raw.parse::<usize>().map_err(|_| {
        CliError::invalid_input(format!(
            "{flag} expects a non-negative integer, got '{raw}'"
        ))
    })
}

fn parse_f64_arg(raw: &str, flag: &str) -> Result<f64, CliError> {
    raw.parse::<f64>()
        .map_err(|_| CliError::invalid_input(format!("{flag} expects a number, got '{raw}'")))
}

fn print_version() {
    println!("vad {}", env!("CARGO_PKG_VERSION"));
}

fn print_root_help() {
    println!(
        "vad {}\n\nUSAGE:\n  vad <COMMAND> [OPTIONS]\n\nCOMMANDS:\n  run     Clean a voltage CSV and detect spikes, writing all outputs\n  clean   Clean a voltage CSV without running detection\n\nGLOBAL OPTIONS:\n  -h, --help      Show help\n  -V, --version   Show version\n\nRun 'vad <COMMAND> --help' for subcommand options.",
        env!("CARGO_PKG_VERSION")
    );
}

fn print_command_help(command: &str) -> Result<(), CliError> {
    match command {
        "run" => {
            println!(
                "USAGE:\n  vad run --input <path> --min-v <volts> --max-v <volts> [OPTIONS]\n\nOPTIONS:\n  --input <path>               Required voltage CSV\n  --min-v <volts>              Required lower plausibility bound (inclusive)\n  --max-v <volts>              Required upper plausibility bound (inclusive)\n  --window <usize>             Rolling window length               Default: 20\n  --min-periods <usize>        Observations before stats defined   Default: 10\n  --zscore-threshold <float>   |z-score| must exceed this          Default: 3.0\n  --delta-threshold <float>    |step delta| must exceed this       Default: 20.0\n  --top-spikes <usize>         Spikes listed in the summary        Default: 5\n  --out-dir <path>             Output directory                    Default: outputs\n\nWrites cleaned.csv, spikes.csv, report.json and summary.txt into --out-dir\nand prints the summary to stdout."
            );
            Ok(())
        }
        "clean" => {
            println!(
                "USAGE:\n  vad clean --input <path> --min-v <volts> --max-v <volts> [OPTIONS]\n\nOPTIONS:\n  --input <path>     Required voltage CSV\n  --min-v <volts>    Required lower plausibility bound (inclusive)\n  --max-v <volts>    Required upper plausibility bound (inclusive)\n  --out-dir <path>   Output directory   Default: outputs\n\nWrites cleaned.csv into --out-dir and prints the cleaning statistics as JSON."
            );
            Ok(())
        }
        _ => Err(CliError::invalid_input(format!(
            "unknown command '{command}'; expected one of: run, clean"
        ))),
    }
}

fn handle_run(args: RunArgs) -> Result<(), CliError> {
    args.detect.validate()?;
    let clean_config = CleanConfig::new(args.min_v, args.max_v)?;
    let raw = read_raw_table(args.input.as_path())?;
    let output = run_pipeline(&raw, &clean_config, &args.detect)?;

    create_out_dir(args.out_dir.as_path())?;
    write_text(
        args.out_dir.join("cleaned.csv").as_path(),
        raw_table_csv(&output.cleaned.to_raw())?.as_str(),
    )?;
    write_text(
        args.out_dir.join("spikes.csv").as_path(),
        spikes_csv(&output.spikes)?.as_str(),
    )?;
    write_json(
        args.out_dir.join("report.json").as_path(),
        &report_json(&output.clean_stats, &output.report),
    )?;

    let summary = render_summary(
        &output.cleaned,
        &output.clean_stats,
        &output.spikes,
        &output.report,
        &SummaryOptions {
            top_spikes: args.top_spikes,
        },
    );
    write_text(args.out_dir.join("summary.txt").as_path(), summary.as_str())?;
    print!("{summary}");
    Ok(())
}

fn handle_clean(args: CleanArgs) -> Result<(), CliError> {
    let clean_config = CleanConfig::new(args.min_v, args.max_v)?;
    let raw = read_raw_table(args.input.as_path())?;
    let (cleaned, stats) = clean(&raw, &clean_config)?;

    create_out_dir(args.out_dir.as_path())?;
    write_text(
        args.out_dir.join("cleaned.csv").as_path(),
        raw_table_csv(&cleaned.to_raw())?.as_str(),
    )?;

    let encoded = serde_json::to_string_pretty(&stats)
        .map_err(|source| CliError::json("failed to serialize cleaning statistics", source))?;
    println!("{encoded}");
    Ok(())
}

fn read_raw_table(path: &Path) -> Result<RawTable, CliError> {
    let data = fs::read_to_string(path)
        .map_err(|source| CliError::io(format!("failed to read '{}'", path.display()), source))?;
    let raw = parse_raw_table(data.as_str())?;
    log::info!(
        "loaded '{}': {} rows, {} columns",
        path.display(),
        raw.n_rows(),
        raw.n_columns()
    );
    Ok(raw)
}

/// Parses headered CSV text into an untyped table. All fields stay strings;
/// the cleaning stage owns interpretation.
fn parse_raw_table(data: &str) -> Result<RawTable, CliError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data.as_bytes());

    let headers = reader
        .headers()
        .map_err(|source| CliError::csv("failed to read CSV header row", source))?
        .clone();
    let mut columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

    for (row, record) in reader.records().enumerate() {
        let record = record
            .map_err(|source| CliError::csv(format!("failed to read CSV row {}", row + 1), source))?;
        for (values, field) in columns.iter_mut().zip(record.iter()) {
            values.push(field.to_string());
        }
    }

    let columns = headers
        .iter()
        .zip(columns)
        .map(|(name, values)| RawColumn::new(name, values))
        .collect();
    Ok(RawTable::new(columns)?)
}

fn raw_table_csv(table: &RawTable) -> Result<String, CliError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.columns().iter().map(|column| column.name.as_str()))
        .map_err(|source| CliError::csv("failed to write CSV header row", source))?;
    for row in 0..table.n_rows() {
        writer
            .write_record(table.columns().iter().map(|column| column.values[row].as_str()))
            .map_err(|source| CliError::csv(format!("failed to write CSV row {}", row + 1), source))?;
    }
    finish_csv(writer)
}

fn spikes_csv(spikes: &SpikeTable) -> Result<String, CliError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([spikes.time_column(), "voltage", "zscore", "delta", "reason"])
        .map_err(|source| CliError::csv("failed to write CSV header row", source))?;
    for (row, spike) in spikes.rows().iter().enumerate() {
        writer
            .write_record(spike_record(spike))
            .map_err(|source| CliError::csv(format!("failed to write CSV row {}", row + 1), source))?;
    }
    finish_csv(writer)
}

/// One spike rendered as CSV fields; undefined statistics become empty fields.
fn spike_record(spike: &SpikeRow) -> [String; 5] {
    [
        spike.time.to_string(),
        spike.voltage.to_string(),
        spike.zscore.map(|z| z.to_string()).unwrap_or_default(),
        spike.delta.map(|d| d.to_string()).unwrap_or_default(),
        spike.reason.to_string(),
    ]
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String, CliError> {
    let bytes = writer
        .into_inner()
        .map_err(|source| CliError::invalid_input(format!("failed to flush CSV buffer: {source}")))?;
    String::from_utf8(bytes)
        .map_err(|source| CliError::invalid_input(format!("CSV buffer was not valid UTF-8: {source}")))
}

fn create_out_dir(path: &Path) -> Result<(), CliError> {
    fs::create_dir_all(path)
        .map_err(|source| CliError::io(format!("failed to create '{}'", path.display()), source))
}

fn write_text(path: &Path, contents: &str) -> Result<(), CliError> {
    fs::write(path, contents)
        .map_err(|source| CliError::io(format!("failed to write '{}'", path.display()), source))
}

fn write_json(path: &Path, payload: &serde_json::Value) -> Result<(), CliError> {
    let encoded = serde_json::to_string_pretty(payload)
        .map_err(|source| CliError::json("failed to serialize JSON output", source))?;
    write_text(path, format!("{encoded}\n").as_str())
}

fn emit_structured_error(err: &CliError) {
    let envelope = ErrorEnvelope {
        error: ErrorPayload {
            code: err.code().to_string(),
            message: err.to_string(),
        },
    };

    match serde_json::to_string_pretty(&envelope) {
        Ok(json) => eprintln!("{json}"),
        Err(_) => eprintln!(
            "{{\"error\":{{\"code\":\"{}\",\"message\":\"{}\"}}}}",
            err.code(),
            err
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        parse_clean_args, parse_raw_table, parse_run_args, raw_table_csv, spike_record,
        spikes_csv, split_flag, CliError,
    };
    use vad_cli::run_pipeline;
    use vad_clean::CleanConfig;
    use vad_detect::DetectConfig;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn run_args_parse_required_and_optional_flags() {
        let args = parse_run_args(&tokens(&[
            "--input",
            "readings.csv",
            "--min-v",
            "0.5",
            "--max-v",
            "400",
            "--window",
            "8",
            "--min-periods",
            "4",
            "--zscore-threshold",
            "2.5",
            "--delta-threshold",
            "10",
            "--top-spikes",
            "3",
            "--out-dir",
            "out",
        ]))
        .expect("flags should parse");

        assert_eq!(args.input.to_string_lossy(), "readings.csv");
        assert_eq!(args.min_v, 0.5);
        assert_eq!(args.max_v, 400.0);
        assert_eq!(args.detect.window, 8);
        assert_eq!(args.detect.min_periods, 4);
        assert_eq!(args.detect.zscore_threshold, 2.5);
        assert_eq!(args.detect.delta_threshold, 10.0);
        assert_eq!(args.top_spikes, 3);
        assert_eq!(args.out_dir.to_string_lossy(), "out");
    }

    #[test]
    fn run_args_fall_back_to_detect_defaults() {
        let args = parse_run_args(&tokens(&[
            "--input",
            "readings.csv",
            "--min-v=0",
            "--max-v=100",
        ]))
        .expect("flags should parse");
        assert_eq!(args.detect, DetectConfig::default());
        assert_eq!(args.out_dir.to_string_lossy(), "outputs");
    }

    #[test]
    fn run_args_require_input_and_bounds() {
        let err = parse_run_args(&tokens(&["--min-v", "0", "--max-v", "100"]))
            .expect_err("missing --input should fail");
        assert!(err.to_string().contains("--input"));

        let err = parse_run_args(&tokens(&["--input", "readings.csv", "--max-v", "100"]))
            .expect_err("missing --min-v should fail");
        assert!(err.to_string().contains("--min-v"));
    }

    #[test]
    fn run_args_reject_unknown_options() {
        let err = parse_run_args(&tokens(&["--frobnicate", "1"]))
            .expect_err("unknown option should fail");
        assert!(err.to_string().contains("--frobnicate"));
    }

    #[test]
    fn clean_args_parse_with_defaults() {
        let args = parse_clean_args(&tokens(&[
            "--input",
            "readings.csv",
            "--min-v",
            "0",
            "--max-v",
            "100",
        ]))
        .expect("flags should parse");
        assert_eq!(args.out_dir.to_string_lossy(), "outputs");
    }

    #[test]
    fn split_flag_rejects_positional_arguments() {
        let err = split_flag("readings.csv").expect_err("positional should fail");
        assert!(err.to_string().contains("unexpected positional argument"));
    }

    #[test]
    fn flag_values_must_not_be_options() {
        let err = parse_run_args(&tokens(&["--input", "--min-v", "0"]))
            .expect_err("option in value position should fail");
        assert!(err.to_string().contains("requires a value"));
    }

    #[test]
    fn numeric_flags_reject_garbage() {
        let err = parse_run_args(&tokens(&[
            "--input",
            "readings.csv",
            "--min-v",
            "zero",
            "--max-v",
            "100",
        ]))
        .expect_err("non-numeric bound should fail");
        assert!(err.to_string().contains("expects a number"));
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn csv_parser_builds_named_string_columns() {
        let raw = parse_raw_table("timestamp,voltage\n2024-01-01 00:00:00,12.0V\n2024-01-01 00:01:00,bad\n")
            .expect("csv should parse");
        assert_eq!(raw.n_rows(), 2);
        assert_eq!(raw.n_columns(), 2);
        let voltage = raw.column("voltage").expect("voltage column should exist");
        assert_eq!(voltage.values, vec!["12.0V".to_string(), "bad".to_string()]);
    }

    #[test]
    fn csv_parser_rejects_ragged_rows() {
        let err = parse_raw_table("a,b\n1,2\n3\n").expect_err("ragged row should fail");
        assert_eq!(err.code(), "csv_error");
    }

    #[test]
    fn cleaned_csv_round_trips_through_the_raw_shape() {
        let raw = parse_raw_table("voltage\n12.0\n12.5\n").expect("csv should parse");
        let output = run_pipeline(
            &raw,
            &CleanConfig::new(0.0, 100.0).expect("bounds should validate"),
            &DetectConfig::default(),
        )
        .expect("pipeline should run");
        let rendered = raw_table_csv(&output.cleaned.to_raw()).expect("csv should render");
        assert_eq!(rendered, "sample_index,voltage\n0,12\n1,12.5\n");
    }

    #[test]
    fn spikes_csv_leaves_undefined_statistics_empty() {
        // Two samples stay below min_periods, so the delta spike at index 1
        // carries no z-score.
        let raw = parse_raw_table("voltage\n12.0\n90.0\n").expect("csv should parse");
        let output = run_pipeline(
            &raw,
            &CleanConfig::new(0.0, 1000.0).expect("bounds should validate"),
            &DetectConfig {
                window: 5,
                min_periods: 5,
                zscore_threshold: 3.0,
                delta_threshold: 20.0,
            },
        )
        .expect("pipeline should run");

        assert_eq!(output.spikes.len(), 1);
        let record = spike_record(&output.spikes.rows()[0]);
        assert_eq!(record, ["1", "90", "", "78", "delta"].map(String::from));

        let rendered = spikes_csv(&output.spikes).expect("csv should render");
        assert_eq!(
            rendered,
            "sample_index,voltage,zscore,delta,reason\n1,90,,78,delta\n"
        );
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(
            CliError::from(vad_core::VadError::schema("x")).code(),
            "schema_error"
        );
        assert_eq!(CliError::invalid_input("x").code(), "invalid_input");
    }
}
