//! Entry point for the `sonomatch` command-line tool.

use std::io::Write;
use std::path::PathBuf;

use sonomatch::batch::{BatchOptions, PathSpec, PathSpecError, enumerate_pairs, run_batch};
use sonomatch::config::{self, AppSettings};
use sonomatch::decode::DefaultDecoder;
use sonomatch::logging;

const UNEXPECTED_ARGUMENTS: &str = "Unexpected number of command line arguments.";

fn main() {
    if let Err(err) = run() {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    let settings = load_settings(options.config_path.as_ref())?;
    if let Err(err) = logging::init(&settings.logging, options.verbose) {
        eprintln!("Logging disabled: {err}");
    }

    let (first_spec, second_spec) = options.specs;
    let first = first_spec.resolve().map_err(|err| err.to_string())?;
    let second = second_spec.resolve().map_err(|err| err.to_string())?;

    let decoder = DefaultDecoder::new(settings.analysis.resample_to);
    let batch = BatchOptions {
        worker_count: options.jobs.unwrap_or(settings.batch.worker_count),
        magnitude_mode: settings.analysis.magnitude_mode,
    };
    let outcome = run_batch(&decoder, enumerate_pairs(&first, &second), &batch);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for report in &outcome.reports {
        writeln!(out, "{report}").map_err(|err| format!("Failed to write report: {err}"))?;
    }
    out.flush()
        .map_err(|err| format!("Failed to write report: {err}"))
}

fn load_settings(path: Option<&PathBuf>) -> Result<AppSettings, String> {
    match path {
        Some(path) => config::load_from(path),
        None => config::load_or_default(),
    }
    .map_err(|err| err.to_string())
}

#[derive(Debug)]
struct Options {
    specs: (PathSpec, PathSpec),
    config_path: Option<PathBuf>,
    jobs: Option<u32>,
    verbose: bool,
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let mut specs = Vec::with_capacity(2);
    let mut config_path = None;
    let mut jobs = None;
    let mut verbose = false;

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "-v" | "--verbose" => {
                verbose = true;
            }
            "--config" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--config requires a value".to_string())?;
                config_path = Some(PathBuf::from(value));
            }
            "--jobs" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--jobs requires a value".to_string())?;
                jobs = Some(
                    value
                        .parse::<u32>()
                        .map_err(|_| format!("Invalid --jobs value: {value}"))?,
                );
            }
            flag @ ("-f" | "--file" | "-d" | "--dir") => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| UNEXPECTED_ARGUMENTS.to_string())?;
                specs.push(PathSpec::from_flag(flag, value).map_err(|err| err.to_string())?);
            }
            other if other.starts_with('-') => {
                let err = PathSpecError::UnknownFlag {
                    flag: other.to_string(),
                };
                return Err(err.to_string());
            }
            _ => return Err(UNEXPECTED_ARGUMENTS.to_string()),
        }
        idx += 1;
    }

    let mut specs = specs.into_iter();
    match (specs.next(), specs.next(), specs.next()) {
        (Some(first), Some(second), None) => Ok(Some(Options {
            specs: (first, second),
            config_path,
            jobs,
            verbose,
        })),
        _ => Err(UNEXPECTED_ARGUMENTS.to_string()),
    }
}

fn help_text() -> String {
    [
        "sonomatch",
        "",
        "Report audio files that are derived from one another.",
        "",
        "Usage:",
        "  sonomatch <-f|--file|-d|--dir> <path> <-f|--file|-d|--dir> <path> [options]",
        "",
        "Options:",
        "  --config <file>   Settings file (default: config.toml in the app directory).",
        "  --jobs <n>        Comparison worker threads (0 = auto).",
        "  -v, --verbose     Show info and debug logs on stderr.",
        "  -h, --help        Print this help.",
    ]
    .join("\n")
}
