// FindingL - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading (platform default or --config)
// 3. Logging initialisation (debug mode support)
// 4. Input discovery, scanning, reporting and optional export

use findingl::app::scan::{self, FileScan};
use findingl::core::discovery::{self, DiscoveryConfig};
use findingl::core::export;
use findingl::core::model::{ReportEvent, ScanOutcome};
use findingl::core::scanner::ScanConfig;
use findingl::platform::config::{self, AppConfig, PlatformPaths};
use findingl::util::{self, constants, error::FindingLError};

use clap::Parser;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// FindingL - report the first parameter tuple without a well-formed sequence.
///
/// Reads `;`-delimited result files, evaluates every candidate sequence
/// against the well-formedness predicate for its (p, s, m) tuple, and prints
/// `q <q> m <m>`, `First failed r <r>` and `still working r <r>` lines.
#[derive(Parser, Debug)]
#[command(name = "findingl", version, about)]
struct Cli {
    /// Result files or directories to scan.
    #[arg(default_value = constants::DEFAULT_INPUT_FILE)]
    paths: Vec<PathBuf>,

    /// Config file to use instead of the platform default.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Print the sequences of each failing tuple after its report line.
    #[arg(short = 'f', long = "show-failing")]
    show_failing: bool,

    /// Write per-tuple results to this file (.json for JSON, otherwise CSV).
    #[arg(short = 'e', long = "export")]
    export: Option<PathBuf>,

    /// Number of files scanned in parallel (0 = one per CPU core).
    #[arg(short = 'j', long = "jobs")]
    jobs: Option<usize>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config is read before logging so its [logging] level can apply.
    let (app_config, config_warnings) = match cli.config.as_deref() {
        Some(path) => match config::load_config_file(path) {
            Ok(loaded) => loaded,
            Err(e) => {
                util::logging::init(cli.debug, None);
                return fail(&e.into());
            }
        },
        None => config::load_default_config(&PlatformPaths::resolve()),
    };

    util::logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        inputs = cli.paths.len(),
        "FindingL starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    match run(&cli, &app_config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => fail(&e),
    }
}

/// Discover, scan, report and export. Returns whether every input scanned.
fn run(cli: &Cli, app_config: &AppConfig) -> Result<bool, FindingLError> {
    let discovery_config = DiscoveryConfig {
        max_depth: app_config.max_depth,
        max_files: app_config.max_files,
        include_patterns: app_config.include_patterns.clone(),
        exclude_patterns: app_config.exclude_patterns.clone(),
    };
    let (files, warnings) = discovery::discover_inputs(&cli.paths, &discovery_config)?;
    for warning in &warnings {
        eprintln!("Warning: {warning}");
    }
    if files.is_empty() {
        eprintln!("Warning: no result files found");
    }

    let scan_config = ScanConfig {
        retain_failing_sequences: cli.show_failing || app_config.retain_failing_sequences,
    };
    let workers = cli.jobs.unwrap_or(app_config.worker_threads);
    let scans = scan::scan_files(&files, &scan_config, workers);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let all_ok = print_report(&mut out, &scans, scan_config.retain_failing_sequences)
        .map_err(|e| FindingLError::Io {
            path: PathBuf::from("<stdout>"),
            operation: "write report",
            source: e,
        })?;

    if let Some(export_path) = cli.export.as_deref() {
        let outcomes: Vec<ScanOutcome> = scans
            .into_iter()
            .filter_map(|scan| scan.result.ok())
            .collect();
        write_export(export_path, &outcomes)?;
    }

    Ok(all_ok)
}

/// Print every scan's report lines in input order. Fatal scan errors go to
/// stderr in place of that file's report.
fn print_report<W: Write>(out: &mut W, scans: &[FileScan], show_failing: bool) -> io::Result<bool> {
    let labelled = scans.len() > 1;
    let mut all_ok = true;

    for scan in scans {
        if labelled {
            writeln!(out, "# {}", scan.path.display())?;
        }
        match &scan.result {
            Ok(outcome) => {
                for event in &outcome.events {
                    writeln!(out, "{event}")?;
                    if let ReportEvent::FirstFailed { rejected, .. } = event {
                        if show_failing {
                            for sequence in rejected {
                                writeln!(out, "{sequence}")?;
                            }
                        }
                    }
                }
            }
            Err(e) => {
                all_ok = false;
                out.flush()?;
                tracing::error!(file = %scan.path.display(), error = %e, "Scan aborted");
                eprintln!("Error: {e}");
            }
        }
    }
    out.flush()?;
    Ok(all_ok)
}

fn write_export(path: &Path, outcomes: &[ScanOutcome]) -> Result<(), FindingLError> {
    let file = std::fs::File::create(path).map_err(|e| FindingLError::Io {
        path: path.to_path_buf(),
        operation: "create export file",
        source: e,
    })?;
    let writer = BufWriter::new(file);

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let count = if is_json {
        export::export_json(outcomes, writer, path)?
    } else {
        export::export_csv(outcomes, writer, path)?
    };

    tracing::info!(path = %path.display(), records = count, "Export written");
    Ok(())
}

fn fail(e: &FindingLError) -> ExitCode {
    tracing::error!(error = %e, "FindingL stopped");
    eprintln!("Error: {e}");
    ExitCode::FAILURE
}
