// FindingL - tests/e2e_scan.rs
//
// End-to-end tests for the discovery, scanning and export pipeline.
//
// These tests exercise the real filesystem, real walkdir traversal, the
// rayon-backed multi-file scan and the compiled binary. No mocks, no stubs.

use findingl::app::scan::{scan_file, scan_files};
use findingl::core::discovery::{discover_inputs, DiscoveryConfig};
use findingl::core::export::export_csv;
use findingl::core::scanner::ScanConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

// =============================================================================
// Helpers
// =============================================================================

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

fn report_lines(path: &Path, config: &ScanConfig) -> Vec<String> {
    scan_file(path, config)
        .unwrap()
        .events
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Run the binary with an empty config so the user's own config never leaks in.
fn run_binary(args: &[&str]) -> std::process::Output {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "").unwrap();

    Command::new(env!("CARGO_BIN_EXE_findingl"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("binary runs")
}

// =============================================================================
// Scanning fixtures
// =============================================================================

#[test]
fn e2e_q27_reports_failure_and_multiplier_changes() {
    let lines = report_lines(&fixture("Lresultsq27.csv"), &ScanConfig::default());
    assert_eq!(
        lines,
        vec![
            "q 27 m 2",
            "First failed r 2",
            "q 27 m 3",
            "still working r 3"
        ]
    );
}

#[test]
fn e2e_q8_fails_on_last_tuple() {
    let outcome = scan_file(&fixture("Lresultsq8.csv"), &ScanConfig::default()).unwrap();
    let lines: Vec<_> = outcome.events.iter().map(ToString::to_string).collect();
    assert_eq!(lines, vec!["q 8 m 2", "First failed r 5"]);
    assert_eq!(outcome.stats.header_lines, 1);
    assert_eq!(outcome.stats.parameter_lines, 2);
    assert_eq!(outcome.stats.data_lines, 3);
    assert_eq!(outcome.stats.unrecognised_lines, 1);
}

#[test]
fn e2e_fixture_tuple_summaries() {
    let outcome = scan_file(&fixture("Lresultsq27.csv"), &ScanConfig::default()).unwrap();
    let summary: Vec<_> = outcome
        .tuples
        .iter()
        .map(|t| {
            (
                t.tuple.r,
                t.tuple.q,
                t.sequences_seen,
                t.well_formed_sequences,
                t.has_well_formed,
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![(1, 27, 2, 2, true), (2, 27, 1, 0, false), (3, 27, 1, 1, true)]
    );
}

// =============================================================================
// Discovery + parallel scan
// =============================================================================

#[test]
fn e2e_discovers_fixture_result_files() {
    let (files, warnings) =
        discover_inputs(&[fixtures_dir()], &DiscoveryConfig::default()).unwrap();
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");

    let names: Vec<_> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["Lresultsq27.csv", "Lresultsq8.csv"]);
}

#[test]
fn e2e_parallel_scan_matches_sequential() {
    let (files, _) = discover_inputs(&[fixtures_dir()], &DiscoveryConfig::default()).unwrap();
    let config = ScanConfig::default();

    let parallel = scan_files(&files, &config, 2);
    for (scan, path) in parallel.iter().zip(&files) {
        let lines: Vec<_> = scan
            .result
            .as_ref()
            .unwrap()
            .events
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(lines, report_lines(path, &config));
    }
}

#[test]
fn e2e_export_csv_covers_all_tuples() {
    let (files, _) = discover_inputs(&[fixtures_dir()], &DiscoveryConfig::default()).unwrap();
    let outcomes: Vec<_> = scan_files(&files, &ScanConfig::default(), 0)
        .into_iter()
        .map(|s| s.result.unwrap())
        .collect();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");
    let file = fs::File::create(&path).unwrap();
    let rows = export_csv(&outcomes, file, &path).unwrap();
    assert_eq!(rows, 5);

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 6);
    assert!(text.lines().any(|l| l.ends_with(",2,3,2,5,8,4,2,0,failed")));
}

// =============================================================================
// Binary
// =============================================================================

#[test]
fn e2e_binary_prints_report_lines_only() {
    let path = fixture("Lresultsq27.csv");
    let output = run_binary(&[path.to_str().unwrap()]);
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout,
        "q 27 m 2\nFirst failed r 2\nq 27 m 3\nstill working r 3\n"
    );
}

#[test]
fn e2e_binary_show_failing_lists_sequences() {
    let path = fixture("Lresultsq8.csv");
    let output = run_binary(&["--show-failing", path.to_str().unwrap()]);
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout,
        "q 8 m 2\nFirst failed r 5\n[1, 2, 4, 8, 16, 32]\n[1, 4, 8]\n"
    );
}

#[test]
fn e2e_binary_labels_multiple_inputs() {
    let output = run_binary(&[fixtures_dir().to_str().unwrap()]);
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).unwrap();
    let headers: Vec<_> = stdout.lines().filter(|l| l.starts_with("# ")).collect();
    assert_eq!(headers.len(), 2);
    assert!(headers[0].ends_with("Lresultsq27.csv"));
}

#[test]
fn e2e_binary_fails_on_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Lresultsq9.csv");
    fs::write(&path, "3;2;2;1;;;\n[1, 3, x];;;;;;\n").unwrap();

    let output = run_binary(&[path.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("line 2"), "{stderr}");
}

#[test]
fn e2e_binary_writes_json_export() {
    let dir = tempfile::tempdir().unwrap();
    let export = dir.path().join("out.json");
    let path = fixture("Lresultsq8.csv");
    let output = run_binary(&[
        "--export",
        export.to_str().unwrap(),
        path.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "{output:?}");

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&export).unwrap()).unwrap();
    assert_eq!(value["scans"][0]["tuples"].as_array().unwrap().len(), 2);
}
