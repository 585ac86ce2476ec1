// FindingL - app/scan.rs
//
// File-level scan orchestration. Opens each result file and runs the core
// scanner over it.
//
// Architecture:
//   - Every input gets its own single-threaded scan with its own state.
//   - Several inputs are scanned concurrently on a rayon pool; results come
//     back in input order regardless of completion order.
//   - A failure in one file never affects the others.
//   - Opening a file is retried with capped backoff on transient I/O errors.

use crate::core::model::ScanOutcome;
use crate::core::scanner::{self, ScanConfig};
use crate::util::error::{FindingLError, Result};
use rayon::prelude::*;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Retry limits for transient I/O errors when opening a file.
const MAX_RETRIES: u32 = 3;
const RETRY_DELAYS_MS: [u64; 3] = [50, 100, 200];

/// Result of scanning one input.
#[derive(Debug)]
pub struct FileScan {
    pub path: PathBuf,
    pub result: Result<ScanOutcome>,
}

/// Scan a single result file to completion.
pub fn scan_file(path: &Path, config: &ScanConfig) -> Result<ScanOutcome> {
    let started = Instant::now();
    let file = open_with_retry(path).map_err(|e| FindingLError::Io {
        path: path.to_path_buf(),
        operation: "open",
        source: e,
    })?;

    let outcome = scanner::scan_reader(BufReader::new(file), path, config)?;

    tracing::debug!(
        file = %path.display(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        events = outcome.events.len(),
        "File scanned"
    );
    Ok(outcome)
}

/// Scan every path, `worker_threads` at a time (0 = rayon default).
///
/// The returned vector is in the same order as `paths`.
pub fn scan_files(paths: &[PathBuf], config: &ScanConfig, worker_threads: usize) -> Vec<FileScan> {
    // No pool needed for a single input.
    if paths.len() <= 1 {
        return paths
            .iter()
            .map(|path| FileScan {
                path: path.clone(),
                result: scan_file(path, config),
            })
            .collect();
    }

    let run = || -> Vec<FileScan> {
        paths
            .par_iter()
            .map(|path| FileScan {
                path: path.clone(),
                result: scan_file(path, config),
            })
            .collect()
    };

    match rayon::ThreadPoolBuilder::new()
        .num_threads(worker_threads)
        .thread_name(|i| format!("findingl-scan-{i}"))
        .build()
    {
        Ok(pool) => pool.install(run),
        Err(e) => {
            tracing::warn!(error = %e, "Could not build scan thread pool; using the global pool");
            run()
        }
    }
}

/// Open a file, retrying transient errors.
fn open_with_retry(path: &Path) -> io::Result<File> {
    let mut last_err: Option<io::Error> = None;

    for attempt in 0..MAX_RETRIES {
        match File::open(path) {
            Ok(file) => return Ok(file),
            Err(e) if is_transient_error(&e) => {
                tracing::debug!(
                    file = %path.display(),
                    attempt = attempt + 1,
                    error = %e,
                    "Transient I/O error, retrying"
                );
                std::thread::sleep(Duration::from_millis(RETRY_DELAYS_MS[attempt as usize]));
                last_err = Some(e);
            }
            Err(e) => return Err(e), // Permanent error; do not retry.
        }
    }

    Err(last_err.unwrap_or_else(|| io::Error::other("Unknown open error")))
}

/// Returns true for transient I/O errors that are worth retrying.
fn is_transient_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
    )
}
