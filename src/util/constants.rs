// FindingL - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "FindingL";

/// Application identifier used for the config directory.
pub const APP_ID: &str = "FindingL";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Log line contract
// =============================================================================

/// Field delimiter used by the experiment's result files.
pub const FIELD_DELIMITER: char = ';';

/// Index of the field whose length identifies the header line.
pub const HEADER_FIELD_INDEX: usize = 6;

/// A line is a header when its header field is longer than this (in characters).
pub const HEADER_FIELD_MIN_LEN: usize = 8;

/// Index of the base prime `p` on parameter lines, and of the bracketed
/// sequence on data lines.
pub const P_FIELD_INDEX: usize = 0;

/// Index of the exponent `s`. A non-empty value marks a parameter line.
pub const S_FIELD_INDEX: usize = 1;

/// Index of the multiplier bound `m` on parameter lines.
pub const M_FIELD_INDEX: usize = 2;

/// Index of the run identifier `r` on parameter lines.
pub const R_FIELD_INDEX: usize = 3;

/// Index of the bracketed candidate sequence on data lines.
pub const SEQUENCE_FIELD_INDEX: usize = 0;

/// A line is a data line when its sequence field is longer than this.
pub const SEQUENCE_FIELD_MIN_LEN: usize = 1;

/// Maximum number of characters of a log line quoted in error messages and
/// debug output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Inputs
// =============================================================================

/// Input file scanned when no path is given on the command line.
pub const DEFAULT_INPUT_FILE: &str = "Lresultsq27.csv";

/// Maximum directory recursion depth when an input is a directory.
pub const DEFAULT_MAX_DEPTH: usize = 4;

/// Hard upper bound on max depth (prevents runaway traversal).
pub const ABSOLUTE_MAX_DEPTH: usize = 50;

/// Maximum number of result files accepted in one run.
pub const DEFAULT_MAX_FILES: usize = 500;

/// Minimum sensible value for the max-files limit.
pub const MIN_MAX_FILES: usize = 1;

/// Hard upper bound on max files (prevents configuration mistakes).
pub const ABSOLUTE_MAX_FILES: usize = 10_000;

/// Default include glob patterns applied to files found inside directories.
pub const DEFAULT_INCLUDE_PATTERNS: &[&str] = &["Lresults*.csv"];

/// Default exclude glob patterns (filenames and directory names).
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &["*.bak", "*.tmp", ".git"];

// =============================================================================
// Parallel scanning
// =============================================================================

/// Default number of worker threads for scanning several inputs.
/// 0 means auto-detect (rayon picks the number of CPU cores).
pub const DEFAULT_WORKER_THREADS: usize = 0;

/// Hard upper bound on configured worker threads.
pub const MAX_WORKER_THREADS: usize = 256;

// =============================================================================
// Logging
// =============================================================================

/// Default log level. Report lines go to stdout, so stderr stays quiet by default.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Accepted values for `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Maximum size of a config file in bytes.
pub const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024; // 64 KB
