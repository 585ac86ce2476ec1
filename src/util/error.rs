// FindingL - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation. All errors preserve the causal chain
// for diagnostic logging.

use std::fmt;
use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

/// Top-level error type for all FindingL operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum FindingLError {
    /// Predicate preconditions were violated.
    Predicate(PredicateError),

    /// A result file could not be scanned.
    Scan(ScanError),

    /// Input discovery failed.
    Discovery(DiscoveryError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for FindingLError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(e) => write!(f, "Predicate error: {e}"),
            Self::Scan(e) => write!(f, "Scan error: {e}"),
            Self::Discovery(e) => write!(f, "Discovery error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for FindingLError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Predicate(e) => Some(e),
            Self::Scan(e) => Some(e),
            Self::Discovery(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Predicate errors
// ---------------------------------------------------------------------------

/// Violations of the well-formedness predicate's preconditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateError {
    /// The candidate sequence has no elements, so it has no maximum.
    EmptySequence,

    /// The largest element is zero, which has no base-p digit count.
    ZeroMaximum,

    /// The base must be at least 2.
    InvalidBase { p: u64 },

    /// The exponent must be at least 1.
    InvalidExponent { s: u64 },

    /// The multiplier bound must be at least 1.
    InvalidMultiplier { m: u64 },
}

impl fmt::Display for PredicateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySequence => write!(f, "candidate sequence is empty"),
            Self::ZeroMaximum => write!(
                f,
                "candidate sequence has no positive element to count digits of"
            ),
            Self::InvalidBase { p } => write!(f, "base p = {p} must be at least 2"),
            Self::InvalidExponent { s } => write!(f, "exponent s = {s} must be at least 1"),
            Self::InvalidMultiplier { m } => {
                write!(f, "multiplier bound m = {m} must be at least 1")
            }
        }
    }
}

impl std::error::Error for PredicateError {}

impl From<PredicateError> for FindingLError {
    fn from(e: PredicateError) -> Self {
        Self::Predicate(e)
    }
}

// ---------------------------------------------------------------------------
// Scan errors
// ---------------------------------------------------------------------------

/// Fatal errors raised while scanning a result file. Any of these aborts the
/// scan; the report produced up to that point is not authoritative.
#[derive(Debug)]
pub enum ScanError {
    /// A field expected to hold an integer did not parse.
    MalformedField {
        file: PathBuf,
        line_number: u64,
        field: &'static str,
        index: usize,
        value: String,
        source: ParseIntError,
    },

    /// `q = p^s` does not fit in 64 bits.
    ParameterOverflow {
        file: PathBuf,
        line_number: u64,
        p: u64,
        s: u64,
    },

    /// The predicate rejected its inputs for a data line.
    Predicate {
        file: PathBuf,
        line_number: u64,
        line: String,
        source: PredicateError,
    },

    /// I/O error while reading the result file.
    Io {
        file: PathBuf,
        line_number: u64,
        source: io::Error,
    },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedField {
                file,
                line_number,
                field,
                index,
                value,
                source,
            } => write!(
                f,
                "'{}' line {line_number}: field {index} ({field}) = '{value}' \
                 is not an integer: {source}",
                file.display()
            ),
            Self::ParameterOverflow {
                file,
                line_number,
                p,
                s,
            } => write!(
                f,
                "'{}' line {line_number}: q = {p}^{s} overflows 64 bits",
                file.display()
            ),
            Self::Predicate {
                file,
                line_number,
                line,
                source,
            } => write!(
                f,
                "'{}' line {line_number}: {source} (line: '{line}')",
                file.display()
            ),
            Self::Io {
                file,
                line_number,
                source,
            } => write!(
                f,
                "'{}': I/O error reading line {line_number}: {source}",
                file.display()
            ),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MalformedField { source, .. } => Some(source),
            Self::Predicate { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::ParameterOverflow { .. } => None,
        }
    }
}

impl From<ScanError> for FindingLError {
    fn from(e: ScanError) -> Self {
        Self::Scan(e)
    }
}

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors related to input discovery.
#[derive(Debug)]
pub enum DiscoveryError {
    /// An input path does not exist or is not accessible.
    RootNotFound { path: PathBuf },

    /// Maximum file count exceeded.
    MaxFilesExceeded { max: usize },

    /// The root of a directory walk could not be read.
    Traversal {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound { path } => {
                write!(f, "Input path '{}' does not exist", path.display())
            }
            Self::MaxFilesExceeded { max } => write!(
                f,
                "Discovery stopped: exceeded maximum of {max} files. \
                 Increase [discovery] max_files in config or narrow the inputs."
            ),
            Self::Traversal { path, source } => {
                write!(f, "Error traversing '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Traversal { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DiscoveryError> for FindingLError {
    fn from(e: DiscoveryError) -> Self {
        Self::Discovery(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for FindingLError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Config file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Config '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::FileTooLarge { .. } => None,
        }
    }
}

impl From<ConfigError> for FindingLError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for FindingL results.
pub type Result<T> = std::result::Result<T, FindingLError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_malformed_field_message_names_field_and_line() {
        let source = "x7".parse::<u64>().unwrap_err();
        let err = ScanError::MalformedField {
            file: PathBuf::from("Lresultsq27.csv"),
            line_number: 12,
            field: "s",
            index: 1,
            value: "x7".to_string(),
            source,
        };
        let msg = err.to_string();
        assert!(msg.contains("line 12"), "{msg}");
        assert!(msg.contains("field 1 (s)"), "{msg}");
        assert!(msg.contains("'x7'"), "{msg}");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_scan_error_chains_through_top_level() {
        let err: FindingLError = ScanError::Predicate {
            file: PathBuf::from("a.csv"),
            line_number: 3,
            line: "[];;;;;;".to_string(),
            source: PredicateError::EmptySequence,
        }
        .into();
        let scan = err.source().expect("top-level error has a source");
        let predicate = scan.source().expect("scan error has a source");
        assert_eq!(predicate.to_string(), "candidate sequence is empty");
    }
}
