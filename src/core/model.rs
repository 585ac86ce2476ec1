// FindingL - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no platform
// dependencies. These types are the shared vocabulary across all layers.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

// =============================================================================
// Candidate sequence
// =============================================================================

/// An ordered list of positive integers parsed from a data line.
///
/// The predicate treats it as a set; the literal order is kept so failing
/// sequences can be printed back exactly as they were read.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct CandidateSequence {
    pub values: Vec<u64>,
}

impl CandidateSequence {
    pub fn new(values: Vec<u64>) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<u64>> for CandidateSequence {
    fn from(values: Vec<u64>) -> Self {
        Self { values }
    }
}

impl fmt::Display for CandidateSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str("]")
    }
}

// =============================================================================
// Parameter tuple
// =============================================================================

/// The (p, s, m, r) grouping that scopes a batch of candidate sequences,
/// together with the derived `q = p^s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterTuple {
    /// Prime base.
    pub p: u64,
    /// Exponent.
    pub s: u64,
    /// Multiplier bound. Persists across parameter lines until changed.
    pub m: u64,
    /// Run identifier.
    pub r: i64,
    /// `p^s`.
    pub q: u64,
}

impl ParameterTuple {
    /// State before any parameter line has been read.
    pub fn initial() -> Self {
        Self {
            p: 1,
            s: 1,
            m: 1,
            r: 1,
            q: 1,
        }
    }
}

impl Default for ParameterTuple {
    fn default() -> Self {
        Self::initial()
    }
}

/// Raw values read from a parameter line, before `q` is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterLine {
    pub p: u64,
    pub s: u64,
    pub m: u64,
    pub r: i64,
}

// =============================================================================
// Line classification
// =============================================================================

/// The role a single log line plays, decided in this priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Header,
    Parameters,
    Data,
    Unrecognised,
}

impl LineKind {
    pub fn label(&self) -> &'static str {
        match self {
            LineKind::Header => "header",
            LineKind::Parameters => "parameters",
            LineKind::Data => "data",
            LineKind::Unrecognised => "unrecognised",
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Report events
// =============================================================================

/// A report emitted while scanning. `Display` yields the literal report line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportEvent {
    /// The multiplier bound changed on a parameter line.
    MultiplierChanged { q: u64, m: u64 },

    /// A tuple closed without any well-formed sequence.
    ///
    /// `rejected` holds that tuple's sequences when retention is enabled and
    /// is empty otherwise.
    FirstFailed {
        r: i64,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        rejected: Vec<CandidateSequence>,
    },

    /// The stream ended and the final tuple did see a well-formed sequence.
    StillWorking { r: i64 },
}

impl ReportEvent {
    /// True for the two events that carry a tuple verdict.
    pub fn is_verdict(&self) -> bool {
        !matches!(self, ReportEvent::MultiplierChanged { .. })
    }
}

impl fmt::Display for ReportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportEvent::MultiplierChanged { q, m } => write!(f, "q {q} m {m}"),
            ReportEvent::FirstFailed { r, .. } => write!(f, "First failed r {r}"),
            ReportEvent::StillWorking { r } => write!(f, "still working r {r}"),
        }
    }
}

// =============================================================================
// Scan results
// =============================================================================

/// Aggregate for one parameter tuple, closed when the next parameter line
/// arrives or the stream ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TupleSummary {
    pub tuple: ParameterTuple,
    /// Line number of the parameter line that opened the tuple.
    pub line_number: u64,
    pub sequences_seen: usize,
    pub well_formed_sequences: usize,
    pub has_well_formed: bool,
}

/// Line counts for a completed scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub lines_read: u64,
    pub header_lines: u64,
    pub parameter_lines: u64,
    pub data_lines: u64,
    pub unrecognised_lines: u64,
}

impl ScanStats {
    pub fn record(&mut self, kind: LineKind) {
        self.lines_read += 1;
        match kind {
            LineKind::Header => self.header_lines += 1,
            LineKind::Parameters => self.parameter_lines += 1,
            LineKind::Data => self.data_lines += 1,
            LineKind::Unrecognised => self.unrecognised_lines += 1,
        }
    }
}

/// Everything a completed scan of one input produced.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub source: PathBuf,
    pub events: Vec<ReportEvent>,
    pub tuples: Vec<TupleSummary>,
    pub stats: ScanStats,
}

impl ScanOutcome {
    /// The verdict events only (`First failed` / `still working`).
    pub fn verdicts(&self) -> impl Iterator<Item = &ReportEvent> {
        self.events.iter().filter(|e| e.is_verdict())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_lines_are_literal() {
        assert_eq!(
            ReportEvent::MultiplierChanged { q: 27, m: 5 }.to_string(),
            "q 27 m 5"
        );
        assert_eq!(
            ReportEvent::FirstFailed {
                r: 7,
                rejected: vec![CandidateSequence::new(vec![1, 4])],
            }
            .to_string(),
            "First failed r 7"
        );
        assert_eq!(
            ReportEvent::StillWorking { r: -2 }.to_string(),
            "still working r -2"
        );
    }

    #[test]
    fn test_sequence_display_matches_bracketed_input() {
        assert_eq!(CandidateSequence::new(vec![1, 2, 4]).to_string(), "[1, 2, 4]");
        assert_eq!(CandidateSequence::default().to_string(), "[]");
    }

    #[test]
    fn test_stats_record_counts_each_kind() {
        let mut stats = ScanStats::default();
        for kind in [
            LineKind::Header,
            LineKind::Parameters,
            LineKind::Data,
            LineKind::Data,
            LineKind::Unrecognised,
        ] {
            stats.record(kind);
        }
        assert_eq!(stats.lines_read, 5);
        assert_eq!(stats.data_lines, 2);
        assert_eq!(stats.header_lines, 1);
    }

    #[test]
    fn test_event_json_is_tagged() {
        let json = serde_json::to_string(&ReportEvent::StillWorking { r: 3 }).unwrap();
        assert_eq!(json, r#"{"kind":"still_working","r":3}"#);
    }
}
