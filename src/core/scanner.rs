// FindingL - core/scanner.rs
//
// Streaming classification and aggregation over a result file.
//
// The scan is a strict left-to-right fold over the lines. All mutable state
// (current tuple, sticky verdict, accumulated sequences) lives in an explicit
// `ScanState` so the state machine can be driven line by line in tests
// without any I/O. Each scan owns its state; nothing is shared between scans.

use crate::core::model::{
    CandidateSequence, LineKind, ParameterLine, ParameterTuple, ReportEvent, ScanOutcome,
    ScanStats, TupleSummary,
};
use crate::core::parser;
use crate::core::predicate;
use crate::util::error::ScanError;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

/// Options for a single scan.
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Keep each failing tuple's sequences on its `FirstFailed` event.
    pub retain_failing_sequences: bool,
}

/// Book-keeping for the tuple currently open.
#[derive(Debug)]
struct OpenTuple {
    line_number: u64,
    sequences_seen: usize,
    well_formed_sequences: usize,
}

/// Per-scan state machine.
#[derive(Debug)]
pub struct ScanState {
    source: PathBuf,
    config: ScanConfig,
    tuple: ParameterTuple,
    /// Sticky: false -> true within a tuple, never back. Starts true so no
    /// failure is reported before the first parameter line.
    has_well_formed: bool,
    sequences: Vec<CandidateSequence>,
    open: Option<OpenTuple>,
    tuples: Vec<TupleSummary>,
    stats: ScanStats,
}

impl ScanState {
    pub fn new(source: impl Into<PathBuf>, config: ScanConfig) -> Self {
        Self {
            source: source.into(),
            config,
            tuple: ParameterTuple::initial(),
            has_well_formed: true,
            sequences: Vec::new(),
            open: None,
            tuples: Vec::new(),
            stats: ScanStats::default(),
        }
    }

    /// The tuple currently in scope.
    pub fn tuple(&self) -> &ParameterTuple {
        &self.tuple
    }

    /// Whether the current tuple has seen a well-formed sequence.
    pub fn has_well_formed(&self) -> bool {
        self.has_well_formed
    }

    /// Sequences accumulated under the current tuple.
    pub fn sequences(&self) -> &[CandidateSequence] {
        &self.sequences
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Consume one line, appending any report events it triggers to `events`.
    ///
    /// Returns the line's classification. Errors are fatal for the scan.
    pub fn process_line(
        &mut self,
        line_number: u64,
        line: &str,
        events: &mut Vec<ReportEvent>,
    ) -> Result<LineKind, ScanError> {
        let fields = parser::split_fields(line);
        let kind = parser::classify_fields(&fields);

        match kind {
            LineKind::Header => {
                tracing::debug!(line = line_number, "Header line skipped");
            }
            LineKind::Parameters => {
                let params = parser::parse_parameters(&fields, &self.source, line_number)?;
                self.begin_tuple(line_number, params, events)?;
            }
            LineKind::Data => {
                let sequence = parser::parse_data(&fields, &self.source, line_number)?;
                self.observe_sequence(line_number, line, sequence)?;
            }
            LineKind::Unrecognised => {
                tracing::trace!(
                    line = line_number,
                    preview = %parser::preview(line),
                    "Unrecognised line ignored"
                );
            }
        }

        self.stats.record(kind);
        Ok(kind)
    }

    /// Close the previous tuple and open the one described by `params`.
    fn begin_tuple(
        &mut self,
        line_number: u64,
        params: ParameterLine,
        events: &mut Vec<ReportEvent>,
    ) -> Result<(), ScanError> {
        let q = params
            .p
            .checked_pow(u32::try_from(params.s).unwrap_or(u32::MAX))
            .ok_or_else(|| ScanError::ParameterOverflow {
                file: self.source.clone(),
                line_number,
                p: params.p,
                s: params.s,
            })?;

        self.close_tuple(events);

        self.tuple = ParameterTuple {
            p: params.p,
            s: params.s,
            m: self.tuple.m,
            r: params.r,
            q,
        };
        self.has_well_formed = false;

        if params.m != self.tuple.m {
            self.tuple.m = params.m;
            events.push(ReportEvent::MultiplierChanged { q, m: params.m });
            tracing::info!(q, m = params.m, line = line_number, "Multiplier bound changed");
        }

        self.sequences = Vec::new();
        self.open = Some(OpenTuple {
            line_number,
            sequences_seen: 0,
            well_formed_sequences: 0,
        });

        tracing::debug!(
            p = self.tuple.p,
            s = self.tuple.s,
            m = self.tuple.m,
            r = self.tuple.r,
            q,
            line = line_number,
            "Parameter tuple opened"
        );
        Ok(())
    }

    /// Report on the tuple in scope (if it failed) and record its summary.
    fn close_tuple(&mut self, events: &mut Vec<ReportEvent>) {
        if !self.has_well_formed {
            events.push(self.failed_event());
        }
        if let Some(open) = self.open.take() {
            self.tuples.push(TupleSummary {
                tuple: self.tuple,
                line_number: open.line_number,
                sequences_seen: open.sequences_seen,
                well_formed_sequences: open.well_formed_sequences,
                has_well_formed: self.has_well_formed,
            });
        }
    }

    fn failed_event(&mut self) -> ReportEvent {
        let seen = self.sequences.len();
        let rejected = if self.config.retain_failing_sequences {
            std::mem::take(&mut self.sequences)
        } else {
            Vec::new()
        };
        tracing::debug!(
            r = self.tuple.r,
            sequences = seen,
            "Tuple closed without a well-formed sequence"
        );
        ReportEvent::FirstFailed {
            r: self.tuple.r,
            rejected,
        }
    }

    fn observe_sequence(
        &mut self,
        line_number: u64,
        line: &str,
        sequence: CandidateSequence,
    ) -> Result<(), ScanError> {
        let ParameterTuple { p, s, m, .. } = self.tuple;
        let verdict = predicate::well_formed(sequence.as_slice(), p, s, m).map_err(|source| {
            ScanError::Predicate {
                file: self.source.clone(),
                line_number,
                line: parser::preview(line),
                source,
            }
        })?;

        tracing::trace!(line = line_number, %sequence, verdict, "Sequence evaluated");

        if verdict {
            self.has_well_formed = true;
        }
        if let Some(open) = self.open.as_mut() {
            open.sequences_seen += 1;
            if verdict {
                open.well_formed_sequences += 1;
            }
        }
        self.sequences.push(sequence);
        Ok(())
    }

    /// End of stream: emit the final verdict and return the outcome.
    pub fn finish(mut self, mut events: Vec<ReportEvent>) -> ScanOutcome {
        if self.has_well_formed {
            events.push(ReportEvent::StillWorking { r: self.tuple.r });
        }
        // Emits FirstFailed for the final tuple when it never succeeded.
        self.close_tuple(&mut events);

        tracing::info!(
            file = %self.source.display(),
            lines = self.stats.lines_read,
            tuples = self.tuples.len(),
            data_lines = self.stats.data_lines,
            "Scan complete"
        );

        ScanOutcome {
            source: self.source,
            events,
            tuples: self.tuples,
            stats: self.stats,
        }
    }
}

/// Scan a sequence of lines to completion.
///
/// Line numbers are 1-based. The first error aborts the scan; nothing
/// collected before it is returned.
pub fn scan_lines<I>(lines: I, source: &Path, config: &ScanConfig) -> Result<ScanOutcome, ScanError>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    tracing::debug!(file = %source.display(), "Scan started");

    let mut state = ScanState::new(source, config.clone());
    let mut events = Vec::new();

    for (idx, line) in lines.into_iter().enumerate() {
        let line_number = idx as u64 + 1;
        let line = line.map_err(|e| ScanError::Io {
            file: source.to_path_buf(),
            line_number,
            source: e,
        })?;
        state.process_line(line_number, &line, &mut events)?;
    }

    Ok(state.finish(events))
}

/// Scan everything readable from `reader`.
pub fn scan_reader<R: BufRead>(
    reader: R,
    source: &Path,
    config: &ScanConfig,
) -> Result<ScanOutcome, ScanError> {
    scan_lines(reader.lines(), source, config)
}

/// Scan in-memory text. Mostly useful for tests and small inputs.
pub fn scan_str(text: &str, source: &Path, config: &ScanConfig) -> Result<ScanOutcome, ScanError> {
    scan_lines(text.lines().map(|l| Ok(l.to_string())), source, config)
}
