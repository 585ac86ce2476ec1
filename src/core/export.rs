// FindingL - core/export.rs
//
// CSV and JSON export of scan outcomes.
// Core layer: writes to any Write trait object.

use crate::core::model::ScanOutcome;
use crate::util::constants;
use crate::util::error::ExportError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Export one row per parameter tuple across all outcomes.
///
/// Writes: source, p, s, m, r, q, line, sequences, well_formed_sequences, verdict
pub fn export_csv<W: Write>(
    outcomes: &[ScanOutcome],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: export_path.to_path_buf(),
        source,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record([
            "source",
            "p",
            "s",
            "m",
            "r",
            "q",
            "line",
            "sequences",
            "well_formed_sequences",
            "verdict",
        ])
        .map_err(csv_err)?;

    let mut count = 0;
    for outcome in outcomes {
        let source = outcome.source.display().to_string();
        for summary in &outcome.tuples {
            let t = &summary.tuple;
            let verdict = if summary.has_well_formed {
                "well-formed"
            } else {
                "failed"
            };
            let record = [
                source.clone(),
                t.p.to_string(),
                t.s.to_string(),
                t.m.to_string(),
                t.r.to_string(),
                t.q.to_string(),
                summary.line_number.to_string(),
                summary.sequences_seen.to_string(),
                summary.well_formed_sequences.to_string(),
                verdict.to_string(),
            ];
            csv_writer.write_record(&record).map_err(csv_err)?;
            count += 1;
        }
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Shape of the JSON export document.
#[derive(Debug, Serialize)]
struct ExportDocument<'a> {
    tool: &'static str,
    version: &'static str,
    generated_at: DateTime<Utc>,
    scans: &'a [ScanOutcome],
}

/// Export the full outcomes (events, tuple summaries, line stats) as JSON.
pub fn export_json<W: Write>(
    outcomes: &[ScanOutcome],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let document = ExportDocument {
        tool: constants::APP_NAME,
        version: constants::APP_VERSION,
        generated_at: Utc::now(),
        scans: outcomes,
    };
    serde_json::to_writer_pretty(writer, &document).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(outcomes.len())
}
