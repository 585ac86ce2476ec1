// FindingL - core/parser.rs
//
// Line classification and field parsing for the experiment's `;`-delimited
// result files. Core layer: works on borrowed line text only, never touches
// the filesystem.
//
// A line is one of:
//   - header:     field 6 longer than 8 characters
//   - parameters: field 1 (the exponent s) non-empty; fields 0..=3 are p, s, m, r
//   - data:       field 0 longer than 1 character; a bracketed integer list
//   - anything else is tolerated and ignored (blank lines, stray markers)
//
// Missing trailing fields count as empty, so short lines classify instead of
// failing.

use crate::core::model::{CandidateSequence, LineKind, ParameterLine};
use crate::util::constants;
use crate::util::error::ScanError;
use std::path::Path;
use std::str::FromStr;

/// Split a raw line into its fields after trimming surrounding whitespace.
pub fn split_fields(line: &str) -> Vec<&str> {
    line.trim().split(constants::FIELD_DELIMITER).collect()
}

/// Field `index`, or "" when the line is too short to have it.
fn field<'a>(fields: &[&'a str], index: usize) -> &'a str {
    fields.get(index).copied().unwrap_or("")
}

/// Classify a split line. Priority: header, parameters, data, unrecognised.
pub fn classify_fields(fields: &[&str]) -> LineKind {
    if field(fields, constants::HEADER_FIELD_INDEX).chars().count()
        > constants::HEADER_FIELD_MIN_LEN
    {
        LineKind::Header
    } else if !field(fields, constants::S_FIELD_INDEX).is_empty() {
        LineKind::Parameters
    } else if field(fields, constants::SEQUENCE_FIELD_INDEX).chars().count()
        > constants::SEQUENCE_FIELD_MIN_LEN
    {
        LineKind::Data
    } else {
        LineKind::Unrecognised
    }
}

/// Convenience wrapper: split and classify in one step.
pub fn classify_line(line: &str) -> LineKind {
    classify_fields(&split_fields(line))
}

/// Parse p, s, m and r from a parameter line's fields.
pub fn parse_parameters(
    fields: &[&str],
    file: &Path,
    line_number: u64,
) -> Result<ParameterLine, ScanError> {
    Ok(ParameterLine {
        p: parse_field(fields, constants::P_FIELD_INDEX, "p", file, line_number)?,
        s: parse_field(fields, constants::S_FIELD_INDEX, "s", file, line_number)?,
        m: parse_field(fields, constants::M_FIELD_INDEX, "m", file, line_number)?,
        r: parse_field(fields, constants::R_FIELD_INDEX, "r", file, line_number)?,
    })
}

/// Parse a bracketed, comma-separated integer list such as `[1, 2, 4]`.
///
/// Brackets and spaces are dropped and empty tokens skipped, so `[]`,
/// `[1,,2]` and `1, 2` are all accepted. Anything else that is not an
/// unsigned integer is a malformed field.
pub fn parse_sequence(
    text: &str,
    file: &Path,
    line_number: u64,
) -> Result<CandidateSequence, ScanError> {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ' '))
        .collect();

    let mut values = Vec::new();
    for token in cleaned.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let value = token
            .parse::<u64>()
            .map_err(|source| ScanError::MalformedField {
                file: file.to_path_buf(),
                line_number,
                field: "L",
                index: constants::SEQUENCE_FIELD_INDEX,
                value: token.to_string(),
                source,
            })?;
        values.push(value);
    }
    Ok(CandidateSequence::new(values))
}

/// Parse the data line's sequence field.
pub fn parse_data(
    fields: &[&str],
    file: &Path,
    line_number: u64,
) -> Result<CandidateSequence, ScanError> {
    parse_sequence(
        field(fields, constants::SEQUENCE_FIELD_INDEX),
        file,
        line_number,
    )
}

fn parse_field<T>(
    fields: &[&str],
    index: usize,
    name: &'static str,
    file: &Path,
    line_number: u64,
) -> Result<T, ScanError>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    let raw = field(fields, index);
    raw.trim()
        .parse::<T>()
        .map_err(|source| ScanError::MalformedField {
            file: file.to_path_buf(),
            line_number,
            field: name,
            index,
            value: raw.to_string(),
            source,
        })
}

/// Truncate a line for inclusion in error messages and debug output.
pub fn preview(line: &str) -> String {
    line.chars().take(constants::DEBUG_MAX_LINE_PREVIEW).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn file() -> PathBuf {
        PathBuf::from("Lresultsq27.csv")
    }

    #[test]
    fn test_classify_header_line() {
        assert_eq!(
            classify_line("p;s;m;r;count;seconds;description"),
            LineKind::Header
        );
    }

    #[test]
    fn test_header_wins_over_parameters() {
        // Field 1 is non-empty but field 6 marks the header.
        assert_eq!(classify_line("3;3;2;1;;;wellformed"), LineKind::Header);
        // Exactly eight characters is not a header.
        assert_eq!(classify_line("3;3;2;1;;;12345678"), LineKind::Parameters);
    }

    #[test]
    fn test_classify_parameter_line() {
        assert_eq!(classify_line("3;3;2;1;;;"), LineKind::Parameters);
        assert_eq!(classify_line("3;3;2;1"), LineKind::Parameters);
    }

    #[test]
    fn test_classify_data_line() {
        assert_eq!(classify_line("[1, 3, 9];;;;;;"), LineKind::Data);
        assert_eq!(classify_line("[]"), LineKind::Data);
    }

    #[test]
    fn test_short_and_blank_lines_are_unrecognised() {
        assert_eq!(classify_line(""), LineKind::Unrecognised);
        assert_eq!(classify_line("   \t"), LineKind::Unrecognised);
        assert_eq!(classify_line("x;;;;;;"), LineKind::Unrecognised);
        assert_eq!(classify_line(";"), LineKind::Unrecognised);
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed_before_split() {
        assert_eq!(split_fields("  3;3;2;1;;;\r\n"), vec!["3", "3", "2", "1", "", "", ""]);
    }

    #[test]
    fn test_parse_parameters() {
        let fields = split_fields("3; 3 ;2;-4;;;");
        let params = parse_parameters(&fields, &file(), 2).unwrap();
        assert_eq!(
            params,
            ParameterLine {
                p: 3,
                s: 3,
                m: 2,
                r: -4
            }
        );
    }

    #[test]
    fn test_parse_parameters_reports_bad_field() {
        let fields = split_fields("3;3;two;1;;;");
        let err = parse_parameters(&fields, &file(), 9).unwrap_err();
        match err {
            ScanError::MalformedField {
                line_number,
                field,
                index,
                value,
                ..
            } => {
                assert_eq!(line_number, 9);
                assert_eq!(field, "m");
                assert_eq!(index, 2);
                assert_eq!(value, "two");
            }
            other => panic!("expected MalformedField, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_parameters_missing_field_is_malformed() {
        let fields = split_fields("3;3;2");
        let err = parse_parameters(&fields, &file(), 4).unwrap_err();
        assert!(matches!(
            err,
            ScanError::MalformedField { field: "r", index: 3, .. }
        ));
    }

    #[test]
    fn test_parse_sequence_ignores_brackets_spaces_and_empty_tokens() {
        let seq = parse_sequence("[1, 3,, 9 ,]", &file(), 1).unwrap();
        assert_eq!(seq.values, vec![1, 3, 9]);
        assert!(parse_sequence("[]", &file(), 1).unwrap().is_empty());
    }

    #[test]
    fn test_parse_sequence_rejects_non_integers() {
        let err = parse_sequence("[1, x, 3]", &file(), 5).unwrap_err();
        assert!(matches!(
            err,
            ScanError::MalformedField { field: "L", line_number: 5, .. }
        ));
        assert!(parse_sequence("[1, -3]", &file(), 5).is_err());
    }

    #[test]
    fn test_preview_is_bounded() {
        let long = "9".repeat(constants::DEBUG_MAX_LINE_PREVIEW * 2);
        assert_eq!(
            preview(&long).chars().count(),
            constants::DEBUG_MAX_LINE_PREVIEW
        );
    }
}
