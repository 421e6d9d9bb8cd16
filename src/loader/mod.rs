//! CSV input loading.
//!
//! Readers wrap `csv::Reader` over any [`Read`] source. Row-level problems
//! are reported to a [`DiagnosticSink`] and the row is skipped or the value
//! zeroed; only a source that cannot be opened or read fails the load.

mod attendance;
mod employees;

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{EngineError, EngineResult};

pub use attendance::{ATTENDANCE_FIELDS, AttendanceReader, load_attendance};
pub use employees::{EMPLOYEE_FIELDS, EmployeeReader, load_employees};

/// Location reported for readers built over an anonymous source.
const DEFAULT_LOCATION: &str = "input";

fn csv_reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(source)
}

fn open(path: &Path) -> EngineResult<File> {
    File::open(path).map_err(|e| unavailable(&path.display().to_string(), e))
}

fn unavailable(location: &str, reason: impl fmt::Display) -> EngineError {
    EngineError::SourceUnavailable {
        location: location.to_string(),
        reason: reason.to_string(),
    }
}

/// Turns a failed record read into either a fatal error or a skipped row.
///
/// I/O failures mean the source itself is gone; anything else (bad UTF-8,
/// say) only spoils the row.
fn record_error(
    location: &str,
    error: csv::Error,
    sink: &mut dyn DiagnosticSink,
) -> EngineResult<()> {
    if error.is_io_error() {
        return Err(unavailable(location, error));
    }
    sink.report(Diagnostic::data_quality(
        "malformed_row",
        format!("{}: unreadable row skipped: {}", location, error),
    ));
    Ok(())
}

/// Line number of a record for messages, 0 when the reader has none.
fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

/// Whether `value` is a plain non-negative decimal: digits, optionally
/// followed by a point and more digits.
fn is_plain_decimal(value: &str) -> bool {
    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (value, None),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    digits(whole) && fraction.is_none_or(digits)
}

/// Parses a money field, dropping thousands separators.
///
/// Anything that is not a plain non-negative decimal reports
/// `malformed_number` and yields zero.
pub(crate) fn parse_amount(
    raw: &str,
    field: &str,
    context: &str,
    sink: &mut dyn DiagnosticSink,
) -> Decimal {
    let cleaned = raw.replace(',', "");
    let cleaned = cleaned.trim();

    let parsed = if is_plain_decimal(cleaned) {
        Decimal::from_str(cleaned).ok()
    } else {
        None
    };

    parsed.unwrap_or_else(|| {
        sink.report(Diagnostic::data_quality(
            "malformed_number",
            format!("{}: {} '{}' is not a number; using 0", context, field, raw),
        ));
        Decimal::ZERO
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount_strips_thousands_separators() {
        let mut diagnostics = Diagnostics::new();
        assert_eq!(parse_amount("90,000", "basic_salary", "row", &mut diagnostics), dec("90000"));
        assert_eq!(parse_amount("1,500.50", "rice_subsidy", "row", &mut diagnostics), dec("1500.50"));
        assert_eq!(parse_amount("535.71", "hourly_rate", "row", &mut diagnostics), dec("535.71"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_parse_amount_rejects_non_plain_numbers() {
        let mut diagnostics = Diagnostics::new();
        for raw in ["abc", "-100", "1e5", "12.", ".5", "", "1.2.3", "+7"] {
            assert_eq!(
                parse_amount(raw, "basic_salary", "row", &mut diagnostics),
                Decimal::ZERO,
                "{raw}"
            );
        }
        assert_eq!(diagnostics.len(), 8);
        assert!(diagnostics.entries().iter().all(|d| d.code == "malformed_number"));
        assert!(diagnostics.entries()[0].message.contains("'abc'"));
    }

    #[test]
    fn test_open_missing_file_is_source_unavailable() {
        match open(Path::new("/nonexistent/employees.csv")) {
            Err(EngineError::SourceUnavailable { location, .. }) => {
                assert!(location.ends_with("employees.csv"));
            }
            other => panic!("Expected SourceUnavailable, got {:?}", other),
        }
    }
}
