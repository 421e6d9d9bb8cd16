//! Attendance log reader.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::config::InputFormat;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::EngineResult;
use crate::models::AttendanceEvent;

use super::{DEFAULT_LOCATION, csv_reader, line_of, open, record_error};

/// Columns every attendance row must have.
pub const ATTENDANCE_FIELDS: usize = 4;

/// Reads attendance events from a CSV source with a header row.
///
/// Columns, in order: employee identifier, date, log-in time, log-out
/// time. Dates use the configured format; times are passed through for the
/// aggregator to interpret.
///
/// # Example
///
/// ```
/// use payroll_engine::config::InputFormat;
/// use payroll_engine::diagnostics::Diagnostics;
/// use payroll_engine::loader::AttendanceReader;
///
/// let data = "employee,date,in,out\n10001,03/06/2024,8:00,17:00\n";
/// let mut diagnostics = Diagnostics::new();
/// let events = AttendanceReader::new(data.as_bytes(), &InputFormat::default())
///     .read(&mut diagnostics)?;
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].period_key().to_string(), "06/2024");
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
pub struct AttendanceReader<R: Read> {
    reader: csv::Reader<R>,
    location: String,
    date_format: String,
}

impl<R: Read> AttendanceReader<R> {
    /// Creates a reader over any `Read` source.
    pub fn new(source: R, format: &InputFormat) -> Self {
        Self {
            reader: csv_reader(source),
            location: DEFAULT_LOCATION.to_string(),
            date_format: format.date_format.clone(),
        }
    }

    /// Names the source in diagnostics and errors.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Reads every row into events, in file order.
    ///
    /// Short rows, rows without an identifier and rows with an unparsable
    /// date are skipped with a diagnostic.
    ///
    /// # Errors
    ///
    /// Returns `SourceUnavailable` if the source fails mid-read.
    pub fn read(self, sink: &mut dyn DiagnosticSink) -> EngineResult<Vec<AttendanceEvent>> {
        let location = self.location;
        let mut events = Vec::new();
        let mut rows = 0usize;

        for result in self.reader.into_records() {
            let record = match result {
                Ok(record) => record,
                Err(error) => {
                    record_error(&location, error, sink)?;
                    continue;
                }
            };
            rows += 1;

            if let Some(event) = parse_row(&record, &location, &self.date_format, sink) {
                events.push(event);
            }
        }

        info!(location = %location, rows, events = events.len(), "Loaded attendance");
        Ok(events)
    }
}

fn parse_row(
    record: &csv::StringRecord,
    location: &str,
    date_format: &str,
    sink: &mut dyn DiagnosticSink,
) -> Option<AttendanceEvent> {
    let context = format!("{} line {}", location, line_of(record));

    if record.len() < ATTENDANCE_FIELDS {
        sink.report(Diagnostic::data_quality(
            "short_row",
            format!(
                "{}: expected {} fields, found {}; row skipped",
                context,
                ATTENDANCE_FIELDS,
                record.len()
            ),
        ));
        return None;
    }

    let employee_id = &record[0];
    if employee_id.is_empty() {
        sink.report(Diagnostic::data_quality(
            "missing_identifier",
            format!("{}: no employee identifier; row skipped", context),
        ));
        return None;
    }

    let date = match NaiveDate::parse_from_str(&record[1], date_format) {
        Ok(date) => date,
        Err(_) => {
            sink.report(Diagnostic::data_quality(
                "unparsable_date",
                format!(
                    "{}: date '{}' does not match '{}'; row skipped",
                    context, &record[1], date_format
                ),
            ));
            return None;
        }
    };

    Some(AttendanceEvent {
        employee_id: employee_id.to_string(),
        date,
        log_in: record[2].to_string(),
        log_out: record[3].to_string(),
    })
}

/// Opens `path` and reads it with [`AttendanceReader`].
///
/// # Errors
///
/// Returns `SourceUnavailable` if the file cannot be opened or read.
pub fn load_attendance<P: AsRef<Path>>(
    path: P,
    format: &InputFormat,
    sink: &mut dyn DiagnosticSink,
) -> EngineResult<Vec<AttendanceEvent>> {
    let path = path.as_ref();
    let file = open(path)?;
    AttendanceReader::new(file, format)
        .with_location(path.display().to_string())
        .read(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::error::EngineError;

    const HEADER: &str = "Employee #,Date,Log In,Log Out";

    fn read_with(format: &InputFormat, rows: &[&str]) -> (Vec<AttendanceEvent>, Diagnostics) {
        let data = format!("{}\n{}\n", HEADER, rows.join("\n"));
        let mut diagnostics = Diagnostics::new();
        let events = AttendanceReader::new(data.as_bytes(), format)
            .with_location("attendance.csv")
            .read(&mut diagnostics)
            .unwrap();
        (events, diagnostics)
    }

    fn read(rows: &[&str]) -> (Vec<AttendanceEvent>, Diagnostics) {
        read_with(&InputFormat::default(), rows)
    }

    #[test]
    fn test_reads_rows_in_order() {
        let (events, diagnostics) = read(&[
            "10001, 03/06/2024, 8:59, 18:31",
            "10002,04/06/2024,10:35,19:44",
        ]);

        assert!(diagnostics.is_empty());
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].employee_id, "10001");
        assert_eq!(events[0].date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(events[0].log_in, "8:59");
        assert_eq!(events[1].log_out, "19:44");
    }

    #[test]
    fn test_unparsable_date_skipped() {
        let (events, diagnostics) = read(&["10001,2024-06-03,8:00,17:00", "10001,31/02/2024,8:00,17:00"]);

        assert!(events.is_empty());
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.entries().iter().all(|d| d.code == "unparsable_date"));
        assert!(diagnostics.entries()[0].message.contains("attendance.csv line 2"));
    }

    #[test]
    fn test_configured_date_format() {
        let format = InputFormat {
            date_format: "%m/%d/%Y".to_string(),
        };
        let (events, diagnostics) = read_with(&format, &["10001,06/03/2024,8:00,17:00"]);

        assert!(diagnostics.is_empty());
        assert_eq!(events[0].date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
    }

    #[test]
    fn test_short_and_blank_rows_skipped() {
        let (events, diagnostics) = read(&[
            "10001,03/06/2024,8:00",
            ",03/06/2024,8:00,17:00",
            "10001,03/06/2024,8:00,17:00",
        ]);

        assert_eq!(events.len(), 1);
        let codes: Vec<&str> = diagnostics.entries().iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["short_row", "missing_identifier"]);
    }

    #[test]
    fn test_bad_times_are_left_to_the_aggregator() {
        let (events, diagnostics) = read(&["10001,03/06/2024,late,17:00"]);

        assert!(diagnostics.is_empty());
        assert_eq!(events[0].log_in, "late");
    }

    #[test]
    fn test_load_missing_file_is_source_unavailable() {
        let mut diagnostics = Diagnostics::new();
        let result = load_attendance(
            "/nonexistent/attendance.csv",
            &InputFormat::default(),
            &mut diagnostics,
        );

        assert!(matches!(result, Err(EngineError::SourceUnavailable { .. })));
    }
}
