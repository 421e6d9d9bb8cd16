//! Employee master-file reader.

use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use tracing::info;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::EngineResult;
use crate::models::{Allowances, Employee, EmployeeRecord, GovernmentIds};
use crate::store::EmployeeStore;

use super::{DEFAULT_LOCATION, csv_reader, line_of, open, parse_amount, record_error};

/// Columns every employee row must have: identifier through basic salary.
pub const EMPLOYEE_FIELDS: usize = 14;

const RICE_SUBSIDY: usize = 14;
const PHONE_ALLOWANCE: usize = 15;
const CLOTHING_ALLOWANCE: usize = 16;
const HOURLY_RATE: usize = 17;

/// Reads employees from a CSV source with a header row.
///
/// Columns, in order: identifier, last name, first name, birth date,
/// address, contact number, tax id, social insurance id, health insurance
/// id, housing fund id, employment status, position, supervisor, basic
/// salary, then optionally rice subsidy, phone allowance, clothing
/// allowance and hourly rate.
///
/// # Example
///
/// ```
/// use payroll_engine::diagnostics::Diagnostics;
/// use payroll_engine::loader::EmployeeReader;
///
/// let data = "\
/// id,last,first,birth,address,phone,tin,sss,philhealth,pagibig,status,position,supervisor,basic
/// 10001,Garcia,Manuel III,10/11/1983,Makati,966-860-270,442,44,82,69,Regular,CEO,N/A,\"90,000\"
/// ";
/// let mut diagnostics = Diagnostics::new();
/// let store = EmployeeReader::new(data.as_bytes()).read(&mut diagnostics)?;
/// assert_eq!(store.len(), 1);
/// assert!(diagnostics.is_empty());
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
pub struct EmployeeReader<R: Read> {
    reader: csv::Reader<R>,
    location: String,
}

impl<R: Read> EmployeeReader<R> {
    /// Creates a reader over any `Read` source.
    pub fn new(source: R) -> Self {
        Self {
            reader: csv_reader(source),
            location: DEFAULT_LOCATION.to_string(),
        }
    }

    /// Names the source in diagnostics and errors.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Reads every row into a store.
    ///
    /// Short rows, rows without an identifier and repeated identifiers are
    /// skipped with a diagnostic; malformed money fields become zero.
    ///
    /// # Errors
    ///
    /// Returns `SourceUnavailable` if the source fails mid-read.
    pub fn read(self, sink: &mut dyn DiagnosticSink) -> EngineResult<EmployeeStore> {
        let location = self.location;
        let mut store = EmployeeStore::new();
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

            let Some(employee) = parse_row(&record, &location, sink) else {
                continue;
            };

            let id = employee.id().to_string();
            if store.insert(employee).is_err() {
                sink.report(Diagnostic::data_quality(
                    "duplicate_employee",
                    format!(
                        "{} line {}: employee {} already loaded; row skipped",
                        location,
                        line_of(&record),
                        id
                    ),
                ));
            }
        }

        info!(location = %location, rows, employees = store.len(), "Loaded employees");
        Ok(store)
    }
}

fn parse_row(
    record: &csv::StringRecord,
    location: &str,
    sink: &mut dyn DiagnosticSink,
) -> Option<Employee> {
    let context = format!("{} line {}", location, line_of(record));

    if record.len() < EMPLOYEE_FIELDS {
        sink.report(Diagnostic::data_quality(
            "short_row",
            format!(
                "{}: expected at least {} fields, found {}; row skipped",
                context,
                EMPLOYEE_FIELDS,
                record.len()
            ),
        ));
        return None;
    }

    let text = |index: usize| record.get(index).unwrap_or_default().to_string();
    if text(0).is_empty() {
        sink.report(Diagnostic::data_quality(
            "missing_identifier",
            format!("{}: no employee identifier; row skipped", context),
        ));
        return None;
    }

    let basic_salary = parse_amount(&text(13), "basic_salary", &context, sink);
    let mut optional = |index: usize, field: &str| {
        record
            .get(index)
            .filter(|raw| !raw.is_empty())
            .map(|raw| parse_amount(raw, field, &context, &mut *sink))
    };
    let allowances = Allowances {
        rice_subsidy: optional(RICE_SUBSIDY, "rice_subsidy").unwrap_or(Decimal::ZERO),
        phone_allowance: optional(PHONE_ALLOWANCE, "phone_allowance").unwrap_or(Decimal::ZERO),
        clothing_allowance: optional(CLOTHING_ALLOWANCE, "clothing_allowance")
            .unwrap_or(Decimal::ZERO),
    };
    let hourly_rate = optional(HOURLY_RATE, "hourly_rate");

    let employee_record = EmployeeRecord {
        id: text(0),
        last_name: text(1),
        first_name: text(2),
        birth_date: text(3),
        address: text(4),
        contact_number: text(5),
        government_ids: GovernmentIds {
            tax_id: text(6),
            social_insurance_id: text(7),
            health_insurance_id: text(8),
            housing_fund_id: text(9),
        },
        employment_status: text(10),
        position: text(11),
        supervisor: text(12),
        basic_salary,
        allowances,
        hourly_rate,
    };

    match Employee::new(employee_record) {
        Ok(employee) => Some(employee),
        Err(error) => {
            sink.report(Diagnostic::data_quality(
                "invalid_employee",
                format!("{}: {}; row skipped", context, error),
            ));
            None
        }
    }
}

/// Opens `path` and reads it with [`EmployeeReader`].
///
/// # Errors
///
/// Returns `SourceUnavailable` if the file cannot be opened or read.
pub fn load_employees<P: AsRef<Path>>(
    path: P,
    sink: &mut dyn DiagnosticSink,
) -> EngineResult<EmployeeStore> {
    let path = path.as_ref();
    let file = open(path)?;
    EmployeeReader::new(file)
        .with_location(path.display().to_string())
        .read(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticKind, Diagnostics};
    use crate::error::EngineError;
    use std::str::FromStr;

    const HEADER: &str = "Employee #,Last Name,First Name,Birthday,Address,Phone Number,\
        TIN #,SSS #,Philhealth #,Pag-ibig #,Status,Position,Immediate Supervisor,\
        Basic Salary,Rice Subsidy,Phone Allowance,Clothing Allowance,Hourly Rate";

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn read(rows: &[&str]) -> (EmployeeStore, Diagnostics) {
        let data = format!("{}\n{}\n", HEADER, rows.join("\n"));
        let mut diagnostics = Diagnostics::new();
        let store = EmployeeReader::new(data.as_bytes())
            .with_location("employees.csv")
            .read(&mut diagnostics)
            .unwrap();
        (store, diagnostics)
    }

    #[test]
    fn test_reads_full_row() {
        let (store, diagnostics) = read(&[
            "10001,Garcia,Manuel III,10/11/1983,\"Valero Carpark Building, Makati City\",\
             966-860-270,442-605-657-000,44-4506057-3,820126853951,691295330870,\
             Regular,Chief Executive Officer,N/A,\"90,000\",\"1,500\",\"2,000\",\"1,000\",535.71",
        ]);

        assert!(diagnostics.is_empty());
        let employee = store.get("10001").unwrap();
        assert_eq!(employee.full_name(), "Manuel III Garcia");
        assert_eq!(employee.address(), "Valero Carpark Building, Makati City");
        assert_eq!(employee.government_ids().tax_id, "442-605-657-000");
        assert_eq!(employee.government_ids().housing_fund_id, "691295330870");
        assert_eq!(employee.employment_status(), "Regular");
        assert_eq!(employee.position(), "Chief Executive Officer");

        let compensation = employee.compensation();
        assert_eq!(compensation.basic_salary, dec("90000"));
        assert_eq!(compensation.allowances.total(), Some(dec("4500")));
        assert_eq!(compensation.hourly_rate, Some(dec("535.71")));
    }

    #[test]
    fn test_optional_columns_default() {
        let (store, diagnostics) =
            read(&["10002,Lim,Antonio,06/19/1988,Pasig,171-867-411,683,52,33,66,Regular,COO,N/A,60000"]);

        assert!(diagnostics.is_empty());
        let compensation = store.get("10002").unwrap().compensation();
        assert_eq!(compensation.basic_salary, dec("60000"));
        assert_eq!(compensation.allowances.total(), Some(Decimal::ZERO));
        assert_eq!(compensation.hourly_rate, None);
    }

    #[test]
    fn test_short_row_skipped() {
        let (store, diagnostics) = read(&["10003,Aquino,Bianca"]);

        assert!(store.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.entries()[0].kind, DiagnosticKind::DataQuality);
        assert_eq!(diagnostics.entries()[0].code, "short_row");
        assert!(diagnostics.entries()[0].message.contains("employees.csv line 2"));
    }

    #[test]
    fn test_malformed_salary_becomes_zero() {
        let (store, diagnostics) =
            read(&["10004,Reyes,Isabella,,,,,,,,Regular,CFO,N/A,sixty thousand,,,,n/a"]);

        let compensation = store.get("10004").unwrap().compensation();
        assert_eq!(compensation.basic_salary, Decimal::ZERO);
        assert_eq!(compensation.hourly_rate, Some(Decimal::ZERO));

        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.entries().iter().all(|d| d.code == "malformed_number"));
        assert!(diagnostics.entries()[0].message.contains("basic_salary"));
        assert!(diagnostics.entries()[1].message.contains("hourly_rate"));
    }

    #[test]
    fn test_missing_identifier_skipped() {
        let (store, diagnostics) = read(&[",Hernandez,Eduard,,,,,,,,Regular,Manager,N/A,52670"]);

        assert!(store.is_empty());
        assert!(diagnostics.contains_code("missing_identifier"));
    }

    #[test]
    fn test_duplicate_row_keeps_first() {
        let (store, diagnostics) = read(&[
            "10005,Hernandez,Eduard,,,,,,,,Regular,Manager,N/A,52670",
            "10005,Villanueva,Andrea,,,,,,,,Regular,Manager,N/A,52670",
        ]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("10005").unwrap().last_name(), "Hernandez");
        assert!(diagnostics.contains_code("duplicate_employee"));
        assert!(diagnostics.entries()[0].message.contains("line 3"));
    }

    #[test]
    fn test_bad_rows_do_not_stop_the_load() {
        let (store, diagnostics) = read(&[
            "short",
            "10006,San Jose,Brad,,,,,,,,Regular,Team Leader,N/A,42975",
            ",,,,,,,,,,,,,",
            "10007,Romualdez,Alice,,,,,,,,Probationary,HR Rank and File,N/A,\"22,500\"",
        ]);

        let ids: Vec<&str> = store.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec!["10006", "10007"]);
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_load_missing_file_is_source_unavailable() {
        let mut diagnostics = Diagnostics::new();
        match load_employees("/nonexistent/employees.csv", &mut diagnostics) {
            Err(EngineError::SourceUnavailable { location, .. }) => {
                assert_eq!(location, "/nonexistent/employees.csv");
            }
            other => panic!("Expected SourceUnavailable, got {:?}", other),
        }
    }
}
