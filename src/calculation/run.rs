//! Batch payroll over an employee store and aggregated hours.

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::EngineResult;
use crate::models::{PayslipRecord, PeriodKey};
use crate::store::EmployeeStore;

use super::attendance::PeriodHours;
use super::payroll::PayrollCalculator;

/// One payroll pass: a calculator applied to the employees of a store.
///
/// Lookups that find nothing to pay are reported to the sink as
/// `LookupMiss` diagnostics and skipped.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{AttendanceAggregator, PayrollCalculator, PayrollRun};
/// use payroll_engine::diagnostics::Diagnostics;
/// use payroll_engine::models::{AttendanceEvent, Employee, EmployeeRecord, PeriodKey};
/// use payroll_engine::store::EmployeeStore;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let mut store = EmployeeStore::new();
/// store.insert(Employee::new(EmployeeRecord {
///     id: "10001".to_string(),
///     basic_salary: Decimal::new(16800, 0),
///     ..Default::default()
/// })?)?;
///
/// let events = vec![AttendanceEvent {
///     employee_id: "10001".to_string(),
///     date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
///     log_in: "8:00".to_string(),
///     log_out: "16:00".to_string(),
/// }];
///
/// let mut diagnostics = Diagnostics::new();
/// let hours = AttendanceAggregator::aggregate(&events, &mut diagnostics);
/// let calculator = PayrollCalculator::default();
/// let period: PeriodKey = "06/2024".parse()?;
///
/// let payslips = PayrollRun::new(&calculator, &store).run(period, &hours, &mut diagnostics)?;
/// assert_eq!(payslips.len(), 1);
/// assert_eq!(payslips[0].gross_pay(), Decimal::new(800, 0));
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PayrollRun<'a> {
    calculator: &'a PayrollCalculator,
    store: &'a EmployeeStore,
}

impl<'a> PayrollRun<'a> {
    /// Creates a run over `store` using `calculator`.
    pub fn new(calculator: &'a PayrollCalculator, store: &'a EmployeeStore) -> Self {
        Self { calculator, store }
    }

    /// Computes the payslip for one employee and period.
    ///
    /// Returns `Ok(None)` after reporting a `LookupMiss` when the employee
    /// is unknown or has no hours in the period. Hours above the monthly
    /// maximum are capped and reported.
    pub fn payslip_for(
        &self,
        employee_id: &str,
        period: PeriodKey,
        hours: &PeriodHours,
        sink: &mut dyn DiagnosticSink,
    ) -> EngineResult<Option<PayslipRecord>> {
        let Some(employee) = self.store.get(employee_id) else {
            sink.report(Diagnostic::lookup_miss(
                "unknown_employee",
                format!("employee {} is not on file", employee_id),
            ));
            return Ok(None);
        };

        let worked = match hours.get(employee_id, period) {
            Some(worked) if worked > Decimal::ZERO => worked,
            _ => {
                sink.report(Diagnostic::lookup_miss(
                    "no_hours",
                    format!("employee {} has no hours in {}", employee_id, period),
                ));
                return Ok(None);
            }
        };

        let max = self.calculator.config().hours.max_monthly_hours;
        let capped = worked.min(max);
        if capped < worked {
            debug!(employee_id, period = %period, worked = %worked, max = %max, "Capping hours");
            sink.report(Diagnostic::data_quality(
                "hours_capped",
                format!(
                    "employee {} worked {} hours in {}; capped at {}",
                    employee_id, worked, period, max
                ),
            ));
        }

        self.calculator.payslip(employee, period, capped).map(Some)
    }

    /// Computes payslips for every stored employee with hours in `period`,
    /// in identifier order.
    ///
    /// Attendance in the period for identifiers not in the store is
    /// reported as `unknown_employee` first.
    pub fn run(
        &self,
        period: PeriodKey,
        hours: &PeriodHours,
        sink: &mut dyn DiagnosticSink,
    ) -> EngineResult<Vec<PayslipRecord>> {
        for employee_id in hours.employees_in(period) {
            if !self.store.contains(employee_id) {
                sink.report(Diagnostic::lookup_miss(
                    "unknown_employee",
                    format!(
                        "attendance in {} for employee {} who is not on file",
                        period, employee_id
                    ),
                ));
            }
        }

        let mut payslips = Vec::new();
        for employee in self.store.iter() {
            if let Some(payslip) = self.payslip_for(employee.id(), period, hours, sink)? {
                payslips.push(payslip);
            }
        }

        let total_net = payslips
            .iter()
            .fold(Decimal::ZERO, |total, p| total.saturating_add(p.net_pay()));
        info!(
            period = %period,
            employees = self.store.len(),
            payslips = payslips.len(),
            total_net_pay = %total_net,
            "Payroll run complete"
        );

        Ok(payslips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::AttendanceAggregator;
    use crate::diagnostics::{DiagnosticKind, Diagnostics};
    use crate::models::{AttendanceEvent, Employee, EmployeeRecord};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn period(s: &str) -> PeriodKey {
        s.parse().unwrap()
    }

    fn create_test_store() -> EmployeeStore {
        let mut store = EmployeeStore::new();
        for (id, salary) in [("10001", "90000"), ("10002", "60000"), ("10003", "16800")] {
            store
                .insert(
                    Employee::new(EmployeeRecord {
                        id: id.to_string(),
                        basic_salary: dec(salary),
                        ..Default::default()
                    })
                    .unwrap(),
                )
                .unwrap();
        }
        store
    }

    fn days(id: &str, count: u32, log_in: &str, log_out: &str) -> Vec<AttendanceEvent> {
        (1..=count)
            .map(|day| AttendanceEvent {
                employee_id: id.to_string(),
                date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
                log_in: log_in.to_string(),
                log_out: log_out.to_string(),
            })
            .collect()
    }

    fn aggregate(events: &[AttendanceEvent]) -> PeriodHours {
        let mut diagnostics = Diagnostics::new();
        AttendanceAggregator::aggregate(events, &mut diagnostics)
    }

    /// RUN-001: full month for a 16800 salary
    #[test]
    fn test_run_001_full_month() {
        let store = create_test_store();
        let calculator = PayrollCalculator::default();
        let hours = aggregate(&days("10003", 21, "8:00", "16:00"));
        let mut diagnostics = Diagnostics::new();

        let payslip = PayrollRun::new(&calculator, &store)
            .payslip_for("10003", period("06/2024"), &hours, &mut diagnostics)
            .unwrap()
            .unwrap();

        assert_eq!(payslip.hours_worked(), dec("168"));
        assert_eq!(payslip.gross_pay(), dec("16800"));
        assert_eq!(payslip.net_pay(), dec("15692"));
        assert!(diagnostics.is_empty());
    }

    /// RUN-002: unknown employee is a lookup miss
    #[test]
    fn test_run_002_unknown_employee() {
        let store = create_test_store();
        let calculator = PayrollCalculator::default();
        let hours = aggregate(&days("99999", 2, "8:00", "16:00"));
        let mut diagnostics = Diagnostics::new();

        let result = PayrollRun::new(&calculator, &store)
            .payslip_for("99999", period("06/2024"), &hours, &mut diagnostics)
            .unwrap();

        assert!(result.is_none());
        assert_eq!(diagnostics.entries()[0].kind, DiagnosticKind::LookupMiss);
        assert_eq!(diagnostics.entries()[0].code, "unknown_employee");
    }

    /// RUN-003: no hours in the period is a lookup miss
    #[test]
    fn test_run_003_no_hours() {
        let store = create_test_store();
        let calculator = PayrollCalculator::default();
        let hours = aggregate(&days("10001", 2, "8:00", "16:00"));
        let mut diagnostics = Diagnostics::new();

        let run = PayrollRun::new(&calculator, &store);
        assert!(run
            .payslip_for("10001", period("07/2024"), &hours, &mut diagnostics)
            .unwrap()
            .is_none());
        assert!(diagnostics.contains_code("no_hours"));
    }

    #[test]
    fn test_zero_hour_bucket_is_a_lookup_miss() {
        let store = create_test_store();
        let calculator = PayrollCalculator::default();
        let hours = aggregate(&days("10001", 1, "17:00", "8:00"));
        let mut diagnostics = Diagnostics::new();

        let result = PayrollRun::new(&calculator, &store)
            .payslip_for("10001", period("06/2024"), &hours, &mut diagnostics)
            .unwrap();

        assert!(result.is_none());
        assert!(diagnostics.contains_code("no_hours"));
    }

    #[test]
    fn test_hours_are_capped_and_reported() {
        let store = create_test_store();
        let calculator = PayrollCalculator::default();
        let hours = aggregate(&days("10003", 22, "7:00", "17:00"));
        let mut diagnostics = Diagnostics::new();

        let payslip = PayrollRun::new(&calculator, &store)
            .payslip_for("10003", period("06/2024"), &hours, &mut diagnostics)
            .unwrap()
            .unwrap();

        assert_eq!(payslip.hours_worked(), dec("168"));
        assert_eq!(payslip.gross_pay(), dec("16800"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.entries()[0].kind, DiagnosticKind::DataQuality);
        assert_eq!(diagnostics.entries()[0].code, "hours_capped");
    }

    #[test]
    fn test_run_produces_payslips_in_identifier_order() {
        let store = create_test_store();
        let calculator = PayrollCalculator::default();
        let mut events = days("10003", 5, "8:00", "17:00");
        events.extend(days("10001", 5, "8:00", "17:00"));
        events.extend(days("55555", 1, "8:00", "17:00"));
        let hours = aggregate(&events);
        let mut diagnostics = Diagnostics::new();

        let payslips = PayrollRun::new(&calculator, &store)
            .run(period("06/2024"), &hours, &mut diagnostics)
            .unwrap();

        let ids: Vec<&str> = payslips.iter().map(|p| p.employee().id()).collect();
        assert_eq!(ids, vec!["10001", "10003"]);

        let codes: Vec<&str> = diagnostics.entries().iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["unknown_employee", "no_hours"]);
        assert!(diagnostics.entries()[0].message.contains("55555"));
        assert!(diagnostics.entries()[1].message.contains("10002"));
    }

    #[test]
    fn test_run_ignores_other_periods() {
        let store = create_test_store();
        let calculator = PayrollCalculator::default();
        let hours = aggregate(&days("10001", 3, "8:00", "17:00"));
        let mut diagnostics = Diagnostics::new();

        let payslips = PayrollRun::new(&calculator, &store)
            .run(period("05/2024"), &hours, &mut diagnostics)
            .unwrap();

        assert!(payslips.is_empty());
        assert_eq!(diagnostics.of_kind(DiagnosticKind::LookupMiss).count(), 3);
    }
}
