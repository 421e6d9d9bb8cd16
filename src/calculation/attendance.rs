//! Attendance aggregation.
//!
//! Turns raw time-in/time-out rows into hours worked per employee per
//! month. Bad rows cost a diagnostic and count as zero hours; they never
//! abort the batch.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use rust_decimal::Decimal;
use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::models::{AttendanceEvent, PeriodKey};

/// Time-of-day formats accepted for log-in/log-out values.
const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

/// Why a log-in/log-out pair produced no hours.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SpanError {
    Unparsable(String),
    Inverted,
}

fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
}

fn span_minutes(log_in: &str, log_out: &str) -> Result<i64, SpanError> {
    let start =
        parse_time_of_day(log_in).ok_or_else(|| SpanError::Unparsable(log_in.to_string()))?;
    let end =
        parse_time_of_day(log_out).ok_or_else(|| SpanError::Unparsable(log_out.to_string()))?;

    let minutes = (end - start).num_minutes();
    if minutes < 0 {
        return Err(SpanError::Inverted);
    }
    Ok(minutes)
}

fn minutes_to_hours(minutes: i64) -> Decimal {
    Decimal::from(minutes) / Decimal::from(60)
}

fn report_span_error(
    error: SpanError,
    log_in: &str,
    log_out: &str,
    context: &str,
    sink: &mut dyn DiagnosticSink,
) {
    let diagnostic = match error {
        SpanError::Unparsable(value) => Diagnostic::data_quality(
            "unparsable_time",
            format!("{}unparsable time '{}'; counted as 0 hours", context, value),
        ),
        SpanError::Inverted => Diagnostic::data_quality(
            "inverted_span",
            format!(
                "{}log-out {} is before log-in {}; counted as 0 hours",
                context, log_out, log_in
            ),
        ),
    };
    sink.report(diagnostic);
}

/// Hours between two times of day on the same date.
///
/// Unparsable or inverted pairs return zero and report a data-quality
/// diagnostic.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::hours_worked;
/// use payroll_engine::diagnostics::Diagnostics;
/// use rust_decimal::Decimal;
///
/// let mut diagnostics = Diagnostics::new();
/// assert_eq!(hours_worked("8:00", "17:30", &mut diagnostics), Decimal::new(95, 1));
/// assert_eq!(hours_worked("17:00", "8:00", &mut diagnostics), Decimal::ZERO);
/// assert_eq!(diagnostics.len(), 1);
/// ```
pub fn hours_worked(log_in: &str, log_out: &str, sink: &mut dyn DiagnosticSink) -> Decimal {
    match span_minutes(log_in, log_out) {
        Ok(minutes) => minutes_to_hours(minutes),
        Err(error) => {
            report_span_error(error, log_in, log_out, "", sink);
            Decimal::ZERO
        }
    }
}

/// Clamps hours to the monthly maximum.
///
/// ```
/// use payroll_engine::calculation::capped_hours;
/// use rust_decimal::Decimal;
///
/// let max = Decimal::new(168, 0);
/// assert_eq!(capped_hours(Decimal::new(200, 0), max), max);
/// assert_eq!(capped_hours(Decimal::new(160, 0), max), Decimal::new(160, 0));
/// ```
pub fn capped_hours(hours: Decimal, max_monthly_hours: Decimal) -> Decimal {
    hours.min(max_monthly_hours)
}

/// Hours worked per (employee, period), produced by one aggregation pass.
///
/// Read-only once built; iteration is in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodHours {
    hours: BTreeMap<(String, PeriodKey), Decimal>,
}

impl PeriodHours {
    /// Total hours for an employee in a period, if any rows were seen.
    pub fn get(&self, employee_id: &str, period: PeriodKey) -> Option<Decimal> {
        self.hours.get(&(employee_id.to_string(), period)).copied()
    }

    /// Like [`PeriodHours::get`], clamped to `max_monthly_hours`.
    pub fn capped(
        &self,
        employee_id: &str,
        period: PeriodKey,
        max_monthly_hours: Decimal,
    ) -> Option<Decimal> {
        self.get(employee_id, period)
            .map(|hours| capped_hours(hours, max_monthly_hours))
    }

    /// Iterates `(employee_id, period, hours)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, PeriodKey, Decimal)> {
        self.hours
            .iter()
            .map(|((id, period), hours)| (id.as_str(), *period, *hours))
    }

    /// Employees with rows in `period`, in identifier order.
    pub fn employees_in(&self, period: PeriodKey) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(move |(_, p, _)| *p == period)
            .map(|(id, _, _)| id)
    }

    /// Number of (employee, period) buckets.
    pub fn len(&self) -> usize {
        self.hours.len()
    }

    /// Returns true if no rows were aggregated.
    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }
}

/// Accumulates attendance events into [`PeriodHours`].
///
/// Each payroll run owns its aggregator. Buckets sum whole minutes and are
/// converted to hours once, in [`AttendanceAggregator::finish`], so the
/// result does not depend on the order events arrive in.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::AttendanceAggregator;
/// use payroll_engine::diagnostics::Diagnostics;
/// use payroll_engine::models::{AttendanceEvent, PeriodKey};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let events = vec![AttendanceEvent {
///     employee_id: "10001".to_string(),
///     date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
///     log_in: "8:00".to_string(),
///     log_out: "17:00".to_string(),
/// }];
///
/// let mut diagnostics = Diagnostics::new();
/// let hours = AttendanceAggregator::aggregate(&events, &mut diagnostics);
/// let period: PeriodKey = "06/2024".parse().unwrap();
/// assert_eq!(hours.get("10001", period), Some(Decimal::new(9, 0)));
/// ```
#[derive(Debug, Default)]
pub struct AttendanceAggregator {
    minutes: BTreeMap<(String, PeriodKey), i64>,
    events_seen: usize,
}

impl AttendanceAggregator {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one event's hours to its (employee, period) bucket.
    ///
    /// The employee identifier is trimmed, matching the key
    /// [`Employee::new`](crate::models::Employee::new) stores employees under.
    pub fn record(&mut self, event: &AttendanceEvent, sink: &mut dyn DiagnosticSink) {
        let employee_id = event.employee_id.trim();
        let minutes = span_minutes(&event.log_in, &event.log_out).unwrap_or_else(|error| {
            let context = format!("employee {} on {}: ", employee_id, event.date);
            report_span_error(error, &event.log_in, &event.log_out, &context, sink);
            0
        });

        *self
            .minutes
            .entry((employee_id.to_string(), event.period_key()))
            .or_insert(0) += minutes;
        self.events_seen += 1;
    }

    /// Finishes the pass, handing out the read-only totals.
    pub fn finish(self) -> PeriodHours {
        debug!(
            events = self.events_seen,
            buckets = self.minutes.len(),
            "Aggregated attendance"
        );
        let hours = self
            .minutes
            .into_iter()
            .map(|(key, minutes)| (key, minutes_to_hours(minutes)))
            .collect();
        PeriodHours { hours }
    }

    /// Aggregates a batch of events in one pass.
    pub fn aggregate<'a, I>(events: I, sink: &mut dyn DiagnosticSink) -> PeriodHours
    where
        I: IntoIterator<Item = &'a AttendanceEvent>,
    {
        let mut aggregator = Self::new();
        for event in events {
            aggregator.record(event, sink);
        }
        aggregator.finish()
    }
}
