//! Request types for the payroll API.
//!
//! This module defines the JSON request structures for the `/payroll` endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{AttendanceEvent, EmployeeRecord, PeriodKey};

/// Request body for the `/payroll` endpoint.
///
/// Carries everything one payroll run needs: the period to pay, the
/// employee records and the raw attendance log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// The month to pay, as `MM/YYYY`.
    pub period: PeriodKey,
    /// Employee records; identifiers must be unique.
    pub employees: Vec<EmployeeRecord>,
    /// Attendance rows. Rows outside `period` are ignored.
    #[serde(default)]
    pub attendance: Vec<AttendanceRequest>,
}

/// One attendance row in a payroll request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRequest {
    /// The employee the row belongs to.
    pub employee_id: String,
    /// The work date (ISO 8601).
    pub date: NaiveDate,
    /// Log-in time, `H:MM` 24-hour.
    pub log_in: String,
    /// Log-out time, `H:MM` 24-hour.
    pub log_out: String,
}

impl From<AttendanceRequest> for AttendanceEvent {
    fn from(req: AttendanceRequest) -> Self {
        AttendanceEvent {
            employee_id: req.employee_id,
            date: req.date,
            log_in: req.log_in,
            log_out: req.log_out,
        }
    }
}
