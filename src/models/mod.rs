//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod employee;
mod payslip;

pub use attendance::{AttendanceEvent, PeriodKey};
pub use employee::{Allowances, Compensation, Employee, EmployeeRecord, GovernmentIds};
pub use payslip::{DeductionKind, DeductionResult, PayslipRecord};
