//! Calculation logic for the payroll engine.
//!
//! This module contains the statutory deduction functions, attendance
//! aggregation into monthly hours, the gross-to-net payroll calculator,
//! payslip assembly and the batch payroll run.

mod attendance;
mod deductions;
mod payroll;
mod payslip;
mod run;

pub use attendance::{AttendanceAggregator, PeriodHours, capped_hours, hours_worked};
pub use deductions::{
    DEDUCTION_TABLE, DeductionFn, deduction_fn, health_insurance, housing_fund, social_insurance,
    withholding_tax,
};
pub use payroll::PayrollCalculator;
pub use payslip::PayslipBuilder;
pub use run::PayrollRun;
