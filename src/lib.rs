//! Payroll engine for monthly, hours-based pay
//!
//! This crate aggregates attendance logs into monthly hours, applies the
//! statutory deduction schedules (social insurance, health insurance,
//! housing fund and withholding tax) and produces itemized payslips.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod loader;
pub mod models;
pub mod store;
