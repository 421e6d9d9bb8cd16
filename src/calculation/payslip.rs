//! Payslip assembly.

use rust_decimal::Decimal;

use crate::models::{DeductionResult, Employee, PayslipRecord, PeriodKey};

/// Assembles finished [`PayslipRecord`]s from computed parts.
pub struct PayslipBuilder;

impl PayslipBuilder {
    /// Builds a payslip. Total deductions is the sum of the deduction lines;
    /// every other figure is taken as given.
    pub fn build(
        employee: &Employee,
        period: PeriodKey,
        hours_worked: Decimal,
        gross_pay: Decimal,
        deductions: Vec<DeductionResult>,
        total_allowances: Decimal,
        net_pay: Decimal,
    ) -> PayslipRecord {
        let total_deductions = deductions.iter().map(|d| d.amount).sum();

        PayslipRecord {
            employee: employee.clone(),
            period,
            hours_worked,
            gross_pay,
            deductions,
            total_deductions,
            total_allowances,
            net_pay,
        }
    }
}
