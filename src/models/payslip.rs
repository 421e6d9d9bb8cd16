//! Payslip models.
//!
//! This module contains the [`PayslipRecord`] type and the itemized
//! [`DeductionResult`] lines it carries.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Employee, PeriodKey};

/// The statutory deductions, in the order they are itemized.
///
/// # Example
///
/// ```
/// use payroll_engine::models::DeductionKind;
///
/// assert_eq!(DeductionKind::ALL[0], DeductionKind::SocialInsurance);
/// assert!(!DeductionKind::WithholdingTax.is_contribution());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionKind {
    /// Social insurance contribution (step table).
    SocialInsurance,
    /// Health insurance premium, employee share.
    HealthInsurance,
    /// Housing fund contribution (capped percentage).
    HousingFund,
    /// Progressive withholding tax on income net of contributions.
    WithholdingTax,
}

impl DeductionKind {
    /// Every kind in itemization order.
    pub const ALL: [DeductionKind; 4] = [
        DeductionKind::SocialInsurance,
        DeductionKind::HealthInsurance,
        DeductionKind::HousingFund,
        DeductionKind::WithholdingTax,
    ];

    /// Contributions are computed on gross pay and reduce taxable income.
    pub fn is_contribution(self) -> bool {
        !matches!(self, DeductionKind::WithholdingTax)
    }

    /// Label for presentation layers.
    pub fn label(self) -> &'static str {
        match self {
            DeductionKind::SocialInsurance => "Social Insurance",
            DeductionKind::HealthInsurance => "Health Insurance",
            DeductionKind::HousingFund => "Housing Fund",
            DeductionKind::WithholdingTax => "Withholding Tax",
        }
    }
}

/// One itemized deduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionResult {
    /// Which deduction this is.
    pub kind: DeductionKind,
    /// The amount deducted, at full precision.
    pub amount: Decimal,
}

/// The finalized record of one employee's pay for one period.
///
/// Built by [`crate::calculation::PayslipBuilder`]; there are no setters.
/// Amounts keep full precision; rounding is left to presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayslipRecord {
    pub(crate) employee: Employee,
    pub(crate) period: PeriodKey,
    pub(crate) hours_worked: Decimal,
    pub(crate) gross_pay: Decimal,
    pub(crate) deductions: Vec<DeductionResult>,
    pub(crate) total_deductions: Decimal,
    pub(crate) total_allowances: Decimal,
    pub(crate) net_pay: Decimal,
}

impl PayslipRecord {
    /// The employee paid.
    pub fn employee(&self) -> &Employee {
        &self.employee
    }

    /// The month/year this payslip covers.
    pub fn period(&self) -> PeriodKey {
        self.period
    }

    /// Hours the pay was computed from, after capping.
    pub fn hours_worked(&self) -> Decimal {
        self.hours_worked
    }

    /// Pay before deductions.
    pub fn gross_pay(&self) -> Decimal {
        self.gross_pay
    }

    /// Deduction lines in itemization order.
    pub fn deductions(&self) -> &[DeductionResult] {
        &self.deductions
    }

    /// Looks up the amount of one deduction kind.
    pub fn deduction(&self, kind: DeductionKind) -> Option<Decimal> {
        self.deductions
            .iter()
            .find(|d| d.kind == kind)
            .map(|d| d.amount)
    }

    /// Sum of all deduction lines.
    pub fn total_deductions(&self) -> Decimal {
        self.total_deductions
    }

    /// Fixed allowances added to net pay.
    pub fn total_allowances(&self) -> Decimal {
        self.total_allowances
    }

    /// Take-home pay.
    pub fn net_pay(&self) -> Decimal {
        self.net_pay
    }
}
