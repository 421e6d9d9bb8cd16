//! Gross-to-net payroll computation.
//!
//! [`PayrollCalculator`] owns the configuration and is the single place
//! where hourly rates, itemized deductions and net pay are derived.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{DeductionResult, Employee, PayslipRecord, PeriodKey};

use super::deductions::DEDUCTION_TABLE;
use super::payslip::PayslipBuilder;

/// Computes pay for one employee and one period's hours.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::PayrollCalculator;
/// use payroll_engine::models::{Employee, EmployeeRecord};
/// use rust_decimal::Decimal;
///
/// let calculator = PayrollCalculator::default();
/// let employee = Employee::new(EmployeeRecord {
///     id: "10001".to_string(),
///     basic_salary: Decimal::new(16800, 0),
///     ..Default::default()
/// })?;
///
/// let gross = calculator.gross_pay(&employee, Decimal::new(168, 0))?;
/// assert_eq!(gross, Decimal::new(16800, 0));
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PayrollCalculator {
    config: PayrollConfig,
}

impl PayrollCalculator {
    /// Creates a calculator over a validated configuration.
    pub fn new(config: PayrollConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// The employee's explicit hourly rate, or basic salary spread over a
    /// standard work month.
    pub fn implied_hourly_rate(&self, employee: &Employee) -> Decimal {
        let compensation = employee.compensation();
        compensation.hourly_rate.unwrap_or_else(|| {
            compensation.basic_salary / self.config.hours.standard_monthly_hours
        })
    }

    /// Pay before deductions for `hours_worked` hours.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for negative hours, or when the rate times
    /// the hours does not fit in a `Decimal`.
    pub fn gross_pay(&self, employee: &Employee, hours_worked: Decimal) -> EngineResult<Decimal> {
        if hours_worked < Decimal::ZERO {
            return Err(EngineError::invalid_input(
                "hours_worked",
                format!(
                    "{} hours for employee {} must not be negative",
                    hours_worked,
                    employee.id()
                ),
            ));
        }
        self.implied_hourly_rate(employee)
            .checked_mul(hours_worked)
            .ok_or_else(|| {
                EngineError::invalid_input(
                    "gross_pay",
                    format!(
                        "{} hours for employee {} overflow the pay range",
                        hours_worked,
                        employee.id()
                    ),
                )
            })
    }

    /// Statutory deductions on `gross_pay`, in itemization order.
    ///
    /// Contributions are computed on gross pay; withholding tax is computed
    /// on gross pay less those contributions, floored at zero.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for negative gross pay.
    pub fn itemized_deductions(&self, gross_pay: Decimal) -> EngineResult<Vec<DeductionResult>> {
        let rates = &self.config.rates;
        let mut contributions = Decimal::ZERO;
        let mut items = Vec::with_capacity(DEDUCTION_TABLE.len());

        for (kind, deduct) in DEDUCTION_TABLE {
            let base = if kind.is_contribution() {
                gross_pay
            } else {
                (gross_pay - contributions).max(Decimal::ZERO)
            };
            let amount = deduct(base, rates)?;
            if kind.is_contribution() {
                contributions += amount;
            }
            items.push(DeductionResult { kind, amount });
        }

        Ok(items)
    }

    /// Fixed monthly allowances paid with net pay; zero when the allowance
    /// policy leaves them out.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the allowances overflow on summing.
    pub fn total_allowances(&self, employee: &Employee) -> EngineResult<Decimal> {
        if !self.config.allowances.include_in_net_pay {
            return Ok(Decimal::ZERO);
        }
        employee.compensation().allowances.total().ok_or_else(|| {
            EngineError::invalid_input(
                "allowances",
                format!("allowances for employee {} overflow the pay range", employee.id()),
            )
        })
    }

    /// Take-home pay: gross less itemized deductions plus allowances.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for negative hours or amounts that overflow.
    pub fn net_pay(&self, employee: &Employee, hours_worked: Decimal) -> EngineResult<Decimal> {
        let gross = self.gross_pay(employee, hours_worked)?;
        let deductions = self.itemized_deductions(gross)?;
        settle(employee, gross, &deductions, self.total_allowances(employee)?)
    }

    /// Computes every figure for one employee and period and builds the payslip.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for negative hours or amounts that overflow.
    pub fn payslip(
        &self,
        employee: &Employee,
        period: PeriodKey,
        hours_worked: Decimal,
    ) -> EngineResult<PayslipRecord> {
        let gross = self.gross_pay(employee, hours_worked)?;
        let deductions = self.itemized_deductions(gross)?;
        let allowances = self.total_allowances(employee)?;
        let net = settle(employee, gross, &deductions, allowances)?;

        debug!(
            employee_id = %employee.id(),
            period = %period,
            hours = %hours_worked,
            gross_pay = %gross,
            net_pay = %net,
            "Computed payslip"
        );

        Ok(PayslipBuilder::build(
            employee,
            period,
            hours_worked,
            gross,
            deductions,
            allowances,
            net,
        ))
    }
}

/// Net pay from its parts. Every net figure the engine reports comes from here.
fn settle(
    employee: &Employee,
    gross_pay: Decimal,
    deductions: &[DeductionResult],
    allowances: Decimal,
) -> EngineResult<Decimal> {
    deductions
        .iter()
        .try_fold(gross_pay, |net, d| net.checked_sub(d.amount))
        .and_then(|net| net.checked_add(allowances))
        .ok_or_else(|| {
            EngineError::invalid_input(
                "net_pay",
                format!("net pay for employee {} overflows the pay range", employee.id()),
            )
        })
}
