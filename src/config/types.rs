//! Configuration types for payroll computation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every `Default` impl
//! mirrors the shipped `config/motorph` directory.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Social insurance contribution step table.
///
/// Below `floor_threshold` the contribution is `minimum`; up to and including
/// `ceiling` it grows by `step_amount` for every `step` of salary above
/// `base_salary`; above `ceiling` it is `maximum`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialInsuranceTable {
    /// Salaries strictly below this pay the minimum contribution.
    pub floor_threshold: Decimal,
    /// Upper inclusive bound of the graduated range.
    pub ceiling: Decimal,
    /// Salary the graduated formula counts steps from.
    pub base_salary: Decimal,
    /// Width of one salary step.
    pub step: Decimal,
    /// Contribution added per salary step.
    pub step_amount: Decimal,
    /// Contribution for the lowest bracket.
    pub minimum: Decimal,
    /// Contribution above the ceiling; nothing exceeds it.
    pub maximum: Decimal,
}

impl Default for SocialInsuranceTable {
    fn default() -> Self {
        Self {
            floor_threshold: Decimal::new(4250, 0),
            ceiling: Decimal::new(2_474_999, 2),
            base_salary: Decimal::new(4000, 0),
            step: Decimal::new(500, 0),
            step_amount: Decimal::new(2250, 2),
            minimum: Decimal::new(18000, 2),
            maximum: Decimal::new(112_500, 2),
        }
    }
}

/// Health insurance premium: a flat rate split between employer and employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthInsuranceRate {
    /// Total premium rate applied to gross salary.
    pub rate: Decimal,
    /// Fraction of the premium paid by the employee.
    pub employee_share: Decimal,
}

impl Default for HealthInsuranceRate {
    fn default() -> Self {
        Self {
            rate: Decimal::new(3, 2),
            employee_share: Decimal::new(5, 1),
        }
    }
}

/// Housing fund contribution: a percentage with a fixed ceiling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousingFundRate {
    /// Rate applied to gross salary.
    pub rate: Decimal,
    /// Maximum monthly contribution.
    pub cap: Decimal,
}

impl Default for HousingFundRate {
    fn default() -> Self {
        Self {
            rate: Decimal::new(2, 2),
            cap: Decimal::new(10000, 2),
        }
    }
}

/// One bracket of the progressive withholding tax schedule.
///
/// Within the bracket the tax is `base + (taxable - threshold) * rate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive upper bound; `None` marks the open-ended top bracket.
    #[serde(default)]
    pub up_to: Option<Decimal>,
    /// Fixed tax owed at the start of the bracket.
    pub base: Decimal,
    /// Income the marginal rate is measured from.
    pub threshold: Decimal,
    /// Marginal rate.
    pub rate: Decimal,
}

impl TaxBracket {
    fn new(up_to: Option<i64>, base: Decimal, threshold: i64, rate: Decimal) -> Self {
        Self {
            up_to: up_to.map(Decimal::from),
            base,
            threshold: Decimal::from(threshold),
            rate,
        }
    }

    /// Applies this bracket's formula to a taxable amount.
    pub fn apply(&self, taxable: Decimal) -> Decimal {
        self.base + (taxable - self.threshold) * self.rate
    }
}

/// Progressive withholding tax schedule, brackets ordered by `up_to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSchedule {
    /// The brackets, lowest first.
    pub brackets: Vec<TaxBracket>,
}

impl Default for TaxSchedule {
    fn default() -> Self {
        Self {
            brackets: vec![
                TaxBracket::new(Some(20_832), Decimal::ZERO, 0, Decimal::ZERO),
                TaxBracket::new(Some(33_333), Decimal::ZERO, 20_833, Decimal::new(20, 2)),
                TaxBracket::new(Some(66_667), Decimal::new(2500, 0), 33_333, Decimal::new(25, 2)),
                TaxBracket::new(
                    Some(166_667),
                    Decimal::new(10_833, 0),
                    66_667,
                    Decimal::new(30, 2),
                ),
                TaxBracket::new(
                    Some(666_667),
                    Decimal::new(4_083_333, 2),
                    166_667,
                    Decimal::new(32, 2),
                ),
                TaxBracket::new(None, Decimal::new(20_083_333, 2), 666_667, Decimal::new(35, 2)),
            ],
        }
    }
}

/// The statutory rate table consulted by the deduction functions.
///
/// # Example
///
/// ```
/// use payroll_engine::config::RateTable;
///
/// let rates = RateTable::default();
/// assert!(rates.validate().is_ok());
/// assert_eq!(rates.withholding_tax.brackets.len(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RateTable {
    /// Social insurance step table.
    pub social_insurance: SocialInsuranceTable,
    /// Health insurance premium.
    pub health_insurance: HealthInsuranceRate,
    /// Housing fund contribution.
    pub housing_fund: HousingFundRate,
    /// Withholding tax schedule.
    pub withholding_tax: TaxSchedule,
}

impl RateTable {
    /// Checks that the table can be evaluated for every non-negative input.
    pub fn validate(&self) -> EngineResult<()> {
        let si = &self.social_insurance;
        if si.step <= Decimal::ZERO {
            return Err(invalid("social_insurance.step must be positive"));
        }
        if si.floor_threshold > si.ceiling {
            return Err(invalid(
                "social_insurance.floor_threshold must not exceed ceiling",
            ));
        }
        if si.minimum > si.maximum {
            return Err(invalid("social_insurance.minimum must not exceed maximum"));
        }
        let non_negative = [
            ("social_insurance.step_amount", si.step_amount),
            ("social_insurance.minimum", si.minimum),
            ("health_insurance.rate", self.health_insurance.rate),
            ("health_insurance.employee_share", self.health_insurance.employee_share),
            ("housing_fund.rate", self.housing_fund.rate),
            ("housing_fund.cap", self.housing_fund.cap),
        ];
        for (name, value) in non_negative {
            if value.is_sign_negative() {
                return Err(invalid(format!("{} must not be negative", name)));
            }
        }

        let brackets = &self.withholding_tax.brackets;
        let Some((top, lower)) = brackets.split_last() else {
            return Err(invalid("withholding_tax needs at least one bracket"));
        };
        if top.up_to.is_some() {
            return Err(invalid("the last withholding_tax bracket must be open-ended"));
        }
        let mut previous: Option<Decimal> = None;
        for bracket in lower {
            let Some(limit) = bracket.up_to else {
                return Err(invalid(
                    "only the last withholding_tax bracket may be open-ended",
                ));
            };
            if previous.is_some_and(|p| limit <= p) {
                return Err(invalid("withholding_tax brackets must be strictly ascending"));
            }
            previous = Some(limit);
        }
        if brackets
            .iter()
            .any(|b| b.rate.is_sign_negative() || b.base.is_sign_negative())
        {
            return Err(invalid("withholding_tax rates and bases must not be negative"));
        }
        Ok(())
    }
}

/// How attendance hours translate into pay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoursPolicy {
    /// Hours in a standard work month; divides basic salary into an hourly rate.
    pub standard_monthly_hours: Decimal,
    /// Upper bound applied to aggregated monthly hours before payroll.
    pub max_monthly_hours: Decimal,
}

impl Default for HoursPolicy {
    fn default() -> Self {
        Self {
            standard_monthly_hours: Decimal::new(168, 0),
            max_monthly_hours: Decimal::new(168, 0),
        }
    }
}

/// Whether fixed allowances are paid out with net pay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowancePolicy {
    /// Add rice/phone/clothing allowances after tax.
    pub include_in_net_pay: bool,
}

impl Default for AllowancePolicy {
    fn default() -> Self {
        Self {
            include_in_net_pay: true,
        }
    }
}

/// Text formats used when reading attendance records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputFormat {
    /// `chrono` format string for attendance dates.
    pub date_format: String,
}

impl Default for InputFormat {
    fn default() -> Self {
        Self {
            date_format: "%d/%m/%Y".to_string(),
        }
    }
}

/// Policy settings from `payroll.yaml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Hours policy.
    pub hours: HoursPolicy,
    /// Allowance policy.
    #[serde(default)]
    pub allowances: AllowancePolicy,
    /// Input formats.
    #[serde(default)]
    pub input: InputFormat,
}

/// The complete payroll configuration loaded from YAML files.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PayrollConfig {
    /// Statutory rate table.
    pub rates: RateTable,
    /// Hours policy.
    pub hours: HoursPolicy,
    /// Allowance policy.
    pub allowances: AllowancePolicy,
    /// Input formats.
    pub input: InputFormat,
}

impl PayrollConfig {
    /// Creates a new PayrollConfig from its component parts.
    pub fn new(rates: RateTable, policy: PolicyConfig) -> Self {
        Self {
            rates,
            hours: policy.hours,
            allowances: policy.allowances,
            input: policy.input,
        }
    }

    /// Validates the rate table and hours policy together.
    pub fn validate(&self) -> EngineResult<()> {
        self.rates.validate()?;
        if self.hours.standard_monthly_hours <= Decimal::ZERO {
            return Err(invalid("hours.standard_monthly_hours must be positive"));
        }
        if self.hours.max_monthly_hours.is_sign_negative() {
            return Err(invalid("hours.max_monthly_hours must not be negative"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> EngineError {
    EngineError::InvalidConfig {
        message: message.into(),
    }
}
