//! Employee model and related types.
//!
//! This module defines the [`Employee`] value type and the raw
//! [`EmployeeRecord`] it is validated from.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, EngineResult};

/// Fixed monthly allowances paid on top of salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Allowances {
    /// Rice subsidy.
    #[serde(default)]
    pub rice_subsidy: Decimal,
    /// Phone allowance.
    #[serde(default)]
    pub phone_allowance: Decimal,
    /// Clothing allowance.
    #[serde(default)]
    pub clothing_allowance: Decimal,
}

impl Allowances {
    /// Sum of all allowance fields, or `None` if the sum overflows.
    ///
    /// ```
    /// use payroll_engine::models::Allowances;
    /// use rust_decimal::Decimal;
    ///
    /// let allowances = Allowances {
    ///     rice_subsidy: Decimal::new(1500, 0),
    ///     phone_allowance: Decimal::new(1000, 0),
    ///     clothing_allowance: Decimal::new(500, 0),
    /// };
    /// assert_eq!(allowances.total(), Some(Decimal::new(3000, 0)));
    /// ```
    pub fn total(&self) -> Option<Decimal> {
        self.rice_subsidy
            .checked_add(self.phone_allowance)?
            .checked_add(self.clothing_allowance)
    }
}

/// Government identification numbers carried on the payslip.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernmentIds {
    /// Tax identification number.
    pub tax_id: String,
    /// Social insurance number.
    pub social_insurance_id: String,
    /// Health insurance number.
    pub health_insurance_id: String,
    /// Housing fund number.
    pub housing_fund_id: String,
}

/// An employee's pay terms. Every amount is non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Compensation {
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Explicit hourly rate; when absent one is implied from basic salary.
    pub hourly_rate: Option<Decimal>,
    /// Fixed monthly allowances.
    pub allowances: Allowances,
}

/// Raw employee input as it arrives from a loader or API request.
///
/// Field order follows the employee input record. Nothing is validated
/// until the record is turned into an [`Employee`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Unique employee identifier.
    pub id: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Birth date as provided by the source.
    #[serde(default)]
    pub birth_date: String,
    /// Postal address.
    #[serde(default)]
    pub address: String,
    /// Contact phone number.
    #[serde(default)]
    pub contact_number: String,
    /// Government identification numbers.
    #[serde(flatten)]
    pub government_ids: GovernmentIds,
    /// Employment status (e.g. "Regular", "Probationary").
    #[serde(default)]
    pub employment_status: String,
    /// Job position.
    #[serde(default)]
    pub position: String,
    /// Immediate supervisor.
    #[serde(default)]
    pub supervisor: String,
    /// Monthly basic salary.
    #[serde(default)]
    pub basic_salary: Decimal,
    /// Fixed monthly allowances.
    #[serde(flatten)]
    pub allowances: Allowances,
    /// Optional explicit hourly rate.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
}

/// Represents an employee on the payroll.
///
/// The identifier is non-empty and compensation is never negative; both
/// are enforced by [`Employee::new`], which deserialization also goes
/// through.
///
/// # Examples
///
/// ```
/// use payroll_engine::models::{Employee, EmployeeRecord};
/// use rust_decimal::Decimal;
///
/// let employee = Employee::new(EmployeeRecord {
///     id: "10001".to_string(),
///     last_name: "Garcia".to_string(),
///     first_name: "Manuel III".to_string(),
///     basic_salary: Decimal::new(90000, 0),
///     ..Default::default()
/// })
/// .unwrap();
/// assert_eq!(employee.full_name(), "Manuel III Garcia");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EmployeeRecord", into = "EmployeeRecord")]
pub struct Employee {
    id: String,
    last_name: String,
    first_name: String,
    birth_date: String,
    address: String,
    contact_number: String,
    government_ids: GovernmentIds,
    employment_status: String,
    position: String,
    supervisor: String,
    compensation: Compensation,
}

impl Employee {
    /// Validates a raw record into an employee.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the identifier is empty. Negative
    /// compensation amounts are not errors; they are replaced by zero.
    pub fn new(record: EmployeeRecord) -> EngineResult<Self> {
        let id = record.id.trim().to_string();
        if id.is_empty() {
            return Err(EngineError::invalid_input(
                "id",
                "employee identifier must not be empty",
            ));
        }

        let compensation = Compensation {
            basic_salary: non_negative(&id, "basic_salary", record.basic_salary),
            hourly_rate: record
                .hourly_rate
                .map(|rate| non_negative(&id, "hourly_rate", rate)),
            allowances: Allowances {
                rice_subsidy: non_negative(&id, "rice_subsidy", record.allowances.rice_subsidy),
                phone_allowance: non_negative(
                    &id,
                    "phone_allowance",
                    record.allowances.phone_allowance,
                ),
                clothing_allowance: non_negative(
                    &id,
                    "clothing_allowance",
                    record.allowances.clothing_allowance,
                ),
            },
        };

        Ok(Self {
            id,
            last_name: record.last_name,
            first_name: record.first_name,
            birth_date: record.birth_date,
            address: record.address,
            contact_number: record.contact_number,
            government_ids: record.government_ids,
            employment_status: record.employment_status,
            position: record.position,
            supervisor: record.supervisor,
            compensation,
        })
    }

    /// Unique identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Family name.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Given name.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// "First Last", as printed on the payslip.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Birth date as provided by the source.
    pub fn birth_date(&self) -> &str {
        &self.birth_date
    }

    /// Postal address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Contact phone number.
    pub fn contact_number(&self) -> &str {
        &self.contact_number
    }

    /// Government identification numbers.
    pub fn government_ids(&self) -> &GovernmentIds {
        &self.government_ids
    }

    /// Employment status.
    pub fn employment_status(&self) -> &str {
        &self.employment_status
    }

    /// Job position.
    pub fn position(&self) -> &str {
        &self.position
    }

    /// Immediate supervisor.
    pub fn supervisor(&self) -> &str {
        &self.supervisor
    }

    /// Pay terms.
    pub fn compensation(&self) -> &Compensation {
        &self.compensation
    }
}

impl TryFrom<EmployeeRecord> for Employee {
    type Error = EngineError;

    fn try_from(record: EmployeeRecord) -> EngineResult<Self> {
        Employee::new(record)
    }
}

impl From<Employee> for EmployeeRecord {
    fn from(employee: Employee) -> Self {
        EmployeeRecord {
            id: employee.id,
            last_name: employee.last_name,
            first_name: employee.first_name,
            birth_date: employee.birth_date,
            address: employee.address,
            contact_number: employee.contact_number,
            government_ids: employee.government_ids,
            employment_status: employee.employment_status,
            position: employee.position,
            supervisor: employee.supervisor,
            basic_salary: employee.compensation.basic_salary,
            allowances: employee.compensation.allowances,
            hourly_rate: employee.compensation.hourly_rate,
        }
    }
}

fn non_negative(id: &str, field: &str, value: Decimal) -> Decimal {
    if value < Decimal::ZERO {
        warn!(employee_id = %id, field, value = %value, "Negative compensation coerced to zero");
        Decimal::ZERO
    } else {
        value
    }
}
