//! In-memory employee store for a payroll run.

use std::collections::BTreeMap;

use crate::error::{EngineError, EngineResult};
use crate::models::Employee;

/// Employees keyed by identifier, iterated in identifier order.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{Employee, EmployeeRecord};
/// use payroll_engine::store::EmployeeStore;
///
/// let mut store = EmployeeStore::new();
/// let employee = Employee::new(EmployeeRecord {
///     id: "10001".to_string(),
///     ..Default::default()
/// })?;
/// store.insert(employee)?;
/// assert!(store.get("10001").is_some());
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct EmployeeStore {
    employees: BTreeMap<String, Employee>,
}

impl EmployeeStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an employee.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if an employee with the same identifier is
    /// already stored; the stored employee is left untouched.
    pub fn insert(&mut self, employee: Employee) -> EngineResult<()> {
        if self.employees.contains_key(employee.id()) {
            return Err(EngineError::invalid_input(
                "id",
                format!("duplicate employee identifier '{}'", employee.id()),
            ));
        }
        self.employees.insert(employee.id().to_string(), employee);
        Ok(())
    }

    /// Looks up an employee by identifier.
    pub fn get(&self, id: &str) -> Option<&Employee> {
        self.employees.get(id)
    }

    /// Returns true if the identifier is known.
    pub fn contains(&self, id: &str) -> bool {
        self.employees.contains_key(id)
    }

    /// Iterates employees in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Employee> {
        self.employees.values()
    }

    /// Number of stored employees.
    pub fn len(&self) -> usize {
        self.employees.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}
