//! Employee model.
//!
//! This module defines the subset of an employee record that payroll needs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::MAX_AMOUNT;
use crate::error::{EngineError, EngineResult};

/// Represents an employee on the payroll roster.
///
/// The roster owns employees; the engine only reads them for the duration
/// of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The employee's display name.
    pub name: String,
    /// The employee's role or position (e.g., "Site Engineer").
    pub role: String,
    /// The department the employee belongs to.
    pub department: String,
    /// The monthly base salary.
    pub monthly_salary: Decimal,
}

impl Employee {
    /// Checks that the employee can be paid.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidEmployee`] when the monthly salary is
    /// negative or above [`MAX_AMOUNT`].
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::Employee;
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "1".to_string(),
    ///     name: "Juan Dela Cruz".to_string(),
    ///     role: "Project Manager".to_string(),
    ///     department: "Management".to_string(),
    ///     monthly_salary: Decimal::new(-1, 0),
    /// };
    /// assert!(employee.validate().is_err());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        if self.monthly_salary < Decimal::ZERO {
            return Err(EngineError::InvalidEmployee {
                employee_id: self.id.clone(),
                field: "monthly_salary".to_string(),
                message: format!("must not be negative (got {})", self.monthly_salary),
            });
        }
        if self.monthly_salary > MAX_AMOUNT {
            return Err(EngineError::InvalidEmployee {
                employee_id: self.id.clone(),
                field: "monthly_salary".to_string(),
                message: format!("must not exceed {} (got {})", MAX_AMOUNT, self.monthly_salary),
            });
        }
        Ok(())
    }
}
