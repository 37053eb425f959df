//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading policy, validating
//! inputs, computing payroll, and advancing payroll records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::PayrollStatus;

/// The main error type for the payroll engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/policy.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/policy.yaml");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The payroll policy is internally inconsistent.
    #[error("Invalid payroll policy '{field}': {message}")]
    InvalidPolicy {
        /// The policy field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The pay period is malformed.
    #[error("Invalid pay period {start} to {end}: {message}")]
    InvalidPeriod {
        /// The start of the period as supplied.
        start: String,
        /// The end of the period as supplied.
        end: String,
        /// A description of what made the period invalid.
        message: String,
    },

    /// An employee record was invalid or contained inconsistent data.
    #[error("Invalid employee '{employee_id}' field '{field}': {message}")]
    InvalidEmployee {
        /// The ID of the invalid employee.
        employee_id: String,
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// An overtime record was invalid.
    #[error("Invalid overtime record '{record_id}': {message}")]
    InvalidOvertime {
        /// The ID of the invalid overtime record.
        record_id: String,
        /// A description of what made the record invalid.
        message: String,
    },

    /// A loan was invalid.
    #[error("Invalid loan '{loan_id}': {message}")]
    InvalidLoan {
        /// The ID of the invalid loan.
        loan_id: String,
        /// A description of what made the loan invalid.
        message: String,
    },

    /// The annualized taxable income is beyond the last bracket in the tax table.
    #[error("No tax bracket covers annual taxable income {annual_income}")]
    UnsupportedTaxBracket {
        /// The annualized taxable income.
        annual_income: Decimal,
    },

    /// A payroll record status change would move backwards or stand still.
    #[error("Cannot move payroll record '{record_id}' from {from} to {to}")]
    InvalidStatusTransition {
        /// The ID of the payroll record.
        record_id: String,
        /// The current status.
        from: PayrollStatus,
        /// The requested status.
        to: PayrollStatus,
    },

    /// A record referenced by ID does not exist.
    #[error("{kind} not found: {id}")]
    RecordNotFound {
        /// The kind of record (e.g. "Payroll record", "Overtime record").
        kind: String,
        /// The ID that was looked up.
        id: String,
    },
}

impl EngineError {
    /// Builds an [`EngineError::InvalidPeriod`] from two dates.
    pub fn invalid_period(start: NaiveDate, end: NaiveDate, message: impl Into<String>) -> Self {
        EngineError::InvalidPeriod {
            start: start.to_string(),
            end: end.to_string(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
