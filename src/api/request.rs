//! Request types for the payroll API.
//!
//! Period boundaries arrive as `YYYY-MM-DD` strings and are parsed by the
//! handlers, so a malformed date surfaces as an invalid period rather than a
//! JSON error.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{
    Employee, Loan, LoanStatus, LoanType, OvertimeRecord, OvertimeStatus, PayAdjustment,
    PayPeriod, PayrollStatus,
};

/// Request body for `POST /payroll/calculate`.
///
/// Carries everything needed for a one-off run; nothing is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculatePayrollRequest {
    /// First day of the period (`YYYY-MM-DD`).
    pub period_start: String,
    /// Last day of the period (`YYYY-MM-DD`).
    pub period_end: String,
    /// Employees to pay, in output order.
    pub employees: Vec<Employee>,
    /// Overtime ledger.
    #[serde(default)]
    pub overtime: Vec<OvertimeRecord>,
    /// Loan ledger.
    #[serde(default)]
    pub loans: Vec<Loan>,
    /// Allowances, bonuses and late deductions per employee.
    #[serde(default)]
    pub adjustments: Vec<PayAdjustment>,
}

impl CalculatePayrollRequest {
    /// Parses the requested period.
    pub fn period(&self) -> EngineResult<PayPeriod> {
        PayPeriod::parse(&self.period_start, &self.period_end)
    }
}

/// Request body for `POST /payroll/runs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRunRequest {
    /// First day of the period (`YYYY-MM-DD`).
    pub period_start: String,
    /// Last day of the period (`YYYY-MM-DD`).
    pub period_end: String,
    /// Allowances, bonuses and late deductions per employee.
    #[serde(default)]
    pub adjustments: Vec<PayAdjustment>,
}

impl GenerateRunRequest {
    /// Parses the requested period.
    pub fn period(&self) -> EngineResult<PayPeriod> {
        PayPeriod::parse(&self.period_start, &self.period_end)
    }
}

/// Query string for `GET /payroll/records`.
///
/// Both bounds must be given to filter; otherwise every record is listed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordsQuery {
    /// First day of the period.
    pub period_start: Option<String>,
    /// Last day of the period.
    pub period_end: Option<String>,
}

impl RecordsQuery {
    /// Parses the period filter, if both bounds were supplied.
    pub fn period(&self) -> EngineResult<Option<PayPeriod>> {
        match (&self.period_start, &self.period_end) {
            (Some(start), Some(end)) => PayPeriod::parse(start, end).map(Some),
            _ => Ok(None),
        }
    }
}

/// Request body for `PATCH /payroll/records/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    /// The status to move to.
    pub status: PayrollStatus,
    /// Payment date when moving to `paid`; defaults to today.
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
}

/// Query string for `GET /loans`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoansQuery {
    /// Only list this employee's loans.
    pub employee_id: Option<String>,
}

/// Request body for `POST /loans`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLoanRequest {
    /// Loan id; generated when empty.
    #[serde(default)]
    pub id: String,
    /// The borrowing employee.
    pub employee_id: String,
    /// The loan category.
    pub loan_type: LoanType,
    /// The principal borrowed.
    pub total_amount: Decimal,
    /// The amount still owed; defaults to the principal.
    #[serde(default)]
    pub remaining_balance: Option<Decimal>,
    /// The fixed monthly installment.
    pub monthly_amortization: Decimal,
    /// First month of repayment.
    pub start_date: NaiveDate,
    /// Scheduled end of repayment.
    pub end_date: NaiveDate,
}

impl From<NewLoanRequest> for Loan {
    fn from(req: NewLoanRequest) -> Self {
        Loan {
            id: req.id,
            employee_id: req.employee_id,
            loan_type: req.loan_type,
            total_amount: req.total_amount,
            remaining_balance: req.remaining_balance.unwrap_or(req.total_amount),
            monthly_amortization: req.monthly_amortization,
            start_date: req.start_date,
            end_date: req.end_date,
            status: LoanStatus::Active,
        }
    }
}

/// Request body for `POST /overtime`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOvertimeRequest {
    /// Record id; generated when empty.
    #[serde(default)]
    pub id: String,
    /// The employee who worked the overtime.
    pub employee_id: String,
    /// The day the overtime was worked.
    pub date: NaiveDate,
    /// Hours worked.
    pub hours: Decimal,
    /// Pay multiplier.
    pub rate_multiplier: Decimal,
    /// Justification.
    #[serde(default)]
    pub reason: String,
}

impl From<NewOvertimeRequest> for OvertimeRecord {
    fn from(req: NewOvertimeRequest) -> Self {
        OvertimeRecord {
            id: req.id,
            employee_id: req.employee_id,
            date: req.date,
            hours: req.hours,
            rate_multiplier: req.rate_multiplier,
            reason: req.reason,
            status: OvertimeStatus::Pending,
        }
    }
}
