//! Core data models for the payroll engine.
//!
//! This module contains the roster, ledger, period and output types used
//! throughout the engine.

use rust_decimal::Decimal;

mod employee;
mod loan;
mod overtime;
mod pay_period;
mod payroll_record;

pub use employee::Employee;
pub use loan::{Loan, LoanStatus, LoanType};
pub use overtime::{OvertimeRecord, OvertimeStatus};
pub use pay_period::{PERIOD_DATE_FORMAT, PayPeriod, PeriodHalf};
pub use payroll_record::{
    Deductions, Earnings, EmployeeRejection, LoanDeduction, PayAdjustment, PayrollRecord,
    PayrollRun, PayrollStatus, RunTotals,
};

/// Largest monetary amount accepted on any input (one trillion).
///
/// Salaries, loan amounts and adjustments are bounded by it, which keeps
/// annualized and summed figures within `Decimal` range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0); // 1_000_000_000_000
