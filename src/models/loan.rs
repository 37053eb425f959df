//! Loan ledger models.
//!
//! Loans are repaid through payroll: every active loan contributes a share of
//! its monthly amortization to each pay period's deductions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::MAX_AMOUNT;
use crate::error::{EngineError, EngineResult};

/// The category of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    /// Social Security System salary loan.
    Sss,
    /// Pag-IBIG multi-purpose loan.
    PagIbig,
    /// Company-issued loan.
    Company,
    /// Cash advance against future pay.
    CashAdvance,
}

impl LoanType {
    /// Returns true for loans issued by a government agency.
    pub fn is_statutory(&self) -> bool {
        matches!(self, LoanType::Sss | LoanType::PagIbig)
    }
}

/// Repayment state of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// Still being repaid.
    Active,
    /// Fully repaid.
    Paid,
}

/// A loan repaid by payroll deduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    /// Unique identifier for the loan.
    pub id: String,
    /// The borrowing employee.
    pub employee_id: String,
    /// The loan category.
    pub loan_type: LoanType,
    /// The principal originally borrowed.
    pub total_amount: Decimal,
    /// The amount still owed.
    pub remaining_balance: Decimal,
    /// The fixed monthly installment.
    pub monthly_amortization: Decimal,
    /// First month of repayment.
    pub start_date: NaiveDate,
    /// Scheduled end of repayment.
    pub end_date: NaiveDate,
    /// Repayment state.
    pub status: LoanStatus,
}

impl Loan {
    /// Returns true if the loan is still being repaid.
    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }

    /// Checks that the loan is well formed.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidLoan`] when an amount is negative or
    /// above [`MAX_AMOUNT`], or when the loan ends before it starts.
    pub fn validate(&self) -> EngineResult<()> {
        for (field, value) in [
            ("total amount", self.total_amount),
            ("remaining balance", self.remaining_balance),
            ("monthly amortization", self.monthly_amortization),
        ] {
            if value < Decimal::ZERO {
                return Err(self.invalid(format!("{} must not be negative (got {})", field, value)));
            }
            if value > MAX_AMOUNT {
                return Err(self.invalid(format!(
                    "{} must not exceed {} (got {})",
                    field, MAX_AMOUNT, value
                )));
            }
        }
        if self.start_date > self.end_date {
            return Err(self.invalid(format!(
                "start date {} is after end date {}",
                self.start_date, self.end_date
            )));
        }
        Ok(())
    }

    fn invalid(&self, message: String) -> EngineError {
        EngineError::InvalidLoan {
            loan_id: self.id.clone(),
            message,
        }
    }

    /// Applies a repayment to the loan and returns the amount actually applied.
    ///
    /// The payment is capped at the remaining balance. A loan whose balance
    /// reaches zero is marked [`LoanStatus::Paid`]. Paid loans accept nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{Loan, LoanStatus, LoanType};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let mut loan = Loan {
    ///     id: "3".to_string(),
    ///     employee_id: "7".to_string(),
    ///     loan_type: LoanType::CashAdvance,
    ///     total_amount: Decimal::new(5000, 0),
    ///     remaining_balance: Decimal::new(200, 0),
    ///     monthly_amortization: Decimal::new(500, 0),
    ///     start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
    ///     end_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
    ///     status: LoanStatus::Active,
    /// };
    ///
    /// assert_eq!(loan.apply_payment(Decimal::new(250, 0)), Decimal::new(200, 0));
    /// assert_eq!(loan.status, LoanStatus::Paid);
    /// ```
    pub fn apply_payment(&mut self, amount: Decimal) -> Decimal {
        if !self.is_active() || amount <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let applied = amount.min(self.remaining_balance);
        self.remaining_balance -= applied;
        if self.remaining_balance.is_zero() {
            self.status = LoanStatus::Paid;
        }
        applied
    }
}
