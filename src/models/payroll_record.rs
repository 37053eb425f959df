//! Payroll output models.
//!
//! This module contains the [`PayrollRecord`] produced for each employee in a
//! run, its [`PayrollStatus`] lifecycle, and the [`PayrollRun`] that bundles
//! records with per-employee rejections.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayPeriod;
use crate::error::{EngineError, EngineResult};

/// Lifecycle state of a payroll record.
///
/// Records move forward only: `Draft → Pending → Paid`. Transitions are
/// triggered by approval and payment workflows outside the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    /// Freshly generated, open for review.
    #[default]
    Draft,
    /// Approved and awaiting payment.
    Pending,
    /// Paid out.
    Paid,
}

impl PayrollStatus {
    fn rank(self) -> u8 {
        match self {
            PayrollStatus::Draft => 0,
            PayrollStatus::Pending => 1,
            PayrollStatus::Paid => 2,
        }
    }

    /// Returns true if moving from `self` to `next` goes strictly forward.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::PayrollStatus;
    ///
    /// assert!(PayrollStatus::Draft.can_transition_to(PayrollStatus::Pending));
    /// assert!(PayrollStatus::Draft.can_transition_to(PayrollStatus::Paid));
    /// assert!(!PayrollStatus::Paid.can_transition_to(PayrollStatus::Pending));
    /// assert!(!PayrollStatus::Pending.can_transition_to(PayrollStatus::Pending));
    /// ```
    pub fn can_transition_to(self, next: PayrollStatus) -> bool {
        next.rank() > self.rank()
    }
}

impl fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PayrollStatus::Draft => "Draft",
            PayrollStatus::Pending => "Pending",
            PayrollStatus::Paid => "Paid",
        };
        f.write_str(label)
    }
}

/// Externally supplied earnings and deductions for one employee.
///
/// Anything not supplied defaults to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayAdjustment {
    /// The employee the adjustment applies to.
    pub employee_id: String,
    /// Allowances paid this period.
    #[serde(default)]
    pub allowances: Decimal,
    /// Bonuses paid this period.
    #[serde(default)]
    pub bonuses: Decimal,
    /// Deductions for tardiness this period.
    #[serde(default)]
    pub late_deductions: Decimal,
}

/// Earnings for one employee for one period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Earnings {
    /// The basic salary portion for the period.
    pub basic_salary: Decimal,
    /// Pay for approved overtime.
    pub overtime_pay: Decimal,
    /// Allowances.
    pub allowances: Decimal,
    /// Bonuses.
    pub bonuses: Decimal,
    /// Sum of all of the above.
    pub gross_pay: Decimal,
}

impl Earnings {
    /// Builds earnings with `gross_pay` as the sum of the components.
    pub fn new(
        basic_salary: Decimal,
        overtime_pay: Decimal,
        allowances: Decimal,
        bonuses: Decimal,
    ) -> Self {
        Self {
            basic_salary,
            overtime_pay,
            allowances,
            bonuses,
            gross_pay: basic_salary + overtime_pay + allowances + bonuses,
        }
    }
}

/// Deductions for one employee for one period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deductions {
    /// Social Security System employee share.
    pub sss_contribution: Decimal,
    /// PhilHealth employee share.
    pub philhealth_contribution: Decimal,
    /// Pag-IBIG employee share.
    pub pagibig_contribution: Decimal,
    /// Withholding tax.
    pub withholding_tax: Decimal,
    /// Loan amortizations.
    pub loans: Decimal,
    /// Tardiness deductions.
    pub late_deductions: Decimal,
}

impl Deductions {
    /// The three government contributions.
    pub fn government_contributions(&self) -> Decimal {
        self.sss_contribution + self.philhealth_contribution + self.pagibig_contribution
    }

    /// Every deduction added together.
    pub fn total(&self) -> Decimal {
        self.government_contributions()
            + self.withholding_tax
            + self.loans
            + self.late_deductions
    }
}

/// One loan's share of a record's loan deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanDeduction {
    /// The loan being repaid.
    pub loan_id: String,
    /// Amount deducted for it this period.
    pub amount: Decimal,
}

/// A payroll record: one employee, one period.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{Deductions, Earnings, PayPeriod, PayrollRecord, PayrollStatus};
/// use rust_decimal::Decimal;
///
/// let period = PayPeriod::parse("2025-11-01", "2025-11-15").unwrap();
/// let earnings = Earnings::new(
///     Decimal::new(10000, 0),
///     Decimal::ZERO,
///     Decimal::ZERO,
///     Decimal::ZERO,
/// );
/// let deductions = Deductions {
///     loans: Decimal::new(500, 0),
///     ..Deductions::default()
/// };
///
/// let record = PayrollRecord::new("1", "Juan Dela Cruz", "Project Manager", "Management",
///     &period, earnings, deductions, PayrollStatus::Draft);
///
/// assert_eq!(record.net_pay, Decimal::new(9500, 0));
/// assert!(record.payment_date.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Unique identifier for the record; differs between regenerations.
    pub id: Uuid,
    /// The paid employee.
    pub employee_id: String,
    /// Employee display name at the time of the run.
    pub employee_name: String,
    /// Employee position at the time of the run.
    pub position: String,
    /// Employee department at the time of the run.
    pub department: String,
    /// First day of the period.
    pub period_start: NaiveDate,
    /// Last day of the period.
    pub period_end: NaiveDate,
    /// Earnings breakdown.
    pub earnings: Earnings,
    /// Deductions breakdown.
    pub deductions: Deductions,
    /// Per-loan split of `deductions.loans`, applied to the loans on payment.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub loan_deductions: Vec<LoanDeduction>,
    /// Gross pay minus all deductions.
    pub net_pay: Decimal,
    /// Lifecycle state.
    pub status: PayrollStatus,
    /// The day the record was paid, if it has been.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub payment_date: Option<NaiveDate>,
}

impl PayrollRecord {
    /// Assembles a record, deriving `net_pay` from earnings and deductions.
    ///
    /// A record created as [`PayrollStatus::Paid`] gets the period end as
    /// its payment date.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        employee_id: impl Into<String>,
        employee_name: impl Into<String>,
        position: impl Into<String>,
        department: impl Into<String>,
        period: &PayPeriod,
        earnings: Earnings,
        deductions: Deductions,
        status: PayrollStatus,
    ) -> Self {
        let net_pay = earnings.gross_pay - deductions.total();
        let payment_date = (status == PayrollStatus::Paid).then_some(period.end_date);

        Self {
            id: Uuid::new_v4(),
            employee_id: employee_id.into(),
            employee_name: employee_name.into(),
            position: position.into(),
            department: department.into(),
            period_start: period.start_date,
            period_end: period.end_date,
            earnings,
            deductions,
            loan_deductions: Vec::new(),
            net_pay,
            status,
            payment_date,
        }
    }

    /// Attaches the per-loan split of the loan deduction.
    pub fn with_loan_deductions(mut self, loan_deductions: Vec<LoanDeduction>) -> Self {
        self.loan_deductions = loan_deductions;
        self
    }

    /// Returns true if this record covers exactly the given period.
    pub fn is_for_period(&self, period: &PayPeriod) -> bool {
        self.period_start == period.start_date && self.period_end == period.end_date
    }

    /// Moves the record forward in its lifecycle.
    ///
    /// Moving to [`PayrollStatus::Paid`] stamps `paid_on` as the payment date.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidStatusTransition`] for backward or
    /// same-state moves.
    pub fn advance_status(&mut self, next: PayrollStatus, paid_on: NaiveDate) -> EngineResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(EngineError::InvalidStatusTransition {
                record_id: self.id.to_string(),
                from: self.status,
                to: next,
            });
        }

        self.status = next;
        if next == PayrollStatus::Paid {
            self.payment_date = Some(paid_on);
        }
        Ok(())
    }
}

/// An employee left out of a run because their inputs were invalid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRejection {
    /// The rejected employee.
    pub employee_id: String,
    /// Why the employee was rejected.
    pub reason: String,
}

impl EmployeeRejection {
    /// Builds a rejection from the validation error that caused it.
    pub fn new(employee_id: impl Into<String>, error: &EngineError) -> Self {
        Self {
            employee_id: employee_id.into(),
            reason: error.to_string(),
        }
    }
}

/// Totals across every record in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    /// Number of records produced.
    pub employee_count: usize,
    /// Sum of gross pay.
    pub gross_pay: Decimal,
    /// Sum of all deductions.
    pub total_deductions: Decimal,
    /// Sum of net pay.
    pub net_pay: Decimal,
}

/// The output of one payroll generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// The period the run covers.
    pub period: PayPeriod,
    /// One record per valid employee, in roster order.
    pub records: Vec<PayrollRecord>,
    /// Employees skipped because of invalid inputs.
    pub rejections: Vec<EmployeeRejection>,
    /// Totals across `records`.
    pub totals: RunTotals,
}

impl PayrollRun {
    /// Bundles records and rejections, computing run totals.
    pub fn new(
        period: PayPeriod,
        records: Vec<PayrollRecord>,
        rejections: Vec<EmployeeRejection>,
    ) -> Self {
        let totals = RunTotals {
            employee_count: records.len(),
            gross_pay: records.iter().map(|r| r.earnings.gross_pay).sum(),
            total_deductions: records.iter().map(|r| r.deductions.total()).sum(),
            net_pay: records.iter().map(|r| r.net_pay).sum(),
        };

        Self {
            period,
            records,
            rejections,
            totals,
        }
    }
}
