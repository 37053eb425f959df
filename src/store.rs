//! In-memory payroll ledger.
//!
//! The [`PayrollLedger`] keeps the roster, the overtime and loan ledgers and
//! the generated payroll records together. It runs the engine over its own
//! data and carries the overtime approval, loan and payment workflows that
//! change that data between runs.

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{PayrollInputs, generate_payroll};
use crate::config::{ConfigLoader, PayrollPolicy};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Employee, Loan, OvertimeRecord, OvertimeStatus, PayAdjustment, PayPeriod, PayrollRecord,
    PayrollRun, PayrollStatus,
};

/// Seed data for a ledger, as stored in a roster YAML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterFile {
    /// Employees on the payroll.
    pub employees: Vec<Employee>,
    /// Loans being repaid through payroll.
    #[serde(default)]
    pub loans: Vec<Loan>,
    /// Filed overtime.
    #[serde(default)]
    pub overtime: Vec<OvertimeRecord>,
}

/// Roster, ledgers and generated records for one payroll policy.
///
/// # Example
///
/// ```
/// use payroll_engine::config::PayrollPolicy;
/// use payroll_engine::models::{Employee, PayPeriod};
/// use payroll_engine::store::{PayrollLedger, RosterFile};
/// use rust_decimal::Decimal;
///
/// let roster = RosterFile {
///     employees: vec![Employee {
///         id: "5".to_string(),
///         name: "Jose Garcia".to_string(),
///         role: "Mason".to_string(),
///         department: "Construction".to_string(),
///         monthly_salary: Decimal::new(18000, 0),
///     }],
///     ..RosterFile::default()
/// };
/// let mut ledger = PayrollLedger::new(PayrollPolicy::default(), roster);
///
/// let period = PayPeriod::parse("2025-11-01", "2025-11-15").unwrap();
/// let run = ledger.generate_payroll(&period, &[]).unwrap();
///
/// assert_eq!(run.records.len(), 1);
/// assert_eq!(ledger.records_by_period(&period).len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct PayrollLedger {
    policy: PayrollPolicy,
    employees: Vec<Employee>,
    loans: Vec<Loan>,
    overtime: Vec<OvertimeRecord>,
    records: Vec<PayrollRecord>,
}

impl PayrollLedger {
    /// Creates a ledger seeded with a roster and its ledgers.
    pub fn new(policy: PayrollPolicy, roster: RosterFile) -> Self {
        Self {
            policy,
            employees: roster.employees,
            loans: roster.loans,
            overtime: roster.overtime,
            records: Vec::new(),
        }
    }

    /// Creates a ledger with no employees.
    pub fn empty(policy: PayrollPolicy) -> Self {
        Self::new(policy, RosterFile::default())
    }

    /// Loads a roster YAML file and seeds a ledger with it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` or `ConfigParseError` if the file cannot be
    /// read or parsed.
    pub fn from_roster_file<P: AsRef<Path>>(path: P, policy: PayrollPolicy) -> EngineResult<Self> {
        let path = path.as_ref();
        let roster: RosterFile = ConfigLoader::load_yaml(path)?;

        info!(
            path = %path.display(),
            employees = roster.employees.len(),
            loans = roster.loans.len(),
            overtime = roster.overtime.len(),
            "Loaded payroll roster"
        );

        Ok(Self::new(policy, roster))
    }

    /// The policy this ledger generates payroll under.
    pub fn policy(&self) -> &PayrollPolicy {
        &self.policy
    }

    /// Employees on the roster.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Runs payroll for a period over the current roster and ledgers.
    ///
    /// Draft records previously generated for exactly this period are
    /// replaced. Once any record for the period has moved past draft the
    /// period is closed and cannot be regenerated.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPeriod`] for a malformed period and
    /// [`EngineError::InvalidStatusTransition`] when the period already has
    /// pending or paid records.
    pub fn generate_payroll(
        &mut self,
        period: &PayPeriod,
        adjustments: &[PayAdjustment],
    ) -> EngineResult<PayrollRun> {
        if let Some(record) = self
            .records
            .iter()
            .find(|record| record.is_for_period(period) && record.status != PayrollStatus::Draft)
        {
            warn!(
                record_id = %record.id,
                status = %record.status,
                period_start = %period.start_date,
                period_end = %period.end_date,
                "Refusing to regenerate a period with advanced records"
            );
            return Err(EngineError::InvalidStatusTransition {
                record_id: record.id.to_string(),
                from: record.status,
                to: PayrollStatus::Draft,
            });
        }

        let inputs = PayrollInputs::new(&self.employees, &self.overtime, &self.loans)
            .with_adjustments(adjustments);
        let run = generate_payroll(&inputs, period, &self.policy)?;

        let replaced = self.records.len();
        self.records.retain(|record| !record.is_for_period(period));
        let replaced = replaced - self.records.len();
        if replaced > 0 {
            debug!(replaced, "Replaced previously generated records for period");
        }

        self.records.extend(run.records.iter().cloned());
        Ok(run)
    }

    /// Moves a payroll record forward in its lifecycle.
    ///
    /// Marking a record [`PayrollStatus::Paid`] stamps `paid_on` and applies
    /// each of the record's loan deductions to the loan it was computed from.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` for an unknown id and
    /// `InvalidStatusTransition` for a backward or same-state move.
    pub fn update_status(
        &mut self,
        record_id: Uuid,
        status: PayrollStatus,
        paid_on: NaiveDate,
    ) -> EngineResult<PayrollRecord> {
        let record = self
            .records
            .iter_mut()
            .find(|record| record.id == record_id)
            .ok_or_else(|| EngineError::RecordNotFound {
                kind: "Payroll record".to_string(),
                id: record_id.to_string(),
            })?;

        let from = record.status;
        record.advance_status(status, paid_on)?;
        let record = record.clone();

        info!(
            record_id = %record_id,
            employee_id = %record.employee_id,
            from = %from,
            to = %status,
            "Payroll record status updated"
        );

        if status == PayrollStatus::Paid {
            self.apply_loan_payments(&record);
        }

        Ok(record)
    }

    /// Applies a paid record's per-loan deductions to the loan ledger.
    ///
    /// A share that cannot be applied in full, because the loan is settled,
    /// missing or owes less, is logged and dropped.
    fn apply_loan_payments(&mut self, record: &PayrollRecord) {
        for deduction in &record.loan_deductions {
            let applied = match self.loans.iter_mut().find(|loan| loan.id == deduction.loan_id) {
                Some(loan) => {
                    let applied = loan.apply_payment(deduction.amount);
                    debug!(
                        loan_id = %loan.id,
                        applied = %applied,
                        remaining_balance = %loan.remaining_balance,
                        "Applied payroll loan deduction"
                    );
                    applied
                }
                None => Decimal::ZERO,
            };

            let unapplied = deduction.amount - applied;
            if !unapplied.is_zero() {
                warn!(
                    record_id = %record.id,
                    employee_id = %record.employee_id,
                    loan_id = %deduction.loan_id,
                    unapplied = %unapplied,
                    "Loan deduction could not be applied in full"
                );
            }
        }
    }

    /// Adds a loan to the ledger, assigning an id when none is given.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if the employee is not on the roster and
    /// `InvalidLoan` for negative amounts or a duplicate id.
    pub fn add_loan(&mut self, mut loan: Loan) -> EngineResult<Loan> {
        self.require_employee(&loan.employee_id)?;
        loan.validate()?;

        if loan.id.is_empty() {
            loan.id = Uuid::new_v4().to_string();
        } else if self.loans.iter().any(|existing| existing.id == loan.id) {
            return Err(EngineError::InvalidLoan {
                loan_id: loan.id,
                message: "a loan with this id already exists".to_string(),
            });
        }

        info!(loan_id = %loan.id, employee_id = %loan.employee_id, "Loan added");
        self.loans.push(loan.clone());
        Ok(loan)
    }

    /// Files an overtime record. It always starts as pending.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if the employee is not on the roster and
    /// `InvalidOvertime` for invalid hours or multiplier or a duplicate id.
    pub fn add_overtime(&mut self, mut record: OvertimeRecord) -> EngineResult<OvertimeRecord> {
        self.require_employee(&record.employee_id)?;
        record.validate()?;

        if record.id.is_empty() {
            record.id = Uuid::new_v4().to_string();
        } else if self.overtime.iter().any(|existing| existing.id == record.id) {
            return Err(EngineError::InvalidOvertime {
                record_id: record.id,
                message: "an overtime record with this id already exists".to_string(),
            });
        }
        record.status = OvertimeStatus::Pending;

        info!(overtime_id = %record.id, employee_id = %record.employee_id, "Overtime filed");
        self.overtime.push(record.clone());
        Ok(record)
    }

    /// Approves a pending overtime record.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` for an unknown id and `InvalidOvertime` if
    /// the record is no longer pending.
    pub fn approve_overtime(&mut self, id: &str) -> EngineResult<OvertimeRecord> {
        self.review_overtime(id, OvertimeStatus::Approved)
    }

    /// Rejects a pending overtime record.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` for an unknown id and `InvalidOvertime` if
    /// the record is no longer pending.
    pub fn reject_overtime(&mut self, id: &str) -> EngineResult<OvertimeRecord> {
        self.review_overtime(id, OvertimeStatus::Rejected)
    }

    fn review_overtime(
        &mut self,
        id: &str,
        decision: OvertimeStatus,
    ) -> EngineResult<OvertimeRecord> {
        let record = self
            .overtime
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| EngineError::RecordNotFound {
                kind: "Overtime record".to_string(),
                id: id.to_string(),
            })?;

        if record.status != OvertimeStatus::Pending {
            return Err(EngineError::InvalidOvertime {
                record_id: id.to_string(),
                message: format!("only pending overtime can be reviewed (is {:?})", record.status),
            });
        }

        record.status = decision;
        info!(overtime_id = %id, status = ?decision, "Overtime reviewed");
        Ok(record.clone())
    }

    fn require_employee(&self, employee_id: &str) -> EngineResult<()> {
        if self.employees.iter().any(|e| e.id == employee_id) {
            Ok(())
        } else {
            Err(EngineError::RecordNotFound {
                kind: "Employee".to_string(),
                id: employee_id.to_string(),
            })
        }
    }

    /// Every generated payroll record.
    pub fn records(&self) -> &[PayrollRecord] {
        &self.records
    }

    /// Generated records for exactly this period, in roster order.
    pub fn records_by_period(&self, period: &PayPeriod) -> Vec<&PayrollRecord> {
        self.records
            .iter()
            .filter(|record| record.is_for_period(period))
            .collect()
    }

    /// Every loan on the ledger.
    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    /// Loans taken by one employee.
    pub fn loans_by_employee(&self, employee_id: &str) -> Vec<&Loan> {
        self.loans
            .iter()
            .filter(|loan| loan.employee_id == employee_id)
            .collect()
    }

    /// Every overtime record on the ledger.
    pub fn overtime_records(&self) -> &[OvertimeRecord] {
        &self.overtime
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LoanStatus, LoanType};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn employee(id: &str, salary: &str) -> Employee {
        Employee {
            id: id.to_string(),
            name: format!("Employee {}", id),
            role: "Electrician".to_string(),
            department: "Construction".to_string(),
            monthly_salary: dec(salary),
        }
    }

    fn loan(id: &str, employee_id: &str, balance: &str, amortization: &str) -> Loan {
        Loan {
            id: id.to_string(),
            employee_id: employee_id.to_string(),
            loan_type: LoanType::Company,
            total_amount: dec("25000"),
            remaining_balance: dec(balance),
            monthly_amortization: dec(amortization),
            start_date: date("2025-01-01"),
            end_date: date("2026-12-01"),
            status: LoanStatus::Active,
        }
    }

    fn overtime(id: &str, employee_id: &str, status: OvertimeStatus) -> OvertimeRecord {
        OvertimeRecord {
            id: id.to_string(),
            employee_id: employee_id.to_string(),
            date: date("2025-11-20"),
            hours: dec("4"),
            rate_multiplier: dec("1.25"),
            reason: "Concrete pouring".to_string(),
            status,
        }
    }

    fn ledger() -> PayrollLedger {
        PayrollLedger::new(
            PayrollPolicy::default(),
            RosterFile {
                employees: vec![employee("3", "28000"), employee("7", "17600")],
                loans: vec![loan("l1", "3", "18000", "1500")],
                overtime: vec![overtime("ot1", "7", OvertimeStatus::Approved)],
            },
        )
    }

    fn period() -> PayPeriod {
        PayPeriod::parse("2025-11-16", "2025-11-30").unwrap()
    }

    #[test]
    fn test_generate_stores_records() {
        let mut ledger = ledger();
        let run = ledger.generate_payroll(&period(), &[]).unwrap();

        assert_eq!(run.records.len(), 2);
        assert_eq!(ledger.records().len(), 2);
        assert_eq!(ledger.records()[1].earnings.overtime_pay, dec("500"));
    }

    #[test]
    fn test_regenerating_replaces_records_for_period() {
        let mut ledger = ledger();
        ledger.generate_payroll(&period(), &[]).unwrap();
        let second = ledger.generate_payroll(&period(), &[]).unwrap();

        assert_eq!(ledger.records().len(), 2);
        assert_eq!(ledger.records()[0].id, second.records[0].id);
    }

    #[test]
    fn test_regenerating_a_paid_period_is_refused() {
        let mut ledger = ledger();
        let run = ledger.generate_payroll(&period(), &[]).unwrap();
        let record_id = run.records[0].id;
        ledger
            .update_status(record_id, PayrollStatus::Paid, date("2025-11-30"))
            .unwrap();
        assert_eq!(ledger.loans()[0].remaining_balance, dec("17250"));

        let result = ledger.generate_payroll(&period(), &[]);

        assert!(matches!(
            result,
            Err(EngineError::InvalidStatusTransition {
                from: PayrollStatus::Paid,
                to: PayrollStatus::Draft,
                ..
            })
        ));
        let stored = ledger.records_by_period(&period());
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].id, record_id);
        assert_eq!(stored[0].status, PayrollStatus::Paid);

        // The paid record cannot be paid a second time
        let again = ledger.update_status(record_id, PayrollStatus::Paid, date("2025-12-01"));
        assert!(again.is_err());
        assert_eq!(ledger.loans()[0].remaining_balance, dec("17250"));
    }

    #[test]
    fn test_regenerating_a_pending_period_is_refused() {
        let mut ledger = ledger();
        let run = ledger.generate_payroll(&period(), &[]).unwrap();
        ledger
            .update_status(run.records[1].id, PayrollStatus::Pending, date("2025-11-30"))
            .unwrap();

        assert!(ledger.generate_payroll(&period(), &[]).is_err());
        assert_eq!(ledger.records().len(), 2);

        let first_half = PayPeriod::parse("2025-11-01", "2025-11-15").unwrap();
        assert!(ledger.generate_payroll(&first_half, &[]).is_ok());
    }

    #[test]
    fn test_other_periods_are_kept() {
        let mut ledger = ledger();
        let first_half = PayPeriod::parse("2025-11-01", "2025-11-15").unwrap();
        ledger.generate_payroll(&first_half, &[]).unwrap();
        ledger.generate_payroll(&period(), &[]).unwrap();

        assert_eq!(ledger.records().len(), 4);
        assert_eq!(ledger.records_by_period(&first_half).len(), 2);
    }

    #[test]
    fn test_paying_a_record_reduces_loan_balance() {
        let mut ledger = ledger();
        let run = ledger.generate_payroll(&period(), &[]).unwrap();
        let record_id = run.records[0].id;
        assert_eq!(run.records[0].deductions.loans, dec("750"));

        ledger
            .update_status(record_id, PayrollStatus::Pending, date("2025-11-30"))
            .unwrap();
        assert_eq!(ledger.loans()[0].remaining_balance, dec("18000"));

        let paid = ledger
            .update_status(record_id, PayrollStatus::Paid, date("2025-12-01"))
            .unwrap();

        assert_eq!(paid.payment_date, Some(date("2025-12-01")));
        assert_eq!(ledger.loans()[0].remaining_balance, dec("17250"));
    }

    #[test]
    fn test_loan_payment_split_across_loans() {
        let mut ledger = PayrollLedger::new(
            PayrollPolicy::default(),
            RosterFile {
                employees: vec![employee("3", "28000")],
                loans: vec![loan("l1", "3", "5000", "1000"), loan("l2", "3", "200", "1500")],
                overtime: vec![],
            },
        );
        let run = ledger.generate_payroll(&period(), &[]).unwrap();
        assert_eq!(run.records[0].deductions.loans, dec("1250"));

        ledger
            .update_status(run.records[0].id, PayrollStatus::Paid, date("2025-11-30"))
            .unwrap();

        // 1,250 split 2:3 -> 500 and 750, the second capped at its 200 balance
        assert_eq!(ledger.loans()[0].remaining_balance, dec("4500"));
        assert_eq!(ledger.loans()[1].remaining_balance, Decimal::ZERO);
        assert_eq!(ledger.loans()[1].status, LoanStatus::Paid);
    }

    #[test]
    fn test_loan_added_after_run_is_not_charged() {
        let mut ledger = ledger();
        let run = ledger.generate_payroll(&period(), &[]).unwrap();
        ledger.add_loan(loan("l2", "3", "4000", "1000")).unwrap();

        ledger
            .update_status(run.records[0].id, PayrollStatus::Paid, date("2025-11-30"))
            .unwrap();

        assert_eq!(ledger.loans()[0].remaining_balance, dec("17250"));
        assert_eq!(ledger.loans()[1].remaining_balance, dec("4000"));
    }

    #[test]
    fn test_loan_settled_after_run_keeps_other_shares() {
        let mut ledger = PayrollLedger::new(
            PayrollPolicy::default(),
            RosterFile {
                employees: vec![employee("3", "28000")],
                loans: vec![loan("l1", "3", "5000", "1000"), loan("l2", "3", "3000", "1000")],
                overtime: vec![],
            },
        );
        let run = ledger.generate_payroll(&period(), &[]).unwrap();
        ledger.loans[1].status = LoanStatus::Paid;

        ledger
            .update_status(run.records[0].id, PayrollStatus::Paid, date("2025-11-30"))
            .unwrap();

        // Only l1's own 500 share is applied; l2's share is not redirected
        assert_eq!(ledger.loans()[0].remaining_balance, dec("4500"));
        assert_eq!(ledger.loans()[1].remaining_balance, dec("3000"));
    }

    #[test]
    fn test_status_cannot_move_backwards() {
        let mut ledger = ledger();
        let run = ledger.generate_payroll(&period(), &[]).unwrap();
        let record_id = run.records[0].id;
        ledger
            .update_status(record_id, PayrollStatus::Paid, date("2025-11-30"))
            .unwrap();

        let result = ledger.update_status(record_id, PayrollStatus::Pending, date("2025-11-30"));

        assert!(matches!(result, Err(EngineError::InvalidStatusTransition { .. })));
        assert_eq!(ledger.loans()[0].remaining_balance, dec("17250"));
    }

    #[test]
    fn test_update_unknown_record() {
        let mut ledger = ledger();
        let result = ledger.update_status(Uuid::new_v4(), PayrollStatus::Paid, date("2025-11-30"));
        assert!(matches!(result, Err(EngineError::RecordNotFound { .. })));
    }

    #[test]
    fn test_add_overtime_always_starts_pending() {
        let mut ledger = ledger();
        let filed = ledger
            .add_overtime(overtime("ot2", "3", OvertimeStatus::Approved))
            .unwrap();

        assert_eq!(filed.status, OvertimeStatus::Pending);
        assert_eq!(ledger.overtime_records().len(), 2);
    }

    #[test]
    fn test_add_overtime_assigns_missing_id() {
        let mut ledger = ledger();
        let filed = ledger
            .add_overtime(overtime("", "3", OvertimeStatus::Pending))
            .unwrap();
        assert!(!filed.id.is_empty());
    }

    #[test]
    fn test_add_overtime_for_unknown_employee() {
        let mut ledger = ledger();
        let result = ledger.add_overtime(overtime("ot2", "99", OvertimeStatus::Pending));
        assert!(matches!(result, Err(EngineError::RecordNotFound { .. })));
    }

    #[test]
    fn test_approve_and_reject_only_from_pending() {
        let mut ledger = ledger();
        ledger
            .add_overtime(overtime("ot2", "3", OvertimeStatus::Pending))
            .unwrap();

        let approved = ledger.approve_overtime("ot2").unwrap();
        assert_eq!(approved.status, OvertimeStatus::Approved);

        let result = ledger.reject_overtime("ot2");
        assert!(matches!(result, Err(EngineError::InvalidOvertime { .. })));
        assert!(matches!(
            ledger.approve_overtime("missing"),
            Err(EngineError::RecordNotFound { .. })
        ));
    }

    #[test]
    fn test_approved_overtime_is_paid_in_next_run() {
        let mut ledger = ledger();
        ledger
            .add_overtime(overtime("ot2", "3", OvertimeStatus::Pending))
            .unwrap();
        let before = ledger.generate_payroll(&period(), &[]).unwrap();
        assert_eq!(before.records[0].earnings.overtime_pay, Decimal::ZERO);

        ledger.approve_overtime("ot2").unwrap();
        let after = ledger.generate_payroll(&period(), &[]).unwrap();
        assert!(after.records[0].earnings.overtime_pay > Decimal::ZERO);
    }

    #[test]
    fn test_add_loan_rejects_duplicates_and_negatives() {
        let mut ledger = ledger();
        assert!(matches!(
            ledger.add_loan(loan("l1", "3", "100", "100")),
            Err(EngineError::InvalidLoan { .. })
        ));
        assert!(matches!(
            ledger.add_loan(loan("l2", "3", "100", "-100")),
            Err(EngineError::InvalidLoan { .. })
        ));

        ledger.add_loan(loan("l2", "7", "5000", "500")).unwrap();
        assert_eq!(ledger.loans_by_employee("7").len(), 1);
        assert_eq!(ledger.loans_by_employee("3").len(), 1);
    }

    #[test]
    fn test_load_demo_roster() {
        let ledger = PayrollLedger::from_roster_file(
            "./config/ph_2025/roster.yaml",
            PayrollPolicy::default(),
        )
        .unwrap();

        assert_eq!(ledger.employees().len(), 10);
        assert_eq!(ledger.loans().len(), 3);
        assert_eq!(ledger.overtime_records().len(), 8);
    }

    #[test]
    fn test_missing_roster_file() {
        let result =
            PayrollLedger::from_roster_file("./config/missing.yaml", PayrollPolicy::default());
        assert!(matches!(result, Err(EngineError::ConfigNotFound { .. })));
    }
}
