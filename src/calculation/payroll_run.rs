//! Payroll run generation.
//!
//! This module turns a roster, the overtime and loan ledgers and a pay period
//! into one [`PayrollRecord`] per employee. It is a pure computation: inputs
//! are only read, and every call allocates fresh records.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{PayrollPolicy, RoundingConfig, TaxableBase};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Deductions, Earnings, Employee, EmployeeRejection, Loan, LoanDeduction, MAX_AMOUNT,
    OvertimeRecord, PayAdjustment, PayPeriod, PayrollRecord, PayrollRun,
};

use super::{
    calculate_overtime_pay, calculate_withholding_tax, pagibig_contribution,
    philhealth_contribution, sss_contribution,
};

/// Everything a payroll run reads besides the period and policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayrollInputs<'a> {
    /// Employees to pay, in output order.
    pub roster: &'a [Employee],
    /// Overtime ledger; only approved records are paid.
    pub overtime: &'a [OvertimeRecord],
    /// Loan ledger; only active loans deduct.
    pub loans: &'a [Loan],
    /// Externally supplied allowances, bonuses and late deductions. Several
    /// entries for one employee are added together.
    pub adjustments: &'a [PayAdjustment],
}

impl<'a> PayrollInputs<'a> {
    /// Creates inputs with no adjustments.
    pub fn new(
        roster: &'a [Employee],
        overtime: &'a [OvertimeRecord],
        loans: &'a [Loan],
    ) -> Self {
        Self {
            roster,
            overtime,
            loans,
            adjustments: &[],
        }
    }

    /// Adds per-employee adjustments.
    pub fn with_adjustments(mut self, adjustments: &'a [PayAdjustment]) -> Self {
        self.adjustments = adjustments;
        self
    }
}

/// The three monthly government contributions for one salary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernmentContributions {
    /// SSS employee share.
    pub sss: Decimal,
    /// PhilHealth employee share.
    pub philhealth: Decimal,
    /// Pag-IBIG employee share.
    pub pagibig: Decimal,
}

impl GovernmentContributions {
    /// Computes the monthly contributions for a salary, rounded per policy.
    pub fn monthly(monthly_salary: Decimal, policy: &PayrollPolicy) -> Self {
        Self {
            sss: policy
                .rounding
                .round(sss_contribution(monthly_salary, &policy.sss)),
            philhealth: policy
                .rounding
                .round(philhealth_contribution(monthly_salary, &policy.philhealth)),
            pagibig: policy
                .rounding
                .round(pagibig_contribution(monthly_salary, &policy.pagibig)),
        }
    }

    /// Sum of the three contributions.
    pub fn total(&self) -> Decimal {
        self.sss + self.philhealth + self.pagibig
    }
}

/// Generates payroll for every employee on the roster.
///
/// Employees whose inputs fail validation (a negative or out-of-range
/// salary, overtime entry, loan or adjustment, or income beyond a bounded
/// tax table) are reported in
/// [`PayrollRun::rejections`] and the rest of the roster is still paid.
/// Ledger entries for employees not on the roster are ignored.
///
/// # Errors
///
/// Returns [`EngineError::InvalidPeriod`] if the period starts after it ends.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{generate_payroll, PayrollInputs};
/// use payroll_engine::config::PayrollPolicy;
/// use payroll_engine::models::{Employee, PayPeriod};
/// use rust_decimal::Decimal;
///
/// let roster = vec![Employee {
///     id: "1".to_string(),
///     name: "Juan Dela Cruz".to_string(),
///     role: "Foreman".to_string(),
///     department: "Construction".to_string(),
///     monthly_salary: Decimal::new(20000, 0),
/// }];
/// let period = PayPeriod::parse("2025-11-16", "2025-11-30").unwrap();
///
/// let run = generate_payroll(
///     &PayrollInputs::new(&roster, &[], &[]),
///     &period,
///     &PayrollPolicy::default(),
/// )
/// .unwrap();
///
/// let record = &run.records[0];
/// assert_eq!(record.earnings.basic_salary, Decimal::new(10000, 0));
/// assert_eq!(record.earnings.gross_pay, Decimal::new(10000, 0));
/// assert_eq!(record.deductions.sss_contribution, Decimal::new(900, 0));
/// ```
pub fn generate_payroll(
    inputs: &PayrollInputs<'_>,
    period: &PayPeriod,
    policy: &PayrollPolicy,
) -> EngineResult<PayrollRun> {
    period.validate()?;

    let roster_ids: HashSet<&str> = inputs.roster.iter().map(|e| e.id.as_str()).collect();
    log_unknown_references(inputs, &roster_ids);

    let overtime_by_employee = group_by_employee(
        inputs
            .overtime
            .iter()
            .filter(|ot| ot.is_approved())
            .filter(|ot| {
                !policy.schedule.overtime_within_period_only || period.contains_date(ot.date)
            }),
        |ot| ot.employee_id.as_str(),
    );
    let loans_by_employee = group_by_employee(
        inputs.loans.iter().filter(|loan| loan.is_active()),
        |loan| loan.employee_id.as_str(),
    );
    let adjustments_by_employee =
        group_by_employee(inputs.adjustments.iter(), |adj| adj.employee_id.as_str());

    let mut records = Vec::with_capacity(inputs.roster.len());
    let mut rejections = Vec::new();

    for employee in inputs.roster {
        let id = employee.id.as_str();
        let adjustments = adjustments_by_employee
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let result = merge_adjustments(adjustments).and_then(|adjustment| {
            calculate_employee_payroll(
                employee,
                overtime_by_employee
                    .get(id)
                    .map(Vec::as_slice)
                    .unwrap_or_default(),
                loans_by_employee
                    .get(id)
                    .map(Vec::as_slice)
                    .unwrap_or_default(),
                adjustment.as_ref(),
                period,
                policy,
            )
        });

        match result {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(employee_id = %id, error = %err, "Employee rejected from payroll run");
                rejections.push(EmployeeRejection::new(id, &err));
            }
        }
    }

    let run = PayrollRun::new(period.clone(), records, rejections);
    info!(
        period_start = %period.start_date,
        period_end = %period.end_date,
        employees = run.totals.employee_count,
        rejected = run.rejections.len(),
        gross_pay = %run.totals.gross_pay,
        net_pay = %run.totals.net_pay,
        "Payroll run generated"
    );

    Ok(run)
}

/// Computes one employee's payroll record for a period.
///
/// `overtime` and `loans` must already be narrowed to this employee's
/// approved overtime and active loans.
///
/// # Errors
///
/// Returns a validation error for the employee, one of their overtime
/// records, loans or adjustment, or `UnsupportedTaxBracket`.
pub fn calculate_employee_payroll(
    employee: &Employee,
    overtime: &[&OvertimeRecord],
    loans: &[&Loan],
    adjustment: Option<&PayAdjustment>,
    period: &PayPeriod,
    policy: &PayrollPolicy,
) -> EngineResult<PayrollRecord> {
    employee.validate()?;
    for record in overtime {
        record.validate()?;
    }
    for loan in loans {
        loan.validate()?;
    }
    if let Some(adjustment) = adjustment {
        validate_adjustment(adjustment)?;
    }

    let schedule = &policy.schedule;
    let rounding = &policy.rounding;
    let salary = employee.monthly_salary;
    let periods_per_month = Decimal::from(schedule.pay_periods_per_month);

    // Earnings
    let basic_salary = rounding.round(salary / periods_per_month);
    let overtime_result = calculate_overtime_pay(salary, overtime.iter().copied(), schedule);
    let overtime_pay = rounding.round(overtime_result.amount);
    let (allowances, bonuses, late_deductions) = adjustment
        .map(|adj| {
            (
                rounding.round(adj.allowances),
                rounding.round(adj.bonuses),
                rounding.round(adj.late_deductions),
            )
        })
        .unwrap_or_default();
    let earnings = Earnings::new(basic_salary, overtime_pay, allowances, bonuses);

    // Government contributions are withheld once a month, in the cutoff run
    let monthly = GovernmentContributions::monthly(salary, policy);
    let is_cutoff = period.is_month_end_cutoff(schedule.month_end_cutoff_day);
    let withheld = if is_cutoff {
        monthly
    } else {
        GovernmentContributions::default()
    };

    let loan_deduction = rounding.round(
        loans
            .iter()
            .map(|loan| loan.monthly_amortization)
            .sum::<Decimal>()
            / periods_per_month,
    );
    let loan_deductions = split_loan_deduction(loan_deduction, loans, rounding);

    let tax_base_contributions = match schedule.taxable_base {
        TaxableBase::WithheldContributions => withheld.total(),
        TaxableBase::FullContributions => monthly.total(),
    };
    let taxable_income = earnings.gross_pay - tax_base_contributions;
    let tax = calculate_withholding_tax(taxable_income, &policy.withholding_tax)?;
    let withholding_tax = rounding.round(tax.period_tax).max(Decimal::ZERO);

    let deductions = Deductions {
        sss_contribution: withheld.sss,
        philhealth_contribution: withheld.philhealth,
        pagibig_contribution: withheld.pagibig,
        withholding_tax,
        loans: loan_deduction,
        late_deductions,
    };

    debug!(
        employee_id = %employee.id,
        cutoff = is_cutoff,
        overtime_records = overtime_result.records_paid,
        active_loans = loans.len(),
        gross_pay = %earnings.gross_pay,
        taxable_income = %taxable_income,
        tax_bracket = ?tax.bracket,
        "Computed employee payroll"
    );

    Ok(PayrollRecord::new(
        employee.id.clone(),
        employee.name.clone(),
        employee.role.clone(),
        employee.department.clone(),
        period,
        earnings,
        deductions,
        schedule.initial_status,
    )
    .with_loan_deductions(loan_deductions))
}

/// Sums the adjustments filed for one employee. Every entry must be valid
/// on its own.
fn merge_adjustments(entries: &[&PayAdjustment]) -> EngineResult<Option<PayAdjustment>> {
    let Some(first) = entries.first() else {
        return Ok(None);
    };

    let mut merged = PayAdjustment {
        employee_id: first.employee_id.clone(),
        ..PayAdjustment::default()
    };
    for entry in entries {
        validate_adjustment(entry)?;
        merged.allowances += entry.allowances;
        merged.bonuses += entry.bonuses;
        merged.late_deductions += entry.late_deductions;
    }
    Ok(Some(merged))
}

/// Splits the loan deduction over the loans it was computed from, in
/// proportion to their amortization. The last loan takes the rounding
/// remainder so the shares add up to `total`.
fn split_loan_deduction(
    total: Decimal,
    loans: &[&Loan],
    rounding: &RoundingConfig,
) -> Vec<LoanDeduction> {
    let total_amortization: Decimal = loans.iter().map(|loan| loan.monthly_amortization).sum();
    if total <= Decimal::ZERO || total_amortization <= Decimal::ZERO {
        return Vec::new();
    }

    let mut remaining = total;
    let mut split = Vec::with_capacity(loans.len());
    for (index, loan) in loans.iter().enumerate() {
        let amount = if index + 1 == loans.len() {
            remaining
        } else {
            rounding
                .round(total * loan.monthly_amortization / total_amortization)
                .min(remaining)
        };
        remaining -= amount;
        if amount > Decimal::ZERO {
            split.push(LoanDeduction {
                loan_id: loan.id.clone(),
                amount,
            });
        }
    }
    split
}

fn validate_adjustment(adjustment: &PayAdjustment) -> EngineResult<()> {
    for (field, value) in [
        ("allowances", adjustment.allowances),
        ("bonuses", adjustment.bonuses),
        ("late_deductions", adjustment.late_deductions),
    ] {
        if value < Decimal::ZERO {
            return Err(EngineError::InvalidEmployee {
                employee_id: adjustment.employee_id.clone(),
                field: field.to_string(),
                message: format!("must not be negative (got {})", value),
            });
        }
        if value > MAX_AMOUNT {
            return Err(EngineError::InvalidEmployee {
                employee_id: adjustment.employee_id.clone(),
                field: field.to_string(),
                message: format!("must not exceed {} (got {})", MAX_AMOUNT, value),
            });
        }
    }
    Ok(())
}

fn group_by_employee<'a, T, I, F>(items: I, key: F) -> HashMap<&'a str, Vec<&'a T>>
where
    I: Iterator<Item = &'a T>,
    F: Fn(&'a T) -> &'a str,
{
    let mut grouped: HashMap<&'a str, Vec<&'a T>> = HashMap::new();
    for item in items {
        grouped.entry(key(item)).or_default().push(item);
    }
    grouped
}

fn log_unknown_references(inputs: &PayrollInputs<'_>, roster_ids: &HashSet<&str>) {
    let unknown_overtime = inputs
        .overtime
        .iter()
        .filter(|ot| !roster_ids.contains(ot.employee_id.as_str()))
        .count();
    let unknown_loans = inputs
        .loans
        .iter()
        .filter(|loan| !roster_ids.contains(loan.employee_id.as_str()))
        .count();

    if unknown_overtime + unknown_loans > 0 {
        debug!(
            overtime_records = unknown_overtime,
            loans = unknown_loans,
            "Ignoring ledger entries for employees not on the roster"
        );
    }
}
