//! Overtime pay calculation functionality.
//!
//! This module derives an hourly rate from a monthly salary and prices each
//! approved overtime record at that rate times its multiplier.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ScheduleConfig;
use crate::models::OvertimeRecord;

/// The result of pricing an employee's overtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimePayResult {
    /// Hourly rate derived from the monthly salary.
    pub hourly_rate: Decimal,
    /// Total approved hours paid.
    pub hours: Decimal,
    /// Number of approved records paid.
    pub records_paid: usize,
    /// Total overtime pay.
    pub amount: Decimal,
}

/// Derives the hourly rate as `monthly_salary / working_days / hours_per_day`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::hourly_rate;
/// use payroll_engine::config::PayrollPolicy;
/// use rust_decimal::Decimal;
///
/// let policy = PayrollPolicy::default();
/// // 17,600 / 22 / 8 = 100
/// assert_eq!(hourly_rate(Decimal::new(17600, 0), &policy.schedule), Decimal::new(100, 0));
/// ```
pub fn hourly_rate(monthly_salary: Decimal, schedule: &ScheduleConfig) -> Decimal {
    monthly_salary
        / Decimal::from(schedule.working_days_per_month)
        / Decimal::from(schedule.hours_per_day)
}

/// Calculates overtime pay over a set of overtime records.
///
/// Only records with [`OvertimeStatus::Approved`](crate::models::OvertimeStatus)
/// are paid; each pays `hours * hourly_rate * rate_multiplier`. The caller is
/// responsible for passing only the employee's own records.
///
/// # Arguments
///
/// * `monthly_salary` - The employee's monthly salary
/// * `records` - The employee's overtime records
/// * `schedule` - Working days and hours used to derive the hourly rate
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_overtime_pay;
/// use payroll_engine::config::PayrollPolicy;
/// use payroll_engine::models::{OvertimeRecord, OvertimeStatus};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let record = OvertimeRecord {
///     id: "ot1".to_string(),
///     employee_id: "1".to_string(),
///     date: NaiveDate::from_ymd_opt(2025, 11, 18).unwrap(),
///     hours: Decimal::from_str("3").unwrap(),
///     rate_multiplier: Decimal::from_str("1.25").unwrap(),
///     reason: "Site inspection".to_string(),
///     status: OvertimeStatus::Approved,
/// };
///
/// let policy = PayrollPolicy::default();
/// let result = calculate_overtime_pay(Decimal::new(17600, 0), [&record], &policy.schedule);
/// assert_eq!(result.amount, Decimal::from_str("375").unwrap());
/// ```
pub fn calculate_overtime_pay<'a, I>(
    monthly_salary: Decimal,
    records: I,
    schedule: &ScheduleConfig,
) -> OvertimePayResult
where
    I: IntoIterator<Item = &'a OvertimeRecord>,
{
    let rate = hourly_rate(monthly_salary, schedule);

    let mut hours = Decimal::ZERO;
    let mut amount = Decimal::ZERO;
    let mut records_paid = 0;

    for record in records.into_iter().filter(|r| r.is_approved()) {
        hours += record.hours;
        amount += record.hours * rate * record.rate_multiplier;
        records_paid += 1;
    }

    OvertimePayResult {
        hourly_rate: rate,
        hours,
        records_paid,
        amount,
    }
}
