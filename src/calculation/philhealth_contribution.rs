//! PhilHealth premium calculation.

use rust_decimal::Decimal;

use crate::config::PhilHealthConfig;

/// Calculates the monthly PhilHealth employee share.
///
/// The salary is clamped into `[salary_floor, salary_ceiling]` to get the
/// premium basis; the employee pays `employee_share` of
/// `basis * premium_rate`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::philhealth_contribution;
/// use payroll_engine::config::PayrollPolicy;
/// use rust_decimal::Decimal;
///
/// let philhealth = PayrollPolicy::default().philhealth;
/// assert_eq!(philhealth_contribution(Decimal::new(25000, 0), &philhealth), Decimal::new(625, 0));
/// assert_eq!(philhealth_contribution(Decimal::new(8000, 0), &philhealth), Decimal::new(250, 0));
/// ```
pub fn philhealth_contribution(monthly_salary: Decimal, config: &PhilHealthConfig) -> Decimal {
    let basis = monthly_salary.max(config.salary_floor).min(config.salary_ceiling);
    basis * config.premium_rate * config.employee_share
}
