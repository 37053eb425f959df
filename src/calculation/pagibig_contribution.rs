//! Pag-IBIG (Home Development Mutual Fund) contribution calculation.

use rust_decimal::Decimal;

use crate::config::PagIbigConfig;

/// Calculates the monthly Pag-IBIG employee contribution.
///
/// Salaries above `salary_threshold` pay the fixed `max_contribution`;
/// others pay `salary * rate`, which at the default 2% never exceeds the cap.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::pagibig_contribution;
/// use payroll_engine::config::PayrollPolicy;
/// use rust_decimal::Decimal;
///
/// let pagibig = PayrollPolicy::default().pagibig;
/// assert_eq!(pagibig_contribution(Decimal::new(20000, 0), &pagibig), Decimal::new(100, 0));
/// assert_eq!(pagibig_contribution(Decimal::new(3000, 0), &pagibig), Decimal::new(60, 0));
/// ```
pub fn pagibig_contribution(monthly_salary: Decimal, config: &PagIbigConfig) -> Decimal {
    if monthly_salary > config.salary_threshold {
        return config.max_contribution;
    }
    (monthly_salary * config.rate).min(config.max_contribution)
}
