//! Social Security System contribution calculation.
//!
//! The SSS employee share is a flat 4.5% of monthly salary, bounded by a
//! minimum below the salary floor and a maximum above the salary ceiling.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::SssConfig;

/// Calculates the monthly SSS employee contribution.
///
/// * `salary <= salary_floor` pays `minimum_contribution`
/// * `salary >= salary_ceiling` pays `maximum_contribution`
/// * otherwise `salary * employee_rate`, rounded to the nearest whole unit
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::sss_contribution;
/// use payroll_engine::config::PayrollPolicy;
/// use rust_decimal::Decimal;
///
/// let sss = PayrollPolicy::default().sss;
/// assert_eq!(sss_contribution(Decimal::new(20000, 0), &sss), Decimal::new(900, 0));
/// assert_eq!(sss_contribution(Decimal::new(3000, 0), &sss), Decimal::new(180, 0));
/// assert_eq!(sss_contribution(Decimal::new(50000, 0), &sss), Decimal::new(1350, 0));
/// ```
pub fn sss_contribution(monthly_salary: Decimal, config: &SssConfig) -> Decimal {
    if monthly_salary <= config.salary_floor {
        return config.minimum_contribution;
    }
    if monthly_salary >= config.salary_ceiling {
        return config.maximum_contribution;
    }

    (monthly_salary * config.employee_rate)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
