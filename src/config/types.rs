//! Configuration types for payroll policy.
//!
//! This module contains the strongly-typed policy structures that are
//! deserialized from YAML configuration files. [`PayrollPolicy::default`]
//! carries the built-in Philippine 2025 rates.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::PayrollStatus;

/// Which contributions reduce the withholding-tax base.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxableBase {
    /// Subtract only the contributions withheld in this run. Mid-month runs
    /// withhold none, so their full gross is taxed.
    #[default]
    WithheldContributions,
    /// Always subtract the monthly contributions, even in runs that do not
    /// withhold them.
    FullContributions,
}

/// Pay schedule settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Working days in a month, used to derive the daily rate.
    pub working_days_per_month: u32,
    /// Hours in a working day, used to derive the hourly rate.
    pub hours_per_day: u32,
    /// Pay periods in a month; the basic salary and loan amortizations are
    /// split evenly across them.
    pub pay_periods_per_month: u32,
    /// A period ending on or after this day of the month withholds
    /// government contributions.
    pub month_end_cutoff_day: u32,
    /// Status given to freshly generated records.
    #[serde(default)]
    pub initial_status: PayrollStatus,
    /// Only pay approved overtime dated inside the period.
    #[serde(default)]
    pub overtime_within_period_only: bool,
    /// Which contributions reduce the withholding-tax base.
    #[serde(default)]
    pub taxable_base: TaxableBase,
}

/// Social Security System contribution table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SssConfig {
    /// Salaries at or below this pay the minimum contribution.
    pub salary_floor: Decimal,
    /// Salaries at or above this pay the maximum contribution.
    pub salary_ceiling: Decimal,
    /// Contribution at or below the floor.
    pub minimum_contribution: Decimal,
    /// Contribution at or above the ceiling.
    pub maximum_contribution: Decimal,
    /// Employee share of monthly salary between floor and ceiling.
    pub employee_rate: Decimal,
}

/// PhilHealth premium settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhilHealthConfig {
    /// Minimum premium basis.
    pub salary_floor: Decimal,
    /// Maximum premium basis.
    pub salary_ceiling: Decimal,
    /// Total premium rate on the basis.
    pub premium_rate: Decimal,
    /// Fraction of the premium paid by the employee.
    pub employee_share: Decimal,
}

/// Pag-IBIG (housing fund) contribution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagIbigConfig {
    /// Salaries above this pay the capped contribution.
    pub salary_threshold: Decimal,
    /// Rate applied at or below the threshold.
    pub rate: Decimal,
    /// Contribution for salaries above the threshold.
    pub max_contribution: Decimal,
}

/// Government contribution tables, as stored in `contributions.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionsConfig {
    /// SSS table.
    pub sss: SssConfig,
    /// PhilHealth table.
    pub philhealth: PhilHealthConfig,
    /// Pag-IBIG table.
    pub pagibig: PagIbigConfig,
}

/// One row of the annual graduated income-tax table.
///
/// Income in `(over, up_to]` pays `base_tax + (income - over) * marginal_rate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Lower bound of the bracket (exclusive, except for the first bracket).
    pub over: Decimal,
    /// Upper bound of the bracket (inclusive); `None` for an open top bracket.
    #[serde(default)]
    pub up_to: Option<Decimal>,
    /// Tax due on income up to `over`.
    pub base_tax: Decimal,
    /// Rate on the excess over `over`.
    pub marginal_rate: Decimal,
}

impl TaxBracket {
    /// Returns true if the annual income falls inside this bracket.
    pub fn contains(&self, annual_income: Decimal) -> bool {
        annual_income >= self.over && self.up_to.is_none_or(|upper| annual_income <= upper)
    }
}

/// Withholding-tax settings, as stored in `tax_table.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTableConfig {
    /// Pay periods in a year, used to annualize per-period income.
    pub periods_per_year: u32,
    /// Brackets ordered by `over`, contiguous.
    pub brackets: Vec<TaxBracket>,
}

/// Rounding applied to computed monetary amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingConfig {
    /// Decimal places kept on monetary amounts.
    pub scale: u32,
}

impl RoundingConfig {
    /// Rounds a monetary amount to the configured scale, halves away from zero.
    pub fn round(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(self.scale, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// The `policy.yaml` file: schedule and rounding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyFile {
    /// Human-readable policy name.
    pub name: String,
    /// Pay schedule settings.
    pub schedule: ScheduleConfig,
    /// Monetary rounding.
    pub rounding: RoundingConfig,
}

/// The complete payroll policy passed into the engine.
///
/// Every rate, threshold and divisor used by the calculators lives here so
/// that jurisdictions and schedules can change without code changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPolicy {
    /// Human-readable policy name.
    pub name: String,
    /// Pay schedule settings.
    pub schedule: ScheduleConfig,
    /// SSS table.
    pub sss: SssConfig,
    /// PhilHealth table.
    pub philhealth: PhilHealthConfig,
    /// Pag-IBIG table.
    pub pagibig: PagIbigConfig,
    /// Withholding-tax table.
    pub withholding_tax: TaxTableConfig,
    /// Monetary rounding.
    pub rounding: RoundingConfig,
}

impl PayrollPolicy {
    /// Combines the three policy files into one policy.
    pub fn from_parts(
        policy: PolicyFile,
        contributions: ContributionsConfig,
        tax_table: TaxTableConfig,
    ) -> Self {
        Self {
            name: policy.name,
            schedule: policy.schedule,
            sss: contributions.sss,
            philhealth: contributions.philhealth,
            pagibig: contributions.pagibig,
            withholding_tax: tax_table,
            rounding: policy.rounding,
        }
    }

    /// Checks the policy for values the calculators cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPolicy`] naming the first bad field.
    pub fn validate(&self) -> EngineResult<()> {
        let schedule = &self.schedule;
        for (field, value) in [
            ("schedule.working_days_per_month", schedule.working_days_per_month),
            ("schedule.hours_per_day", schedule.hours_per_day),
            ("schedule.pay_periods_per_month", schedule.pay_periods_per_month),
            ("withholding_tax.periods_per_year", self.withholding_tax.periods_per_year),
        ] {
            if value == 0 {
                return Err(invalid_policy(field, "must be greater than zero"));
            }
        }

        if !(1..=31).contains(&schedule.month_end_cutoff_day) {
            return Err(invalid_policy(
                "schedule.month_end_cutoff_day",
                format!("must be between 1 and 31 (got {})", schedule.month_end_cutoff_day),
            ));
        }

        if self.sss.salary_floor > self.sss.salary_ceiling {
            return Err(invalid_policy("sss", "salary floor is above salary ceiling"));
        }
        if self.philhealth.salary_floor > self.philhealth.salary_ceiling {
            return Err(invalid_policy(
                "philhealth",
                "salary floor is above salary ceiling",
            ));
        }

        self.validate_brackets()
    }

    fn validate_brackets(&self) -> EngineResult<()> {
        let brackets = &self.withholding_tax.brackets;
        let first = brackets
            .first()
            .ok_or_else(|| invalid_policy("withholding_tax.brackets", "table is empty"))?;
        if first.over != Decimal::ZERO {
            return Err(invalid_policy(
                "withholding_tax.brackets",
                format!("first bracket must start at 0 (starts at {})", first.over),
            ));
        }

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.marginal_rate < Decimal::ZERO || bracket.base_tax < Decimal::ZERO {
                return Err(invalid_policy(
                    "withholding_tax.brackets",
                    format!("bracket {} has a negative rate or base tax", index + 1),
                ));
            }

            let next = brackets.get(index + 1);
            match (bracket.up_to, next) {
                (Some(upper), Some(next)) if upper != next.over => {
                    return Err(invalid_policy(
                        "withholding_tax.brackets",
                        format!(
                            "bracket {} ends at {} but bracket {} starts at {}",
                            index + 1,
                            upper,
                            index + 2,
                            next.over
                        ),
                    ));
                }
                (Some(upper), _) if upper <= bracket.over => {
                    return Err(invalid_policy(
                        "withholding_tax.brackets",
                        format!("bracket {} is empty", index + 1),
                    ));
                }
                (None, Some(_)) => {
                    return Err(invalid_policy(
                        "withholding_tax.brackets",
                        format!("open bracket {} is not the last bracket", index + 1),
                    ));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

fn invalid_policy(field: &str, message: impl Into<String>) -> EngineError {
    EngineError::InvalidPolicy {
        field: field.to_string(),
        message: message.into(),
    }
}

impl Default for PayrollPolicy {
    /// The Philippine 2025 semi-monthly policy.
    fn default() -> Self {
        Self {
            name: "Philippines 2025 semi-monthly".to_string(),
            schedule: ScheduleConfig {
                working_days_per_month: 22,
                hours_per_day: 8,
                pay_periods_per_month: 2,
                month_end_cutoff_day: 25,
                initial_status: PayrollStatus::Draft,
                overtime_within_period_only: false,
                taxable_base: TaxableBase::WithheldContributions,
            },
            sss: SssConfig {
                salary_floor: Decimal::new(4250, 0),
                salary_ceiling: Decimal::new(29750, 0),
                minimum_contribution: Decimal::new(180, 0),
                maximum_contribution: Decimal::new(1350, 0),
                employee_rate: Decimal::new(45, 3),
            },
            philhealth: PhilHealthConfig {
                salary_floor: Decimal::new(10_000, 0),
                salary_ceiling: Decimal::new(100_000, 0),
                premium_rate: Decimal::new(5, 2),
                employee_share: Decimal::new(5, 1),
            },
            pagibig: PagIbigConfig {
                salary_threshold: Decimal::new(5000, 0),
                rate: Decimal::new(2, 2),
                max_contribution: Decimal::new(100, 0),
            },
            withholding_tax: TaxTableConfig {
                periods_per_year: 24,
                brackets: vec![
                    bracket(0, Some(250_000), 0, Decimal::ZERO),
                    bracket(250_000, Some(400_000), 0, Decimal::new(20, 2)),
                    bracket(400_000, Some(800_000), 30_000, Decimal::new(25, 2)),
                    bracket(800_000, Some(2_000_000), 130_000, Decimal::new(30, 2)),
                    bracket(2_000_000, Some(8_000_000), 490_000, Decimal::new(32, 2)),
                    bracket(8_000_000, None, 2_410_000, Decimal::new(35, 2)),
                ],
            },
            rounding: RoundingConfig { scale: 2 },
        }
    }
}

fn bracket(over: i64, up_to: Option<i64>, base_tax: i64, marginal_rate: Decimal) -> TaxBracket {
    TaxBracket {
        over: Decimal::from(over),
        up_to: up_to.map(Decimal::from),
        base_tax: Decimal::from(base_tax),
        marginal_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_default_policy_is_valid() {
        assert!(PayrollPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_default_schedule_constants() {
        let policy = PayrollPolicy::default();
        assert_eq!(policy.schedule.working_days_per_month, 22);
        assert_eq!(policy.schedule.hours_per_day, 8);
        assert_eq!(policy.schedule.pay_periods_per_month, 2);
        assert_eq!(policy.schedule.month_end_cutoff_day, 25);
        assert_eq!(policy.schedule.initial_status, PayrollStatus::Draft);
    }

    #[test]
    fn test_default_rates() {
        let policy = PayrollPolicy::default();
        assert_eq!(policy.sss.employee_rate, dec("0.045"));
        assert_eq!(policy.philhealth.premium_rate, dec("0.05"));
        assert_eq!(policy.philhealth.employee_share, dec("0.5"));
        assert_eq!(policy.pagibig.rate, dec("0.02"));
    }

    #[test]
    fn test_zero_divisor_is_rejected() {
        let mut policy = PayrollPolicy::default();
        policy.schedule.hours_per_day = 0;

        match policy.validate() {
            Err(EngineError::InvalidPolicy { field, .. }) => {
                assert_eq!(field, "schedule.hours_per_day");
            }
            other => panic!("Expected InvalidPolicy error, got {:?}", other),
        }
    }

    #[test]
    fn test_cutoff_day_out_of_range_is_rejected() {
        let mut policy = PayrollPolicy::default();
        policy.schedule.month_end_cutoff_day = 32;
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_inverted_sss_range_is_rejected() {
        let mut policy = PayrollPolicy::default();
        policy.sss.salary_floor = dec("40000");
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_gap_between_brackets_is_rejected() {
        let mut policy = PayrollPolicy::default();
        policy.withholding_tax.brackets[1].over = dec("260000");

        let err = policy.validate().unwrap_err();
        assert!(err.to_string().contains("ends at 250000"));
    }

    #[test]
    fn test_open_bracket_must_be_last() {
        let mut policy = PayrollPolicy::default();
        policy.withholding_tax.brackets[2].up_to = None;
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_empty_bracket_table_is_rejected() {
        let mut policy = PayrollPolicy::default();
        policy.withholding_tax.brackets.clear();
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_bounded_top_bracket_is_allowed() {
        let mut policy = PayrollPolicy::default();
        policy.withholding_tax.brackets.truncate(4);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_bracket_contains_bounds() {
        let policy = PayrollPolicy::default();
        let second = &policy.withholding_tax.brackets[1];
        assert!(second.contains(dec("250000")));
        assert!(second.contains(dec("400000")));
        assert!(!second.contains(dec("400000.01")));
    }

    #[test]
    fn test_rounding_midpoint_away_from_zero() {
        let rounding = RoundingConfig { scale: 2 };
        assert_eq!(rounding.round(dec("340.905")), dec("340.91"));
        assert_eq!(rounding.round(dec("340.904")), dec("340.90"));
    }

    #[test]
    fn test_taxable_base_serialization() {
        assert_eq!(
            serde_json::to_string(&TaxableBase::FullContributions).unwrap(),
            "\"full_contributions\""
        );
    }
}
