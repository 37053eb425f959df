//! Pay period model and semi-monthly date utilities.
//!
//! This module contains the [`PayPeriod`] type used as the calculation window
//! for a payroll run, plus helpers for building the two halves of a month.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Date format used for period boundaries on the wire.
pub const PERIOD_DATE_FORMAT: &str = "%Y-%m-%d";

/// Which half of a month a semi-monthly period covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodHalf {
    /// Day 1 through day 15.
    First,
    /// Day 16 through the last day of the month.
    Second,
}

/// Represents a pay window with inclusive start and end dates.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::parse("2025-11-16", "2025-11-30").unwrap();
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 11, 20).unwrap()));
/// assert!(period.is_month_end_cutoff(25));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Creates a pay period, rejecting a start date after the end date.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPeriod`] when `start_date > end_date`.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Self> {
        let period = Self {
            start_date,
            end_date,
        };
        period.validate()?;
        Ok(period)
    }

    /// Parses a pay period from two `YYYY-MM-DD` strings.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPeriod`] when either date is not in
    /// `YYYY-MM-DD` form or the start is after the end.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::PayPeriod;
    ///
    /// assert!(PayPeriod::parse("2025-11-01", "2025-11-15").is_ok());
    /// assert!(PayPeriod::parse("2025-11-15", "2025-11-01").is_err());
    /// assert!(PayPeriod::parse("11/01/2025", "2025-11-15").is_err());
    /// ```
    pub fn parse(start: &str, end: &str) -> EngineResult<Self> {
        let parse_date = |value: &str| {
            NaiveDate::parse_from_str(value, PERIOD_DATE_FORMAT).map_err(|e| {
                EngineError::InvalidPeriod {
                    start: start.to_string(),
                    end: end.to_string(),
                    message: format!("'{}' is not a YYYY-MM-DD date: {}", value, e),
                }
            })
        };

        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Builds one half of a month as a semi-monthly pay period.
    ///
    /// The first half runs from the 1st to the 15th; the second half from
    /// the 16th to the last day of the month.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPeriod`] for a month outside 1..=12.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{PayPeriod, PeriodHalf};
    /// use chrono::NaiveDate;
    ///
    /// let period = PayPeriod::semi_monthly(2024, 2, PeriodHalf::Second).unwrap();
    /// assert_eq!(period.start_date, NaiveDate::from_ymd_opt(2024, 2, 16).unwrap());
    /// assert_eq!(period.end_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    /// ```
    pub fn semi_monthly(year: i32, month: u32, half: PeriodHalf) -> EngineResult<Self> {
        let invalid = || EngineError::InvalidPeriod {
            start: format!("{:04}-{:02}", year, month),
            end: format!("{:04}-{:02}", year, month),
            message: "month must be between 1 and 12".to_string(),
        };

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let (start_day, end_day) = match half {
            PeriodHalf::First => (1, 15),
            PeriodHalf::Second => (16, days_in_month(first)),
        };

        let start = first.with_day(start_day).ok_or_else(invalid)?;
        let end = first.with_day(end_day).ok_or_else(invalid)?;
        Self::new(start, end)
    }

    /// Returns the semi-monthly period that contains `date`.
    pub fn containing(date: NaiveDate) -> EngineResult<Self> {
        let half = if date.day() <= 15 {
            PeriodHalf::First
        } else {
            PeriodHalf::Second
        };
        Self::semi_monthly(date.year(), date.month(), half)
    }

    /// Returns the semi-monthly period that follows this one.
    ///
    /// The following period is the one containing the day after `end_date`.
    pub fn next(&self) -> EngineResult<Self> {
        let following = self
            .end_date
            .succ_opt()
            .ok_or_else(|| EngineError::invalid_period(
                self.start_date,
                self.end_date,
                "no date follows the end of this period",
            ))?;
        Self::containing(following)
    }

    /// Checks that the start date is not after the end date.
    pub fn validate(&self) -> EngineResult<()> {
        if self.start_date > self.end_date {
            return Err(EngineError::invalid_period(
                self.start_date,
                self.end_date,
                "start date is after end date",
            ));
        }
        Ok(())
    }

    /// Checks if a given date falls within this pay period.
    ///
    /// The check is inclusive of both start and end dates.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true when the period ends on or after `cutoff_day` of its month.
    ///
    /// Statutory contributions are withheld only in the month-end run.
    pub fn is_month_end_cutoff(&self, cutoff_day: u32) -> bool {
        self.end_date.day() >= cutoff_day
    }

    /// Number of calendar days in the period, inclusive.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

fn days_in_month(first_of_month: NaiveDate) -> u32 {
    let (year, month) = if first_of_month.month() == 12 {
        (first_of_month.year() + 1, 1)
    } else {
        (first_of_month.year(), first_of_month.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// PP-001: contains_date within period
    #[test]
    fn test_contains_date_within_period() {
        let period = PayPeriod::parse("2025-11-01", "2025-11-15").unwrap();
        assert!(period.contains_date(date(2025, 11, 10)));
        assert!(period.contains_date(period.start_date));
        assert!(period.contains_date(period.end_date));
    }

    /// PP-002: contains_date outside period
    #[test]
    fn test_contains_date_outside_period() {
        let period = PayPeriod::parse("2025-11-01", "2025-11-15").unwrap();
        assert!(!period.contains_date(date(2025, 10, 31)));
        assert!(!period.contains_date(date(2025, 11, 16)));
    }

    /// PP-003: day 30 is a month-end cutoff
    #[test]
    fn test_month_end_cutoff_on_day_30() {
        let period = PayPeriod::parse("2025-11-16", "2025-11-30").unwrap();
        assert!(period.is_month_end_cutoff(25));
    }

    /// PP-004: day 15 is not a month-end cutoff
    #[test]
    fn test_mid_month_is_not_cutoff() {
        let period = PayPeriod::parse("2025-11-01", "2025-11-15").unwrap();
        assert!(!period.is_month_end_cutoff(25));
    }

    #[test]
    fn test_cutoff_day_itself_counts() {
        let period = PayPeriod::parse("2025-11-11", "2025-11-25").unwrap();
        assert!(period.is_month_end_cutoff(25));

        let period = PayPeriod::parse("2025-11-10", "2025-11-24").unwrap();
        assert!(!period.is_month_end_cutoff(25));
    }

    #[test]
    fn test_single_day_period_is_valid() {
        let period = PayPeriod::parse("2025-11-30", "2025-11-30").unwrap();
        assert_eq!(period.days(), 1);
    }

    #[test]
    fn test_start_after_end_is_rejected() {
        let result = PayPeriod::new(date(2025, 11, 30), date(2025, 11, 16));
        match result {
            Err(EngineError::InvalidPeriod { message, .. }) => {
                assert!(message.contains("after"));
            }
            _ => panic!("Expected InvalidPeriod error"),
        }
    }

    #[test]
    fn test_malformed_date_string_is_rejected() {
        let result = PayPeriod::parse("2025-13-01", "2025-11-15");
        assert!(matches!(result, Err(EngineError::InvalidPeriod { .. })));
    }

    #[test]
    fn test_semi_monthly_first_half() {
        let period = PayPeriod::semi_monthly(2025, 11, PeriodHalf::First).unwrap();
        assert_eq!(period.start_date, date(2025, 11, 1));
        assert_eq!(period.end_date, date(2025, 11, 15));
        assert_eq!(period.days(), 15);
    }

    #[test]
    fn test_semi_monthly_second_half_of_31_day_month() {
        let period = PayPeriod::semi_monthly(2025, 12, PeriodHalf::Second).unwrap();
        assert_eq!(period.start_date, date(2025, 12, 16));
        assert_eq!(period.end_date, date(2025, 12, 31));
    }

    #[test]
    fn test_semi_monthly_february_non_leap() {
        let period = PayPeriod::semi_monthly(2025, 2, PeriodHalf::Second).unwrap();
        assert_eq!(period.end_date, date(2025, 2, 28));
        assert!(period.is_month_end_cutoff(25));
    }

    #[test]
    fn test_semi_monthly_invalid_month() {
        assert!(PayPeriod::semi_monthly(2025, 13, PeriodHalf::First).is_err());
        assert!(PayPeriod::semi_monthly(2025, 0, PeriodHalf::First).is_err());
    }

    #[test]
    fn test_next_period_within_month() {
        let period = PayPeriod::semi_monthly(2025, 11, PeriodHalf::First).unwrap();
        let next = period.next().unwrap();
        assert_eq!(next.start_date, date(2025, 11, 16));
        assert_eq!(next.end_date, date(2025, 11, 30));
    }

    #[test]
    fn test_next_period_rolls_over_year() {
        let period = PayPeriod::semi_monthly(2025, 12, PeriodHalf::Second).unwrap();
        let next = period.next().unwrap();
        assert_eq!(next.start_date, date(2026, 1, 1));
        assert_eq!(next.end_date, date(2026, 1, 15));
    }

    #[test]
    fn test_containing_picks_half() {
        let period = PayPeriod::containing(date(2025, 11, 15)).unwrap();
        assert_eq!(period.end_date, date(2025, 11, 15));

        let period = PayPeriod::containing(date(2025, 11, 16)).unwrap();
        assert_eq!(period.start_date, date(2025, 11, 16));
    }

    #[test]
    fn test_serialize_pay_period() {
        let period = PayPeriod::parse("2025-11-16", "2025-11-30").unwrap();
        let json = serde_json::to_string(&period).unwrap();
        assert!(json.contains("\"start_date\":\"2025-11-16\""));
        assert!(json.contains("\"end_date\":\"2025-11-30\""));
    }

    #[test]
    fn test_deserialize_pay_period() {
        let json = r#"{ "start_date": "2025-11-01", "end_date": "2025-11-15" }"#;
        let period: PayPeriod = serde_json::from_str(json).unwrap();
        assert_eq!(period.start_date, date(2025, 11, 1));
        assert_eq!(period.end_date, date(2025, 11, 15));
    }
}
