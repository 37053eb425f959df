//! Overtime ledger models.
//!
//! Overtime records are filed and approved by a separate workflow; the
//! payroll engine only reads the ones marked [`OvertimeStatus::Approved`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A single record covers one day.
const MAX_HOURS: Decimal = Decimal::from_parts(24, 0, 0, false, 0);
const MAX_RATE_MULTIPLIER: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Approval state of an overtime record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvertimeStatus {
    /// Filed but not yet reviewed.
    Pending,
    /// Approved for payment.
    Approved,
    /// Turned down; never paid.
    Rejected,
}

/// A single block of overtime worked by an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertimeRecord {
    /// Unique identifier for the overtime record.
    pub id: String,
    /// The employee who worked the overtime.
    pub employee_id: String,
    /// The day the overtime was worked.
    pub date: NaiveDate,
    /// Hours worked beyond the regular schedule.
    pub hours: Decimal,
    /// Pay multiplier applied to the hourly rate (e.g. 1.25 regular, 1.3 rest day).
    pub rate_multiplier: Decimal,
    /// Free-text justification.
    #[serde(default)]
    pub reason: String,
    /// Approval state.
    pub status: OvertimeStatus,
}

impl OvertimeRecord {
    /// Returns true if the record is approved for payment.
    pub fn is_approved(&self) -> bool {
        self.status == OvertimeStatus::Approved
    }

    /// Checks that hours and multiplier are usable in a pay calculation.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidOvertime`] for hours outside 0 to 24 or
    /// a multiplier outside (0, 10].
    pub fn validate(&self) -> EngineResult<()> {
        if self.hours < Decimal::ZERO {
            return Err(EngineError::InvalidOvertime {
                record_id: self.id.clone(),
                message: format!("hours must not be negative (got {})", self.hours),
            });
        }
        if self.hours > MAX_HOURS {
            return Err(EngineError::InvalidOvertime {
                record_id: self.id.clone(),
                message: format!("hours must not exceed {} (got {})", MAX_HOURS, self.hours),
            });
        }
        if self.rate_multiplier <= Decimal::ZERO {
            return Err(EngineError::InvalidOvertime {
                record_id: self.id.clone(),
                message: format!(
                    "rate multiplier must be positive (got {})",
                    self.rate_multiplier
                ),
            });
        }
        if self.rate_multiplier > MAX_RATE_MULTIPLIER {
            return Err(EngineError::InvalidOvertime {
                record_id: self.id.clone(),
                message: format!(
                    "rate multiplier must not exceed {} (got {})",
                    MAX_RATE_MULTIPLIER, self.rate_multiplier
                ),
            });
        }
        Ok(())
    }
}
