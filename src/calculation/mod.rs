//! Calculation logic for the payroll engine.
//!
//! This module contains the calculators for overtime pay, the three
//! government contributions (SSS, PhilHealth, Pag-IBIG) and withholding tax,
//! plus the run generator that combines them into payroll records.

mod overtime_pay;
mod pagibig_contribution;
mod payroll_run;
mod philhealth_contribution;
mod sss_contribution;
mod withholding_tax;

pub use overtime_pay::{OvertimePayResult, calculate_overtime_pay, hourly_rate};
pub use pagibig_contribution::pagibig_contribution;
pub use payroll_run::{
    GovernmentContributions, PayrollInputs, calculate_employee_payroll, generate_payroll,
};
pub use philhealth_contribution::philhealth_contribution;
pub use sss_contribution::sss_contribution;
pub use withholding_tax::{WithholdingTaxResult, calculate_withholding_tax};
