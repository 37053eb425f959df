//! Withholding tax calculation functionality.
//!
//! This module applies the graduated annual income-tax table to a
//! per-period taxable income. The per-period figure is annualized, taxed
//! against the bracket it falls in, and the annual tax is spread back over
//! the periods in a year.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{TaxBracket, TaxTableConfig};
use crate::error::{EngineError, EngineResult};

/// The result of a withholding tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingTaxResult {
    /// Taxable income multiplied by the periods in a year.
    pub annual_income: Decimal,
    /// Tax for the whole year at the matching bracket.
    pub annual_tax: Decimal,
    /// Tax to withhold this period; never negative.
    pub period_tax: Decimal,
    /// Position of the matching bracket in the table (1-based), if any income is taxable.
    pub bracket: Option<usize>,
}

/// Calculates the withholding tax for one pay period.
///
/// # Arguments
///
/// * `taxable_income` - Gross pay for the period less the contributions
///   that reduce the tax base
/// * `table` - Periods per year and the annual bracket table
///
/// # Returns
///
/// Returns the per-period tax, or `UnsupportedTaxBracket` when the
/// annualized income lies above a bounded top bracket. Non-positive income
/// pays no tax.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_withholding_tax;
/// use payroll_engine::config::PayrollPolicy;
/// use rust_decimal::Decimal;
///
/// let table = PayrollPolicy::default().withholding_tax;
///
/// // 10,000 * 24 = 240,000 per year: exempt
/// let result = calculate_withholding_tax(Decimal::new(10000, 0), &table).unwrap();
/// assert_eq!(result.period_tax, Decimal::ZERO);
///
/// // 20,000 * 24 = 480,000: 30,000 + 25% of 80,000 = 50,000 per year
/// let result = calculate_withholding_tax(Decimal::new(20000, 0), &table).unwrap();
/// assert_eq!(result.annual_tax, Decimal::new(50000, 0));
/// assert_eq!(result.period_tax.round_dp(2), Decimal::new(208333, 2));
/// ```
pub fn calculate_withholding_tax(
    taxable_income: Decimal,
    table: &TaxTableConfig,
) -> EngineResult<WithholdingTaxResult> {
    let periods = Decimal::from(table.periods_per_year);
    let annual_income = taxable_income * periods;

    if annual_income <= Decimal::ZERO {
        return Ok(WithholdingTaxResult {
            annual_income,
            annual_tax: Decimal::ZERO,
            period_tax: Decimal::ZERO,
            bracket: None,
        });
    }

    let (index, bracket) = find_bracket(annual_income, &table.brackets)
        .ok_or(EngineError::UnsupportedTaxBracket { annual_income })?;

    let annual_tax = bracket.base_tax + (annual_income - bracket.over) * bracket.marginal_rate;
    let period_tax = (annual_tax / periods).max(Decimal::ZERO);

    Ok(WithholdingTaxResult {
        annual_income,
        annual_tax,
        period_tax,
        bracket: Some(index + 1),
    })
}

fn find_bracket(annual_income: Decimal, brackets: &[TaxBracket]) -> Option<(usize, &TaxBracket)> {
    brackets
        .iter()
        .enumerate()
        .find(|(_, bracket)| bracket.contains(annual_income))
}
