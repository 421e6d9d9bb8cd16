//! Statutory deduction functions.
//!
//! Each function is a pure lookup over the configured [`RateTable`]. They
//! share one signature so that [`DEDUCTION_TABLE`] can map every
//! [`DeductionKind`] to its function and callers can iterate deductions
//! uniformly.

use rust_decimal::Decimal;

use crate::config::RateTable;
use crate::error::{EngineError, EngineResult};
use crate::models::DeductionKind;

/// Signature shared by every deduction function.
pub type DeductionFn = fn(Decimal, &RateTable) -> EngineResult<Decimal>;

/// Deduction kinds mapped to their functions, in itemization order.
pub const DEDUCTION_TABLE: [(DeductionKind, DeductionFn); 4] = [
    (DeductionKind::SocialInsurance, social_insurance),
    (DeductionKind::HealthInsurance, health_insurance),
    (DeductionKind::HousingFund, housing_fund),
    (DeductionKind::WithholdingTax, withholding_tax),
];

/// Returns the function computing `kind`.
pub fn deduction_fn(kind: DeductionKind) -> DeductionFn {
    match kind {
        DeductionKind::SocialInsurance => social_insurance,
        DeductionKind::HealthInsurance => health_insurance,
        DeductionKind::HousingFund => housing_fund,
        DeductionKind::WithholdingTax => withholding_tax,
    }
}

fn ensure_non_negative(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            field,
            format!("{} must not be negative", value),
        ));
    }
    Ok(())
}

/// Social insurance contribution on monthly gross pay.
///
/// Below the floor threshold the minimum applies; through the ceiling the
/// contribution grows per salary step from the base salary; above the
/// ceiling the maximum applies. The result never exceeds the maximum.
///
/// # Errors
///
/// Returns `InvalidInput` for negative gross pay.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::social_insurance;
/// use payroll_engine::config::RateTable;
/// use rust_decimal::Decimal;
///
/// let rates = RateTable::default();
/// let amount = social_insurance(Decimal::new(10000, 0), &rates).unwrap();
/// assert_eq!(amount, Decimal::new(450, 0));
/// ```
pub fn social_insurance(gross_pay: Decimal, rates: &RateTable) -> EngineResult<Decimal> {
    ensure_non_negative("gross_pay", gross_pay)?;
    let table = &rates.social_insurance;

    let amount = if gross_pay < table.floor_threshold {
        table.minimum
    } else if gross_pay <= table.ceiling {
        table.minimum + (gross_pay - table.base_salary) / table.step * table.step_amount
    } else {
        table.maximum
    };

    Ok(amount.min(table.maximum))
}

/// Employee share of the health insurance premium on monthly gross pay.
///
/// # Errors
///
/// Returns `InvalidInput` for negative gross pay.
pub fn health_insurance(gross_pay: Decimal, rates: &RateTable) -> EngineResult<Decimal> {
    ensure_non_negative("gross_pay", gross_pay)?;
    let premium = &rates.health_insurance;
    Ok(gross_pay * premium.rate * premium.employee_share)
}

/// Housing fund contribution: a percentage of gross pay up to a ceiling.
///
/// # Errors
///
/// Returns `InvalidInput` for negative gross pay.
pub fn housing_fund(gross_pay: Decimal, rates: &RateTable) -> EngineResult<Decimal> {
    ensure_non_negative("gross_pay", gross_pay)?;
    let fund = &rates.housing_fund;
    Ok((gross_pay * fund.rate).min(fund.cap))
}

/// Progressive withholding tax on taxable income (gross less contributions).
///
/// The bracket containing the income applies its formula. The result is
/// floored at what the previous bracket reached at its upper bound, so
/// rounded bracket bases never make the tax dip at a boundary or go
/// below zero.
///
/// This departs from the published bases on purpose. Just above 66,667 the
/// published formula gives 10,833.00 plus 30% of the excess, but this
/// function returns the 10,833.50 the lower bracket already reached, until
/// the published formula catches up. Just above 20,832 the result is zero
/// where the published formula is slightly negative.
///
/// # Errors
///
/// Returns `InvalidInput` for negative taxable income.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::withholding_tax;
/// use payroll_engine::config::RateTable;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rates = RateTable::default();
/// let tax = withholding_tax(Decimal::new(50000, 0), &rates).unwrap();
/// assert_eq!(tax, Decimal::from_str("6666.75").unwrap());
/// ```
pub fn withholding_tax(taxable_income: Decimal, rates: &RateTable) -> EngineResult<Decimal> {
    ensure_non_negative("taxable_income", taxable_income)?;

    let mut floor = Decimal::ZERO;
    for bracket in &rates.withholding_tax.brackets {
        match bracket.up_to {
            Some(limit) if taxable_income > limit => {
                floor = floor.max(bracket.apply(limit));
            }
            _ => return Ok(bracket.apply(taxable_income).max(floor)),
        }
    }

    // Only reachable with a schedule that skipped validation.
    Ok(floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn si(gross: &str) -> Decimal {
        social_insurance(dec(gross), &RateTable::default()).unwrap()
    }

    fn tax(taxable: &str) -> Decimal {
        withholding_tax(dec(taxable), &RateTable::default()).unwrap()
    }

    /// SI-001: below floor bracket
    #[test]
    fn test_si_001_below_floor() {
        assert_eq!(si("4000"), dec("180.00"));
        assert_eq!(si("0"), dec("180.00"));
        assert_eq!(si("4249.99"), dec("180.00"));
    }

    /// SI-002: graduated bracket
    #[test]
    fn test_si_002_graduated() {
        assert_eq!(si("10000"), dec("450.00"));
        assert_eq!(si("4250"), dec("191.25"));
        assert_eq!(si("16800"), dec("756.00"));
    }

    /// SI-003: ceiling and cap
    #[test]
    fn test_si_003_ceiling_and_cap() {
        assert_eq!(si("24749.99"), dec("1113.74955"));
        assert_eq!(si("24750"), dec("1125.00"));
        assert_eq!(si("90000"), dec("1125.00"));
    }

    /// HI-001: employee half of 3%
    #[test]
    fn test_hi_001_employee_half() {
        let rates = RateTable::default();
        assert_eq!(health_insurance(dec("20000"), &rates).unwrap(), dec("300.00"));
        assert_eq!(health_insurance(dec("0"), &rates).unwrap(), Decimal::ZERO);
        assert_eq!(health_insurance(dec("16800"), &rates).unwrap(), dec("252"));
    }

    /// HF-001: percentage capped at 100
    #[test]
    fn test_hf_001_capped_percentage() {
        let rates = RateTable::default();
        assert_eq!(housing_fund(dec("10000"), &rates).unwrap(), dec("100.00"));
        assert_eq!(housing_fund(dec("4000"), &rates).unwrap(), dec("80.00"));
        assert_eq!(housing_fund(dec("5000"), &rates).unwrap(), dec("100.00"));
    }

    /// WT-001: zero bracket
    #[test]
    fn test_wt_001_zero_bracket() {
        assert_eq!(tax("0"), Decimal::ZERO);
        assert_eq!(tax("20832"), Decimal::ZERO);
        // Between the published brackets the formula would go negative.
        assert_eq!(tax("20832.50"), Decimal::ZERO);
        assert_eq!(tax("20833"), Decimal::ZERO);
    }

    /// WT-002: each bracket formula
    #[test]
    fn test_wt_002_bracket_formulas() {
        assert_eq!(tax("25000"), dec("833.40"));
        assert_eq!(tax("50000"), dec("6666.75"));
        assert_eq!(tax("100000"), dec("20832.90"));
        assert_eq!(tax("500000"), dec("147499.89"));
        assert_eq!(tax("1000000"), dec("317499.88"));
    }

    /// WT-003: boundary values
    #[test]
    fn test_wt_003_boundaries() {
        assert_eq!(tax("33333"), dec("2500"));
        assert_eq!(tax("33333.01"), dec("2500.0025"));
        assert_eq!(tax("666667"), dec("200833.33"));
        assert_eq!(tax("666667.01"), dec("200833.3335"));
    }

    /// WT-004: rounded base does not let the tax dip
    #[test]
    fn test_wt_004_no_dip_after_rounded_base() {
        let at_boundary = tax("66667");
        assert_eq!(at_boundary, dec("10833.50"));
        assert_eq!(tax("66667.01"), at_boundary);
        assert_eq!(tax("66670"), dec("10833.90"));
    }

    #[test]
    fn test_negative_input_is_invalid() {
        let rates = RateTable::default();
        for (kind, deduct) in DEDUCTION_TABLE {
            match deduct(dec("-0.01"), &rates) {
                Err(EngineError::InvalidInput { field, .. }) => {
                    let expected = if kind.is_contribution() {
                        "gross_pay"
                    } else {
                        "taxable_income"
                    };
                    assert_eq!(field, expected);
                }
                other => panic!("Expected InvalidInput for {:?}, got {:?}", kind, other),
            }
        }
    }

    #[test]
    fn test_table_follows_itemization_order() {
        let kinds: Vec<DeductionKind> = DEDUCTION_TABLE.iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds, DeductionKind::ALL.to_vec());
    }

    #[test]
    fn test_deduction_fn_matches_table() {
        let rates = RateTable::default();
        for (kind, deduct) in DEDUCTION_TABLE {
            let via_lookup = deduction_fn(kind)(dec("30000"), &rates).unwrap();
            assert_eq!(via_lookup, deduct(dec("30000"), &rates).unwrap());
        }
    }

    #[test]
    fn test_custom_rate_table_is_honoured() {
        let mut rates = RateTable::default();
        rates.housing_fund.cap = dec("200");
        assert_eq!(housing_fund(dec("10000"), &rates).unwrap(), dec("200"));
    }
}
