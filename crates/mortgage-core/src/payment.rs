use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::MortgageError;
use crate::types::{round_working, working_scale, Money, Percent, Rate};
use crate::MortgageResult;

pub const MONTHS_PER_YEAR: u32 = 12;
pub const MIN_TERM_YEARS: u32 = 1;
pub const MAX_TERM_YEARS: u32 = 30;

/// Number of monthly payments in a term of whole years.
pub fn term_periods(loan_term_years: u32) -> MortgageResult<u32> {
    if !(MIN_TERM_YEARS..=MAX_TERM_YEARS).contains(&loan_term_years) {
        return Err(MortgageError::invalid(
            "loan_term_years",
            format!("Loan term must be between {MIN_TERM_YEARS} and {MAX_TERM_YEARS} years"),
        ));
    }
    Ok(loan_term_years * MONTHS_PER_YEAR)
}

/// Monthly rate from an annual percentage: 12% a year is 0.01 a month.
pub fn periodic_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / Decimal::from(MONTHS_PER_YEAR) / dec!(100)
}

/// Level payment that repays `loan_amount` over `periods` at `periodic_rate`
/// (ordinary annuity, payments at period end).
///
/// A zero rate degenerates to straight-line repayment.
pub fn solve(loan_amount: Money, periodic_rate: Rate, periods: u32) -> MortgageResult<Money> {
    if loan_amount <= Decimal::ZERO {
        return Err(MortgageError::invalid(
            "loan_amount",
            "Loan amount must be positive",
        ));
    }
    if periods == 0 {
        return Err(MortgageError::invalid(
            "periods",
            "Number of periods must be > 0",
        ));
    }
    if periodic_rate < Decimal::ZERO {
        return Err(MortgageError::invalid(
            "periodic_rate",
            "Periodic rate cannot be negative",
        ));
    }

    let n = Decimal::from(periods);
    if periodic_rate.is_zero() {
        return Ok(loan_amount / n);
    }

    let factor = (Decimal::ONE + periodic_rate)
        .checked_powi(i64::from(periods))
        .ok_or_else(|| MortgageError::overflow("annuity growth factor"))?;

    let numerator = loan_amount
        .checked_mul(periodic_rate)
        .and_then(|v| v.checked_mul(factor))
        .ok_or_else(|| MortgageError::overflow("annuity numerator"))?;
    let denominator = factor - Decimal::ONE;

    // (1+r)^n can round to exactly 1 for vanishingly small rates
    if denominator.is_zero() {
        return Ok(loan_amount / n);
    }

    numerator
        .checked_div(denominator)
        .ok_or_else(|| MortgageError::overflow("annuity payment"))
}

/// Solved payment at the working scale the schedule uses for `loan_amount`.
pub fn level_payment(loan_amount: Money, periodic_rate: Rate, periods: u32) -> MortgageResult<Money> {
    let scale = working_scale(loan_amount);
    solve(loan_amount, periodic_rate, periods).map(|p| round_working(p, scale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_periodic_rate_from_annual_percent() {
        assert_eq!(periodic_rate(dec!(12)), dec!(0.01));
        assert_eq!(periodic_rate(dec!(0)), Decimal::ZERO);
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let pmt = solve(dec!(1000000), Decimal::ZERO, 120).unwrap();
        assert!((pmt - dec!(8333.33)).abs() < dec!(0.01));
        assert!((pmt * dec!(120) - dec!(1000000)).abs() < dec!(0.000000001));
    }

    #[test]
    fn test_standard_annuity() {
        let pmt = solve(dec!(1000000), dec!(0.01), 120).unwrap();
        // 1e6 * 0.01 * 1.01^120 / (1.01^120 - 1) ~ 14347.09
        assert!((pmt - dec!(14347)).abs() <= dec!(1), "got {pmt}");
    }

    #[test]
    fn test_single_period_repays_principal_plus_interest() {
        let pmt = solve(dec!(1000), dec!(0.05), 1).unwrap();
        assert_eq!(pmt.round_dp(10), dec!(1050));
    }

    #[test]
    fn test_level_payment_keeps_sub_cent_precision() {
        let pmt = level_payment(dec!(1000000), Decimal::ZERO, 120).unwrap();
        assert_eq!(pmt, dec!(8333.3333333333333333333));
        let exact = solve(dec!(1000000), dec!(0.01), 120).unwrap();
        let level = level_payment(dec!(1000000), dec!(0.01), 120).unwrap();
        assert!((exact - level).abs() < dec!(0.0000000000000000001));
    }

    #[test]
    fn test_term_periods() {
        assert_eq!(term_periods(1).unwrap(), 12);
        assert_eq!(term_periods(30).unwrap(), 360);
        for years in [0, 31, 400_000_000, u32::MAX] {
            let err = term_periods(years).unwrap_err();
            assert!(matches!(err, MortgageError::InvalidInput { ref field, .. } if field == "loan_term_years"));
        }
    }

    #[test]
    fn test_rejects_non_positive_loan() {
        let err = solve(Decimal::ZERO, dec!(0.01), 12).unwrap_err();
        assert!(matches!(err, MortgageError::InvalidInput { ref field, .. } if field == "loan_amount"));
    }

    #[test]
    fn test_rejects_zero_periods() {
        let err = solve(dec!(1000), dec!(0.01), 0).unwrap_err();
        assert!(matches!(err, MortgageError::InvalidInput { ref field, .. } if field == "periods"));
    }

    #[test]
    fn test_rejects_negative_rate() {
        assert!(solve(dec!(1000), dec!(-0.01), 12).is_err());
    }

    #[test]
    fn test_overflow_is_reported() {
        // 2^360 does not fit in 96 bits
        let err = solve(dec!(1000), dec!(1), 360).unwrap_err();
        assert!(matches!(err, MortgageError::NumericOverflow { .. }));
    }
}
