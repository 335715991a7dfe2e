use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{round_currency, Money, Rate};

// ---------------------------------------------------------------------------
// Statutory limits for the property tax deduction
// ---------------------------------------------------------------------------

/// Personal income tax rate refunded by the deduction.
pub const DEDUCTION_RATE: Rate = dec!(0.13);

/// Ceiling on the purchase price that qualifies for the deduction.
pub const PURCHASE_BASE_CAP: Money = dec!(2000000);

/// Ceiling on mortgage interest that qualifies for the deduction.
pub const INTEREST_BASE_CAP: Money = dec!(3000000);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxDeduction {
    pub purchase_deduction: Money,
    pub interest_deduction: Money,
    pub total: Money,
}

/// Estimate the refundable deduction for the purchase itself and for the
/// interest paid over the life of the loan. Each part is capped separately.
pub fn estimate(property_price: Money, total_overpayment: Money) -> TaxDeduction {
    let purchase_deduction = capped_share(property_price, PURCHASE_BASE_CAP);
    let interest_deduction = capped_share(total_overpayment, INTEREST_BASE_CAP);

    TaxDeduction {
        purchase_deduction,
        interest_deduction,
        total: purchase_deduction + interest_deduction,
    }
}

/// Total of [`estimate`].
pub fn possible_tax_deduction(property_price: Money, total_overpayment: Money) -> Money {
    estimate(property_price, total_overpayment).total
}

fn capped_share(base: Money, cap: Money) -> Money {
    round_currency(base.min(cap).max(Decimal::ZERO) * DEDUCTION_RATE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_uncapped() {
        let d = estimate(dec!(1500000), dec!(500000));
        assert_eq!(d.purchase_deduction, dec!(195000));
        assert_eq!(d.interest_deduction, dec!(65000));
        assert_eq!(d.total, dec!(260000));
    }

    #[test]
    fn test_purchase_cap_hit() {
        assert_eq!(possible_tax_deduction(dec!(5000000), dec!(1000000)), dec!(390000));
    }

    #[test]
    fn test_interest_cap_hit() {
        let d = estimate(dec!(1000000), dec!(5000000));
        assert_eq!(d.purchase_deduction, dec!(130000));
        assert_eq!(d.interest_deduction, dec!(390000));
        assert_eq!(d.total, dec!(520000));
    }

    #[test]
    fn test_both_caps_hit() {
        assert_eq!(possible_tax_deduction(dec!(9000000), dec!(9000000)), dec!(650000));
    }

    #[test]
    fn test_zero_overpayment() {
        let d = estimate(dec!(1000000), Decimal::ZERO);
        assert_eq!(d.interest_deduction, Decimal::ZERO);
        assert_eq!(d.total, dec!(130000));
    }

    #[test]
    fn test_rounds_to_currency_unit() {
        let d = estimate(dec!(1000.01), dec!(0.01));
        assert_eq!(d.purchase_deduction, dec!(130.00));
        assert_eq!(d.interest_deduction, dec!(0.00));
    }
}
