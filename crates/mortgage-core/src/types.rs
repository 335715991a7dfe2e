use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Periodic rates expressed as decimals (0.01 = 1% per period).
pub type Rate = Decimal;

/// Annual rates as entered by a borrower (8.5 = 8.5% per year).
pub type Percent = Decimal;

/// Number of decimal places in the smallest currency unit.
pub const CURRENCY_SCALE: u32 = 2;

/// Round to the currency unit, half away from zero.
pub fn round_currency(amount: Money) -> Money {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Significant digits carried by amounts inside the amortization loop. Two
/// below what a `Decimal` holds, so sums over a full term stay exact.
pub const WORKING_DIGITS: u32 = 26;

/// Decimal places kept by schedule arithmetic on a loan of `amount`.
pub fn working_scale(amount: Money) -> u32 {
    let digits = amount
        .abs()
        .trunc()
        .normalize()
        .mantissa()
        .unsigned_abs()
        .checked_ilog10()
        .map_or(0, |d| d + 1);
    WORKING_DIGITS.saturating_sub(digits)
}

/// Round to `scale` places, half away from zero.
pub fn round_working(amount: Money, scale: u32) -> Money {
    amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

/// Category of the purchased property. Carried through for reporting only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[default]
    ApartmentInNewBuilding,
    ApartmentInSecondaryBuilding,
    House,
    HouseWithLandPlot,
    LandPlot,
    Other,
}

impl PropertyType {
    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::ApartmentInNewBuilding => "Apartment in a new building",
            PropertyType::ApartmentInSecondaryBuilding => "Apartment in a secondary building",
            PropertyType::House => "House",
            PropertyType::HouseWithLandPlot => "House with land plot",
            PropertyType::LandPlot => "Land plot",
            PropertyType::Other => "Other",
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_currency_midpoint() {
        assert_eq!(round_currency(dec!(10.005)), dec!(10.01));
        assert_eq!(round_currency(dec!(10.004)), dec!(10.00));
    }

    #[test]
    fn test_working_scale_tracks_magnitude() {
        assert_eq!(working_scale(dec!(1000000)), 19);
        assert_eq!(working_scale(dec!(999999.99)), 20);
        assert_eq!(working_scale(dec!(0.5)), 26);
        assert_eq!(working_scale(Decimal::MAX), 0);
    }

    #[test]
    fn test_round_working_keeps_requested_places() {
        assert_eq!(round_working(dec!(1.23456), 3), dec!(1.235));
        assert_eq!(round_working(dec!(10000.00), 19), dec!(10000));
    }

    #[test]
    fn test_property_type_wire_names() {
        let json = serde_json::to_string(&PropertyType::HouseWithLandPlot).unwrap();
        assert_eq!(json, "\"house_with_land_plot\"");
        let parsed: PropertyType = serde_json::from_str("\"apartment_in_secondary_building\"").unwrap();
        assert_eq!(parsed, PropertyType::ApartmentInSecondaryBuilding);
    }
}
