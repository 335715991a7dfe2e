use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::LoanInput;
use crate::types::{Money, Percent, PropertyType};

/// A mortgage profile as kept by the profile store. Amounts arrive as
/// decimal strings, exactly as the store returns them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageProfile {
    pub id: i64,
    pub user_id: String,
    pub property_price: Money,
    pub property_type: PropertyType,
    pub down_payment_amount: Money,
    #[serde(default)]
    pub subsidy_amount: Option<Money>,
    pub subsidy_included_in_down_payment: bool,
    pub loan_term_years: u32,
    pub annual_interest_rate_percent: Percent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&MortgageProfile> for LoanInput {
    fn from(profile: &MortgageProfile) -> Self {
        LoanInput {
            property_price: profile.property_price,
            property_type: Some(profile.property_type),
            down_payment_amount: profile.down_payment_amount,
            subsidy_amount: profile.subsidy_amount,
            subsidy_included_in_down_payment: profile.subsidy_included_in_down_payment,
            loan_term_years: profile.loan_term_years,
            annual_interest_rate_percent: profile.annual_interest_rate_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{calculate, calculate_from_profile};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const STORED_PROFILE: &str = r#"{
        "id": 1,
        "userId": "user123",
        "propertyPrice": "5000000.00",
        "propertyType": "apartment_in_new_building",
        "downPaymentAmount": "1000000.00",
        "subsidyAmount": "500000.00",
        "subsidyIncludedInDownPayment": true,
        "loanTermYears": 20,
        "annualInterestRatePercent": "8.50",
        "createdAt": "2025-03-01T10:15:00Z",
        "updatedAt": "2025-03-01T10:15:00Z"
    }"#;

    #[test]
    fn test_maps_stored_profile_to_input() {
        let profile: MortgageProfile = serde_json::from_str(STORED_PROFILE).unwrap();
        let input = LoanInput::from(&profile);

        assert_eq!(input.property_price, dec!(5000000));
        assert_eq!(input.down_payment_amount, dec!(1000000));
        assert_eq!(input.subsidy_amount, Some(dec!(500000)));
        assert!(input.subsidy_included_in_down_payment);
        assert_eq!(input.loan_term_years, 20);
        assert_eq!(input.annual_interest_rate_percent, dec!(8.5));
        assert_eq!(input.property_type, Some(PropertyType::ApartmentInNewBuilding));
    }

    #[test]
    fn test_profile_and_input_agree() {
        let profile: MortgageProfile = serde_json::from_str(STORED_PROFILE).unwrap();
        let from_profile = calculate_from_profile(&profile).unwrap();
        let direct = calculate(&LoanInput::from(&profile)).unwrap();
        assert_eq!(from_profile, direct);
    }

    #[test]
    fn test_missing_subsidy_and_timestamps() {
        let profile: MortgageProfile = serde_json::from_str(
            r#"{
                "id": 7,
                "userId": "u",
                "propertyPrice": "3000000",
                "propertyType": "house",
                "downPaymentAmount": "600000",
                "subsidyAmount": null,
                "subsidyIncludedInDownPayment": false,
                "loanTermYears": 15,
                "annualInterestRatePercent": "6"
            }"#,
        )
        .unwrap();
        assert_eq!(profile.subsidy_amount, None);
        assert_eq!(profile.created_at, None);
        let result = calculate_from_profile(&profile).unwrap();
        assert_eq!(result.subsidy_savings, rust_decimal::Decimal::ZERO);
    }
}
