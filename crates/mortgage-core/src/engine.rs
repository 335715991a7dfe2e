use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::deduction;
use crate::error::MortgageError;
use crate::payment::{self, MONTHS_PER_YEAR};
pub use crate::payment::{MAX_TERM_YEARS, MIN_TERM_YEARS};
use crate::profile::MortgageProfile;
use crate::schedule::{self, Schedule};
use crate::types::*;
use crate::MortgageResult;

pub const MAX_ANNUAL_RATE_PERCENT: Percent = dec!(100);

/// Gross monthly income considered sufficient to carry the payment.
pub const RECOMMENDED_INCOME_MULTIPLIER: Decimal = dec!(2.5);

/// Borrower's request. `down_payment_amount` already contains the subsidy
/// when `subsidy_included_in_down_payment` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanInput {
    pub property_price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    pub down_payment_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subsidy_amount: Option<Money>,
    #[serde(default)]
    pub subsidy_included_in_down_payment: bool,
    pub loan_term_years: u32,
    pub annual_interest_rate_percent: Percent,
}

impl LoanInput {
    pub fn loan_amount(&self) -> Money {
        self.property_price - self.down_payment_amount
    }

    pub fn periods(&self) -> u32 {
        self.loan_term_years.saturating_mul(MONTHS_PER_YEAR)
    }

    pub fn periodic_rate(&self) -> Rate {
        payment::periodic_rate(self.annual_interest_rate_percent)
    }

    /// Subsidy counted towards savings; zero unless folded into the down payment.
    pub fn subsidy_savings(&self) -> Money {
        match self.subsidy_amount {
            Some(amount) if self.subsidy_included_in_down_payment => amount,
            _ => Decimal::ZERO,
        }
    }

    fn validate(&self) -> MortgageResult<()> {
        if self.property_price <= Decimal::ZERO {
            return Err(MortgageError::invalid(
                "property_price",
                "Property price must be positive",
            ));
        }
        if self.down_payment_amount < Decimal::ZERO {
            return Err(MortgageError::invalid(
                "down_payment_amount",
                "Down payment cannot be negative",
            ));
        }
        if matches!(self.subsidy_amount, Some(s) if s < Decimal::ZERO) {
            return Err(MortgageError::invalid(
                "subsidy_amount",
                "Subsidy cannot be negative",
            ));
        }
        if self.loan_amount() <= Decimal::ZERO {
            return Err(MortgageError::InvalidLoanAmount {
                property_price: self.property_price,
                down_payment: self.down_payment_amount,
            });
        }
        payment::term_periods(self.loan_term_years)?;
        if self.annual_interest_rate_percent < Decimal::ZERO
            || self.annual_interest_rate_percent > MAX_ANNUAL_RATE_PERCENT
        {
            return Err(MortgageError::invalid(
                "annual_interest_rate_percent",
                format!("Interest rate must be between 0 and {MAX_ANNUAL_RATE_PERCENT}%"),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub total_overpayment_amount: Money,
    pub possible_tax_deduction: Money,
    pub subsidy_savings: Money,
    pub recommended_income: Money,
    pub schedule: Schedule,
}

/// Price a fixed-rate mortgage: level payment, full schedule, total cost,
/// tax deduction estimate and recommended income.
pub fn calculate(input: &LoanInput) -> MortgageResult<CalculationResult> {
    input.validate()?;

    let loan_amount = input.loan_amount();
    let periods = input.periods();
    let rate = input.periodic_rate();

    let monthly_payment = payment::level_payment(loan_amount, rate, periods)?;
    let schedule = schedule::build(loan_amount, monthly_payment, rate, periods)?;

    let total_payment = schedule.total_payment()?;
    let total_overpayment_amount = total_payment
        .checked_sub(loan_amount)
        .ok_or_else(|| MortgageError::overflow("total overpayment"))?;
    let possible_tax_deduction =
        deduction::possible_tax_deduction(input.property_price, total_overpayment_amount);
    let recommended_income = monthly_payment
        .checked_mul(RECOMMENDED_INCOME_MULTIPLIER)
        .ok_or_else(|| MortgageError::overflow("recommended income"))?;

    Ok(CalculationResult {
        monthly_payment,
        total_payment,
        total_overpayment_amount,
        possible_tax_deduction,
        subsidy_savings: input.subsidy_savings(),
        recommended_income,
        schedule,
    })
}

/// Calculate from a stored mortgage profile.
pub fn calculate_from_profile(profile: &MortgageProfile) -> MortgageResult<CalculationResult> {
    calculate(&LoanInput::from(profile))
}

/// [`calculate`] wrapped in the standard output envelope with warnings.
pub fn analyze(input: &LoanInput) -> MortgageResult<ComputationOutput<CalculationResult>> {
    let start = Instant::now();
    let result = calculate(input)?;
    let mut warnings: Vec<String> = Vec::new();

    match input.subsidy_amount {
        Some(amount) if amount > Decimal::ZERO && !input.subsidy_included_in_down_payment => {
            warnings.push(
                "Subsidy amount provided but not included in the down payment; no savings counted"
                    .into(),
            );
        }
        Some(amount) if input.subsidy_included_in_down_payment && amount > input.down_payment_amount => {
            warnings.push(format!(
                "Subsidy {amount} exceeds the down payment {} it is supposed to be part of",
                input.down_payment_amount
            ));
        }
        _ => {}
    }

    let scheduled = input.periods() as usize;
    if result.schedule.len() < scheduled {
        warnings.push(format!(
            "Loan settles after {} of {scheduled} scheduled payments",
            result.schedule.len()
        ));
    }

    let elapsed = saturating_micros(start.elapsed());
    Ok(with_metadata(
        "Fixed-rate annuity mortgage",
        &serde_json::json!({
            "loan_amount": input.loan_amount().to_string(),
            "property_type": input.property_type.map(|p| p.label()),
            "periods": input.periods(),
            "periodic_rate": input.periodic_rate().to_string(),
            "working_scale": working_scale(input.loan_amount()),
            "recommended_income_multiplier": RECOMMENDED_INCOME_MULTIPLIER.to_string(),
        }),
        warnings,
        elapsed,
        result,
    ))
}

fn saturating_micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}
