use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use mortgage_core::{deduction, engine, payment, profile, schedule};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Engine entry points
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_mortgage(input_json: String) -> NapiResult<String> {
    let input: engine::LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = engine::analyze(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_mortgage_from_profile(profile_json: String) -> NapiResult<String> {
    let profile: profile::MortgageProfile =
        serde_json::from_str(&profile_json).map_err(to_napi_error)?;
    let output = engine::calculate_from_profile(&profile).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleRequest {
    loan_amount: Decimal,
    annual_interest_rate_percent: Decimal,
    loan_term_years: u32,
    #[serde(default)]
    monthly_payment: Option<Decimal>,
}

#[napi]
pub fn build_payment_schedule(input_json: String) -> NapiResult<String> {
    let req: ScheduleRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rate = payment::periodic_rate(req.annual_interest_rate_percent);
    let periods = payment::term_periods(req.loan_term_years).map_err(to_napi_error)?;
    let monthly_payment = match req.monthly_payment {
        Some(p) => p,
        None => payment::level_payment(req.loan_amount, rate, periods).map_err(to_napi_error)?,
    };
    let sched =
        schedule::build(req.loan_amount, monthly_payment, rate, periods).map_err(to_napi_error)?;
    serde_json::to_string(&sched).map_err(to_napi_error)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeductionRequest {
    property_price: Decimal,
    total_overpayment_amount: Decimal,
}

#[napi]
pub fn estimate_tax_deduction(input_json: String) -> NapiResult<String> {
    let req: DeductionRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deduction::estimate(req.property_price, req.total_overpayment_amount);
    serde_json::to_string(&output).map_err(to_napi_error)
}
