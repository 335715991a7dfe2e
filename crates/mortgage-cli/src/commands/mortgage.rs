use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use mortgage_core::engine::{self, LoanInput};
use mortgage_core::schedule::{self, PaymentEntry, SchedulePeriod};
use mortgage_core::{deduction, payment, round_currency, PropertyType};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PropertyTypeArg {
    NewBuilding,
    SecondaryBuilding,
    House,
    HouseWithLand,
    LandPlot,
    Other,
}

impl From<PropertyTypeArg> for PropertyType {
    fn from(arg: PropertyTypeArg) -> Self {
        match arg {
            PropertyTypeArg::NewBuilding => PropertyType::ApartmentInNewBuilding,
            PropertyTypeArg::SecondaryBuilding => PropertyType::ApartmentInSecondaryBuilding,
            PropertyTypeArg::House => PropertyType::House,
            PropertyTypeArg::HouseWithLand => PropertyType::HouseWithLandPlot,
            PropertyTypeArg::LandPlot => PropertyType::LandPlot,
            PropertyTypeArg::Other => PropertyType::Other,
        }
    }
}

/// Loan parameters shared by `calculate` and `schedule`
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price of the property
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Property category (informational)
    #[arg(long, value_enum)]
    pub property_type: Option<PropertyTypeArg>,

    /// Down payment, including any subsidy folded into it
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Subsidy amount (e.g. maternity capital)
    #[arg(long)]
    pub subsidy: Option<Decimal>,

    /// The subsidy is already part of --down-payment
    #[arg(long)]
    pub subsidy_included: bool,

    /// Loan term in whole years (1-30)
    #[arg(long)]
    pub term_years: Option<u32>,

    /// Annual interest rate in percent (e.g. 8.5)
    #[arg(long)]
    pub annual_rate: Option<Decimal>,
}

impl LoanArgs {
    fn into_loan_input(self) -> Result<LoanInput, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            tracing::info!(path = %path, "loading loan input from file");
            return input::file::read_input(path);
        }
        if let Some(loan) = input::stdin::read_stdin()? {
            tracing::info!("loading loan input from stdin");
            return Ok(loan);
        }

        tracing::info!("building loan input from flags");
        Ok(LoanInput {
            property_price: self
                .price
                .ok_or("--price is required (or provide --input)")?,
            property_type: self.property_type.map(PropertyType::from),
            down_payment_amount: self
                .down_payment
                .ok_or("--down-payment is required (or provide --input)")?,
            subsidy_amount: self.subsidy,
            subsidy_included_in_down_payment: self.subsidy_included,
            loan_term_years: self
                .term_years
                .ok_or("--term-years is required (or provide --input)")?,
            annual_interest_rate_percent: self
                .annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
        })
    }
}

/// Arguments for the full mortgage calculation
#[derive(Args)]
pub struct CalculateArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

pub fn run_calculate(args: CalculateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = args.loan.into_loan_input()?;
    let output = engine::analyze(&loan)?;
    tracing::info!(
        monthly_payment = %output.result.monthly_payment,
        payments = output.result.schedule.len(),
        warnings = output.warnings.len(),
        "mortgage calculated"
    );
    Ok(serde_json::to_value(output)?)
}

/// Arguments for printing the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Aggregate the schedule by loan year
    #[arg(long)]
    pub yearly: bool,
}

#[derive(Serialize)]
struct ScheduleRow<'a> {
    #[serde(flatten)]
    period: SchedulePeriod,
    #[serde(flatten)]
    entry: &'a PaymentEntry,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let yearly = args.yearly;
    let loan = args.loan.into_loan_input()?;
    schedule_value(&loan, yearly)
}

fn schedule_value(loan: &LoanInput, yearly: bool) -> Result<Value, Box<dyn std::error::Error>> {
    let result = engine::calculate(loan)?;
    tracing::info!(payments = result.schedule.len(), yearly, "schedule built");

    if yearly {
        return Ok(serde_json::to_value(result.schedule.yearly_summaries()?)?);
    }
    let rows: Vec<ScheduleRow<'_>> = result
        .schedule
        .periods()
        .map(|(period, entry)| ScheduleRow { period, entry })
        .collect();
    Ok(serde_json::to_value(rows)?)
}

/// Arguments for solving the level monthly payment
#[derive(Args)]
pub struct PaymentArgs {
    /// Amount borrowed
    #[arg(long)]
    pub loan_amount: Decimal,

    /// Annual interest rate in percent
    #[arg(long)]
    pub annual_rate: Decimal,

    /// Loan term in whole years (1-30)
    #[arg(long)]
    pub term_years: u32,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rate = payment::periodic_rate(args.annual_rate);
    let periods = payment::term_periods(args.term_years)?;
    let level = payment::level_payment(args.loan_amount, rate, periods)?;
    let sched = schedule::build(args.loan_amount, level, rate, periods)?;

    Ok(serde_json::json!({
        "monthlyPayment": round_currency(level).to_string(),
        "exactPayment": level.to_string(),
        "periodicRate": rate.to_string(),
        "periods": periods,
        "totalInterest": round_currency(sched.total_interest()?).to_string(),
    }))
}

/// Arguments for the tax deduction estimate
#[derive(Args)]
pub struct DeductionArgs {
    /// Purchase price of the property
    #[arg(long)]
    pub price: Decimal,

    /// Total interest paid over the loan
    #[arg(long, default_value = "0")]
    pub overpayment: Decimal,
}

pub fn run_deduction(args: DeductionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = deduction::estimate(args.price, args.overpayment);
    Ok(serde_json::to_value(result)?)
}
