use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::MortgageError;
use crate::payment::{MAX_TERM_YEARS, MONTHS_PER_YEAR};
use crate::types::{round_working, working_scale, Money, Rate};
use crate::MortgageResult;

/// One month of the amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEntry {
    pub total_payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub remaining_balance: Money,
}

/// Position of an entry in calendar terms, both fields 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePeriod {
    pub period: u32,
    pub year: u32,
    pub month: u32,
}

impl SchedulePeriod {
    /// Map a 1-based period number to (year, month in year). Period 0 has
    /// no calendar position.
    pub fn from_period(period: u32) -> Option<Self> {
        let elapsed = period.checked_sub(1)?;
        Some(SchedulePeriod {
            period,
            year: period.div_ceil(MONTHS_PER_YEAR),
            month: elapsed % MONTHS_PER_YEAR + 1,
        })
    }
}

/// Aggregate of one loan year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlySummary {
    pub year: u32,
    pub payments: u32,
    pub total_payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub closing_balance: Money,
}

/// Month-by-month repayment schedule, in payment order.
///
/// On the wire the schedule is a map of year number to a map of month number
/// to [`PaymentEntry`], both keyed by decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    entries: Vec<PaymentEntry>,
}

impl Schedule {
    pub fn entries(&self) -> &[PaymentEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&PaymentEntry> {
        self.entries.last()
    }

    pub fn periods(&self) -> impl Iterator<Item = (SchedulePeriod, &PaymentEntry)> + '_ {
        self.entries
            .iter()
            .zip(1u32..)
            .filter_map(|(entry, k)| SchedulePeriod::from_period(k).map(|p| (p, entry)))
    }

    pub fn total_payment(&self) -> MortgageResult<Money> {
        checked_sum(self.entries.iter().map(|e| e.total_payment), "total payment")
    }

    pub fn total_principal(&self) -> MortgageResult<Money> {
        checked_sum(self.entries.iter().map(|e| e.principal_portion), "total principal")
    }

    pub fn total_interest(&self) -> MortgageResult<Money> {
        checked_sum(self.entries.iter().map(|e| e.interest_portion), "total interest")
    }

    pub fn yearly_summaries(&self) -> MortgageResult<Vec<YearlySummary>> {
        self.entries
            .chunks(MONTHS_PER_YEAR as usize)
            .zip(1u32..)
            .map(|(months, year)| {
                Ok(YearlySummary {
                    year,
                    payments: months.len() as u32,
                    total_payment: checked_sum(
                        months.iter().map(|e| e.total_payment),
                        "yearly payment",
                    )?,
                    principal_portion: checked_sum(
                        months.iter().map(|e| e.principal_portion),
                        "yearly principal",
                    )?,
                    interest_portion: checked_sum(
                        months.iter().map(|e| e.interest_portion),
                        "yearly interest",
                    )?,
                    closing_balance: months
                        .last()
                        .map(|e| e.remaining_balance)
                        .unwrap_or_default(),
                })
            })
            .collect()
    }
}

fn checked_sum(mut amounts: impl Iterator<Item = Money>, context: &str) -> MortgageResult<Money> {
    amounts
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .ok_or_else(|| MortgageError::overflow(context))
}

/// Build the amortization schedule for a level-payment loan.
///
/// Interest accrues on the opening balance. Amounts are carried at the
/// working scale of `loan_amount` (see [`working_scale`]), never rounded to
/// the currency unit, so subtraction stays exact and each month's principal
/// is strictly positive for a solved payment. The entry that would overshoot
/// the balance, or the last scheduled period, settles the exact remaining
/// principal, so the schedule always closes at zero and may be shorter than
/// `periods`.
pub fn build(
    loan_amount: Money,
    monthly_payment: Money,
    periodic_rate: Rate,
    periods: u32,
) -> MortgageResult<Schedule> {
    if loan_amount <= Decimal::ZERO {
        return Err(MortgageError::invalid(
            "loan_amount",
            "Loan amount must be positive",
        ));
    }
    if monthly_payment <= Decimal::ZERO {
        return Err(MortgageError::invalid(
            "monthly_payment",
            "Monthly payment must be positive",
        ));
    }
    if periodic_rate < Decimal::ZERO {
        return Err(MortgageError::invalid(
            "periodic_rate",
            "Periodic rate cannot be negative",
        ));
    }
    if periods == 0 {
        return Err(MortgageError::invalid(
            "periods",
            "Number of periods must be > 0",
        ));
    }

    let scale = working_scale(loan_amount);
    let monthly_payment = round_working(monthly_payment, scale);
    let capacity = periods.min(MAX_TERM_YEARS * MONTHS_PER_YEAR);
    let mut entries = Vec::with_capacity(capacity as usize);
    let mut balance = loan_amount;

    for period in 1..=periods {
        let interest = balance
            .checked_mul(periodic_rate)
            .map(|v| round_working(v, scale))
            .ok_or_else(|| MortgageError::overflow("schedule interest"))?;
        let principal = monthly_payment
            .checked_sub(interest)
            .ok_or_else(|| MortgageError::overflow("schedule principal"))?;

        if principal >= balance || period == periods {
            let total_payment = balance
                .checked_add(interest)
                .ok_or_else(|| MortgageError::overflow("final payment"))?;
            entries.push(PaymentEntry {
                total_payment,
                principal_portion: balance,
                interest_portion: interest,
                remaining_balance: Decimal::ZERO,
            });
            break;
        }

        balance = balance
            .checked_sub(principal)
            .ok_or_else(|| MortgageError::overflow("schedule balance"))?;
        entries.push(PaymentEntry {
            total_payment: monthly_payment,
            principal_portion: principal,
            interest_portion: interest,
            remaining_balance: balance.max(Decimal::ZERO),
        });
    }

    Ok(Schedule { entries })
}

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let years = self.entries.chunks(MONTHS_PER_YEAR as usize);
        let mut map = serializer.serialize_map(Some(years.len()))?;
        for (months, year) in years.zip(1u32..) {
            map.serialize_entry(&year.to_string(), &YearEntries(months))?;
        }
        map.end()
    }
}

struct YearEntries<'a>(&'a [PaymentEntry]);

impl Serialize for YearEntries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (entry, month) in self.0.iter().zip(1u32..) {
            map.serialize_entry(&month.to_string(), entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Schedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let nested = BTreeMap::<u32, BTreeMap<u32, PaymentEntry>>::deserialize(deserializer)?;
        let year_count = nested.len();
        let mut entries = Vec::with_capacity(year_count * MONTHS_PER_YEAR as usize);

        for (expected_year, (year, months)) in (1u32..).zip(nested) {
            if year != expected_year {
                return Err(de::Error::custom(GapError::Year(expected_year)));
            }
            let is_last_year = year as usize == year_count;
            if !is_last_year && months.len() != MONTHS_PER_YEAR as usize {
                return Err(de::Error::custom(GapError::Month(year, months.len() as u32 + 1)));
            }
            for (expected_month, (month, entry)) in (1u32..).zip(months) {
                if month != expected_month {
                    return Err(de::Error::custom(GapError::Month(year, expected_month)));
                }
                entries.push(entry);
            }
        }

        Ok(Schedule { entries })
    }
}

enum GapError {
    Year(u32),
    Month(u32, u32),
}

impl fmt::Display for GapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GapError::Year(y) => write!(f, "schedule is missing year {y}"),
            GapError::Month(y, m) => write!(f, "schedule is missing month {m} of year {y}"),
        }
    }
}
