pub mod deduction;
pub mod engine;
pub mod error;
pub mod payment;
pub mod profile;
pub mod schedule;
pub mod types;

pub use engine::{analyze, calculate, calculate_from_profile, CalculationResult, LoanInput};
pub use error::MortgageError;
pub use types::*;

/// Standard result type for all mortgage operations
pub type MortgageResult<T> = Result<T, MortgageError>;
