//! Reconciles a report's cash advance against what was actually spent.
//!
//! Every function here is pure: the balance is recomputed from the advance
//! and the expenses each time it is needed, and never stored.

use super::Amount;

use rust_decimal_macros::dec;
use serde::Serialize;

/// Highest advance, in Reais, that can be given for a single report.
pub const MAX_ADVANCE: Amount = dec!(100000);

/// Who has to pay whom once the report is reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// The traveler spent more than the advance and must be paid back.
    OwedToTraveler,

    /// The traveler spent less than the advance and must return the surplus.
    OwedToCompany,

    /// The advance matches the expenses exactly.
    Settled,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceComputation {
    pub advance: Amount,
    pub total_spent: Amount,

    /// `advance - total_spent`. Positive means unspent advance, negative
    /// means overspend.
    pub remainder: Amount,

    /// Magnitude of the money that must change hands, always >= 0.
    pub reimbursement_amount: Amount,

    pub direction: Direction,
}

pub fn compute_balance(advance: Amount, total_spent: Amount) -> BalanceComputation {
    let remainder = advance - total_spent;

    let direction = if remainder > Amount::ZERO {
        Direction::OwedToCompany
    } else if remainder < Amount::ZERO {
        Direction::OwedToTraveler
    } else {
        Direction::Settled
    };

    BalanceComputation {
        advance,
        total_spent,
        remainder,
        reimbursement_amount: remainder.abs(),
        direction,
    }
}

/// Sums the expense amounts (an empty list spends nothing) and reconciles
/// the total against the advance.
///
/// # Panics
///
/// Panics if the sum overflows `Amount`. Use `Report::balance` for amounts
/// that haven't been bounded beforehand: it reports the overflow as an error.
pub fn compute_balance_from_expenses<I>(advance: Amount, expenses: I) -> BalanceComputation
where
    I: IntoIterator<Item = Amount>,
{
    let total_spent: Amount = expenses.into_iter().sum();
    compute_balance(advance, total_spent)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AdvanceError {
    #[error("advance cannot be negative")]
    Negative,

    #[error("advance exceeds maximum of R$ {}", MAX_ADVANCE)]
    ExceedsMaximum,
}

/// Checks a user-entered advance before it is stored on a report.
/// `compute_balance` does not call this: it accepts any amount.
pub fn validate_advance(advance: Amount) -> Result<(), AdvanceError> {
    if advance < Amount::ZERO {
        return Err(AdvanceError::Negative);
    }
    if advance > MAX_ADVANCE {
        return Err(AdvanceError::ExceedsMaximum);
    }

    Ok(())
}
