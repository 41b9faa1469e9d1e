//! Reconciles travel expense reports against the cash advance given to the
//! traveler.
//!
//! Reports are built from a stream of events (advance set, expenses logged,
//! report closed...), then each one is reconciled: who owes whom, and how much.

pub mod error;
pub mod error_handler;
pub mod input;
pub mod output;
pub mod reports;
pub mod run;

pub use reports::balance::{
    compute_balance, compute_balance_from_expenses, validate_advance, AdvanceError,
    BalanceComputation, Direction,
};
pub use reports::format::{format_balance, format_reimbursement};
