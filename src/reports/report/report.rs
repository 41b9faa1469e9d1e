use crate::reports::{
    balance::{self, AdvanceError, BalanceComputation},
    event::{self, Event},
    vehicle::VehicleRates,
    Amount, ExpenseId, VehicleId,
};

use std::collections::BTreeMap;

/// The pipeline pairs each of these errors with the id of the report it was
/// raised on.
#[derive(Debug, PartialEq)]
pub enum ReportError {
    /// The report was closed, so only a reopen can be applied to it.
    ClosedReport,

    /// A reopen was applied on a report that isn't closed.
    NotClosed,

    /// An expense with the same ID already exists on the report.
    DuplicateExpense,

    /// The amend or remove references an expense that doesn't exist.
    UnknownExpense,

    /// A mileage expense references a vehicle missing from the rate table.
    UnknownVehicle,

    /// The advance was refused before being stored.
    InvalidAdvance(AdvanceError),

    /// Expense amounts and distances must not be negative.
    NegativeAmount,

    /// Adding up the expenses would overflow.
    Overflow,
}

/// A single expense ("despesa") logged against a report.
#[derive(Debug, Clone, PartialEq)]
pub enum Expense {
    Regular(Amount),

    /// A mileage ("kilometragem") expense. Its value is derived from the
    /// vehicle rate when the expense is logged.
    Mileage {
        distance: Amount,
        vehicle: VehicleId,
        value: Amount,
    },
}

impl Expense {
    pub fn value(&self) -> Amount {
        match self {
            Expense::Regular(amount) => *amount,
            Expense::Mileage { value, .. } => *value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Open,

    /// The reimbursement was processed. The report is frozen until reopened.
    Closed,
}

/// Report is a state-machine, to which you can apply events.
///
/// Only the raw facts are stored (the advance and each expense); the balance
/// is derived from them on demand.
#[derive(Debug, Clone)]
pub struct Report {
    pub status: Status,
    pub(super) advance: Amount,
    pub(super) expenses: BTreeMap<ExpenseId, Expense>,
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

impl Report {
    pub fn new() -> Self {
        Self {
            status: Status::Open,
            advance: Amount::ZERO,
            expenses: BTreeMap::new(),
        }
    }

    pub fn advance(&self) -> Amount {
        self.advance
    }

    pub fn expense(&self, expense_id: ExpenseId) -> Option<&Expense> {
        self.expenses.get(&expense_id)
    }

    pub fn expense_count(&self) -> usize {
        self.expenses.len()
    }

    /// Sum of every expense value on the report.
    pub fn total_spent(&self) -> Result<Amount, ReportError> {
        self.expenses
            .values()
            .try_fold(Amount::ZERO, |total, expense| {
                total.checked_add(expense.value())
            })
            .ok_or(ReportError::Overflow)
    }

    /// Reconciles the advance against the expenses. Recomputed on every call.
    pub fn balance(&self) -> Result<BalanceComputation, ReportError> {
        Ok(balance::compute_balance(self.advance, self.total_spent()?))
    }

    pub fn apply(&mut self, event: &Event, rates: &VehicleRates) -> Result<(), ReportError> {
        // A closed report has been paid out; only a reversal may touch it.
        if self.status == Status::Closed && event.event_type != event::Type::Reopen {
            return Err(ReportError::ClosedReport);
        }

        match &event.event_type {
            event::Type::SetAdvance(amount) => self.apply_advance(*amount),
            event::Type::AddExpense(expense_id, valuation) => {
                self.apply_add_expense(*expense_id, valuation, rates)
            }
            event::Type::AmendExpense(expense_id, valuation) => {
                self.apply_amend_expense(*expense_id, valuation, rates)
            }
            event::Type::RemoveExpense(expense_id) => self.apply_remove_expense(*expense_id),
            event::Type::Close => self.apply_close(),
            event::Type::Reopen => self.apply_reopen(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Expense, Report, ReportError, Status};
    use crate::reports::{
        balance::{AdvanceError, Direction},
        event::{self, Event, Valuation},
        vehicle::VehicleRates,
    };

    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn rates() -> VehicleRates {
        let mut rates = VehicleRates::new();
        rates.insert("car".to_string(), dec!(1.5)).unwrap();
        rates
    }

    #[test]
    fn test_apply() {
        let rates = rates();
        let mut report = Report::new();

        report
            .apply(&Event::new(event::Type::SetAdvance(dec!(500)), 1), &rates)
            .expect("should set the advance");
        report
            .apply(
                &Event::new(
                    event::Type::AddExpense(1, Valuation::Amount(dec!(120.40))),
                    1,
                ),
                &rates,
            )
            .expect("should add an expense");
        report
            .apply(
                &Event::new(
                    event::Type::AddExpense(
                        2,
                        Valuation::Mileage {
                            distance: dec!(200),
                            vehicle: "car".to_string(),
                        },
                    ),
                    1,
                ),
                &rates,
            )
            .expect("should add a mileage expense");

        assert_eq!(dec!(420.40), report.total_spent().unwrap());
        let balance = report.balance().unwrap();
        assert_eq!(dec!(79.60), balance.remainder);
        assert_eq!(Direction::OwedToCompany, balance.direction);

        report
            .apply(
                &Event::new(
                    event::Type::AmendExpense(1, Valuation::Amount(dec!(400))),
                    1,
                ),
                &rates,
            )
            .expect("should amend an expense");
        let balance = report.balance().unwrap();
        assert_eq!(dec!(-200), balance.remainder);
        assert_eq!(dec!(200), balance.reimbursement_amount);
        assert_eq!(Direction::OwedToTraveler, balance.direction);

        report
            .apply(&Event::new(event::Type::Close, 1), &rates)
            .expect("should close the report");
        assert_eq!(Status::Closed, report.status);

        report
            .apply(&Event::new(event::Type::Reopen, 1), &rates)
            .expect("should reopen the report");
        report
            .apply(&Event::new(event::Type::RemoveExpense(2), 1), &rates)
            .expect("should remove an expense");
        assert_eq!(1, report.expense_count());
        assert_eq!(Direction::OwedToCompany, report.balance().unwrap().direction);
    }

    #[test]
    fn test_apply_on_closed_report() {
        let rates = rates();
        for event_type in vec![
            event::Type::SetAdvance(dec!(10)),
            event::Type::AddExpense(2, Valuation::Amount(dec!(5))),
            event::Type::AmendExpense(1, Valuation::Amount(dec!(5))),
            event::Type::RemoveExpense(1),
            event::Type::Close,
        ] {
            let mut report = Report {
                status: Status::Closed,
                advance: dec!(100),
                expenses: BTreeMap::from([(1, Expense::Regular(dec!(40)))]),
            };

            let got = report.apply(&Event::new(event_type, 1), &rates);
            assert_eq!(Err(ReportError::ClosedReport), got);
            assert_eq!(dec!(100), report.advance());
            assert_eq!(Some(&Expense::Regular(dec!(40))), report.expense(1));
        }
    }

    #[test]
    fn test_apply_invalid_advance() {
        let mut report = Report::new();
        let got = report.apply(&Event::new(event::Type::SetAdvance(dec!(-5)), 1), &rates());
        assert_eq!(Err(ReportError::InvalidAdvance(AdvanceError::Negative)), got);
        assert_eq!(dec!(0), report.advance());
    }

    #[test]
    fn test_empty_report_is_settled() {
        let balance = Report::new().balance().unwrap();
        assert_eq!(Direction::Settled, balance.direction);
        assert_eq!(dec!(0), balance.reimbursement_amount);
    }

    #[test]
    fn test_total_spent_overflow() {
        let report = Report {
            status: Status::Open,
            advance: dec!(0),
            expenses: BTreeMap::from([
                (1, Expense::Regular(rust_decimal::Decimal::MAX)),
                (2, Expense::Regular(rust_decimal::Decimal::MAX)),
            ]),
        };

        assert_eq!(Err(ReportError::Overflow), report.total_spent());
        assert_eq!(Err(ReportError::Overflow), report.balance());
    }
}
