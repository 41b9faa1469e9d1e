use crate::reports::{
    event::Valuation,
    vehicle::{RateError, VehicleRates},
    Amount, ExpenseId,
};

use super::report::{Expense, Report, ReportError};

impl Report {
    pub(super) fn apply_add_expense(
        &mut self,
        expense_id: ExpenseId,
        valuation: &Valuation,
        rates: &VehicleRates,
    ) -> Result<(), ReportError> {
        // We've already seen that expense, so we probably have a data issue.
        if self.expenses.contains_key(&expense_id) {
            return Err(ReportError::DuplicateExpense);
        }

        let expense = value(valuation, rates)?;
        self.expenses.insert(expense_id, expense);

        Ok(())
    }

    // An amend may turn a regular expense into a mileage one, or the other
    // way around: the stored expense is replaced as a whole.
    pub(super) fn apply_amend_expense(
        &mut self,
        expense_id: ExpenseId,
        valuation: &Valuation,
        rates: &VehicleRates,
    ) -> Result<(), ReportError> {
        if !self.expenses.contains_key(&expense_id) {
            return Err(ReportError::UnknownExpense);
        }

        let expense = value(valuation, rates)?;
        self.expenses.insert(expense_id, expense);

        Ok(())
    }

    pub(super) fn apply_remove_expense(
        &mut self,
        expense_id: ExpenseId,
    ) -> Result<(), ReportError> {
        self.expenses
            .remove(&expense_id)
            .map(|_| ())
            .ok_or(ReportError::UnknownExpense)
    }
}

/// Turns what the traveler entered into a stored expense, pricing mileage
/// with the vehicle's rate per km.
fn value(valuation: &Valuation, rates: &VehicleRates) -> Result<Expense, ReportError> {
    match valuation {
        Valuation::Amount(amount) => {
            if *amount < Amount::ZERO {
                return Err(ReportError::NegativeAmount);
            }
            Ok(Expense::Regular(*amount))
        }
        Valuation::Mileage { distance, vehicle } => {
            if *distance < Amount::ZERO {
                return Err(ReportError::NegativeAmount);
            }
            let value = rates
                .mileage_value(vehicle, *distance)
                .map_err(|err| match err {
                    RateError::Overflow => ReportError::Overflow,
                    _ => ReportError::UnknownVehicle,
                })?;

            Ok(Expense::Mileage {
                distance: *distance,
                vehicle: vehicle.clone(),
                value,
            })
        }
    }
}
