use super::{Amount, ExpenseId, ReportId, VehicleId};

/// How an expense is valued.
#[derive(Debug, Clone, PartialEq)]
pub enum Valuation {
    /// A plain receipt amount.
    Amount(Amount),

    /// Kilometers driven with a given vehicle, valued through the rate table.
    Mileage { distance: Amount, vehicle: VehicleId },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    SetAdvance(Amount),                 // Replace the advance given to the traveler.
    AddExpense(ExpenseId, Valuation),   // Log a new expense against the report.
    AmendExpense(ExpenseId, Valuation), // Replace an existing expense.
    RemoveExpense(ExpenseId),           // Delete an expense.
    Close,                              // Reimbursement processed. Freeze the report.
    Reopen,                             // Reverse a closure.
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub(super) event_type: Type,
    pub(super) report_id: ReportId,
}

impl Event {
    // The new() function ensures amounts and distances carry at most 2 decimal places.
    pub fn new(event_type: Type, report_id: ReportId) -> Self {
        let event_type = match event_type {
            Type::SetAdvance(amount) => Type::SetAdvance(amount.round_dp(super::DECIMAL_PRECISION)),
            Type::AddExpense(expense_id, valuation) => {
                Type::AddExpense(expense_id, valuation.rounded())
            }
            Type::AmendExpense(expense_id, valuation) => {
                Type::AmendExpense(expense_id, valuation.rounded())
            }
            _ => event_type,
        };

        Self {
            event_type,
            report_id,
        }
    }

    pub fn report_id(&self) -> ReportId {
        self.report_id
    }
}

impl Valuation {
    fn rounded(self) -> Self {
        match self {
            Valuation::Amount(amount) => {
                Valuation::Amount(amount.round_dp(super::DECIMAL_PRECISION))
            }
            Valuation::Mileage { distance, vehicle } => Valuation::Mileage {
                distance: distance.round_dp(super::DECIMAL_PRECISION),
                vehicle,
            },
        }
    }
}

#[test]
// Decimal precision is 2 places. We should be unable to have more precise amounts.
fn test_event_decimal_precision() {
    use rust_decimal_macros::dec;

    for (raw_amount, want_amount) in vec![
        (dec!(1.0), dec!(1.0)),
        (dec!(0.999), dec!(1.0)),
        (dec!(1.0001), dec!(1.0)),
        (dec!(1.23), dec!(1.23)),
        (dec!(1.239), dec!(1.24)),
    ] {
        let event = Event::new(Type::SetAdvance(raw_amount), 1);
        assert_eq!(Type::SetAdvance(want_amount), event.event_type);

        let event = Event::new(Type::AddExpense(1, Valuation::Amount(raw_amount)), 1);
        assert_eq!(
            Type::AddExpense(1, Valuation::Amount(want_amount)),
            event.event_type
        );

        let event = Event::new(
            Type::AmendExpense(
                1,
                Valuation::Mileage {
                    distance: raw_amount,
                    vehicle: "car".to_string(),
                },
            ),
            1,
        );
        assert_eq!(
            Type::AmendExpense(
                1,
                Valuation::Mileage {
                    distance: want_amount,
                    vehicle: "car".to_string(),
                }
            ),
            event.event_type
        );
    }
}
