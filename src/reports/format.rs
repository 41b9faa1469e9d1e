//! Presentation of balances: currency strings and color tags for badges.

use super::{
    balance::{BalanceComputation, Direction},
    Amount, DECIMAL_PRECISION,
};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Green,
    Red,
    Gray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceStatus {
    Positive,
    Negative,
    Zero,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct ReimbursementLabel {
    pub label: String,
    pub color: ColorTag,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct BalanceLabel {
    pub text: String,
    pub color: ColorTag,
    pub status: BalanceStatus,
}

/// Formats the magnitude of an amount as Reais, e.g. `R$ 250.00`.
pub fn format_currency(amount: Amount) -> String {
    let amount = amount.abs().round_dp(DECIMAL_PRECISION);
    format!("R$ {:.2}", amount)
}

pub fn format_reimbursement(computation: &BalanceComputation) -> ReimbursementLabel {
    let amount = format_currency(computation.reimbursement_amount);

    match computation.direction {
        Direction::OwedToTraveler => ReimbursementLabel {
            label: format!("A RECEBER: {}", amount),
            color: ColorTag::Green,
        },
        Direction::OwedToCompany => ReimbursementLabel {
            label: format!("A DEVOLVER: {}", amount),
            color: ColorTag::Red,
        },
        Direction::Settled => ReimbursementLabel {
            label: format!("QUITADO: {}", format_currency(Amount::ZERO)),
            color: ColorTag::Gray,
        },
    }
}

/// Compact, signed rendering of a remainder, used for list rows.
pub fn format_balance(remainder: Amount) -> BalanceLabel {
    // The sign is read from what is shown, so 0.004 reads as zero.
    let remainder = remainder.round_dp(DECIMAL_PRECISION);
    let amount = format_currency(remainder);

    if remainder > Amount::ZERO {
        BalanceLabel {
            text: format!("+{}", amount),
            color: ColorTag::Green,
            status: BalanceStatus::Positive,
        }
    } else if remainder < Amount::ZERO {
        BalanceLabel {
            text: format!("-{}", amount),
            color: ColorTag::Red,
            status: BalanceStatus::Negative,
        }
    } else {
        BalanceLabel {
            text: amount,
            color: ColorTag::Gray,
            status: BalanceStatus::Zero,
        }
    }
}
