use crate::reports::{balance, Amount};

use super::report::{Report, ReportError};

impl Report {
    pub(super) fn apply_advance(&mut self, amount: Amount) -> Result<(), ReportError> {
        balance::validate_advance(amount).map_err(ReportError::InvalidAdvance)?;

        self.advance = amount;

        Ok(())
    }
}
