use super::report::{Report, ReportError, Status};

impl Report {
    // Closing is only reachable on an open report: `apply` already rejects
    // every event but a reopen once the report is closed.
    pub(super) fn apply_close(&mut self) -> Result<(), ReportError> {
        self.status = Status::Closed;

        Ok(())
    }

    pub(super) fn apply_reopen(&mut self) -> Result<(), ReportError> {
        if self.status != Status::Closed {
            return Err(ReportError::NotClosed);
        }

        self.status = Status::Open;

        Ok(())
    }
}
