use crate::{input::Error, reports::process::Rejection};

use std::sync::mpsc::Receiver;

// Bad rows and rejected events don't stop the run: they are logged, and the
// reports are built from every event that could be applied.
//
// Both streams are drained on their own thread so neither channel backs up
// while the other is being read.
pub fn sink(
    input_errors: Receiver<Error>,
    rejections: Receiver<Rejection>,
) -> Vec<std::thread::JoinHandle<()>> {
    vec![
        std::thread::spawn(move || {
            for err in input_errors {
                tracing::warn!("failed to read record: {}", err);
            }
        }),
        std::thread::spawn(move || {
            for rejection in rejections {
                tracing::warn!(
                    report_id = rejection.report_id,
                    "failed to apply event: {:?}",
                    rejection.error
                );
            }
        }),
    ]
}
