use crate::{
    error::{Error, Result},
    error_handler, input,
    output::{self, OutputFormat},
    reports::{process, vehicle::VehicleRates},
};

use std::sync::mpsc;

/// Everything a run needs besides its input and output. It is built once by
/// the caller and handed to `run`; nothing is read from global state.
#[derive(Debug, Clone)]
pub struct Context {
    pub rates: VehicleRates,
    pub output_format: OutputFormat,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            rates: VehicleRates::new(),
            output_format: OutputFormat::Csv,
        }
    }
}

/// Reads report events from `input_stream`, and writes one reconciled row per
/// report to `output_stream`.
///
/// Parsing, applying events and writing run concurrently, linked by channels.
pub fn run(
    input_stream: (impl std::io::Read + Send + 'static),
    output_stream: impl std::io::Write,
    context: Context,
) -> Result<()> {
    let (events, input_errors) = input::parse(input_stream);

    let (reports_tx, reports_rx) = mpsc::channel();
    let (rejections, builder) = process::build(events, context.rates, reports_tx);

    let handles = error_handler::sink(input_errors, rejections);

    output::write(output_stream, reports_rx, context.output_format)?;

    // A dead build thread closes the reports channel early, which would
    // otherwise look like a run with no reports.
    if builder.join().is_err() {
        return Err(Error::BuildPanicked);
    }

    for handle in handles {
        if handle.join().is_err() {
            tracing::error!("error handler thread panicked");
        }
    }

    Ok(())
}
