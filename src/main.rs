use clap::{Parser, ValueEnum};
use expense_reconciliation::{
    error::Result,
    input,
    output::OutputFormat,
    run::{run, Context},
};
use std::fs::File;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Format {
    Csv,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => OutputFormat::Csv,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "expense_reconciliation",
    version,
    about = "Reconcile expense reports against their cash advance"
)]
struct Cli {
    /// Report events, as CSV
    input: String,

    /// Rate per km of each vehicle, as CSV (`vehicle,rate_per_km`)
    #[arg(long = "vehicles")]
    vehicles: Option<String>,

    /// Output file (stdout by default)
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "csv")]
    format: Format,
}

fn main() -> Result<()> {
    // Logs go to stderr so they never mix with the reports on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let rates = match &cli.vehicles {
        Some(path) => input::parse_vehicle_rates(File::open(path)?)?,
        None => Default::default(),
    };
    tracing::info!(vehicles = rates.len(), "vehicle rates loaded");

    let context = Context {
        rates,
        output_format: cli.format.into(),
    };

    let input = File::open(&cli.input)?;
    let mut writer: Box<dyn Write> = match cli.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };

    run(input, &mut writer, context)?;

    writer.flush()?;
    Ok(())
}
