use crate::error::Error;
use crate::reports::{
    balance::Direction,
    format::{self, ColorTag},
    report::report::{Report, Status},
    Amount, ReportId,
};

use serde::Serialize;
use std::sync::mpsc::Receiver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

/// One reconciled report, as written out.
#[derive(Debug, Serialize)]
struct ReportRecord {
    #[serde(rename = "report")]
    report_id: ReportId,

    advance: String,
    total_spent: String,
    remainder: String,

    #[serde(rename = "reimbursement")]
    reimbursement_amount: String,

    direction: Direction,

    #[serde(rename = "status")]
    status: &'static str,

    /// e.g. `A RECEBER: R$ 300.00`
    label: String,

    color: ColorTag,
}

impl ReportRecord {
    fn new(report_id: ReportId, report: &Report) -> Result<Self, Error> {
        let balance = report
            .balance()
            .map_err(|error| Error::Reconciliation { report_id, error })?;
        let reimbursement = format::format_reimbursement(&balance);

        Ok(Self {
            report_id,
            advance: fixed(balance.advance),
            total_spent: fixed(balance.total_spent),
            remainder: fixed(balance.remainder),
            reimbursement_amount: fixed(balance.reimbursement_amount),
            direction: balance.direction,
            status: match report.status {
                Status::Open => "open",
                Status::Closed => "closed",
            },
            label: reimbursement.label,
            color: reimbursement.color,
        })
    }
}

// Amounts always carry both centavo digits, whatever their stored scale.
fn fixed(amount: Amount) -> String {
    format!("{:.2}", amount)
}

// A report that can't be reconciled is logged and left out; the others
// are still written.
fn records(reports: Receiver<(ReportId, Report)>) -> impl Iterator<Item = ReportRecord> {
    reports
        .into_iter()
        .filter_map(|(report_id, report)| match ReportRecord::new(report_id, &report) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(report_id, "skipping report: {}", err);
                None
            }
        })
}

// Writes the received reports to the given stream.
pub fn write(
    output_stream: impl std::io::Write,
    reports: Receiver<(ReportId, Report)>,
    output_format: OutputFormat,
) -> Result<(), Error> {
    match output_format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(output_stream);
            for record in records(reports) {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            let records: Vec<ReportRecord> = records(reports).collect();
            serde_json::to_writer_pretty(output_stream, &records)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod write_tests {
    use super::OutputFormat;
    use crate::reports::{
        event::{Event, Type, Valuation},
        report::report::Report,
        vehicle::VehicleRates,
    };

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::mpsc;

    fn report(advance: Decimal, expenses: Vec<Decimal>, closed: bool) -> Report {
        let rates = VehicleRates::new();
        let mut report = Report::new();
        report
            .apply(&Event::new(Type::SetAdvance(advance), 1), &rates)
            .unwrap();
        for (expense_id, amount) in expenses.into_iter().enumerate() {
            report
                .apply(
                    &Event::new(
                        Type::AddExpense(expense_id as u32, Valuation::Amount(amount)),
                        1,
                    ),
                    &rates,
                )
                .unwrap();
        }
        if closed {
            report.apply(&Event::new(Type::Close, 1), &rates).unwrap();
        }
        report
    }

    fn reports() -> mpsc::Receiver<(u32, Report)> {
        let (reports_tx, reports) = mpsc::channel();
        for (report_id, advance, expenses, closed) in vec![
            (1, dec!(1000), vec![dec!(300), dec!(200), dec!(250)], false),
            (2, dec!(500), vec![dec!(800)], true),
            (3, dec!(600), vec![dec!(600.0)], false),
        ] {
            reports_tx
                .send((report_id, report(advance, expenses, closed)))
                .unwrap();
        }
        reports
    }

    #[test]
    fn test_write_csv() {
        let mut output_stream = Vec::new();

        super::write(&mut output_stream, reports(), OutputFormat::Csv).unwrap();

        let want = r#"report,advance,total_spent,remainder,reimbursement,direction,status,label,color
1,1000.00,750.00,250.00,250.00,OWED_TO_COMPANY,open,A DEVOLVER: R$ 250.00,red
2,500.00,800.00,-300.00,300.00,OWED_TO_TRAVELER,closed,A RECEBER: R$ 300.00,green
3,600.00,600.00,0.00,0.00,SETTLED,open,QUITADO: R$ 0.00,gray
"#;
        assert_eq!(want.to_string(), String::from_utf8(output_stream).unwrap());
    }

    #[test]
    fn test_write_json() {
        let mut output_stream = Vec::new();

        super::write(&mut output_stream, reports(), OutputFormat::Json).unwrap();

        let got: serde_json::Value = serde_json::from_slice(&output_stream).unwrap();
        assert_eq!(3, got.as_array().unwrap().len());
        assert_eq!(
            serde_json::json!({
                "report": 2,
                "advance": "500.00",
                "total_spent": "800.00",
                "remainder": "-300.00",
                "reimbursement": "300.00",
                "direction": "OWED_TO_TRAVELER",
                "status": "closed",
                "label": "A RECEBER: R$ 300.00",
                "color": "green"
            }),
            got[1]
        );
    }

    #[test]
    fn test_write_no_reports() {
        let (reports_tx, reports) = mpsc::channel();
        drop(reports_tx);
        let mut output_stream = Vec::new();

        super::write(&mut output_stream, reports, OutputFormat::Json).unwrap();

        assert_eq!("[]", String::from_utf8(output_stream).unwrap());
    }
}
