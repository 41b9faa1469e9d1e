use super::event::Event;
use super::report::report::{Report, ReportError};
use super::vehicle::VehicleRates;
use super::ReportId;

use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

/// An event that couldn't be applied, and the report it was meant for.
#[derive(Debug, PartialEq)]
pub struct Rejection {
    pub report_id: ReportId,
    pub error: ReportError,
}

/// Build every report from a stream of events.
/// Rejected events are streamed while the reports are built; once all the
/// events are applied, every report is sent, in ascending report id.
///
/// The returned handle must be joined: if the build thread dies, the reports
/// channel is simply closed early.
pub fn build(
    events: Receiver<Event>,
    rates: VehicleRates,
    reports_tx: Sender<(ReportId, Report)>,
) -> (Receiver<Rejection>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel();

    // We apply all events in a new thread, to be able to stream rejections as
    // we go.
    let handle = std::thread::spawn(move || {
        let mut reports: BTreeMap<ReportId, Report> = BTreeMap::new();

        for event in events {
            let report_id = event.report_id();
            let report = reports.entry(report_id).or_insert_with(Report::new);

            if let Err(error) = report.apply(&event, &rates) {
                tx.send(Rejection { report_id, error }).unwrap(); // Would only fail if the rx is disconnected, which should not happen here.
            };
        }

        tracing::debug!(reports = reports.len(), "all events applied");

        // Reports can only be reconciled once every event has been applied.
        for (report_id, report) in reports {
            reports_tx.send((report_id, report)).unwrap(); // Would only fail if the rx is disconnected, which should not happen here.
        }
    });

    (rx, handle)
}

#[cfg(test)]
mod tests {
    use super::{build, Rejection};
    use crate::reports::{
        event::{Event, Type, Valuation},
        report::report::ReportError,
        vehicle::VehicleRates,
    };

    use rust_decimal_macros::dec;
    use std::sync::mpsc;

    #[test]
    fn test_build() {
        let (events_tx, events) = mpsc::channel();
        let (reports_tx, reports) = mpsc::channel();

        for event in vec![
            Event::new(Type::SetAdvance(dec!(300)), 2),
            Event::new(Type::AddExpense(1, Valuation::Amount(dec!(100))), 1),
            Event::new(Type::AddExpense(1, Valuation::Amount(dec!(50))), 2),
            Event::new(Type::AddExpense(1, Valuation::Amount(dec!(70))), 2), // duplicate
            Event::new(Type::RemoveExpense(9), 1),                          // unknown
            Event::new(Type::Close, 2),
        ] {
            events_tx.send(event).unwrap();
        }
        drop(events_tx);

        let (rejections, handle) = build(events, VehicleRates::new(), reports_tx);

        let got: Vec<Rejection> = rejections.iter().collect();
        assert_eq!(
            vec![
                Rejection {
                    report_id: 2,
                    error: ReportError::DuplicateExpense
                },
                Rejection {
                    report_id: 1,
                    error: ReportError::UnknownExpense
                },
            ],
            got
        );

        let reports: Vec<_> = reports.iter().collect();
        assert_eq!(2, reports.len());

        let (report_id, report) = &reports[0];
        assert_eq!(1, *report_id);
        assert_eq!(dec!(100), report.total_spent().unwrap());

        let (report_id, report) = &reports[1];
        assert_eq!(2, *report_id);
        assert_eq!(dec!(250), report.balance().unwrap().remainder);

        handle.join().expect("build thread should not panic");
    }
}
