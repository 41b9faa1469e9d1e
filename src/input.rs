use crate::reports::{
    event::{self, Event, Valuation},
    vehicle::{RateError, VehicleRates},
};

use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("malformed CSV: {0}")]
    Csv(String), // CSV is malformed

    #[error("invalid record: {0}")]
    Format(FieldErrors), // Data format is incorrect
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<FieldErrors> for Error {
    fn from(err: FieldErrors) -> Self {
        Self::Format(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Every field of a record that failed validation, so they can all be
/// reported at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(pub Vec<FieldError>);

impl FieldErrors {
    fn add(&mut self, field: &'static str, message: &'static str) {
        self.0.push(FieldError { field, message });
    }

    fn single(field: &'static str, message: &'static str) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

// When parsing the events, a bad row is reported and skipped: the other
// rows still describe valid reports.
pub fn parse(
    input_stream: (impl std::io::Read + Send + 'static),
) -> (Receiver<Event>, Receiver<Error>) {
    let (event_tx, event_rx): (Sender<Event>, Receiver<Event>) = mpsc::channel();
    let (error_tx, error_rx): (Sender<Error>, Receiver<Error>) = mpsc::channel();

    let buffered = std::io::BufReader::new(input_stream);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(buffered);

    // Moving to a new thread so we can start applying the events immediately.
    std::thread::spawn(move || {
        for record in reader.deserialize::<EventRecord>() {
            match convert(record) {
                Ok(event) => event_tx.send(event).unwrap(), // Would only fail if the rx is disconnected, which should not happen here.
                Err(err) => error_tx.send(err).unwrap(), // Would only fail if the rx is disconnected, which should not happen here.
            };
        }
    });

    (event_rx, error_rx)
}

// Convert from a csv deserialise result into an event result.
fn convert(record: Result<EventRecord, csv::Error>) -> Result<Event, Error> {
    Ok(record?.try_into()?)
}

/// Reads the rate table: one `vehicle,rate_per_km` row per vehicle.
/// Unlike events, the whole table is refused on the first bad row, since
/// a missing rate would misprice every mileage expense using it.
pub fn parse_vehicle_rates(input_stream: impl std::io::Read) -> Result<VehicleRates, Error> {
    let buffered = std::io::BufReader::new(input_stream);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(buffered);

    let mut rates = VehicleRates::new();
    for record in reader.deserialize::<VehicleRecord>() {
        let record = record?;
        rates
            .insert(record.vehicle, record.rate_per_km)
            .map_err(|err| match err {
                RateError::DuplicateVehicle => FieldErrors::single("vehicle", "duplicate vehicle"),
                RateError::NegativeRate => {
                    FieldErrors::single("rate_per_km", "cannot be negative")
                }
                RateError::UnknownVehicle => FieldErrors::single("vehicle", "unknown vehicle"),
                RateError::Overflow => FieldErrors::single("rate_per_km", "too large"),
            })?;
    }

    Ok(rates)
}

#[derive(Debug, Deserialize)]
struct VehicleRecord {
    vehicle: String,
    rate_per_km: Decimal,
}

// EventRecord mirrors a CSV row; Event is the validated domain type.
// Keeping them apart lets the domain type drop the optional columns and the
// impossible combinations (e.g. a mileage expense without a vehicle).
#[derive(Debug, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "type")]
    event_type: EventRecordType,

    #[serde(rename = "report")]
    report_id: u32,

    #[serde(rename = "expense")]
    expense_id: Option<u32>,

    amount: Option<Decimal>,
    distance: Option<Decimal>,
    vehicle: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventRecordType {
    Advance,
    Expense,
    Mileage,
    Amend,
    Remove,
    Close,
    Reopen,
}

impl EventRecord {
    fn expense_id(&self, errors: &mut FieldErrors) -> u32 {
        self.expense_id.unwrap_or_else(|| {
            errors.add("expense", "missing expense id");
            0
        })
    }

    fn amount(&self, errors: &mut FieldErrors) -> Decimal {
        match self.amount {
            Some(amount) if amount < Decimal::ZERO => {
                errors.add("amount", "cannot be negative");
                amount
            }
            Some(amount) => amount,
            None => {
                errors.add("amount", "missing amount");
                Decimal::ZERO
            }
        }
    }

    fn mileage(&self, errors: &mut FieldErrors) -> Valuation {
        let distance = match self.distance {
            Some(distance) if distance < Decimal::ZERO => {
                errors.add("distance", "cannot be negative");
                distance
            }
            Some(distance) => distance,
            None => {
                errors.add("distance", "missing distance");
                Decimal::ZERO
            }
        };
        let vehicle = match &self.vehicle {
            Some(vehicle) => vehicle.clone(),
            None => {
                errors.add("vehicle", "missing vehicle");
                String::new()
            }
        };

        Valuation::Mileage { distance, vehicle }
    }

    fn has_mileage(&self) -> bool {
        self.distance.is_some() || self.vehicle.is_some()
    }
}

impl TryFrom<EventRecord> for Event {
    type Error = FieldErrors;
    fn try_from(record: EventRecord) -> Result<Self, Self::Error> {
        let mut errors = FieldErrors::default();
        let report_id = record.report_id;

        let event_type = match record.event_type {
            EventRecordType::Advance => {
                // The advance limits are checked when it is applied to the report.
                match record.amount {
                    Some(amount) => event::Type::SetAdvance(amount),
                    None => {
                        return Err(FieldErrors::single(
                            "amount",
                            "missing amount for advance",
                        ))
                    }
                }
            }
            EventRecordType::Expense => {
                let expense_id = record.expense_id(&mut errors);
                let amount = record.amount(&mut errors);
                event::Type::AddExpense(expense_id, Valuation::Amount(amount))
            }
            EventRecordType::Mileage => {
                let expense_id = record.expense_id(&mut errors);
                event::Type::AddExpense(expense_id, record.mileage(&mut errors))
            }
            EventRecordType::Amend => {
                let expense_id = record.expense_id(&mut errors);
                let valuation = match (record.amount.is_some(), record.has_mileage()) {
                    (true, true) => {
                        errors.add("amount", "cannot be combined with a distance or vehicle");
                        Valuation::Amount(Decimal::ZERO)
                    }
                    (true, false) => Valuation::Amount(record.amount(&mut errors)),
                    (false, true) => record.mileage(&mut errors),
                    (false, false) => {
                        errors.add("amount", "missing amount or distance for amend");
                        Valuation::Amount(Decimal::ZERO)
                    }
                };
                event::Type::AmendExpense(expense_id, valuation)
            }
            EventRecordType::Remove => event::Type::RemoveExpense(record.expense_id(&mut errors)),
            EventRecordType::Close => event::Type::Close,
            EventRecordType::Reopen => event::Type::Reopen,
        };

        errors.into_result(|| Self::new(event_type, report_id))
    }
}

#[test]
// Parsing well-formed data should stream one event per row.
fn test_parse_ok() {
    let data = r#"type,report,expense,amount,distance,vehicle
advance,1,,1000.0,,
expense,1,1,300.0,,
mileage,1,2,,120,car
amend,1,1,250.0,,
remove,1,2,,,
close,1,,,,
reopen,1,,,,"#;
    let reader = std::io::Cursor::new(data);
    let (events, errors) = parse(reader);

    assert_eq!(7, events.iter().count());
    assert_eq!(0, errors.iter().count());
}

#[test]
fn test_parse_ok_with_whitespace() {
    let data = r#"type,  report,  expense, amount, distance, vehicle
advance, 1, , 1000.0, ,
expense , 1 , 1 , 300.0 , ,
    mileage ,1,2,,120,  car
        close                  ,1,,,,"#;
    let reader = std::io::Cursor::new(data);
    let (events, errors) = parse(reader);

    let events: Vec<Event> = events.iter().collect();
    assert_eq!(0, errors.iter().count());
    assert_eq!(
        Event::new(
            event::Type::AddExpense(
                2,
                Valuation::Mileage {
                    distance: Decimal::new(120, 0),
                    vehicle: "car".to_string()
                }
            ),
            1
        ),
        events[2]
    );
}

#[test]
// Parsing incorrectly formatted data should stream a CSV error.
fn test_parse_invalid_format() {
    for (data, err_contains) in vec![
        (
            r#"type,report,expense,amount,distance,vehicle
refund,1,1,1.0,,"#,
            "unknown variant `refund`",
        ),
        (
            r#"type,report,expense,amount,distance,vehicle
close,,,,,"#, // missing report
            "cannot parse integer from empty string",
        ),
        (
            r#"type,report,expense,amount,distance,vehicle
close,1,,"#,
            "found record with 4 fields, but the previous record has 6 fields",
        ),
    ] {
        let reader = std::io::Cursor::new(data);
        let (events, errors) = parse(reader);

        assert_eq!(0, events.iter().count());

        let errs: Vec<Error> = errors.iter().collect();
        assert_eq!(1, errs.len());

        match &errs[0] {
            Error::Csv(msg) => assert!(msg.contains(err_contains), "{:?}", msg),
            _ => panic!("unexpected error"),
        }
    }
}

#[test]
// Rows that parse as CSV but break a field rule should report every bad field.
fn test_parse_invalid_data() {
    let field = |field, message| FieldError { field, message };

    for (data, want_errs) in vec![
        (
            r#"type,report,expense,amount,distance,vehicle
advance,1,,,,"#,
            vec![field("amount", "missing amount for advance")],
        ),
        (
            r#"type,report,expense,amount,distance,vehicle
expense,1,,,,"#,
            vec![
                field("expense", "missing expense id"),
                field("amount", "missing amount"),
            ],
        ),
        (
            r#"type,report,expense,amount,distance,vehicle
expense,1,1,-5,,"#,
            vec![field("amount", "cannot be negative")],
        ),
        (
            r#"type,report,expense,amount,distance,vehicle
mileage,1,1,,,"#,
            vec![
                field("distance", "missing distance"),
                field("vehicle", "missing vehicle"),
            ],
        ),
        (
            r#"type,report,expense,amount,distance,vehicle
amend,1,1,10,5,car"#,
            vec![field("amount", "cannot be combined with a distance or vehicle")],
        ),
        (
            r#"type,report,expense,amount,distance,vehicle
amend,1,1,,,"#,
            vec![field("amount", "missing amount or distance for amend")],
        ),
        (
            r#"type,report,expense,amount,distance,vehicle
remove,1,,,,"#,
            vec![field("expense", "missing expense id")],
        ),
    ] {
        let reader = std::io::Cursor::new(data);
        let (events, errors) = parse(reader);

        assert_eq!(0, events.iter().count());

        let errs: Vec<Error> = errors.iter().collect();
        assert_eq!(vec![Error::Format(FieldErrors(want_errs))], errs);
    }
}

#[test]
fn test_field_errors_display() {
    let mut errors = FieldErrors::single("expense", "missing expense id");
    errors.add("amount", "missing amount");

    assert_eq!(
        "invalid record: expense: missing expense id; amount: missing amount",
        Error::Format(errors).to_string()
    );
}

#[test]
fn test_parse_vehicle_rates() {
    let data = r#"vehicle,rate_per_km
car, 1.20
motorcycle, 0.55"#;

    let rates = parse_vehicle_rates(std::io::Cursor::new(data)).expect("rates should parse");
    assert_eq!(2, rates.len());
    assert_eq!(Some(Decimal::new(120, 2)), rates.rate("car"));
    assert_eq!(Some(Decimal::new(55, 2)), rates.rate("motorcycle"));
}

#[test]
fn test_parse_vehicle_rates_invalid() {
    for (data, want) in vec![
        (
            r#"vehicle,rate_per_km
car,1.2
car,1.3"#,
            Error::Format(FieldErrors::single("vehicle", "duplicate vehicle")),
        ),
        (
            r#"vehicle,rate_per_km
car,-1.2"#,
            Error::Format(FieldErrors::single("rate_per_km", "cannot be negative")),
        ),
    ] {
        assert_eq!(Err(want), parse_vehicle_rates(std::io::Cursor::new(data)).map(|_| ()));
    }
}
