pub mod balance;
pub mod event;
pub mod format;
pub mod process;
pub mod report;
pub mod vehicle;

// Named types read better than raw integers, e.g. BTreeMap<ReportId, Report>,
// and changing an id width later is a one-line change.
pub type ReportId = u32;
pub type ExpenseId = u32;
pub type VehicleId = String;

// Money is handled with a decimal type rather than f32/f64, so sums of
// expenses never drift by a cent.
pub type Amount = rust_decimal::Decimal;

// Reports are kept in Brazilian Reais, with centavos.
const DECIMAL_PRECISION: u32 = 2;
