use super::{Amount, VehicleId, DECIMAL_PRECISION};

use std::collections::HashMap;

#[derive(Debug, PartialEq)]
pub enum RateError {
    /// The vehicle isn't in the rate table.
    UnknownVehicle,

    /// The rate table already has a rate for this vehicle.
    DuplicateVehicle,

    /// A rate per km must not be negative.
    NegativeRate,

    /// Distance times rate doesn't fit in an amount.
    Overflow,
}

/// Rate per kilometer ("valor por km") of every vehicle a traveler may use.
#[derive(Debug, Clone, Default)]
pub struct VehicleRates {
    rates: HashMap<VehicleId, Amount>,
}

impl VehicleRates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, vehicle: VehicleId, rate_per_km: Amount) -> Result<(), RateError> {
        if rate_per_km < Amount::ZERO {
            return Err(RateError::NegativeRate);
        }
        if self.rates.contains_key(&vehicle) {
            return Err(RateError::DuplicateVehicle);
        }

        self.rates.insert(vehicle, rate_per_km);
        Ok(())
    }

    pub fn rate(&self, vehicle: &str) -> Option<Amount> {
        self.rates.get(vehicle).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Value of a mileage expense: distance times the vehicle rate, rounded
    /// to the centavo.
    pub fn mileage_value(&self, vehicle: &str, distance: Amount) -> Result<Amount, RateError> {
        let rate = self.rate(vehicle).ok_or(RateError::UnknownVehicle)?;
        let value = distance.checked_mul(rate).ok_or(RateError::Overflow)?;

        Ok(value.round_dp(DECIMAL_PRECISION))
    }
}

#[cfg(test)]
mod tests {
    use super::{RateError, VehicleRates};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn rates() -> VehicleRates {
        let mut rates = VehicleRates::new();
        rates.insert("car".to_string(), dec!(1.25)).unwrap();
        rates.insert("motorcycle".to_string(), dec!(0.6)).unwrap();
        rates
    }

    #[test]
    fn test_mileage_value() {
        let rates = rates();
        for (vehicle, distance, want) in vec![
            ("car", dec!(100), dec!(125.00)),
            ("car", dec!(0), dec!(0)),
            ("motorcycle", dec!(42.5), dec!(25.50)),
            ("motorcycle", dec!(0.01), dec!(0.01)),
        ] {
            assert_eq!(Ok(want), rates.mileage_value(vehicle, distance));
        }
    }

    #[test]
    fn test_mileage_value_unknown_vehicle() {
        assert_eq!(
            Err(RateError::UnknownVehicle),
            rates().mileage_value("bicycle", dec!(10))
        );
    }

    #[test]
    fn test_mileage_value_overflow() {
        let very_long_distance = Decimal::from_str("50000000000000000000000000000").unwrap();
        let mut rates = rates();
        rates.insert("truck".to_string(), dec!(2)).unwrap();

        assert_eq!(
            Err(RateError::Overflow),
            rates.mileage_value("truck", very_long_distance)
        );
    }

    #[test]
    fn test_insert_rejects_bad_rates() {
        let mut rates = rates();
        assert_eq!(
            Err(RateError::DuplicateVehicle),
            rates.insert("car".to_string(), dec!(2))
        );
        assert_eq!(
            Err(RateError::NegativeRate),
            rates.insert("truck".to_string(), dec!(-1))
        );
        assert_eq!(Some(dec!(1.25)), rates.rate("car"));
        assert_eq!(2, rates.len());
    }
}
