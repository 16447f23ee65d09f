//! Passenger Pricing Model
//!
//! Turns a sampled [`Passenger`] into a payment:
//!
//! ```text
//! total = distance * rate[fare_class] * discount(age) + surcharge(add_ons)
//! ```
//!
//! ## Fare class choice
//! Short trips (< 200 miles, or unknown distance) pick sleeper 5% of the time.
//! Beyond that the sleeper share grows quadratically with distance,
//! `0.05 * ((d - 200) / 250 + 1)^2`, and saturates at 1.0 from roughly
//! 1068 miles onwards.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{FareError, Result};
use crate::passenger::{AddOn, AddOnSet, AgeCategory, Passenger};

pub const SHORT_TRIP_MILES: u32 = 200;
pub const BASE_SLEEPER_PROBABILITY: f64 = 0.05;
const SLEEPER_GROWTH_MILES: f64 = 250.0;

pub const PET_SURCHARGE: f64 = 26.0;
pub const BIKE_SURCHARGE: f64 = 10.0;
pub const GOLF_SURCHARGE: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FareClass {
    Business,
    Sleeper,
}

impl FareClass {
    pub fn all() -> Vec<Self> {
        vec![Self::Business, Self::Sleeper]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Sleeper => "sleeper",
        }
    }
}

impl fmt::Display for FareClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FareClass {
    type Err = FareError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "business" => Ok(Self::Business),
            "sleeper" => Ok(Self::Sleeper),
            other => Err(FareError::UnknownFareClass(other.to_string())),
        }
    }
}

/// Per-mile rate for each fare class.
///
/// Tables built from external data may be incomplete; [`FareRateTable::rate`]
/// reports the missing class rather than assuming a price.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct FareRateTable {
    rates: BTreeMap<FareClass, f64>,
}

impl FareRateTable {
    pub fn new(business: f64, sleeper: f64) -> Self {
        Self::from_rates([(FareClass::Business, business), (FareClass::Sleeper, sleeper)])
    }

    pub fn from_rates(rates: impl IntoIterator<Item = (FareClass, f64)>) -> Self {
        Self {
            rates: rates.into_iter().collect(),
        }
    }

    pub fn rate(&self, class: FareClass) -> Result<f64> {
        self.rates
            .get(&class)
            .copied()
            .ok_or_else(|| FareError::UnknownFareClass(class.to_string()))
    }

    /// Every rate multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            rates: self.rates.iter().map(|(c, r)| (*c, r * factor)).collect(),
        }
    }

    /// Both classes present, every rate positive and finite.
    pub fn validate(&self) -> Result<()> {
        for class in FareClass::all() {
            let rate = self.rate(class)?;
            if !rate.is_finite() || rate <= 0.0 {
                return Err(FareError::config(format!("{class} rate must be positive, got {rate}")));
            }
        }
        Ok(())
    }
}

impl TryFrom<BTreeMap<String, f64>> for FareRateTable {
    type Error = FareError;

    fn try_from(named: BTreeMap<String, f64>) -> Result<Self> {
        let rates = named
            .into_iter()
            .map(|(name, rate)| Ok((name.parse::<FareClass>()?, rate)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_rates(rates))
    }
}

impl From<FareRateTable> for BTreeMap<String, f64> {
    fn from(table: FareRateTable) -> Self {
        table
            .rates
            .into_iter()
            .map(|(class, rate)| (class.name().to_string(), rate))
            .collect()
    }
}

impl AgeCategory {
    /// Fraction of the full fare charged.
    pub fn discount(&self) -> f64 {
        match self {
            Self::Child => 0.5,
            Self::Senior => 0.9,
            Self::Adult => 1.0,
        }
    }
}

/// Discount for an externally supplied category name.
pub fn discount_multiplier(category: &str) -> Result<f64> {
    Ok(category.parse::<AgeCategory>()?.discount())
}

pub fn sleeper_probability(distance: Option<u32>) -> f64 {
    match distance {
        Some(d) if d >= SHORT_TRIP_MILES => {
            let growth = (d - SHORT_TRIP_MILES) as f64 / SLEEPER_GROWTH_MILES + 1.0;
            (BASE_SLEEPER_PROBABILITY * growth.powi(2)).min(1.0)
        }
        _ => BASE_SLEEPER_PROBABILITY,
    }
}

pub fn choose_fare_class<R: Rng + ?Sized>(distance: Option<u32>, rng: &mut R) -> FareClass {
    if rng.gen_bool(sleeper_probability(distance)) {
        FareClass::Sleeper
    } else {
        FareClass::Business
    }
}

impl AddOn {
    pub fn surcharge(&self) -> f64 {
        match self {
            Self::Pet => PET_SURCHARGE,
            Self::Bike => BIKE_SURCHARGE,
            Self::Golf => GOLF_SURCHARGE,
        }
    }
}

pub fn add_on_surcharge(add_ons: &AddOnSet) -> f64 {
    add_ons.iter().map(|a| a.surcharge()).sum()
}

pub fn fare_payment(
    fares: &FareRateTable,
    distance: u32,
    class: FareClass,
    discount: f64,
) -> Result<f64> {
    Ok(distance as f64 * fares.rate(class)? * discount)
}

/// What one passenger paid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ticket {
    pub fare_class: FareClass,
    pub fare: f64,
    pub surcharge: f64,
}

impl Ticket {
    pub fn total(&self) -> f64 {
        self.fare + self.surcharge
    }
}

pub fn passenger_payment<R: Rng + ?Sized>(
    fares: &FareRateTable,
    passenger: &Passenger,
    rng: &mut R,
) -> Result<Ticket> {
    let fare_class = choose_fare_class(Some(passenger.distance_miles), rng);
    let fare = fare_payment(
        fares,
        passenger.distance_miles,
        fare_class,
        passenger.age.discount(),
    )?;

    Ok(Ticket {
        fare_class,
        fare,
        surcharge: add_on_surcharge(&passenger.add_ons),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn unit_fares() -> FareRateTable {
        FareRateTable::new(1.0, 2.0)
    }

    #[test]
    fn test_discount_multiplier() {
        assert_eq!(discount_multiplier("child").unwrap(), 0.5);
        assert_eq!(discount_multiplier("senior").unwrap(), 0.9);
        assert_eq!(discount_multiplier("adult").unwrap(), 1.0);
        assert!(matches!(
            discount_multiplier("youth"),
            Err(FareError::InvalidCategory(_))
        ));
        assert!(matches!(
            discount_multiplier("Adult"),
            Err(FareError::InvalidCategory(_))
        ));
    }

    #[test]
    fn test_fare_payment() {
        let fares = unit_fares();

        assert_eq!(fare_payment(&fares, 100, FareClass::Business, 1.0).unwrap(), 100.0);
        assert_eq!(fare_payment(&fares, 100, FareClass::Business, 0.5).unwrap(), 50.0);
        assert_eq!(fare_payment(&fares, 100, FareClass::Sleeper, 1.0).unwrap(), 200.0);
    }

    #[test]
    fn test_fare_payment_missing_class() {
        let fares = FareRateTable::from_rates([(FareClass::Business, 1.0)]);

        let err = fare_payment(&fares, 100, FareClass::Sleeper, 1.0).unwrap_err();
        assert!(matches!(err, FareError::UnknownFareClass(ref c) if c == "sleeper"));
        assert!(fares.validate().is_err());
    }

    #[test]
    fn test_fare_class_parse() {
        assert_eq!("sleeper".parse::<FareClass>().unwrap(), FareClass::Sleeper);
        assert!(matches!(
            "coach".parse::<FareClass>(),
            Err(FareError::UnknownFareClass(_))
        ));
    }

    #[test]
    fn test_table_from_named_rates() {
        let named: BTreeMap<String, f64> =
            [("business".to_string(), 0.166), ("sleeper".to_string(), 0.283)]
                .into_iter()
                .collect();
        let fares = FareRateTable::try_from(named).unwrap();
        assert_eq!(fares, FareRateTable::new(0.166, 0.283));

        let bad: BTreeMap<String, f64> = [("coach".to_string(), 0.1)].into_iter().collect();
        assert!(matches!(
            FareRateTable::try_from(bad),
            Err(FareError::UnknownFareClass(ref c)) if c == "coach"
        ));
    }

    #[test]
    fn test_validate_rejects_non_positive_rates() {
        assert!(FareRateTable::new(0.166, 0.283).validate().is_ok());
        assert!(FareRateTable::new(0.0, 0.283).validate().is_err());
        assert!(FareRateTable::new(0.166, -1.0).validate().is_err());
        assert!(FareRateTable::new(f64::NAN, 0.283).validate().is_err());
    }

    #[test]
    fn test_scaled_table() {
        let fares = FareRateTable::new(0.2, 0.4).scaled(1.1);

        assert!((fares.rate(FareClass::Business).unwrap() - 0.22).abs() < 1e-12);
        assert!((fares.rate(FareClass::Sleeper).unwrap() - 0.44).abs() < 1e-12);
    }

    #[test]
    fn test_add_on_surcharge() {
        let pet: AddOnSet = [AddOn::Pet].into_iter().collect();
        let all: AddOnSet = AddOn::all().into_iter().collect();

        assert_eq!(add_on_surcharge(&pet), 26.0);
        assert_eq!(add_on_surcharge(&all), 46.0);
        assert_eq!(add_on_surcharge(&AddOnSet::empty()), 0.0);
    }

    #[test]
    fn test_sleeper_probability_short_trips() {
        assert_eq!(sleeper_probability(None), 0.05);
        assert_eq!(sleeper_probability(Some(45)), 0.05);
        assert_eq!(sleeper_probability(Some(199)), 0.05);
        assert!((sleeper_probability(Some(200)) - 0.05).abs() < 1e-12);
        assert!((sleeper_probability(Some(450)) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_sleeper_probability_monotone_and_clamped() {
        let mut previous = 0.0;
        for d in SHORT_TRIP_MILES..=2200 {
            let p = sleeper_probability(Some(d));
            assert!(p >= previous, "dropped at {d}");
            assert!(p <= 1.0);
            previous = p;
        }

        // 0.05 * x^2 >= 1 once (d - 200) / 250 + 1 >= sqrt(20)
        assert!(sleeper_probability(Some(1068)) < 1.0);
        assert_eq!(sleeper_probability(Some(1069)), 1.0);
        assert_eq!(sleeper_probability(Some(2200)), 1.0);
    }

    #[test]
    fn test_choose_fare_class_long_trip_always_sleeper() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        assert!((0..1_000).all(|_| choose_fare_class(Some(1500), &mut rng) == FareClass::Sleeper));
    }

    #[test]
    fn test_choose_fare_class_short_trip_mostly_business() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let draws = 20_000;

        let sleepers = (0..draws)
            .filter(|_| choose_fare_class(Some(150), &mut rng) == FareClass::Sleeper)
            .count();
        let freq = sleepers as f64 / draws as f64;
        assert!((freq - 0.05).abs() < 0.006, "freq {freq}");
    }

    #[test]
    fn test_passenger_payment() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let add_ons: AddOnSet = [AddOn::Bike, AddOn::Golf].into_iter().collect();
        let passenger = Passenger::new(AgeCategory::Child, 1500, add_ons);

        let ticket = passenger_payment(&unit_fares(), &passenger, &mut rng).unwrap();

        assert_eq!(ticket.fare_class, FareClass::Sleeper);
        assert_eq!(ticket.fare, 1500.0);
        assert_eq!(ticket.surcharge, 20.0);
        assert_eq!(ticket.total(), 1520.0);
    }
}
