//! Daily Aggregator
//!
//! One simulated day: draw how many passengers show up, price each of them
//! independently, and add up the takings.

use rand::Rng;
use rand_distr::{Distribution, Poisson};
use tracing::trace;

use crate::error::{FareError, Result};
use crate::passenger::PassengerModel;
use crate::pricing::{passenger_payment, FareRateTable};

/// Day-to-day footfall around an expected ridership.
pub fn sample_passenger_count<R: Rng + ?Sized>(mean: f64, rng: &mut R) -> Result<u64> {
    if !mean.is_finite() || mean < 0.0 {
        return Err(FareError::config(format!(
            "expected passenger count must be finite and non-negative, got {mean}"
        )));
    }
    if mean == 0.0 {
        return Ok(0);
    }

    let poisson = Poisson::new(mean).map_err(|e| FareError::config(e.to_string()))?;
    Ok(poisson.sample(rng) as u64)
}

/// Revenue of one day with a fixed number of passengers, rounded to cents.
pub fn simulate_one_day<R: Rng + ?Sized>(
    fares: &FareRateTable,
    model: &PassengerModel,
    passengers: u64,
    rng: &mut R,
) -> Result<f64> {
    let mut total = 0.0;
    for _ in 0..passengers {
        let passenger = model.sample_passenger(rng);
        total += passenger_payment(fares, &passenger, rng)?.total();
    }

    let revenue = round_cents(total);
    trace!(passengers, revenue, "day simulated");
    Ok(revenue)
}

pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
