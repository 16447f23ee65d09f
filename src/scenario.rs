//! Scenario Runner
//!
//! Repeats the daily aggregator over many independent days to build an
//! empirical revenue distribution for one fare configuration, and runs the
//! standard three-way fare comparison.
//!
//! ## Scenarios
//! - Baseline: current fares, current ridership
//! - Fare increase: fares +10%, ridership -2%
//! - Fare decrease: fares -10%, ridership +2%
//!
//! ## Reproducibility
//! Sequential runs draw every day from one injected `Rng`. Parallel runs give
//! day `i` its own ChaCha stream `i` under a shared seed, so the output for a
//! seed does not depend on the number of worker threads.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::daily::{sample_passenger_count, simulate_one_day};
use crate::error::{FareError, Result};
use crate::passenger::{AgeTable, PassengerModel};
use crate::pricing::FareRateTable;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FareScenario {
    Baseline,
    FareIncrease,
    FareDecrease,
}

impl FareScenario {
    pub fn all() -> Vec<Self> {
        vec![Self::Baseline, Self::FareIncrease, Self::FareDecrease]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Baseline => "Current fare",
            Self::FareIncrease => "Increase fare",
            Self::FareDecrease => "Decrease fare",
        }
    }

    pub fn fare_multiplier(&self, step: f64) -> f64 {
        match self {
            Self::Baseline => 1.0,
            Self::FareIncrease => 1.0 + step,
            Self::FareDecrease => 1.0 - step,
        }
    }

    /// Demand moves against the fare.
    pub fn ridership_multiplier(&self, shift: f64) -> f64 {
        match self {
            Self::Baseline => 1.0,
            Self::FareIncrease => 1.0 - shift,
            Self::FareDecrease => 1.0 + shift,
        }
    }
}

/// One fare configuration to simulate.
#[derive(Clone, Debug)]
pub struct ScenarioConfig {
    pub label: String,
    pub fares: FareRateTable,
    pub passenger_mean: f64,
    pub days: usize,
    pub age_table: AgeTable,
}

impl ScenarioConfig {
    pub fn for_scenario(config: &SimulationConfig, scenario: FareScenario) -> Self {
        Self {
            label: scenario.name().to_string(),
            fares: config
                .fares
                .scaled(scenario.fare_multiplier(config.fare_step)),
            passenger_mean: config.passenger_mean
                * scenario.ridership_multiplier(config.ridership_shift),
            days: config.days,
            age_table: config.age_preset.table(),
        }
    }
}

fn check_inputs(fares: &FareRateTable, passenger_mean: f64) -> Result<()> {
    fares.validate()?;
    if !passenger_mean.is_finite() || passenger_mean < 0.0 {
        return Err(FareError::config(format!(
            "expected passenger count must be finite and non-negative, got {passenger_mean}"
        )));
    }
    Ok(())
}

/// Daily revenue for `days` independent days.
pub fn run_scenario<R: Rng + ?Sized>(
    days: usize,
    fares: &FareRateTable,
    passenger_mean: f64,
    model: &PassengerModel,
    rng: &mut R,
) -> Result<Vec<f64>> {
    check_inputs(fares, passenger_mean)?;
    debug!(days, passenger_mean, "running scenario");

    let mut revenues = Vec::with_capacity(days);
    for _ in 0..days {
        let passengers = sample_passenger_count(passenger_mean, rng)?;
        revenues.push(simulate_one_day(fares, model, passengers, rng)?);
    }
    Ok(revenues)
}

/// Same contract as [`run_scenario`], with days spread across threads.
pub fn run_scenario_parallel(
    days: usize,
    fares: &FareRateTable,
    passenger_mean: f64,
    model: &PassengerModel,
    seed: u64,
) -> Result<Vec<f64>> {
    check_inputs(fares, passenger_mean)?;
    debug!(days, passenger_mean, seed, "running scenario in parallel");

    (0..days)
        .into_par_iter()
        .map(|day| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(day as u64);
            let passengers = sample_passenger_count(passenger_mean, &mut rng)?;
            simulate_one_day(fares, model, passengers, &mut rng)
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub label: String,
    pub passenger_mean: f64,
    pub daily_revenue: Vec<f64>,
}

impl ScenarioResult {
    pub fn days(&self) -> usize {
        self.daily_revenue.len()
    }

    pub fn mean(&self) -> f64 {
        if self.daily_revenue.is_empty() {
            return 0.0;
        }
        self.daily_revenue.iter().sum::<f64>() / self.days() as f64
    }

    /// Sample standard deviation.
    pub fn std_dev(&self) -> f64 {
        let n = self.days();
        if n < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let var = self
            .daily_revenue
            .iter()
            .map(|r| (r - mean).powi(2))
            .sum::<f64>()
            / (n - 1) as f64;
        var.sqrt()
    }

    pub fn min(&self) -> f64 {
        if self.daily_revenue.is_empty() {
            return 0.0;
        }
        self.daily_revenue.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.daily_revenue.iter().cloned().fold(0.0, f64::max)
    }

    pub fn percentile(&self, p: f64) -> f64 {
        let mut sorted = self.daily_revenue.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        percentile(&sorted, p)
    }

    /// Change in mean revenue relative to `baseline`, as a fraction.
    pub fn relative_change(&self, baseline: &ScenarioResult) -> f64 {
        let base = baseline.mean();
        if base > 0.0 {
            self.mean() / base - 1.0
        } else {
            0.0
        }
    }

    pub fn print(&self) {
        let mut sorted = self.daily_revenue.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));

        println!("  Days simulated:          {}", self.days());
        println!("  Expected passengers:     {:.1}", self.passenger_mean);
        println!("  Mean daily revenue:      ${:.2}", self.mean());
        println!("  Std dev:                 ${:.2}", self.std_dev());
        println!("  Min / Max:               ${:.2} / ${:.2}", self.min(), self.max());
        println!("  P5:                      ${:.2}", percentile(&sorted, 0.05));
        println!("  Median:                  ${:.2}", percentile(&sorted, 0.50));
        println!("  P95:                     ${:.2}", percentile(&sorted, 0.95));
    }
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

pub fn simulate_scenario<R: Rng + ?Sized>(
    scenario: &ScenarioConfig,
    rng: &mut R,
) -> Result<ScenarioResult> {
    let model = PassengerModel::new(scenario.age_table)?;
    let daily_revenue = run_scenario(
        scenario.days,
        &scenario.fares,
        scenario.passenger_mean,
        &model,
        rng,
    )?;
    finish(scenario, daily_revenue)
}

pub fn simulate_scenario_parallel(scenario: &ScenarioConfig, seed: u64) -> Result<ScenarioResult> {
    let model = PassengerModel::new(scenario.age_table)?;
    let daily_revenue = run_scenario_parallel(
        scenario.days,
        &scenario.fares,
        scenario.passenger_mean,
        &model,
        seed,
    )?;
    finish(scenario, daily_revenue)
}

fn finish(scenario: &ScenarioConfig, daily_revenue: Vec<f64>) -> Result<ScenarioResult> {
    let result = ScenarioResult {
        label: scenario.label.clone(),
        passenger_mean: scenario.passenger_mean,
        daily_revenue,
    };
    info!(
        scenario = %result.label,
        days = result.days(),
        mean = result.mean(),
        "scenario complete"
    );
    Ok(result)
}

/// Runs every [`FareScenario`] in `FareScenario::all()` order.
///
/// Scenario `i` is seeded with `seed + i`.
pub fn compare_scenarios(config: &SimulationConfig) -> Result<Vec<ScenarioResult>> {
    config.validate()?;

    let seed = config.seed.unwrap_or_else(rand::random);
    info!(seed, days = config.days, parallel = config.parallel, "comparing fare scenarios");

    FareScenario::all()
        .into_iter()
        .enumerate()
        .map(|(i, scenario)| {
            let scenario_config = ScenarioConfig::for_scenario(config, scenario);
            let scenario_seed = seed.wrapping_add(i as u64);
            if config.parallel {
                simulate_scenario_parallel(&scenario_config, scenario_seed)
            } else {
                let mut rng = ChaCha8Rng::seed_from_u64(scenario_seed);
                simulate_scenario(&scenario_config, &mut rng)
            }
        })
        .collect()
}
