//! Simulation configuration
//!
//! Everything a run needs is carried in [`SimulationConfig`]; nothing is
//! module-level state. Configs are built in code or loaded from TOML:
//!
//! ```toml
//! age_preset = "adult_majority"
//! days = 10000
//! passenger_mean = 210.0
//! seed = 42
//!
//! [fares]
//! business = 0.166
//! sleeper = 0.283
//! ```
//!
//! `age_preset` has no default and must always be given.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FareError, Result};
use crate::passenger::AgePreset;
use crate::pricing::FareRateTable;

pub const DEFAULT_DAYS: usize = 10_000;
pub const DEFAULT_PASSENGER_MEAN: f64 = 210.0;
pub const DEFAULT_BUSINESS_RATE: f64 = 0.166;
pub const DEFAULT_SLEEPER_RATE: f64 = 0.283;
pub const DEFAULT_FARE_STEP: f64 = 0.10;
pub const DEFAULT_RIDERSHIP_SHIFT: f64 = 0.02;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Simulated days per scenario
    #[serde(default = "default_days")]
    pub days: usize,
    /// Base seed; a random one is drawn and logged when absent
    #[serde(default)]
    pub seed: Option<u64>,
    /// Spread days across the rayon pool
    #[serde(default)]
    pub parallel: bool,
    /// Expected daily passengers at baseline fares
    #[serde(default = "default_passenger_mean")]
    pub passenger_mean: f64,
    /// Baseline per-mile rates
    #[serde(default = "default_fares")]
    pub fares: FareRateTable,
    pub age_preset: AgePreset,
    /// Fractional fare change for the increase/decrease scenarios
    #[serde(default = "default_fare_step")]
    pub fare_step: f64,
    /// Fractional ridership response to a fare change
    #[serde(default = "default_ridership_shift")]
    pub ridership_shift: f64,
}

fn default_days() -> usize {
    DEFAULT_DAYS
}

fn default_passenger_mean() -> f64 {
    DEFAULT_PASSENGER_MEAN
}

fn default_fares() -> FareRateTable {
    FareRateTable::new(DEFAULT_BUSINESS_RATE, DEFAULT_SLEEPER_RATE)
}

fn default_fare_step() -> f64 {
    DEFAULT_FARE_STEP
}

fn default_ridership_shift() -> f64 {
    DEFAULT_RIDERSHIP_SHIFT
}

impl SimulationConfig {
    pub fn new(age_preset: AgePreset) -> Self {
        Self {
            days: default_days(),
            seed: None,
            parallel: false,
            passenger_mean: default_passenger_mean(),
            fares: default_fares(),
            age_preset,
            fare_step: default_fare_step(),
            ridership_shift: default_ridership_shift(),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.days == 0 {
            return Err(FareError::config("days must be at least 1"));
        }
        if !self.passenger_mean.is_finite() || self.passenger_mean <= 0.0 {
            return Err(FareError::config(format!(
                "passenger_mean must be positive, got {}",
                self.passenger_mean
            )));
        }
        if !(0.0..1.0).contains(&self.fare_step) {
            return Err(FareError::config(format!(
                "fare_step must be in [0, 1), got {}",
                self.fare_step
            )));
        }
        if !(0.0..1.0).contains(&self.ridership_shift) {
            return Err(FareError::config(format!(
                "ridership_shift must be in [0, 1), got {}",
                self.ridership_shift
            )));
        }
        self.fares.validate()
    }
}
