//! Rail Fare Revenue Simulation Library
//!
//! Monte Carlo model of the daily ticket revenue of a small intercity rail
//! service, used to compare how fare changes move expected revenue when
//! demand responds to price.
//!
//! ## Modules
//!
//! - `sampling`: weighted categorical and yes/no draws over explicit tables
//! - `passenger`: passenger attributes (age, distance, add-ons) and samplers
//! - `pricing`: discounts, fare class choice, surcharges, ticket price
//! - `daily`: Poisson footfall and one day's revenue
//! - `scenario`: many-day revenue distributions and the fare comparison
//! - `config`: TOML-loadable simulation parameters
//! - `error`: crate error type
//!
//! ## Usage
//!
//! ```bash
//! # Compare current, +10% and -10% fares over 10,000 simulated days
//! cargo run --bin fare_scenarios --release -- --age-preset adult-majority
//! ```

pub mod config;
pub mod daily;
pub mod error;
pub mod passenger;
pub mod pricing;
pub mod sampling;
pub mod scenario;

pub use error::{FareError, Result};
