//! Error types for the fare simulation
//!
//! - **FareError**: every failure the model can surface
//! - **Result**: alias for `Result<T, FareError>`

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FareError>;

#[derive(Error, Debug)]
pub enum FareError {
    /// Age category outside child / adult / senior
    #[error("invalid age category: {0}")]
    InvalidCategory(String),

    /// Fare class absent from the fare table, or not a known class name
    #[error("unknown fare class: {0}")]
    UnknownFareClass(String),

    /// Probability tables, rates, means or day counts out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl FareError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
