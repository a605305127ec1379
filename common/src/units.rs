use crate::Real;
use clap::ValueEnum;
use serde::Serialize;
use strum::{Display, EnumIter};

/// Unit used when presenting times to a human.
/// All analysis is done in seconds, this only affects rendering.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize, ValueEnum)]
pub enum TimeUnit {
    #[strum(to_string = "s")]
    #[serde(rename = "s")]
    #[value(name = "s")]
    Seconds,
    #[strum(to_string = "ms")]
    #[serde(rename = "ms")]
    #[value(name = "ms")]
    Milliseconds,
    #[default]
    #[strum(to_string = "µs")]
    #[serde(rename = "us")]
    #[value(name = "us")]
    Microseconds,
    #[strum(to_string = "ns")]
    #[serde(rename = "ns")]
    #[value(name = "ns")]
    Nanoseconds,
}

impl TimeUnit {
    /// Number of this unit in one second.
    pub fn per_second(&self) -> Real {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Milliseconds => 1e3,
            TimeUnit::Microseconds => 1e6,
            TimeUnit::Nanoseconds => 1e9,
        }
    }

    pub fn scale(&self, seconds: Real) -> Real {
        seconds * self.per_second()
    }
}
