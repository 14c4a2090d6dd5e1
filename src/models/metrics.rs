use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TunerError;

/// Optimization direction, fixed for the lifetime of an explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Minimize benchmark execution time.
    Time,
    /// Maximize benchmark throughput.
    Throughput,
}

impl FromStr for Objective {
    type Err = TunerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "time" => Ok(Objective::Time),
            "throughput" => Ok(Objective::Throughput),
            other => Err(TunerError::UnknownObjective(other.to_string())),
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Objective::Time => f.write_str("time"),
            Objective::Throughput => f.write_str("throughput"),
        }
    }
}

/// What a benchmark run measured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Measurement {
    TimeMs(f64),
    Throughput(f64),
}

impl Measurement {
    pub fn value(&self) -> f64 {
        match self {
            Measurement::TimeMs(v) | Measurement::Throughput(v) => *v,
        }
    }
}

/// Outcome of one benchmark run. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub error: bool,
    pub measurement: Measurement,
}

impl Metrics {
    pub fn time(time_ms: f64) -> Self {
        Self {
            error: false,
            measurement: Measurement::TimeMs(time_ms),
        }
    }

    pub fn throughput(throughput: f64) -> Self {
        Self {
            error: false,
            measurement: Measurement::Throughput(throughput),
        }
    }

    /// A failed run; the measurement is kept for reporting only.
    pub fn failed(measurement: Measurement) -> Self {
        Self {
            error: true,
            measurement,
        }
    }

    pub fn time_ms(&self) -> Option<f64> {
        match self.measurement {
            Measurement::TimeMs(v) => Some(v),
            Measurement::Throughput(_) => None,
        }
    }

    pub fn throughput_value(&self) -> Option<f64> {
        match self.measurement {
            Measurement::Throughput(v) => Some(v),
            Measurement::TimeMs(_) => None,
        }
    }
}
