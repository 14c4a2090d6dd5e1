use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, TunerError};
use crate::models::{decompose_value, Configuration, Measurement, Metrics, Objective};
use crate::service::{Benchmark, BenchmarkStats, Dbms};

/// Size units understood by the simulated system, in bytes.
const UNIT_TO_SIZE: [(&str, f64); 5] = [
    ("", 1.0),
    ("kb", 1024.0),
    ("mb", 1024.0 * 1024.0),
    ("gb", 1024.0 * 1024.0 * 1024.0),
    ("tb", 1024.0 * 1024.0 * 1024.0 * 1024.0),
];

/// Behavior of one simulated parameter.
///
/// Bounds, optimum and crash threshold are in base units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterModel {
    pub default: String,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub optimum: Option<f64>,
    #[serde(default)]
    pub sensitivity: f64,
    #[serde(default)]
    pub crash_above: Option<f64>,
    /// Allowed values for non-numeric parameters.
    #[serde(default)]
    pub allowed: Vec<String>,
}

/// Description of a simulated system and workload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationModel {
    pub objective: Objective,
    /// Time (ms) or throughput of the workload at the optimum.
    pub base_performance: f64,
    pub parameters: BTreeMap<String, ParameterModel>,
}

impl SimulationModel {
    /// Check that every default value is accepted by its own parameter.
    pub fn validate(&self) -> Result<()> {
        for (name, param) in &self.parameters {
            if !param.accepts(&param.default) {
                return Err(TunerError::InvalidConfig(format!(
                    "default '{}' of {} is outside its own range",
                    param.default, name
                )));
            }
        }
        if self.base_performance <= 0.0 {
            return Err(TunerError::InvalidConfig(
                "base_performance must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load and validate a simulation model from JSON.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<SimulationModel> {
    let content = fs::read_to_string(path)?;
    let model: SimulationModel = serde_json::from_str(&content)?;
    model.validate()?;
    Ok(model)
}

/// Convert a value like `4GB` or `'128kB'` to base units.
pub fn normalize_size(value: &str) -> Option<f64> {
    let (magnitude, unit) = decompose_value(value.trim_matches('\''))?;
    let unit = unit.to_lowercase();
    UNIT_TO_SIZE
        .iter()
        .find(|(u, _)| *u == unit)
        .map(|(_, size)| magnitude * size)
}

impl ParameterModel {
    fn accepts(&self, value: &str) -> bool {
        if !self.allowed.is_empty() {
            return self.allowed.iter().any(|a| a == value.trim_matches('\''));
        }
        match normalize_size(value) {
            Some(v) => {
                self.min.is_none_or(|min| v >= min) && self.max.is_none_or(|max| v <= max)
            }
            None => false,
        }
    }

    /// Relative slowdown caused by the given value.
    fn penalty(&self, value: &str) -> f64 {
        match (self.optimum, normalize_size(value)) {
            (Some(optimum), Some(v)) if optimum > 0.0 => {
                self.sensitivity * (v.max(1.0) / optimum).log2().abs()
            }
            _ => 0.0,
        }
    }

    fn crashes(&self, value: &str) -> bool {
        match (self.crash_above, normalize_size(value)) {
            (Some(limit), Some(v)) => v > limit,
            _ => false,
        }
    }
}

/// A configurable system backed by a [`SimulationModel`].
///
/// Values are normalized to base units before range checks, so `1GB` and
/// `1024MB` are the same setting.
pub struct SimulatedDbms {
    model: SimulationModel,
    pending: Configuration,
    effective: Configuration,
    restarts: usize,
}

impl SimulatedDbms {
    pub fn new(model: SimulationModel) -> Self {
        Self {
            model,
            pending: Configuration::new(),
            effective: Configuration::new(),
            restarts: 0,
        }
    }

    /// Number of times changes were committed.
    pub fn restarts(&self) -> usize {
        self.restarts
    }
}

impl Dbms for SimulatedDbms {
    fn reset_to_defaults(&mut self) {
        self.pending.clear();
    }

    fn apply(&mut self, parameter: &str, value: &str) -> bool {
        let Some(param) = self.model.parameters.get(parameter) else {
            return false;
        };
        if !param.accepts(value) {
            debug!(parameter, value, "value rejected");
            return false;
        }
        if value == param.default {
            self.pending.remove(parameter);
        } else {
            self.pending.insert(parameter.to_string(), value.to_string());
        }
        true
    }

    fn commit_changes(&mut self) -> bool {
        self.effective = self.pending.clone();
        self.restarts += 1;
        true
    }

    fn current_value(&self, parameter: &str) -> Option<String> {
        let param = self.model.parameters.get(parameter)?;
        Some(
            self.pending
                .get(parameter)
                .cloned()
                .unwrap_or_else(|| param.default.clone()),
        )
    }

    fn list_parameters(&self) -> Vec<String> {
        self.model.parameters.keys().cloned().collect()
    }

    fn changed_parameters(&self) -> Configuration {
        self.effective.clone()
    }
}

/// Synthetic workload scoring the committed configuration.
///
/// Cost grows with the log-distance of each tuned parameter from its optimum.
pub struct SimulatedBenchmark {
    model: SimulationModel,
    stats: BenchmarkStats,
    runs: usize,
}

impl SimulatedBenchmark {
    pub fn new(model: SimulationModel) -> Self {
        let stats = BenchmarkStats::new(model.objective);
        Self {
            model,
            stats,
            runs: 0,
        }
    }

    /// Number of workload runs so far.
    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn stats(&self) -> &BenchmarkStats {
        &self.stats
    }
}

impl Benchmark for SimulatedBenchmark {
    fn evaluate(&mut self, dbms: &mut dyn Dbms) -> Metrics {
        self.runs += 1;
        let changed = dbms.changed_parameters();

        let mut slowdown = 1.0;
        let mut crashed = false;
        for (name, param) in &self.model.parameters {
            let value = changed.get(name).unwrap_or(&param.default);
            slowdown += param.penalty(value);
            crashed |= param.crashes(value);
        }

        let measurement = match self.model.objective {
            Objective::Time => Measurement::TimeMs(self.model.base_performance * slowdown),
            Objective::Throughput => Measurement::Throughput(self.model.base_performance / slowdown),
        };

        let metrics = if crashed {
            warn!(?changed, "simulated service crashed");
            Metrics::failed(measurement)
        } else {
            Metrics {
                error: false,
                measurement,
            }
        };
        self.stats.record(&metrics, &changed);
        metrics
    }

    fn log_stats(&self) {
        self.stats.log();
    }
}
