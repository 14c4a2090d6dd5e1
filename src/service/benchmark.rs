use tracing::info;

use crate::models::{Configuration, Metrics, Objective};
use crate::service::Dbms;

/// Runs the workload against the current configuration.
///
/// May retry internally but reports one terminal outcome per call.
pub trait Benchmark {
    fn evaluate(&mut self, dbms: &mut dyn Dbms) -> Metrics;

    /// Log statistics gathered so far.
    fn log_stats(&self) {}
}

/// Best and worst measurements seen, with the configurations behind them.
#[derive(Debug, Clone)]
pub struct BenchmarkStats {
    objective: Objective,
    best: Option<(f64, Configuration)>,
    worst: Option<(f64, Configuration)>,
}

impl BenchmarkStats {
    pub fn new(objective: Objective) -> Self {
        Self {
            objective,
            best: None,
            worst: None,
        }
    }

    /// Record a run. Failed runs are ignored.
    pub fn record(&mut self, metrics: &Metrics, changed: &Configuration) {
        if metrics.error {
            return;
        }
        let value = metrics.measurement.value();
        let objective = self.objective;
        let better = |a: f64, b: f64| match objective {
            Objective::Time => a < b,
            Objective::Throughput => a > b,
        };

        if self.best.as_ref().is_none_or(|(b, _)| better(value, *b)) {
            self.best = Some((value, changed.clone()));
        }
        if self.worst.as_ref().is_none_or(|(w, _)| better(*w, value)) {
            self.worst = Some((value, changed.clone()));
        }
    }

    pub fn best(&self) -> Option<&(f64, Configuration)> {
        self.best.as_ref()
    }

    pub fn worst(&self) -> Option<&(f64, Configuration)> {
        self.worst.as_ref()
    }

    pub fn log(&self) {
        if let Some((value, config)) = &self.best {
            info!(objective = %self.objective, value, ?config, "best run so far");
        }
        if let Some((value, config)) = &self.worst {
            info!(objective = %self.objective, value, ?config, "worst run so far");
        }
    }
}
