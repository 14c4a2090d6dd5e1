use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::{Configuration, Metrics, Objective, WeightedAssignments};
use crate::search::reward::calculate_reward;
use crate::search::selection::select_configs;
use crate::service::{Benchmark, Dbms};

/// One evaluated configuration.
#[derive(Debug, Clone, Serialize)]
pub struct TrialRecord {
    pub trial: usize,
    pub configuration: Configuration,
    pub metrics: Metrics,
    pub reward: f64,
}

/// Evaluates hint-derived configurations against the live service.
///
/// Owns the service collaborators for the whole session. The baseline is
/// measured once, at construction; it is never re-measured automatically.
/// Trials run strictly one after another.
pub struct Explorer<D: Dbms, B: Benchmark> {
    dbms: D,
    benchmark: B,
    objective: Objective,
    baseline: Metrics,
    history: Vec<TrialRecord>,
    best: Option<(f64, Configuration)>,
}

impl<D: Dbms, B: Benchmark> Explorer<D, B> {
    /// Create an explorer, measuring the default configuration as baseline.
    pub fn new(mut dbms: D, mut benchmark: B, objective: Objective) -> Self {
        dbms.reset_to_defaults();
        if !dbms.commit_changes() {
            warn!("could not apply default configuration for baseline");
        }
        let baseline = benchmark.evaluate(&mut dbms);
        if baseline.error {
            warn!(?baseline, "baseline run failed, rewards will be unreliable");
        } else {
            info!(objective = %objective, baseline = baseline.measurement.value(), "baseline measured");
        }

        Self {
            dbms,
            benchmark,
            objective,
            baseline,
            history: Vec::new(),
            best: None,
        }
    }

    /// Try up to `max_evals` configurations selected from the weighted assignments.
    ///
    /// Returns the best reward and its configuration, or `(0, {})` when no
    /// trial beat the default configuration.
    pub fn explore(
        &mut self,
        weighted: &WeightedAssignments,
        max_evals: usize,
    ) -> (f64, Configuration) {
        if weighted.is_empty() {
            debug!("no weighted assignments, skipping trials");
            return (0.0, Configuration::new());
        }

        let configs = select_configs(weighted, max_evals);
        info!(count = configs.len(), "selected configurations");

        let mut best_reward = 0.0;
        let mut best_config = Configuration::new();
        for config in configs {
            let reward = self.evaluate_config(&config);
            if reward > best_reward {
                best_reward = reward;
                best_config = config;
            }
        }

        info!(reward = best_reward, config = ?best_config, "exploration finished");
        (best_reward, best_config)
    }

    /// Run one trial: reset, apply, commit, benchmark.
    fn evaluate_config(&mut self, config: &Configuration) -> f64 {
        self.dbms.reset_to_defaults();
        for (parameter, value) in config {
            if !self.dbms.set_param_smart(parameter, value) {
                debug!(parameter = %parameter, value = %value, "assignment refused during trial");
            }
        }

        let metrics = if self.dbms.commit_changes() {
            self.benchmark.evaluate(&mut self.dbms)
        } else {
            warn!(?config, "could not apply configuration");
            Metrics::failed(self.baseline.measurement)
        };

        let reward = calculate_reward(&metrics, &self.baseline, self.objective);
        info!(?config, reward, error = metrics.error, "trial finished");

        if self.best.as_ref().is_none_or(|(r, _)| reward > *r) {
            self.best = Some((reward, config.clone()));
        }
        self.history.push(TrialRecord {
            trial: self.history.len() + 1,
            configuration: config.clone(),
            metrics,
            reward,
        });
        reward
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn baseline(&self) -> &Metrics {
        &self.baseline
    }

    /// All trials of the session, in evaluation order.
    pub fn history(&self) -> &[TrialRecord] {
        &self.history
    }

    /// Best trial of the session across all `explore` calls.
    pub fn session_best(&self) -> Option<&(f64, Configuration)> {
        self.best.as_ref()
    }

    pub fn dbms(&self) -> &D {
        &self.dbms
    }

    pub fn dbms_mut(&mut self) -> &mut D {
        &mut self.dbms
    }

    pub fn benchmark(&self) -> &B {
        &self.benchmark
    }
}
