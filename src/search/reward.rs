use crate::models::{Metrics, Objective};
use crate::search::constants::ERROR_REWARD;

/// Reward of a benchmark outcome relative to the baseline.
///
/// Positive means better than the default configuration. Failed runs always
/// get [`ERROR_REWARD`].
///
/// # Panics
///
/// Panics if the metrics do not carry the measurement the objective needs.
/// That mismatch is a wiring error between benchmark and explorer.
pub fn calculate_reward(metrics: &Metrics, baseline: &Metrics, objective: Objective) -> f64 {
    if metrics.error {
        return ERROR_REWARD;
    }
    match objective {
        Objective::Time => match (baseline.time_ms(), metrics.time_ms()) {
            (Some(base), Some(time)) => base - time,
            _ => panic!("time objective needs time measurements, got {metrics:?} vs {baseline:?}"),
        },
        Objective::Throughput => match (baseline.throughput_value(), metrics.throughput_value()) {
            (Some(base), Some(throughput)) => throughput - base,
            _ => panic!(
                "throughput objective needs throughput measurements, got {metrics:?} vs {baseline:?}"
            ),
        },
    }
}
