use std::iter;

use crate::models::{Configuration, WeightedAssignments};
use crate::search::distance::min_distance;

/// Select up to `max_configs` diverse configurations from weighted assignments.
///
/// Each slot picks, independently per parameter, the candidate value that
/// minimizes the largest weighted distance from any candidate to its closest
/// selected value. Slots are filled in order, each relative to the values
/// chosen for earlier slots.
///
/// Once a slot repeats an earlier configuration every later slot would
/// repeat it too, so selection stops there. Fewer than `max_configs`
/// configurations are returned when the candidates are exhausted.
pub fn select_configs(weighted: &WeightedAssignments, max_configs: usize) -> Vec<Configuration> {
    let candidates = weighted.by_parameter();
    if candidates.is_empty() {
        return Vec::new();
    }

    let mut chosen: Vec<Vec<&str>> = vec![Vec::new(); candidates.len()];
    let mut configs: Vec<Configuration> = Vec::with_capacity(max_configs);

    for _ in 0..max_configs {
        let mut config = Configuration::new();
        for ((parameter, values), picked) in candidates.iter().zip(chosen.iter_mut()) {
            let value = pick_value(values, picked.as_slice());
            picked.push(value);
            config.insert(parameter.clone(), value.to_string());
        }

        if configs.contains(&config) {
            break;
        }
        configs.push(config);
    }

    configs
}

/// Candidate with the lowest coverage cost; earliest candidate wins ties.
fn pick_value<'a>(values: &'a [(String, f64)], picked: &[&'a str]) -> &'a str {
    let mut best: Option<(&'a str, f64)> = None;
    for (candidate, _) in values {
        let cost = coverage_cost(values, picked, candidate);
        if best.is_none_or(|(_, best_cost)| cost < best_cost) {
            best = Some((candidate.as_str(), cost));
        }
    }
    best.map(|(value, _)| value).unwrap_or_default()
}

/// Largest weighted distance from any candidate to the selection plus `candidate`.
fn coverage_cost(values: &[(String, f64)], picked: &[&str], candidate: &str) -> f64 {
    values
        .iter()
        .map(|(value, weight)| {
            let references = picked.iter().copied().chain(iter::once(candidate));
            weight * min_distance(value, references)
        })
        .fold(0.0, f64::max)
}
