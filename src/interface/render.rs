use crate::models::{Configuration, Hint, Metrics};
use crate::search::TrialRecord;
use crate::tuner::SessionReport;

/// Display hints in processing order.
pub fn display_hints(hints: &[Hint], title: &str) {
    if hints.is_empty() {
        println!("{}: (none)", title);
        return;
    }

    println!();
    println!("=== {} ({} hints) ===", title, hints.len());
    println!();

    // Find max parameter name length for alignment
    let max_param_len = hints.iter().map(|h| h.parameter.len()).max().unwrap_or(10);

    for (i, hint) in hints.iter().enumerate() {
        println!(
            "{:>4}. [doc {:>3}] {:<width$} = {:<10} {}",
            i,
            hint.document_id,
            hint.parameter,
            hint.raw_value,
            hint.hint_type,
            width = max_param_len
        );
    }

    println!();
}

/// Display the top trials of a session by reward.
pub fn display_top_trials(trials: &[TrialRecord], k: usize) {
    let mut sorted: Vec<&TrialRecord> = trials.iter().collect();
    sorted.sort_by(|a, b| b.reward.partial_cmp(&a.reward).unwrap_or(std::cmp::Ordering::Equal));

    println!("\n=== Top {} Trials (by reward) ===\n", k.min(sorted.len()));
    for (rank, trial) in sorted.iter().take(k).enumerate() {
        let status = if trial.metrics.error { " [failed]" } else { "" };
        println!(
            "#{} trial {} | reward {:.2} | measurement {:.2}{}",
            rank + 1,
            trial.trial,
            trial.reward,
            trial.metrics.measurement.value(),
            status
        );
        println!("    {}", display_configuration(&trial.configuration));
        println!();
    }
}

/// Display the outcome of a tuning session.
pub fn display_report(report: &SessionReport, baseline: &Metrics) {
    println!();
    println!("--- Session Summary ---");
    println!("Steps: {}", report.steps);
    println!("Episodes: {}", report.episodes);
    println!("Trials: {}", report.trials);
    println!("Total reward: {:.2}", report.total_reward);
    println!(
        "Elapsed: {:.1}s{}",
        report.elapsed.as_secs_f64(),
        if report.timed_out { " (timeout)" } else { "" }
    );
    println!("Baseline: {:.2}", baseline.measurement.value());

    if report.best_configuration.is_empty() {
        println!("No configuration beat the defaults.");
    } else {
        println!("Best reward: {:.2}", report.best_reward);
        println!("Best configuration: {}", display_configuration(&report.best_configuration));
    }
    println!();
}

fn display_configuration(config: &Configuration) -> String {
    if config.is_empty() {
        return "(defaults)".to_string();
    }
    config
        .iter()
        .map(|(p, v)| format!("{}={}", p, v))
        .collect::<Vec<_>>()
        .join(", ")
}
