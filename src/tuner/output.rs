use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::Metrics;
use crate::search::TrialRecord;
use crate::tuner::episode::DecisionRecord;
use crate::tuner::session::SessionReport;

/// Round a float to n decimal places.
fn truncate(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Render a configuration as `param=value;param=value`.
fn config_cell(config: &crate::models::Configuration) -> String {
    config
        .iter()
        .map(|(p, v)| format!("{}={}", p, v))
        .collect::<Vec<_>>()
        .join(";")
}

/// Write all trials to a CSV file.
pub fn write_trials_csv(trials: &[TrialRecord], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["trial", "configuration", "error", "measurement", "reward"])?;
    for trial in trials {
        wtr.write_record([
            trial.trial.to_string(),
            config_cell(&trial.configuration),
            trial.metrics.error.to_string(),
            format!("{:.3}", trial.metrics.measurement.value()),
            format!("{:.3}", trial.reward),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the decision log to a CSV file, one row per processed hint.
pub fn write_decisions_csv(records: &[DecisionRecord], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the best configuration and session summary to a JSON file.
pub fn write_best_json(report: &SessionReport, baseline: &Metrics, path: &Path) -> Result<()> {
    let json = serde_json::json!({
        "configuration": report.best_configuration,
        "reward": truncate(report.best_reward, 3),
        "baseline": {
            "error": baseline.error,
            "measurement": truncate(baseline.measurement.value(), 3),
        },
        "session": {
            "steps": report.steps,
            "episodes": report.episodes,
            "trials": report.trials,
            "total_reward": truncate(report.total_reward, 3),
            "elapsed_s": truncate(report.elapsed.as_secs_f64(), 3),
            "timed_out": report.timed_out,
        },
    });

    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(&json)?.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Configuration;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn report() -> SessionReport {
        let mut best = Configuration::new();
        best.insert("work_mem".to_string(), "64MB".to_string());
        SessionReport {
            steps: 20,
            episodes: 2,
            total_reward: 123.4567,
            trials: 4,
            best_reward: 42.12345,
            best_configuration: best,
            elapsed: Duration::from_millis(1500),
            timed_out: false,
        }
    }

    #[test]
    fn test_write_best_json() {
        let file = NamedTempFile::new().unwrap();
        write_best_json(&report(), &Metrics::time(1000.0), file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["configuration"]["work_mem"], "64MB");
        assert_eq!(value["reward"], 42.123);
        assert_eq!(value["session"]["episodes"], 2);
    }

    #[test]
    fn test_write_trials_csv() {
        let mut config = Configuration::new();
        config.insert("a".to_string(), "1".to_string());
        config.insert("b".to_string(), "on".to_string());
        let trials = vec![TrialRecord {
            trial: 1,
            configuration: config,
            metrics: Metrics::time(800.0),
            reward: 200.0,
        }];

        let file = NamedTempFile::new().unwrap();
        write_trials_csv(&trials, file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("trial,configuration,error,measurement,reward"));
        assert_eq!(lines.next(), Some("1,a=1;b=on,false,800.000,200.000"));
    }

    #[test]
    fn test_write_decisions_csv() {
        let records = vec![DecisionRecord {
            episode: 0,
            parameter: "x".to_string(),
            recommendation: "100MB".to_string(),
            inferred_type: "Absolute value".to_string(),
            recommended_value: "100 MB".to_string(),
            factor: 1.0,
            value: "100MB".to_string(),
            weight: None,
            accepted: false,
            assignment_reward: -10.0,
            performance_reward: 0.0,
        }];

        let file = NamedTempFile::new().unwrap();
        write_decisions_csv(&records, file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(content.starts_with("episode,parameter,recommendation"));
        assert!(content.contains("x,100MB,Absolute value,100 MB,1.0,100MB,,false,-10.0,0.0"));
    }
}
