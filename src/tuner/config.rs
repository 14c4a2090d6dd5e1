use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TunerError};
use crate::hints::HintOrder;
use crate::models::Objective;

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Hardware of the tuned machine, used to resolve relative hints.
///
/// Memory and disk are in the base unit of the tuned system (bytes for
/// the simulated service).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hardware {
    pub memory: f64,
    pub disk: f64,
    pub cores: f64,
}

impl Default for Hardware {
    fn default() -> Self {
        Self {
            memory: 8.0 * GIB,
            disk: 100.0 * GIB,
            cores: 8.0,
        }
    }
}

/// Settings for one tuning session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub hardware: Hardware,
    pub objective: Objective,
    pub hint_order: HintOrder,
    /// Hints per episode; `None` means all hints.
    pub hints_per_episode: Option<usize>,
    /// Configurations tried at the end of each episode.
    pub max_evals: usize,
    /// Scale for the end-of-episode performance reward.
    pub performance_scale: f64,
    /// Scale for the reward of an accepted assignment.
    pub assignment_scale: f64,
    /// Wall-clock budget in seconds; `None` means no limit.
    pub timeout_s: Option<f64>,
    pub max_steps: usize,
    pub seed: u64,
    /// Exploration rate of the epsilon-greedy agent.
    pub epsilon: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            hardware: Hardware::default(),
            objective: Objective::Time,
            hint_order: HintOrder::ByStride,
            hints_per_episode: Some(10),
            max_evals: 2,
            performance_scale: 1.0,
            assignment_scale: 1.0,
            timeout_s: None,
            max_steps: 200,
            seed: 123,
            epsilon: 0.2,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.hints_per_episode == Some(0) {
            return Err(TunerError::InvalidConfig(
                "hints_per_episode must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(TunerError::InvalidConfig(format!(
                "epsilon {} outside [0, 1]",
                self.epsilon
            )));
        }
        if !self.performance_scale.is_finite() || !self.assignment_scale.is_finite() {
            return Err(TunerError::InvalidConfig(
                "reward scales must be finite".to_string(),
            ));
        }
        self.timeout()?;
        Ok(())
    }

    /// Wall-clock budget; fails for negative, non-finite or overflowing seconds.
    pub fn timeout(&self) -> Result<Option<Duration>> {
        self.timeout_s
            .map(|t| {
                Duration::try_from_secs_f64(t).map_err(|e| {
                    TunerError::InvalidConfig(format!("timeout_s {}: {}", t, e))
                })
            })
            .transpose()
    }
}

/// Load a session configuration from JSON. Missing fields take defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SessionConfig> {
    let content = fs::read_to_string(path)?;
    let config: SessionConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"objective": "throughput", "hints_per_episode": null, "max_evals": 3}"#)
            .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.objective, Objective::Throughput);
        assert_eq!(config.hints_per_episode, None);
        assert_eq!(config.max_evals, 3);
        assert_eq!(config.hint_order, HintOrder::ByStride);
    }

    #[test]
    fn test_unknown_objective_fails() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"objective": "latency"}"#).unwrap();
        assert!(matches!(load_config(file.path()), Err(TunerError::Json(_))));
    }

    #[test]
    fn test_invalid_values() {
        let config = SessionConfig {
            hints_per_episode: Some(0),
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SessionConfig {
            epsilon: 1.5,
            ..SessionConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_must_be_a_duration() {
        for bad in [f64::INFINITY, f64::NAN, -1.0, 1e30] {
            let config = SessionConfig {
                timeout_s: Some(bad),
                ..SessionConfig::default()
            };
            assert!(matches!(config.validate(), Err(TunerError::InvalidConfig(_))));
            assert!(config.timeout().is_err());
        }

        let config = SessionConfig {
            timeout_s: Some(1.5),
            ..SessionConfig::default()
        };
        assert_eq!(config.timeout().unwrap(), Some(Duration::from_millis(1500)));
        assert_eq!(SessionConfig::default().timeout().unwrap(), None);
    }
}
