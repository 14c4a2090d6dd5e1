use std::collections::BTreeMap;

use hint_tuner::error::TunerError;
use hint_tuner::models::{Configuration, Hint, HintType, Metrics, Objective};
use hint_tuner::search::Explorer;
use hint_tuner::service::{Benchmark, Dbms};
use hint_tuner::tuner::{
    DecisionType, EpisodeSettings, Hardware, TuningEnv, ASSIGNMENT_REWARD, REJECTED_REWARD,
};

/// Knows `x` and `y`; refuses any value listed in `refused`.
#[derive(Default)]
struct TableDbms {
    pending: BTreeMap<String, String>,
    committed: Configuration,
    refused: Vec<String>,
}

impl Dbms for TableDbms {
    fn reset_to_defaults(&mut self) {
        self.pending.clear();
    }

    fn apply(&mut self, parameter: &str, value: &str) -> bool {
        if !self.is_parameter(parameter) || self.refused.iter().any(|v| v == value) {
            return false;
        }
        self.pending.insert(parameter.to_string(), value.to_string());
        true
    }

    fn commit_changes(&mut self) -> bool {
        self.committed = self.pending.clone();
        true
    }

    fn current_value(&self, parameter: &str) -> Option<String> {
        if !self.is_parameter(parameter) {
            return None;
        }
        Some(self.pending.get(parameter).cloned().unwrap_or_else(|| "0".to_string()))
    }

    fn list_parameters(&self) -> Vec<String> {
        vec!["x".to_string(), "y".to_string()]
    }

    fn changed_parameters(&self) -> Configuration {
        self.committed.clone()
    }
}

/// 1000 ms with defaults, 800 ms once anything is changed.
struct ChangeBenchmark;

impl Benchmark for ChangeBenchmark {
    fn evaluate(&mut self, dbms: &mut dyn Dbms) -> Metrics {
        if dbms.changed_parameters().is_empty() {
            Metrics::time(1000.0)
        } else {
            Metrics::time(800.0)
        }
    }
}

fn settings(hints_per_episode: Option<usize>) -> EpisodeSettings {
    EpisodeSettings {
        hardware: Hardware::default(),
        hints_per_episode,
        max_evals: 2,
        performance_scale: 1.0,
        assignment_scale: 1.0,
    }
}

fn env_with(
    hints: Vec<Hint>,
    dbms: TableDbms,
    hints_per_episode: Option<usize>,
) -> TuningEnv<TableDbms, ChangeBenchmark> {
    env_with_settings(hints, dbms, settings(hints_per_episode))
}

fn env_with_settings(
    hints: Vec<Hint>,
    dbms: TableDbms,
    settings: EpisodeSettings,
) -> TuningEnv<TableDbms, ChangeBenchmark> {
    let explorer = Explorer::new(dbms, ChangeBenchmark, Objective::Time);
    TuningEnv::new(hints, explorer, settings).unwrap()
}

fn absolute(doc: usize, param: &str, value: &str) -> Hint {
    Hint::new(doc, param, value, HintType::Absolute, "").unwrap()
}

#[test]
fn test_single_hint_episode() {
    let mut env = env_with(vec![absolute(0, "x", "100MB")], TableDbms::default(), Some(10));

    let obs = env.reset();
    assert_eq!(obs.decision, DecisionType::PickFactor);
    assert_eq!(obs.hint_index, 0);

    // Factor 1
    let step = env.step(2).unwrap();
    assert_eq!(step.reward, 0.0);
    assert!(!step.done);
    assert_eq!(step.observation.decision, DecisionType::PickWeight);

    // Weight 2
    let step = env.step(1).unwrap();
    assert!(step.done);
    assert_eq!(step.reward, ASSIGNMENT_REWARD + 200.0);

    let episode = env.last_episode().unwrap();
    assert_eq!(episode.assignments.len(), 1);
    assert_eq!(episode.assignments.weight("x", "100MB"), Some(2.0));
    assert_eq!(episode.reward, 200.0);
    assert_eq!(episode.configuration.get("x").unwrap(), "100MB");

    // One distinct candidate, so a single trial
    assert_eq!(env.explorer().history().len(), 1);

    let log = env.decision_log();
    assert_eq!(log.len(), 1);
    assert!(log[0].accepted);
    assert_eq!(log[0].value, "100MB");
    assert_eq!(log[0].weight, Some(2.0));
    assert_eq!(log[0].performance_reward, 200.0);
}

#[test]
fn test_rejected_assignment() {
    let dbms = TableDbms {
        refused: vec!["100MB".to_string(), "'100MB'".to_string()],
        ..TableDbms::default()
    };
    let mut env = env_with(vec![absolute(0, "x", "100MB")], dbms, None);

    env.reset();
    env.step(2).unwrap();
    let step = env.step(4).unwrap();

    assert!(step.done);
    assert_eq!(step.reward, -10.0);
    assert!(env.last_episode().unwrap().assignments.is_empty());
    assert!(env.explorer().history().is_empty());
    assert!(!env.decision_log()[0].accepted);
    assert_eq!(env.decision_log()[0].weight, None);
}

#[test]
fn test_reward_scales() {
    let scaled = EpisodeSettings {
        assignment_scale: 2.0,
        performance_scale: 0.5,
        ..settings(None)
    };
    let mut env = env_with_settings(vec![absolute(0, "x", "100MB")], TableDbms::default(), scaled);

    env.reset();
    assert_eq!(env.step(2).unwrap().reward, 0.0);
    let step = env.step(1).unwrap();
    assert!(step.done);
    // 2 * 10 for the assignment plus 0.5 * 200 from the trial
    assert_eq!(step.reward, 20.0 + 100.0);

    // The episode keeps the raw explorer reward, the log the scaled one
    assert_eq!(env.last_episode().unwrap().reward, 200.0);
    assert_eq!(env.decision_log()[0].assignment_reward, 20.0);
    assert_eq!(env.decision_log()[0].performance_reward, 100.0);
}

#[test]
fn test_rejected_reward_is_not_scaled() {
    let dbms = TableDbms {
        refused: vec!["100MB".to_string(), "'100MB'".to_string()],
        ..TableDbms::default()
    };
    let scaled = EpisodeSettings {
        assignment_scale: 2.0,
        performance_scale: 0.5,
        ..settings(None)
    };
    let mut env = env_with_settings(vec![absolute(0, "x", "100MB")], dbms, scaled);

    env.reset();
    env.step(2).unwrap();
    let step = env.step(1).unwrap();
    assert!(step.done);
    assert_eq!(step.reward, REJECTED_REWARD);
}

#[test]
fn test_weights_accumulate_within_episode() {
    let hints = vec![absolute(0, "x", "100MB"), absolute(1, "x", "50MB")];
    let mut env = env_with(hints, TableDbms::default(), None);

    env.reset();
    // 100MB with factor 1, weight 2
    env.step(2).unwrap();
    env.step(1).unwrap();
    // 50MB with factor 2 is again 100MB, weight 4
    env.step(3).unwrap();
    assert_eq!(env.episode().hints_done(), 1);
    assert_eq!(env.episode().assignments().weight("x", "100MB"), Some(2.0));
    let step = env.step(2).unwrap();
    assert!(step.done);

    let assignments = &env.last_episode().unwrap().assignments;
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments.weight("x", "100MB"), Some(6.0));
}

#[test]
fn test_relative_hints_use_hardware() {
    let hardware = EpisodeSettings {
        hardware: Hardware {
            memory: 1000.0,
            disk: 5000.0,
            cores: 16.0,
        },
        ..settings(None)
    };
    let hints = vec![
        Hint::new(0, "x", "25%", HintType::RamRatio, "").unwrap(),
        Hint::new(0, "y", "10%", HintType::DiskRatio, "").unwrap(),
        Hint::new(1, "x", "50%", HintType::CoresRatio, "").unwrap(),
    ];
    let mut env = env_with_settings(hints, TableDbms::default(), hardware);

    env.reset();
    for _ in 0..3 {
        env.step(2).unwrap();
        env.step(0).unwrap();
    }

    let assignments = &env.last_episode().unwrap().assignments;
    assert_eq!(assignments.weight("x", "250"), Some(1.0));
    assert_eq!(assignments.weight("y", "500"), Some(1.0));
    assert_eq!(assignments.weight("x", "8"), Some(1.0));
    let values: Vec<&str> = env.decision_log().iter().map(|r| r.value.as_str()).collect();
    assert_eq!(values, vec!["250", "500", "8"]);
}

#[test]
fn test_factor_scales_candidate() {
    let mut env = env_with(vec![absolute(0, "x", "100MB")], TableDbms::default(), None);

    env.reset();
    env.step(0).unwrap();
    env.step(0).unwrap();

    let episode = env.last_episode().unwrap();
    assert_eq!(episode.assignments.weight("x", "25MB"), Some(1.0));
}

#[test]
fn test_invalid_action_keeps_state() {
    let mut env = env_with(vec![absolute(0, "x", "1")], TableDbms::default(), None);

    let before = env.reset();
    let err = env.step(5).unwrap_err();
    assert!(matches!(err, TunerError::InvalidAction { action: 5, .. }));
    assert_eq!(env.observe(), before);
    assert!(env.decision_log().is_empty());
}

#[test]
fn test_hints_are_read_cyclically() {
    let hints = vec![
        absolute(0, "x", "1"),
        absolute(1, "y", "2"),
        absolute(2, "x", "3"),
    ];
    let mut env = env_with(hints, TableDbms::default(), Some(2));

    env.reset();
    let mut done_after = Vec::new();
    for hint in 0..3 {
        env.step(2).unwrap();
        let step = env.step(0).unwrap();
        if step.done {
            done_after.push(hint);
            env.reset();
        }
    }

    // Two hints per episode, then the wrap ends the second one early
    assert_eq!(done_after, vec![1, 2]);
    assert_eq!(env.episodes_done(), 2);
    assert_eq!(env.observe().hint_index, 0);
}

#[test]
fn test_observation_features() {
    let hints = vec![absolute(0, "x", "1"), absolute(3, "y", "2")];
    let mut env = env_with(hints, TableDbms::default(), None);

    env.reset();
    env.step(2).unwrap();
    env.step(2).unwrap();
    env.step(2).unwrap();
    let obs = env.observe();

    assert_eq!(obs.document_id, 3);
    assert_eq!(obs.decision, DecisionType::PickWeight);
    assert_eq!(obs.features, [0.75, 0.5, 1.0 / 3.0]);
}

#[test]
fn test_rejects_empty_hint_list() {
    let explorer = Explorer::new(TableDbms::default(), ChangeBenchmark, Objective::Time);
    assert!(matches!(
        TuningEnv::new(Vec::new(), explorer, settings(None)),
        Err(TunerError::NoHints)
    ));
}
