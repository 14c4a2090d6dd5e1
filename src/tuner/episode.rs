use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, TunerError};
use crate::models::{Configuration, Hint, HintType, WeightedAssignments};
use crate::search::Explorer;
use crate::service::{Benchmark, Dbms};
use crate::tuner::config::{Hardware, SessionConfig};

/// Number of discrete actions per decision.
pub const ACTION_COUNT: usize = 5;

/// Multipliers applied to the recommended value.
pub const FACTORS: [f64; ACTION_COUNT] = [0.25, 0.5, 1.0, 2.0, 4.0];

/// Importance weights of accepted assignments.
pub const WEIGHTS: [f64; ACTION_COUNT] = [1.0, 2.0, 4.0, 8.0, 16.0];

/// Reward for an assignment the system accepts, before scaling.
pub const ASSIGNMENT_REWARD: f64 = 10.0;

/// Reward for an assignment the system rejects.
pub const REJECTED_REWARD: f64 = -10.0;

/// The decision the agent makes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DecisionType {
    PickFactor,
    PickWeight,
}

impl DecisionType {
    fn index(self) -> usize {
        match self {
            DecisionType::PickFactor => 0,
            DecisionType::PickWeight => 1,
        }
    }
}

/// What the agent sees before each decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub document_id: usize,
    pub hint_index: usize,
    pub decision: DecisionType,
    /// Document, hint position and decision, each scaled into `[0, 1)`.
    pub features: [f64; 3],
}

/// Result of one action.
#[derive(Debug, Clone)]
pub struct Step {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
}

/// One fully processed hint.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionRecord {
    pub episode: usize,
    pub parameter: String,
    pub recommendation: String,
    pub inferred_type: String,
    pub recommended_value: String,
    pub factor: f64,
    pub value: String,
    /// Weight added to the assignment, empty when rejected.
    pub weight: Option<f64>,
    pub accepted: bool,
    pub assignment_reward: f64,
    pub performance_reward: f64,
}

/// Outcome of a finished episode.
#[derive(Debug, Clone)]
pub struct EpisodeSummary {
    pub assignments: WeightedAssignments,
    pub reward: f64,
    pub configuration: Configuration,
}

/// Settings fixed for all episodes of a session.
#[derive(Debug, Clone, Copy)]
pub struct EpisodeSettings {
    pub hardware: Hardware,
    /// `None` processes every hint before ending an episode.
    pub hints_per_episode: Option<usize>,
    pub max_evals: usize,
    pub performance_scale: f64,
    pub assignment_scale: f64,
}

impl From<&SessionConfig> for EpisodeSettings {
    fn from(config: &SessionConfig) -> Self {
        Self {
            hardware: config.hardware,
            hints_per_episode: config.hints_per_episode,
            max_evals: config.max_evals,
            performance_scale: config.performance_scale,
            assignment_scale: config.assignment_scale,
        }
    }
}

/// Base value of a hint before scaling.
pub fn base_value(hint: &Hint, hardware: &Hardware) -> f64 {
    match hint.hint_type {
        HintType::DiskRatio => hardware.disk * hint.value,
        HintType::RamRatio => hardware.memory * hint.value,
        HintType::CoresRatio => hardware.cores * hint.value,
        HintType::Absolute => hint.value,
    }
}

/// Candidate value text: scaled base rounded half to even, followed by the hint's unit.
pub fn candidate_value(base: f64, factor: f64, unit: &str) -> String {
    format!("{}{}", (base * factor).round_ties_even() as i64, unit)
}

/// Per-episode decision state. Created fresh for every episode.
#[derive(Debug, Clone)]
pub struct TuningEpisode {
    decision: DecisionType,
    base: f64,
    factor: f64,
    assignments: WeightedAssignments,
    hints_done: usize,
}

impl Default for TuningEpisode {
    fn default() -> Self {
        Self::new()
    }
}

impl TuningEpisode {
    pub fn new() -> Self {
        Self {
            decision: DecisionType::PickFactor,
            base: 0.0,
            factor: 1.0,
            assignments: WeightedAssignments::new(),
            hints_done: 0,
        }
    }

    pub fn decision(&self) -> DecisionType {
        self.decision
    }

    pub fn assignments(&self) -> &WeightedAssignments {
        &self.assignments
    }

    /// Hints fully processed in this episode.
    pub fn hints_done(&self) -> usize {
        self.hints_done
    }

    fn pick_factor(&mut self, hint: &Hint, action: usize, hardware: &Hardware) {
        self.base = base_value(hint, hardware);
        self.factor = FACTORS[action];
        self.decision = DecisionType::PickWeight;
        debug!(hint = %hint.summary(), base = self.base, factor = self.factor, "picked factor");
    }

    /// Finish the hint and return the assignment reward and its record.
    fn pick_weight(
        &mut self,
        hint: &Hint,
        action: usize,
        dbms: &mut dyn Dbms,
        settings: &EpisodeSettings,
        episode: usize,
    ) -> (f64, DecisionRecord) {
        let value = candidate_value(self.base, self.factor, &hint.unit);
        let accepted = dbms.can_set(&hint.parameter, &value);

        let (reward, weight) = if accepted {
            let weight = WEIGHTS[action];
            self.assignments.add(&hint.parameter, &value, weight);
            debug!(parameter = %hint.parameter, value = %value, weight, "assignment accepted");
            (ASSIGNMENT_REWARD * settings.assignment_scale, Some(weight))
        } else {
            debug!(parameter = %hint.parameter, value = %value, "assignment rejected");
            (REJECTED_REWARD, None)
        };

        let record = DecisionRecord {
            episode,
            parameter: hint.parameter.clone(),
            recommendation: hint.raw_value.clone(),
            inferred_type: hint.hint_type.to_string(),
            recommended_value: format!("{} {}", self.base, hint.unit).trim_end().to_string(),
            factor: self.factor,
            value,
            weight,
            accepted,
            assignment_reward: reward,
            performance_reward: 0.0,
        };

        self.decision = DecisionType::PickFactor;
        self.hints_done += 1;
        (reward, record)
    }
}

/// Session-lived decision process over an ordered hint list.
///
/// An agent drives it one action at a time. Each hint takes two decisions:
/// a scale factor for the recommended value, then an importance weight.
/// Accepted assignments accumulate in the current [`TuningEpisode`]; at the
/// end of an episode the [`Explorer`] tries the most promising configurations
/// and its reward is added to the last step.
///
/// Hints are read cyclically: the cursor survives episode boundaries and
/// restarts at the first hint after the last one.
pub struct TuningEnv<D: Dbms, B: Benchmark> {
    hints: Vec<Hint>,
    explorer: Explorer<D, B>,
    settings: EpisodeSettings,
    nr_docs: usize,
    cursor: usize,
    episode: TuningEpisode,
    episodes_done: usize,
    last_episode: Option<EpisodeSummary>,
    log: Vec<DecisionRecord>,
}

impl<D: Dbms, B: Benchmark> TuningEnv<D, B> {
    pub fn new(hints: Vec<Hint>, explorer: Explorer<D, B>, settings: EpisodeSettings) -> Result<Self> {
        if hints.is_empty() {
            return Err(TunerError::NoHints);
        }
        if settings.hints_per_episode == Some(0) {
            return Err(TunerError::InvalidConfig(
                "hints_per_episode must be positive".to_string(),
            ));
        }
        let nr_docs = hints.iter().map(|h| h.document_id).max().unwrap_or(0) + 1;
        for (i, hint) in hints.iter().enumerate() {
            debug!(index = i, hint = %hint.summary(), "hint considered");
        }

        Ok(Self {
            hints,
            explorer,
            settings,
            nr_docs,
            cursor: 0,
            episode: TuningEpisode::new(),
            episodes_done: 0,
            last_episode: None,
            log: Vec::new(),
        })
    }

    /// Start a new episode at the current hint and return the first observation.
    pub fn reset(&mut self) -> Observation {
        self.episode = TuningEpisode::new();
        self.explorer.benchmark().log_stats();
        self.observe()
    }

    /// Apply one action to the current decision.
    ///
    /// The reward of the step that ends an episode includes the scaled
    /// reward of the configurations tried by the explorer.
    pub fn step(&mut self, action: usize) -> Result<Step> {
        if action >= ACTION_COUNT {
            return Err(TunerError::InvalidAction {
                action,
                limit: ACTION_COUNT,
            });
        }

        let hint = &self.hints[self.cursor];
        let mut reward = 0.0;
        let mut done = false;

        match self.episode.decision() {
            DecisionType::PickFactor => {
                self.episode.pick_factor(hint, action, &self.settings.hardware);
            }
            DecisionType::PickWeight => {
                let (assignment_reward, record) = self.episode.pick_weight(
                    hint,
                    action,
                    self.explorer.dbms_mut(),
                    &self.settings,
                    self.episodes_done,
                );
                reward = assignment_reward;
                self.log.push(record);

                self.cursor += 1;
                let wrapped = self.cursor >= self.hints.len();
                if wrapped {
                    self.cursor = 0;
                }
                let limit = self.settings.hints_per_episode.unwrap_or(self.hints.len());
                done = wrapped || self.episode.hints_done() >= limit;
            }
        }

        if done {
            reward += self.finish_episode();
        }

        Ok(Step {
            observation: self.observe(),
            reward,
            done,
        })
    }

    /// Explore the accumulated assignments and start a fresh episode.
    fn finish_episode(&mut self) -> f64 {
        let finished = std::mem::take(&mut self.episode);
        let (reward, configuration) = self
            .explorer
            .explore(finished.assignments(), self.settings.max_evals);
        let scaled = reward * self.settings.performance_scale;

        if let Some(record) = self.log.last_mut() {
            record.performance_reward = scaled;
        }
        info!(
            episode = self.episodes_done,
            reward,
            config = ?configuration,
            "episode finished"
        );

        self.episodes_done += 1;
        self.last_episode = Some(EpisodeSummary {
            assignments: finished.assignments,
            reward,
            configuration,
        });
        scaled
    }

    pub fn observe(&self) -> Observation {
        let hint = &self.hints[self.cursor];
        let decision = self.episode.decision();
        Observation {
            document_id: hint.document_id,
            hint_index: self.cursor,
            decision,
            features: [
                hint.document_id as f64 / self.nr_docs as f64,
                self.cursor as f64 / self.hints.len() as f64,
                decision.index() as f64 / 3.0,
            ],
        }
    }

    pub fn episode(&self) -> &TuningEpisode {
        &self.episode
    }

    pub fn episodes_done(&self) -> usize {
        self.episodes_done
    }

    pub fn last_episode(&self) -> Option<&EpisodeSummary> {
        self.last_episode.as_ref()
    }

    /// Every processed hint of the session, in order.
    pub fn decision_log(&self) -> &[DecisionRecord] {
        &self.log
    }

    pub fn explorer(&self) -> &Explorer<D, B> {
        &self.explorer
    }

    pub fn nr_hints(&self) -> usize {
        self.hints.len()
    }
}
