use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::tuner::episode::{DecisionType, Observation, ACTION_COUNT};

/// Chooses discrete actions for a tuning environment.
pub trait Agent {
    fn act(&mut self, observation: &Observation) -> usize;

    /// Feedback for the last action.
    fn observe(&mut self, _reward: f64, _done: bool) {}
}

/// Uniformly random actions.
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn act(&mut self, _observation: &Observation) -> usize {
        self.rng.gen_range(0..ACTION_COUNT)
    }
}

/// Always the same factor and weight.
#[derive(Debug, Clone, Copy)]
pub struct FixedAgent {
    pub factor_action: usize,
    pub weight_action: usize,
}

impl Default for FixedAgent {
    /// Take recommendations as they are, with medium weight.
    fn default() -> Self {
        Self {
            factor_action: 2,
            weight_action: 2,
        }
    }
}

impl Agent for FixedAgent {
    fn act(&mut self, observation: &Observation) -> usize {
        match observation.decision {
            DecisionType::PickFactor => self.factor_action,
            DecisionType::PickWeight => self.weight_action,
        }
    }
}

type StateKey = (usize, DecisionType);

/// Tabular epsilon-greedy agent with Monte-Carlo episode returns.
///
/// Each action taken during an episode is credited with the return from
/// that step to the end of the episode, averaged over all visits.
pub struct EpsilonGreedyAgent {
    rng: StdRng,
    epsilon: f64,
    values: HashMap<StateKey, [(f64, u32); ACTION_COUNT]>,
    trajectory: Vec<(StateKey, usize, f64)>,
    pending: Option<(StateKey, usize)>,
}

impl EpsilonGreedyAgent {
    pub fn new(seed: u64, epsilon: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            epsilon,
            values: HashMap::new(),
            trajectory: Vec::new(),
            pending: None,
        }
    }

    /// Average return of an action in a state, if it was ever taken.
    pub fn value(&self, hint_index: usize, decision: DecisionType, action: usize) -> Option<f64> {
        let (total, visits) = self.values.get(&(hint_index, decision))?.get(action).copied()?;
        (visits > 0).then(|| total / visits as f64)
    }

    fn greedy(&self, key: &StateKey) -> Option<usize> {
        let entries = self.values.get(key)?;
        entries
            .iter()
            .enumerate()
            .filter(|(_, (_, visits))| *visits > 0)
            .map(|(action, (total, visits))| (action, total / *visits as f64))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(action, _)| action)
    }

    fn credit_episode(&mut self) {
        let mut ret = 0.0;
        for (key, action, reward) in self.trajectory.drain(..).rev() {
            ret += reward;
            let entry = &mut self.values.entry(key).or_insert([(0.0, 0); ACTION_COUNT])[action];
            entry.0 += ret;
            entry.1 += 1;
        }
    }
}

impl Agent for EpsilonGreedyAgent {
    fn act(&mut self, observation: &Observation) -> usize {
        let key = (observation.hint_index, observation.decision);
        let explore = self.rng.gen_bool(self.epsilon);
        let action = match (explore, self.greedy(&key)) {
            (false, Some(best)) => best,
            _ => self.rng.gen_range(0..ACTION_COUNT),
        };
        self.pending = Some((key, action));
        action
    }

    fn observe(&mut self, reward: f64, done: bool) {
        if let Some((key, action)) = self.pending.take() {
            self.trajectory.push((key, action, reward));
        }
        if done {
            self.credit_episode();
        }
    }
}
