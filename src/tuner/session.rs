use std::time::{Duration, Instant};

use tracing::info;

use crate::error::Result;
use crate::models::Configuration;
use crate::service::{Benchmark, Dbms};
use crate::tuner::agent::Agent;
use crate::tuner::episode::TuningEnv;

/// When to stop driving the environment.
#[derive(Debug, Clone, Copy)]
pub struct SessionLimits {
    pub max_steps: usize,
    /// Checked after every step; a running trial is never interrupted.
    pub timeout: Option<Duration>,
}

/// Summary of a tuning session.
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub steps: usize,
    pub episodes: usize,
    pub total_reward: f64,
    pub trials: usize,
    /// Best improvement over the defaults; zero with an empty configuration
    /// if nothing improved.
    pub best_reward: f64,
    pub best_configuration: Configuration,
    pub elapsed: Duration,
    pub timed_out: bool,
}

/// Let an agent drive the environment until a limit is reached.
pub fn run_session<D, B, A>(
    env: &mut TuningEnv<D, B>,
    agent: &mut A,
    limits: &SessionLimits,
) -> Result<SessionReport>
where
    D: Dbms,
    B: Benchmark,
    A: Agent + ?Sized,
{
    let start = Instant::now();
    let mut observation = env.reset();
    let mut total_reward = 0.0;
    let mut episodes = 0;
    let mut steps = 0;
    let mut timed_out = false;

    info!(
        objective = %env.explorer().objective(),
        max_steps = limits.max_steps,
        timeout = ?limits.timeout,
        "starting session"
    );

    while steps < limits.max_steps {
        let action = agent.act(&observation);
        let step = env.step(action)?;
        agent.observe(step.reward, step.done);
        total_reward += step.reward;
        steps += 1;

        observation = if step.done {
            episodes += 1;
            env.reset()
        } else {
            step.observation
        };

        // Progress every 10%
        if steps % (limits.max_steps / 10).max(1) == 0 {
            let pct = (steps as f64 / limits.max_steps as f64) * 100.0;
            info!(steps, episodes, total_reward, "{:.0}% of step budget used", pct);
        }

        if limits.timeout.is_some_and(|t| start.elapsed() >= t) {
            timed_out = true;
            break;
        }
    }

    let (best_reward, best_configuration) = match env.explorer().session_best() {
        Some((reward, config)) if *reward > 0.0 => (*reward, config.clone()),
        _ => (0.0, Configuration::new()),
    };

    let report = SessionReport {
        steps,
        episodes,
        total_reward,
        trials: env.explorer().history().len(),
        best_reward,
        best_configuration,
        elapsed: start.elapsed(),
        timed_out,
    };
    info!(
        steps = report.steps,
        episodes = report.episodes,
        trials = report.trials,
        best_reward = report.best_reward,
        "session finished"
    );
    Ok(report)
}
