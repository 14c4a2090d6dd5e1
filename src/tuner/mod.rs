pub mod agent;
pub mod config;
pub mod episode;
pub mod output;
pub mod session;

pub use agent::{Agent, EpsilonGreedyAgent, FixedAgent, RandomAgent};
pub use config::{load_config, Hardware, SessionConfig};
pub use episode::{
    DecisionRecord, DecisionType, EpisodeSettings, EpisodeSummary, Observation, Step,
    TuningEnv, TuningEpisode, ACTION_COUNT, ASSIGNMENT_REWARD, FACTORS, REJECTED_REWARD, WEIGHTS,
};
pub use output::{write_best_json, write_decisions_csv, write_trials_csv};
pub use session::{run_session, SessionLimits, SessionReport};
