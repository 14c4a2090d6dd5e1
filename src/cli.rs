use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// hint-tuner: tune a configurable system from parameter hints found in documents.
#[derive(Parser, Debug)]
#[command(name = "hint-tuner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log per-step decisions.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print hints in processing order.
    Hints {
        /// Hint CSV file.
        #[arg(short, long, default_value = "hints.csv")]
        file: PathBuf,

        /// Hint order: document, by_parameter or by_stride.
        #[arg(long, default_value = "by_stride")]
        order: String,
    },

    /// Run a tuning session against a simulated service.
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Hint CSV file.
    #[arg(long, default_value = "hints.csv")]
    pub hints: PathBuf,

    /// Simulation model JSON file.
    #[arg(long, default_value = "model.json")]
    pub model: PathBuf,

    /// Session configuration JSON file. Defaults apply when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Agent choosing the actions.
    #[arg(long, value_enum, default_value_t = AgentKind::Greedy)]
    pub agent: AgentKind,

    /// Hint order, overrides the configuration file.
    #[arg(long)]
    pub order: Option<String>,

    /// Step limit, overrides the configuration file.
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Timeout in seconds, overrides the configuration file.
    #[arg(long)]
    pub timeout: Option<f64>,

    /// Random seed, overrides the configuration file.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output CSV file for all trials
    #[arg(long, default_value = "trials.csv")]
    pub trials_csv: PathBuf,

    /// Output CSV file for the decision log
    #[arg(long, default_value = "decisions.csv")]
    pub decisions_csv: PathBuf,

    /// Output JSON file for the best configuration
    #[arg(long, default_value = "best.json")]
    pub json: PathBuf,

    /// Number of top trials to display
    #[arg(long, default_value = "5")]
    pub topk: usize,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    /// Uniformly random actions.
    Random,
    /// Recommended values as they are, medium weight.
    Fixed,
    /// Epsilon-greedy over episode returns.
    Greedy,
}
