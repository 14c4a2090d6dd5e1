use std::path::Path;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use hint_tuner::cli::{AgentKind, Cli, Command, RunArgs};
use hint_tuner::error::{Result, TunerError};
use hint_tuner::hints::{filter_known, load_hints, HintCollection, HintOrder};
use hint_tuner::interface::{display_hints, display_report, display_top_trials};
use hint_tuner::search::Explorer;
use hint_tuner::service::{load_model, SimulatedBenchmark, SimulatedDbms};
use hint_tuner::tuner::{
    load_config, run_session, write_best_json, write_decisions_csv, write_trials_csv, Agent,
    EpisodeSettings, EpsilonGreedyAgent, FixedAgent, RandomAgent, SessionConfig, SessionLimits,
    TuningEnv,
};

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Hints { file, order } => cmd_hints(&file, &order),
        Command::Run(args) => cmd_run(&args),
    }
}

/// Print the hints of a file in processing order.
fn cmd_hints(file: &Path, order: &str) -> Result<()> {
    let order: HintOrder = order.parse()?;
    let collection = HintCollection::new(load_hints(file)?);
    if collection.is_empty() {
        println!("No hints in {:?}", file);
        return Ok(());
    }

    for (param, count) in collection.parameter_counts() {
        info!(parameter = %param, documents = count, "parameter frequency");
    }
    display_hints(&collection.ordered(order), &format!("Hints ({})", order));
    Ok(())
}

/// Tune the simulated service with the hints of a file.
fn cmd_run(args: &RunArgs) -> Result<()> {
    let model = load_model(&args.model)?;
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SessionConfig {
            objective: model.objective,
            ..SessionConfig::default()
        },
    };
    let config = apply_overrides(config, args)?;
    if config.objective != model.objective {
        return Err(TunerError::InvalidConfig(format!(
            "objective {} does not match the service model ({})",
            config.objective, model.objective
        )));
    }

    let dbms = SimulatedDbms::new(model.clone());
    let benchmark = SimulatedBenchmark::new(model);

    let hints = filter_known(load_hints(&args.hints)?, &dbms);
    let collection = HintCollection::new(hints);
    info!(count = collection.len(), order = %config.hint_order, "hints ready");
    let ordered = collection.ordered(config.hint_order);

    let explorer = Explorer::new(dbms, benchmark, config.objective);
    let mut env = TuningEnv::new(ordered, explorer, EpisodeSettings::from(&config))?;

    let mut agent: Box<dyn Agent> = match args.agent {
        AgentKind::Random => Box::new(RandomAgent::new(config.seed)),
        AgentKind::Fixed => Box::new(FixedAgent::default()),
        AgentKind::Greedy => Box::new(EpsilonGreedyAgent::new(config.seed, config.epsilon)),
    };
    let limits = SessionLimits {
        max_steps: config.max_steps,
        timeout: config.timeout()?,
    };

    let report = run_session(&mut env, agent.as_mut(), &limits)?;
    let explorer = env.explorer();

    display_top_trials(explorer.history(), args.topk);
    display_report(&report, explorer.baseline());

    write_trials_csv(explorer.history(), &args.trials_csv)?;
    println!("Trials written to {:?}", args.trials_csv);
    write_decisions_csv(env.decision_log(), &args.decisions_csv)?;
    println!("Decision log written to {:?}", args.decisions_csv);
    write_best_json(&report, explorer.baseline(), &args.json)?;
    println!("Best configuration written to {:?}", args.json);

    Ok(())
}

fn apply_overrides(mut config: SessionConfig, args: &RunArgs) -> Result<SessionConfig> {
    if let Some(order) = &args.order {
        config.hint_order = order.parse()?;
    }
    if let Some(max_steps) = args.max_steps {
        config.max_steps = max_steps;
    }
    if let Some(timeout) = args.timeout {
        config.timeout_s = Some(timeout);
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate()?;
    Ok(config)
}
