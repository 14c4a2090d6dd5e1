use thiserror::Error;

#[derive(Debug, Error)]
pub enum TunerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid hint for {parameter}: {reason}")]
    InvalidHint { parameter: String, reason: String },

    #[error("Invalid action {action} (expected 0..{limit})")]
    InvalidAction { action: usize, limit: usize },

    #[error("Unknown objective: {0}")]
    UnknownObjective(String),

    #[error("Unknown hint order: {0}")]
    UnknownHintOrder(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No tuning hints available")]
    NoHints,
}

pub type Result<T> = std::result::Result<T, TunerError>;
