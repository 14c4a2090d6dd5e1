pub mod cli;
pub mod error;
pub mod hints;
pub mod interface;
pub mod models;
pub mod search;
pub mod service;
pub mod tuner;

pub use error::{Result, TunerError};
pub use models::{Hint, HintType, Metrics, Objective};
