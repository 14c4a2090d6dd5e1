pub mod constants;
pub mod distance;
pub mod explorer;
pub mod reward;
pub mod selection;

pub use constants::*;
pub use distance::{distance, min_distance};
pub use explorer::{Explorer, TrialRecord};
pub use reward::calculate_reward;
pub use selection::select_configs;
