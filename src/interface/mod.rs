pub mod render;

pub use render::{display_hints, display_report, display_top_trials};
