pub mod assignment;
pub mod hint;
pub mod metrics;

pub use assignment::{Assignment, Configuration, WeightedAssignments};
pub use hint::{decompose_value, is_numerical, Hint, HintType};
pub use metrics::{Measurement, Metrics, Objective};
