/// Distance between two numeric values whose units differ.
pub const UNIT_MISMATCH_DISTANCE: f64 = 1000.0;

/// Distance between two different values that are not both numeric.
pub const INCOMPARABLE_DISTANCE: f64 = 10000.0;

/// Reward for a trial whose benchmark run failed.
pub const ERROR_REWARD: f64 = -10000.0;
