use crate::models::decompose_value;
use crate::search::constants::{INCOMPARABLE_DISTANCE, UNIT_MISMATCH_DISTANCE};

/// Distance between two raw values of the same parameter.
///
/// Numbers with identical units are compared by magnitude. Numbers with
/// different units are incomparable but closer than mismatched non-numeric
/// values.
pub fn distance(value_a: &str, value_b: &str) -> f64 {
    if value_a == value_b {
        return 0.0;
    }
    match (decompose_value(value_a), decompose_value(value_b)) {
        (Some((mag_a, unit_a)), Some((mag_b, unit_b))) => {
            if unit_a == unit_b {
                (mag_a - mag_b).abs()
            } else {
                UNIT_MISMATCH_DISTANCE
            }
        }
        _ => INCOMPARABLE_DISTANCE,
    }
}

/// Smallest distance from a value to any of the reference values.
pub fn min_distance<'a>(value: &str, references: impl IntoIterator<Item = &'a str>) -> f64 {
    references
        .into_iter()
        .map(|r| distance(value, r))
        .fold(f64::INFINITY, f64::min)
}
