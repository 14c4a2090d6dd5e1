use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TunerError};

/// How the recommended value of a hint relates to the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintType {
    /// Fraction of the disk size.
    DiskRatio,
    /// Fraction of main memory.
    RamRatio,
    /// Fraction of the number of cores.
    CoresRatio,
    /// Value to use as is.
    Absolute,
}

impl fmt::Display for HintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HintType::DiskRatio => "Relative (disk)",
            HintType::RamRatio => "Relative (RAM)",
            HintType::CoresRatio => "Relative (cores)",
            HintType::Absolute => "Absolute value",
        };
        f.write_str(label)
    }
}

/// A candidate parameter assignment mined from a tuning document.
///
/// The raw value is decomposed into magnitude and unit once, at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Hint {
    pub document_id: usize,
    pub parameter: String,
    pub raw_value: String,
    pub value: f64,
    pub unit: String,
    pub hint_type: HintType,
    pub passage: String,
}

impl Hint {
    pub fn new(
        document_id: usize,
        parameter: impl Into<String>,
        raw_value: impl Into<String>,
        hint_type: HintType,
        passage: impl Into<String>,
    ) -> Result<Self> {
        let parameter = parameter.into();
        let raw_value = raw_value.into();
        let (value, unit) =
            decompose_value(&raw_value).ok_or_else(|| TunerError::InvalidHint {
                parameter: parameter.clone(),
                reason: format!("'{}' is not numerical", raw_value),
            })?;

        Ok(Self {
            document_id,
            parameter,
            raw_value,
            value,
            unit,
            hint_type,
            passage: passage.into(),
        })
    }

    /// Short description for logs: `parameter -> raw value`.
    pub fn summary(&self) -> String {
        format!("{} -> {}", self.parameter, self.raw_value)
    }
}

/// Number followed by either `%` or a unit of word characters, anchored.
static NUMERICAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<magnitude>\d+(?:\.\d+)?)(?P<unit>%|\w*)$").expect("Invalid value regex")
});

/// True iff the value is a number, optionally followed by a unit or `%`.
pub fn is_numerical(value: &str) -> bool {
    NUMERICAL_REGEX.is_match(value)
}

/// Decompose a value into its magnitude and unit.
///
/// Percentages become fractions with an empty unit (`25%` -> `(0.25, "")`).
/// Otherwise the unit is the run of word characters after the magnitude,
/// up to (excluding) the end of the text. Returns `None` for non-numerical
/// values and for magnitudes written in non-ASCII digits.
pub fn decompose_value(value: &str) -> Option<(f64, String)> {
    let caps = NUMERICAL_REGEX.captures(value)?;
    let magnitude: f64 = caps["magnitude"].parse().ok()?;

    match &caps["unit"] {
        "%" => Some((magnitude / 100.0, String::new())),
        unit => Some((magnitude, unit.to_string())),
    }
}
