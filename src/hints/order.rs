use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TunerError;
use crate::models::Hint;

/// Hints per parameter emitted in one round of the stride order.
pub const HINT_STRIDE: usize = 10;

/// Order in which hints are presented to the tuning episodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintOrder {
    /// Document by document, in document order.
    #[default]
    Document,
    /// All hints of the most frequently mentioned parameter first.
    ByParameter,
    /// Round robin over parameters, `HINT_STRIDE` hints at a time.
    ByStride,
}

impl FromStr for HintOrder {
    type Err = TunerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "document" => Ok(HintOrder::Document),
            "by_parameter" => Ok(HintOrder::ByParameter),
            "by_stride" => Ok(HintOrder::ByStride),
            other => Err(TunerError::UnknownHintOrder(other.to_string())),
        }
    }
}

impl fmt::Display for HintOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HintOrder::Document => "document",
            HintOrder::ByParameter => "by_parameter",
            HintOrder::ByStride => "by_stride",
        };
        f.write_str(name)
    }
}

/// All hints extracted from a document collection.
#[derive(Debug, Clone, Default)]
pub struct HintCollection {
    hints: Vec<Hint>,
}

impl HintCollection {
    pub fn new(hints: Vec<Hint>) -> Self {
        Self { hints }
    }

    pub fn len(&self) -> usize {
        self.hints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }

    /// Hints in the requested order. Deterministic for the same input.
    pub fn ordered(&self, order: HintOrder) -> Vec<Hint> {
        match order {
            HintOrder::Document => self.by_document(),
            HintOrder::ByParameter => self
                .by_parameter()
                .into_iter()
                .flat_map(|(_, hints)| hints)
                .collect(),
            HintOrder::ByStride => self.by_stride(),
        }
    }

    /// Hints grouped by document id (ascending), input order within a document.
    fn by_document(&self) -> Vec<Hint> {
        let mut hints = self.hints.clone();
        hints.sort_by_key(|h| h.document_id);
        hints
    }

    /// Number of distinct documents mentioning each parameter, most frequent first.
    ///
    /// Ties keep the order in which parameters first appear in document order.
    pub fn parameter_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        let mut seen: HashSet<(usize, &str)> = HashSet::new();
        for hint in self.by_document_ref() {
            let first_in_doc = seen.insert((hint.document_id, hint.parameter.as_str()));
            match counts.iter_mut().find(|(p, _)| *p == hint.parameter) {
                Some((_, count)) => {
                    if first_in_doc {
                        *count += 1;
                    }
                }
                None => counts.push((hint.parameter.clone(), 1)),
            }
        }
        // Stable sort keeps first-appearance order among equal counts
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    fn by_document_ref(&self) -> Vec<&Hint> {
        let mut hints: Vec<&Hint> = self.hints.iter().collect();
        hints.sort_by_key(|h| h.document_id);
        hints
    }

    /// Hints per parameter, parameters ordered by document frequency.
    fn by_parameter(&self) -> Vec<(String, Vec<Hint>)> {
        let by_doc = self.by_document_ref();
        self.parameter_counts()
            .into_iter()
            .map(|(param, _)| {
                let hints = by_doc
                    .iter()
                    .filter(|h| h.parameter == param)
                    .map(|h| (*h).clone())
                    .collect();
                (param, hints)
            })
            .collect()
    }

    /// Round robin over parameters in frequency order.
    ///
    /// Round `r` emits hints `[r * HINT_STRIDE, (r + 1) * HINT_STRIDE)` of every
    /// parameter that still has any; the upper bound is exclusive.
    fn by_stride(&self) -> Vec<Hint> {
        let grouped = self.by_parameter();
        let longest = grouped.iter().map(|(_, h)| h.len()).max().unwrap_or(0);

        let mut ordered = Vec::with_capacity(self.hints.len());
        for lower in (0..longest).step_by(HINT_STRIDE) {
            for (_, hints) in &grouped {
                if lower < hints.len() {
                    let upper = (lower + HINT_STRIDE).min(hints.len());
                    ordered.extend_from_slice(&hints[lower..upper]);
                }
            }
        }
        ordered
    }
}
