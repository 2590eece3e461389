//! Crisp value to label lookup via `[low, high]` brackets.

use crate::error::DefinitionError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub low: f64,
    pub high: f64,
    pub label: String,
}

impl Bracket {
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Non-overlapping inclusive brackets. They need not cover the whole output
/// range. Brackets that only share an endpoint are allowed; the one listed
/// first wins at that point.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutputMapping {
    brackets: Vec<Bracket>,
}

impl OutputMapping {
    pub fn new(brackets: Vec<Bracket>) -> Result<Self, DefinitionError> {
        for (i, b) in brackets.iter().enumerate() {
            if !(b.low.is_finite() && b.high.is_finite() && b.low <= b.high) {
                return Err(DefinitionError::InvalidBracket {
                    index: i,
                    low: b.low,
                    high: b.high,
                });
            }
            if let Some(j) = brackets[..i]
                .iter()
                .position(|other| b.low < other.high && other.low < b.high)
            {
                return Err(DefinitionError::OverlappingBrackets { first: j, second: i });
            }
        }
        Ok(Self { brackets })
    }

    /// Build from the document form `[[low, high, label], ...]`.
    pub fn from_triples(triples: Vec<(f64, f64, String)>) -> Result<Self, DefinitionError> {
        Self::new(
            triples
                .into_iter()
                .map(|(low, high, label)| Bracket { low, high, label })
                .collect(),
        )
    }

    pub fn label_for(&self, value: f64) -> Option<&str> {
        self.brackets
            .iter()
            .find(|b| b.contains(value))
            .map(|b| b.label.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }
}
