//! Linguistic variables: a named, discretized domain carrying labelled
//! membership functions. Used for both the inputs and the output of a
//! controller.

use crate::error::DefinitionError;
use crate::membership::MembershipFunction;
use serde::Serialize;

/// Tolerance used when counting sample points so that `1.01 / 0.01` does not
/// round up to an extra point.
const SAMPLE_EPSILON: f64 = 1e-9;

/// Upper bound on the number of sample points in one domain.
pub const MAX_SAMPLES: usize = 1_000_000;

/// Half-open discretized range `[min, max)` sampled every `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Domain {
    min: f64,
    max: f64,
    step: f64,
}

impl Domain {
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self, DefinitionError> {
        let valid = min.is_finite() && max.is_finite() && step.is_finite() && max > min && step > 0.0;
        if !valid || (max - min) / step > MAX_SAMPLES as f64 {
            return Err(DefinitionError::InvalidDomain { min, max, step });
        }
        Ok(Self { min, max, step })
    }

    /// Build from the document form `[min, max, step]`.
    pub fn from_range(range: &[f64]) -> Result<Self, DefinitionError> {
        match *range {
            [min, max, step] => Self::new(min, max, step),
            _ => Err(DefinitionError::InvalidDomain {
                min: range.first().copied().unwrap_or(f64::NAN),
                max: range.get(1).copied().unwrap_or(f64::NAN),
                step: f64::NAN,
            }),
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of sample points, `ceil((max - min) / step)`.
    pub fn sample_count(&self) -> usize {
        (((self.max - self.min) / self.step) - SAMPLE_EPSILON).ceil().max(1.0) as usize
    }

    /// Sample points `min + i * step`, in ascending order.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.sample_count()).map(move |i| self.min + i as f64 * self.step)
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }
}

/// A named fuzzy variable: domain plus labelled membership sets.
///
/// Labels are unique; their order is the order they were declared in and is
/// used for deterministic iteration.
#[derive(Debug, Clone, Serialize)]
pub struct FuzzyVariable {
    name: String,
    domain: Domain,
    sets: Vec<(String, MembershipFunction)>,
    default: Option<f64>,
}

impl FuzzyVariable {
    pub fn new(
        name: impl Into<String>,
        domain: Domain,
        sets: Vec<(String, MembershipFunction)>,
    ) -> Result<Self, DefinitionError> {
        let name = name.into();
        if sets.is_empty() {
            return Err(DefinitionError::EmptyVariable { variable: name });
        }
        for (i, (label, _)) in sets.iter().enumerate() {
            if sets[..i].iter().any(|(other, _)| other == label) {
                return Err(DefinitionError::DuplicateLabel {
                    variable: name,
                    label: label.clone(),
                });
            }
        }
        Ok(Self {
            name,
            domain,
            sets,
            default: None,
        })
    }

    /// Value used when the variable is absent from an input set.
    pub fn with_default(mut self, value: f64) -> Result<Self, DefinitionError> {
        if !value.is_finite() {
            return Err(DefinitionError::InvalidDefault {
                variable: self.name,
                value,
            });
        }
        self.default = Some(value);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn default_value(&self) -> Option<f64> {
        self.default
    }

    pub fn sets(&self) -> &[(String, MembershipFunction)] {
        &self.sets
    }

    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.sets.iter().position(|(l, _)| l == label)
    }

    pub fn membership(&self, label: &str) -> Option<&MembershipFunction> {
        self.sets
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, mf)| mf)
    }

    /// Degree of `x` under every label, in label order. `x` is clamped to the
    /// domain first.
    pub fn fuzzify(&self, x: f64) -> Vec<f64> {
        let x = self.domain.clamp(x);
        self.sets.iter().map(|(_, mf)| mf.evaluate(x)).collect()
    }
}
