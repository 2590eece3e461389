//! Mamdani inference: fuzzification, min/max rule evaluation, clipped-set
//! aggregation and centroid defuzzification over the discretized output
//! domain.
//!
//! Every stage is a fold with `min` or `max`, which are exact and commutative
//! on floats, so the result is bit-identical for any rule order.

use crate::error::{DefinitionError, InferenceError};
use crate::rules::{CompiledRule, RuleBase};
use crate::variable::FuzzyVariable;
use std::collections::BTreeMap;

/// Crisp input values keyed by variable name.
pub type CrispInputs = BTreeMap<String, f64>;

#[derive(Debug, Clone)]
pub struct InferenceEngine {
    inputs: Vec<FuzzyVariable>,
    output: FuzzyVariable,
    rules: RuleBase,
    compiled: Vec<CompiledRule>,
    /// Output domain sample points.
    samples: Vec<f64>,
    /// `grid[label][i]` = membership of `samples[i]` under output label `label`.
    grid: Vec<Vec<f64>>,
}

impl InferenceEngine {
    pub fn new(
        inputs: Vec<FuzzyVariable>,
        output: FuzzyVariable,
        rules: RuleBase,
    ) -> Result<Self, DefinitionError> {
        if inputs.is_empty() {
            return Err(DefinitionError::NoInputs);
        }
        for (i, var) in inputs.iter().enumerate() {
            if inputs[..i].iter().any(|v| v.name() == var.name()) {
                return Err(DefinitionError::DuplicateVariable {
                    variable: var.name().to_string(),
                });
            }
        }
        let compiled = rules.compile(&inputs, &output)?;

        let samples: Vec<f64> = output.domain().samples().collect();
        let grid = output
            .sets()
            .iter()
            .map(|(_, mf)| samples.iter().map(|&x| mf.evaluate(x)).collect())
            .collect();

        Ok(Self {
            inputs,
            output,
            rules,
            compiled,
            samples,
            grid,
        })
    }

    pub fn inputs(&self) -> &[FuzzyVariable] {
        &self.inputs
    }

    pub fn output(&self) -> &FuzzyVariable {
        &self.output
    }

    pub fn rules(&self) -> &RuleBase {
        &self.rules
    }

    pub fn has_input(&self, name: &str) -> bool {
        self.inputs.iter().any(|v| v.name() == name)
    }

    /// Activation degree of each output label, in output label order.
    ///
    /// A variable missing from `crisp` falls back to its default; with no
    /// default it has no degrees and every rule that mentions it scores 0.
    pub fn activations(&self, crisp: &CrispInputs) -> Result<Vec<f64>, InferenceError> {
        let degrees = self
            .inputs
            .iter()
            .map(|var| {
                let value = crisp.get(var.name()).copied().or(var.default_value());
                match value {
                    Some(v) if !v.is_finite() => Err(InferenceError::NonFiniteInput {
                        controller: self.output.name().to_string(),
                        variable: var.name().to_string(),
                        value: v,
                    }),
                    Some(v) => Ok(Some(var.fuzzify(v))),
                    None => Ok(None),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut activations = vec![0.0f64; self.grid.len()];
        for rule in &self.compiled {
            let strength = rule
                .conditions
                .iter()
                .map(|&(var, label)| degrees[var].as_ref().map_or(0.0, |d| d[label]))
                .fold(1.0f64, f64::min);
            let slot = &mut activations[rule.consequent];
            *slot = slot.max(strength);
        }
        Ok(activations)
    }

    /// Aggregated output membership at each output sample point: every label's
    /// set clipped at its activation, combined with point-wise max.
    pub fn aggregate(&self, activations: &[f64]) -> Vec<f64> {
        (0..self.samples.len())
            .map(|i| {
                self.grid
                    .iter()
                    .zip(activations)
                    .map(|(set, &act)| set[i].min(act))
                    .fold(0.0f64, f64::max)
            })
            .collect()
    }

    /// Full pipeline: crisp inputs to crisp output.
    pub fn evaluate(&self, crisp: &CrispInputs) -> Result<f64, InferenceError> {
        let activations = self.activations(crisp)?;
        let aggregated = self.aggregate(&activations);
        centroid(&self.samples, &aggregated).ok_or_else(|| InferenceError::NoRuleFired {
            controller: self.output.name().to_string(),
        })
    }
}

/// `sum(x * mu(x)) / sum(mu(x))`, or `None` when the set is empty everywhere.
fn centroid(samples: &[f64], membership: &[f64]) -> Option<f64> {
    let (num, den) = samples
        .iter()
        .zip(membership)
        .fold((0.0f64, 0.0f64), |(num, den), (&x, &mu)| (num + x * mu, den + mu));
    if den > 0.0 {
        Some(num / den)
    } else {
        None
    }
}
