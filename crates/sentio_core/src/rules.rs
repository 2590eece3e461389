//! Rules as plain data: an AND-conjunction of `(variable, label)` conditions
//! implying one output label. A single interpreter in [`crate::inference`]
//! evaluates every rule.

use crate::error::DefinitionError;
use crate::variable::FuzzyVariable;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub variable: String,
    pub label: String,
}

impl Condition {
    pub fn new(variable: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub conditions: Vec<Condition>,
    pub consequent: String,
}

impl Rule {
    pub fn new(conditions: Vec<Condition>, consequent: impl Into<String>) -> Self {
        Self {
            conditions,
            consequent: consequent.into(),
        }
    }

    /// Shorthand: `Rule::when(&[("expression", "happy"), ("mood", "low")], "medium")`.
    pub fn when(conditions: &[(&str, &str)], consequent: &str) -> Self {
        Self::new(
            conditions
                .iter()
                .map(|(variable, label)| Condition::new(*variable, *label))
                .collect(),
            consequent,
        )
    }
}

/// Ordered rule collection. Order never changes the inferred value, but it is
/// kept so that diagnostics list rules the way they were written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleBase {
    rules: Vec<Rule>,
}

/// A rule with names resolved to indices into the controller's variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompiledRule {
    /// `(input index, label index)` pairs.
    pub conditions: Vec<(usize, usize)>,
    /// Output label index.
    pub consequent: usize,
}

impl RuleBase {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check every reference against the declared variables and resolve names
    /// to indices.
    pub(crate) fn compile(
        &self,
        inputs: &[FuzzyVariable],
        output: &FuzzyVariable,
    ) -> Result<Vec<CompiledRule>, DefinitionError> {
        self.rules
            .iter()
            .enumerate()
            .map(|(rule_idx, rule)| {
                if rule.conditions.is_empty() {
                    return Err(DefinitionError::EmptyAntecedent { rule: rule_idx });
                }
                let conditions = rule
                    .conditions
                    .iter()
                    .map(|cond| {
                        let var_idx = inputs
                            .iter()
                            .position(|v| v.name() == cond.variable)
                            .ok_or_else(|| DefinitionError::UnknownVariable {
                                rule: rule_idx,
                                variable: cond.variable.clone(),
                            })?;
                        let label_idx = inputs[var_idx].label_index(&cond.label).ok_or_else(
                            || DefinitionError::UnknownLabel {
                                rule: rule_idx,
                                variable: cond.variable.clone(),
                                label: cond.label.clone(),
                            },
                        )?;
                        Ok((var_idx, label_idx))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let consequent = output.label_index(&rule.consequent).ok_or_else(|| {
                    DefinitionError::UnknownConsequent {
                        rule: rule_idx,
                        label: rule.consequent.clone(),
                    }
                })?;
                Ok(CompiledRule {
                    conditions,
                    consequent,
                })
            })
            .collect()
    }
}

impl FromIterator<Rule> for RuleBase {
    fn from_iter<T: IntoIterator<Item = Rule>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
