//! A loaded fuzzy controller: one inference engine plus its smoothing stage,
//! defaults and output mapping, with the little bit of state that survives
//! between evaluations.

use crate::config::ControllerConfig;
use crate::delay::DelayFilter;
use crate::error::{ConfigResult, InferenceError};
use crate::inference::CrispInputs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct FuzzyController {
    config: ControllerConfig,
    delay: Option<DelayFilter>,
    last_output: f64,
}

impl FuzzyController {
    /// The delay constant and initial value were validated when `config` was
    /// built, so this cannot fail.
    pub fn new(config: ControllerConfig) -> Self {
        let delay = config
            .use_delay()
            .then(|| DelayFilter::validated(config.delay_const(), config.initial_value()));
        Self {
            last_output: config.initial_value(),
            config,
            delay,
        }
    }

    /// Load a controller document from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        ControllerConfig::load(path).map(Self::new)
    }

    pub fn name(&self) -> &str {
        self.config.name()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn last_output(&self) -> f64 {
        self.last_output
    }

    pub fn delay(&self) -> Option<&DelayFilter> {
        self.delay.as_ref()
    }

    pub fn accepts(&self, name: &str) -> bool {
        self.config.engine().has_input(name)
    }

    /// Keep only the candidates whose names are declared inputs. Unknown
    /// names are dropped silently.
    pub fn select_inputs<I, K>(&self, candidates: I) -> CrispInputs
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        candidates
            .into_iter()
            .filter(|(name, _)| self.accepts(name.as_ref()))
            .map(|(name, value)| (name.as_ref().to_string(), value))
            .collect()
    }

    /// Run inference on already-selected inputs, then smoothing. On error the
    /// controller state (smoothing base, last output) is left untouched.
    pub fn evaluate_inputs(&mut self, inputs: &CrispInputs) -> Result<f64, InferenceError> {
        let raw = self.config.engine().evaluate(inputs)?;
        let value = match self.delay.as_mut() {
            Some(filter) => filter.apply(raw),
            None => raw,
        };
        self.last_output = value;
        Ok(value)
    }

    /// Select matching candidates and evaluate. If nothing matches this is a
    /// no-op returning the previous output.
    pub fn compute<I, K>(&mut self, candidates: I) -> Result<f64, InferenceError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let inputs = self.select_inputs(candidates);
        if inputs.is_empty() {
            tracing::trace!("Controller `{}`: no matching inputs, keeping {}", self.name(), self.last_output);
            return Ok(self.last_output);
        }
        self.evaluate_inputs(&inputs)
    }

    /// [`compute`](Self::compute) plus the mapped label of the result.
    pub fn compute_labelled<I, K>(&mut self, candidates: I) -> Result<(f64, Option<&str>), InferenceError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let value = self.compute(candidates)?;
        Ok((value, self.map_output(value)))
    }

    /// Label of the bracket containing `value`, if a mapping is configured and
    /// one matches.
    pub fn map_output(&self, value: f64) -> Option<&str> {
        self.config.mapping().and_then(|m| m.label_for(value))
    }
}
