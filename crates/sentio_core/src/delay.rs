//! Single-pole smoothing applied to a controller's defuzzified output.
//!
//! `out_t = (base * k + raw_t) / (k + 1)`, then `base = out_t`.
//! With `k = 0` the filter passes values through unchanged.

use crate::error::DefinitionError;
use std::collections::VecDeque;

const HISTORY_LIMIT: usize = 64;

#[derive(Debug, Clone)]
pub struct DelayFilter {
    delay_const: f64,
    base: f64,
    /// Recent `(raw, smoothed)` pairs, oldest first. Diagnostics only.
    history: VecDeque<(f64, f64)>,
}

impl DelayFilter {
    pub fn new(delay_const: f64, initial: f64) -> Result<Self, DefinitionError> {
        if !delay_const.is_finite() || delay_const < 0.0 {
            return Err(DefinitionError::InvalidDelay { value: delay_const });
        }
        Ok(Self::validated(delay_const, initial))
    }

    /// `delay_const` must already be finite and non-negative.
    pub(crate) fn validated(delay_const: f64, initial: f64) -> Self {
        Self {
            delay_const,
            base: initial,
            history: VecDeque::with_capacity(HISTORY_LIMIT),
        }
    }

    pub fn apply(&mut self, raw: f64) -> f64 {
        let smoothed = (self.base * self.delay_const + raw) / (self.delay_const + 1.0);
        self.base = smoothed;
        if self.history.len() >= HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back((raw, smoothed));
        smoothed
    }

    pub fn delay_const(&self) -> f64 {
        self.delay_const
    }

    /// Last smoothed value (or the initial value before the first call).
    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn history(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.history.iter()
    }
}
