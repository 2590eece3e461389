//! Persistent emotional state and the per-tick input/output records.

use crate::expression::Expression;
use sentio_core::InferenceError;
use serde::{Deserialize, Serialize};
use std::fmt;

fn sanitize_f64(v: f64, fallback: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        tracing::warn!("NaN/Inf detected in state, resetting to fallback {}", fallback);
        fallback
    }
}

/// The four continuous axes, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Mood,
    BodySpeed,
    Alertness,
    Tuning,
}

impl Axis {
    pub const ALL: [Axis; 4] = [Axis::Mood, Axis::BodySpeed, Axis::Alertness, Axis::Tuning];

    pub fn as_str(self) -> &'static str {
        match self {
            Axis::Mood => "mood",
            Axis::BodySpeed => "body_speed",
            Axis::Alertness => "alertness",
            Axis::Tuning => "tuning",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State carried from tick to tick. Each axis feeds back into its own
/// controller on the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionalState {
    pub mood: f64,
    pub body_speed: f64,
    pub alertness: f64,
    pub tuning: f64,
    /// Last seen expression code. Not necessarily a known [`Expression`].
    pub expression: i32,
}

impl Default for EmotionalState {
    fn default() -> Self {
        Self {
            mood: 50.0,
            body_speed: 0.3,
            alertness: 50.0,
            tuning: 50.0,
            expression: Expression::Neutral.code(),
        }
    }
}

impl EmotionalState {
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Mood => self.mood,
            Axis::BodySpeed => self.body_speed,
            Axis::Alertness => self.alertness,
            Axis::Tuning => self.tuning,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::Mood => self.mood = value,
            Axis::BodySpeed => self.body_speed = value,
            Axis::Alertness => self.alertness = value,
            Axis::Tuning => self.tuning = value,
        }
    }

    /// Replace any non-finite axis value with its default.
    pub fn sanitize(&mut self) {
        let defaults = Self::default();
        for axis in Axis::ALL {
            self.set(axis, sanitize_f64(self.get(axis), defaults.get(axis)));
        }
    }

    pub fn outputs(&self) -> AxisOutputs {
        AxisOutputs {
            mood: self.mood,
            body_speed: self.body_speed,
            alertness: self.alertness,
            tuning: self.tuning,
        }
    }
}

/// Partial update delivered by the outside world for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickUpdate {
    pub expression: Option<i32>,
    /// Measured forward speed; replaces the previous `body_speed` as the speed
    /// controller's input for this tick.
    pub measured_speed: Option<f64>,
}

impl TickUpdate {
    pub fn expression(expression: Expression) -> Self {
        Self::code(expression.code())
    }

    pub fn code(code: i32) -> Self {
        Self {
            expression: Some(code),
            measured_speed: None,
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.measured_speed = Some(speed);
        self
    }
}

/// The four crisp outputs of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisOutputs {
    pub mood: f64,
    pub body_speed: f64,
    pub alertness: f64,
    pub tuning: f64,
}

impl AxisOutputs {
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Mood => self.mood,
            Axis::BodySpeed => self.body_speed,
            Axis::Alertness => self.alertness,
            Axis::Tuning => self.tuning,
        }
    }
}

/// An axis that could not be computed on a tick and kept its previous value.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisFault {
    pub axis: Axis,
    pub error: InferenceError,
}
