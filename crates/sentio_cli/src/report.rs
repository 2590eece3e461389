//! One printed line per tick.

use sentio_limbic::{Axis, AxisOutputs, EmotionalManager, Expression, PlannerParams};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Serialize)]
pub struct AxisReport {
    pub value: f64,
    pub label: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub expression: String,
    pub mood: AxisReport,
    pub body_speed: AxisReport,
    pub alertness: AxisReport,
    pub tuning: AxisReport,
    pub planner: PlannerParams,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub faults: Vec<String>,
}

impl TickReport {
    pub fn new(tick: u64, manager: &EmotionalManager, outputs: &AxisOutputs) -> Self {
        let code = manager.state().expression;
        let axis = |axis: Axis| {
            let value = outputs.get(axis);
            AxisReport {
                value,
                label: manager.map_output(axis, value).map(str::to_string),
            }
        };
        let tuning = axis(Axis::Tuning);
        let planner = PlannerParams::for_tuning_label(tuning.label.as_deref());
        Self {
            tick,
            expression: Expression::from_code(code)
                .map(|e| e.to_string())
                .unwrap_or_else(|| format!("code {code}")),
            mood: axis(Axis::Mood),
            body_speed: axis(Axis::BodySpeed),
            alertness: axis(Axis::Alertness),
            tuning,
            planner,
            faults: manager
                .last_faults()
                .iter()
                .map(|f| format!("{}: {}", f.axis, f.error))
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for AxisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.value)?;
        if let Some(label) = &self.label {
            write!(f, " ({label})")?;
        }
        Ok(())
    }
}

impl fmt::Display for TickReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:<4} {:<8} | mood {} | body_speed {} | alertness {} | tuning {} | planner w={} d={}",
            self.tick,
            self.expression,
            self.mood,
            self.body_speed,
            self.alertness,
            self.tuning,
            self.planner.max_angular_velocity,
            self.planner.security_distance,
        )?;
        if !self.faults.is_empty() {
            write!(f, " | kept: {}", self.faults.join("; "))?;
        }
        Ok(())
    }
}
