//! The emotional manager
//!
//! Owns one fuzzy controller per axis and runs them in a fixed order every
//! tick, feeding each axis its own previous value plus whatever upstream
//! axis it depends on:
//!
//! ```text
//! expression ──┬─> mood ──> body_speed ──> (+ boost, clamp)
//!              └─> alertness ──> tuning
//! ```
//!
//! A change of expression also arms a transient speed boost (see
//! [`crate::boost`]). Per-axis inference failures are logged and the axis
//! keeps its previous value; configuration problems fail construction.

use crate::boost::{BoostState, BoostTable};
use crate::config::{ManagerConfig, SpeedLimits};
use crate::expression::{Expression, Personality};
use crate::state::{Axis, AxisFault, AxisOutputs, EmotionalState, TickUpdate};
use sentio_core::{ConfigError, ConfigResult, ControllerConfig, DefinitionError, FuzzyController};
use std::path::Path;

/// Prefix of the snapshot alias offered next to every live candidate value.
const ALIAS_PREFIX: char = '_';

/// The four controllers, one per axis.
#[derive(Debug, Clone)]
pub struct AxisControllers {
    pub mood: FuzzyController,
    pub body_speed: FuzzyController,
    pub alertness: FuzzyController,
    pub tuning: FuzzyController,
}

impl AxisControllers {
    /// Resolve `{axis}_{personality}` (`.json`, then `.toml`) for every axis.
    pub fn load<P: AsRef<Path>>(dir: P, personality: Personality) -> ConfigResult<Self> {
        let dir = dir.as_ref();
        let load = |axis: Axis| -> ConfigResult<FuzzyController> {
            let stem = format!("{}_{}", axis.as_str(), personality.as_str());
            ControllerConfig::resolve(dir, &stem).map(FuzzyController::new)
        };
        Ok(Self {
            mood: load(Axis::Mood)?,
            body_speed: load(Axis::BodySpeed)?,
            alertness: load(Axis::Alertness)?,
            tuning: load(Axis::Tuning)?,
        })
    }

    pub fn get(&self, axis: Axis) -> &FuzzyController {
        match axis {
            Axis::Mood => &self.mood,
            Axis::BodySpeed => &self.body_speed,
            Axis::Alertness => &self.alertness,
            Axis::Tuning => &self.tuning,
        }
    }

    fn get_mut(&mut self, axis: Axis) -> &mut FuzzyController {
        match axis {
            Axis::Mood => &mut self.mood,
            Axis::BodySpeed => &mut self.body_speed,
            Axis::Alertness => &mut self.alertness,
            Axis::Tuning => &mut self.tuning,
        }
    }
}

/// Four-axis emotional state machine.
///
/// Not safe for concurrent mutation; callers serialize calls to
/// [`compute`](Self::compute).
#[derive(Debug, Clone)]
pub struct EmotionalManager {
    personality: Personality,
    controllers: AxisControllers,
    state: EmotionalState,
    boosts: BoostTable,
    boost: BoostState,
    speed: SpeedLimits,
    /// Expression at the end of the previous tick; `None` before the first.
    last_expression: Option<i32>,
    last_faults: Vec<AxisFault>,
}

impl EmotionalManager {
    /// Load the controllers for `personality` from `config_dir` with default
    /// state, speed limits and the built-in boost table.
    pub fn new<P: AsRef<Path>>(config_dir: P, personality: Personality) -> ConfigResult<Self> {
        let controllers = AxisControllers::load(config_dir, personality)?;
        Self::from_parts(
            personality,
            controllers,
            BoostTable::builtin(),
            SpeedLimits::default(),
            EmotionalState::default(),
        )
    }

    pub fn from_config(config: &ManagerConfig) -> ConfigResult<Self> {
        let controllers = AxisControllers::load(&config.controllers_dir, config.personality)?;
        let boosts = match &config.boost_table {
            Some(path) => BoostTable::load(path)?,
            None => BoostTable::builtin(),
        };
        Self::from_parts(
            config.personality,
            controllers,
            boosts,
            config.speed,
            config.initial,
        )
    }

    pub fn from_parts(
        personality: Personality,
        controllers: AxisControllers,
        boosts: BoostTable,
        speed: SpeedLimits,
        mut initial: EmotionalState,
    ) -> ConfigResult<Self> {
        if !boosts.has_personality(personality) {
            return Err(ConfigError::MissingBoostProfile {
                document: "boost table".to_string(),
                personality: personality.to_string(),
                expression: Expression::Neutral.to_string(),
            });
        }
        if !speed.is_valid() {
            return Err(ConfigError::Invalid {
                document: "manager".to_string(),
                field: "speed".to_string(),
                source: DefinitionError::InvalidLimits {
                    min: speed.min,
                    max: speed.max,
                },
            });
        }
        initial.sanitize();
        tracing::info!(
            "Emotional manager ready: personality={}, speed=[{}, {}]",
            personality,
            speed.min,
            speed.max
        );
        Ok(Self {
            personality,
            controllers,
            state: initial,
            boosts,
            boost: BoostState::default(),
            speed,
            last_expression: None,
            last_faults: Vec::new(),
        })
    }

    /// Run one tick of the pipeline and return the committed outputs.
    ///
    /// Always yields all four axes; an axis whose controller fails keeps its
    /// previous value and is reported in [`last_faults`](Self::last_faults).
    pub fn compute(&mut self, update: TickUpdate) -> AxisOutputs {
        self.last_faults.clear();

        if let Some(code) = update.expression {
            self.state.expression = code;
        }
        let expression = self.state.expression;
        if self.last_expression != Some(expression) {
            tracing::debug!(
                "Expression changed {:?} -> {}, arming boost",
                self.last_expression,
                expression
            );
            self.trigger_boost(expression);
            self.last_expression = Some(expression);
        }

        let prev = self.state;
        let face = f64::from(expression);

        let mood = self.run_axis(Axis::Mood, prev.mood, &[("expression", face), ("mood", prev.mood)]);

        let speed_input = update.measured_speed.unwrap_or(prev.body_speed);
        let body_speed = self.run_axis(
            Axis::BodySpeed,
            prev.body_speed,
            &[("mood", mood), ("body_speed", speed_input)],
        );

        let alertness = self.run_axis(
            Axis::Alertness,
            prev.alertness,
            &[("expression", face), ("alertness", prev.alertness)],
        );

        let tuning = self.run_axis(
            Axis::Tuning,
            prev.tuning,
            &[("alertness", alertness), ("tuning", prev.tuning)],
        );

        let boosted = match self.boost.step() {
            Some(delta) => {
                tracing::debug!("Boost delta {:+.4} on body_speed {:.4}", delta, body_speed);
                body_speed + delta
            }
            None => body_speed,
        };
        let body_speed = self.speed.clamp(boosted);

        self.state.mood = mood;
        self.state.body_speed = body_speed;
        self.state.alertness = alertness;
        self.state.tuning = tuning;
        let outputs = self.state.outputs();
        tracing::trace!("Tick committed: {:?}", outputs);
        outputs
    }

    /// Evaluate one axis against its candidates. Each live value is also
    /// offered under its `_`-prefixed alias.
    fn run_axis(&mut self, axis: Axis, previous: f64, candidates: &[(&str, f64)]) -> f64 {
        let controller = self.controllers.get_mut(axis);
        let offered = candidates.iter().flat_map(|&(name, value)| {
            [(name.to_string(), value), (format!("{ALIAS_PREFIX}{name}"), value)]
        });
        let inputs = controller.select_inputs(offered);
        if inputs.is_empty() {
            return previous;
        }
        match controller.evaluate_inputs(&inputs) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!("Axis {} kept at {}: {}", axis, previous, error);
                self.last_faults.push(AxisFault { axis, error });
                previous
            }
        }
    }

    /// Arm the boost for an expression code, replacing any boost in flight.
    /// Unknown codes disarm.
    pub fn trigger_boost(&mut self, code: i32) {
        let profile = self.boosts.profile(self.personality, code);
        self.boost.arm(profile);
    }

    /// Label of `value` under the axis controller's output mapping.
    pub fn map_output(&self, axis: Axis, value: f64) -> Option<&str> {
        self.controllers.get(axis).map_output(value)
    }

    pub fn state(&self) -> &EmotionalState {
        &self.state
    }

    pub fn boost_state(&self) -> &BoostState {
        &self.boost
    }

    /// Axes that failed during the most recent [`compute`](Self::compute).
    pub fn last_faults(&self) -> &[AxisFault] {
        &self.last_faults
    }

    pub fn personality(&self) -> Personality {
        self.personality
    }

    pub fn speed_limits(&self) -> SpeedLimits {
        self.speed
    }

    pub fn controller(&self, axis: Axis) -> &FuzzyController {
        self.controllers.get(axis)
    }
}
