//! Transient speed boosts
//!
//! A change of facial expression arms a short additive delta on `body_speed`
//! that decays linearly to zero over a fixed number of ticks. There is only
//! ever one boost; arming a new one discards whatever was left of the old.

use crate::expression::{Expression, Personality};
use sentio_core::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Additive speed delta and how many ticks it lasts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoostProfile {
    pub speed_delta: f64,
    pub steps: u32,
}

impl BoostProfile {
    pub const NONE: BoostProfile = BoostProfile {
        speed_delta: 0.0,
        steps: 0,
    };

    pub const fn new(speed_delta: f64, steps: u32) -> Self {
        Self { speed_delta, steps }
    }
}

const SHY: [(Expression, BoostProfile); 7] = [
    (Expression::Neutral, BoostProfile::NONE),
    (Expression::Happy, BoostProfile::new(0.12, 3)),
    (Expression::Sad, BoostProfile::new(-0.08, 2)),
    (Expression::Surprise, BoostProfile::new(0.07, 2)),
    (Expression::Disgust, BoostProfile::new(-0.06, 1)),
    (Expression::Fear, BoostProfile::new(-0.18, 3)),
    (Expression::Angry, BoostProfile::new(-0.12, 2)),
];

const INTENSE: [(Expression, BoostProfile); 7] = [
    (Expression::Neutral, BoostProfile::NONE),
    (Expression::Happy, BoostProfile::new(0.25, 4)),
    (Expression::Sad, BoostProfile::new(-0.12, 3)),
    (Expression::Surprise, BoostProfile::new(0.12, 2)),
    (Expression::Disgust, BoostProfile::new(-0.10, 2)),
    (Expression::Fear, BoostProfile::new(-0.30, 4)),
    (Expression::Angry, BoostProfile::new(-0.18, 3)),
];

/// Boost profiles per personality and expression. Every personality present
/// has an entry for every expression.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostTable {
    profiles: BTreeMap<Personality, BTreeMap<Expression, BoostProfile>>,
}

impl Default for BoostTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BoostTable {
    /// The compiled-in table for `shy` and `intense`.
    pub fn builtin() -> Self {
        let profiles = [(Personality::Shy, SHY), (Personality::Intense, INTENSE)]
            .into_iter()
            .map(|(p, rows)| (p, rows.into_iter().collect()))
            .collect();
        Self { profiles }
    }

    /// Validate a raw `personality -> expression -> profile` map.
    pub fn from_map(
        document: &str,
        raw: BTreeMap<String, BTreeMap<String, BoostProfile>>,
    ) -> ConfigResult<Self> {
        let parse_err = |message: String| ConfigError::Parse {
            document: document.to_string(),
            message,
        };

        let mut profiles = BTreeMap::new();
        for (personality_key, rows) in raw {
            let personality: Personality = personality_key.parse().map_err(parse_err)?;
            let mut table = BTreeMap::new();
            for (expression_key, profile) in rows {
                let expression: Expression = expression_key.parse().map_err(parse_err)?;
                if !profile.speed_delta.is_finite() {
                    return Err(parse_err(format!(
                        "{personality}.{expression}: speed_delta is not finite"
                    )));
                }
                table.insert(expression, profile);
            }
            if let Some(missing) = Expression::ALL.iter().find(|e| !table.contains_key(*e)) {
                return Err(ConfigError::MissingBoostProfile {
                    document: document.to_string(),
                    personality: personality.to_string(),
                    expression: missing.to_string(),
                });
            }
            profiles.insert(personality, table);
        }
        Ok(Self { profiles })
    }

    pub fn from_toml_str(document: &str, content: &str) -> ConfigResult<Self> {
        let raw = toml::from_str(content).map_err(|e| ConfigError::Parse {
            document: document.to_string(),
            message: e.to_string(),
        })?;
        Self::from_map(document, raw)
    }

    pub fn from_json_str(document: &str, content: &str) -> ConfigResult<Self> {
        let raw = serde_json::from_str(content).map_err(|e| ConfigError::Parse {
            document: document.to_string(),
            message: e.to_string(),
        })?;
        Self::from_map(document, raw)
    }

    /// Load a `.toml` or `.json` boost table.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let document = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&document, &content),
            Some("json") => Self::from_json_str(&document, &content),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn has_personality(&self, personality: Personality) -> bool {
        self.profiles.contains_key(&personality)
    }

    /// Profile for an expression code. Codes outside 0..=6 and personalities
    /// missing from the table resolve to the no-op profile.
    pub fn profile(&self, personality: Personality, code: i32) -> BoostProfile {
        Expression::from_code(code)
            .and_then(|e| self.profiles.get(&personality)?.get(&e).copied())
            .unwrap_or(BoostProfile::NONE)
    }
}

/// The single in-flight boost.
///
/// `inactive` (all zero) -> `active(steps_remaining = N)` on arming, then one
/// step per tick back to `inactive`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BoostState {
    initial_delta: f64,
    steps_remaining: u32,
    total_steps: u32,
}

impl BoostState {
    pub fn initial_delta(&self) -> f64 {
        self.initial_delta
    }

    pub fn steps_remaining(&self) -> u32 {
        self.steps_remaining
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn is_active(&self) -> bool {
        self.steps_remaining > 0 && self.total_steps > 0
    }

    /// Replace whatever is in flight. A zero-length profile disarms.
    pub fn arm(&mut self, profile: BoostProfile) {
        *self = if profile.steps == 0 {
            Self::default()
        } else {
            Self {
                initial_delta: profile.speed_delta,
                steps_remaining: profile.steps,
                total_steps: profile.steps,
            }
        };
    }

    /// Delta that the next [`step`](Self::step) will apply.
    pub fn current_delta(&self) -> f64 {
        if self.is_active() {
            self.initial_delta * (self.steps_remaining as f64 / self.total_steps as f64)
        } else {
            0.0
        }
    }

    /// Consume one tick: return this tick's delta and decay. `None` when
    /// inactive.
    pub fn step(&mut self) -> Option<f64> {
        if !self.is_active() {
            return None;
        }
        let delta = self.current_delta();
        self.steps_remaining -= 1;
        if self.steps_remaining == 0 {
            *self = Self::default();
        }
        Some(delta)
    }
}
