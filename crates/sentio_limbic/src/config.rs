use crate::expression::Personality;
use crate::state::EmotionalState;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Directory holding the `{axis}_{personality}` controller documents.
    pub controllers_dir: PathBuf,
    pub personality: Personality,
    pub speed: SpeedLimits,
    pub initial: EmotionalState,
    /// Boost table to use instead of the built-in one.
    pub boost_table: Option<PathBuf>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            controllers_dir: PathBuf::from("controllers"),
            personality: Personality::default(),
            speed: SpeedLimits::default(),
            initial: EmotionalState::default(),
            boost_table: None,
        }
    }
}

impl ManagerConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: ManagerConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?;
        config.resolve_relative_to(path);
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if file doesn't exist, return defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({:#}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    /// Relative paths inside the file are taken relative to the file itself.
    fn resolve_relative_to(&mut self, config_path: &Path) {
        let Some(base) = config_path.parent() else {
            return;
        };
        if self.controllers_dir.is_relative() {
            self.controllers_dir = base.join(&self.controllers_dir);
        }
        if let Some(table) = self.boost_table.as_mut() {
            if table.is_relative() {
                *table = base.join(&*table);
            }
        }
    }

    /// Apply environment variable overrides on top of file-based config.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SENTIO_CONTROLLERS_DIR") {
            self.controllers_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("SENTIO_PERSONALITY") {
            match v.parse() {
                Ok(p) => self.personality = p,
                Err(e) => tracing::warn!("Ignoring SENTIO_PERSONALITY: {}", e),
            }
        }
        if let Ok(v) = std::env::var("SENTIO_MIN_SPEED") {
            if let Ok(n) = v.parse() {
                self.speed.min = n;
            }
        }
        if let Ok(v) = std::env::var("SENTIO_MAX_SPEED") {
            if let Ok(n) = v.parse() {
                self.speed.max = n;
            }
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

/// Hard bounds applied to `body_speed` after every tick.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpeedLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for SpeedLimits {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl SpeedLimits {
    pub fn clamp(&self, speed: f64) -> f64 {
        speed.max(self.min).min(self.max)
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

// ============================================================================
// Tests
// ============================================================================
