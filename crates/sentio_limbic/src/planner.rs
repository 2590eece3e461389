//! Motion-planner reconfiguration derived from the `tuning` label.

use serde::Serialize;

/// Parameters pushed to the external local planner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlannerParams {
    pub max_angular_velocity: f64,
    pub security_distance: f64,
}

impl PlannerParams {
    pub const LOW: PlannerParams = PlannerParams {
        max_angular_velocity: 0.5,
        security_distance: 0.5,
    };
    pub const MEDIUM: PlannerParams = PlannerParams {
        max_angular_velocity: 0.75,
        security_distance: 0.3,
    };
    pub const HIGH: PlannerParams = PlannerParams {
        max_angular_velocity: 1.0,
        security_distance: 0.15,
    };

    /// Fixed lookup; anything other than `low`/`high` (including no label)
    /// falls back to `medium`.
    pub fn for_tuning_label(label: Option<&str>) -> Self {
        match label {
            Some("low") => Self::LOW,
            Some("high") => Self::HIGH,
            _ => Self::MEDIUM,
        }
    }
}

impl Default for PlannerParams {
    fn default() -> Self {
        Self::MEDIUM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(PlannerParams::for_tuning_label(Some("low")), PlannerParams::LOW);
        assert_eq!(PlannerParams::for_tuning_label(Some("high")).security_distance, 0.15);
        assert_eq!(
            PlannerParams::for_tuning_label(Some("medium")).max_angular_velocity,
            0.75
        );
    }

    #[test]
    fn test_fallback_is_medium() {
        assert_eq!(PlannerParams::for_tuning_label(Some("extreme")), PlannerParams::MEDIUM);
        assert_eq!(PlannerParams::for_tuning_label(None), PlannerParams::MEDIUM);
    }
}
