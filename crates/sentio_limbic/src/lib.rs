//! # Sentio Limbic
//!
//! Emotional state for a mobile robot, driven by fuzzy controllers from
//! [`sentio_core`].
//!
//! ## Axes
//!
//! - **mood**: from the observed facial expression and the previous mood
//! - **body_speed**: from mood and the current (or measured) speed, plus a
//!   transient boost on every expression change
//! - **alertness**: from the expression and the previous alertness
//! - **tuning**: from alertness; its label selects the planner parameters
//!
//! The [`EmotionalManager`] runs these in that order once per tick. Which
//! rule sets and boost magnitudes are used depends on the [`Personality`].

pub mod boost;
pub mod config;
mod expression;
mod manager;
mod planner;
mod state;

pub use boost::{BoostProfile, BoostState, BoostTable};
pub use config::{ManagerConfig, SpeedLimits};
pub use expression::{Expression, Personality};
pub use manager::{AxisControllers, EmotionalManager};
pub use planner::PlannerParams;
pub use state::{Axis, AxisFault, AxisOutputs, EmotionalState, TickUpdate};
