//! # Sentio Core
//!
//! A small Mamdani fuzzy inference engine and the controller unit built on it.
//!
//! ## Pipeline
//!
//! 1. **Fuzzification**: each crisp input becomes a degree under every label
//!    of its [`FuzzyVariable`].
//! 2. **Rule strength**: AND-conjunctions combine with `min`.
//! 3. **Aggregation**: output sets are clipped at their rule strength and
//!    merged with point-wise `max`.
//! 4. **Defuzzification**: centroid over the sampled output domain.
//!
//! A [`FuzzyController`] wraps one engine with optional smoothing
//! ([`DelayFilter`]) and a value-to-label [`OutputMapping`], and is loaded
//! from a JSON or TOML document ([`ControllerConfig`]).
//!
//! Everything here is synchronous and allocation-light; configuration is
//! immutable once loaded and can be shared across threads, while controller
//! state needs exclusive access.

pub mod config;
mod controller;
mod delay;
pub mod error;
mod inference;
mod mapping;
mod membership;
mod rules;
mod variable;

pub use config::{ControllerConfig, ControllerDocument};
pub use controller::FuzzyController;
pub use delay::DelayFilter;
pub use error::{ConfigError, ConfigResult, DefinitionError, InferenceError};
pub use inference::{CrispInputs, InferenceEngine};
pub use mapping::{Bracket, OutputMapping};
pub use membership::MembershipFunction;
pub use rules::{Condition, Rule, RuleBase};
pub use variable::{Domain, FuzzyVariable, MAX_SAMPLES};
