//! Error types for the fuzzy engine.
//!
//! Three families, matching how they are handled by callers:
//! - [`DefinitionError`]: a variable, rule base or controller was built from
//!   inconsistent parts. Always fatal.
//! - [`ConfigError`]: a controller or boost document could not be read,
//!   parsed or validated. Fatal at construction time and always names the
//!   document (and field, when there is one).
//! - [`InferenceError`]: a single evaluation could not produce a crisp value.
//!   Recoverable; the caller keeps its previous value.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefinitionError {
    #[error("invalid domain [{min}, {max}) with step {step}")]
    InvalidDomain { min: f64, max: f64, step: f64 },

    #[error("variable `{variable}` declares label `{label}` twice")]
    DuplicateLabel { variable: String, label: String },

    #[error("variable `{variable}` has no membership sets")]
    EmptyVariable { variable: String },

    #[error("input variable `{variable}` is declared twice")]
    DuplicateVariable { variable: String },

    #[error("controller has no input variables")]
    NoInputs,

    #[error("unknown membership function kind `{kind}`")]
    UnknownMembership { kind: String },

    #[error("membership function `{kind}` expects {expected} parameters, got {found}")]
    MembershipArity {
        kind: String,
        expected: usize,
        found: usize,
    },

    #[error("membership function `{kind}`: {reason}")]
    InvalidMembership { kind: String, reason: String },

    #[error("default value {value} of `{variable}` is not finite")]
    InvalidDefault { variable: String, value: f64 },

    #[error("rule #{rule} has no conditions")]
    EmptyAntecedent { rule: usize },

    #[error("rule #{rule} references undeclared variable `{variable}`")]
    UnknownVariable { rule: usize, variable: String },

    #[error("rule #{rule} references undeclared label `{label}` of `{variable}`")]
    UnknownLabel {
        rule: usize,
        variable: String,
        label: String,
    },

    #[error("rule #{rule} concludes undeclared output label `{label}`")]
    UnknownConsequent { rule: usize, label: String },

    #[error("bracket #{index} [{low}, {high}] is empty or not finite")]
    InvalidBracket { index: usize, low: f64, high: f64 },

    #[error("bracket #{first} overlaps bracket #{second}")]
    OverlappingBrackets { first: usize, second: usize },

    #[error("initial value {value} is not finite")]
    InvalidInitialValue { value: f64 },

    #[error("delay constant {value} must be finite and >= 0")]
    InvalidDelay { value: f64 },

    #[error("limits [{min}, {max}] are empty or not finite")]
    InvalidLimits { min: f64, max: f64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {document}: {message}")]
    Parse { document: String, message: String },

    #[error("unsupported document format for {} (expected .json or .toml)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("no controller document `{stem}` (.json or .toml) in {}", dir.display())]
    MissingDocument { dir: PathBuf, stem: String },

    #[error("{document}: field `{field}`: {source}")]
    Invalid {
        document: String,
        field: String,
        #[source]
        source: DefinitionError,
    },

    #[error("{document}: no boost profile for {personality}/{expression}")]
    MissingBoostProfile {
        document: String,
        personality: String,
        expression: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(
        document: &str,
        field: impl Into<String>,
        source: DefinitionError,
    ) -> Self {
        Self::Invalid {
            document: document.to_string(),
            field: field.into(),
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("no rule fired in controller `{controller}`")]
    NoRuleFired { controller: String },

    #[error("input `{variable}` of controller `{controller}` is not finite ({value})")]
    NonFiniteInput {
        controller: String,
        variable: String,
        value: f64,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
