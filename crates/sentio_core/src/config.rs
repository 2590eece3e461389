use crate::error::{ConfigError, ConfigResult, DefinitionError};
use crate::inference::InferenceEngine;
use crate::mapping::OutputMapping;
use crate::membership::MembershipFunction;
use crate::rules::{Condition, Rule, RuleBase};
use crate::variable::{Domain, FuzzyVariable};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// ============================================================================
// Document schema (as written on disk)
// ============================================================================

/// One controller document, JSON or TOML.
///
/// ```json
/// {
///   "name": "mood",
///   "initial_value": 50.0,
///   "use_delay": true,
///   "inputs": { "expression": { "range": [0, 7, 1], "sets": { "happy": ["trimf", [0, 1, 2]] } } },
///   "output": { "range": [0, 101, 1], "sets": { "high": ["trimf", [50, 100, 100]] } },
///   "rules": [ { "if": [["expression", "happy"]], "then": "high" } ],
///   "mapping": [[0, 50, "low"], [50, 100, "high"]]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ControllerDocument {
    pub name: String,
    #[serde(default = "default_initial_value")]
    pub initial_value: f64,
    #[serde(default = "default_delay_const")]
    pub delay_const: f64,
    #[serde(default)]
    pub use_delay: bool,
    pub inputs: BTreeMap<String, InputDocument>,
    pub output: OutputDocument,
    #[serde(default)]
    pub rules: Vec<RuleDocument>,
    #[serde(default)]
    pub mapping: Option<Vec<(f64, f64, String)>>,
}

fn default_initial_value() -> f64 {
    50.0
}

fn default_delay_const() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputDocument {
    pub range: Vec<f64>,
    pub sets: BTreeMap<String, SetDocument>,
    #[serde(default)]
    pub default: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputDocument {
    pub range: Vec<f64>,
    pub sets: BTreeMap<String, SetDocument>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleDocument {
    #[serde(rename = "if")]
    pub conditions: Vec<(String, String)>,
    pub then: String,
}

/// `["trimf", [0, 25, 50]]` or the flat `["trimf", 0, 25, 50]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Vec<SetToken>")]
pub struct SetDocument {
    pub kind: String,
    pub params: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SetToken {
    Name(String),
    Number(f64),
    Params(Vec<f64>),
}

impl TryFrom<Vec<SetToken>> for SetDocument {
    type Error = String;

    fn try_from(tokens: Vec<SetToken>) -> Result<Self, Self::Error> {
        let mut iter = tokens.into_iter();
        let kind = match iter.next() {
            Some(SetToken::Name(kind)) => kind,
            _ => return Err("membership set must start with a function name".to_string()),
        };
        let mut params = Vec::new();
        for token in iter {
            match token {
                SetToken::Number(n) => params.push(n),
                SetToken::Params(list) => params.extend(list),
                SetToken::Name(n) => {
                    return Err(format!("unexpected name `{n}` in parameters of `{kind}`"))
                }
            }
        }
        Ok(Self { kind, params })
    }
}

// ============================================================================
// Validated controller configuration
// ============================================================================

/// Immutable, validated controller configuration: engine (variables + rules),
/// smoothing settings and the optional output mapping.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    name: String,
    initial_value: f64,
    delay_const: f64,
    use_delay: bool,
    engine: InferenceEngine,
    mapping: Option<OutputMapping>,
}

impl ControllerConfig {
    /// Programmatic construction. The controller takes the output variable's
    /// name; smoothing is off and the initial value is 50.
    pub fn new(engine: InferenceEngine) -> Self {
        Self {
            name: engine.output().name().to_string(),
            initial_value: default_initial_value(),
            delay_const: default_delay_const(),
            use_delay: false,
            engine,
            mapping: None,
        }
    }

    pub fn with_initial_value(mut self, value: f64) -> Result<Self, DefinitionError> {
        if !value.is_finite() {
            return Err(DefinitionError::InvalidInitialValue { value });
        }
        self.initial_value = value;
        Ok(self)
    }

    /// Enable smoothing with delay constant `k`.
    pub fn with_delay(mut self, k: f64) -> Result<Self, DefinitionError> {
        if !k.is_finite() || k < 0.0 {
            return Err(DefinitionError::InvalidDelay { value: k });
        }
        self.delay_const = k;
        self.use_delay = true;
        Ok(self)
    }

    pub fn with_mapping(mut self, mapping: OutputMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    pub fn delay_const(&self) -> f64 {
        self.delay_const
    }

    pub fn use_delay(&self) -> bool {
        self.use_delay
    }

    pub fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    pub fn mapping(&self) -> Option<&OutputMapping> {
        self.mapping.as_ref()
    }

    /// Validate a parsed document. `document` names it in error messages.
    pub fn from_document(document: &str, doc: ControllerDocument) -> ConfigResult<Self> {
        if !doc.initial_value.is_finite() {
            return Err(ConfigError::invalid(
                document,
                "initial_value",
                DefinitionError::InvalidInitialValue {
                    value: doc.initial_value,
                },
            ));
        }
        if !doc.delay_const.is_finite() || doc.delay_const < 0.0 {
            return Err(ConfigError::invalid(
                document,
                "delay_const",
                DefinitionError::InvalidDelay {
                    value: doc.delay_const,
                },
            ));
        }

        let mut inputs = Vec::with_capacity(doc.inputs.len());
        for (var_name, input) in doc.inputs {
            let prefix = format!("inputs.{var_name}");
            let mut var = build_variable(document, &prefix, &var_name, &input.range, input.sets)?;
            if let Some(default) = input.default {
                var = var
                    .with_default(default)
                    .map_err(|e| ConfigError::invalid(document, format!("{prefix}.default"), e))?;
            }
            inputs.push(var);
        }
        if inputs.is_empty() {
            return Err(ConfigError::invalid(document, "inputs", DefinitionError::NoInputs));
        }

        let output = build_variable(document, "output", &doc.name, &doc.output.range, doc.output.sets)?;

        let rules: RuleBase = doc
            .rules
            .into_iter()
            .map(|r| {
                Rule::new(
                    r.conditions
                        .into_iter()
                        .map(|(variable, label)| Condition { variable, label })
                        .collect(),
                    r.then,
                )
            })
            .collect();

        let engine = InferenceEngine::new(inputs, output, rules).map_err(|e| {
            let field = match &e {
                DefinitionError::EmptyAntecedent { rule }
                | DefinitionError::UnknownVariable { rule, .. }
                | DefinitionError::UnknownLabel { rule, .. }
                | DefinitionError::UnknownConsequent { rule, .. } => format!("rules[{rule}]"),
                _ => "inputs".to_string(),
            };
            ConfigError::invalid(document, field, e)
        })?;

        let mapping = doc
            .mapping
            .map(OutputMapping::from_triples)
            .transpose()
            .map_err(|e| ConfigError::invalid(document, "mapping", e))?;

        Ok(Self {
            name: doc.name,
            initial_value: doc.initial_value,
            delay_const: doc.delay_const,
            use_delay: doc.use_delay,
            engine,
            mapping,
        })
    }

    pub fn from_json_str(document: &str, content: &str) -> ConfigResult<Self> {
        let doc: ControllerDocument =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse {
                document: document.to_string(),
                message: e.to_string(),
            })?;
        Self::from_document(document, doc)
    }

    pub fn from_toml_str(document: &str, content: &str) -> ConfigResult<Self> {
        let doc: ControllerDocument = toml::from_str(content).map_err(|e| ConfigError::Parse {
            document: document.to_string(),
            message: e.to_string(),
        })?;
        Self::from_document(document, doc)
    }

    /// Load a `.json` or `.toml` controller document.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let document = path.display().to_string();
        let parse: fn(&str, &str) -> ConfigResult<Self> =
            match path.extension().and_then(|e| e.to_str()) {
                Some("json") => Self::from_json_str,
                Some("toml") => Self::from_toml_str,
                _ => {
                    return Err(ConfigError::UnsupportedFormat {
                        path: path.to_path_buf(),
                    })
                }
            };
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = parse(&document, &content)?;
        tracing::info!(
            "Loaded controller `{}` from {} ({} inputs, {} rules)",
            config.name,
            document,
            config.engine.inputs().len(),
            config.engine.rules().len()
        );
        Ok(config)
    }

    /// Find `{stem}.json` (preferred) or `{stem}.toml` in `dir` and load it.
    pub fn resolve<P: AsRef<Path>>(dir: P, stem: &str) -> ConfigResult<Self> {
        let dir = dir.as_ref();
        let candidate = ["json", "toml"]
            .iter()
            .map(|ext| dir.join(format!("{stem}.{ext}")))
            .find(|p| p.is_file());
        match candidate {
            Some(path) => Self::load(path),
            None => Err(ConfigError::MissingDocument {
                dir: PathBuf::from(dir),
                stem: stem.to_string(),
            }),
        }
    }
}

fn build_variable(
    document: &str,
    prefix: &str,
    name: &str,
    range: &[f64],
    sets: BTreeMap<String, SetDocument>,
) -> ConfigResult<FuzzyVariable> {
    let domain = Domain::from_range(range)
        .map_err(|e| ConfigError::invalid(document, format!("{prefix}.range"), e))?;
    let sets = sets
        .into_iter()
        .map(|(label, set)| {
            MembershipFunction::from_spec(&set.kind, &set.params)
                .map(|mf| (label.clone(), mf))
                .map_err(|e| ConfigError::invalid(document, format!("{prefix}.sets.{label}"), e))
        })
        .collect::<ConfigResult<Vec<_>>>()?;
    FuzzyVariable::new(name, domain, sets)
        .map_err(|e| ConfigError::invalid(document, format!("{prefix}.sets"), e))
}

// ============================================================================
// Tests
// ============================================================================
