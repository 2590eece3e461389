//! Discrete facial expressions and the personality profiles that react to
//! them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Facial expression as reported by the perception stack. Codes are fixed:
/// `0 = neutral` through `6 = angry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expression {
    Neutral,
    Happy,
    Sad,
    Surprise,
    Disgust,
    Fear,
    Angry,
}

impl Expression {
    pub const ALL: [Expression; 7] = [
        Expression::Neutral,
        Expression::Happy,
        Expression::Sad,
        Expression::Surprise,
        Expression::Disgust,
        Expression::Fear,
        Expression::Angry,
    ];

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Expression::Neutral => "neutral",
            Expression::Happy => "happy",
            Expression::Sad => "sad",
            Expression::Surprise => "surprise",
            Expression::Disgust => "disgust",
            Expression::Fear => "fear",
            Expression::Angry => "angry",
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Expression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == wanted)
            .ok_or_else(|| format!("unknown expression `{}`", s.trim()))
    }
}

/// Personality profile: selects both the controller documents and the boost
/// magnitudes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    #[default]
    Shy,
    Intense,
}

impl Personality {
    pub const ALL: [Personality; 2] = [Personality::Shy, Personality::Intense];

    pub fn as_str(self) -> &'static str {
        match self {
            Personality::Shy => "shy",
            Personality::Intense => "intense",
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Personality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shy" => Ok(Personality::Shy),
            "intense" => Ok(Personality::Intense),
            other => Err(format!(
                "invalid personality `{other}` (use `shy` or `intense`)"
            )),
        }
    }
}
