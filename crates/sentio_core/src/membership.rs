//! Membership functions
//!
//! A closed set of shapes, resolved once when a controller document is
//! loaded. Kind names follow the scikit-fuzzy vocabulary (`trimf`, `trapmf`,
//! ...) with a few descriptive aliases (`triangular`, `gaussian`, ...).

use crate::error::DefinitionError;
use serde::Serialize;

/// A membership function: maps a crisp value to a degree of truth in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MembershipFunction {
    /// Triangle with feet `a`, `c` and peak `b` (`a <= b <= c`).
    /// `a == b` or `b == c` gives a shoulder.
    Triangular { a: f64, b: f64, c: f64 },
    /// Trapezoid with feet `a`, `d` and plateau `[b, c]`.
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
    Gaussian { mean: f64, sigma: f64 },
    /// Gaussian left flank up to `mean1`, plateau at 1, Gaussian right flank from `mean2`.
    Gaussian2 {
        mean1: f64,
        sigma1: f64,
        mean2: f64,
        sigma2: f64,
    },
    /// Generalized bell: `1 / (1 + |(x - center) / width|^(2 * slope))`.
    Bell { width: f64, slope: f64, center: f64 },
    /// `1 / (1 + exp(-slope * (x - center)))`
    Sigmoid { center: f64, slope: f64 },
    /// Difference of two sigmoids.
    SigmoidDifference {
        center1: f64,
        slope1: f64,
        center2: f64,
        slope2: f64,
    },
    /// Product of two sigmoids.
    SigmoidProduct {
        center1: f64,
        slope1: f64,
        center2: f64,
        slope2: f64,
    },
    /// Spline-based S curve rising from `a` to `b`.
    SCurve { a: f64, b: f64 },
    /// Spline-based Z curve falling from `a` to `b`.
    ZCurve { a: f64, b: f64 },
    /// Pi curve: S rising over `[a, b]`, plateau, Z falling over `[c, d]`.
    Pi { a: f64, b: f64, c: f64, d: f64 },
}

impl MembershipFunction {
    /// Resolve a membership function from its document form: a kind name and
    /// a flat parameter list.
    pub fn from_spec(kind: &str, params: &[f64]) -> Result<Self, DefinitionError> {
        let arity = |expected: usize| -> Result<(), DefinitionError> {
            if params.len() == expected {
                Ok(())
            } else {
                Err(DefinitionError::MembershipArity {
                    kind: kind.to_string(),
                    expected,
                    found: params.len(),
                })
            }
        };
        let invalid = |reason: &str| DefinitionError::InvalidMembership {
            kind: kind.to_string(),
            reason: reason.to_string(),
        };

        if let Some(bad) = params.iter().find(|p| !p.is_finite()) {
            return Err(invalid(&format!("parameter {bad} is not finite")));
        }

        let mf = match kind {
            "trimf" | "triangular" => {
                arity(3)?;
                let (a, b, c) = (params[0], params[1], params[2]);
                if !(a <= b && b <= c) {
                    return Err(invalid("requires a <= b <= c"));
                }
                Self::Triangular { a, b, c }
            }
            "trapmf" | "trapezoidal" => {
                arity(4)?;
                let (a, b, c, d) = (params[0], params[1], params[2], params[3]);
                if !(a <= b && b <= c && c <= d) {
                    return Err(invalid("requires a <= b <= c <= d"));
                }
                Self::Trapezoidal { a, b, c, d }
            }
            "gaussmf" | "gaussian" => {
                arity(2)?;
                if params[1] <= 0.0 {
                    return Err(invalid("sigma must be > 0"));
                }
                Self::Gaussian {
                    mean: params[0],
                    sigma: params[1],
                }
            }
            "gauss2mf" => {
                arity(4)?;
                if params[1] <= 0.0 || params[3] <= 0.0 {
                    return Err(invalid("sigmas must be > 0"));
                }
                if params[0] > params[2] {
                    return Err(invalid("requires mean1 <= mean2"));
                }
                Self::Gaussian2 {
                    mean1: params[0],
                    sigma1: params[1],
                    mean2: params[2],
                    sigma2: params[3],
                }
            }
            "gbellmf" | "bell" => {
                arity(3)?;
                if params[0] == 0.0 {
                    return Err(invalid("width must be non-zero"));
                }
                Self::Bell {
                    width: params[0],
                    slope: params[1],
                    center: params[2],
                }
            }
            "sigmf" | "sigmoid" => {
                arity(2)?;
                Self::Sigmoid {
                    center: params[0],
                    slope: params[1],
                }
            }
            "dsigmf" => {
                arity(4)?;
                Self::SigmoidDifference {
                    center1: params[0],
                    slope1: params[1],
                    center2: params[2],
                    slope2: params[3],
                }
            }
            "psigmf" => {
                arity(4)?;
                Self::SigmoidProduct {
                    center1: params[0],
                    slope1: params[1],
                    center2: params[2],
                    slope2: params[3],
                }
            }
            "smf" => {
                arity(2)?;
                if params[0] > params[1] {
                    return Err(invalid("requires a <= b"));
                }
                Self::SCurve {
                    a: params[0],
                    b: params[1],
                }
            }
            "zmf" => {
                arity(2)?;
                if params[0] > params[1] {
                    return Err(invalid("requires a <= b"));
                }
                Self::ZCurve {
                    a: params[0],
                    b: params[1],
                }
            }
            "pimf" => {
                arity(4)?;
                let (a, b, c, d) = (params[0], params[1], params[2], params[3]);
                if !(a <= b && b <= c && c <= d) {
                    return Err(invalid("requires a <= b <= c <= d"));
                }
                Self::Pi { a, b, c, d }
            }
            other => {
                return Err(DefinitionError::UnknownMembership {
                    kind: other.to_string(),
                })
            }
        };
        Ok(mf)
    }

    /// Degree of membership of `x`. Always in [0, 1]; a NaN input or
    /// result maps to 0.
    pub fn evaluate(&self, x: f64) -> f64 {
        if x.is_nan() {
            return 0.0;
        }
        let raw = match *self {
            Self::Triangular { a, b, c } => triangle(x, a, b, c),
            Self::Trapezoidal { a, b, c, d } => {
                if x < b {
                    triangle(x, a, b, b)
                } else if x > c {
                    triangle(x, c, c, d)
                } else {
                    1.0
                }
            }
            Self::Gaussian { mean, sigma } => gauss(x, mean, sigma),
            Self::Gaussian2 {
                mean1,
                sigma1,
                mean2,
                sigma2,
            } => {
                if x < mean1 {
                    gauss(x, mean1, sigma1)
                } else if x > mean2 {
                    gauss(x, mean2, sigma2)
                } else {
                    1.0
                }
            }
            Self::Bell {
                width,
                slope,
                center,
            } => 1.0 / (1.0 + ((x - center) / width).abs().powf(2.0 * slope)),
            Self::Sigmoid { center, slope } => sigmoid(x, center, slope),
            Self::SigmoidDifference {
                center1,
                slope1,
                center2,
                slope2,
            } => sigmoid(x, center1, slope1) - sigmoid(x, center2, slope2),
            Self::SigmoidProduct {
                center1,
                slope1,
                center2,
                slope2,
            } => sigmoid(x, center1, slope1) * sigmoid(x, center2, slope2),
            Self::SCurve { a, b } => s_curve(x, a, b),
            Self::ZCurve { a, b } => 1.0 - s_curve(x, a, b),
            Self::Pi { a, b, c, d } => {
                if x < b {
                    s_curve(x, a, b)
                } else if x > c {
                    1.0 - s_curve(x, c, d)
                } else {
                    1.0
                }
            }
        };
        if raw.is_nan() {
            0.0
        } else {
            raw.clamp(0.0, 1.0)
        }
    }
}

fn triangle(x: f64, a: f64, b: f64, c: f64) -> f64 {
    if x == b {
        1.0
    } else if x > a && x < b {
        (x - a) / (b - a)
    } else if x > b && x < c {
        (c - x) / (c - b)
    } else {
        0.0
    }
}

fn gauss(x: f64, mean: f64, sigma: f64) -> f64 {
    (-(x - mean).powi(2) / (2.0 * sigma.powi(2))).exp()
}

fn sigmoid(x: f64, center: f64, slope: f64) -> f64 {
    1.0 / (1.0 + (-slope * (x - center)).exp())
}

fn s_curve(x: f64, a: f64, b: f64) -> f64 {
    if x <= a {
        0.0
    } else if x >= b {
        1.0
    } else if x <= (a + b) / 2.0 {
        2.0 * ((x - a) / (b - a)).powi(2)
    } else {
        1.0 - 2.0 * ((x - b) / (b - a)).powi(2)
    }
}
