//! Property-based tests for sentio_core.
//!
//! Membership functions stay in [0, 1], inference is deterministic and does
//! not depend on rule order, and boundary inputs never produce NaN.

use proptest::prelude::*;
use sentio_core::{
    CrispInputs, Domain, FuzzyVariable, InferenceEngine, MembershipFunction, Rule, RuleBase,
};

// ============================================================================
// Strategies
// ============================================================================

fn sorted3() -> impl Strategy<Value = [f64; 3]> {
    prop::array::uniform3(-100.0f64..100.0).prop_map(|mut v| {
        v.sort_by(|a, b| a.total_cmp(b));
        v
    })
}

fn sorted4() -> impl Strategy<Value = [f64; 4]> {
    prop::array::uniform4(-100.0f64..100.0).prop_map(|mut v| {
        v.sort_by(|a, b| a.total_cmp(b));
        v
    })
}

fn arb_membership() -> impl Strategy<Value = MembershipFunction> {
    prop_oneof![
        sorted3().prop_map(|p| MembershipFunction::from_spec("trimf", &p).unwrap()),
        sorted4().prop_map(|p| MembershipFunction::from_spec("trapmf", &p).unwrap()),
        sorted4().prop_map(|p| MembershipFunction::from_spec("pimf", &p).unwrap()),
        (-100.0f64..100.0, 0.01f64..50.0)
            .prop_map(|(m, s)| MembershipFunction::from_spec("gaussmf", &[m, s]).unwrap()),
        (-100.0f64..100.0, -10.0f64..10.0)
            .prop_map(|(c, k)| MembershipFunction::from_spec("sigmf", &[c, k]).unwrap()),
        (0.1f64..50.0, 0.0f64..5.0, -100.0f64..100.0)
            .prop_map(|(a, b, c)| MembershipFunction::from_spec("gbellmf", &[a, b, c]).unwrap()),
        (-100.0f64..100.0, -5.0f64..5.0, -100.0f64..100.0, -5.0f64..5.0).prop_map(
            |(c1, k1, c2, k2)| MembershipFunction::from_spec("dsigmf", &[c1, k1, c2, k2]).unwrap()
        ),
    ]
}

fn tri(a: f64, b: f64, c: f64) -> MembershipFunction {
    MembershipFunction::from_spec("trimf", &[a, b, c]).unwrap()
}

fn variable(name: &str, labels: &[(&str, MembershipFunction)]) -> FuzzyVariable {
    FuzzyVariable::new(
        name,
        Domain::new(0.0, 101.0, 1.0).unwrap(),
        labels
            .iter()
            .map(|(l, mf)| (l.to_string(), mf.clone()))
            .collect(),
    )
    .unwrap()
}

fn three_levels(name: &str) -> FuzzyVariable {
    variable(
        name,
        &[
            ("low", tri(0.0, 0.0, 50.0)),
            ("medium", tri(25.0, 50.0, 75.0)),
            ("high", tri(50.0, 100.0, 100.0)),
        ],
    )
}

fn rule_set() -> Vec<Rule> {
    vec![
        Rule::when(&[("a", "low"), ("b", "low")], "low"),
        Rule::when(&[("a", "low"), ("b", "high")], "medium"),
        Rule::when(&[("a", "medium")], "medium"),
        Rule::when(&[("a", "high"), ("b", "medium")], "high"),
        Rule::when(&[("a", "high"), ("b", "high")], "high"),
        Rule::when(&[("b", "low")], "low"),
        Rule::when(&[("b", "medium"), ("a", "low")], "medium"),
    ]
}

fn engine_with(rules: Vec<Rule>) -> InferenceEngine {
    InferenceEngine::new(
        vec![three_levels("a"), three_levels("b")],
        three_levels("out"),
        RuleBase::new(rules),
    )
    .unwrap()
}

fn crisp(a: f64, b: f64) -> CrispInputs {
    [("a".to_string(), a), ("b".to_string(), b)]
        .into_iter()
        .collect()
}

// ============================================================================
// Membership properties
// ============================================================================

proptest! {
    /// **Core invariant**: every membership function maps every input into [0, 1].
    #[test]
    fn membership_always_in_unit_interval(mf in arb_membership(), x in -1000.0f64..1000.0) {
        let y = mf.evaluate(x);
        prop_assert!(y.is_finite(), "{:?} at {} gave {}", mf, x, y);
        prop_assert!((0.0..=1.0).contains(&y), "{:?} at {} gave {}", mf, x, y);
    }

    /// Extreme inputs are handled as well.
    #[test]
    fn membership_handles_extremes(mf in arb_membership()) {
        for x in [f64::MIN, f64::MAX, f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let y = mf.evaluate(x);
            prop_assert!((0.0..=1.0).contains(&y), "{:?} at {} gave {}", mf, x, y);
        }
    }
}

// ============================================================================
// Inference properties
// ============================================================================

proptest! {
    /// Identical inputs and configuration give bit-identical outputs.
    #[test]
    fn inference_is_deterministic(a in 0.0f64..100.0, b in 0.0f64..100.0) {
        let engine = engine_with(rule_set());
        let first = engine.evaluate(&crisp(a, b));
        for _ in 0..3 {
            let again = engine.evaluate(&crisp(a, b));
            match (&first, &again) {
                (Ok(x), Ok(y)) => prop_assert_eq!(x.to_bits(), y.to_bits()),
                (Err(x), Err(y)) => prop_assert_eq!(x, y),
                _ => prop_assert!(false, "outcome changed between calls"),
            }
        }
    }

    /// Permuting the rule base never changes activations or the crisp output.
    #[test]
    fn rule_order_does_not_matter(
        shuffled in Just(rule_set()).prop_shuffle(),
        a in 0.0f64..100.0,
        b in 0.0f64..100.0,
    ) {
        let reference = engine_with(rule_set());
        let permuted = engine_with(shuffled);
        let inputs = crisp(a, b);

        prop_assert_eq!(
            reference.activations(&inputs).unwrap(),
            permuted.activations(&inputs).unwrap()
        );
        let x = reference.evaluate(&inputs).unwrap();
        let y = permuted.evaluate(&inputs).unwrap();
        prop_assert_eq!(x.to_bits(), y.to_bits());
    }

    /// The centroid always lies inside the sampled output domain.
    #[test]
    fn output_within_domain(a in -50.0f64..150.0, b in -50.0f64..150.0) {
        let engine = engine_with(rule_set());
        if let Ok(y) = engine.evaluate(&crisp(a, b)) {
            prop_assert!((0.0..=100.0).contains(&y), "output {} out of domain", y);
        }
    }
}

// ============================================================================
// Boundary behaviour
// ============================================================================

#[test]
fn boundary_between_adjacent_triangles_is_consistent() {
    // `low` ends where `high` starts.
    let var = variable(
        "x",
        &[("low", tri(0.0, 25.0, 50.0)), ("high", tri(50.0, 75.0, 100.0))],
    );
    let at_boundary = var.fuzzify(50.0);
    assert!(at_boundary.iter().all(|d| d.is_finite()));
    assert_eq!(at_boundary, vec![0.0, 0.0]);

    // Overlapping neighbours give partial membership in both.
    let var = variable(
        "x",
        &[("low", tri(0.0, 25.0, 60.0)), ("high", tri(40.0, 75.0, 100.0))],
    );
    let degrees = var.fuzzify(50.0);
    assert!(degrees[0] > 0.0 && degrees[0] < 1.0);
    assert!(degrees[1] > 0.0 && degrees[1] < 1.0);
    assert!(((60.0 - 50.0) / 35.0 - degrees[0]).abs() < 1e-12);
    assert!(((50.0 - 40.0) / 35.0 - degrees[1]).abs() < 1e-12);
}

#[test]
fn domain_edges_fuzzify_without_nan() {
    let var = three_levels("x");
    for x in [0.0, 100.0, 101.0, -1.0] {
        let degrees = var.fuzzify(x);
        assert!(degrees.iter().all(|d| d.is_finite() && (0.0..=1.0).contains(d)));
    }
}
