//! Integration tests for the emotional manager pipeline, against the bundled
//! controller documents and against small documents written to temp dirs.

use sentio_core::{ConfigError, InferenceError};
use sentio_limbic::{
    Axis, EmotionalManager, Expression, ManagerConfig, Personality, PlannerParams, TickUpdate,
};
use std::path::{Path, PathBuf};

fn bundled_controllers() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../controllers")
}

/// Single-input controller whose only rule always fires.
fn flat_doc(name: &str, input: &str, out_range: &str, peak: f64) -> String {
    format!(
        r#"{{
            "name": "{name}",
            "initial_value": 0,
            "inputs": {{
                "{input}": {{ "range": [0, 101, 1], "sets": {{ "any": ["trapmf", 0, 0, 100, 100] }} }}
            }},
            "output": {{
                "range": {out_range},
                "sets": {{ "mid": ["trimf", [{lo}, {peak}, {hi}]] }}
            }},
            "rules": [ {{ "if": [["{input}", "any"]], "then": "mid" }} ],
            "mapping": [[0, 40, "low"], [40, 60, "medium"], [60, 100, "high"]]
        }}"#,
        lo = peak - 10.0,
        hi = peak + 10.0,
    )
}

/// Write four shy documents; `body_speed` listens to a name nobody offers.
fn write_scenario_docs(dir: &Path) {
    let docs = [
        ("mood_shy.json", flat_doc("mood", "expression", "[0, 101, 1]", 50.0)),
        (
            "body_speed_shy.json",
            flat_doc("body_speed", "unrelated", "[0, 101, 1]", 50.0),
        ),
        ("alertness_shy.json", flat_doc("alertness", "_expression", "[0, 101, 1]", 70.0)),
        ("tuning_shy.json", flat_doc("tuning", "alertness", "[0, 101, 1]", 30.0)),
    ];
    for (file, content) in docs {
        std::fs::write(dir.join(file), content).unwrap();
    }
}

#[test]
fn shy_boost_scenario() {
    let dir = tempfile::tempdir().unwrap();
    write_scenario_docs(dir.path());
    let mut m = EmotionalManager::new(dir.path(), Personality::Shy).unwrap();

    let out = m.compute(TickUpdate::expression(Expression::Neutral));
    assert_eq!(out.body_speed, 0.3);
    assert!(!m.boost_state().is_active());

    // First happy: armed {0.12, 3} and applied in full.
    let out = m.compute(TickUpdate::expression(Expression::Happy));
    assert!((out.body_speed - 0.42).abs() < 1e-12);
    assert_eq!(m.boost_state().initial_delta(), 0.12);
    assert_eq!(m.boost_state().steps_remaining(), 2);
    assert_eq!(m.boost_state().total_steps(), 3);

    // Repeated happy: no re-arm, factor 2/3.
    let out = m.compute(TickUpdate::expression(Expression::Happy));
    assert!((out.body_speed - 0.50).abs() < 1e-12);
    assert_eq!(m.boost_state().steps_remaining(), 1);

    // Sad: re-armed {-0.08, 2}, nothing left of the happy boost.
    let out = m.compute(TickUpdate::expression(Expression::Sad));
    assert!((out.body_speed - 0.42).abs() < 1e-12);
    assert_eq!(m.boost_state().initial_delta(), -0.08);
    assert_eq!(m.boost_state().steps_remaining(), 1);
    assert_eq!(m.boost_state().total_steps(), 2);

    let out = m.compute(TickUpdate::default());
    assert!((out.body_speed - 0.38).abs() < 1e-12);
    assert!(!m.boost_state().is_active());
    assert_eq!(m.state().expression, Expression::Sad.code());
}

#[test]
fn unmatched_controller_never_moves() {
    let dir = tempfile::tempdir().unwrap();
    write_scenario_docs(dir.path());
    let mut m = EmotionalManager::new(dir.path(), Personality::Shy).unwrap();

    for _ in 0..20 {
        let out = m.compute(TickUpdate::default().with_speed(0.9));
        assert_eq!(out.body_speed, 0.3);
    }
    assert_eq!(m.controller(Axis::BodySpeed).last_output(), 0.0);
    assert!(m.last_faults().is_empty());
}

#[test]
fn no_rule_fired_keeps_axis_and_spares_others() {
    let dir = tempfile::tempdir().unwrap();
    write_scenario_docs(dir.path());
    // Tuning only reacts to a narrow alertness band that 70 never reaches.
    let tuning = r#"{
        "name": "tuning",
        "inputs": { "alertness": { "range": [0, 101, 1], "sets": { "low": ["trimf", [0, 5, 10]] } } },
        "output": { "range": [0, 101, 1], "sets": { "low": ["trimf", [0, 0, 50]] } },
        "rules": [ { "if": [["alertness", "low"]], "then": "low" } ]
    }"#;
    std::fs::write(dir.path().join("tuning_shy.json"), tuning).unwrap();

    let mut m = EmotionalManager::new(dir.path(), Personality::Shy).unwrap();
    let out = m.compute(TickUpdate::expression(Expression::Fear));

    assert_eq!(out.tuning, 50.0);
    assert!((out.alertness - 70.0).abs() < 1e-9);
    assert!((out.mood - 50.0).abs() < 1e-9);
    assert_eq!(m.last_faults().len(), 1);
    assert_eq!(m.last_faults()[0].axis, Axis::Tuning);
    assert_eq!(
        m.last_faults()[0].error,
        InferenceError::NoRuleFired {
            controller: "tuning".to_string()
        }
    );
}

#[test]
fn map_output_per_axis() {
    let dir = tempfile::tempdir().unwrap();
    write_scenario_docs(dir.path());
    let m = EmotionalManager::new(dir.path(), Personality::Shy).unwrap();

    assert_eq!(m.map_output(Axis::Tuning, 10.0), Some("low"));
    assert_eq!(m.map_output(Axis::Tuning, 40.0), Some("low"));
    assert_eq!(m.map_output(Axis::Tuning, 59.0), Some("medium"));
    assert_eq!(m.map_output(Axis::Mood, 150.0), None);
}

#[test]
fn toml_documents_resolve_when_json_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    write_scenario_docs(dir.path());
    std::fs::remove_file(dir.path().join("mood_shy.json")).unwrap();
    let toml_doc = r#"
name = "mood"
initial_value = 40.0

[inputs.mood]
range = [0, 101, 1]
sets = { low = ["trimf", 0, 0, 80], high = ["trimf", 60, 100, 100] }

[output]
range = [0, 101, 1]
sets = { sad = ["trimf", [0, 0, 50]], happy = ["trimf", [50, 100, 100]] }

[[rules]]
if = [["mood", "low"]]
then = "sad"

[[rules]]
if = [["mood", "high"]]
then = "happy"
"#;
    std::fs::write(dir.path().join("mood_shy.toml"), toml_doc).unwrap();

    let mut m = EmotionalManager::new(dir.path(), Personality::Shy).unwrap();
    assert_eq!(m.controller(Axis::Mood).config().initial_value(), 40.0);
    let out = m.compute(TickUpdate::expression(Expression::Happy));
    assert!(out.mood < 50.0);
}

#[test]
fn missing_document_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    write_scenario_docs(dir.path());
    let err = EmotionalManager::new(dir.path(), Personality::Intense).unwrap_err();
    match err {
        ConfigError::MissingDocument { stem, .. } => assert_eq!(stem, "mood_intense"),
        other => panic!("expected MissingDocument, got {other:?}"),
    }
}

#[test]
fn malformed_document_names_document_and_field() {
    let dir = tempfile::tempdir().unwrap();
    write_scenario_docs(dir.path());
    let bad = flat_doc("alertness", "_expression", "[0, 101, 1]", 70.0).replace("trimf", "wobblemf");
    std::fs::write(dir.path().join("alertness_shy.json"), bad).unwrap();

    let msg = EmotionalManager::new(dir.path(), Personality::Shy)
        .unwrap_err()
        .to_string();
    assert!(msg.contains("alertness_shy.json"), "{msg}");
    assert!(msg.contains("output.sets.mid"), "{msg}");
    assert!(msg.contains("wobblemf"), "{msg}");
}

// ============================================================================
// Bundled controllers
// ============================================================================

#[test]
fn bundled_controllers_load_for_every_personality() {
    for personality in Personality::ALL {
        let m = EmotionalManager::new(bundled_controllers(), personality).unwrap();
        assert_eq!(m.personality(), personality);
        for axis in Axis::ALL {
            assert_eq!(m.controller(axis).name(), axis.as_str());
        }
    }
}

#[test]
fn bundled_controllers_run_the_demo_sequence() {
    let sequence = [0, 1, 2, 3, 4, 5, 6, 1, 0];
    for personality in Personality::ALL {
        let mut m = EmotionalManager::new(bundled_controllers(), personality).unwrap();
        for &code in sequence.iter().cycle().take(36) {
            let out = m.compute(TickUpdate::code(code));
            assert!(m.last_faults().is_empty(), "{:?}", m.last_faults());
            assert!((0.0..=1.0).contains(&out.body_speed));
            for axis in [Axis::Mood, Axis::Alertness, Axis::Tuning] {
                let v = out.get(axis);
                assert!((0.0..=100.0).contains(&v), "{axis} = {v}");
                assert!(m.map_output(axis, v).is_some(), "{axis} = {v} unmapped");
            }
            let label = m.map_output(Axis::Tuning, out.tuning);
            let params = PlannerParams::for_tuning_label(label);
            assert!(params.max_angular_velocity >= 0.5);
        }
    }
}

#[test]
fn bundled_mood_follows_expression() {
    let mut happy = EmotionalManager::new(bundled_controllers(), Personality::Shy).unwrap();
    let mut sad = happy.clone();
    for _ in 0..15 {
        happy.compute(TickUpdate::expression(Expression::Happy));
        sad.compute(TickUpdate::expression(Expression::Sad));
    }
    assert!(happy.state().mood > 50.0);
    assert!(sad.state().mood < 50.0);
}

#[test]
fn sample_config_builds_a_manager() {
    let config = ManagerConfig::load(bundled_controllers().join("sentio.toml")).unwrap();
    let mut m = EmotionalManager::from_config(&config).unwrap();
    let out = m.compute(TickUpdate::expression(Expression::Fear).with_speed(0.4));
    assert!((0.0..=1.0).contains(&out.body_speed));
    assert_eq!(m.boost_state().initial_delta(), -0.18);
}
