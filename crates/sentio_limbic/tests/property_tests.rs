//! Property-based tests for sentio_limbic.
//!
//! Verifies that body_speed always stays within the configured limits no
//! matter what expressions and measured speeds arrive, and that boosts decay
//! linearly and terminate.

use proptest::prelude::*;
use sentio_limbic::{
    BoostProfile, BoostState, EmotionalManager, Personality, SpeedLimits, TickUpdate,
};
use std::path::Path;
use std::sync::OnceLock;

fn template(personality: Personality) -> EmotionalManager {
    static SHY: OnceLock<EmotionalManager> = OnceLock::new();
    static INTENSE: OnceLock<EmotionalManager> = OnceLock::new();
    let cell = match personality {
        Personality::Shy => &SHY,
        Personality::Intense => &INTENSE,
    };
    cell.get_or_init(|| {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../controllers");
        EmotionalManager::new(dir, personality).unwrap()
    })
    .clone()
}

// ============================================================================
// Strategies
// ============================================================================

fn arb_personality() -> impl Strategy<Value = Personality> {
    prop_oneof![Just(Personality::Shy), Just(Personality::Intense)]
}

/// Mostly valid codes, sometimes garbage.
fn arb_code() -> impl Strategy<Value = i32> {
    prop_oneof![4 => 0i32..=6, 1 => -20i32..40]
}

fn arb_update() -> impl Strategy<Value = TickUpdate> {
    (
        proptest::option::of(arb_code()),
        proptest::option::of(-2.0f64..3.0),
    )
        .prop_map(|(expression, measured_speed)| TickUpdate {
            expression,
            measured_speed,
        })
}

fn arb_profile() -> impl Strategy<Value = BoostProfile> {
    (-1.0f64..1.0, 1u32..12).prop_map(|(d, n)| BoostProfile::new(d, n))
}

// ============================================================================
// Manager properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// **Core invariant**: body_speed never leaves [min_speed, max_speed].
    #[test]
    fn body_speed_always_within_limits(
        personality in arb_personality(),
        updates in prop::collection::vec(arb_update(), 1..30),
    ) {
        let mut m = template(personality);
        let SpeedLimits { min, max } = m.speed_limits();
        for update in updates {
            let out = m.compute(update);
            prop_assert!(
                (min..=max).contains(&out.body_speed),
                "body_speed {} outside [{}, {}]", out.body_speed, min, max
            );
            prop_assert_eq!(out.body_speed, m.state().body_speed);
        }
    }

    /// Every tick yields four finite outputs and no faults for the bundled rules.
    #[test]
    fn bundled_outputs_are_finite(
        personality in arb_personality(),
        updates in prop::collection::vec(arb_update(), 1..30),
    ) {
        let mut m = template(personality);
        for update in updates {
            let out = m.compute(update);
            prop_assert!(out.mood.is_finite() && out.alertness.is_finite() && out.tuning.is_finite());
            prop_assert!(m.last_faults().is_empty(), "{:?}", m.last_faults());
        }
    }

    /// Repeating the same expression never re-arms: the boost only decays.
    #[test]
    fn repeated_expression_only_decays(
        personality in arb_personality(),
        code in 0i32..=6,
        repeats in 1usize..8,
    ) {
        let mut m = template(personality);
        m.compute(TickUpdate::code(code));
        let mut remaining = m.boost_state().steps_remaining();
        for _ in 0..repeats {
            m.compute(TickUpdate::code(code));
            let now = m.boost_state().steps_remaining();
            prop_assert!(now == remaining.saturating_sub(1));
            remaining = now;
        }
    }
}

// ============================================================================
// Boost properties
// ============================================================================

proptest! {
    /// Decay is linear, lasts exactly N ticks and ends inactive.
    #[test]
    fn boost_decays_linearly_and_terminates(profile in arb_profile()) {
        let mut boost = BoostState::default();
        boost.arm(profile);
        let n = profile.steps;

        let mut previous = f64::INFINITY;
        for tick in 0..n {
            prop_assert!(boost.is_active(), "inactive before tick {}", tick);
            let delta = boost.step().unwrap();
            let expected = profile.speed_delta * f64::from(n - tick) / f64::from(n);
            prop_assert!((delta - expected).abs() < 1e-12);
            if profile.speed_delta != 0.0 {
                prop_assert!(delta.abs() < previous);
            }
            previous = delta.abs();
        }
        prop_assert!(!boost.is_active());
        prop_assert_eq!(boost, BoostState::default());
        prop_assert_eq!(boost.step(), None);
    }

    /// Re-arming replaces the boost completely.
    #[test]
    fn rearm_discards_remainder(
        first in arb_profile(),
        second in arb_profile(),
        elapsed in 0u32..12,
    ) {
        let mut boost = BoostState::default();
        boost.arm(first);
        for _ in 0..elapsed {
            boost.step();
        }
        boost.arm(second);
        prop_assert_eq!(boost.initial_delta(), second.speed_delta);
        prop_assert_eq!(boost.steps_remaining(), second.steps);
        prop_assert_eq!(boost.total_steps(), second.steps);
        prop_assert_eq!(boost.step(), Some(second.speed_delta));
    }
}
