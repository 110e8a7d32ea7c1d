//! Property tests for the guarded probability primitives.

use proptest::prelude::*;
use sentinel_math::{interpolate, wilson_interval, ConfidenceLevel};

fn level() -> impl Strategy<Value = ConfidenceLevel> {
    prop_oneof![
        Just(ConfidenceLevel::P90),
        Just(ConfidenceLevel::P95),
        Just(ConfidenceLevel::P99),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn wilson_contains_p_and_stays_in_unit(p in 0.0f64..=1.0, n in 0.0f64..10_000.0, level in level()) {
        let ci = wilson_interval(p, n, level);
        prop_assert!(ci.lower >= 0.0);
        prop_assert!(ci.upper <= 1.0);
        prop_assert!(ci.contains(p), "p={} ci={:?}", p, ci);
        prop_assert!(ci.width >= 0.0);
    }

    #[test]
    fn wilson_shrinks_with_more_samples(p in 0.05f64..0.95, n in 10.0f64..1_000.0) {
        let small = wilson_interval(p, n, ConfidenceLevel::P95);
        let large = wilson_interval(p, n * 4.0, ConfidenceLevel::P95);
        prop_assert!(large.width <= small.width + 1e-12);
    }

    #[test]
    fn interpolation_stays_within_knot_range(x in -0.5f64..1.5) {
        let knots = [(0.1, 0.05), (0.4, 0.3), (0.7, 0.8), (0.9, 0.95)];
        let y = interpolate(&knots, x);
        prop_assert!((0.05..=0.95).contains(&y));
    }
}
