#![allow(unused)]
//! Scaler integration harness.
//!
//! # What this covers
//!
//! - **Bounds**: every radius for any reference value (and any sample value)
//!   lies in `[r_min, r_max]`, including magnitudes near `f64::MAX`.
//! - **Missing input**: `None` and NaN always give the midpoint.
//! - **Empty reference**: a scaler fitted on nothing is constant.
//! - **Monotonicity**: inside the fitted domain, larger values never shrink.
//! - **Clamping**: far outliers map exactly onto `r_min` / `r_max`.
//! - **Outlier robustness**: a skewed distribution keeps the bulk of values
//!   spread over the radius range.
//!
//! # Running
//!
//! ```sh
//! cargo test --test scaler_harness
//! PROPTEST_CASES=10000 cargo test --test scaler_harness
//! ```

mod common;
use biomap_core::scaler::{percentile, LOWER_QUANTILE, UPPER_QUANTILE};
use biomap_core::Scaler;
use common::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const R_MIN: f64 = 5.0;
const R_MAX: f64 = 16.0;

fn reference_values() -> impl Strategy<Value = Vec<Option<f64>>> {
    prop::collection::vec(
        prop_oneof![
            8 => (-1.0e6..1.0e6f64).prop_map(Some),
            1 => Just(None),
            1 => Just(Some(f64::INFINITY)),
        ],
        0..64,
    )
}

/// Any normal float, with the two ends of the f64 range over-represented.
fn extreme_values() -> impl Strategy<Value = Vec<Option<f64>>> {
    prop::collection::vec(
        prop_oneof![
            6 => prop::num::f64::NORMAL.prop_map(Some),
            1 => Just(Some(f64::MAX)),
            1 => Just(Some(f64::MIN)),
            1 => Just(None),
        ],
        0..32,
    )
}

proptest! {
    #[test]
    fn radius_stays_within_range_at_extreme_magnitudes(
        values in extreme_values(),
        sample in prop::num::f64::NORMAL,
    ) {
        let scaler = Scaler::fit(values.clone(), R_MIN, R_MAX);
        if let Some((lo, hi)) = scaler.domain() {
            prop_assert!(lo.is_finite() && hi.is_finite() && lo < hi);
        }
        for v in values.iter().flatten() {
            assert_radius_within!(scaler.scale(Some(*v)), R_MIN, R_MAX);
        }
        assert_radius_within!(scaler.scale(Some(sample)), R_MIN, R_MAX);
    }

    #[test]
    fn radius_stays_within_range(values in reference_values(), sample in -1.0e7..1.0e7f64) {
        let scaler = Scaler::fit(values.clone(), R_MIN, R_MAX);
        for v in values.iter().flatten() {
            assert_radius_within!(scaler.scale(Some(*v)), R_MIN, R_MAX);
        }
        assert_radius_within!(scaler.scale(Some(sample)), R_MIN, R_MAX);
    }

    #[test]
    fn missing_is_always_midpoint(values in reference_values()) {
        let scaler = Scaler::fit(values, R_MIN, R_MAX);
        prop_assert_eq!(scaler.scale(None), 10.5);
        prop_assert_eq!(scaler.scale(Some(f64::NAN)), 10.5);
    }

    #[test]
    fn monotone_inside_domain(values in reference_values(), a in 0.0..1.0f64, b in 0.0..1.0f64) {
        let scaler = Scaler::fit(values, R_MIN, R_MAX);
        if let Some((lo, hi)) = scaler.domain() {
            prop_assert!(lo < hi);
            let (a, b) = if a <= b { (a, b) } else { (b, a) };
            let x = lo + a * (hi - lo);
            let y = lo + b * (hi - lo);
            prop_assert!(scaler.scale(Some(x)) <= scaler.scale(Some(y)));
        }
    }

    #[test]
    fn outliers_clamp_exactly(values in reference_values()) {
        let scaler = Scaler::fit(values, R_MIN, R_MAX);
        if let Some((lo, hi)) = scaler.domain() {
            prop_assert_eq!(scaler.scale(Some(lo - 1.0e9)), R_MIN);
            prop_assert_eq!(scaler.scale(Some(hi + 1.0e9)), R_MAX);
        }
    }

    #[test]
    fn scaling_is_deterministic(values in reference_values(), sample in -1.0e6..1.0e6f64) {
        let a = Scaler::fit(values.clone(), R_MIN, R_MAX);
        let b = Scaler::fit(values, R_MIN, R_MAX);
        prop_assert_eq!(a, b);
        prop_assert_eq!(a.scale(Some(sample)), a.scale(Some(sample)));
    }
}

#[test]
fn empty_reference_is_constant() {
    let scaler = Scaler::fit(Vec::<Option<f64>>::new(), R_MIN, R_MAX);
    for sample in [None, Some(-1.0), Some(0.0), Some(1.0e12), Some(f64::INFINITY)] {
        assert_eq!(scaler.scale(sample), 10.5);
    }
}

#[test]
fn skewed_distribution_clips_to_percentiles() {
    let values = skewed_capacities();
    let mut finite: Vec<f64> = values.iter().flatten().copied().filter(|v| v.is_finite()).collect();
    finite.sort_by(f64::total_cmp);

    let scaler = Scaler::fit(values, R_MIN, R_MAX);
    let (lo, hi) = scaler.domain().unwrap();
    assert_eq!(Some(lo), percentile(&finite, LOWER_QUANTILE));
    assert_eq!(Some(hi), percentile(&finite, UPPER_QUANTILE));

    // The three large plants all saturate; the median digester does not.
    assert_eq!(scaler.scale(Some(5_000.0)), R_MAX);
    assert_eq!(scaler.scale(Some(12_000.0)), R_MAX);
    let median = scaler.scale(Some(48.0));
    assert!(median > R_MIN && median < R_MAX, "median radius {median}");
}

#[test]
fn full_range_reference_interpolates() {
    let scaler = Scaler::fit(vec![Some(-1.0e308), Some(1.0e308)], R_MIN, R_MAX);
    assert_eq!(scaler.scale(Some(-1.0e308)), R_MIN);
    assert_eq!(scaler.scale(Some(1.0e308)), R_MAX);
    let mid = scaler.scale(Some(0.0));
    assert!((mid - 10.5).abs() < 1e-9, "zero scaled to {mid}");
}

#[test]
fn degenerate_distribution_widens() {
    let scaler = Scaler::fit(vec![Some(3.0); 10], R_MIN, R_MAX);
    assert_eq!(scaler.domain(), Some((3.0, 4.0)));
    assert_eq!(scaler.scale(Some(3.0)), R_MIN);
    assert_eq!(scaler.scale(Some(3.5)), 10.5);
    assert_eq!(scaler.scale(Some(4.0)), R_MAX);
}
