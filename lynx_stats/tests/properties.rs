// Copyright 2025 the Lynx Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Algebraic properties of the statistics functions over random inputs.

use lynx_stats::{
    correlation, cumsum, median, min_max_normalize, percentile, rank, sorted, sum,
};
use proptest::prelude::*;

fn values() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e6..1.0e6_f64, 1..64)
}

fn pairs() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (1_usize..48).prop_flat_map(|n| {
        (
            prop::collection::vec(-1.0e3..1.0e3_f64, n),
            prop::collection::vec(-1.0e3..1.0e3_f64, n),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn median_is_the_fiftieth_percentile_of_the_sorted_input(v in values()) {
        prop_assert_eq!(percentile(&sorted(&v), 50.0), median(&v));
    }

    #[test]
    fn correlation_is_symmetric((x, y) in pairs()) {
        prop_assert_eq!(correlation(&x, &y), correlation(&y, &x));
    }

    #[test]
    fn self_correlation_is_one_with_spread(v in values()) {
        let spread = v.iter().any(|a| *a != v[0]);
        prop_assume!(spread);
        let r = correlation(&v, &v);
        prop_assert!((r - 1.0).abs() < 1e-9, "correlation(x, x) = {}", r);
    }

    #[test]
    fn rank_is_permutation_invariant(v in values(), seed in any::<u64>()) {
        // Rotate by a seed-dependent offset and compare rank multisets.
        let k = (seed as usize) % v.len();
        let mut rotated = v.clone();
        rotated.rotate_left(k);

        let mut a = rank(&v);
        let mut b = rank(&rotated);
        // Same values, same positions after undoing the rotation.
        b.rotate_right(k);
        prop_assert_eq!(&a, &b);
        a.sort_unstable();
        b.sort_unstable();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn cumsum_of_non_negative_input_never_decreases(
        v in prop::collection::vec(0.0..1.0e6_f64, 1..64),
    ) {
        let c = cumsum(&v);
        prop_assert!(c.windows(2).all(|w| w[1] >= w[0]));
        let last = *c.last().unwrap();
        prop_assert!((last - sum(&v)).abs() <= 1e-6 * sum(&v).abs().max(1.0));
    }

    #[test]
    fn min_max_normalize_stays_in_unit_interval(v in values()) {
        let out = min_max_normalize(&v);
        prop_assert_eq!(out.len(), v.len());
        prop_assert!(out.iter().all(|x| (0.0..=1.0).contains(x)), "out of range: {:?}", out);
    }
}

#[test]
fn all_equal_input_normalizes_to_one_half() {
    assert_eq!(min_max_normalize(&[3.0; 4]), vec![0.5; 4]);
}
