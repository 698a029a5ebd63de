//! Property tests for metric and precision helpers

use epoca::train::{accuracy_from_labels, rmse, Precision};
use proptest::prelude::*;

proptest! {
    #[test]
    fn accuracy_stays_in_unit_interval(
        labels in prop::collection::vec((0usize..5, 0usize..5), 0..64)
    ) {
        let (pred, actual): (Vec<usize>, Vec<usize>) = labels.into_iter().unzip();
        let acc = accuracy_from_labels(&pred, &actual);
        prop_assert!((0.0..=1.0).contains(&acc));
    }

    #[test]
    fn accuracy_of_identical_labels_is_one(
        labels in prop::collection::vec(0usize..5, 1..64)
    ) {
        prop_assert_eq!(accuracy_from_labels(&labels, &labels), 1.0);
    }

    #[test]
    fn rmse_is_non_negative(
        values in prop::collection::vec((-100.0f32..100.0, -100.0f32..100.0), 0..64)
    ) {
        let (pred, actual): (Vec<f32>, Vec<f32>) = values.into_iter().unzip();
        prop_assert!(rmse(&pred, &actual) >= 0.0);
    }

    #[test]
    fn rmse_of_identical_values_is_zero(
        values in prop::collection::vec(-100.0f32..100.0, 1..64)
    ) {
        prop_assert_eq!(rmse(&values, &values), 0.0);
    }

    #[test]
    fn reduced_precision_rounding_is_idempotent(v in -1000.0f32..1000.0) {
        for p in [Precision::Fp16, Precision::Bf16] {
            let once = p.round(v);
            prop_assert_eq!(p.round(once), once);
        }
    }

    #[test]
    fn fp16_rounding_stays_close_for_moderate_values(v in -100.0f32..100.0) {
        let rounded = Precision::Fp16.round(v);
        // Half precision keeps ~3 decimal digits in this range
        prop_assert!((rounded - v).abs() <= v.abs() * 1e-3 + 1e-3);
    }
}
