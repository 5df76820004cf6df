use super::config::{AnswerScale, OutOfRangePolicy};
use super::domain::ItemId;
use super::error::ScoringError;

/// Admits a raw answer into the scale according to the out-of-range policy.
///
/// Non-finite values are rejected under every policy.
pub fn admit_answer(
    item: &ItemId,
    raw: f64,
    scale: AnswerScale,
    policy: OutOfRangePolicy,
) -> Result<f64, ScoringError> {
    let out_of_range = || ScoringError::OutOfRangeInput {
        item: item.clone(),
        value: raw,
        min: scale.min,
        max: scale.max,
    };

    if !raw.is_finite() {
        return Err(out_of_range());
    }

    if scale.contains(raw) {
        return Ok(raw);
    }

    match policy {
        OutOfRangePolicy::Reject => Err(out_of_range()),
        OutOfRangePolicy::Clamp => Ok(raw.clamp(scale.min, scale.max)),
    }
}

/// Maps a raw answer onto 0-100, flipping it for inverted items.
pub fn normalize_answer(
    item: &ItemId,
    raw: f64,
    scale: AnswerScale,
    inverted: bool,
    policy: OutOfRangePolicy,
) -> Result<f64, ScoringError> {
    let admitted = admit_answer(item, raw, scale, policy)?;
    let rescaled = ((admitted - scale.min) / scale.span() * 100.0).clamp(0.0, 100.0);

    Ok(if inverted { 100.0 - rescaled } else { rescaled })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn normalize(raw: f64, inverted: bool) -> Result<f64, ScoringError> {
        normalize_answer(
            &ItemId::from("R1"),
            raw,
            AnswerScale::LIKERT_5,
            inverted,
            OutOfRangePolicy::Reject,
        )
    }

    #[test]
    fn likert_points_map_linearly() {
        assert_eq!(normalize(1.0, false).expect("min"), 0.0);
        assert_eq!(normalize(3.0, false).expect("mid"), 50.0);
        assert_eq!(normalize(5.0, false).expect("max"), 100.0);
    }

    #[test]
    fn inverted_items_flip_the_scale() {
        assert_eq!(normalize(5.0, true).expect("max inverted"), 0.0);
        assert_eq!(normalize(1.0, true).expect("min inverted"), 100.0);
        assert_eq!(normalize(2.0, true).expect("two inverted"), 75.0);
    }

    #[test]
    fn rejects_out_of_range_by_default() {
        match normalize(6.0, false) {
            Err(ScoringError::OutOfRangeInput { item, value, min, max }) => {
                assert_eq!(item, ItemId::from("R1"));
                assert_eq!(value, 6.0);
                assert_eq!((min, max), (1.0, 5.0));
            }
            other => panic!("expected out of range error, got {other:?}"),
        }
        assert!(normalize(0.0, false).is_err());
        assert!(normalize(f64::NAN, false).is_err());
    }

    #[test]
    fn clamp_policy_pins_to_nearest_bound() {
        let item = ItemId::from("G2");
        let high = normalize_answer(&item, 9.0, AnswerScale::LIKERT_5, false, OutOfRangePolicy::Clamp)
            .expect("clamped high");
        let low = normalize_answer(&item, -3.0, AnswerScale::LIKERT_5, false, OutOfRangePolicy::Clamp)
            .expect("clamped low");
        assert_eq!(high, 100.0);
        assert_eq!(low, 0.0);

        assert!(admit_answer(&item, f64::INFINITY, AnswerScale::LIKERT_5, OutOfRangePolicy::Clamp).is_err());
    }

    proptest! {
        #[test]
        fn normalization_is_monotonic(a in 1.0..=5.0f64, b in 1.0..=5.0f64) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };

            let plain_low = normalize(low, false).unwrap();
            let plain_high = normalize(high, false).unwrap();
            prop_assert!(plain_low <= plain_high);

            let inverted_low = normalize(low, true).unwrap();
            let inverted_high = normalize(high, true).unwrap();
            prop_assert!(inverted_low >= inverted_high);
        }

        #[test]
        fn normalized_scores_stay_in_bounds(raw in 1.0..=5.0f64, inverted in any::<bool>()) {
            let score = normalize(raw, inverted).unwrap();
            prop_assert!((0.0..=100.0).contains(&score));
        }
    }
}
