//! Rating arithmetic shared by the feedback service and the dashboard.
//!
//! A restaurant's stored rating is the rounded mean of the ratings of its
//! active feedback. Raw rating input is normalized at the write edge with
//! [`clamp_rating`]; stored values are aggregated as-is, so a 0 produced from
//! unusable input still dilutes the mean.

/// Normalize a raw rating value for storage.
///
/// Finite values are rounded half away from zero and clamped into 1..=5.
/// Non-finite values map to 0 and fall outside the valid range on purpose.
pub fn clamp_rating(raw: f64) -> i32 {
    if !raw.is_finite() {
        return 0;
    }
    (raw.round() as i64).clamp(1, 5) as i32
}

/// Mean of `ratings` rounded half away from zero, or `None` when there is
/// nothing to average.
pub fn rounded_mean(ratings: &[i32]) -> Option<i32> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    let mean = sum as f64 / ratings.len() as f64;
    Some(mean.round() as i32)
}

/// Plain arithmetic mean as a float, or 0.0 for an empty set. Used where an
/// unrounded average is compared against the stored rating.
pub fn mean_or_zero(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    sum as f64 / ratings.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_rounds_then_clamps_into_range() {
        assert_eq!(clamp_rating(4.4), 4);
        assert_eq!(clamp_rating(4.5), 5);
        assert_eq!(clamp_rating(0.2), 1);
        assert_eq!(clamp_rating(9.0), 5);
        assert_eq!(clamp_rating(-3.0), 1);
    }

    #[test]
    fn clamp_maps_non_finite_to_zero() {
        assert_eq!(clamp_rating(f64::NAN), 0);
        assert_eq!(clamp_rating(f64::INFINITY), 0);
        assert_eq!(clamp_rating(f64::NEG_INFINITY), 0);
    }

    #[test]
    fn rounded_mean_is_none_for_empty_set() {
        assert_eq!(rounded_mean(&[]), None);
    }

    #[test]
    fn rounded_mean_rounds_half_away_from_zero() {
        assert_eq!(rounded_mean(&[4, 5]), Some(5));
        assert_eq!(rounded_mean(&[1, 1, 2]), Some(1));
        assert_eq!(rounded_mean(&[3]), Some(3));
    }

    #[test]
    fn zero_rating_dilutes_the_mean() {
        // 0 comes from unusable input and still contributes to the sum.
        assert_eq!(rounded_mean(&[0, 5, 5]), Some(3));
    }

    #[test]
    fn mean_or_zero_defaults_empty_to_zero() {
        assert_eq!(mean_or_zero(&[]), 0.0);
        assert_eq!(mean_or_zero(&[4, 5]), 4.5);
    }
}
