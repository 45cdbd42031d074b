//! Day-window and percentage-change arithmetic for the restaurant dashboard
//! and the revenue report.

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Relative change between two metric values, in percent, rounded to one
/// decimal place.
///
/// A zero or unusable previous value yields 100 when anything was measured
/// today and 0 otherwise; an unusable current value yields 0.
pub fn percentage_change(current: f64, previous: f64) -> f64 {
    if !previous.is_finite() || previous == 0.0 {
        return if current.is_finite() && current > 0.0 {
            100.0
        } else {
            0.0
        };
    }
    if !current.is_finite() {
        return 0.0;
    }
    round1((current - previous) / previous * 100.0)
}

fn local_to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        // DST fold: take the earlier instant.
        LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        // DST gap: the wall-clock time does not exist locally.
        LocalResult::None => Utc.from_utc_datetime(&naive),
    }
}

/// The local calendar-day window covering `date`, as UTC instants:
/// `[00:00:00.000, 23:59:59.999]`.
pub fn day_window(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_hms_milli_opt(0, 0, 0, 0).unwrap_or_default();
    let end = date.and_hms_milli_opt(23, 59, 59, 999).unwrap_or_default();
    (local_to_utc(start), local_to_utc(end))
}

pub fn today_window() -> (DateTime<Utc>, DateTime<Utc>) {
    day_window(Local::now().date_naive())
}

pub fn yesterday_window() -> (DateTime<Utc>, DateTime<Utc>) {
    day_window(Local::now().date_naive() - Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_change_of_nothing_is_zero() {
        assert_eq!(percentage_change(0.0, 0.0), 0.0);
    }

    #[test]
    fn percentage_change_from_zero_is_one_hundred() {
        assert_eq!(percentage_change(10.0, 0.0), 100.0);
    }

    #[test]
    fn percentage_change_halving_is_minus_fifty() {
        assert_eq!(percentage_change(50.0, 100.0), -50.0);
    }

    #[test]
    fn percentage_change_with_unusable_current_is_zero() {
        assert_eq!(percentage_change(f64::NAN, 100.0), 0.0);
    }

    #[test]
    fn percentage_change_with_unusable_previous_behaves_like_zero() {
        assert_eq!(percentage_change(10.0, f64::NAN), 100.0);
        assert_eq!(percentage_change(0.0, f64::NAN), 0.0);
    }

    #[test]
    fn percentage_change_keeps_one_decimal() {
        // (601 - 300) / 300 * 100 = 100.333... -> 100.3
        assert_eq!(percentage_change(601.0, 300.0), 100.3);
    }

    #[test]
    fn round1_rounds_to_one_decimal() {
        assert_eq!(round1(500.04), 500.0);
        assert_eq!(round1(499.96), 500.0);
        assert_eq!(round1(-50.05), -50.0);
    }

    #[test]
    fn day_window_covers_the_whole_day() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let (start, end) = day_window(date);
        assert!(start < end);
        // 24h minus the final millisecond.
        assert_eq!((end - start).num_milliseconds(), 24 * 3600 * 1000 - 1);
    }

    #[test]
    fn yesterday_window_precedes_today_window() {
        let (_, y_end) = yesterday_window();
        let (t_start, _) = today_window();
        assert!(y_end < t_start);
    }
}
