// ABOUTME: Occurrence projection from a base date, week count and weekday set to calendar dates
// ABOUTME: Pure date arithmetic that always rolls each weekday forward to a strictly future day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::scheduling::{DAYS_PER_WEEK, DEFAULT_WEEKDAYS};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeSet;

/// Resolve which weekdays to project onto
///
/// An explicit override wins and is used as given (duplicates included).
/// Otherwise the distinct weekdays of the routine's exercises are used, and
/// Monday to Friday when none of them carries a weekday.
#[must_use]
pub fn resolve_weekdays<I>(weekday_override: Option<&[u8]>, exercise_weekdays: I) -> Vec<u8>
where
    I: IntoIterator<Item = Option<u8>>,
{
    if let Some(days) = weekday_override {
        return days.to_vec();
    }

    let inferred: BTreeSet<u8> = exercise_weekdays.into_iter().flatten().collect();
    if inferred.is_empty() {
        DEFAULT_WEEKDAYS.to_vec()
    } else {
        inferred.into_iter().collect()
    }
}

/// Compute the calendar dates for `weeks` weeks of the given weekdays
///
/// Produces `weeks * weekdays.len()` dates grouped by week offset. A weekday
/// equal to or earlier than the base date's weekday lands in the following
/// week, so no date is ever on or before `base`. Dates past the end of the
/// representable calendar are left out.
#[must_use]
pub fn project_occurrences(base: NaiveDate, weeks: u32, weekdays: &[u8]) -> Vec<NaiveDate> {
    let base_weekday = i64::from(base.weekday().num_days_from_sunday());
    let mut dates = Vec::with_capacity(weeks as usize * weekdays.len());

    for week in 0..i64::from(weeks) {
        for &day in weekdays {
            let mut delta = i64::from(day) - base_weekday;
            if delta <= 0 {
                delta += DAYS_PER_WEEK;
            }
            delta += week * DAYS_PER_WEEK;
            if let Some(date) = base.checked_add_signed(Duration::days(delta)) {
                dates.push(date);
            }
        }
    }

    dates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monday_base_rolls_monday_forward_a_week() {
        // 2025-03-10 is a Monday
        let dates = project_occurrences(date(2025, 3, 10), 1, &[1, 3]);
        assert_eq!(dates, vec![date(2025, 3, 17), date(2025, 3, 12)]);
    }

    #[test]
    fn test_count_is_weeks_times_weekdays() {
        let base = date(2025, 6, 4);
        for weeks in 1..=12 {
            for weekdays in [vec![0], vec![1, 3, 5], vec![0, 1, 2, 3, 4, 5, 6]] {
                let dates = project_occurrences(base, weeks, &weekdays);
                assert_eq!(dates.len(), weeks as usize * weekdays.len());
            }
        }
    }

    #[test]
    fn test_dates_match_weekdays_and_are_strictly_future() {
        let weekdays = [0, 2, 6];
        // A full week of bases covers every base-weekday alignment
        for offset in 0..7 {
            let base = date(2025, 1, 1) + Duration::days(offset);
            for d in project_occurrences(base, 3, &weekdays) {
                assert!(d > base, "{d} is not after {base}");
                let weekday = u8::try_from(d.weekday().num_days_from_sunday()).unwrap();
                assert!(weekdays.contains(&weekday));
            }
        }
    }

    #[test]
    fn test_weeks_are_spaced_by_seven_days() {
        let dates = project_occurrences(date(2025, 3, 10), 3, &[5]);
        assert_eq!(
            dates,
            vec![date(2025, 3, 14), date(2025, 3, 21), date(2025, 3, 28)]
        );
    }

    #[test]
    fn test_duplicate_override_weekdays_produce_duplicate_dates() {
        let dates = project_occurrences(date(2025, 3, 10), 1, &[1, 1]);
        assert_eq!(dates, vec![date(2025, 3, 17), date(2025, 3, 17)]);
    }

    #[test]
    fn test_dates_past_calendar_end_are_dropped() {
        let base = NaiveDate::MAX - Duration::days(10);
        let dates = project_occurrences(base, 4, &[0, 3]);
        assert!(!dates.is_empty());
        assert!(dates.len() < 8);
        assert!(dates.iter().all(|d| *d > base && *d <= NaiveDate::MAX));
    }

    #[test]
    fn test_resolve_weekdays_prefers_override() {
        let resolved = resolve_weekdays(Some(&[3, 3, 1][..]), [Some(0)]);
        assert_eq!(resolved, vec![3, 3, 1]);
    }

    #[test]
    fn test_resolve_weekdays_infers_distinct_exercise_days() {
        let resolved = resolve_weekdays(None, [Some(4), None, Some(0), Some(4)]);
        assert_eq!(resolved, vec![0, 4]);
    }

    #[test]
    fn test_resolve_weekdays_defaults_to_weekdays() {
        assert_eq!(resolve_weekdays(None, [None, None]), vec![1, 2, 3, 4, 5]);
        assert_eq!(resolve_weekdays(None, Vec::new()), vec![1, 2, 3, 4, 5]);
    }
}
