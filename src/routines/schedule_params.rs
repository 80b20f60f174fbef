// ABOUTME: Validation of optional schedule overrides (week count, weekdays, start date)
// ABOUTME: Turns loosely typed request values into canonical typed parameters or a field error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::blueprint::value_as_integer;
use crate::constants::{request_fields, scheduling};
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Canonical schedule parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleParams {
    /// Number of weeks to project, within 1..=12
    pub weeks: u32,
    /// Explicit weekdays (0 = Sunday); `None` means infer from the routine
    pub weekday_override: Option<Vec<u8>>,
    /// First day to project from; `None` means today
    pub base_date: Option<NaiveDate>,
}

/// Raw schedule overrides exactly as the client sent them
///
/// `None` and JSON `null` both mean "not provided".
#[derive(Debug, Clone, Copy, Default)]
pub struct RawScheduleParams<'a> {
    /// `schedule_weeks`
    pub weeks: Option<&'a Value>,
    /// `schedule_days_of_week`
    pub days_of_week: Option<&'a Value>,
    /// `schedule_start_date`
    pub start_date: Option<&'a Value>,
}

/// Validate schedule overrides
///
/// # Errors
///
/// Returns a 400-class error naming the offending field
pub fn validate_schedule_params(
    raw: RawScheduleParams<'_>,
    default_weeks: u32,
) -> AppResult<ScheduleParams> {
    let weeks = parse_weeks(provided(raw.weeks), default_weeks)?;
    Ok(ScheduleParams {
        weeks,
        weekday_override: provided(raw.days_of_week).map(parse_weekdays).transpose()?,
        base_date: provided(raw.start_date)
            .map(|value| parse_start_date(value, weeks))
            .transpose()?,
    })
}

fn provided(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn parse_weeks(value: Option<&Value>, default_weeks: u32) -> AppResult<u32> {
    let Some(value) = value else {
        return Ok(default_weeks);
    };
    let range = i64::from(scheduling::MIN_SCHEDULE_WEEKS)..=i64::from(scheduling::MAX_SCHEDULE_WEEKS);
    value_as_integer(value)
        .filter(|weeks| range.contains(weeks))
        .and_then(|weeks| u32::try_from(weeks).ok())
        .ok_or_else(|| {
            AppError::out_of_range(format!(
                "{} must be an integer between {} and {}",
                request_fields::SCHEDULE_WEEKS,
                scheduling::MIN_SCHEDULE_WEEKS,
                scheduling::MAX_SCHEDULE_WEEKS
            ))
        })
}

fn parse_weekdays(value: &Value) -> AppResult<Vec<u8>> {
    let Value::Array(entries) = value else {
        return Err(AppError::invalid_input(format!(
            "{} must be an array of weekday numbers (0 = Sunday ... 6 = Saturday)",
            request_fields::SCHEDULE_DAYS_OF_WEEK
        )));
    };

    // Entries that are not weekday numbers are dropped, not rejected
    let weekdays: Vec<u8> = entries
        .iter()
        .filter_map(value_as_integer)
        .filter_map(|d| u8::try_from(d).ok())
        .filter(|d| (scheduling::MIN_WEEKDAY..=scheduling::MAX_WEEKDAY).contains(d))
        .collect();

    if weekdays.is_empty() {
        return Err(AppError::invalid_input(format!(
            "{} must contain at least one weekday between {} and {}",
            request_fields::SCHEDULE_DAYS_OF_WEEK,
            scheduling::MIN_WEEKDAY,
            scheduling::MAX_WEEKDAY
        )));
    }
    Ok(weekdays)
}

/// The whole projection window (up to one extra week of roll-forward) must
/// stay within the representable calendar
fn parse_start_date(value: &Value, weeks: u32) -> AppResult<NaiveDate> {
    let window = Days::new(u64::from(weeks) * 7 + 7);
    value
        .as_str()
        .and_then(parse_calendar_date)
        .filter(|base| base.checked_add_days(window).is_some())
        .ok_or_else(|| {
            AppError::invalid_input(format!(
                "{} must be a valid date (YYYY-MM-DD)",
                request_fields::SCHEDULE_START_DATE
            ))
        })
}

/// Parse a date or date-time string down to its calendar day
#[must_use]
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use serde_json::json;

    fn validate(
        weeks: Option<Value>,
        days: Option<Value>,
        start: Option<Value>,
    ) -> AppResult<ScheduleParams> {
        validate_schedule_params(
            RawScheduleParams {
                weeks: weeks.as_ref(),
                days_of_week: days.as_ref(),
                start_date: start.as_ref(),
            },
            scheduling::DEFAULT_SCHEDULE_WEEKS,
        )
    }

    #[test]
    fn test_defaults_when_nothing_provided() {
        let params = validate(None, None, None).unwrap();
        assert_eq!(
            params,
            ScheduleParams {
                weeks: 4,
                weekday_override: None,
                base_date: None,
            }
        );
    }

    #[test]
    fn test_null_is_not_provided() {
        let params = validate(Some(Value::Null), Some(Value::Null), Some(Value::Null)).unwrap();
        assert_eq!(params.weeks, 4);
        assert_eq!(params.weekday_override, None);
        assert_eq!(params.base_date, None);
    }

    #[test]
    fn test_weeks_bounds() {
        assert_eq!(validate(Some(json!(1)), None, None).unwrap().weeks, 1);
        assert_eq!(validate(Some(json!("12")), None, None).unwrap().weeks, 12);

        for bad in [json!(0), json!(13), json!(15), json!(-2), json!("abc"), json!([4])] {
            let err = validate(Some(bad), None, None).unwrap_err();
            assert_eq!(err.code, ErrorCode::ValueOutOfRange);
            assert!(err.message.contains("schedule_weeks"));
        }
    }

    #[test]
    fn test_weekdays_must_be_a_list() {
        let err = validate(None, Some(json!("invalid")), None).unwrap_err();
        assert_eq!(err.http_status(), 400);
        assert!(err.message.contains("schedule_days_of_week"));
    }

    #[test]
    fn test_weekdays_filtered_to_valid_range() {
        let params = validate(None, Some(json!([1, "3", 7, -1, "x", 0])), None).unwrap();
        assert_eq!(params.weekday_override, Some(vec![1, 3, 0]));
    }

    #[test]
    fn test_weekdays_empty_after_filtering_is_rejected() {
        for bad in [json!([]), json!([7, 8, "nope"])] {
            let err = validate(None, Some(bad), None).unwrap_err();
            assert!(err.message.contains("schedule_days_of_week"));
        }
    }

    #[test]
    fn test_weekday_duplicates_are_preserved() {
        let params = validate(None, Some(json!([1, 1, 3])), None).unwrap();
        assert_eq!(params.weekday_override, Some(vec![1, 1, 3]));
    }

    #[test]
    fn test_start_date_normalized_to_day() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 10);
        for input in [
            "2025-03-10",
            "2025-03-10T18:45:00Z",
            "2025-03-10T18:45:00.250",
            "2025-03-10 06:00:00",
        ] {
            let params = validate(None, None, Some(json!(input))).unwrap();
            assert_eq!(params.base_date, expected, "input {input}");
        }
    }

    #[test]
    fn test_invalid_start_date_rejected() {
        for bad in [json!("invalid-date"), json!("2025-02-30"), json!(20250310)] {
            let err = validate(None, None, Some(bad)).unwrap_err();
            assert!(err.message.contains("schedule_start_date"));
        }
    }

    #[test]
    fn test_start_date_near_calendar_end_rejected() {
        let err = validate(None, None, Some(json!("+262142-12-25"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
        assert!(err.message.contains("schedule_start_date"));

        // The window grows with the week count
        let near_end = NaiveDate::MAX - chrono::Duration::days(20);
        let near_end = json!(near_end.format("%Y-%m-%d").to_string());
        assert!(validate(Some(json!(1)), None, Some(near_end.clone())).is_ok());
        assert!(validate(Some(json!(12)), None, Some(near_end)).is_err());
    }
}
