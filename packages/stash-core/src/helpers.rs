//! Small numeric, string and time helpers.

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Result, StashError};

/// Returns the highest value, or `None` for an empty slice.
pub fn max_int(values: &[i64]) -> Option<i64> {
    values.iter().copied().max()
}

/// Returns the integer average truncated toward zero, or `None` for an empty slice.
pub fn average_int(values: &[i64]) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    let total: i128 = values.iter().map(|&v| i128::from(v)).sum();
    // |total / len| never exceeds the largest |value|
    Some((total / values.len() as i128) as i64)
}

/// Parses an integer, clamping negative values to zero.
///
/// # Errors
/// `InvalidNumber` if `s` is not an integer (`"1.5"`, `"Test"`).
pub fn str_to_int_z(s: &str) -> Result<i64> {
    let value: i64 = s
        .trim()
        .parse()
        .map_err(|_| StashError::InvalidNumber(s.to_string()))?;
    Ok(value.max(0))
}

/// Reverses rows so the most recently appended one comes first.
pub fn newest_first<T>(mut rows: Vec<T>) -> Vec<T> {
    rows.reverse();
    rows
}

/// Combines an `HH:MM` clock time with `date` shifted by `day_offset` days.
///
/// # Errors
/// `InvalidClockTime` if `hhmm` is not a valid `HH:MM` time or the shifted
/// date is out of range.
pub fn clock_time_on(date: NaiveDate, hhmm: &str, day_offset: i64) -> Result<NaiveDateTime> {
    let invalid = |reason: &str| StashError::InvalidClockTime {
        input: hhmm.to_string(),
        reason: reason.to_string(),
    };

    let time = NaiveTime::parse_from_str(hhmm, "%H:%M").map_err(|e| invalid(&e.to_string()))?;
    let days = Days::new(day_offset.unsigned_abs());
    let shifted = if day_offset >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    }
    .ok_or_else(|| invalid("date out of range"))?;

    Ok(shifted.and_time(time))
}

/// Today's local date at `HH:MM`, shifted by `day_offset` days.
///
/// # Errors
/// See [`clock_time_on`]; also fails when the time does not exist in the
/// local time zone (skipped by a DST change).
pub fn clock_time(hhmm: &str, day_offset: i64) -> Result<DateTime<Local>> {
    let naive = clock_time_on(Local::now().date_naive(), hhmm, day_offset)?;
    naive
        .and_local_timezone(Local)
        .earliest()
        .ok_or_else(|| StashError::InvalidClockTime {
            input: hhmm.to_string(),
            reason: "time does not exist in the local time zone".to_string(),
        })
}
