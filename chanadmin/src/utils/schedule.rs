use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDateTime, Timelike, Utc};
use regex::Regex;

use crate::utils::format_timestamp;

/// Absolute time format accepted from the admin, always UTC
pub const SCHEDULE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Posts can't be scheduled further ahead than this many days
pub const MAX_DAYS_AHEAD: i64 = 366;

static RELATIVE_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+\s*(\d{1,6})\s*([mhd]?)$").unwrap());

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    #[error("cannot read {0:?} as a time, use YYYY-MM-DD HH:MM or +N followed by m, h or d")]
    Unrecognized(String),
    #[error("{0} is already in the past")]
    InPast(String),
    #[error("{0:?} is too far in the future")]
    OutOfRange(String),
}

/// Parse a publication time: `now`, an absolute `YYYY-MM-DD HH:MM` (UTC) or an offset like
/// `+30m`, `+2h`, `+1d` (bare numbers are minutes)
pub fn parse_schedule(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, ScheduleError> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("now") {
        return Ok(now);
    }

    if let Some(captures) = RELATIVE_TIME.captures(&trimmed.to_lowercase()) {
        let out_of_range = || ScheduleError::OutOfRange(trimmed.to_string());
        let amount: i64 = captures[1].parse().map_err(|_| out_of_range())?;
        let offset = match &captures[2] {
            "h" => Duration::try_hours(amount),
            "d" => Duration::try_days(amount),
            _ => Duration::try_minutes(amount),
        }
        .ok_or_else(out_of_range)?;
        let scheduled = now.checked_add_signed(offset).ok_or_else(out_of_range)?;
        return check_horizon(trimmed, scheduled, now);
    }

    let scheduled = NaiveDateTime::parse_from_str(trimmed, SCHEDULE_FORMAT)
        .map_err(|_| ScheduleError::Unrecognized(trimmed.to_string()))?
        .and_utc();
    // Absolute times have minute precision, so the current minute is still accepted
    let this_minute = now
        .with_second(0)
        .and_then(|time| time.with_nanosecond(0))
        .unwrap_or(now);
    if scheduled < this_minute {
        return Err(ScheduleError::InPast(format_timestamp(scheduled)));
    }
    check_horizon(trimmed, scheduled, now)
}

fn check_horizon(
    input: &str,
    scheduled: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ScheduleError> {
    if scheduled - now > Duration::days(MAX_DAYS_AHEAD) {
        return Err(ScheduleError::OutOfRange(input.to_string()));
    }
    Ok(scheduled)
}
