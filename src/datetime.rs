//! Date/time utilities for Corkboard.
//!
//! Timestamps are stored by SQLite as UTC text (`YYYY-MM-DD HH:MM:SS`); these
//! helpers turn them into something a reader wants to see.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Storage format used by SQLite's `datetime('now')`.
pub const SQLITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default display format.
pub const DISPLAY_FORMAT: &str = "%b %-d, %Y %H:%M";

/// Parse a stored timestamp (SQLite format or RFC3339) as UTC.
pub fn parse_utc(datetime_str: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(datetime_str, SQLITE_FORMAT) {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(datetime_str)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Format a stored UTC timestamp in the given timezone.
///
/// Returns the input unchanged when either the timestamp or the timezone
/// cannot be parsed.
pub fn format_datetime(datetime_str: &str, timezone: &str, format: &str) -> String {
    let tz: Tz = match timezone.parse() {
        Ok(tz) => tz,
        Err(_) => return datetime_str.to_string(),
    };
    match parse_utc(datetime_str) {
        Some(dt) => dt.with_timezone(&tz).format(format).to_string(),
        None => datetime_str.to_string(),
    }
}

/// Describe a stored timestamp relative to `now` ("3 minutes ago").
pub fn naturaltime(datetime_str: &str, now: DateTime<Utc>) -> String {
    let Some(dt) = parse_utc(datetime_str) else {
        return datetime_str.to_string();
    };

    let secs = (now - dt).num_seconds();
    if secs < 0 {
        return "in the future".to_string();
    }
    if secs < 10 {
        return "now".to_string();
    }

    let (amount, unit) = match secs {
        s if s < 60 => (s, "second"),
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s if s < 30 * 86_400 => (s / 86_400, "day"),
        s if s < 365 * 86_400 => (s / (30 * 86_400), "month"),
        s => (s / (365 * 86_400), "year"),
    };
    let plural = if amount == 1 { "" } else { "s" };
    format!("{amount} {unit}{plural} ago")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, h, m, s).unwrap()
    }

    #[test]
    fn test_parse_utc_sqlite_format() {
        assert_eq!(parse_utc("2024-01-15 10:30:00"), Some(at(10, 30, 0)));
    }

    #[test]
    fn test_parse_utc_rfc3339() {
        assert_eq!(parse_utc("2024-01-15T11:30:00+01:00"), Some(at(10, 30, 0)));
    }

    #[test]
    fn test_parse_utc_garbage() {
        assert_eq!(parse_utc("yesterday"), None);
    }

    #[test]
    fn test_format_datetime_converts_timezone() {
        let result = format_datetime("2024-01-15 10:30:00", "Europe/Berlin", "%Y/%m/%d %H:%M");
        assert_eq!(result, "2024/01/15 11:30");
    }

    #[test]
    fn test_format_datetime_default_format() {
        let result = format_datetime("2024-01-05 09:05:00", "UTC", DISPLAY_FORMAT);
        assert_eq!(result, "Jan 5, 2024 09:05");
    }

    #[test]
    fn test_format_datetime_invalid_input_is_returned() {
        assert_eq!(format_datetime("not a date", "UTC", DISPLAY_FORMAT), "not a date");
        assert_eq!(
            format_datetime("2024-01-15 10:30:00", "Invalid/Zone", DISPLAY_FORMAT),
            "2024-01-15 10:30:00"
        );
    }

    #[test]
    fn test_naturaltime_buckets() {
        let now = at(12, 0, 0);
        assert_eq!(naturaltime("2024-01-15 11:59:55", now), "now");
        assert_eq!(naturaltime("2024-01-15 11:59:30", now), "30 seconds ago");
        assert_eq!(naturaltime("2024-01-15 11:59:00", now), "1 minute ago");
        assert_eq!(naturaltime("2024-01-15 09:00:00", now), "3 hours ago");
        assert_eq!(naturaltime("2024-01-13 12:00:00", now), "2 days ago");
        assert_eq!(naturaltime("2023-01-15 12:00:00", now), "1 year ago");
    }

    #[test]
    fn test_naturaltime_future_and_invalid() {
        let now = at(12, 0, 0);
        assert_eq!(naturaltime("2024-01-15 13:00:00", now), "in the future");
        assert_eq!(naturaltime("soon", now), "soon");
    }
}
