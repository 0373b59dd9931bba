//! Lenient timestamp handling for the dashboard payloads.
//!
//! The forecast service emits naive ISO-8601 strings (with or without seconds and
//! fractional seconds), the form produces `datetime-local` values (`YYYY-MM-DDTHH:MM`),
//! and some deployments send RFC 3339 strings with an offset. Everything is normalised
//! to a wall-clock [`NaiveDateTime`].

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Label format used on every chart axis (24-hour clock).
pub const CLOCK_FORMAT: &str = "%H:%M";

/// Parses a timestamp in any of the accepted textual forms.
///
/// Strings carrying an offset are converted to local wall-clock time, the same way a
/// browser renders them. Returns `None` when no form matches.
///
/// # Examples
///
/// ```
/// use demand_dashboard::parse_timestamp;
///
/// let dt = parse_timestamp("2024-01-01T00:00").unwrap();
/// assert_eq!(dt.format("%H:%M").to_string(), "00:00");
/// assert!(parse_timestamp("yesterday").is_none());
/// ```
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = value.parse::<DateTime<FixedOffset>>() {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Formats a timestamp as a 24-hour `HH:MM` chart label.
pub fn clock_label(datetime: &NaiveDateTime) -> String {
    datetime.format(CLOCK_FORMAT).to_string()
}

/// Serde helper for required timestamp fields.
pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp '{raw}'")))
}

/// Serde helper for timestamp fields that may be missing, `null` or unparseable.
pub(crate) fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Timelike};

    #[test]
    fn parses_form_and_backend_shapes() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(13, 5, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-01-01T13:05"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01T13:05:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-01 13:05:00"), Some(expected));
        assert_eq!(parse_timestamp(" 2024-01-01 13:05 "), Some(expected));

        let fractional = parse_timestamp("2024-01-01T13:05:00.123456").unwrap();
        assert_eq!(fractional.minute(), 5);
        assert_eq!(fractional.nanosecond(), 123_456_000);
    }

    #[test]
    fn offset_strings_become_local_wall_time() {
        let parsed = parse_timestamp("2024-06-01T12:00:00+00:00").unwrap();
        let expected = chrono::Utc
            .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("2024-13-01T00:00").is_none());
        assert!(parse_timestamp("not a date").is_none());
    }
}
