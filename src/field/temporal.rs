//! Date, time, timestamp and duration literals
//!
//! Canonical forms:
//! - date: `YYYY-MM-DD`
//! - time: `HH:MM:SS` (24-hour, fraction dropped)
//! - timestamp: `YYYY-MM-DDTHH:MM:SS.fffffff+HH:MM`
//! - duration: `[-][d.]hh:mm:ss[.fffffff]`

use std::fmt;
use std::sync::OnceLock;

use chrono::{
    DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike, Utc,
};
use regex::Regex;

use crate::error::FieldError;

use super::scalar::require;

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%B %d, %Y", "%d %B %Y"];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// 100-nanosecond ticks, the resolution of fractional seconds in canonical output
const NANOS_PER_TICK: i64 = 100;
const TICKS_PER_SECOND: i64 = 10_000_000;
const TICKS_PER_MINUTE: i64 = TICKS_PER_SECOND * 60;
const TICKS_PER_HOUR: i64 = TICKS_PER_MINUTE * 60;
const TICKS_PER_DAY: i64 = TICKS_PER_HOUR * 24;

fn year_in_range(year: i32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
}

/// Parse a calendar date
pub fn parse_date(raw: Option<&str>) -> Result<NaiveDate, FieldError> {
    let s = require(raw, "Date")?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .filter(|d| year_in_range(d.year()))
        .ok_or_else(|| FieldError::invalid(s, "date"))
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([0-9]{1,2}):([0-9]{1,2})(?::([0-9]{1,2})(?:\.([0-9]{1,7}))?)?$")
            .expect("time pattern is valid")
    })
}

/// Right-pad a fraction of up to seven ASCII digits into a tick count
fn fraction_ticks(digits: &str) -> Option<i64> {
    if digits.len() > 7 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(
        digits
            .bytes()
            .chain(std::iter::repeat(b'0'))
            .take(7)
            .fold(0i64, |ticks, b| ticks * 10 + i64::from(b - b'0')),
    )
}

fn capture_u32(caps: &regex::Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index).map_or(Some(0), |m| m.as_str().parse().ok())
}

/// Parse a time of day such as `7:05:09`, `23:59` or `12:00:00.5`
pub fn parse_time(raw: Option<&str>) -> Result<NaiveTime, FieldError> {
    let s = require(raw, "Time")?;
    let invalid = || FieldError::invalid(s, "time");
    let caps = time_pattern().captures(s).ok_or_else(invalid)?;

    let hour = capture_u32(&caps, 1).ok_or_else(invalid)?;
    let minute = capture_u32(&caps, 2).ok_or_else(invalid)?;
    let second = capture_u32(&caps, 3).ok_or_else(invalid)?;
    let ticks = match caps.get(4) {
        Some(m) => fraction_ticks(m.as_str()).ok_or_else(invalid)?,
        None => 0,
    };
    let nanos = u32::try_from(ticks * NANOS_PER_TICK).map_err(|_| invalid())?;

    // from_hms_nano_opt rejects hour >= 24, minute >= 60 and second >= 60
    NaiveTime::from_hms_nano_opt(hour, minute, second, nanos).ok_or_else(invalid)
}

pub fn format_time(time: &NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

/// The timestamp stored by an untouched DateTime field
pub fn min_timestamp() -> DateTime<FixedOffset> {
    NaiveDate::from_ymd_opt(MIN_YEAR, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
        .and_utc()
        .fixed_offset()
}

/// Parse a timestamp with an optional offset.
///
/// Input without an offset is taken to be UTC; a bare date means midnight.
pub fn parse_timestamp(raw: Option<&str>) -> Result<DateTime<FixedOffset>, FieldError> {
    let s = require(raw, "DateTime")?;

    let with_offset = DateTime::parse_from_rfc3339(s).ok().or_else(|| {
        OFFSET_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(s, fmt).ok())
    });

    let parsed = with_offset.or_else(|| {
        NAIVE_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .or_else(|| {
                DATE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
            .map(|naive| naive.and_utc().fixed_offset())
    });

    parsed
        .filter(|ts| year_in_range(ts.year()))
        .ok_or_else(|| FieldError::invalid(s, "date/time"))
}

/// Normalize a zoned timestamp to UTC
pub fn to_utc<Tz: TimeZone>(value: DateTime<Tz>) -> DateTime<FixedOffset> {
    value.with_timezone(&Utc).fixed_offset()
}

/// Interpret a zone-less timestamp as local time and normalize it to UTC
pub fn local_to_utc(value: NaiveDateTime) -> Result<DateTime<FixedOffset>, FieldError> {
    Local
        .from_local_datetime(&value)
        .earliest()
        .map(to_utc)
        .ok_or_else(|| FieldError::invalid(value.to_string(), "local date/time"))
}

/// Round-trip form with seven fractional digits and an explicit offset
pub fn format_timestamp(value: &DateTime<FixedOffset>) -> String {
    let ticks = (i64::from(value.nanosecond()) / NANOS_PER_TICK).min(TICKS_PER_SECOND - 1);
    format!(
        "{}.{:07}{}",
        value.format("%Y-%m-%dT%H:%M:%S"),
        ticks,
        value.format("%:z")
    )
}

fn span_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(-)?(?:([0-9]+)\.)?([0-9]{1,2}):([0-9]{1,2})(?::([0-9]{1,2})(?:\.([0-9]{1,7}))?)?$",
        )
        .expect("time span pattern is valid")
    })
}

fn days_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(-)?([0-9]+)$").expect("day count pattern is valid"))
}

/// A signed duration with 100ns resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeSpan {
    ticks: i64,
}

impl TimeSpan {
    pub const ZERO: TimeSpan = TimeSpan { ticks: 0 };

    pub fn from_ticks(ticks: i64) -> Self {
        Self { ticks }
    }

    pub fn ticks(&self) -> i64 {
        self.ticks
    }

    pub fn is_negative(&self) -> bool {
        self.ticks < 0
    }

    /// Parse `[-][d.]hh:mm[:ss[.fffffff]]` or a bare day count `[-]d`
    pub fn parse(raw: Option<&str>) -> Result<Self, FieldError> {
        let s = require(raw, "TimeSpan")?;
        let invalid = || FieldError::invalid(s, "time span");

        if let Some(caps) = days_pattern().captures(s) {
            let days: i64 = caps[2].parse().map_err(|_| invalid())?;
            let ticks = days.checked_mul(TICKS_PER_DAY).ok_or_else(invalid)?;
            let negative = caps.get(1).is_some();
            return Ok(Self::from_ticks(if negative { -ticks } else { ticks }));
        }

        let caps = span_pattern().captures(s).ok_or_else(invalid)?;
        let negative = caps.get(1).is_some();
        let days: i64 = match caps.get(2) {
            Some(m) => m.as_str().parse().map_err(|_| invalid())?,
            None => 0,
        };
        let hours = i64::from(capture_u32(&caps, 3).ok_or_else(invalid)?);
        let minutes = i64::from(capture_u32(&caps, 4).ok_or_else(invalid)?);
        let seconds = i64::from(capture_u32(&caps, 5).ok_or_else(invalid)?);
        let fraction = match caps.get(6) {
            Some(m) => fraction_ticks(m.as_str()).ok_or_else(invalid)?,
            None => 0,
        };

        if hours >= 24 || minutes >= 60 || seconds >= 60 {
            return Err(invalid());
        }

        let ticks = days
            .checked_mul(TICKS_PER_DAY)
            .and_then(|t| t.checked_add(hours * TICKS_PER_HOUR))
            .and_then(|t| t.checked_add(minutes * TICKS_PER_MINUTE))
            .and_then(|t| t.checked_add(seconds * TICKS_PER_SECOND))
            .and_then(|t| t.checked_add(fraction))
            .ok_or_else(invalid)?;

        Ok(Self::from_ticks(if negative { -ticks } else { ticks }))
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            f.write_str("-")?;
        }
        let total = self.ticks.unsigned_abs();
        let per_day = TICKS_PER_DAY as u64;
        let per_hour = TICKS_PER_HOUR as u64;
        let per_minute = TICKS_PER_MINUTE as u64;
        let per_second = TICKS_PER_SECOND as u64;

        let days = total / per_day;
        let hours = total % per_day / per_hour;
        let minutes = total % per_hour / per_minute;
        let seconds = total % per_minute / per_second;
        let fraction = total % per_second;

        if days > 0 {
            write!(f, "{days}.")?;
        }
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}")?;
        if fraction > 0 {
            write!(f, ".{fraction:07}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_round_trip() {
        for input in ["2025-03-11", "2000-01-01", "9999-12-31"] {
            let date = parse_date(Some(input)).unwrap();
            assert_eq!(format_date(&date), input);
        }
    }

    #[test]
    fn test_date_rejects_impossible_dates() {
        for input in ["Not a date", "2025-13-01", "2025-02-29", "99999-01-01", ""] {
            assert!(parse_date(Some(input)).is_err(), "{input} should be rejected");
        }
        assert!(parse_date(None).is_err());
    }

    #[test]
    fn test_time_pads_and_validates() {
        let time = parse_time(Some("7:05:09")).unwrap();
        assert_eq!(format_time(&time), "07:05:09");
        assert_eq!(format_time(&parse_time(Some("23:59")).unwrap()), "23:59:00");
        for input in ["24:00:00", "12:60:00", "12:00:60", "not-a-time"] {
            assert!(parse_time(Some(input)).is_err(), "{input} should be rejected");
        }
    }

    #[test]
    fn test_timestamp_keeps_offset() {
        let ts = parse_timestamp(Some("2025-03-11T13:45:00+02:00")).unwrap();
        assert_eq!(format_timestamp(&ts), "2025-03-11T13:45:00.0000000+02:00");
    }

    #[test]
    fn test_timestamp_without_offset_is_utc() {
        let ts = parse_timestamp(Some("2025-03-11 13:45:00")).unwrap();
        assert_eq!(format_timestamp(&ts), "2025-03-11T13:45:00.0000000+00:00");
        let zulu = parse_timestamp(Some("2025-03-11T13:45:00.25Z")).unwrap();
        assert_eq!(format_timestamp(&zulu), "2025-03-11T13:45:00.2500000+00:00");
    }

    #[test]
    fn test_timestamp_rejects_garbage() {
        assert!(parse_timestamp(Some("Not a date")).is_err());
        assert!(parse_timestamp(Some("2025-99-99T99:99:99Z")).is_err());
        assert!(parse_timestamp(Some(" ")).is_err());
    }

    #[test]
    fn test_min_timestamp_format() {
        assert_eq!(
            format_timestamp(&min_timestamp()),
            "0001-01-01T00:00:00.0000000+00:00"
        );
    }

    #[test]
    fn test_span_constant_format() {
        let cases = [
            ("00:00:00", "00:00:00"),
            ("02:30:00", "02:30:00"),
            ("1.01:15:30", "1.01:15:30"),
            ("-00:30:00", "-00:30:00"),
            ("3", "3.00:00:00"),
            ("0:0:1.5", "00:00:01.5000000"),
        ];
        for (input, expected) in cases {
            let span = TimeSpan::parse(Some(input)).unwrap();
            assert_eq!(span.to_string(), expected, "input {input}");
        }
    }

    #[test]
    fn test_span_rejects_out_of_range_components() {
        for input in ["abc", "not-a-timespan", "00:60:00", "24:00:00", "00:00:60"] {
            assert!(TimeSpan::parse(Some(input)).is_err(), "{input} should be rejected");
        }
        assert!(TimeSpan::parse(None).is_err());
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        for input in ["12:00:00.\u{665}", "\u{661}\u{662}:00", "00:00:01.\u{665}"] {
            assert!(parse_time(Some(input)).is_err(), "{input} should be rejected");
        }
        for input in ["00:00:01.\u{665}", "\u{663}", "\u{661}.00:00:00"] {
            assert!(TimeSpan::parse(Some(input)).is_err(), "{input} should be rejected");
        }
    }

    #[test]
    fn test_fraction_ticks_pads_to_seven_digits() {
        assert_eq!(fraction_ticks("5"), Some(5_000_000));
        assert_eq!(fraction_ticks("0000001"), Some(1));
        assert_eq!(fraction_ticks("\u{665}"), None);
        assert_eq!(fraction_ticks("12345678"), None);
    }
}
