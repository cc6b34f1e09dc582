//! Wall-clock time handling for reservations.
//!
//! Reservations store their start and end as "HH:MM" strings next to a
//! calendar date. The end may also be the literal sentinel `unknown`, meaning
//! the customer has not said when they will leave.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt;
use std::str::FromStr;

/// Sentinel stored in place of an end time that is not yet known.
///
/// Matching is case-sensitive: only the lowercase word triggers the
/// open-ended rule.
pub const UNKNOWN_END: &str = "unknown";

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }

    /// Short description of what was wrong with the input.
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

/// A time of day with minute precision, parsed from "HH:MM".
///
/// # Examples
///
/// ```
/// use lounge_server::domain::ClockTime;
///
/// let t = ClockTime::parse_hhmm("19:05").unwrap();
/// assert_eq!(t.hour(), 19);
/// assert_eq!(t.minute(), 5);
/// assert_eq!(t.to_string(), "19:05");
///
/// assert!(ClockTime::parse_hhmm("1905").is_err());
/// assert!(ClockTime::parse_hhmm("9:05").is_err());
/// assert!(ClockTime::parse_hhmm("24:00").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Parse a time from strict "HH:MM" format.
    ///
    /// Exactly five ASCII characters are accepted: two digits, a colon and
    /// two digits, with hours in `00..=23` and minutes in `00..=59`.
    pub fn parse_hhmm(s: &str) -> Result<Self, TimeError> {
        if s.len() != 5 {
            return Err(TimeError::new("expected HH:MM format"));
        }

        let bytes = s.as_bytes();

        if bytes[2] != b':' {
            return Err(TimeError::new("expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new("hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new("invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new("minute must be 0-59"));
        }

        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| TimeError::new("invalid time"))?;

        Ok(Self(time))
    }

    /// Create from hour and minute, if in range.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Returns the underlying chrono time.
    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }

    /// Anchor this time of day on a calendar date.
    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.0)
    }
}

impl FromStr for ClockTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hhmm(s)
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// The end of a reservation: either a time of day or not yet known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndTime {
    At(ClockTime),
    Unknown,
}

impl EndTime {
    /// Parse an end time, accepting "HH:MM" or the `unknown` sentinel.
    ///
    /// ```
    /// use lounge_server::domain::{ClockTime, EndTime};
    ///
    /// assert_eq!(EndTime::parse("unknown").unwrap(), EndTime::Unknown);
    /// assert_eq!(
    ///     EndTime::parse("07:00").unwrap(),
    ///     EndTime::At(ClockTime::parse_hhmm("07:00").unwrap())
    /// );
    /// assert!(EndTime::parse("Unknown").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        if s == UNKNOWN_END {
            return Ok(Self::Unknown);
        }
        ClockTime::parse_hhmm(s).map(Self::At)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for EndTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At(t) => t.fmt(f),
            Self::Unknown => f.write_str(UNKNOWN_END),
        }
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_times() {
        let t = ClockTime::parse_hhmm("00:00").unwrap();
        assert_eq!(t.hour(), 0);
        assert_eq!(t.minute(), 0);

        let t = ClockTime::parse_hhmm("23:59").unwrap();
        assert_eq!(t.hour(), 23);
        assert_eq!(t.minute(), 59);

        let t = ClockTime::parse_hhmm("19:30").unwrap();
        assert_eq!(t.hour(), 19);
        assert_eq!(t.minute(), 30);
    }

    #[test]
    fn parse_invalid_format() {
        // Wrong length
        assert!(ClockTime::parse_hhmm("1930").is_err());
        assert!(ClockTime::parse_hhmm("9:30").is_err());
        assert!(ClockTime::parse_hhmm("19:300").is_err());
        assert!(ClockTime::parse_hhmm("").is_err());

        // Missing colon
        assert!(ClockTime::parse_hhmm("19-30").is_err());
        assert!(ClockTime::parse_hhmm("19.30").is_err());

        // Non-numeric
        assert!(ClockTime::parse_hhmm("ab:cd").is_err());
        assert!(ClockTime::parse_hhmm("1a:30").is_err());
        assert!(ClockTime::parse_hhmm(" 9:30").is_err());
        assert!(ClockTime::parse_hhmm("+9:30").is_err());
    }

    #[test]
    fn parse_out_of_range() {
        assert!(ClockTime::parse_hhmm("24:00").is_err());
        assert!(ClockTime::parse_hhmm("99:00").is_err());
        assert!(ClockTime::parse_hhmm("12:60").is_err());
        assert!(ClockTime::parse_hhmm("12:99").is_err());
    }

    #[test]
    fn multibyte_input_rejected() {
        // Five bytes but not five ASCII characters
        assert!(ClockTime::parse_hhmm("1é:0").is_err());
    }

    #[test]
    fn error_reasons() {
        let err = ClockTime::parse_hhmm("24:00").unwrap_err();
        assert_eq!(err.reason(), "hour must be 0-23");
        assert_eq!(err.to_string(), "invalid time: hour must be 0-23");

        let err = ClockTime::parse_hhmm("1200").unwrap_err();
        assert_eq!(err.reason(), "expected HH:MM format");
    }

    #[test]
    fn display_and_debug() {
        let t = ClockTime::parse_hhmm("07:05").unwrap();
        assert_eq!(t.to_string(), "07:05");
        assert_eq!(format!("{:?}", t), "ClockTime(07:05)");
    }

    #[test]
    fn ordering() {
        let early = ClockTime::parse_hhmm("07:00").unwrap();
        let late = ClockTime::parse_hhmm("22:00").unwrap();
        assert!(early < late);
    }

    #[test]
    fn anchored_on_date() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let t = ClockTime::parse_hhmm("22:00").unwrap();
        assert_eq!(t.on(date).to_string(), "2024-05-10 22:00:00");
    }

    #[test]
    fn end_time_sentinel_is_case_sensitive() {
        assert_eq!(EndTime::parse("unknown").unwrap(), EndTime::Unknown);
        assert!(EndTime::parse("UNKNOWN").is_err());
        assert!(EndTime::parse("Unknown").is_err());
        assert!(EndTime::parse(" unknown").is_err());
    }

    #[test]
    fn end_time_display() {
        assert_eq!(EndTime::Unknown.to_string(), "unknown");
        let end = EndTime::parse("01:15").unwrap();
        assert_eq!(end.to_string(), "01:15");
        assert!(!end.is_unknown());
    }
}
