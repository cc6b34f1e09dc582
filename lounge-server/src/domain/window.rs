//! Reservation time windows.
//!
//! A window is the half-open interval `[start, end)` during which a
//! reservation holds its stations. Windows are derived on demand from the
//! stored date and time strings and are never persisted.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::fmt;

use super::time::{ClockTime, EndTime, TimeError};

/// How long a reservation with an `unknown` end blocks its stations.
///
/// This is a deliberately conservative full day from the start instant.
const UNKNOWN_END_BLOCK_HOURS: i64 = 24;

/// Error returned when a window cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    /// A start or end string failed the HH:MM grammar or range check
    #[error("malformed {field} time: {source}")]
    MalformedTime {
        field: &'static str,
        #[source]
        source: TimeError,
    },

    /// End is not strictly after start
    #[error("window end {end} is not after start {start}")]
    ZeroDuration {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// Start or end falls outside the representable calendar
    #[error("window falls outside the supported date range")]
    OutOfRange,
}

/// A half-open interval of absolute instants with positive duration.
///
/// # Examples
///
/// ```
/// use lounge_server::domain::TimeWindow;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
///
/// // Overnight session rolls the end over to the next day
/// let w = TimeWindow::resolve(date, "22:00", "07:00").unwrap();
/// assert_eq!(w.end().date(), NaiveDate::from_ymd_opt(2024, 5, 11).unwrap());
///
/// // Back-to-back bookings do not overlap
/// let a = TimeWindow::resolve(date, "10:00", "12:00").unwrap();
/// let b = TimeWindow::resolve(date, "12:00", "14:00").unwrap();
/// assert!(!a.overlaps(&b));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeWindow {
    /// Build a window from explicit instants.
    ///
    /// Fails with [`WindowError::ZeroDuration`] unless `end > start`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, WindowError> {
        if end <= start {
            return Err(WindowError::ZeroDuration { start, end });
        }
        Ok(Self { start, end })
    }

    /// Resolve a stored `(date, start, end)` triple into a window.
    ///
    /// The end is rolled over to the next day at most once when it is not
    /// strictly after the start. An `unknown` end blocks a full day.
    pub fn resolve(date: NaiveDate, start: &str, end: &str) -> Result<Self, WindowError> {
        let start = ClockTime::parse_hhmm(start).map_err(|source| WindowError::MalformedTime {
            field: "start",
            source,
        })?;
        let end = EndTime::parse(end).map_err(|source| WindowError::MalformedTime {
            field: "end",
            source,
        })?;
        Self::from_parts(date, start, end)
    }

    /// Resolve already-parsed parts into a window.
    pub fn from_parts(
        date: NaiveDate,
        start: ClockTime,
        end: EndTime,
    ) -> Result<Self, WindowError> {
        let start_at = start.on(date);

        let end_at = match end {
            EndTime::Unknown => start_at
                .checked_add_signed(Duration::hours(UNKNOWN_END_BLOCK_HOURS))
                .ok_or(WindowError::OutOfRange)?,
            EndTime::At(end) => {
                let candidate = end.on(date);
                if candidate > start_at {
                    candidate
                } else {
                    candidate
                        .checked_add_signed(Duration::days(1))
                        .ok_or(WindowError::OutOfRange)?
                }
            }
        };

        Self::new(start_at, end_at)
    }

    /// Inclusive start instant.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Exclusive end instant.
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Length of the window. Always positive.
    pub fn duration(&self) -> Duration {
        self.end.signed_duration_since(self.start)
    }

    /// Whether two windows share any instant.
    ///
    /// Touching windows (one ends exactly when the other starts) do not
    /// overlap.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether an instant falls inside the window.
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }
}

impl fmt::Debug for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeWindow({}..{})", self.start, self.end)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} .. {}",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(d: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        d.and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn same_day_window() {
        let d = date(2024, 5, 10);
        let w = TimeWindow::resolve(d, "19:00", "21:00").unwrap();
        assert_eq!(w.start(), at(d, 19, 0));
        assert_eq!(w.end(), at(d, 21, 0));
        assert_eq!(w.duration(), Duration::hours(2));
    }

    #[test]
    fn overnight_rollover() {
        let d = date(2024, 5, 10);
        let w = TimeWindow::resolve(d, "22:00", "07:00").unwrap();
        assert_eq!(w.start(), at(d, 22, 0));
        assert_eq!(w.end(), at(date(2024, 5, 11), 7, 0));
    }

    #[test]
    fn equal_start_and_end_rolls_to_full_day() {
        let d = date(2024, 5, 10);
        let w = TimeWindow::resolve(d, "18:00", "18:00").unwrap();
        assert_eq!(w.end(), at(date(2024, 5, 11), 18, 0));
        assert_eq!(w.duration(), Duration::hours(24));
    }

    #[test]
    fn unknown_end_blocks_a_day() {
        let d = date(2024, 5, 10);
        let w = TimeWindow::resolve(d, "23:30", "unknown").unwrap();
        assert_eq!(w.start(), at(d, 23, 30));
        assert_eq!(w.end(), at(date(2024, 5, 11), 23, 30));
    }

    #[test]
    fn rollover_across_month_and_year() {
        let w = TimeWindow::resolve(date(2023, 12, 31), "23:00", "01:00").unwrap();
        assert_eq!(w.end(), at(date(2024, 1, 1), 1, 0));

        let w = TimeWindow::resolve(date(2024, 2, 29), "20:00", "02:00").unwrap();
        assert_eq!(w.end(), at(date(2024, 3, 1), 2, 0));
    }

    #[test]
    fn malformed_start_rejected() {
        let d = date(2024, 5, 10);
        let err = TimeWindow::resolve(d, "7:00", "09:00").unwrap_err();
        assert!(matches!(
            err,
            WindowError::MalformedTime { field: "start", .. }
        ));

        // The sentinel is only meaningful as an end
        assert!(TimeWindow::resolve(d, "unknown", "09:00").is_err());
    }

    #[test]
    fn malformed_end_rejected() {
        let d = date(2024, 5, 10);
        let err = TimeWindow::resolve(d, "07:00", "25:00").unwrap_err();
        assert!(matches!(
            err,
            WindowError::MalformedTime { field: "end", .. }
        ));
        assert!(TimeWindow::resolve(d, "07:00", "UNKNOWN").is_err());
        assert!(TimeWindow::resolve(d, "07:00", "").is_err());
    }

    #[test]
    fn explicit_instants_must_have_positive_duration() {
        let d = date(2024, 5, 10);
        let err = TimeWindow::new(at(d, 12, 0), at(d, 12, 0)).unwrap_err();
        assert!(matches!(err, WindowError::ZeroDuration { .. }));
        assert!(TimeWindow::new(at(d, 12, 0), at(d, 11, 0)).is_err());
        assert!(TimeWindow::new(at(d, 12, 0), at(d, 12, 1)).is_ok());
    }

    #[test]
    fn out_of_range_end() {
        let w = TimeWindow::resolve(NaiveDate::MAX, "22:00", "07:00");
        assert_eq!(w.unwrap_err(), WindowError::OutOfRange);
    }

    #[test]
    fn touching_windows_do_not_overlap() {
        let d = date(2024, 5, 10);
        let a = TimeWindow::resolve(d, "10:00", "12:00").unwrap();
        let b = TimeWindow::resolve(d, "12:00", "14:00").unwrap();
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn one_minute_overlap() {
        let d = date(2024, 5, 10);
        let a = TimeWindow::resolve(d, "10:00", "12:01").unwrap();
        let b = TimeWindow::resolve(d, "12:00", "14:00").unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn containment_overlaps() {
        let d = date(2024, 5, 10);
        let outer = TimeWindow::resolve(d, "09:00", "18:00").unwrap();
        let inner = TimeWindow::resolve(d, "12:00", "13:00").unwrap();
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn contains_is_half_open() {
        let d = date(2024, 5, 10);
        let w = TimeWindow::resolve(d, "10:00", "12:00").unwrap();
        assert!(w.contains(at(d, 10, 0)));
        assert!(w.contains(at(d, 11, 59)));
        assert!(!w.contains(at(d, 12, 0)));
        assert!(!w.contains(at(d, 9, 59)));
    }

    #[test]
    fn cross_midnight_overlap_with_next_day() {
        let stored = TimeWindow::resolve(date(2024, 1, 1), "23:00", "01:00").unwrap();
        let query = TimeWindow::resolve(date(2024, 1, 2), "00:30", "02:00").unwrap();
        assert!(stored.overlaps(&query));
    }

    #[test]
    fn display() {
        let w = TimeWindow::resolve(date(2024, 5, 10), "22:00", "07:00").unwrap();
        assert_eq!(w.to_string(), "2024-05-10 22:00 .. 2024-05-11 07:00");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::UNKNOWN_END;
    use proptest::prelude::*;

    prop_compose! {
        fn valid_time()(hour in 0u32..24, minute in 0u32..60) -> String {
            format!("{:02}:{:02}", hour, minute)
        }
    }

    prop_compose! {
        fn valid_end()(time in valid_time(), unknown in proptest::bool::weighted(0.2)) -> String {
            if unknown { UNKNOWN_END.to_string() } else { time }
        }
    }

    prop_compose! {
        fn valid_date()(
            year in 2000i32..2100,
            month in 1u32..=12,
            day in 1u32..=28  // Safe for all months
        ) -> NaiveDate {
            NaiveDate::from_ymd_opt(year, month, day).unwrap()
        }
    }

    prop_compose! {
        fn window()(date in valid_date(), start in valid_time(), end in valid_end()) -> TimeWindow {
            TimeWindow::resolve(date, &start, &end).unwrap()
        }
    }

    proptest! {
        /// Valid inputs always resolve to a positive window starting on the date
        #[test]
        fn resolved_window_is_positive(
            date in valid_date(),
            start in valid_time(),
            end in valid_end()
        ) {
            let w = TimeWindow::resolve(date, &start, &end).unwrap();
            prop_assert!(w.end() > w.start());
            prop_assert_eq!(w.start().date(), date);
            prop_assert!(w.duration() <= Duration::hours(24));
        }

        /// Rollover happens at most once
        #[test]
        fn end_lands_on_date_or_next_day(
            date in valid_date(),
            start in valid_time(),
            end in valid_end()
        ) {
            let w = TimeWindow::resolve(date, &start, &end).unwrap();
            let end_date = w.end().date();
            prop_assert!(end_date == date || Some(end_date) == date.succ_opt());
        }

        /// Overlap is symmetric
        #[test]
        fn overlap_symmetric(a in window(), b in window()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        /// Every window overlaps itself
        #[test]
        fn overlap_reflexive(a in window()) {
            prop_assert!(a.overlaps(&a));
        }

        /// A window never overlaps the one that starts exactly at its end
        #[test]
        fn adjacent_never_overlap(a in window(), mins in 1i64..600) {
            let next = TimeWindow::new(a.end(), a.end() + Duration::minutes(mins)).unwrap();
            prop_assert!(!a.overlaps(&next));
        }
    }
}
