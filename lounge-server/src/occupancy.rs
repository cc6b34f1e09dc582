//! Station occupancy for a candidate window.
//!
//! Given a requested `(date, start, end)` and the reservations stored on the
//! surrounding days, this module works out which stations are already held.
//! A reservation stored under `D - 1` can still be running into `D`, and one
//! stored under `D + 1` may begin before a late request on `D` ends, so the
//! store is asked for three consecutive dates.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::{ActiveReservation, ReservationId, TimeWindow};

/// The dates whose reservations can overlap a window requested on `date`.
///
/// Returns `[date - 1, date, date + 1]`, minus any day outside the
/// representable calendar.
pub fn adjacent_dates(date: NaiveDate) -> Vec<NaiveDate> {
    [date.pred_opt(), Some(date), date.succ_opt()]
        .into_iter()
        .flatten()
        .collect()
}

/// Stations held by reservations overlapping `window`.
///
/// Only reservations dated within one day of `date` are considered; the
/// reservation with id `exclude` is ignored. Records whose own times do not
/// resolve are skipped with a warning rather than failing the query.
pub fn collect_occupied(
    date: NaiveDate,
    window: &TimeWindow,
    reservations: &[ActiveReservation],
    exclude: Option<ReservationId>,
) -> BTreeSet<String> {
    let mut occupied = BTreeSet::new();

    for reservation in reservations {
        if Some(reservation.id) == exclude {
            continue;
        }
        if (reservation.date - date).num_days().abs() > 1 {
            continue;
        }

        let other = match reservation.window() {
            Ok(w) => w,
            Err(e) => {
                warn!(
                    id = %reservation.id,
                    error = %e,
                    "skipping reservation with unresolvable window"
                );
                continue;
            }
        };

        if window.overlaps(&other) {
            occupied.extend(reservation.stations());
        }
    }

    occupied
}

/// Stations unavailable for a requested `(date, start, end)`.
///
/// Returns the empty set when the request itself does not resolve to a
/// window; validity is reported separately by the caller.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use lounge_server::domain::{ActiveReservation, ReservationId};
/// use lounge_server::occupancy::occupied_stations;
///
/// let d = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
/// let stored = vec![ActiveReservation {
///     id: ReservationId(1),
///     date: d,
///     start_time: "22:00".into(),
///     end_time: "07:00".into(),
///     stations_raw: "Y-01, Y-02".into(),
/// }];
///
/// let busy = occupied_stations(d, "22:30", "unknown", &stored, None);
/// assert_eq!(busy.into_iter().collect::<Vec<_>>(), vec!["Y-01", "Y-02"]);
/// ```
pub fn occupied_stations(
    date: NaiveDate,
    start: &str,
    end: &str,
    reservations: &[ActiveReservation],
    exclude: Option<ReservationId>,
) -> BTreeSet<String> {
    match TimeWindow::resolve(date, start, end) {
        Ok(window) => collect_occupied(date, &window, reservations, exclude),
        Err(_) => BTreeSet::new(),
    }
}

/// Requested stations that appear in `occupied`, in request order.
pub fn conflicts(requested: &[String], occupied: &BTreeSet<String>) -> Vec<String> {
    requested
        .iter()
        .filter(|s| occupied.contains(*s))
        .cloned()
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    prop_compose! {
        fn valid_time()(hour in 0u32..24, minute in 0u32..60) -> String {
            format!("{:02}:{:02}", hour, minute)
        }
    }

    prop_compose! {
        fn stored()(
            id in 1i64..1000,
            offset in -1i64..=1,
            start in valid_time(),
            end in valid_time(),
            idx in 1u8..=32
        ) -> ActiveReservation {
            let base = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
            ActiveReservation {
                id: ReservationId(id),
                date: base + chrono::Duration::days(offset),
                start_time: start,
                end_time: end,
                stations_raw: format!("Y-{:02}", idx),
            }
        }
    }

    proptest! {
        /// Excluding an id never reports a station only that reservation holds
        #[test]
        fn exclusion_removes_own_stations(
            rows in proptest::collection::vec(stored(), 0..12),
            start in valid_time(),
            end in valid_time()
        ) {
            let d = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
            for r in &rows {
                let busy = occupied_stations(d, &start, &end, &rows, Some(r.id));
                let held_elsewhere = rows
                    .iter()
                    .filter(|o| o.id != r.id)
                    .any(|o| o.stations_raw == r.stations_raw);
                if !held_elsewhere {
                    prop_assert!(!busy.contains(&r.stations_raw));
                }
            }
        }

        /// Every reported station belongs to some overlapping reservation
        #[test]
        fn reported_stations_come_from_overlaps(
            rows in proptest::collection::vec(stored(), 0..12),
            start in valid_time(),
            end in valid_time()
        ) {
            let d = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
            let window = TimeWindow::resolve(d, &start, &end).unwrap();
            let busy = collect_occupied(d, &window, &rows, None);
            for station in &busy {
                let explained = rows.iter().any(|r| {
                    &r.stations_raw == station && r.window().unwrap().overlaps(&window)
                });
                prop_assert!(explained, "{} has no overlapping holder", station);
            }
        }
    }
}
