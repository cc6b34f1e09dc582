//! Reservation records and drafts.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{InvalidStatus, ValidationError};
use super::station::{format_station_list, normalize_selection, parse_station_list};
use super::time::{ClockTime, EndTime};
use super::window::{TimeWindow, WindowError};

/// Smallest accepted party size.
pub const MIN_PEOPLE: u32 = 1;

/// Largest accepted party size.
pub const MAX_PEOPLE: u32 = 50;

/// Identifier assigned by the store when a reservation is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(pub i64);

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ReservationId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Lifecycle state of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Confirmed,
    Pending,
    Cancelled,
}

impl ReservationStatus {
    /// Every status, in display order.
    pub const ALL: [ReservationStatus; 3] = [Self::Confirmed, Self::Pending, Self::Cancelled];

    /// The persisted lowercase word.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Confirmed => "Confirmed",
            Self::Pending => "Pending",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Whether reservations in this state hold their stations.
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl FromStr for ReservationStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(Self::Confirmed),
            "pending" => Ok(Self::Pending),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    pub id: ReservationId,

    /// Date the start instant falls on
    pub date: NaiveDate,

    /// "HH:MM"
    pub start_time: String,

    /// "HH:MM" or `unknown`
    pub end_time: String,

    /// Station identifiers in canonical order
    pub stations: Vec<String>,

    pub status: ReservationStatus,
    pub customer_name: String,
    pub phone: Option<String>,
    pub people_count: u32,
    pub note: Option<String>,
    pub created_by: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Reservation {
    /// Resolve the window this reservation occupies.
    pub fn window(&self) -> Result<TimeWindow, WindowError> {
        TimeWindow::resolve(self.date, &self.start_time, &self.end_time)
    }

    /// Whether this reservation holds its stations.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Stations joined for display or persistence.
    pub fn stations_display(&self) -> String {
        format_station_list(&self.stations)
    }

    /// The occupancy row for this reservation, or `None` if cancelled.
    pub fn as_active(&self) -> Option<ActiveReservation> {
        self.is_active().then(|| ActiveReservation {
            id: self.id,
            date: self.date,
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            stations_raw: self.stations_display(),
        })
    }
}

/// The fields of a non-cancelled reservation the occupancy engine reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveReservation {
    pub id: ReservationId,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,

    /// Stations as persisted, comma-joined
    pub stations_raw: String,
}

impl ActiveReservation {
    /// Resolve the window this reservation occupies.
    pub fn window(&self) -> Result<TimeWindow, WindowError> {
        TimeWindow::resolve(self.date, &self.start_time, &self.end_time)
    }

    /// Parsed station list.
    pub fn stations(&self) -> Vec<String> {
        parse_station_list(&self.stations_raw)
    }
}

/// Caller-supplied fields for creating or updating a reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationDraft {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub customer_name: String,
    pub phone: Option<String>,
    pub people_count: u32,
    pub stations: Vec<String>,
    pub status: ReservationStatus,
    pub note: Option<String>,
    pub created_by: Option<String>,
}

impl ReservationDraft {
    /// Trim text fields, blank optionals to `None`, canonicalize stations.
    pub fn normalized(self) -> Self {
        Self {
            start_time: self.start_time.trim().to_string(),
            end_time: self.end_time.trim().to_string(),
            customer_name: self.customer_name.trim().to_string(),
            phone: non_blank(self.phone),
            stations: normalize_selection(&self.stations),
            note: non_blank(self.note),
            created_by: non_blank(self.created_by),
            ..self
        }
    }

    /// Check the draft and resolve its window.
    ///
    /// Expects a [`normalized`](Self::normalized) draft.
    pub fn validate(&self) -> Result<TimeWindow, ValidationError> {
        if self.customer_name.is_empty() {
            return Err(ValidationError::MissingCustomerName);
        }

        if !(MIN_PEOPLE..=MAX_PEOPLE).contains(&self.people_count) {
            return Err(ValidationError::PeopleCountOutOfRange {
                min: MIN_PEOPLE,
                max: MAX_PEOPLE,
                got: self.people_count,
            });
        }

        let start = ClockTime::parse_hhmm(&self.start_time).map_err(|source| {
            ValidationError::MalformedTime {
                field: "start",
                value: self.start_time.clone(),
                source,
            }
        })?;
        let end =
            EndTime::parse(&self.end_time).map_err(|source| ValidationError::MalformedTime {
                field: "end",
                value: self.end_time.clone(),
                source,
            })?;

        let window = TimeWindow::from_parts(self.date, start, end).map_err(|e| match e {
            WindowError::OutOfRange => ValidationError::DateOutOfRange,
            _ => ValidationError::ZeroDurationWindow,
        })?;

        if self.status.is_active() && self.stations.is_empty() {
            return Err(ValidationError::NoStationsSelected);
        }

        Ok(window)
    }

    /// Stations joined for persistence.
    pub fn stations_raw(&self) -> String {
        format_station_list(&self.stations)
    }

    /// Materialize as a stored reservation.
    pub fn into_reservation(self, id: ReservationId, created_at: NaiveDateTime) -> Reservation {
        Reservation {
            id,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            stations: self.stations,
            status: self.status,
            customer_name: self.customer_name,
            phone: self.phone,
            people_count: self.people_count,
            note: self.note,
            created_by: self.created_by,
            created_at,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
