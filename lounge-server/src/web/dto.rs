//! Data transfer objects for web requests and responses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    InvalidStatus, Reservation, ReservationDraft, ReservationId, ReservationStatus, TimeWindow,
};
use crate::store::StatusCounts;

/// Query with an optional selected date.
#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<NaiveDate>,
}

/// Request for the stations held during a window.
#[derive(Debug, Deserialize)]
pub struct OccupancyQuery {
    pub date: NaiveDate,
    pub start: String,
    pub end: String,

    /// Reservation being edited, if any
    pub exclude: Option<ReservationId>,
}

/// Occupied stations for a requested window.
#[derive(Debug, Serialize)]
pub struct OccupancyResponse {
    pub date: NaiveDate,
    pub start: String,
    pub end: String,

    /// Whether the request resolved to a window
    pub valid: bool,

    /// Resolved window start, when valid
    pub window_start: Option<String>,

    /// Resolved window end, when valid
    pub window_end: Option<String>,

    pub occupied: Vec<String>,
}

impl OccupancyResponse {
    pub fn new(query: OccupancyQuery, occupied: Vec<String>) -> Self {
        let window = TimeWindow::resolve(query.date, query.start.trim(), query.end.trim()).ok();
        Self {
            date: query.date,
            valid: window.is_some(),
            window_start: window.map(|w| w.start().format("%Y-%m-%dT%H:%M").to_string()),
            window_end: window.map(|w| w.end().format("%Y-%m-%dT%H:%M").to_string()),
            start: query.start,
            end: query.end,
            occupied,
        }
    }
}

/// Per-status counts in API responses.
#[derive(Debug, Serialize)]
pub struct CountsResult {
    pub confirmed: usize,
    pub pending: usize,
    pub cancelled: usize,
    pub total: usize,
}

impl From<StatusCounts> for CountsResult {
    fn from(c: StatusCounts) -> Self {
        Self {
            confirmed: c.confirmed,
            pending: c.pending,
            cancelled: c.cancelled,
            total: c.total(),
        }
    }
}

/// One day's reservations.
#[derive(Debug, Serialize)]
pub struct DayReservationsResponse {
    pub date: NaiveDate,
    pub counts: CountsResult,
    pub reservations: Vec<Reservation>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Filters for the reservation list, from `?q=` and repeated `?status=`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub q: String,
    pub statuses: Vec<ReservationStatus>,
}

impl ListQuery {
    /// Unknown status words are ignored.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "q" => query.q = value.trim().to_string(),
                "status" => match value.parse::<ReservationStatus>() {
                    Ok(status) if !query.statuses.contains(&status) => query.statuses.push(status),
                    _ => {}
                },
                _ => {}
            }
        }
        query
    }
}

/// Problems turning a submitted form into a draft.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormError {
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid number of people {0:?}")]
    InvalidPeopleCount(String),

    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatus),
}

/// The reservation form as submitted or as prefilled for display.
///
/// All values are kept as raw strings so a rejected submission can be shown
/// back to the user unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationForm {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub customer_name: String,
    pub phone: String,
    pub people_count: String,

    /// One entry per checked `station` box
    pub stations: Vec<String>,

    pub status: String,
    pub note: String,
    pub created_by: String,
}

impl ReservationForm {
    /// Empty form for `date`.
    pub fn blank(date: NaiveDate) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            start_time: String::new(),
            end_time: String::new(),
            customer_name: String::new(),
            phone: String::new(),
            people_count: "1".into(),
            stations: Vec::new(),
            status: ReservationStatus::default().as_str().into(),
            note: String::new(),
            created_by: String::new(),
        }
    }

    /// Form prefilled from a stored reservation.
    pub fn from_reservation(r: &Reservation) -> Self {
        Self {
            date: r.date.format("%Y-%m-%d").to_string(),
            start_time: r.start_time.clone(),
            end_time: r.end_time.clone(),
            customer_name: r.customer_name.clone(),
            phone: r.phone.clone().unwrap_or_default(),
            people_count: r.people_count.to_string(),
            stations: r.stations.clone(),
            status: r.status.as_str().into(),
            note: r.note.clone().unwrap_or_default(),
            created_by: r.created_by.clone().unwrap_or_default(),
        }
    }

    /// Overlay submitted `key=value` pairs onto `self`.
    ///
    /// The station selection is replaced by the submitted `station` values,
    /// since unchecked boxes are not sent at all.
    pub fn with_pairs(mut self, pairs: &[(String, String)]) -> Self {
        let mut stations = Vec::new();

        for (key, value) in pairs {
            match key.as_str() {
                "date" => self.date = value.clone(),
                "start_time" | "start" => self.start_time = value.clone(),
                "end_time" | "end" => self.end_time = value.clone(),
                "customer_name" => self.customer_name = value.clone(),
                "phone" => self.phone = value.clone(),
                "people_count" => self.people_count = value.clone(),
                "status" => self.status = value.clone(),
                "note" => self.note = value.clone(),
                "created_by" => self.created_by = value.clone(),
                "station" => stations.push(value.clone()),
                _ => {}
            }
        }

        self.stations = stations;
        self
    }

    /// The selected date, if it parses.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    /// Convert to a draft. Field-level rules are checked later by the
    /// booking service.
    pub fn to_draft(&self) -> Result<ReservationDraft, FormError> {
        let date = self
            .parsed_date()
            .ok_or_else(|| FormError::InvalidDate(self.date.clone()))?;
        let people_count = self
            .people_count
            .trim()
            .parse()
            .map_err(|_| FormError::InvalidPeopleCount(self.people_count.clone()))?;
        let status = self.status.trim().parse()?;

        Ok(ReservationDraft {
            date,
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            customer_name: self.customer_name.clone(),
            phone: Some(self.phone.clone()),
            people_count,
            stations: self.stations.clone(),
            status,
            note: Some(self.note.clone()),
            created_by: Some(self.created_by.clone()),
        })
    }
}
