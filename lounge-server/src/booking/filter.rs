//! Reservation list filtering.

use crate::domain::{Reservation, ReservationStatus};

/// Filter for the reservation list page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationFilter {
    /// Case-insensitive free text
    pub query: Option<String>,

    /// Statuses to keep; empty keeps every status
    pub statuses: Vec<ReservationStatus>,
}

impl ReservationFilter {
    pub fn new(query: Option<String>, statuses: Vec<ReservationStatus>) -> Self {
        let query = query
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());
        Self { query, statuses }
    }

    /// Whether `reservation` passes both the status and text filters.
    pub fn matches(&self, reservation: &Reservation) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&reservation.status) {
            return false;
        }

        match &self.query {
            Some(q) => haystack(reservation).contains(q.as_str()),
            None => true,
        }
    }
}

/// The searchable text of a reservation, lowercased.
fn haystack(r: &Reservation) -> String {
    format!(
        "{} | {} | {} | {} | {} | {} | {}",
        r.customer_name,
        r.phone.as_deref().unwrap_or(""),
        r.stations_display(),
        r.note.as_deref().unwrap_or(""),
        r.date,
        r.start_time,
        r.end_time,
    )
    .to_lowercase()
}
