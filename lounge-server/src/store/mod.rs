//! Reservation persistence.
//!
//! The occupancy engine only needs one query from storage: the non-cancelled
//! reservations dated on a handful of days. Everything else here serves the
//! booking pages. Both backends implement [`ReservationStore`]; which one is
//! used is decided once, from configuration, at startup.

mod error;
mod memory;
mod sqlite;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::{
    ActiveReservation, Reservation, ReservationDraft, ReservationId, ReservationStatus,
};

pub use error::StoreError;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Per-status reservation counts for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub confirmed: usize,
    pub pending: usize,
    pub cancelled: usize,
}

impl StatusCounts {
    /// Count one more reservation with `status`.
    pub fn add(&mut self, status: ReservationStatus, n: usize) {
        match status {
            ReservationStatus::Confirmed => self.confirmed += n,
            ReservationStatus::Pending => self.pending += n,
            ReservationStatus::Cancelled => self.cancelled += n,
        }
    }

    pub fn total(&self) -> usize {
        self.confirmed + self.pending + self.cancelled
    }
}

/// Durable mapping from reservation id to reservation.
///
/// Implementations must use parameterized queries and must not cache: every
/// call reflects the store's state at call time.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Non-cancelled reservations dated on any of `dates`, minus `exclude`.
    async fn query_active_reservations(
        &self,
        dates: &[NaiveDate],
        exclude: Option<ReservationId>,
    ) -> Result<Vec<ActiveReservation>, StoreError>;

    /// Store a new reservation and return its id.
    async fn insert(
        &self,
        draft: &ReservationDraft,
        created_at: NaiveDateTime,
    ) -> Result<ReservationId, StoreError>;

    /// Replace the editable fields of a reservation.
    ///
    /// `created_by` and `created_at` are kept from the original record.
    async fn update(&self, id: ReservationId, draft: &ReservationDraft) -> Result<(), StoreError>;

    /// Mark a reservation cancelled.
    async fn cancel(&self, id: ReservationId) -> Result<(), StoreError>;

    async fn get(&self, id: ReservationId) -> Result<Option<Reservation>, StoreError>;

    /// Every reservation, newest date first, then latest start first.
    async fn list_all(&self) -> Result<Vec<Reservation>, StoreError>;

    /// Reservations dated `date`, ordered by start time.
    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Reservation>, StoreError>;

    /// Per-status counts for reservations dated `date`.
    async fn status_counts(&self, date: NaiveDate) -> Result<StatusCounts, StoreError>;
}
