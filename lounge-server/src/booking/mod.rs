//! Booking operations over a reservation store.
//!
//! [`BookingService`] is the only writer: every create and update is
//! validated, then checked against current occupancy before it reaches the
//! store. The check and the write are separate store calls, so two
//! concurrent submissions for the same station can both succeed.

mod filter;

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use tracing::{info, warn};

use crate::domain::{Reservation, ReservationDraft, ReservationId, TimeWindow, ValidationError};
use crate::occupancy::{adjacent_dates, collect_occupied, conflicts};
use crate::store::{ReservationStore, StatusCounts, StoreError};

pub use filter::ReservationFilter;

/// Errors from booking operations.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("invalid reservation: {0}")]
    Invalid(#[from] ValidationError),

    #[error("stations already booked: {}", .0.join(", "))]
    StationsUnavailable(Vec<String>),

    #[error("reservation {0} not found")]
    NotFound(ReservationId),

    #[error("storage error: {0}")]
    Store(#[source] StoreError),
}

impl From<StoreError> for BookingError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => BookingError::NotFound(id),
            other => BookingError::Store(other),
        }
    }
}

/// One day at a glance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub counts: StatusCounts,

    /// Ordered by start time
    pub reservations: Vec<Reservation>,
}

/// Reservation use cases.
#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn ReservationStore>,
}

impl BookingService {
    pub fn new(store: Arc<dyn ReservationStore>) -> Self {
        Self { store }
    }

    /// Stations held during the requested window.
    ///
    /// Times are trimmed the same way a saved draft is. A request that does
    /// not resolve to a window yields the empty set without touching the
    /// store.
    pub async fn occupied(
        &self,
        date: NaiveDate,
        start: &str,
        end: &str,
        exclude: Option<ReservationId>,
    ) -> Result<BTreeSet<String>, BookingError> {
        match TimeWindow::resolve(date, start.trim(), end.trim()) {
            Ok(window) => Ok(self.occupied_in(date, &window, exclude).await?),
            Err(_) => Ok(BTreeSet::new()),
        }
    }

    async fn occupied_in(
        &self,
        date: NaiveDate,
        window: &TimeWindow,
        exclude: Option<ReservationId>,
    ) -> Result<BTreeSet<String>, StoreError> {
        let rows = self
            .store
            .query_active_reservations(&adjacent_dates(date), exclude)
            .await?;
        Ok(collect_occupied(date, window, &rows, exclude))
    }

    /// Fail with the requested stations that someone else holds.
    async fn ensure_available(
        &self,
        draft: &ReservationDraft,
        window: &TimeWindow,
        exclude: Option<ReservationId>,
    ) -> Result<(), BookingError> {
        if !draft.status.is_active() {
            return Ok(());
        }

        let occupied = self.occupied_in(draft.date, window, exclude).await?;
        let clashes = conflicts(&draft.stations, &occupied);
        if clashes.is_empty() {
            Ok(())
        } else {
            warn!(date = %draft.date, stations = ?clashes, "rejected overlapping booking");
            Err(BookingError::StationsUnavailable(clashes))
        }
    }

    /// Validate and store a new reservation.
    pub async fn create(&self, draft: ReservationDraft) -> Result<ReservationId, BookingError> {
        let draft = draft.normalized();
        let window = draft.validate()?;
        self.ensure_available(&draft, &window, None).await?;

        let id = self.store.insert(&draft, now()).await?;
        info!(
            %id,
            date = %draft.date,
            start = %draft.start_time,
            end = %draft.end_time,
            stations = %draft.stations_raw(),
            "reservation created"
        );
        Ok(id)
    }

    /// Validate and replace an existing reservation.
    ///
    /// The reservation's own current stations never count against it.
    pub async fn update(
        &self,
        id: ReservationId,
        draft: ReservationDraft,
    ) -> Result<(), BookingError> {
        if self.store.get(id).await?.is_none() {
            return Err(BookingError::NotFound(id));
        }

        let draft = draft.normalized();
        let window = draft.validate()?;
        self.ensure_available(&draft, &window, Some(id)).await?;

        self.store.update(id, &draft).await?;
        info!(%id, status = %draft.status, stations = %draft.stations_raw(), "reservation updated");
        Ok(())
    }

    pub async fn cancel(&self, id: ReservationId) -> Result<(), BookingError> {
        self.store.cancel(id).await?;
        info!(%id, "reservation cancelled");
        Ok(())
    }

    pub async fn get(&self, id: ReservationId) -> Result<Reservation, BookingError> {
        self.store.get(id).await?.ok_or(BookingError::NotFound(id))
    }

    /// Every reservation passing `filter`, newest date first.
    pub async fn list(&self, filter: &ReservationFilter) -> Result<Vec<Reservation>, BookingError> {
        let mut rows = self.store.list_all().await?;
        rows.retain(|r| filter.matches(r));
        Ok(rows)
    }

    pub async fn day_summary(&self, date: NaiveDate) -> Result<DaySummary, BookingError> {
        let counts = self.store.status_counts(date).await?;
        let reservations = self.store.list_by_date(date).await?;
        Ok(DaySummary {
            date,
            counts,
            reservations,
        })
    }
}

/// Local wall-clock time to the second.
fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}
