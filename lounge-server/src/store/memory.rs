//! In-process reservation store.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use tokio::sync::RwLock;

use crate::domain::{
    ActiveReservation, Reservation, ReservationDraft, ReservationId, ReservationStatus,
};

use super::{ReservationStore, StatusCounts, StoreError};

#[derive(Default)]
struct Inner {
    next_id: i64,
    rows: BTreeMap<ReservationId, Reservation>,
}

/// Reservations held in memory, lost on restart.
///
/// Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored reservations, cancelled included.
    pub async fn len(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.rows.is_empty()
    }
}

#[async_trait]
impl ReservationStore for MemoryStore {
    async fn query_active_reservations(
        &self,
        dates: &[NaiveDate],
        exclude: Option<ReservationId>,
    ) -> Result<Vec<ActiveReservation>, StoreError> {
        let guard = self.inner.read().await;
        Ok(guard
            .rows
            .values()
            .filter(|r| dates.contains(&r.date) && Some(r.id) != exclude)
            .filter_map(Reservation::as_active)
            .collect())
    }

    async fn insert(
        &self,
        draft: &ReservationDraft,
        created_at: NaiveDateTime,
    ) -> Result<ReservationId, StoreError> {
        let mut guard = self.inner.write().await;
        guard.next_id += 1;
        let id = ReservationId(guard.next_id);
        guard
            .rows
            .insert(id, draft.clone().into_reservation(id, created_at));
        Ok(id)
    }

    async fn update(&self, id: ReservationId, draft: &ReservationDraft) -> Result<(), StoreError> {
        let mut guard = self.inner.write().await;
        let existing = guard.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        let created_by = existing.created_by.take();
        let created_at = existing.created_at;
        *existing = ReservationDraft {
            created_by,
            ..draft.clone()
        }
        .into_reservation(id, created_at);
        Ok(())
    }

    async fn cancel(&self, id: ReservationId) -> Result<(), StoreError> {
        let mut guard = self.inner.write().await;
        let existing = guard.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        existing.status = ReservationStatus::Cancelled;
        Ok(())
    }

    async fn get(&self, id: ReservationId) -> Result<Option<Reservation>, StoreError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Reservation>, StoreError> {
        let guard = self.inner.read().await;
        let mut rows: Vec<Reservation> = guard.rows.values().cloned().collect();
        rows.sort_by_key(|r| Reverse((r.date, r.start_time.clone(), r.id)));
        Ok(rows)
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Reservation>, StoreError> {
        let guard = self.inner.read().await;
        let mut rows: Vec<Reservation> = guard
            .rows
            .values()
            .filter(|r| r.date == date)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (&a.start_time, a.id).cmp(&(&b.start_time, b.id)));
        Ok(rows)
    }

    async fn status_counts(&self, date: NaiveDate) -> Result<StatusCounts, StoreError> {
        let guard = self.inner.read().await;
        let mut counts = StatusCounts::default();
        for r in guard.rows.values().filter(|r| r.date == date) {
            counts.add(r.status, 1);
        }
        Ok(counts)
    }
}
