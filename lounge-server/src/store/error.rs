//! Reservation store error types.

use crate::domain::ReservationId;

/// Errors that can occur when reading or writing reservations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database driver or connection failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No reservation with this id
    #[error("reservation {0} not found")]
    NotFound(ReservationId),

    /// A stored row could not be mapped to a reservation
    #[error("reservation {id} is corrupt: {reason}")]
    Corrupt { id: ReservationId, reason: String },
}
