//! Domain error types.
//!
//! These errors represent validation failures on reservation drafts. They
//! are distinct from storage errors.

use super::TimeError;

/// Reasons a reservation draft cannot be written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A start or end string failed the HH:MM grammar or range check
    #[error("malformed {field} time {value:?}: {source}")]
    MalformedTime {
        field: &'static str,
        value: String,
        #[source]
        source: TimeError,
    },

    /// The resolved window does not have positive duration
    #[error("reservation window must end after it starts")]
    ZeroDurationWindow,

    /// The window runs past the last representable date
    #[error("reservation date is outside the supported calendar range")]
    DateOutOfRange,

    /// A non-cancelled reservation needs at least one station
    #[error("at least one station must be selected")]
    NoStationsSelected,

    /// Customer name is blank
    #[error("customer name is required")]
    MissingCustomerName,

    /// Party size outside the accepted range
    #[error("people count must be between {min} and {max}, got {got}")]
    PeopleCountOutOfRange { min: u32, max: u32, got: u32 },
}

/// Error returned when parsing an unknown reservation status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reservation status {0:?}")]
pub struct InvalidStatus(pub String);
