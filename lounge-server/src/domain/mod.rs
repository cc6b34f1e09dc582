//! Domain types for the station reservation server.
//!
//! This module contains the core domain model types. Types that parse user
//! or stored input enforce their invariants at construction time, so code
//! that receives them can trust their validity.

mod area;
mod error;
mod reservation;
mod station;
mod time;
mod window;

pub use area::{Area, AreaLayout, AreaLayoutBuilder, LayoutError, default_layout};
pub use error::{InvalidStatus, ValidationError};
pub use reservation::{
    ActiveReservation, MAX_PEOPLE, MIN_PEOPLE, Reservation, ReservationDraft, ReservationId,
    ReservationStatus,
};
pub use station::{
    InvalidStationCode, StationCode, format_station_list, normalize_selection, parse_station_list,
};
pub use time::{ClockTime, EndTime, TimeError, UNKNOWN_END};
pub use window::{TimeWindow, WindowError};
