//! Web layer for the lounge reservation server.
//!
//! Serves the booking pages and a small JSON API for occupancy lookups.

mod dto;
mod nav;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use nav::{NavState, Page};
pub use routes::{AppError, create_router};
pub use state::AppState;
