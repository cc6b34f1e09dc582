//! Application state for the web layer.

use std::sync::Arc;

use crate::booking::BookingService;
use crate::domain::AreaLayout;
use crate::store::ReservationStore;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Reservation use cases
    pub bookings: Arc<BookingService>,

    /// Floor layout shown by the station picker
    pub layout: Arc<AreaLayout>,
}

impl AppState {
    /// Create a new app state over `store`.
    pub fn new(store: Arc<dyn ReservationStore>, layout: AreaLayout) -> Self {
        Self {
            bookings: Arc::new(BookingService::new(store)),
            layout: Arc::new(layout),
        }
    }
}
