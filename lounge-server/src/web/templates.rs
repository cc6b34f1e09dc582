//! Askama templates for the web frontend.

use askama::Template;

use crate::booking::DaySummary;
use crate::domain::{Reservation, ReservationId, ReservationStatus};
use crate::picker::Picker;

use super::dto::ReservationForm;
use super::nav::NavState;

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Daily overview.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub nav: NavState,
    pub confirmed: usize,
    pub pending: usize,
    pub cancelled: usize,
    pub total: usize,
    pub reservations: Vec<ReservationView>,
}

impl DashboardTemplate {
    pub fn new(nav: NavState, summary: &DaySummary) -> Self {
        Self {
            nav,
            confirmed: summary.counts.confirmed,
            pending: summary.counts.pending,
            cancelled: summary.counts.cancelled,
            total: summary.counts.total(),
            reservations: summary
                .reservations
                .iter()
                .map(ReservationView::from)
                .collect(),
        }
    }
}

/// Filterable list of every reservation.
#[derive(Template)]
#[template(path = "reservation_list.html")]
pub struct ReservationListTemplate {
    pub nav: NavState,
    pub q: String,
    pub statuses: Vec<StatusOption>,
    pub reservations: Vec<ReservationView>,
}

/// Create or edit form with the station picker.
#[derive(Template)]
#[template(path = "reservation_form.html")]
pub struct ReservationFormTemplate {
    pub nav: NavState,
    pub title: String,

    /// Where the form posts to
    pub action: String,

    /// Where "check availability" reloads the form
    pub refresh: String,

    pub form: ReservationForm,
    pub statuses: Vec<StatusOption>,
    pub picker: Picker,

    /// Set when the window does not resolve, so the picker is not meaningful
    pub window_error: Option<String>,

    /// Set when a submission was rejected
    pub error: Option<String>,

    /// The reservation being edited
    pub editing: Option<ReservationId>,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// Reservation row view model.
#[derive(Debug, Clone)]
pub struct ReservationView {
    pub id: i64,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub stations: String,
    pub customer_name: String,
    pub phone: String,
    pub people_count: u32,
    pub status: &'static str,
    pub status_label: &'static str,
    pub note: String,
    pub is_cancelled: bool,
}

impl ReservationView {
    pub fn edit_href(&self) -> String {
        format!("/reservations/{}/edit", self.id)
    }

    pub fn cancel_action(&self) -> String {
        format!("/reservations/{}/cancel", self.id)
    }

    /// Time range as shown in tables.
    pub fn times(&self) -> String {
        format!("{} - {}", self.start_time, self.end_time)
    }
}

impl From<&Reservation> for ReservationView {
    fn from(r: &Reservation) -> Self {
        Self {
            id: r.id.0,
            date: r.date.format("%Y-%m-%d").to_string(),
            start_time: r.start_time.clone(),
            end_time: r.end_time.clone(),
            stations: r.stations_display(),
            customer_name: r.customer_name.clone(),
            phone: r.phone.clone().unwrap_or_default(),
            people_count: r.people_count,
            status: r.status.as_str(),
            status_label: r.status.label(),
            note: r.note.clone().unwrap_or_default(),
            is_cancelled: !r.is_active(),
        }
    }
}

/// One status choice in a select or checkbox group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

impl StatusOption {
    /// Every status, marking those `is_selected` accepts.
    pub fn all(is_selected: impl Fn(ReservationStatus) -> bool) -> Vec<Self> {
        ReservationStatus::ALL
            .into_iter()
            .map(|status| Self {
                value: status.as_str(),
                label: status.label(),
                selected: is_selected(status),
            })
            .collect()
    }
}
