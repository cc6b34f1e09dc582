//! HTTP route handlers.

use std::collections::BTreeSet;
use std::path::Path as FsPath;

use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::booking::{BookingError, ReservationFilter};
use crate::domain::{Reservation, ReservationId, TimeWindow};
use crate::picker::Picker;

use super::dto::*;
use super::nav::{NavState, Page};
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: impl AsRef<FsPath>) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/health", get(health))
        .route("/reservations", get(list_page).post(create_reservation))
        .route("/reservations/new", get(new_form))
        .route("/reservations/:id", post(update_reservation))
        .route("/reservations/:id/edit", get(edit_form))
        .route("/reservations/:id/cancel", post(cancel_reservation))
        .route("/api/occupancy", get(api_occupancy))
        .route("/api/reservations", get(api_reservations))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn render(template: impl Template) -> Result<Html<String>, AppError> {
    template.render().map(Html).map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })
}

/// 303 See Other back to the dashboard for `date`.
fn day_redirect(date: NaiveDate) -> Response {
    let href = NavState::new(Page::Dashboard, date).dashboard_href();
    Redirect::to(&href).into_response()
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Day summary for `?date=`, default today.
async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Html<String>, AppError> {
    let date = query.date.unwrap_or_else(today);
    let summary = state.bookings.day_summary(date).await?;
    render(DashboardTemplate::new(
        NavState::new(Page::Dashboard, date),
        &summary,
    ))
}

/// Every reservation, filtered by `?q=` and repeated `?status=`.
async fn list_page(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Html<String>, AppError> {
    let query = ListQuery::from_pairs(&pairs);
    let filter = ReservationFilter::new(Some(query.q.clone()), query.statuses.clone());
    let rows = state.bookings.list(&filter).await?;

    render(ReservationListTemplate {
        nav: NavState::new(Page::List, today()),
        statuses: StatusOption::all(|s| query.statuses.contains(&s)),
        q: query.q,
        reservations: rows.iter().map(ReservationView::from).collect(),
    })
}

/// Static parts of a create or edit form page.
struct FormPage {
    nav: NavState,
    title: String,
    action: String,
    refresh: String,

    /// Stations the edited reservation holds in the store
    held: Vec<String>,
}

impl FormPage {
    fn create(date: NaiveDate) -> Self {
        Self {
            nav: NavState::new(Page::New, date),
            title: "New reservation".into(),
            action: "/reservations".into(),
            refresh: "/reservations/new".into(),
            held: Vec::new(),
        }
    }

    fn edit(existing: &Reservation, date: NaiveDate) -> Self {
        let id = existing.id;
        Self {
            nav: NavState::editing(id, date),
            title: format!("Reservation #{id}"),
            action: format!("/reservations/{id}"),
            refresh: format!("/reservations/{id}/edit"),
            held: existing.stations.clone(),
        }
    }
}

/// Render a form with its picker for the form's own window.
///
/// The edited reservation is excluded from occupancy, and only the stations
/// it already holds are exempt from locking.
async fn render_form(
    state: &AppState,
    page: FormPage,
    form: ReservationForm,
    error: Option<String>,
) -> Result<Html<String>, AppError> {
    let editing = page.nav.edit;
    let start = form.start_time.trim();
    let end = form.end_time.trim();

    let (occupied, window_error) = match form.parsed_date() {
        None => (BTreeSet::new(), Some(format!("Invalid date {:?}", form.date))),
        Some(_) if start.is_empty() || end.is_empty() => {
            let hint = "Enter start and end times to see availability.";
            (BTreeSet::new(), Some(hint.to_string()))
        }
        Some(date) => match TimeWindow::resolve(date, start, end) {
            Ok(_) => {
                let occupied = state.bookings.occupied(date, start, end, editing).await?;
                (occupied, None)
            }
            Err(e) => (BTreeSet::new(), Some(e.to_string())),
        },
    };

    let picker = Picker::build(&state.layout, &occupied, &page.held, &form.stations);
    let statuses = StatusOption::all(|s| s.as_str() == form.status);

    render(ReservationFormTemplate {
        nav: page.nav,
        title: page.title,
        action: page.action,
        refresh: page.refresh,
        form,
        statuses,
        picker,
        window_error,
        error,
        editing,
    })
}

/// Show a rejected submission again with its error.
async fn rejected(
    state: &AppState,
    page: FormPage,
    form: ReservationForm,
    status: StatusCode,
    message: String,
) -> Result<Response, AppError> {
    warn!(%status, %message, "reservation form rejected");
    let html = render_form(state, page, form, Some(message)).await?;
    Ok((status, html).into_response())
}

fn rejection_status(e: &BookingError) -> Option<StatusCode> {
    match e {
        BookingError::Invalid(_) => Some(StatusCode::UNPROCESSABLE_ENTITY),
        BookingError::StationsUnavailable(_) => Some(StatusCode::CONFLICT),
        _ => None,
    }
}

/// Create form, prefilled from the query (`date`, `start`, `end`, ...).
async fn new_form(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Html<String>, AppError> {
    let form = ReservationForm::blank(today()).with_pairs(&pairs);
    let date = form.parsed_date().unwrap_or_else(today);
    render_form(&state, FormPage::create(date), form, None).await
}

/// Create a reservation from the submitted form.
async fn create_reservation(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let form = ReservationForm::blank(today()).with_pairs(&pairs);
    let page = FormPage::create(form.parsed_date().unwrap_or_else(today));

    let draft = match form.to_draft() {
        Ok(draft) => draft,
        Err(e) => {
            let status = StatusCode::UNPROCESSABLE_ENTITY;
            return rejected(&state, page, form, status, e.to_string()).await;
        }
    };

    let date = draft.date;
    match state.bookings.create(draft).await {
        Ok(_) => Ok(day_redirect(date)),
        Err(e) => match rejection_status(&e) {
            Some(status) => rejected(&state, page, form, status, e.to_string()).await,
            None => Err(e.into()),
        },
    }
}

/// Edit form for an existing reservation.
///
/// Without query parameters the form shows the stored reservation; with
/// them (from "check availability") it shows the submitted values.
async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<ReservationId>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Html<String>, AppError> {
    let reservation = state.bookings.get(id).await?;
    let form = if pairs.is_empty() {
        ReservationForm::from_reservation(&reservation)
    } else {
        ReservationForm::blank(reservation.date).with_pairs(&pairs)
    };
    let date = form.parsed_date().unwrap_or(reservation.date);
    render_form(&state, FormPage::edit(&reservation, date), form, None).await
}

/// Replace a reservation from the submitted form.
async fn update_reservation(
    State(state): State<AppState>,
    Path(id): Path<ReservationId>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let existing = state.bookings.get(id).await?;
    let form = ReservationForm::blank(existing.date).with_pairs(&pairs);
    let page = FormPage::edit(&existing, form.parsed_date().unwrap_or(existing.date));

    let draft = match form.to_draft() {
        Ok(draft) => draft,
        Err(e) => {
            let status = StatusCode::UNPROCESSABLE_ENTITY;
            return rejected(&state, page, form, status, e.to_string()).await;
        }
    };

    let date = draft.date;
    match state.bookings.update(id, draft).await {
        Ok(()) => Ok(day_redirect(date)),
        Err(e) => match rejection_status(&e) {
            Some(status) => rejected(&state, page, form, status, e.to_string()).await,
            None => Err(e.into()),
        },
    }
}

/// Mark a reservation cancelled and return to its day.
async fn cancel_reservation(
    State(state): State<AppState>,
    Path(id): Path<ReservationId>,
) -> Result<Response, AppError> {
    let reservation = state.bookings.get(id).await?;
    state.bookings.cancel(id).await?;
    Ok(day_redirect(reservation.date))
}

/// Occupied stations for `?date&start&end&exclude`.
async fn api_occupancy(
    State(state): State<AppState>,
    Query(query): Query<OccupancyQuery>,
) -> Result<Json<OccupancyResponse>, AppError> {
    let occupied = state
        .bookings
        .occupied(query.date, &query.start, &query.end, query.exclude)
        .await?;
    let occupied = occupied.into_iter().collect();
    Ok(Json(OccupancyResponse::new(query, occupied)))
}

/// Reservations and counts for `?date=`, default today.
async fn api_reservations(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<DayReservationsResponse>, AppError> {
    let summary = state
        .bookings
        .day_summary(query.date.unwrap_or_else(today))
        .await?;
    Ok(Json(DayReservationsResponse {
        date: summary.date,
        counts: summary.counts.into(),
        reservations: summary.reservations,
    }))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Internal { message: String },
}

impl From<BookingError> for AppError {
    fn from(e: BookingError) -> Self {
        let message = e.to_string();
        match e {
            BookingError::Invalid(_) => AppError::BadRequest { message },
            BookingError::NotFound(_) => AppError::NotFound { message },
            BookingError::StationsUnavailable(_) => AppError::Conflict { message },
            BookingError::Store(_) => AppError::Internal { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
