//! Navigation state carried between pages.
//!
//! Every page is rendered from an explicit [`NavState`] built from the
//! request, so nothing about "where the user is" lives on the server.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ReservationId;

/// Top-level page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Dashboard,
    List,
    New,
    Edit,
}

/// Selected page, selected date, optional edit target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavState {
    #[serde(default)]
    pub page: Page,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<ReservationId>,
}

impl NavState {
    pub fn new(page: Page, date: NaiveDate) -> Self {
        Self {
            page,
            date,
            edit: None,
        }
    }

    pub fn editing(id: ReservationId, date: NaiveDate) -> Self {
        Self {
            page: Page::Edit,
            date,
            edit: Some(id),
        }
    }

    pub fn is_dashboard(&self) -> bool {
        self.page == Page::Dashboard
    }

    pub fn is_list(&self) -> bool {
        self.page == Page::List
    }

    pub fn is_form(&self) -> bool {
        matches!(self.page, Page::New | Page::Edit)
    }

    pub fn date_param(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn dashboard_href(&self) -> String {
        format!("/?date={}", self.date_param())
    }

    pub fn new_href(&self) -> String {
        format!("/reservations/new?date={}", self.date_param())
    }

    /// Dashboard link for the day before.
    pub fn prev_day_href(&self) -> String {
        self.shifted_href(self.date.pred_opt())
    }

    /// Dashboard link for the day after.
    pub fn next_day_href(&self) -> String {
        self.shifted_href(self.date.succ_opt())
    }

    fn shifted_href(&self, date: Option<NaiveDate>) -> String {
        match date {
            Some(d) => Self::new(Page::Dashboard, d).dashboard_href(),
            None => self.dashboard_href(),
        }
    }
}
