//! SQLite-backed reservation store.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, warn};

use crate::domain::{
    ActiveReservation, Reservation, ReservationDraft, ReservationId, ReservationStatus,
    parse_station_list,
};

use super::{ReservationStore, StatusCounts, StoreError};

const DATE_FORMAT: &str = "%Y-%m-%d";
const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS reservation (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        d TEXT NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL,
        customer_name TEXT NOT NULL,
        phone TEXT,
        people_count INTEGER NOT NULL,
        stations TEXT NOT NULL,
        status TEXT NOT NULL,
        note TEXT,
        created_by TEXT,
        created_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_reservation_d ON reservation (d)",
];

const SELECT_COLUMNS: &str = "SELECT id, d, start_time, end_time, customer_name, phone, \
     people_count, stations, status, note, created_by, created_at FROM reservation";

/// One `reservation` row as stored.
#[derive(Debug, sqlx::FromRow)]
struct ReservationRow {
    id: i64,
    d: String,
    start_time: String,
    end_time: String,
    customer_name: String,
    phone: Option<String>,
    people_count: i64,
    stations: String,
    status: String,
    note: Option<String>,
    created_by: Option<String>,
    created_at: String,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = StoreError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        let id = ReservationId(row.id);
        let corrupt = |reason: String| StoreError::Corrupt { id, reason };

        let date = parse_date(&row.d).ok_or_else(|| corrupt(format!("bad date {:?}", row.d)))?;
        let status: ReservationStatus = row.status.parse().map_err(|e| corrupt(format!("{e}")))?;
        let people_count = u32::try_from(row.people_count)
            .map_err(|e| corrupt(format!("bad people count: {e}")))?;
        let created_at = NaiveDateTime::parse_from_str(&row.created_at, CREATED_AT_FORMAT)
            .map_err(|_| corrupt(format!("bad created_at {:?}", row.created_at)))?;

        Ok(Reservation {
            id,
            date,
            start_time: row.start_time,
            end_time: row.end_time,
            stations: parse_station_list(&row.stations),
            status,
            customer_name: row.customer_name,
            phone: row.phone,
            people_count,
            note: row.note,
            created_by: row.created_by,
            created_at,
        })
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Map rows, dropping the ones that cannot be read.
fn collect_rows(rows: Vec<ReservationRow>) -> Vec<Reservation> {
    rows.into_iter()
        .filter_map(|row| match Reservation::try_from(row) {
            Ok(r) => Some(r),
            Err(e) => {
                warn!(error = %e, "skipping unreadable reservation row");
                None
            }
        })
        .collect()
}

/// Reservations persisted in a SQLite database.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `url` and ensure the schema.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        debug!("reservation schema ready");
        Ok(())
    }
}

#[async_trait]
impl ReservationStore for SqliteStore {
    async fn query_active_reservations(
        &self,
        dates: &[NaiveDate],
        exclude: Option<ReservationId>,
    ) -> Result<Vec<ActiveReservation>, StoreError> {
        if dates.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; dates.len()].join(", ");
        let sql = format!(
            "SELECT id, d, start_time, end_time, stations FROM reservation \
             WHERE status != 'cancelled' AND d IN ({placeholders}) AND (? IS NULL OR id != ?)"
        );

        let mut query = sqlx::query_as::<_, (i64, String, String, String, String)>(&sql);
        for date in dates {
            query = query.bind(format_date(*date));
        }
        let exclude = exclude.map(|id| id.0);
        let rows = query
            .bind(exclude)
            .bind(exclude)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(id, d, start_time, end_time, stations_raw)| {
                let Some(date) = parse_date(&d) else {
                    warn!(id, date = %d, "skipping reservation with unreadable date");
                    return None;
                };
                Some(ActiveReservation {
                    id: ReservationId(id),
                    date,
                    start_time,
                    end_time,
                    stations_raw,
                })
            })
            .collect())
    }

    async fn insert(
        &self,
        draft: &ReservationDraft,
        created_at: NaiveDateTime,
    ) -> Result<ReservationId, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "INSERT INTO reservation (d, start_time, end_time, customer_name, phone, \
             people_count, stations, status, note, created_by, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(format_date(draft.date))
        .bind(&draft.start_time)
        .bind(&draft.end_time)
        .bind(&draft.customer_name)
        .bind(&draft.phone)
        .bind(i64::from(draft.people_count))
        .bind(draft.stations_raw())
        .bind(draft.status.as_str())
        .bind(&draft.note)
        .bind(&draft.created_by)
        .bind(created_at.format(CREATED_AT_FORMAT).to_string())
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(ReservationId(result.last_insert_rowid()))
    }

    async fn update(&self, id: ReservationId, draft: &ReservationDraft) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "UPDATE reservation SET d = ?, start_time = ?, end_time = ?, customer_name = ?, \
             phone = ?, people_count = ?, stations = ?, status = ?, note = ? WHERE id = ?",
        )
        .bind(format_date(draft.date))
        .bind(&draft.start_time)
        .bind(&draft.end_time)
        .bind(&draft.customer_name)
        .bind(&draft.phone)
        .bind(i64::from(draft.people_count))
        .bind(draft.stations_raw())
        .bind(draft.status.as_str())
        .bind(&draft.note)
        .bind(id.0)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        tx.commit().await?;
        Ok(())
    }

    async fn cancel(&self, id: ReservationId) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("UPDATE reservation SET status = ? WHERE id = ?")
            .bind(ReservationStatus::Cancelled.as_str())
            .bind(id.0)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        tx.commit().await?;
        Ok(())
    }

    async fn get(&self, id: ReservationId) -> Result<Option<Reservation>, StoreError> {
        let row = sqlx::query_as::<_, ReservationRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Reservation::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Reservation>, StoreError> {
        let rows = sqlx::query_as::<_, ReservationRow>(&format!(
            "{SELECT_COLUMNS} ORDER BY d DESC, start_time DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(collect_rows(rows))
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Reservation>, StoreError> {
        let rows = sqlx::query_as::<_, ReservationRow>(&format!(
            "{SELECT_COLUMNS} WHERE d = ? ORDER BY start_time ASC, id ASC"
        ))
        .bind(format_date(date))
        .fetch_all(&self.pool)
        .await?;

        Ok(collect_rows(rows))
    }

    async fn status_counts(&self, date: NaiveDate) -> Result<StatusCounts, StoreError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM reservation WHERE d = ? GROUP BY status",
        )
        .bind(format_date(date))
        .fetch_all(&self.pool)
        .await?;

        let mut counts = StatusCounts::default();
        for (status, n) in rows {
            match ReservationStatus::from_str(&status) {
                Ok(status) => counts.add(status, usize::try_from(n).unwrap_or(0)),
                Err(e) => warn!(error = %e, "ignoring unknown status in counts"),
            }
        }
        Ok(counts)
    }
}
