use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use lounge_server::config::{ServerConfig, StoreBackend};
use lounge_server::domain::default_layout;
use lounge_server::store::{MemoryStore, ReservationStore, SqliteStore};
use lounge_server::web::{AppState, create_router};

const DEFAULT_LOG_FILTER: &str = "lounge_server=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::from_env()?;

    let store: Arc<dyn ReservationStore> = match &config.backend {
        StoreBackend::Memory => {
            info!("using in-memory reservation store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Sqlite(url) => {
            info!(%url, "using SQLite reservation store");
            Arc::new(SqliteStore::connect(url).await?)
        }
    };

    let layout = default_layout();
    info!(
        areas = layout.areas().len(),
        stations = layout.len(),
        "loaded floor layout"
    );

    let state = AppState::new(store, layout);
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("Lounge reservations listening on http://{}", config.bind);
    info!("  GET  /                  - Dashboard");
    info!("  GET  /reservations      - Reservation list");
    info!("  GET  /reservations/new  - New reservation");
    info!("  GET  /api/occupancy     - Occupied stations for a window");

    axum::serve(listener, app).await?;
    Ok(())
}
