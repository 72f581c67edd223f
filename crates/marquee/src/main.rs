//! Marquee service entry point.

use marquee::{build_app, AppState};
use marquee_config::AppConfig;
use marquee_metadata::{MovieProvider, TmdbClient};
use marquee_server::Server;
use marquee_store::{SharedStore, SqliteStore};
use marquee_telemetry::{init_logging, LogConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    init_logging(&LogConfig {
        filter: config.log_filter.clone(),
        json_format: config.log_json,
        include_target: true,
    })?;

    let db_path = config.db_path.clone();
    let store = SharedStore::new(move || SqliteStore::open(db_path.clone()));

    let movies: Arc<dyn MovieProvider> = Arc::new(TmdbClient::new(
        config.tmdb_base_url.clone(),
        config.tmdb_api_key.clone(),
    ));

    let state = Arc::new(AppState::new(store, movies));
    let app = build_app(state);

    tracing::info!(addr = %config.http_addr, db = %config.db_path, "starting marquee");
    Server::new(config.http_addr, app).run().await?;

    Ok(())
}
