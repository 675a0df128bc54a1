mod config;
mod db;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use services::dropbox::{CloudStorage, DropboxClient};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env().expect("invalid configuration");
    let port = config.port;

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");

    // Dropbox is optional: storage and export-to-Dropbox routes answer 503 without it.
    let storage: Option<Arc<dyn CloudStorage>> = match config.dropbox {
        Some(dropbox) => match DropboxClient::new(dropbox) {
            Ok(client) => {
                tracing::info!("dropbox client initialized");
                Some(Arc::new(client))
            }
            Err(e) => {
                tracing::warn!(error = %e, "dropbox client init failed; storage disabled");
                None
            }
        },
        None => {
            tracing::warn!("DROPBOX_ACCESS_TOKEN not set; storage disabled");
            None
        }
    };

    let state = state::AppState::new(pool, storage, config.export_dir, config.cookie_secure);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "clustica listening");
    axum::serve(listener, app).await.expect("server failed");
}
