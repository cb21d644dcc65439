use std::{env, net::SocketAddr, path::Path};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use store::file::document_db::DocumentDb;

use crate::routes::{self, documents};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load the backing file path from the validated config or env, with a
/// sensible fallback
fn load_data_file() -> String {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg.storage.data_file,
        Err(_) => env::var("DATA_FILE").unwrap_or_else(|_| "data/db.json".to_string()),
    }
}

/// Load host/port from the validated config or env vars, with sensible
/// fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    // Document storage: one JSON file holding both collections
    let data_file = load_data_file();
    if let Some(parent) = Path::new(&data_file).parent() {
        if !parent.as_os_str().is_empty() {
            common::env::ensure_env(&parent.to_string_lossy()).await?;
        }
    }
    let store = DocumentDb::open(&data_file).await;
    info!(path = %store.path().display(), "document store opened");

    let state = documents::ServerState { store };

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(cors, state);

    // Bind and serve
    let addr = load_bind_addr()?;
    info!(%addr, "starting server crate");
    println!("starting server crate at {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // CONFIG_PATH is process-global state, so both cases live in one test
    #[test]
    fn load_data_file_goes_through_validation() {
        let dir = std::env::temp_dir().join(format!("startup_cfg_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create dir");
        env::remove_var("DATA_FILE");

        // a valid config wins over the fallback
        let good = dir.join("good.toml");
        std::fs::write(&good, "[storage]\ndata_file = \"state/db.json\"\n").expect("write");
        env::set_var("CONFIG_PATH", &good);
        assert_eq!(load_data_file(), "state/db.json");

        // a config that fails validation falls back to the default
        let bad = dir.join("bad.toml");
        std::fs::write(&bad, "[storage]\ndata_file = \"state/db.sqlite\"\n").expect("write");
        env::set_var("CONFIG_PATH", &bad);
        assert_eq!(load_data_file(), "data/db.json");

        env::remove_var("CONFIG_PATH");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
