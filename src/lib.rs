pub mod api;
pub mod catalog;
pub mod config;
pub mod db;
pub mod middleware;
pub mod recommend;
pub mod server;
pub mod util;

use std::net::SocketAddr;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::db::Repository;
use crate::recommend::{build_matrix, Recommender};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database error: {0}")]
    Database(#[from] db::DbError),
    #[error("Server error: {0}")]
    Server(String),
}

/// Pick the data source: a SQLite database if configured, else a seed
/// file, else the built-in demo data.
pub async fn open_repository(config: &Config) -> Result<Box<dyn Repository>, ServerError> {
    if let Some(db_path) = config.get_database_path() {
        info!("Opening database at {}", db_path);
        return Ok(Box::new(db::SqliteRepository::new(&db_path).await?));
    }

    if let Some(ref seedfile) = config.seedfile {
        info!("Using seed file {}", seedfile);
        return Ok(Box::new(db::MemoryRepository::from_file(seedfile)?));
    }

    info!("No data source configured, using built-in demo data");
    Ok(Box::new(db::MemoryRepository::builtin()))
}

/// Load roster and catalog once and build the immutable application state.
pub async fn load_state(config: Config, repo: &dyn Repository) -> Result<server::AppState, ServerError> {
    let roster = repo.fetch_roster().await?;
    let tracks = repo.fetch_catalog().await?;

    let matrix = build_matrix(&roster);
    info!(
        source = repo.kind(),
        users = matrix.len(),
        tracks = tracks.len(),
        played_tracks = matrix.item_count(),
        "Interaction matrix built"
    );

    let options = config.recommendations.options();
    info!(
        similarity = options.metric.as_str(),
        unknown_user = ?options.unknown_user,
        "Recommender ready"
    );

    let recommender = Recommender::new(matrix, options);
    let catalog = Catalog::new(tracks, roster);

    Ok(server::AppState::new(config, recommender, catalog))
}

/// Open the configured data source, load a snapshot, and close the source.
pub async fn build_state(config: Config) -> Result<server::AppState, ServerError> {
    let repo = open_repository(&config).await?;
    let state = load_state(config, repo.as_ref()).await?;
    let source = repo.kind();
    drop(repo);
    debug!(source, "Data source closed");
    Ok(state)
}

pub async fn run(config: Config) -> Result<(), ServerError> {
    if config.debug_logs {
        info!("Debug logging enabled");
    }

    let state = build_state(config.clone()).await?;

    let address = config.listen.address.as_deref().unwrap_or("[::]");
    let port = &config.listen.port;
    let addr: SocketAddr = format!("{}:{}", address, port)
        .parse()
        .map_err(|e| ServerError::Server(format!("Invalid address: {}", e)))?;

    let app = server::build_router(state);

    match (&config.listen.tlscert, &config.listen.tlskey) {
        (Some(cert_path), Some(key_path)) => {
            info!("Loading TLS certificate from {}", cert_path);
            info!("Loading TLS key from {}", key_path);

            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(cert_path, key_path)
                .await
                .map_err(|e| ServerError::Server(format!("Failed to load TLS config: {}", e)))?;

            info!("Serving HTTPS on {}", addr);

            axum_server::bind_rustls(addr, tls_config)
                .serve(app.into_make_service())
                .await
                .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
        }
        _ => {
            info!("Serving HTTP on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .map_err(|e| ServerError::Server(format!("Failed to bind: {}", e)))?;

            axum::serve(listener, app)
                .await
                .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_state_from_builtin() {
        let config = Config::default();
        let repo = open_repository(&config).await.unwrap();
        assert_eq!(repo.kind(), "memory");

        let state = load_state(config, repo.as_ref()).await.unwrap();
        assert_eq!(state.recommender.matrix().len(), 7);
        assert_eq!(state.catalog.tracks().len(), 8);
        assert_eq!(state.recommender.recommend("user1", 5).unwrap(), vec!["2", "4"]);
    }

    #[tokio::test]
    async fn test_load_state_from_sqlite() {
        let mut config = Config::default();
        config.database.sqlite = Some(config::SqliteConfig {
            filename: "sqlite::memory:".to_string(),
        });
        let repo = open_repository(&config).await.unwrap();
        assert_eq!(repo.kind(), "sqlite");

        let state = load_state(config, repo.as_ref()).await.unwrap();
        assert!(state.recommender.matrix().is_empty());
    }

    #[tokio::test]
    async fn test_build_state_from_sqlite() {
        let mut config = Config::default();
        config.database.sqlite = Some(config::SqliteConfig {
            filename: "sqlite::memory:".to_string(),
        });

        let state = build_state(config).await.unwrap();
        assert!(state.recommender.matrix().is_empty());
        assert!(state.catalog.tracks().is_empty());
    }

    #[tokio::test]
    async fn test_build_state_from_builtin() {
        let state = build_state(Config::default()).await.unwrap();
        assert_eq!(state.recommender.recommend("user1", 5).unwrap(), vec!["2", "4"]);
    }

    #[tokio::test]
    async fn test_missing_seed_file_is_an_error() {
        let config = Config {
            seedfile: Some("/nonexistent/seed.yaml".to_string()),
            ..Default::default()
        };
        let result = open_repository(&config).await;
        assert!(matches!(result, Err(ServerError::Database(_))));
    }
}
