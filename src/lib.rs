pub mod api;
pub mod config;
pub mod middleware;
pub mod server;
pub mod services;
pub mod store;
pub mod upstream;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),
    #[error("Upstream client error: {0}")]
    Upstream(#[from] upstream::UpstreamError),
    #[error("Server error: {0}")]
    Server(String),
}

pub async fn run(config_path: &str, debug_logs: bool) -> Result<(), ServerError> {
    let mut config = config::Config::load(config_path)?;
    config.debug_logs = debug_logs;

    info!("Using config file: {}", config_path);
    if debug_logs {
        info!("Debug logging enabled");
    }
    match config.store.project_id {
        Some(ref project) => info!("Content store: {} / {}", project, config.store.dataset),
        None => info!("Content store project not configured, store calls will fail"),
    }
    info!("Admin origin: {}", config.cors.admin_origin);
    if config.rating.guard_revision {
        info!("Rating writes are guarded by document revision");
    }

    let timeout = config.http.timeout();
    let store = Arc::new(store::SanityClient::new(config.store.clone(), timeout)?);
    let text_generator = Arc::new(upstream::GeminiClient::new(config.generation.clone(), timeout)?);
    let portraits = Arc::new(upstream::TmdbClient::new(config.tmdb.clone(), timeout)?);

    let address = config.listen.address.as_deref().unwrap_or("[::]");
    let port = &config.listen.port;
    let addr: SocketAddr = format!("{}:{}", address, port)
        .parse()
        .map_err(|e| ServerError::Server(format!("Invalid address: {}", e)))?;

    let tls = match (&config.listen.tlscert, &config.listen.tlskey) {
        (Some(cert), Some(key)) => Some((cert.clone(), key.clone())),
        _ => None,
    };

    let state = server::AppState::new(config, store, text_generator, portraits)?;
    let app = server::build_router(state);

    if let Some((cert_path, key_path)) = tls {
        info!("Loading TLS certificate from {}", cert_path);
        info!("Loading TLS key from {}", key_path);

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&cert_path, &key_path)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to load TLS config: {}", e)))?;

        info!("Serving HTTPS on {}", addr);

        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    } else {
        info!("Serving HTTP on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    }

    Ok(())
}
