use axum::{
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, compression::CompressionLayer, trace::TraceLayer};

use crate::config::Config;
use crate::store::ContentStore;
use crate::upstream::{PortraitSource, TextGenerator};

/// Shared handler state. Every client is built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ContentStore>,
    pub text_generator: Arc<dyn TextGenerator>,
    pub portraits: Arc<dyn PortraitSource>,
    pub admin_origin: HeaderValue,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn ContentStore>,
        text_generator: Arc<dyn TextGenerator>,
        portraits: Arc<dyn PortraitSource>,
    ) -> Result<Self, crate::ServerError> {
        let admin_origin = HeaderValue::from_str(config.cors.admin_origin.trim_end_matches('/'))
            .map_err(|e| {
                crate::ServerError::Server(format!(
                    "Invalid admin origin {}: {}",
                    config.cors.admin_origin, e
                ))
            })?;

        Ok(Self {
            config: Arc::new(config),
            store,
            text_generator,
            portraits,
            admin_origin,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let catalog_routes = Router::new()
        .route("/api/movies", get(crate::api::catalog::list_movies))
        .route("/api/movies/:slug", get(crate::api::catalog::get_movie))
        .route("/api/year/:year", get(crate::api::catalog::movies_by_year))
        .route("/api/genres/:slug", get(crate::api::catalog::get_genre))
        .route("/api/directors", get(crate::api::catalog::list_directors))
        .route("/api/directors/:slug", get(crate::api::catalog::get_director))
        .route("/api/actors", get(crate::api::catalog::list_actors))
        .route("/api/actors/:slug", get(crate::api::catalog::get_actor))
        .route("/api/search", get(crate::api::catalog::search));

    let admin_routes = Router::new()
        .route(
            "/api/generate-details",
            post(crate::api::generate_person_details),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::require_admin_origin,
        ))
        .layer(crate::middleware::admin_cors(state.admin_origin.clone()));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/vote", post(crate::api::submit_vote))
        .merge(catalog_routes)
        .merge(admin_routes)
        .fallback(fallback_handler)
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(CatchPanicLayer::custom(crate::middleware::panic_response))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn fallback_handler() -> impl IntoResponse {
    StatusCode::NOT_FOUND
}
