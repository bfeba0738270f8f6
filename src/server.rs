use axum::{extract::Request, http::StatusCode, response::IntoResponse, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::recommend::Recommender;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub recommender: Arc<Recommender>,
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(config: Config, recommender: Recommender, catalog: Catalog) -> Self {
        Self {
            config: Arc::new(config),
            recommender: Arc::new(recommender),
            catalog: Arc::new(catalog),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/tracks", get(crate::api::list_tracks))
        .route("/api/tracks/:id", get(crate::api::get_track))
        .route("/api/users", get(crate::api::list_users))
        .route(
            "/api/users/:id/recommendations",
            get(crate::api::get_user_recommendations),
        )
        .route("/api/users/:id/similar", get(crate::api::get_similar_users));

    Router::new()
        .route("/recommendations", get(crate::api::get_recommendations))
        .route("/health", get(crate::api::health))
        .merge(api_routes)
        .fallback(fallback_handler)
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn fallback_handler(req: Request<axum::body::Body>) -> impl IntoResponse {
    if req.method() == axum::http::Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
