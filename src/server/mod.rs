pub mod groq;
pub mod handlers;

pub use groq::GroqClient;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

/// Shared state for the collaborator endpoints.
#[derive(Clone)]
pub struct AppState {
    pub groq: GroqClient,
}

/// Builds the collaborator router: three JSON operations plus a health
/// probe. No authentication, no pagination; thin glue in front of the
/// model upstream.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/generate-questions", post(handlers::generate_questions))
        .route("/api/score-answer", post(handlers::score_answer))
        .route("/api/generate-summary", post(handlers::generate_summary))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
