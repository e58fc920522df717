mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::Dashboard;

pub fn create_router(dashboard: Dashboard) -> Router {
    let api = Router::new()
        // Notebooks
        .route("/notebooks", get(handlers::list_notebooks))
        .route("/notebooks/{name}", get(handlers::get_notebook))
        // Images
        .route("/images", get(handlers::get_gallery))
        // Feedback
        .route("/feedback", post(handlers::submit_feedback_json))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        // Dashboard pages
        .route("/", get(handlers::dashboard_page))
        .route("/feedback", post(handlers::submit_feedback_form))
        .route("/images/{name}", get(handlers::image_file))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(dashboard)
}
