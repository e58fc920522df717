use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Form, Json,
};
use serde::Deserialize;

use crate::error::DashboardError;
use crate::gallery::{load_gallery, Gallery, GALLERY_COLUMNS};
use crate::listing::{self, resolve_listed};
use crate::menu::{self, FeedbackInput, FeedbackReceipt, MenuSelection, Panel};
use crate::notebook::RenderedNotebook;
use crate::page::render_page;
use crate::state::Dashboard;

// ============================================================
// Error Handling
// ============================================================

/// Map a dashboard error to a response.
///
/// Problems with a specific item are reported as-is; filesystem failures are
/// logged in full and the client only sees a generic message, so server
/// paths don't leak.
fn error_response(e: DashboardError) -> (StatusCode, String) {
    match e {
        DashboardError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
        DashboardError::UnknownPanel(_) => {
            tracing::warn!("Validation error: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        DashboardError::Parse { .. } | DashboardError::Render { .. } => {
            tracing::warn!("Content error: {}", e);
            (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
        DashboardError::Filesystem { .. } => {
            tracing::error!("Internal error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Dashboard pages
// ============================================================

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub choice: Option<String>,
    pub notebook: Option<String>,
}

pub async fn dashboard_page(
    State(dashboard): State<Dashboard>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, (StatusCode, String)> {
    let selection = match query.choice.as_deref() {
        Some(choice) if !choice.is_empty() => {
            choice.parse::<MenuSelection>().map_err(error_response)?
        }
        _ => MenuSelection::default(),
    };

    let panel = menu::dispatch(&dashboard, selection, query.notebook.as_deref());
    Ok(Html(render_page(&dashboard.config.title, &panel)))
}

pub async fn submit_feedback_form(
    State(dashboard): State<Dashboard>,
    Form(input): Form<FeedbackInput>,
) -> Html<String> {
    menu::submit_feedback(input);
    let panel = Panel::Feedback {
        acknowledgment: Some(menu::FEEDBACK_ACKNOWLEDGMENT),
    };
    Html(render_page(&dashboard.config.title, &panel))
}

pub async fn image_file(
    State(dashboard): State<Dashboard>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let dir = &dashboard.config.images_dir;
    let names = listing::list_images(dir).map_err(error_response)?;
    let path = resolve_listed(dir, &name, &names).map_err(error_response)?;

    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        error_response(DashboardError::render(&path, e))
    })?;

    Ok(([(header::CONTENT_TYPE, image_content_type(&name, &bytes))], bytes))
}

fn image_content_type(name: &str, bytes: &[u8]) -> &'static str {
    if let Ok(format) = image::guess_format(bytes) {
        return format.to_mime_type();
    }
    if name.ends_with(".png") {
        "image/png"
    } else {
        "image/jpeg"
    }
}

// ============================================================
// JSON API
// ============================================================

pub async fn list_notebooks(
    State(dashboard): State<Dashboard>,
) -> Result<Json<Vec<String>>, (StatusCode, String)> {
    listing::list_notebooks(&dashboard.config.notebooks_dir)
        .map(Json)
        .map_err(error_response)
}

pub async fn get_notebook(
    State(dashboard): State<Dashboard>,
    Path(name): Path<String>,
) -> Result<Json<RenderedNotebook>, (StatusCode, String)> {
    let dir = &dashboard.config.notebooks_dir;
    let names = listing::list_notebooks(dir).map_err(error_response)?;
    let path = resolve_listed(dir, &name, &names).map_err(error_response)?;

    dashboard
        .renderer
        .render(&path)
        .map(Json)
        .map_err(error_response)
}

pub async fn get_gallery(
    State(dashboard): State<Dashboard>,
) -> Result<Json<Gallery>, (StatusCode, String)> {
    load_gallery(&dashboard.config.images_dir, GALLERY_COLUMNS)
        .map(Json)
        .map_err(error_response)
}

pub async fn submit_feedback_json(Json(input): Json<FeedbackInput>) -> Json<FeedbackReceipt> {
    Json(menu::submit_feedback(input))
}
