pub mod form;
pub mod health;
pub mod resume;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/generate-preview", post(resume::handle_generate_preview))
        .route("/download-pdf", post(resume::handle_download_pdf))
        .route("/download-docx", post(resume::handle_download_docx))
        .route("/uploads/:name", get(resume::handle_get_upload))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
