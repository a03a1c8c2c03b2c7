//! Axum route handlers for preview, PDF/DOCX download, and persisted uploads.

use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assets::PhotoInput;
use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::routes::form::{read_form, ResumeForm};
use crate::state::AppState;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const PDF_FILE_NAME: &str = "resume.pdf";
const DOCX_FILE_NAME: &str = "resume.docx";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub html: String,
    pub summary: String,
    pub photo_url: String,
}

#[derive(Debug, Deserialize)]
pub struct HtmlForm {
    #[serde(default)]
    pub html: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /generate-preview
///
/// Resolves the photo and generates the narrative concurrently, then renders
/// the HTML preview. A failure in either step fails the request.
pub async fn handle_generate_preview(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<PreviewResponse>, AppError> {
    let ResumeForm {
        fields,
        photo_url,
        photo,
        ..
    } = read_form(multipart).await?;

    let (photo, narrative) = tokio::try_join!(
        state.assets.resolve(PhotoInput {
            photo_url,
            upload: photo,
        }),
        state.narrator.generate(&fields),
    )?;

    let record = ResumeRecord::assemble(fields, photo, narrative);
    let html = state.html.render(&record)?;
    info!("Rendered preview for '{}'", record.name);

    Ok(Json(PreviewResponse {
        html,
        photo_url: record.photo.html_src(),
        summary: record.narrative,
    }))
}

/// POST /download-pdf
///
/// Converts client-supplied HTML (multipart or urlencoded field `html`) to PDF.
pub async fn handle_download_pdf(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, AppError> {
    let html = if is_multipart(request.headers()) {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        read_form(multipart).await?.html.unwrap_or_default()
    } else {
        let Form(form) = Form::<HtmlForm>::from_request(request, &state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        form.html
    };

    let pdf = state.pdf.render(&html).await?;
    Ok(attachment(pdf, PDF_MIME, PDF_FILE_NAME))
}

/// POST /download-docx
///
/// Uses a previewed `SUMMARY` when the client sends one, otherwise generates it.
pub async fn handle_download_docx(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let ResumeForm {
        fields,
        photo_url,
        photo,
        summary,
        ..
    } = read_form(multipart).await?;

    let narrative = async {
        match summary {
            Some(summary) => Ok(summary.trim().to_string()),
            None => state.narrator.generate(&fields).await,
        }
    };
    let (photo, narrative) = tokio::try_join!(
        state.assets.resolve(PhotoInput {
            photo_url,
            upload: photo,
        }),
        narrative,
    )?;

    let record = ResumeRecord::assemble(fields, photo, narrative);
    let renderer = state.docx;
    let name = record.name.clone();
    let docx = tokio::task::spawn_blocking(move || renderer.render(&record))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("DOCX render task failed: {e}")))??;

    info!("Rendered DOCX for '{name}' ({} bytes)", docx.len());
    Ok(attachment(docx, DOCX_MIME, DOCX_FILE_NAME))
}

/// GET /uploads/:name
pub async fn handle_get_upload(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    let bytes = state.assets.store().read(&name).await?;
    Ok(([(header::CONTENT_TYPE, content_type_for(&name))], bytes).into_response())
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"))
}

fn attachment(bytes: Vec<u8>, content_type: &'static str, file_name: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

fn content_type_for(name: &str) -> &'static str {
    let ext = name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg" | "svg+xml") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
