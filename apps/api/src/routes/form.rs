//! Multipart form decoding for the resume endpoints.

use axum::extract::Multipart;
use tracing::debug;

use crate::assets::UploadedPhoto;
use crate::errors::AppError;
use crate::models::resume::RawFields;

const PHOTO_FILE_FIELD: &str = "photo";
const PHOTO_URL_FIELD: &str = "PHOTO_URL";
const SUMMARY_FIELD: &str = "SUMMARY";
const HTML_FIELD: &str = "html";

#[derive(Debug, Default)]
pub struct ResumeForm {
    pub fields: RawFields,
    pub photo_url: Option<String>,
    pub photo: Option<UploadedPhoto>,
    /// A narrative the client already previewed.
    pub summary: Option<String>,
    pub html: Option<String>,
}

pub async fn read_form(mut multipart: Multipart) -> Result<ResumeForm, AppError> {
    let mut form = ResumeForm::default();

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let Some(key) = field.name().map(str::to_owned) else {
            continue;
        };

        match key.as_str() {
            PHOTO_FILE_FIELD => {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let bytes = field.bytes().await.map_err(malformed)?;
                // Browsers submit an empty part when no file was chosen.
                if !bytes.is_empty() {
                    form.photo = Some(UploadedPhoto { file_name, bytes });
                }
            }
            PHOTO_URL_FIELD => {
                let value = field.text().await.map_err(malformed)?;
                form.photo_url = Some(value).filter(|v| !v.trim().is_empty());
            }
            SUMMARY_FIELD => {
                let value = field.text().await.map_err(malformed)?;
                form.summary = Some(value).filter(|v| !v.trim().is_empty());
            }
            HTML_FIELD => form.html = Some(field.text().await.map_err(malformed)?),
            other => {
                let value = field.text().await.map_err(malformed)?;
                if !form.fields.set(other, value) {
                    debug!("Ignoring unknown form field '{other}'");
                }
            }
        }
    }

    Ok(form)
}

fn malformed(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Malformed multipart body: {e}"))
}
