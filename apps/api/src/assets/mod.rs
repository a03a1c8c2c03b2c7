//! Photo resolution: turns whatever photo input a request carried into exactly
//! one [`AssetReference`].
//!
//! Precedence: data URI, then uploaded file, then the placeholder URL. A
//! `PHOTO_URL` value that is not a data URI (for example a reference handed
//! back from an earlier preview) is passed through as a remote reference.

pub mod store;

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::AssetReference;
use store::AssetStore;

const DATA_URI_PREFIX: &str = "data:";
const FALLBACK_EXTENSION: &str = "bin";

/// A file received through a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedPhoto {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Every photo input a request may carry.
#[derive(Debug, Clone, Default)]
pub struct PhotoInput {
    /// The raw `PHOTO_URL` form value.
    pub photo_url: Option<String>,
    pub upload: Option<UploadedPhoto>,
}

/// A decoded `data:image/<subtype>;base64,<payload>` URI.
#[derive(Debug, PartialEq, Eq)]
pub struct DataUri {
    pub subtype: String,
    pub bytes: Vec<u8>,
}

/// Parses an embedded image data URI.
pub fn parse_data_uri(uri: &str) -> Result<DataUri, AppError> {
    let (header, payload) = uri
        .split_once(',')
        .ok_or_else(|| AppError::InvalidAssetFormat("data URI has no ',' separator".to_string()))?;

    let media_type = header
        .strip_prefix(DATA_URI_PREFIX)
        .ok_or_else(|| AppError::InvalidAssetFormat("not a data URI".to_string()))?;

    let (kind, rest) = media_type.split_once('/').ok_or_else(|| {
        AppError::InvalidAssetFormat("data URI header has no MIME subtype".to_string())
    })?;
    if !kind.eq_ignore_ascii_case("image") {
        return Err(AppError::InvalidAssetFormat(format!(
            "expected an image, got '{kind}'"
        )));
    }

    let subtype = rest.split(';').next().unwrap_or_default();
    let subtype = sanitize_extension(subtype).ok_or_else(|| {
        AppError::InvalidAssetFormat("data URI header has no MIME subtype".to_string())
    })?;

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| AppError::InvalidAssetFormat(format!("invalid base64 payload: {e}")))?;

    Ok(DataUri { subtype, bytes })
}

/// Lower-cases an extension and rejects anything that could escape a file name.
fn sanitize_extension(raw: &str) -> Option<String> {
    let ext = raw.trim().to_ascii_lowercase();
    let valid = !ext.is_empty()
        && ext
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        && !ext.starts_with('.');
    valid.then_some(ext)
}

fn upload_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(sanitize_extension)
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}

/// Resolves photo inputs into persisted or remote references.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    store: AssetStore,
    placeholder_url: String,
}

impl AssetResolver {
    pub fn new(store: AssetStore, placeholder_url: impl Into<String>) -> Self {
        Self {
            store,
            placeholder_url: placeholder_url.into(),
        }
    }

    pub fn store(&self) -> &AssetStore {
        &self.store
    }

    /// Produces exactly one reference. Performs one file write for inline and
    /// uploaded photos, none for remote ones.
    pub async fn resolve(&self, input: PhotoInput) -> Result<AssetReference, AppError> {
        match input.photo_url {
            Some(url) if url.starts_with(DATA_URI_PREFIX) => {
                let DataUri { subtype, bytes } = parse_data_uri(&url)?;
                let asset = self.store.persist(&subtype, &bytes).await?;
                info!("Stored inline photo at {}", asset.path.display());
                return Ok(AssetReference::Inline {
                    asset,
                    bytes: Bytes::from(bytes),
                });
            }
            Some(url) if !url.trim().is_empty() => {
                return Ok(AssetReference::Remote(url));
            }
            _ => {}
        }

        if let Some(upload) = input.upload {
            let ext = upload_extension(&upload.file_name);
            let asset = self.store.persist(&ext, &upload.bytes).await?;
            info!(
                "Stored uploaded photo '{}' at {}",
                upload.file_name,
                asset.path.display()
            );
            return Ok(AssetReference::Uploaded(asset));
        }

        Ok(AssetReference::Remote(self.placeholder_url.clone()))
    }
}
