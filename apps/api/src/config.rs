use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::assets::store::UPLOAD_SUBDIR;

const DEFAULT_GENERATION_URL: &str = "http://localhost:11434/api/generate";
const DEFAULT_GENERATION_MODEL: &str = "deepseek-r1:1.5b";
const DEFAULT_PLACEHOLDER_PHOTO_URL: &str = "https://via.placeholder.com/120";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Resource root: holds the upload directory and is the PDF base URL.
    pub asset_root: PathBuf,
    pub html_template_path: PathBuf,
    pub prompt_template_path: PathBuf,
    pub generation_url: String,
    pub generation_model: String,
    pub generation_timeout: Duration,
    pub pdf_engine_bin: PathBuf,
    pub placeholder_photo_url: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: env_or("RUST_LOG", "info"),
            asset_root: PathBuf::from(env_or("ASSET_ROOT", ".")),
            html_template_path: PathBuf::from(env_or(
                "HTML_TEMPLATE_PATH",
                "templates/preview.html",
            )),
            prompt_template_path: PathBuf::from(env_or(
                "PROMPT_TEMPLATE_PATH",
                "templates/prompt_template.txt",
            )),
            generation_url: env_or("GENERATION_URL", DEFAULT_GENERATION_URL),
            generation_model: env_or("GENERATION_MODEL", DEFAULT_GENERATION_MODEL),
            generation_timeout: Duration::from_secs(parse_env("GENERATION_TIMEOUT_SECS", 120)?),
            pdf_engine_bin: PathBuf::from(env_or("PDF_ENGINE_BIN", "weasyprint")),
            placeholder_photo_url: env_or("PLACEHOLDER_PHOTO_URL", DEFAULT_PLACEHOLDER_PHOTO_URL),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.asset_root.join(UPLOAD_SUBDIR)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Template problems detected while loading startup configuration. Fatal to process start.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read template {}: {source}", .path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("prompt template placeholder '{{{0}}}' does not name a resume field")]
    UnknownPromptField(String),

    #[error("prompt template has an unclosed '{{' at byte {0}")]
    UnclosedPlaceholder(usize),

    #[error("prompt template has an unmatched '}}' at byte {0}")]
    UnmatchedBrace(usize),

    #[error("HTML template is invalid: {0}")]
    HtmlTemplate(#[from] minijinja::Error),

    #[error("HTML template references unknown slot '{0}'")]
    UnknownSlot(String),
}

pub fn read_template(path: &std::path::Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::TemplateRead {
        path: path.to_path_buf(),
        source,
    })
}
