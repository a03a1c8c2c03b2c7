//! Shared fixtures for unit tests: a stand-in generation service, a fake PDF
//! engine, sample records and a multipart body builder.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{http::StatusCode, routing::post, Json, Router};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::assets::store::AssetStore;
use crate::assets::AssetResolver;
use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::resume::{AssetReference, RawFields, ResumeRecord};
use crate::narrative::prompt::PromptTemplate;
use crate::narrative::NarrativeGenerator;
use crate::render::docx::DocxRenderer;
use crate::render::html::HtmlRenderer;
use crate::render::pdf::{PdfEngine, PdfRenderer};
use crate::state::AppState;

pub const PLACEHOLDER_URL: &str = "https://via.placeholder.com/120";

pub const TEST_HTML_TEMPLATE: &str = r#"<html><body>
<h1>{{ NAME }}</h1>
<img src="{{ PHOTO_URL }}">
<span class="email">{{ EMAIL }}</span><span class="phone">{{ NUMBER }}</span>
<p class="role">{{ ROLE }}</p>
<p class="summary">{{ SUMMARY }}</p>
<section id="experience">{{ EXPERIENCE }}</section>
<section id="skills">{{ SKILLS }}</section>
</body></html>"#;

pub const TEST_PROMPT: &str = "Write a professional summary for {name}, a {role}.\nExperience: {experience}\nSkills: {skills}";

pub fn test_config(asset_root: &Path) -> Config {
    Config {
        port: 0,
        rust_log: "debug".to_string(),
        asset_root: asset_root.to_path_buf(),
        html_template_path: PathBuf::from("templates/preview.html"),
        prompt_template_path: PathBuf::from("templates/prompt_template.txt"),
        generation_url: "http://127.0.0.1:9/api/generate".to_string(),
        generation_model: "test-model".to_string(),
        generation_timeout: Duration::from_secs(5),
        pdf_engine_bin: PathBuf::from("weasyprint"),
        placeholder_photo_url: PLACEHOLDER_URL.to_string(),
        max_upload_bytes: 10 * 1024 * 1024,
    }
}

pub fn sample_record() -> ResumeRecord {
    let fields = RawFields {
        name: "A. Lee".to_string(),
        email: "a@x.com".to_string(),
        experience: "<b>Built X</b>".to_string(),
        ..Default::default()
    };
    ResumeRecord::assemble(
        fields,
        AssetReference::Remote(PLACEHOLDER_URL.to_string()),
        "Builds things.".to_string(),
    )
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([200, 40, 90]));
    let mut out = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .unwrap();
    out
}

pub fn png_data_uri(bytes: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(bytes))
}

// ────────────────────────────────────────────────────────────────────────────
// Generation service stand-in
// ────────────────────────────────────────────────────────────────────────────

pub struct GenerationStub {
    pub url: String,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl GenerationStub {
    /// Request bodies received so far.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/generate")
}

/// Answers every generate call with `status` and `body`.
pub async fn spawn_generation_stub(status: StatusCode, body: Value) -> GenerationStub {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();

    let app = Router::new().route(
        "/api/generate",
        post(move |Json(request): Json<Value>| {
            let recorded = recorded.clone();
            let body = body.clone();
            async move {
                recorded.lock().unwrap().push(request);
                (status, Json(body))
            }
        }),
    );

    GenerationStub {
        url: serve(app).await,
        requests,
    }
}

/// Answers only after `delay`.
pub async fn spawn_slow_generation_stub(delay: Duration) -> String {
    let app = Router::new().route(
        "/api/generate",
        post(move || async move {
            tokio::time::sleep(delay).await;
            Json(json!({"response": "too late"}))
        }),
    );
    serve(app).await
}

// ────────────────────────────────────────────────────────────────────────────
// PDF engine stand-in
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakePdfEngine {
    calls: Mutex<Vec<(String, PathBuf)>>,
    fail: bool,
}

impl FakePdfEngine {
    pub fn failing() -> Self {
        Self {
            calls: Mutex::default(),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PdfEngine for FakePdfEngine {
    async fn convert(&self, html: &str, base_dir: &Path) -> Result<Vec<u8>, AppError> {
        self.calls
            .lock()
            .unwrap()
            .push((html.to_string(), base_dir.to_path_buf()));
        if self.fail {
            return Err(AppError::RenderFailure("engine crashed".to_string()));
        }
        Ok(format!("%PDF-1.7 {}", html.len()).into_bytes())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// App state and requests
// ────────────────────────────────────────────────────────────────────────────

/// Full state backed by a temp asset root, a generation stub and a fake PDF engine.
pub async fn test_state(
    status: StatusCode,
    body: Value,
) -> (tempfile::TempDir, AppState, GenerationStub) {
    let dir = tempfile::tempdir().unwrap();
    let stub = spawn_generation_stub(status, body).await;
    let mut config = test_config(dir.path());
    config.generation_url = stub.url.clone();

    let store = AssetStore::open(config.upload_dir()).await.unwrap();
    let llm = LlmClient::new(
        &config.generation_url,
        &config.generation_model,
        config.generation_timeout,
    )
    .unwrap();

    let state = AppState {
        assets: AssetResolver::new(store, &config.placeholder_photo_url),
        narrator: NarrativeGenerator::new(llm, PromptTemplate::parse(TEST_PROMPT).unwrap()),
        html: Arc::new(HtmlRenderer::from_source(TEST_HTML_TEMPLATE.to_string()).unwrap()),
        pdf: PdfRenderer::new(Arc::new(FakePdfEngine::default()), dir.path()),
        docx: DocxRenderer,
        config,
    };
    (dir, state, stub)
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

impl<'a> Part<'a> {
    pub fn text(name: &'a str, value: &'a str) -> Self {
        Part::Text(name, value)
    }

    pub fn file(name: &'a str, file_name: &'a str, bytes: &'a [u8]) -> Self {
        Part::File(name, file_name, bytes)
    }
}

/// Encodes `parts` as `multipart/form-data`, returning the content type and body.
pub fn multipart_body(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    const BOUNDARY: &str = "vitae-test-boundary";
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}
