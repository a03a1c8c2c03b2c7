mod assets;
mod config;
mod errors;
mod llm_client;
mod models;
mod narrative;
mod render;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assets::store::AssetStore;
use crate::assets::AssetResolver;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::narrative::prompt::PromptTemplate;
use crate::narrative::NarrativeGenerator;
use crate::render::docx::DocxRenderer;
use crate::render::html::HtmlRenderer;
use crate::render::pdf::{PdfRenderer, WeasyPrint};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vitae API v{}", env!("CARGO_PKG_VERSION"));

    // Templates are loaded once and validated before anything listens.
    let prompt = PromptTemplate::load(&config.prompt_template_path)?;
    info!(
        "Prompt template loaded from {} ({} placeholders)",
        config.prompt_template_path.display(),
        prompt.placeholders().count()
    );
    let html = HtmlRenderer::load(&config.html_template_path)?;
    info!(
        "HTML template loaded from {}",
        config.html_template_path.display()
    );

    let store = AssetStore::open(config.upload_dir()).await?;
    info!("Uploads are written to {}", store.dir().display());

    let llm = LlmClient::new(
        &config.generation_url,
        &config.generation_model,
        config.generation_timeout,
    )?;
    info!(
        "Generation client initialized (model: {}, timeout: {:?})",
        llm.model(),
        config.generation_timeout
    );

    let pdf_engine = Arc::new(WeasyPrint::new(&config.pdf_engine_bin));
    info!("PDF engine: {}", config.pdf_engine_bin.display());

    let state = AppState {
        assets: AssetResolver::new(store, &config.placeholder_photo_url),
        narrator: NarrativeGenerator::new(llm, prompt),
        html: Arc::new(html),
        pdf: PdfRenderer::new(pdf_engine, &config.asset_root),
        docx: DocxRenderer,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
