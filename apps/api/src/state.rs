use std::sync::Arc;

use crate::assets::AssetResolver;
use crate::config::Config;
use crate::narrative::NarrativeGenerator;
use crate::render::docx::DocxRenderer;
use crate::render::html::HtmlRenderer;
use crate::render::pdf::PdfRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is immutable after startup; requests share no mutable state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub assets: AssetResolver,
    pub narrator: NarrativeGenerator,
    /// Template compiled and slot-checked at startup.
    pub html: Arc<HtmlRenderer>,
    pub pdf: PdfRenderer,
    pub docx: DocxRenderer,
}
