//! Narrative summary: prompt substitution, the generation call, and cleanup.
//! All generation traffic goes through `llm_client`.

pub mod clean;
pub mod prompt;

use std::sync::Arc;

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::models::resume::RawFields;
use clean::clean_narrative;
use prompt::PromptTemplate;

/// A generation response and its cleaned form. Only the cleaned text reaches a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedNarrative {
    raw: String,
    cleaned: String,
}

impl GeneratedNarrative {
    pub fn from_raw(raw: String) -> Self {
        let cleaned = clean_narrative(&raw);
        Self { raw, cleaned }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn into_cleaned(self) -> String {
        self.cleaned
    }
}

#[derive(Clone)]
pub struct NarrativeGenerator {
    llm: LlmClient,
    prompt: Arc<PromptTemplate>,
}

impl NarrativeGenerator {
    pub fn new(llm: LlmClient, prompt: PromptTemplate) -> Self {
        Self {
            llm,
            prompt: Arc::new(prompt),
        }
    }

    /// Produces the cleaned summary for `fields`. Any generation failure fails
    /// the whole request; nothing is retried.
    pub async fn generate(&self, fields: &RawFields) -> Result<String, AppError> {
        let prompt = self.prompt.render(fields);
        let raw = self.llm.generate(&prompt).await?;
        let narrative = GeneratedNarrative::from_raw(raw);

        info!(
            "Generated narrative ({} raw chars) for '{}'",
            narrative.raw().len(),
            fields.name
        );
        Ok(narrative.into_cleaned())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::llm_client::LlmError;
    use crate::test_support::spawn_generation_stub;

    fn generator(url: &str, template: &str) -> NarrativeGenerator {
        let llm = LlmClient::new(url, "test-model", Duration::from_secs(5)).unwrap();
        NarrativeGenerator::new(llm, PromptTemplate::parse(template).unwrap())
    }

    #[test]
    fn test_generated_narrative_keeps_raw_and_cleans() {
        let narrative = GeneratedNarrative::from_raw("<think>hmm</think> Summary: Ships.".to_string());
        assert_eq!(narrative.raw(), "<think>hmm</think> Summary: Ships.");
        assert_eq!(narrative.into_cleaned(), "Ships.");
    }

    #[tokio::test]
    async fn test_generate_sends_filled_prompt_and_cleans_response() {
        let stub = spawn_generation_stub(
            StatusCode::OK,
            json!({"response": "<think>\nplanning\n</think>\n**Summary:** Builds resilient APIs."}),
        )
        .await;
        let fields = RawFields {
            name: "A. Lee".to_string(),
            role: "Backend Engineer".to_string(),
            ..Default::default()
        };

        let narrative = generator(&stub.url, "Summarize {name} ({role}).")
            .generate(&fields)
            .await
            .unwrap();

        assert_eq!(narrative, "Builds resilient APIs.");
        assert_eq!(
            stub.requests()[0]["prompt"],
            "Summarize A. Lee (Backend Engineer)."
        );
    }

    #[tokio::test]
    async fn test_service_unavailable_is_generation_service_error() {
        let stub = spawn_generation_stub(StatusCode::SERVICE_UNAVAILABLE, json!("busy")).await;

        let err = generator(&stub.url, "Summarize {name}.")
            .generate(&RawFields::default())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::GenerationService(LlmError::Api { status: 503, .. })
        ));
    }
}
