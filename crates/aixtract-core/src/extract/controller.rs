//! Retry-driven structured extraction.

use std::time::Instant;

use tracing::{debug, info, warn};

use aixtract_genai::{ChatRequest, GenerativeService};

use super::json_block::parse_json_block;
use super::template::PromptTemplate;
use super::Result;
use crate::error::ExtractionError;
use crate::models::config::GenerationConfig;
use crate::models::generated::{GeneratedDocument, PageGenerate, StructuredRecord};
use crate::models::segments::PreprocessedDocument;

/// Ask the service for a structured record until one parses or the budget runs out.
///
/// Each attempt sends the same single-turn, non-streaming request. Output that
/// holds no parseable `{ ... }` block, and service errors, cost one attempt.
pub fn extract_structured<S: GenerativeService + ?Sized>(
    service: &S,
    prompt: &str,
    model: &str,
    max_retries: u32,
) -> Result<StructuredRecord> {
    if max_retries == 0 {
        return Err(ExtractionError::Config(
            "max_retries must be a positive integer".to_string(),
        ));
    }

    let request = ChatRequest::single_turn(model, prompt);
    let mut remaining = max_retries;
    let mut last_failure = String::new();

    while remaining > 0 {
        let attempt = max_retries - remaining + 1;
        let start = Instant::now();

        match service.invoke(&request) {
            Ok(text) => match parse_json_block(&text) {
                Ok(record) => {
                    debug!(
                        "Attempt {}/{} parsed {} top-level keys in {:?}",
                        attempt,
                        max_retries,
                        record.len(),
                        start.elapsed()
                    );
                    return Ok(record);
                }
                Err(reason) => {
                    warn!("Attempt {}/{} returned invalid JSON: {}", attempt, max_retries, reason);
                    last_failure = reason;
                }
            },
            Err(e) => {
                warn!("Attempt {}/{} failed: {}", attempt, max_retries, e);
                last_failure = e.to_string();
            }
        }

        remaining -= 1;
    }

    Err(ExtractionError::ExhaustedRetries {
        retries: max_retries,
        last_failure,
    })
}

/// Drives extraction for every segment of every page.
pub struct ExtractionController<S: GenerativeService> {
    service: S,
    model: String,
    template: PromptTemplate,
    max_retries: u32,
}

impl<S: GenerativeService> ExtractionController<S> {
    /// Create a controller with a budget of 5 attempts per segment.
    pub fn new(service: S, model: impl Into<String>, template: PromptTemplate) -> Self {
        Self {
            service,
            model: model.into(),
            template,
            max_retries: 5,
        }
    }

    /// Create a controller from the generation configuration.
    pub fn from_config(service: S, config: &GenerationConfig) -> Self {
        Self::new(
            service,
            config.model.clone(),
            PromptTemplate::new(config.prompt_template.clone()),
        )
        .with_max_retries(config.max_retries)
    }

    /// Set the attempt budget per segment.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Extract one record from an already rendered prompt.
    pub fn extract(&self, rendered_prompt: &str) -> Result<StructuredRecord> {
        extract_structured(&self.service, rendered_prompt, &self.model, self.max_retries)
    }

    /// Extract a record for each segment of each page, in segment order.
    ///
    /// The first failing segment aborts the run.
    pub fn process(&self, document: &PreprocessedDocument) -> Result<GeneratedDocument> {
        if self.max_retries == 0 {
            return Err(ExtractionError::Config(
                "max_retries must be a positive integer".to_string(),
            ));
        }

        let mut generated = GeneratedDocument::default();

        for (page, content) in &document.pages {
            let start = Instant::now();
            let mut page_generate = PageGenerate::default();

            for (segment, fragments) in content.segments() {
                let prompt = self
                    .template
                    .render_segment(fragments)
                    .map_err(|e| ExtractionError::from(e).in_segment(*page, segment))?;

                debug!(
                    "Page {} segment {}: {} fragments, prompt {} chars",
                    page,
                    segment,
                    fragments.len(),
                    prompt.len()
                );

                let record = self
                    .extract(&prompt)
                    .map_err(|e| e.in_segment(*page, segment))?;

                page_generate.insert(segment, record);
            }

            info!("Extracted page {} in {:?}", page, start.elapsed());
            generated.pages.insert(*page, page_generate);
        }

        Ok(generated)
    }
}
