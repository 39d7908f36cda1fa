//! Extract command - ask the model for one record per segment.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use aixtract_core::models::config::AixtractConfig;
use aixtract_core::{ExtractionController, GeneratedDocument, PreprocessedDocument};
use aixtract_genai::OllamaBackend;

use super::{load_config, write_json};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Preprocessed JSON file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Model name (overrides config)
    #[arg(short, long)]
    model: Option<String>,

    /// Ollama endpoint (overrides config)
    #[arg(long)]
    endpoint: Option<String>,

    /// Attempts per segment (overrides config)
    #[arg(long)]
    max_retries: Option<u32>,
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(model) = args.model {
        config.generation.model = model;
    }
    if let Some(endpoint) = args.endpoint {
        config.generation.endpoint = endpoint;
    }
    if let Some(max_retries) = args.max_retries {
        config.generation.max_retries = max_retries;
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    let document: PreprocessedDocument = serde_json::from_str(&fs::read_to_string(&args.input)?)?;

    let start = Instant::now();
    let generated = extract_document(&document, &config)?;

    eprintln!(
        "{} Extracted {} pages in {:?}",
        style("✓").green(),
        generated.pages.len(),
        start.elapsed()
    );

    write_json(&generated, args.output.as_deref())
}

/// Connect to the configured backend and extract every segment of `document`.
pub fn extract_document(
    document: &PreprocessedDocument,
    config: &AixtractConfig,
) -> anyhow::Result<GeneratedDocument> {
    let backend = OllamaBackend::connect(&config.ollama())
        .map_err(|e| anyhow::anyhow!("Failed to reach {}: {}", config.generation.endpoint, e))?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message(format!(
        "Extracting {} pages with {} at {}",
        document.pages.len(),
        config.generation.model,
        backend.base_url()
    ));
    pb.enable_steady_tick(std::time::Duration::from_millis(120));

    let controller = ExtractionController::from_config(backend, &config.generation);
    let result = controller.process(document);

    pb.finish_and_clear();
    Ok(result?)
}
